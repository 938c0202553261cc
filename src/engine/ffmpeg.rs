// SPDX-License-Identifier: MPL-2.0
//! [`MediaEngine`] backed by FFmpeg decoding and cpal output.
//!
//! The engine itself never blocks: every command updates the cached state,
//! queues [`EngineEvent`]s and forwards a [`SessionCommand`] to the running
//! playback session. Decoder output comes back through
//! [`FfmpegEngine::handle_notification`], fed by [`FfmpegEngine::subscription`].

use super::subscription::{self, PlaybackSession, SessionCommand};
use super::{
    EngineEvent, MediaEngine, MediaStatus, Notification, PlaybackCommands, PlaybackEvent,
    PlaybackState, StreamKind, Volume,
};
use crate::error::MediaError;
use crate::media::MediaInfo;
use std::path::{Path, PathBuf};

/// Playback engine driving one source at a time.
#[derive(Debug)]
pub struct FfmpegEngine {
    source: Option<PathBuf>,

    /// Incremented on every `set_source`; older sessions are ignored.
    session: u64,

    commands: Option<PlaybackCommands>,
    info: Option<MediaInfo>,

    state: PlaybackState,
    status: MediaStatus,
    position_ms: u64,
    duration_ms: u64,
    volume: Volume,
    muted: bool,

    /// `play` arrived while the source was still loading.
    play_when_loaded: bool,

    /// Seeks sent but not yet acknowledged, per stream. Reports from a
    /// stream with a pending seek predate it and are dropped.
    pending_video_seeks: u32,
    pending_audio_seeks: u32,

    video_finished: bool,
    audio_finished: bool,

    events: Vec<EngineEvent>,
}

impl FfmpegEngine {
    #[must_use]
    pub fn new(volume: Volume, muted: bool) -> Self {
        Self {
            source: None,
            session: 0,
            commands: None,
            info: None,
            state: PlaybackState::Stopped,
            status: MediaStatus::NoMedia,
            position_ms: 0,
            duration_ms: 0,
            volume,
            muted,
            play_when_loaded: false,
            pending_video_seeks: 0,
            pending_audio_seeks: 0,
            video_finished: false,
            audio_finished: false,
            events: Vec::new(),
        }
    }

    /// Subscription running the current session, if a source is set.
    pub fn subscription(&self) -> iced::Subscription<Notification> {
        match &self.source {
            Some(path) => subscription::playback(PlaybackSession {
                path: path.clone(),
                id: self.session,
            }),
            None => iced::Subscription::none(),
        }
    }

    /// Applies one report from a playback session.
    pub fn handle_notification(&mut self, notification: Notification) {
        if notification.session != self.session {
            log::trace!(
                "Ignoring event from superseded session {}",
                notification.session
            );
            return;
        }

        match notification.event {
            PlaybackEvent::Loaded { info, commands } => self.on_loaded(info, commands),
            PlaybackEvent::Invalid(reason) => self.on_invalid(reason),
            PlaybackEvent::Frame(frame) => {
                if self.pending_video_seeks > 0 {
                    return;
                }
                if self.status == MediaStatus::Buffering {
                    self.set_status(MediaStatus::Buffered);
                }
                // A paused seek shows the first frame at or after the target;
                // the position stays on the request
                if self.video_drives_position()
                    && self.state == PlaybackState::Playing
                    && self.status != MediaStatus::EndOfMedia
                {
                    self.set_position_cached(frame.position_ms());
                }
                self.events.push(EngineEvent::FrameReady(frame));
            }
            PlaybackEvent::AudioClock(pts_secs) => {
                if self.pending_audio_seeks > 0 || self.video_drives_position() {
                    return;
                }
                if self.status == MediaStatus::Buffering {
                    self.set_status(MediaStatus::Buffered);
                }
                if self.status != MediaStatus::EndOfMedia {
                    self.set_position_cached(super::decoder::secs_to_ms(pts_secs));
                }
            }
            PlaybackEvent::Buffering => {
                if self.pending_video_seeks == 0 && self.state == PlaybackState::Playing {
                    self.set_status(MediaStatus::Buffering);
                }
            }
            PlaybackEvent::Seeked(stream) => {
                let pending = match stream {
                    StreamKind::Video => &mut self.pending_video_seeks,
                    StreamKind::Audio => &mut self.pending_audio_seeks,
                };
                *pending = pending.saturating_sub(1);
            }
            PlaybackEvent::EndOfStream(stream) => self.on_end_of_stream(stream),
            PlaybackEvent::Error(message) => {
                let error = MediaError::from_message(&message);
                log::error!("Playback error: {error}");
                self.events.push(EngineEvent::ErrorOccurred(error.to_string()));
            }
        }
    }

    /// Ends the current session, e.g. when the window closes.
    pub fn shutdown(&mut self) {
        if let Some(commands) = self.commands.take() {
            self.send(&commands, SessionCommand::Stop);
        }
        self.set_state(PlaybackState::Stopped);
    }

    fn on_loaded(&mut self, info: MediaInfo, commands: PlaybackCommands) {
        log::debug!("Media loaded: {} ms", info.duration_ms);
        self.send(&commands, SessionCommand::SetVolume(self.volume));
        self.send(&commands, SessionCommand::SetMuted(self.muted));
        self.commands = Some(commands);

        self.set_duration(info.duration_ms);
        self.video_finished = !info.has_video;
        self.audio_finished = !info.has_audio;
        self.info = Some(info);
        self.set_status(MediaStatus::Loaded);

        if std::mem::take(&mut self.play_when_loaded) {
            self.command(SessionCommand::Play);
        }
    }

    fn on_invalid(&mut self, reason: String) {
        self.commands = None;
        self.info = None;
        self.play_when_loaded = false;
        self.set_state(PlaybackState::Stopped);
        self.set_status(MediaStatus::Invalid);
        self.events.push(EngineEvent::ErrorOccurred(reason));
    }

    fn on_end_of_stream(&mut self, stream: StreamKind) {
        match stream {
            StreamKind::Video if self.pending_video_seeks == 0 => self.video_finished = true,
            StreamKind::Audio if self.pending_audio_seeks == 0 => self.audio_finished = true,
            _ => return,
        }
        if !(self.video_finished && self.audio_finished) || self.status == MediaStatus::EndOfMedia
        {
            return;
        }

        log::debug!("End of media");
        self.command(SessionCommand::Pause);
        self.set_position_cached(self.duration_ms);
        self.set_state(PlaybackState::Stopped);
        self.set_status(MediaStatus::EndOfMedia);
    }

    fn video_drives_position(&self) -> bool {
        self.info.as_ref().is_some_and(|info| info.has_video)
    }

    fn has_stream(&self, stream: StreamKind) -> bool {
        self.info.as_ref().is_some_and(|info| match stream {
            StreamKind::Video => info.has_video,
            StreamKind::Audio => info.has_audio,
        })
    }

    fn is_playable(&self) -> bool {
        !matches!(self.status, MediaStatus::NoMedia | MediaStatus::Invalid)
    }

    fn command(&self, command: SessionCommand) {
        if let Some(commands) = &self.commands {
            self.send(commands, command);
        }
    }

    fn send(&self, commands: &PlaybackCommands, command: SessionCommand) {
        if let Err(e) = commands.send(command) {
            log::debug!("{e}");
        }
    }

    fn seek_streams(&mut self, position_ms: u64) {
        if self.commands.is_none() {
            return;
        }
        if self.has_stream(StreamKind::Video) {
            self.pending_video_seeks += 1;
            self.video_finished = false;
        }
        if self.has_stream(StreamKind::Audio) {
            self.pending_audio_seeks += 1;
            self.audio_finished = false;
        }
        #[allow(clippy::cast_precision_loss)]
        let target_secs = position_ms as f64 / 1000.0;
        self.command(SessionCommand::Seek { target_secs });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.events.push(EngineEvent::PlaybackStateChanged(state));
        }
    }

    fn set_status(&mut self, status: MediaStatus) {
        if self.status != status {
            self.status = status;
            self.events.push(EngineEvent::MediaStatusChanged(status));
        }
    }

    fn set_duration(&mut self, duration_ms: u64) {
        if self.duration_ms != duration_ms {
            self.duration_ms = duration_ms;
            self.events.push(EngineEvent::DurationChanged(duration_ms));
        }
    }

    fn set_position_cached(&mut self, position_ms: u64) {
        let position_ms = if self.duration_ms > 0 {
            position_ms.min(self.duration_ms)
        } else {
            position_ms
        };
        if self.position_ms != position_ms {
            self.position_ms = position_ms;
            self.events.push(EngineEvent::PositionChanged(position_ms));
        }
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new(Volume::default(), false)
    }
}

impl MediaEngine for FfmpegEngine {
    fn set_source(&mut self, path: &Path) {
        if let Some(commands) = self.commands.take() {
            self.send(&commands, SessionCommand::Stop);
        }

        self.session += 1;
        self.source = Some(path.to_path_buf());
        self.info = None;
        self.play_when_loaded = false;
        self.pending_video_seeks = 0;
        self.pending_audio_seeks = 0;
        self.video_finished = false;
        self.audio_finished = false;

        self.set_state(PlaybackState::Stopped);
        self.set_position_cached(0);
        self.set_duration(0);
        self.set_status(MediaStatus::Loading);
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn play(&mut self) {
        if !self.is_playable() || self.state == PlaybackState::Playing {
            return;
        }
        if self.status == MediaStatus::Loading {
            self.play_when_loaded = true;
            self.set_state(PlaybackState::Playing);
            return;
        }
        if self.status == MediaStatus::EndOfMedia {
            self.set_position(0);
        }

        self.command(SessionCommand::Play);
        self.set_state(PlaybackState::Playing);
    }

    fn pause(&mut self) {
        if !self.is_playable() || self.state != PlaybackState::Playing {
            return;
        }
        self.play_when_loaded = false;
        self.command(SessionCommand::Pause);
        self.set_state(PlaybackState::Paused);
    }

    fn stop(&mut self) {
        self.play_when_loaded = false;
        if self.is_playable() && self.status != MediaStatus::Loading {
            if self.state != PlaybackState::Stopped {
                self.command(SessionCommand::Pause);
            }
            self.seek_streams(0);
            if self.status == MediaStatus::EndOfMedia {
                self.set_status(MediaStatus::Loaded);
            }
            self.set_position_cached(0);
        }
        self.set_state(PlaybackState::Stopped);
    }

    fn set_position(&mut self, position_ms: u64) {
        if !self.is_playable() || self.status == MediaStatus::Loading {
            return;
        }
        let position_ms = position_ms.min(self.duration_ms);
        self.seek_streams(position_ms);
        if self.status == MediaStatus::EndOfMedia {
            self.set_status(MediaStatus::Loaded);
        }
        self.set_position_cached(position_ms);
    }

    fn position(&self) -> u64 {
        self.position_ms
    }

    fn duration(&self) -> u64 {
        self.duration_ms
    }

    fn playback_state(&self) -> PlaybackState {
        self.state
    }

    fn media_status(&self) -> MediaStatus {
        self.status
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.command(SessionCommand::SetVolume(volume));
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.command(SessionCommand::SetMuted(muted));
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::VideoFrame;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct Harness {
        engine: FfmpegEngine,
        commands: mpsc::UnboundedReceiver<SessionCommand>,
    }

    impl Harness {
        fn notify(&mut self, event: PlaybackEvent) {
            let session = self.engine.session;
            self.engine
                .handle_notification(Notification { session, event });
        }

        fn sent(&mut self) -> Vec<SessionCommand> {
            let mut sent = Vec::new();
            while let Ok(command) = self.commands.try_recv() {
                sent.push(command);
            }
            sent
        }
    }

    fn loaded(duration_ms: u64, has_video: bool, has_audio: bool) -> Harness {
        let mut engine = FfmpegEngine::default();
        engine.set_source(Path::new("/media/clip.mp4"));
        let (tx, rx) = mpsc::unbounded_channel();
        let mut harness = Harness {
            engine,
            commands: rx,
        };
        harness.notify(PlaybackEvent::Loaded {
            info: MediaInfo {
                duration_ms,
                has_video,
                has_audio,
            },
            commands: PlaybackCommands::new(tx),
        });
        harness.sent();
        harness.engine.take_events();
        harness
    }

    fn frame_at(ms: u64) -> VideoFrame {
        VideoFrame {
            rgba: Arc::new(vec![0; 4]),
            width: 1,
            height: 1,
            pts_secs: ms as f64 / 1000.0,
        }
    }

    #[test]
    fn new_engine_has_no_media() {
        let engine = FfmpegEngine::default();
        assert_eq!(engine.media_status(), MediaStatus::NoMedia);
        assert_eq!(engine.playback_state(), PlaybackState::Stopped);
        assert!(engine.source().is_none());
    }

    #[test]
    fn play_without_media_is_ignored() {
        let mut engine = FfmpegEngine::default();
        engine.play();
        assert_eq!(engine.playback_state(), PlaybackState::Stopped);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn set_source_starts_loading() {
        let mut engine = FfmpegEngine::default();
        engine.set_source(Path::new("/media/clip.mp4"));

        assert_eq!(engine.source(), Some(Path::new("/media/clip.mp4")));
        assert_eq!(
            engine.take_events(),
            vec![EngineEvent::MediaStatusChanged(MediaStatus::Loading)]
        );
    }

    #[test]
    fn loaded_reports_duration_and_pushes_audio_settings() {
        let mut engine = FfmpegEngine::new(Volume::new(0.3), true);
        engine.set_source(Path::new("/media/clip.mp4"));
        engine.take_events();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let session = engine.session;
        engine.handle_notification(Notification {
            session,
            event: PlaybackEvent::Loaded {
                info: MediaInfo {
                    duration_ms: 90_000,
                    has_video: true,
                    has_audio: true,
                },
                commands: PlaybackCommands::new(tx),
            },
        });

        assert_eq!(engine.duration(), 90_000);
        assert_eq!(
            engine.take_events(),
            vec![
                EngineEvent::DurationChanged(90_000),
                EngineEvent::MediaStatusChanged(MediaStatus::Loaded),
            ]
        );
        assert_eq!(
            rx.try_recv().ok(),
            Some(SessionCommand::SetVolume(Volume::new(0.3)))
        );
        assert_eq!(rx.try_recv().ok(), Some(SessionCommand::SetMuted(true)));
    }

    #[test]
    fn play_while_loading_is_applied_once_loaded() {
        let mut engine = FfmpegEngine::default();
        engine.set_source(Path::new("/media/clip.mp4"));
        engine.play();
        assert_eq!(engine.playback_state(), PlaybackState::Playing);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = engine.session;
        engine.handle_notification(Notification {
            session,
            event: PlaybackEvent::Loaded {
                info: MediaInfo {
                    duration_ms: 1_000,
                    has_video: true,
                    has_audio: false,
                },
                commands: PlaybackCommands::new(tx),
            },
        });

        let mut sent = Vec::new();
        while let Ok(command) = rx.try_recv() {
            sent.push(command);
        }
        assert!(sent.contains(&SessionCommand::Play));
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn seek_reads_back_requested_position() {
        let mut h = loaded(120_000, true, true);

        for target in [0, 1, 59_999, 60_000, 120_000] {
            h.engine.set_position(target);
            assert_eq!(h.engine.position(), target);
            assert!(h.sent().contains(&SessionCommand::Seek {
                target_secs: target as f64 / 1000.0
            }));

            h.notify(PlaybackEvent::Seeked(StreamKind::Video));
            h.notify(PlaybackEvent::Seeked(StreamKind::Audio));
            h.notify(PlaybackEvent::Frame(frame_at(target + 17)));
            assert_eq!(h.engine.position(), target);
        }
    }

    #[test]
    fn paused_seek_between_frames_keeps_requested_position() {
        let mut h = loaded(60_000, true, false);
        h.engine.set_position(1_234);
        h.engine.take_events();

        h.notify(PlaybackEvent::Seeked(StreamKind::Video));
        h.notify(PlaybackEvent::Frame(frame_at(1_234 + 33)));

        assert_eq!(h.engine.position(), 1_234);
        let events = h.engine.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], EngineEvent::FrameReady(_)));
    }

    #[test]
    fn seek_beyond_duration_is_clamped() {
        let mut h = loaded(10_000, true, false);
        h.engine.set_position(50_000);
        assert_eq!(h.engine.position(), 10_000);
    }

    #[test]
    fn frames_before_seek_ack_are_dropped() {
        let mut h = loaded(60_000, true, false);
        h.engine.play();
        h.engine.set_position(30_000);
        h.engine.take_events();

        h.notify(PlaybackEvent::Frame(frame_at(1_000)));
        assert_eq!(h.engine.position(), 30_000);
        assert!(h.engine.take_events().is_empty());

        h.notify(PlaybackEvent::Seeked(StreamKind::Video));
        h.notify(PlaybackEvent::Frame(frame_at(30_040)));
        assert_eq!(h.engine.position(), 30_040);
    }

    #[test]
    fn audio_clock_drives_audio_only_media() {
        let mut h = loaded(60_000, false, true);
        h.engine.play();
        h.notify(PlaybackEvent::AudioClock(2.5));
        assert_eq!(h.engine.position(), 2_500);
    }

    #[test]
    fn audio_clock_ignored_when_video_present() {
        let mut h = loaded(60_000, true, true);
        h.notify(PlaybackEvent::AudioClock(2.5));
        assert_eq!(h.engine.position(), 0);
    }

    #[test]
    fn pause_and_stop_transitions() {
        let mut h = loaded(60_000, true, false);
        h.engine.play();
        h.notify(PlaybackEvent::Frame(frame_at(5_000)));
        h.engine.pause();
        assert_eq!(h.engine.playback_state(), PlaybackState::Paused);
        assert_eq!(h.engine.position(), 5_000);

        h.engine.stop();
        assert_eq!(h.engine.playback_state(), PlaybackState::Stopped);
        assert_eq!(h.engine.position(), 0);
        let sent = h.sent();
        assert!(sent.contains(&SessionCommand::Pause));
        assert!(sent.contains(&SessionCommand::Seek { target_secs: 0.0 }));
    }

    #[test]
    fn stop_rewinds_after_seek_while_stopped() {
        let mut h = loaded(60_000, true, false);
        h.engine.set_position(50_000);
        h.sent();

        h.engine.stop();

        assert_eq!(h.engine.position(), 0);
        assert_eq!(h.engine.playback_state(), PlaybackState::Stopped);
        assert_eq!(h.sent(), vec![SessionCommand::Seek { target_secs: 0.0 }]);
    }

    #[test]
    fn stop_at_end_of_media_rewinds() {
        let mut h = loaded(8_000, true, false);
        h.engine.play();
        h.notify(PlaybackEvent::EndOfStream(StreamKind::Video));
        h.sent();
        h.engine.take_events();

        h.engine.stop();

        assert_eq!(h.engine.position(), 0);
        assert_eq!(h.engine.media_status(), MediaStatus::Loaded);
        assert_eq!(h.sent(), vec![SessionCommand::Seek { target_secs: 0.0 }]);
        assert_eq!(
            h.engine.take_events(),
            vec![
                EngineEvent::MediaStatusChanged(MediaStatus::Loaded),
                EngineEvent::PositionChanged(0),
            ]
        );
    }

    #[test]
    fn stop_without_media_does_nothing() {
        let mut engine = FfmpegEngine::default();
        engine.stop();
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn end_of_media_waits_for_every_stream() {
        let mut h = loaded(8_000, true, true);
        h.engine.play();
        h.engine.take_events();

        h.notify(PlaybackEvent::EndOfStream(StreamKind::Video));
        assert_eq!(h.engine.playback_state(), PlaybackState::Playing);

        h.notify(PlaybackEvent::EndOfStream(StreamKind::Audio));
        assert_eq!(h.engine.playback_state(), PlaybackState::Stopped);
        assert_eq!(h.engine.media_status(), MediaStatus::EndOfMedia);
        assert_eq!(h.engine.position(), 8_000);
    }

    #[test]
    fn play_after_end_restarts_from_zero() {
        let mut h = loaded(8_000, true, false);
        h.engine.play();
        h.notify(PlaybackEvent::EndOfStream(StreamKind::Video));
        h.sent();

        h.engine.play();
        assert_eq!(h.engine.position(), 0);
        assert_eq!(h.engine.playback_state(), PlaybackState::Playing);
        let sent = h.sent();
        assert_eq!(
            sent,
            vec![SessionCommand::Seek { target_secs: 0.0 }, SessionCommand::Play]
        );
    }

    #[test]
    fn invalid_media_never_plays() {
        let mut engine = FfmpegEngine::default();
        engine.set_source(Path::new("/media/broken.mp4"));
        engine.take_events();

        let session = engine.session;
        engine.handle_notification(Notification {
            session,
            event: PlaybackEvent::Invalid("Corrupted or invalid media file".into()),
        });
        engine.play();

        assert_eq!(engine.media_status(), MediaStatus::Invalid);
        assert_eq!(engine.playback_state(), PlaybackState::Stopped);
        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::MediaStatusChanged(MediaStatus::Invalid)));
        assert!(events
            .iter()
            .all(|e| *e != EngineEvent::PlaybackStateChanged(PlaybackState::Playing)));
    }

    #[test]
    fn play_requested_while_loading_is_dropped_on_invalid() {
        let mut engine = FfmpegEngine::default();
        engine.set_source(Path::new("/media/broken.mp4"));
        engine.play();

        let session = engine.session;
        engine.handle_notification(Notification {
            session,
            event: PlaybackEvent::Invalid("Unsupported media format".into()),
        });

        assert_eq!(engine.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn events_from_superseded_session_are_ignored() {
        let mut h = loaded(60_000, true, false);
        let old_session = h.engine.session;
        h.engine.set_source(Path::new("/media/next.mkv"));
        h.engine.take_events();

        h.engine.handle_notification(Notification {
            session: old_session,
            event: PlaybackEvent::Frame(frame_at(42_000)),
        });

        assert_eq!(h.engine.position(), 0);
        assert!(h.engine.take_events().is_empty());
    }

    #[test]
    fn runtime_errors_are_classified() {
        let mut h = loaded(60_000, true, false);
        h.notify(PlaybackEvent::Error("Decoder not found for codec".into()));
        let events = h.engine.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], EngineEvent::ErrorOccurred(msg) if !msg.is_empty()));
    }

    #[test]
    fn volume_and_mute_reach_the_session() {
        let mut h = loaded(60_000, false, true);
        h.engine.set_volume(Volume::new(0.8));
        h.engine.set_muted(true);

        assert!(h.engine.is_muted());
        assert_eq!(
            h.sent(),
            vec![
                SessionCommand::SetVolume(Volume::new(0.8)),
                SessionCommand::SetMuted(true)
            ]
        );
    }

    #[test]
    fn shutdown_stops_session() {
        let mut h = loaded(60_000, true, false);
        h.engine.play();
        h.sent();
        h.engine.shutdown();
        assert_eq!(h.sent(), vec![SessionCommand::Stop]);
        assert_eq!(h.engine.playback_state(), PlaybackState::Stopped);
    }
}
