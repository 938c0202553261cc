// SPDX-License-Identifier: MPL-2.0
//! Iced subscription running one playback session.
//!
//! A session owns the decoder threads and the audio device for one source.
//! It probes the file, starts the decoders, hands the engine a
//! [`PlaybackCommands`] handle, then forwards decoder output as
//! [`Notification`]s until the engine drops the handle or sends `Stop`.
//!
//! Audio is optional: files without audio, or machines without a usable
//! output device, play video only.

use super::audio::{AudioDecoder, AudioDecoderEvent};
use super::audio_output::{AudioOutput, AudioOutputConfig};
use super::decoder::{DecoderCommand, DecoderEvent, VideoDecoder, VideoFrame};
use super::Volume;
use crate::error::MediaError;
use crate::media::{self, MediaInfo};
use iced::futures::channel::mpsc as iced_mpsc;
use iced::futures::SinkExt;
use iced::stream;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Format used when no output device exists; samples are decoded for the
/// clock and then discarded.
const FALLBACK_AUDIO_CONFIG: AudioOutputConfig = AudioOutputConfig {
    sample_rate: 48_000,
    channels: 2,
};

/// Identity of a playback session. A new id restarts the subscription even
/// for the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackSession {
    pub path: PathBuf,
    pub id: u64,
}

/// Which decoder an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
}

/// Something that happened in a session.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// Decoders are up; commands may be sent.
    Loaded {
        info: MediaInfo,
        commands: PlaybackCommands,
    },

    /// The file cannot be played.
    Invalid(String),

    /// A video frame is due on screen.
    Frame(VideoFrame),

    /// Audio reached this presentation time (seconds).
    AudioClock(f64),

    /// Video decoding restarted after play or seek.
    Buffering,

    /// A decoder applied a seek; its later events are post-seek.
    Seeked(StreamKind),

    EndOfStream(StreamKind),

    /// Non-fatal runtime failure.
    Error(String),
}

/// Event tagged with the session it belongs to, so late events from a
/// superseded session can be told apart.
#[derive(Debug, Clone)]
pub struct Notification {
    pub session: u64,
    pub event: PlaybackEvent,
}

/// Commands accepted by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Play,
    Pause,
    Seek { target_secs: f64 },
    SetVolume(Volume),
    SetMuted(bool),
    Stop,
}

/// Cloneable handle for sending commands to a session.
#[derive(Clone)]
pub struct PlaybackCommands {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl PlaybackCommands {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self { tx }
    }

    /// Sends a command; fails only once the session has ended.
    pub fn send(&self, command: SessionCommand) -> Result<(), String> {
        self.tx
            .send(command)
            .map_err(|_| "Playback session not running".to_string())
    }
}

impl std::fmt::Debug for PlaybackCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCommands")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Subscription for one playback session.
pub fn playback(session: PlaybackSession) -> iced::Subscription<Notification> {
    iced::Subscription::run_with(session, |session| {
        let session = session.clone();
        stream::channel(100, move |output| run_session(session, output))
    })
}

async fn run_session(session: PlaybackSession, mut output: iced_mpsc::Sender<Notification>) {
    let id = session.id;
    let path = session.path;

    let probe_path = path.clone();
    let mut info = match tokio::task::spawn_blocking(move || media::probe(&probe_path)).await {
        Ok(Ok(info)) => info,
        Ok(Err(e)) => {
            log::warn!("Cannot play {}: {e}", path.display());
            let _ = output
                .send(Notification {
                    session: id,
                    event: PlaybackEvent::Invalid(e.to_string()),
                })
                .await;
            return;
        }
        Err(e) => {
            log::error!("Probe task failed: {e}");
            let _ = output
                .send(Notification {
                    session: id,
                    event: PlaybackEvent::Invalid(e.to_string()),
                })
                .await;
            return;
        }
    };
    log::debug!(
        "Probed {}: {} ms, video={}, audio={}",
        path.display(),
        info.duration_ms,
        info.has_video,
        info.has_audio
    );

    let mut video = if info.has_video {
        match VideoDecoder::new(&path) {
            Ok(decoder) => Some(decoder),
            Err(e) => {
                let _ = output
                    .send(Notification {
                        session: id,
                        event: PlaybackEvent::Invalid(e.to_string()),
                    })
                    .await;
                return;
            }
        }
    } else {
        None
    };

    let audio_output = if info.has_audio {
        match AudioOutput::new(Volume::default(), false) {
            Ok(out) => Some(out),
            Err(e) => {
                log::warn!("Audio output unavailable, playing silently: {e}");
                None
            }
        }
    } else {
        None
    };

    let mut audio = if info.has_audio {
        let config = audio_output
            .as_ref()
            .map_or(FALLBACK_AUDIO_CONFIG, AudioOutput::config);
        match AudioDecoder::new(&path, config) {
            Ok(decoder) => Some(decoder),
            Err(e) => {
                log::warn!("Audio decoder failed: {e}");
                None
            }
        }
    } else {
        None
    };

    // The engine waits on every stream it is told about
    info.has_audio = audio.is_some();
    if video.is_none() && audio.is_none() {
        let _ = output
            .send(Notification {
                session: id,
                event: PlaybackEvent::Invalid(MediaError::NoPlayableStream.to_string()),
            })
            .await;
        return;
    }

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let _ = output
        .send(Notification {
            session: id,
            event: PlaybackEvent::Loaded {
                info,
                commands: PlaybackCommands::new(command_tx),
            },
        })
        .await;

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                // A dropped handle ends the session like an explicit stop
                let command = command.unwrap_or(SessionCommand::Stop);
                let stop = command == SessionCommand::Stop;
                forward_command(command, video.as_ref(), audio.as_ref(), audio_output.as_ref());
                if stop {
                    break;
                }
            }

            event = next_video_event(&mut video) => {
                let Some(event) = event else {
                    video = None;
                    continue;
                };
                let event = match event {
                    DecoderEvent::FrameReady(frame) => PlaybackEvent::Frame(frame),
                    DecoderEvent::Buffering => PlaybackEvent::Buffering,
                    DecoderEvent::Seeked { .. } => PlaybackEvent::Seeked(StreamKind::Video),
                    DecoderEvent::EndOfStream => PlaybackEvent::EndOfStream(StreamKind::Video),
                    DecoderEvent::Error(message) => PlaybackEvent::Error(message),
                };
                if output.send(Notification { session: id, event }).await.is_err() {
                    break;
                }
            }

            event = next_audio_event(&mut audio) => {
                let Some(event) = event else {
                    audio = None;
                    continue;
                };
                let event = match event {
                    AudioDecoderEvent::BufferReady(buffer) => {
                        if let Some(out) = &audio_output {
                            if let Err(e) = out.play(buffer.samples) {
                                log::warn!("Dropping audio buffer: {e}");
                            }
                        }
                        PlaybackEvent::AudioClock(buffer.pts_secs)
                    }
                    AudioDecoderEvent::Seeked { .. } => PlaybackEvent::Seeked(StreamKind::Audio),
                    AudioDecoderEvent::EndOfStream => PlaybackEvent::EndOfStream(StreamKind::Audio),
                    AudioDecoderEvent::Error(message) => PlaybackEvent::Error(message),
                };
                if output.send(Notification { session: id, event }).await.is_err() {
                    break;
                }
            }
        }
    }

    log::debug!("Playback session {id} ended");
}

fn forward_command(
    command: SessionCommand,
    video: Option<&VideoDecoder>,
    audio: Option<&AudioDecoder>,
    audio_output: Option<&AudioOutput>,
) {
    let decoder_command = match &command {
        SessionCommand::Play => Some(DecoderCommand::Play),
        SessionCommand::Pause => Some(DecoderCommand::Pause),
        SessionCommand::Seek { target_secs } => Some(DecoderCommand::Seek {
            target_secs: *target_secs,
        }),
        SessionCommand::Stop => Some(DecoderCommand::Stop),
        SessionCommand::SetVolume(_) | SessionCommand::SetMuted(_) => None,
    };

    if let Some(decoder_command) = decoder_command {
        if let Some(video) = video {
            if let Err(e) = video.send_command(decoder_command.clone()) {
                log::debug!("{e}");
            }
        }
        if let Some(audio) = audio {
            if let Err(e) = audio.send_command(decoder_command) {
                log::debug!("{e}");
            }
        }
    }

    let Some(out) = audio_output else {
        return;
    };
    let result = match command {
        SessionCommand::Play => out.resume(),
        SessionCommand::Pause => out.pause(),
        SessionCommand::Seek { .. } => out.clear_buffer(),
        SessionCommand::SetVolume(volume) => out.set_volume(volume),
        SessionCommand::SetMuted(muted) => out.set_muted(muted),
        SessionCommand::Stop => out.stop(),
    };
    if let Err(e) = result {
        log::debug!("{e}");
    }
}

async fn next_video_event(decoder: &mut Option<VideoDecoder>) -> Option<DecoderEvent> {
    match decoder {
        Some(decoder) => decoder.recv_event().await,
        None => std::future::pending().await,
    }
}

async fn next_audio_event(decoder: &mut Option<AudioDecoder>) -> Option<AudioDecoderEvent> {
    match decoder {
        Some(decoder) => decoder.recv_event().await,
        None => std::future::pending().await,
    }
}
