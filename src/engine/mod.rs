// SPDX-License-Identifier: MPL-2.0
//! Media playback engine.
//!
//! The player window talks to playback only through the [`MediaEngine`]
//! trait: commands go in as method calls and return immediately, changes come
//! back out as [`EngineEvent`]s drained with [`MediaEngine::take_events`].
//! [`FfmpegEngine`] is the real implementation; tests substitute their own.

pub mod audio;
pub mod audio_output;
pub mod decoder;
mod ffmpeg;
pub mod subscription;
mod volume;

pub use decoder::VideoFrame;
pub use ffmpeg::FfmpegEngine;
pub use subscription::{Notification, PlaybackCommands, PlaybackEvent, StreamKind};
pub use volume::Volume;

use std::fmt;
use std::path::Path;

/// Playback state as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        f.write_str(name)
    }
}

/// Load lifecycle of the current source, independent of [`PlaybackState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaStatus {
    /// No source set.
    #[default]
    NoMedia,
    /// Source set, probing and decoder start-up in progress.
    Loading,
    /// Ready to play.
    Loaded,
    /// Decoders restarting after play or seek.
    Buffering,
    /// Decoders delivering data.
    Buffered,
    /// Every stream has finished.
    EndOfMedia,
    /// The source cannot be played.
    Invalid,
}

/// Change notification queued by an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PositionChanged(u64),
    DurationChanged(u64),
    PlaybackStateChanged(PlaybackState),
    MediaStatusChanged(MediaStatus),
    ErrorOccurred(String),
    /// A picture for the attached display surface.
    FrameReady(VideoFrame),
}

/// Capabilities the player window needs from a playback engine.
///
/// All positions and durations are in milliseconds. Commands never block and
/// never fail: invalid requests are ignored by the engine.
pub trait MediaEngine {
    /// Replaces the current source. Supersedes any load in progress.
    fn set_source(&mut self, path: &Path);

    fn source(&self) -> Option<&Path>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stops playback and rewinds to the start.
    fn stop(&mut self);

    /// Seeks; the request is clamped to `0..=duration`.
    fn set_position(&mut self, position_ms: u64);

    fn position(&self) -> u64;

    fn duration(&self) -> u64;

    fn playback_state(&self) -> PlaybackState;

    fn media_status(&self) -> MediaStatus;

    fn set_volume(&mut self, volume: Volume);

    fn volume(&self) -> Volume;

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;

    /// Drains notifications queued since the last call, oldest first.
    fn take_events(&mut self) -> Vec<EngineEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_an_empty_player() {
        assert_eq!(PlaybackState::default(), PlaybackState::Stopped);
        assert_eq!(MediaStatus::default(), MediaStatus::NoMedia);
    }

    #[test]
    fn playback_state_display() {
        assert_eq!(PlaybackState::Playing.to_string(), "Playing");
        assert_eq!(PlaybackState::Paused.to_string(), "Paused");
        assert_eq!(PlaybackState::Stopped.to_string(), "Stopped");
    }
}
