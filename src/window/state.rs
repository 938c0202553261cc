// SPDX-License-Identifier: MPL-2.0
//! Display state of the player window, kept apart from any widget.
//!
//! Every method here is a pure state transition so the window's behavior can
//! be checked without a running UI.

use crate::engine::PlaybackState;

/// Label shown before any file is opened.
pub const NO_MEDIA_LABEL: &str = "No media loaded";

/// Label shown when the engine rejects the file.
pub const INVALID_MEDIA_LABEL: &str = "Invalid media file";

/// Above this many milliseconds times are rendered with an hour field.
const HOUR_FORMAT_THRESHOLD_MS: u64 = 3_600_000;

/// Which glyph the play/pause button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayIcon {
    #[default]
    Play,
    Pause,
}

impl PlayIcon {
    /// Icon matching an engine state: pause while playing, play otherwise.
    #[must_use]
    pub fn for_state(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => Self::Pause,
            PlaybackState::Stopped | PlaybackState::Paused => Self::Play,
        }
    }
}

/// Progress slider model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliderState {
    pub value: u64,
    pub max: u64,
    /// The user holds the handle; engine positions must not move it.
    pub dragging: bool,
}

/// Everything the window draws besides the video itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub slider: SliderState,
    pub play_icon: PlayIcon,
    pub time_label: String,
    pub file_label: String,
    pub muted: bool,
    pub fullscreen: bool,
    position_ms: u64,
    duration_ms: u64,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            slider: SliderState::default(),
            play_icon: PlayIcon::Play,
            time_label: time_label(0, 0),
            file_label: NO_MEDIA_LABEL.to_string(),
            muted: false,
            fullscreen: false,
            position_ms: 0,
            duration_ms: 0,
        }
    }
}

impl DisplayState {
    /// Engine reported a new playback position.
    ///
    /// The label always follows the engine; the slider holds still while the
    /// user drags it.
    pub fn on_position_changed(&mut self, position_ms: u64) {
        self.position_ms = position_ms;
        self.time_label = time_label(position_ms, self.duration_ms);
        if !self.slider.dragging {
            self.slider.value = position_ms;
        }
    }

    /// Engine reported the duration of the loaded media.
    pub fn on_duration_changed(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.slider.max = duration_ms;
        self.slider.value = self.slider.value.min(duration_ms);
        self.time_label = time_label(0, duration_ms);
    }

    /// The user moves the slider handle. Moves the handle without seeking.
    pub fn on_slider_moved(&mut self, position_ms: u64) {
        self.slider.dragging = true;
        self.slider.value = position_ms.min(self.slider.max);
    }

    /// The user lets go of the slider. Returns the position to seek to.
    pub fn on_slider_released(&mut self) -> u64 {
        self.slider.dragging = false;
        self.slider.value
    }

    /// A new file was chosen; shows its name and rewinds the readouts.
    pub fn on_file_opened(&mut self, name: String) {
        self.file_label = name;
        self.play_icon = PlayIcon::Play;
    }

    pub fn on_error(&mut self, message: &str) {
        self.file_label = format!("Error: {message}");
    }

    pub fn on_invalid_media(&mut self) {
        self.file_label = INVALID_MEDIA_LABEL.to_string();
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.position_ms
    }

    #[must_use]
    pub fn duration(&self) -> u64 {
        self.duration_ms
    }
}

/// Renders milliseconds as `mm:ss`, or `hh:mm:ss` past one hour.
///
/// Minutes are not wrapped below the threshold, so exactly one hour is
/// `60:00`.
#[must_use]
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    if ms > HOUR_FORMAT_THRESHOLD_MS {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        format!("{hours:02}:{mins:02}:{secs:02}")
    } else {
        format!("{:02}:{secs:02}", total_secs / 60)
    }
}

fn time_label(position_ms: u64, duration_ms: u64) -> String {
    format!("{} / {}", format_time(position_ms), format_time(duration_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_examples() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65_000), "01:05");
        assert_eq!(format_time(3_600_000), "60:00");
        assert_eq!(format_time(3_600_001), "01:00:00");
        assert_eq!(format_time(3_725_000), "01:02:05");
    }

    #[test]
    fn format_time_truncates_partial_seconds() {
        assert_eq!(format_time(999), "00:00");
        assert_eq!(format_time(59_999), "00:59");
    }

    #[test]
    fn initial_labels() {
        let state = DisplayState::default();
        assert_eq!(state.time_label, "00:00 / 00:00");
        assert_eq!(state.file_label, NO_MEDIA_LABEL);
        assert_eq!(state.play_icon, PlayIcon::Play);
    }

    #[test]
    fn position_updates_slider_and_label() {
        let mut state = DisplayState::default();
        state.on_duration_changed(120_000);
        state.on_position_changed(65_000);

        assert_eq!(state.slider.value, 65_000);
        assert_eq!(state.slider.max, 120_000);
        assert_eq!(state.time_label, "01:05 / 02:00");
    }

    #[test]
    fn drag_suppresses_position_updates_until_release() {
        let mut state = DisplayState::default();
        state.on_duration_changed(100_000);
        state.on_slider_moved(40_000);

        state.on_position_changed(1_000);
        state.on_position_changed(65_000);
        assert_eq!(state.slider.value, 40_000);
        assert_eq!(state.time_label, "01:05 / 01:40");

        assert_eq!(state.on_slider_released(), 40_000);
        state.on_position_changed(40_040);
        assert_eq!(state.slider.value, 40_040);
    }

    #[test]
    fn new_duration_resets_time_label() {
        let mut state = DisplayState::default();
        state.on_duration_changed(100_000);
        state.on_position_changed(42_000);

        state.on_duration_changed(200_000);
        assert_eq!(state.time_label, "00:00 / 03:20");
    }

    #[test]
    fn slider_preview_is_clamped_to_range() {
        let mut state = DisplayState::default();
        state.on_duration_changed(10_000);
        state.on_slider_moved(50_000);
        assert_eq!(state.slider.value, 10_000);
    }

    #[test]
    fn shorter_duration_pulls_slider_back() {
        let mut state = DisplayState::default();
        state.on_duration_changed(100_000);
        state.on_position_changed(90_000);
        state.on_duration_changed(30_000);
        assert_eq!(state.slider.value, 30_000);
    }

    #[test]
    fn error_and_invalid_labels() {
        let mut state = DisplayState::default();
        state.on_error("Unsupported codec: hevc");
        assert_eq!(state.file_label, "Error: Unsupported codec: hevc");

        state.on_invalid_media();
        assert_eq!(state.file_label, INVALID_MEDIA_LABEL);
    }

    #[test]
    fn icon_follows_engine_state() {
        assert_eq!(PlayIcon::for_state(PlaybackState::Playing), PlayIcon::Pause);
        assert_eq!(PlayIcon::for_state(PlaybackState::Paused), PlayIcon::Play);
        assert_eq!(PlayIcon::for_state(PlaybackState::Stopped), PlayIcon::Play);
    }
}
