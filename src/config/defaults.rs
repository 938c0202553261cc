// SPDX-License-Identifier: MPL-2.0
//! Default values for every setting.
//!
//! Grouped by the `settings.toml` section that uses them.

// ==========================================================================
// Playback
// ==========================================================================

/// Initial audio volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

// ==========================================================================
// Window
// ==========================================================================

/// Default window width in logical pixels.
pub const DEFAULT_WINDOW_WIDTH: u32 = 960;

/// Default window height in logical pixels.
pub const DEFAULT_WINDOW_HEIGHT: u32 = 640;

/// Smallest size the video area may shrink to while windowed.
pub const MIN_VIDEO_WIDTH: u32 = 400;
pub const MIN_VIDEO_HEIGHT: u32 = 300;

/// The window must fit the video area plus the control bars.
pub const MIN_WINDOW_WIDTH: u32 = MIN_VIDEO_WIDTH + 40;
pub const MIN_WINDOW_HEIGHT: u32 = MIN_VIDEO_HEIGHT + 120;

// ==========================================================================
// Engine
// ==========================================================================

/// Video frames skipped at most while landing a seek on its exact target.
pub const MAX_SEEK_SKIP_FRAMES: u32 = 1000;

/// Audio is queued this far ahead of its presentation time.
pub const AUDIO_LOOKAHEAD_SECS: f64 = 0.2;

// ==========================================================================
// Compile-time validation
// ==========================================================================

const _: () = {
    assert!(MIN_VOLUME >= 0.0);
    assert!(MAX_VOLUME > MIN_VOLUME);
    assert!(DEFAULT_VOLUME >= MIN_VOLUME);
    assert!(DEFAULT_VOLUME <= MAX_VOLUME);

    assert!(DEFAULT_WINDOW_WIDTH >= MIN_WINDOW_WIDTH);
    assert!(DEFAULT_WINDOW_HEIGHT >= MIN_WINDOW_HEIGHT);

    assert!(MAX_SEEK_SKIP_FRAMES > 0);
    assert!(AUDIO_LOOKAHEAD_SECS > 0.0);
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn default_volume_is_half() {
        assert_abs_diff_eq!(DEFAULT_VOLUME, 0.5);
    }

    #[test]
    fn window_leaves_room_for_controls() {
        assert!(MIN_WINDOW_HEIGHT > MIN_VIDEO_HEIGHT);
        assert!(MIN_WINDOW_WIDTH > MIN_VIDEO_WIDTH);
    }
}
