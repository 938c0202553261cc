// SPDX-License-Identifier: MPL-2.0
//! Volume domain type for audio playback.

use crate::config::{DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME};

/// Volume level, guaranteed to be within 0.0–1.0.
///
/// # Example
///
/// ```
/// use smart_player::engine::Volume;
///
/// let vol = Volume::new(0.5);
/// assert_eq!(vol.value(), 0.5);
///
/// // Values outside range are clamped
/// let too_loud = Volume::new(2.0);
/// assert_eq!(too_loud.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a new volume level, clamping to valid range.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_nan() {
            return Self::default();
        }
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    /// Returns the volume value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Gain applied to samples.
    ///
    /// Squared so that the slider feels linear to the ear: 50% on the
    /// control is 25% amplitude (about -12 dB).
    #[must_use]
    pub fn gain(self) -> f32 {
        self.0 * self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn new_clamps_to_valid_range() {
        assert_abs_diff_eq!(Volume::new(-0.5).value(), MIN_VOLUME);
        assert_abs_diff_eq!(Volume::new(1.5).value(), MAX_VOLUME);
        assert_abs_diff_eq!(Volume::new(0.5).value(), 0.5);
    }

    #[test]
    fn nan_falls_back_to_default() {
        assert_abs_diff_eq!(Volume::new(f32::NAN).value(), DEFAULT_VOLUME);
    }

    #[test]
    fn gain_is_perceptual() {
        assert_abs_diff_eq!(Volume::new(0.5).gain(), 0.25);
        assert_abs_diff_eq!(Volume::new(1.0).gain(), 1.0);
        assert_abs_diff_eq!(Volume::new(0.0).gain(), 0.0);
    }
}
