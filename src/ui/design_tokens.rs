// SPDX-License-Identifier: MPL-2.0
//! Design tokens for the player's dark look.
//!
//! - **Palette**: Base colors
//! - **Spacing**: Spacing scale
//! - **Sizing**: Component sizes
//! - **Typography**: Font sizes
//! - **Radius**: Border radii

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;

    /// Window background.
    pub const BACKGROUND: Color = Color::from_rgb8(0x2d, 0x2d, 0x2d);

    /// Border around the video area and unfilled slider rail.
    pub const GRAY_BORDER: Color = Color::from_rgb8(0x44, 0x44, 0x44);

    pub const BUTTON: Color = Color::from_rgb8(0x3a, 0x3a, 0x3a);
    pub const BUTTON_HOVER: Color = Color::from_rgb8(0x4a, 0x4a, 0x4a);
    pub const BUTTON_PRESSED: Color = Color::from_rgb8(0x2a, 0x2a, 0x2a);

    /// Slider handle and played part of the rail.
    pub const ACCENT: Color = Color::from_rgb8(0x1a, 0xbc, 0x9c);

    /// Elapsed / total readout.
    pub const TIME_TEXT: Color = Color::from_rgb8(0xaa, 0xaa, 0xaa);

    /// File name label.
    pub const FILE_TEXT: Color = Color::from_rgb8(0xdd, 0xdd, 0xdd);
}

// ============================================================================
// Spacing Scale
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
}

// ============================================================================
// Sizing
// ============================================================================

pub mod sizing {
    pub const ICON_MD: f32 = 20.0;
    pub const BUTTON_SIZE: f32 = 36.0;
    pub const SLIDER_HANDLE_RADIUS: f32 = 7.0;
    pub const SLIDER_RAIL_WIDTH: f32 = 6.0;
    pub const VIDEO_BORDER: f32 = 1.0;
}

pub mod typography {
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

pub mod radius {
    pub const SM: f32 = 3.0;
    pub const MD: f32 = 4.0;
}

const _: () = {
    assert!(spacing::XS > spacing::XXS);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(sizing::BUTTON_SIZE > sizing::ICON_MD);
    assert!(sizing::SLIDER_HANDLE_RADIUS * 2.0 > sizing::SLIDER_RAIL_WIDTH);
    assert!(typography::BODY > typography::CAPTION);
};
