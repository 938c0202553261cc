// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{palette, sizing};
use iced::widget::container;
use iced::{Background, Border, Theme};

/// Whole-window background.
pub fn window(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BACKGROUND)),
        text_color: Some(palette::WHITE),
        ..Default::default()
    }
}

/// Black video area with a thin border in windowed mode.
pub fn video(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BLACK)),
        border: Border {
            color: palette::GRAY_BORDER,
            width: sizing::VIDEO_BORDER,
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}

/// Borderless black background for fullscreen video.
pub fn video_fullscreen(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::BLACK)),
        ..Default::default()
    }
}
