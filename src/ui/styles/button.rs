// SPDX-License-Identifier: MPL-2.0
//! Control bar button styles.

use crate::ui::design_tokens::{palette, radius};
use iced::widget::button;
use iced::{Background, Border, Theme};

/// Flat dark button with white content.
pub fn control(_theme: &Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered => palette::BUTTON_HOVER,
        button::Status::Pressed => palette::BUTTON_PRESSED,
        button::Status::Active | button::Status::Disabled => palette::BUTTON,
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: palette::WHITE,
        border: Border {
            color: palette::BUTTON,
            width: 0.0,
            radius: radius::MD.into(),
        },
        shadow: iced::Shadow::default(),
        snap: true,
    }
}
