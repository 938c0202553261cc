// SPDX-License-Identifier: MPL-2.0
//! Progress slider style.

use crate::ui::design_tokens::{palette, radius, sizing};
use iced::widget::slider;
use iced::{Background, Border, Color, Theme};

/// Accent handle on a dark rail; the played part of the rail is accented.
pub fn progress(_theme: &Theme, status: slider::Status) -> slider::Style {
    let handle = match status {
        slider::Status::Hovered | slider::Status::Dragged => Color {
            a: 0.85,
            ..palette::ACCENT
        },
        slider::Status::Active => palette::ACCENT,
    };

    slider::Style {
        rail: slider::Rail {
            backgrounds: (
                Background::Color(palette::ACCENT),
                Background::Color(palette::GRAY_BORDER),
            ),
            width: sizing::SLIDER_RAIL_WIDTH,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: radius::SM.into(),
            },
        },
        handle: slider::Handle {
            shape: slider::HandleShape::Circle {
                radius: sizing::SLIDER_HANDLE_RADIUS,
            },
            background: Background::Color(handle),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
        },
    }
}
