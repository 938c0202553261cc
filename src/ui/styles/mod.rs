// SPDX-License-Identifier: MPL-2.0
//! Widget styles for the player window.

pub mod button;
pub mod container;
pub mod slider;

use crate::ui::design_tokens::palette;
use iced::widget::text;
use iced::Theme;

/// Elapsed / total readout.
pub fn time_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(palette::TIME_TEXT),
    }
}

/// File name or error label.
pub fn file_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(palette::FILE_TEXT),
    }
}
