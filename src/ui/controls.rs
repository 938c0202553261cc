// SPDX-License-Identifier: MPL-2.0
//! Player control bar.
//!
//! Two rows under the video: the progress slider with the time readout, then
//! the transport buttons and the file label.

use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::{icons, styles};
use crate::window::{DisplayState, Message, PlayIcon};
use iced::widget::{button, column, container, row, slider, text, tooltip, Space, Text};
use iced::{Alignment, Element, Length};

/// Slider step in milliseconds.
const SLIDER_STEP_MS: f64 = 1.0;

/// Renders the control bar for the current display state.
#[allow(clippy::cast_precision_loss)]
pub fn view(state: &DisplayState) -> Element<'_, Message> {
    let progress = slider(
        0.0..=state.slider.max as f64,
        state.slider.value as f64,
        slider_message,
    )
    .on_release(Message::SeekCommit)
    .step(SLIDER_STEP_MS)
    .width(Length::Fill)
    .style(styles::slider::progress);

    let time = text(&state.time_label)
        .size(typography::CAPTION)
        .style(styles::time_text);

    let progress_row = row![progress, time]
        .spacing(spacing::SM)
        .align_y(Alignment::Center);

    let (play_icon, play_tip) = match state.play_icon {
        PlayIcon::Play => (icons::play(), "Play"),
        PlayIcon::Pause => (icons::pause(), "Pause"),
    };
    let (volume_icon, volume_tip) = if state.muted {
        (icons::volume_off(), "Unmute")
    } else {
        (icons::volume_on(), "Mute")
    };
    let (fullscreen_icon, fullscreen_tip) = if state.fullscreen {
        (icons::fullscreen_exit(), "Exit fullscreen")
    } else {
        (icons::fullscreen(), "Fullscreen")
    };

    let file_label = text(&state.file_label)
        .size(typography::BODY)
        .font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        })
        .style(styles::file_text);

    let buttons = row![
        control_button(icons::skip_previous(), "Jump to start", Message::JumpToStart),
        control_button(play_icon, play_tip, Message::TogglePlayback),
        control_button(icons::stop(), "Stop", Message::Stop),
        control_button(icons::skip_next(), "Jump to end", Message::JumpToEnd),
        control_button(volume_icon, volume_tip, Message::ToggleMute),
        control_button(icons::folder_open(), "Open file", Message::OpenFile),
        file_label,
        Space::new().width(Length::Fill),
        control_button(fullscreen_icon, fullscreen_tip, Message::ToggleFullscreen),
    ]
    .spacing(spacing::XS)
    .align_y(Alignment::Center);

    container(column![progress_row, buttons].spacing(spacing::XS))
        .width(Length::Fill)
        .padding([spacing::XS, 0.0])
        .into()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn slider_message(value: f64) -> Message {
    Message::SeekPreview(value.max(0.0).round() as u64)
}

fn control_button<'a>(
    icon: iced::widget::Svg<'a>,
    tip: &'a str,
    message: Message,
) -> Element<'a, Message> {
    let content = button(icon)
        .on_press(message)
        .padding(spacing::XS)
        .width(Length::Fixed(sizing::BUTTON_SIZE))
        .height(Length::Fixed(sizing::BUTTON_SIZE))
        .style(styles::button::control);

    tooltip(content, Text::new(tip), tooltip::Position::Top)
        .gap(spacing::XXS)
        .into()
}
