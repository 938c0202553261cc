// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::Message;
use crate::engine::MediaEngine;
use crate::ui::design_tokens::spacing;
use crate::ui::{controls, styles, VideoSurface};
use crate::window::PlayerWindow;
use iced::widget::{column, container};
use iced::{Element, Length};

/// Video above the control bar; fullscreen shows the video alone.
pub fn view<E: MediaEngine>(player: &PlayerWindow<E, VideoSurface>) -> Element<'_, Message> {
    let state = player.state();
    let video = player.surface().view();

    let content: Element<'_, _> = if state.fullscreen {
        video
    } else {
        container(column![video, controls::view(state)].spacing(spacing::XS))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(spacing::SM)
            .style(styles::container::window)
            .into()
    };

    content.map(Message::Player)
}
