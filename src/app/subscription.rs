// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Routes native window and keyboard events to the player, and runs the
//! playback session of the current source.

use super::Message;
use crate::engine::FfmpegEngine;
use crate::window as player;
use iced::{event, keyboard, Subscription};

/// Keyboard and window events.
///
/// Keys already consumed by a widget (status `Captured`) are not forwarded.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| match event {
        event::Event::Window(iced::window::Event::CloseRequested) => {
            Some(Message::WindowCloseRequested(window_id))
        }
        event::Event::Window(iced::window::Event::Opened { .. }) => {
            Some(Message::WindowOpened(window_id))
        }
        event::Event::Window(iced::window::Event::Resized(_)) => {
            Some(Message::WindowResized(window_id))
        }
        event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => match status {
            event::Status::Ignored => Some(Message::Player(player::Message::KeyPressed(key))),
            event::Status::Captured => None,
        },
        _ => None,
    })
}

/// Decoder output for the engine's current source.
pub fn create_playback_subscription(engine: &FfmpegEngine) -> Subscription<Message> {
    engine.subscription().map(Message::Playback)
}
