// SPDX-License-Identifier: MPL-2.0
//! Application root: hosts the player window inside the iced runtime.
//!
//! The `App` struct owns a [`PlayerWindow`] wired to the FFmpeg engine and the
//! image-based video surface, and performs the side effects the window asks
//! for (file dialog, window mode) as iced tasks.

mod message;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::config::{self, Config};
use crate::engine::FfmpegEngine;
use crate::ui::VideoSurface;
use crate::window::{self as player, PlayerWindow};
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

pub const WINDOW_TITLE: &str = "Smart Media Player";

/// Root iced application state.
pub struct App {
    player: PlayerWindow<FfmpegEngine, VideoSurface>,
    window_id: Option<window::Id>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("source", &self.player.engine().source())
            .field("fullscreen", &self.player.state().fullscreen)
            .finish()
    }
}

/// Builds the window settings from the loaded configuration.
#[allow(clippy::cast_precision_loss)]
pub fn window_settings(config: &Config) -> window::Settings {
    let (width, height) = config.window_size();
    window::Settings {
        size: iced::Size::new(width as f32, height as f32),
        min_size: Some(iced::Size::new(
            config::MIN_WINDOW_WIDTH as f32,
            config::MIN_WINDOW_HEIGHT as f32,
        )),
        // Close goes through the app so the engine is stopped first
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    let settings = window_settings(&flags.config);

    // iced 0.14 requires a Fn boot closure; flags are consumed on first call
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(settings)
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Creates the player window from the configuration and opens the
    /// startup file, if any.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = flags.config;
        let engine = FfmpegEngine::new(config.volume(), config.playback.muted);
        let player = PlayerWindow::new(engine, VideoSurface::new())
            .with_dialog_start_dir(config.dialog_start_dir())
            .with_autoplay(config.playback.autoplay);

        let mut app = App {
            player,
            window_id: None,
        };

        if let Some(path) = flags.file {
            // Opening never asks for a side effect
            let _ = app.player.update(player::Message::FileSelected(Some(path)));
        }

        (app, Task::none())
    }

    fn title(&self) -> String {
        WINDOW_TITLE.to_string()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Player(message) => {
                let effect = self.player.update(message);
                update::perform_effect(effect, self.window_id)
            }
            Message::Playback(notification) => {
                self.player.engine_mut().handle_notification(notification);
                self.player.pump_engine_events();
                Task::none()
            }
            Message::WindowOpened(id) => {
                self.window_id = Some(id);
                Task::none()
            }
            Message::WindowResized(id) => {
                self.window_id = Some(id);
                update::check_window_mode(id)
            }
            Message::WindowModeChecked(mode) => {
                let _ = self.player.update(player::Message::WindowModeObserved {
                    fullscreen: mode == window::Mode::Fullscreen,
                });
                Task::none()
            }
            Message::WindowCloseRequested(id) => {
                log::info!("Shutting down");
                self.player.engine_mut().shutdown();
                self.player.pump_engine_events();
                window::close(id).chain(iced::exit())
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(&self.player)
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_playback_subscription(self.player.engine()),
            subscription::create_event_subscription(),
        ])
    }
}
