// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::config::Config;
use crate::engine::Notification;
use crate::window;
use std::path::PathBuf;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Control bar and keyboard input for the player window.
    Player(window::Message),
    /// Report from the running playback session.
    Playback(Notification),
    /// The main window appeared.
    WindowOpened(iced::window::Id),
    /// The main window changed size; the mode is re-checked afterwards.
    WindowResized(iced::window::Id),
    /// Actual window mode, queried after a resize.
    WindowModeChecked(iced::window::Mode),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// File to open on startup, as if chosen in the dialog.
    pub file: Option<PathBuf>,
    /// Settings loaded by the launcher.
    pub config: Config,
}
