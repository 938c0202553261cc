// SPDX-License-Identifier: MPL-2.0
//! Side effects requested by the player window, expressed as iced tasks.

use super::Message;
use crate::media::extensions::DIALOG_FILTERS;
use crate::window::{self as player, Effect};
use iced::{window, Task};
use std::path::PathBuf;

const OPEN_DIALOG_TITLE: &str = "Open Media File";

/// Turns a window [`Effect`] into the task that carries it out.
pub fn perform_effect(effect: Effect, window_id: Option<window::Id>) -> Task<Message> {
    match effect {
        Effect::None => Task::none(),
        Effect::OpenFileDialog { start_dir } => handle_open_file_dialog(start_dir),
        Effect::EnterFullscreen => set_window_mode(window_id, window::Mode::Fullscreen),
        Effect::ExitFullscreen => set_window_mode(window_id, window::Mode::Windowed),
        Effect::Unhandled => Task::none(),
    }
}

/// Queries the real window mode so fullscreen changes made outside the
/// player (window manager shortcuts) are picked up.
pub fn check_window_mode(id: window::Id) -> Task<Message> {
    window::mode(id).map(Message::WindowModeChecked)
}

/// Shows the native open-file dialog.
pub fn handle_open_file_dialog(start_dir: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().set_title(OPEN_DIALOG_TITLE);
            for (name, extensions) in DIALOG_FILTERS {
                dialog = dialog.add_filter(*name, *extensions);
            }

            if let Some(dir) = start_dir {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        },
        |path| Message::Player(player::Message::FileSelected(path)),
    )
}

fn set_window_mode(window_id: Option<window::Id>, mode: window::Mode) -> Task<Message> {
    let Some(window_id) = window_id else {
        log::warn!("Window not ready, ignoring mode change to {mode:?}");
        return Task::none();
    };
    window::set_mode(window_id, mode)
}
