// SPDX-License-Identifier: MPL-2.0
//! Media file knowledge shared by the dialog and the engine.

pub mod probe;

pub use probe::{init_ffmpeg, probe, MediaInfo};

use std::path::Path;

/// File extension allow-lists and the open-file dialog filters built from them.
pub mod extensions {
    /// Video file extensions.
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv"];

    /// Audio file extensions.
    pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "ogg"];

    /// Filters for the open-file dialog, in display order.
    ///
    /// The last entry uses the `*` wildcard and matches any file.
    pub const DIALOG_FILTERS: &[(&str, &[&str])] = &[
        ("Video Files", VIDEO_EXTENSIONS),
        ("Audio Files", AUDIO_EXTENSIONS),
        ("All Files", &["*"]),
    ];
}

/// File name shown in the window, without its directory.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
