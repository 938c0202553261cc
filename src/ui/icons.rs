// SPDX-License-Identifier: MPL-2.0
//! Control bar icons.
//!
//! Icons are small inline SVGs drawn in white for the dark control bar.
//! Handles are created once on first access via `OnceLock` and reused.

use crate::ui::design_tokens::sizing;
use iced::widget::svg::{Handle, Svg};
use iced::Length;
use std::sync::OnceLock;

/// Defines an icon function with a cached handle.
macro_rules! define_icon {
    ($name:ident, $doc:literal, $body:literal) => {
        #[doc = $doc]
        pub fn $name() -> Svg<'static> {
            static HANDLE: OnceLock<Handle> = OnceLock::new();
            let handle = HANDLE.get_or_init(|| {
                Handle::from_memory(
                    concat!(
                        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="white">"#,
                        $body,
                        "</svg>"
                    )
                    .as_bytes(),
                )
            });
            Svg::new(handle.clone())
                .width(Length::Fixed(sizing::ICON_MD))
                .height(Length::Fixed(sizing::ICON_MD))
        }
    };
}

define_icon!(
    play,
    "Play icon: triangle pointing right.",
    r#"<path d="M8 5v14l11-7z"/>"#
);
define_icon!(
    pause,
    "Pause icon: two vertical bars.",
    r#"<path d="M6 5h4v14H6zm8 0h4v14h-4z"/>"#
);
define_icon!(
    stop,
    "Stop icon: filled square.",
    r#"<path d="M6 6h12v12H6z"/>"#
);
define_icon!(
    skip_previous,
    "Jump to start: bar with triangle pointing left.",
    r#"<path d="M6 6h2v12H6zm3.5 6 8.5 6V6z"/>"#
);
define_icon!(
    skip_next,
    "Jump to end: triangle pointing right with bar.",
    r#"<path d="M6 18l8.5-6L6 6v12zM16 6h2v12h-2z"/>"#
);
define_icon!(
    volume_on,
    "Speaker with sound waves.",
    r#"<path d="M3 9v6h4l5 5V4L7 9H3zm13.5 3A4.5 4.5 0 0 0 14 7.97v8.05A4.5 4.5 0 0 0 16.5 12zM14 3.23v2.06a7 7 0 0 1 0 13.42v2.06A9 9 0 0 0 14 3.23z"/>"#
);
define_icon!(
    volume_off,
    "Speaker crossed out.",
    r#"<path d="M16.5 12A4.5 4.5 0 0 0 14 7.97v2.21l2.45 2.45c.03-.2.05-.41.05-.63zM19 12c0 .94-.2 1.82-.54 2.64l1.51 1.51A8.8 8.8 0 0 0 21 12a9 9 0 0 0-7-8.77v2.06A7 7 0 0 1 19 12zM4.27 3 3 4.27 7.73 9H3v6h4l5 5v-6.73l4.25 4.25A7 7 0 0 1 14 18.7v2.06a9 9 0 0 0 3.69-1.81L19.73 21 21 19.73l-9-9L4.27 3zM12 4 9.91 6.09 12 8.18V4z"/>"#
);
define_icon!(
    folder_open,
    "Open file: folder.",
    r#"<path d="M20 6h-8l-2-2H4a2 2 0 0 0-2 2v12a2 2 0 0 0 2 2h16a2 2 0 0 0 2-2V8a2 2 0 0 0-2-2zm0 12H4V8h16v10z"/>"#
);
define_icon!(
    fullscreen,
    "Enter fullscreen: four outward corners.",
    r#"<path d="M7 14H5v5h5v-2H7v-3zm-2-4h2V7h3V5H5v5zm12 7h-3v2h5v-5h-2v3zM14 5v2h3v3h2V5h-5z"/>"#
);
define_icon!(
    fullscreen_exit,
    "Exit fullscreen: four inward corners.",
    r#"<path d="M5 16h3v3h2v-5H5v2zm3-8H5v2h5V5H8v3zm6 11h2v-3h3v-2h-5v5zm2-11V5h-2v5h5V8h-3z"/>"#
);
