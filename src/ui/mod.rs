// SPDX-License-Identifier: MPL-2.0
//! Widgets and styling for the player window.
//!
//! Following the Elm-style "state down, messages up" pattern, everything here
//! renders [`crate::window::DisplayState`] and emits [`crate::window::Message`].
//!
//! - [`controls`] - Progress slider, time readout and transport buttons
//! - [`surface`] - Video display surface
//! - [`styles`] - Widget styles (buttons, containers, slider, text)
//! - [`design_tokens`] - Colors, spacing and sizing constants
//! - [`icons`] - Control bar icons

pub mod controls;
pub mod design_tokens;
pub mod icons;
pub mod styles;
pub mod surface;

pub use surface::VideoSurface;
