// SPDX-License-Identifier: MPL-2.0
//! `smart_player` is a desktop media player built with the Iced GUI toolkit.
//!
//! A single window wires playback controls to an FFmpeg/cpal playback engine
//! and a video display surface. The window logic lives in [`window`] and
//! talks to playback only through the [`engine::MediaEngine`] trait, so it can
//! be exercised without a GUI or a media backend.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod media;
pub mod ui;
pub mod window;

#[cfg(test)]
pub mod test_utils;
