// SPDX-License-Identifier: MPL-2.0
//! The video display surface as seen by the player window.

use crate::engine::VideoFrame;

/// Where the surface currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePlacement {
    /// Child of the window layout at this index.
    InLayout(usize),
    /// Taken out of the layout, e.g. while fullscreen.
    Detached,
}

/// Render target the engine's frames are shown on.
pub trait DisplaySurface {
    fn placement(&self) -> SurfacePlacement;

    /// Removes the surface from its layout slot.
    fn detach(&mut self);

    /// Puts the surface back into the window layout at `index`.
    fn insert_into_layout(&mut self, index: usize);

    fn show_fullscreen(&mut self);

    fn show_normal(&mut self);

    fn is_fullscreen(&self) -> bool;

    /// Repaints even if no new frame arrived.
    fn request_redraw(&mut self);

    /// Shows a freshly decoded frame.
    fn present(&mut self, frame: VideoFrame);
}
