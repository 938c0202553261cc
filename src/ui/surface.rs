// SPDX-License-Identifier: MPL-2.0
//! Video display surface backed by an iced image widget.

use crate::engine::VideoFrame;
use crate::ui::styles;
use crate::window::{DisplaySurface, SurfacePlacement, SURFACE_LAYOUT_INDEX};
use iced::widget::{container, image, Space};
use iced::{ContentFit, Element, Length};

/// Holds the latest frame and where the surface is shown.
#[derive(Debug, Clone)]
pub struct VideoSurface {
    frame: Option<VideoFrame>,
    handle: Option<image::Handle>,
    placement: SurfacePlacement,
    fullscreen: bool,
}

impl Default for VideoSurface {
    fn default() -> Self {
        Self {
            frame: None,
            handle: None,
            placement: SurfacePlacement::InLayout(SURFACE_LAYOUT_INDEX),
            fullscreen: false,
        }
    }
}

impl VideoSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a picture is available.
    #[must_use]
    pub fn has_frame(&self) -> bool {
        self.handle.is_some()
    }

    /// Black area showing the current frame, letterboxed.
    pub fn view<'a, M: 'a>(&'a self) -> Element<'a, M> {
        let content: Element<'a, M> = match &self.handle {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => Space::new().width(Length::Fill).height(Length::Fill).into(),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(if self.fullscreen {
                styles::container::video_fullscreen
            } else {
                styles::container::video
            })
            .into()
    }

    fn rebuild_handle(&mut self) {
        self.handle = self
            .frame
            .as_ref()
            .map(|frame| image::Handle::from_rgba(frame.width, frame.height, frame.rgba.to_vec()));
    }
}

impl DisplaySurface for VideoSurface {
    fn placement(&self) -> SurfacePlacement {
        self.placement
    }

    fn detach(&mut self) {
        self.placement = SurfacePlacement::Detached;
    }

    fn insert_into_layout(&mut self, index: usize) {
        self.placement = SurfacePlacement::InLayout(index);
    }

    fn show_fullscreen(&mut self) {
        self.fullscreen = true;
    }

    fn show_normal(&mut self) {
        self.fullscreen = false;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_redraw(&mut self) {
        // A fresh handle makes the renderer upload the picture again
        self.rebuild_handle();
    }

    fn present(&mut self, frame: VideoFrame) {
        self.frame = Some(frame);
        self.rebuild_handle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn frame() -> VideoFrame {
        VideoFrame {
            rgba: Arc::new(vec![255; 2 * 2 * 4]),
            width: 2,
            height: 2,
            pts_secs: 0.0,
        }
    }

    #[test]
    fn starts_in_layout_without_picture() {
        let surface = VideoSurface::new();
        assert_eq!(
            surface.placement(),
            SurfacePlacement::InLayout(SURFACE_LAYOUT_INDEX)
        );
        assert!(!surface.is_fullscreen());
        assert!(!surface.has_frame());
    }

    #[test]
    fn present_keeps_picture_across_redraws() {
        let mut surface = VideoSurface::new();
        surface.request_redraw();
        assert!(!surface.has_frame());

        surface.present(frame());
        surface.request_redraw();
        assert!(surface.has_frame());
    }

    #[test]
    fn fullscreen_round_trip_restores_placement() {
        let mut surface = VideoSurface::new();
        surface.detach();
        surface.show_fullscreen();
        assert_eq!(surface.placement(), SurfacePlacement::Detached);
        assert!(surface.is_fullscreen());

        surface.show_normal();
        surface.insert_into_layout(SURFACE_LAYOUT_INDEX);
        assert_eq!(
            surface.placement(),
            SurfacePlacement::InLayout(SURFACE_LAYOUT_INDEX)
        );
        assert!(!surface.is_fullscreen());
    }
}
