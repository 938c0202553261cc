// SPDX-License-Identifier: MPL-2.0
//! The player window: user intent in, engine commands out, engine events back
//! into display state.
//!
//! [`PlayerWindow`] owns an injected [`MediaEngine`] and [`DisplaySurface`].
//! It never touches iced directly; anything that needs the toolkit (the file
//! dialog, window mode changes) is returned to the caller as an [`Effect`].

pub mod state;
pub mod surface;

pub use state::{format_time, DisplayState, PlayIcon, SliderState};
pub use surface::{DisplaySurface, SurfacePlacement};

use crate::engine::{EngineEvent, MediaEngine, MediaStatus, PlaybackState};
use crate::media;
use iced::keyboard::{key::Named, Key};
use std::path::PathBuf;

/// Layout slot the video surface occupies in windowed mode.
pub const SURFACE_LAYOUT_INDEX: usize = 0;

/// Inputs the player window reacts to.
#[derive(Debug, Clone)]
pub enum Message {
    TogglePlayback,
    Stop,
    JumpToStart,
    JumpToEnd,
    ToggleMute,
    OpenFile,
    /// Result of the file dialog; `None` when the user cancelled.
    FileSelected(Option<PathBuf>),
    /// Slider handle moved (preview only).
    SeekPreview(u64),
    /// Slider handle released.
    SeekCommit,
    ToggleFullscreen,
    KeyPressed(Key),
    Engine(EngineEvent),
    /// The actual window mode, observed after a resize.
    WindowModeObserved { fullscreen: bool },
}

/// Side effects the window asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    OpenFileDialog { start_dir: Option<PathBuf> },
    EnterFullscreen,
    ExitFullscreen,
    /// The key was not for us; default handling applies.
    Unhandled,
}

/// Coordinates controls, engine and display surface.
#[derive(Debug)]
pub struct PlayerWindow<E: MediaEngine, S: DisplaySurface> {
    engine: E,
    surface: S,
    state: DisplayState,
    dialog_start_dir: Option<PathBuf>,
    autoplay: bool,
}

impl<E: MediaEngine, S: DisplaySurface> PlayerWindow<E, S> {
    pub fn new(engine: E, surface: S) -> Self {
        let state = DisplayState {
            muted: engine.is_muted(),
            ..DisplayState::default()
        };
        Self {
            engine,
            surface,
            state,
            dialog_start_dir: None,
            autoplay: false,
        }
    }

    /// Directory the open-file dialog starts in.
    #[must_use]
    pub fn with_dialog_start_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dialog_start_dir = dir;
        self
    }

    /// Start playing as soon as a newly opened file has loaded.
    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access for the host. Call [`Self::pump_engine_events`]
    /// after anything that may have queued events.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn update(&mut self, message: Message) -> Effect {
        let effect = match message {
            Message::TogglePlayback => {
                self.toggle_playback();
                Effect::None
            }
            Message::Stop => {
                self.engine.stop();
                self.state.play_icon = PlayIcon::Play;
                Effect::None
            }
            Message::JumpToStart => {
                self.engine.set_position(0);
                Effect::None
            }
            Message::JumpToEnd => {
                let duration = self.engine.duration();
                self.engine.set_position(duration);
                Effect::None
            }
            Message::ToggleMute => {
                let muted = !self.engine.is_muted();
                self.engine.set_muted(muted);
                self.state.muted = muted;
                Effect::None
            }
            Message::OpenFile => Effect::OpenFileDialog {
                start_dir: self.dialog_start_dir.clone(),
            },
            Message::FileSelected(Some(path)) => {
                log::info!("Opening file: {}", path.display());
                self.engine.stop();
                self.engine.set_source(&path);
                self.state.on_file_opened(media::display_name(&path));
                if self.autoplay {
                    self.engine.play();
                }
                Effect::None
            }
            Message::FileSelected(None) => Effect::None,
            Message::SeekPreview(position_ms) => {
                self.state.on_slider_moved(position_ms);
                Effect::None
            }
            Message::SeekCommit => {
                let position_ms = self.state.on_slider_released();
                self.engine.set_position(position_ms);
                Effect::None
            }
            Message::ToggleFullscreen => self.toggle_fullscreen(),
            Message::KeyPressed(key) => self.handle_key(&key),
            Message::Engine(event) => {
                self.handle_engine_event(event);
                Effect::None
            }
            Message::WindowModeObserved { fullscreen } => {
                if fullscreen != self.state.fullscreen {
                    log::debug!("Window mode changed externally (fullscreen: {fullscreen})");
                    self.apply_fullscreen(fullscreen);
                }
                Effect::None
            }
        };

        self.pump_engine_events();
        effect
    }

    /// Drains and applies every event the engine has queued.
    pub fn pump_engine_events(&mut self) {
        for event in self.engine.take_events() {
            self.handle_engine_event(event);
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PositionChanged(position_ms) => {
                self.state.on_position_changed(position_ms);
            }
            EngineEvent::DurationChanged(duration_ms) => {
                log::debug!("Duration updated: {duration_ms} ms");
                self.state.on_duration_changed(duration_ms);
            }
            EngineEvent::PlaybackStateChanged(playback_state) => {
                log::debug!("Playback state changed: {playback_state}");
                self.state.play_icon = PlayIcon::for_state(playback_state);
            }
            EngineEvent::MediaStatusChanged(status) => {
                log::debug!("Media status changed: {status:?}");
                match status {
                    MediaStatus::Loaded => self.surface.request_redraw(),
                    MediaStatus::Invalid => self.state.on_invalid_media(),
                    _ => {}
                }
            }
            EngineEvent::ErrorOccurred(message) => {
                log::error!("Media error: {message}");
                self.state.on_error(&message);
            }
            EngineEvent::FrameReady(frame) => self.surface.present(frame),
        }
    }

    /// Requests play or pause; the icon then shows the engine's reported state,
    /// not the request.
    fn toggle_playback(&mut self) {
        if self.engine.playback_state() == PlaybackState::Playing {
            self.engine.pause();
        } else {
            self.engine.play();
        }
        // Requests the engine ignored leave the icon where it was
        self.state.play_icon = PlayIcon::for_state(self.engine.playback_state());
    }

    fn toggle_fullscreen(&mut self) -> Effect {
        let fullscreen = !self.state.fullscreen;
        self.apply_fullscreen(fullscreen);
        if fullscreen {
            Effect::EnterFullscreen
        } else {
            Effect::ExitFullscreen
        }
    }

    fn apply_fullscreen(&mut self, fullscreen: bool) {
        if fullscreen {
            self.surface.detach();
            self.surface.show_fullscreen();
        } else {
            self.surface.show_normal();
            self.surface.insert_into_layout(SURFACE_LAYOUT_INDEX);
        }
        self.state.fullscreen = fullscreen;
    }

    fn handle_key(&mut self, key: &Key) -> Effect {
        match key {
            Key::Named(Named::Escape) if self.state.fullscreen => self.toggle_fullscreen(),
            Key::Named(Named::Space) => {
                self.toggle_playback();
                Effect::None
            }
            _ => Effect::Unhandled,
        }
    }
}
