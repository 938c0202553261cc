// SPDX-License-Identifier: MPL-2.0
//! Read-only user settings from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[playback]` - Initial volume, mute and autoplay
//! - `[window]` - Initial window size
//! - `[dialog]` - Start directory of the open-file dialog
//! - `[render]` - Renderer hints passed to the GUI backend
//!
//! Every key is optional. The file is never written by the player; a
//! missing file means defaults and a malformed one means defaults plus a
//! warning.
//!
//! # Examples
//!
//! ```no_run
//! use smart_player::config;
//!
//! let (config, warning) = config::load();
//! if let Some(warning) = warning {
//!     eprintln!("{warning}");
//! }
//! println!("starting at volume {}", config.volume().value());
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::engine::Volume;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Playback settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0 to 1.0).
    pub volume: f32,

    /// Start muted.
    pub muted: bool,

    /// Start playing as soon as a file has loaded.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            muted: false,
            autoplay: false,
        }
    }
}

/// Initial window geometry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Open-file dialog settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DialogConfig {
    /// Directory the dialog opens in. Defaults to the home directory.
    pub start_dir: Option<PathBuf>,
}

/// Renderer hints, applied as environment variables before the GUI starts.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Force the CPU renderer.
    pub software: bool,

    /// Value for `WGPU_BACKEND` (e.g. "vulkan", "dx12", "metal", "gl").
    pub wgpu_backends: Option<String>,
}

/// `ICED_BACKEND` value selecting the CPU renderer.
pub const SOFTWARE_BACKEND: &str = "tiny-skia";

impl RenderConfig {
    /// Environment variables for the GUI backend, as `(name, value)` pairs.
    ///
    /// `force_software` comes from the command line and wins over the file.
    #[must_use]
    pub fn env_hints(&self, force_software: bool) -> Vec<(&'static str, String)> {
        let mut hints = Vec::new();
        if force_software || self.software {
            hints.push(("ICED_BACKEND", SOFTWARE_BACKEND.to_string()));
        }
        if let Some(backends) = self.wgpu_backends.as_deref().map(str::trim) {
            if !backends.is_empty() {
                hints.push(("WGPU_BACKEND", backends.to_string()));
            }
        }
        hints
    }
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub window: WindowConfig,
    pub dialog: DialogConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Initial volume, clamped into the valid range.
    #[must_use]
    pub fn volume(&self) -> Volume {
        Volume::new(self.playback.volume)
    }

    /// Start directory for the open-file dialog.
    #[must_use]
    pub fn dialog_start_dir(&self) -> Option<PathBuf> {
        self.dialog.start_dir.clone().or_else(dirs::home_dir)
    }

    /// Window size, never smaller than the minimum layout.
    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.window.width.max(MIN_WINDOW_WIDTH),
            self.window.height.max(MIN_WINDOW_HEIGHT),
        )
    }
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default location.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// the default config with a warning explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(e) => {
                    return (
                        Config::default(),
                        Some(format!(
                            "Ignoring {}: {e}; using default settings",
                            path.display()
                        )),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific file.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn load_reads_all_sections() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[playback]
volume = 0.25
muted = true
autoplay = true

[window]
width = 1280
height = 720

[dialog]
start_dir = "/srv/media"

[render]
software = true
wgpu_backends = "gl"
"#,
        )
        .expect("failed to write config");

        let config = load_from_path(&path).expect("failed to load config");
        assert_abs_diff_eq!(config.playback.volume, 0.25);
        assert!(config.playback.muted);
        assert!(config.playback.autoplay);
        assert_eq!(config.window_size(), (1280, 720));
        assert_eq!(config.dialog_start_dir(), Some(PathBuf::from("/srv/media")));
        assert!(config.render.software);
        assert_eq!(config.render.wgpu_backends.as_deref(), Some("gl"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "[playback]\nmuted = true\n").expect("failed to write config");

        let config = load_from_path(&path).expect("failed to load config");
        assert!(config.playback.muted);
        assert_abs_diff_eq!(config.playback.volume, DEFAULT_VOLUME);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "this is not = = toml").expect("failed to write config");

        let result = load_from_path(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_missing_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn load_with_override_malformed_file_warns() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[playback\nvolume = 2")
            .expect("failed to write config");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_some_and(|w| w.contains(CONFIG_FILE)));
    }

    #[test]
    fn out_of_range_volume_is_clamped() {
        let config = Config {
            playback: PlaybackConfig {
                volume: 3.0,
                ..PlaybackConfig::default()
            },
            ..Config::default()
        };
        assert_abs_diff_eq!(config.volume().value(), MAX_VOLUME);
    }

    #[test]
    fn default_render_config_sets_no_hints() {
        assert!(RenderConfig::default().env_hints(false).is_empty());
    }

    #[test]
    fn software_flag_selects_cpu_renderer() {
        let hints = RenderConfig::default().env_hints(true);
        assert_eq!(hints, vec![("ICED_BACKEND", SOFTWARE_BACKEND.to_string())]);
    }

    #[test]
    fn configured_wgpu_backend_is_passed_through() {
        let render = RenderConfig {
            software: false,
            wgpu_backends: Some(" vulkan ".into()),
        };
        assert_eq!(
            render.env_hints(false),
            vec![("WGPU_BACKEND", "vulkan".to_string())]
        );

        let blank = RenderConfig {
            software: false,
            wgpu_backends: Some("  ".into()),
        };
        assert!(blank.env_hints(false).is_empty());
    }

    #[test]
    fn tiny_window_is_raised_to_minimum() {
        let config = Config {
            window: WindowConfig {
                width: 10,
                height: 10,
            },
            ..Config::default()
        };
        assert_eq!(config.window_size(), (MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT));
    }
}
