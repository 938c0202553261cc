// SPDX-License-Identifier: MPL-2.0
//! Location of the settings directory.
//!
//! # Resolution Order
//!
//! 1. **Explicit override** passed to [`config_dir_with_override`] (tests)
//! 2. **CLI argument** `--config-dir`, registered once via [`init_cli_override`]
//! 3. **Environment variable** `SMART_PLAYER_CONFIG_DIR`
//! 4. **Platform default** via `dirs::config_dir()` plus the app name

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "SmartPlayer";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "SMART_PLAYER_CONFIG_DIR";

/// Global CLI override for the config directory (set once at startup).
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Registers the `--config-dir` value. Later calls are ignored.
pub fn init_cli_override(config_dir: Option<PathBuf>) {
    if CLI_CONFIG_DIR.set(config_dir).is_err() {
        log::warn!("Config directory override already initialized, ignoring");
    }
}

fn cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Returns the directory holding `settings.toml`.
///
/// Returns `None` if no platform config directory exists (rare).
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with_override(None)
}

/// Same as [`config_dir`], with `override_path` taking precedence over
/// everything else.
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = cli_config_dir() {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
