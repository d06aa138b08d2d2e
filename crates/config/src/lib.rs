//! Configuration for hintmap: label alphabets, toggle keys, shortcuts,
//! gestures and label placement, loaded from a RON file.

use std::{
    env,
    path::{Path, PathBuf},
};

mod defaults;
mod error;
mod loader;
mod settings;
mod types;

pub use error::Error;
pub use keymode::Mode;
pub use loader::{load_from_path, load_from_str};
pub use settings::Config;
pub use types::{Action, Binding, Channel, Placement, ScrollDir};

/// Determine the preferred user config path (`~/.hintmap/config.ron`).
pub fn default_config_path() -> PathBuf {
    let home = env::var_os("USERPROFILE")
        .or_else(|| env::var_os("HOME"))
        .unwrap_or_default();
    let mut p = PathBuf::from(home);
    p.push(".hintmap");
    p.push("config.ron");
    p
}

/// Resolve the effective config path using the default policy.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.hintmap/config.ron` when it exists.
/// 3) Else `None`: run on built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let preferred = default_config_path();
    preferred.exists().then_some(preferred)
}

/// Load the effective configuration, falling back to defaults when no file exists.
pub fn load(explicit: Option<&Path>) -> Result<Config, Error> {
    match resolve_config_path(explicit) {
        Some(path) => {
            tracing::info!(path = %path.display(), "config_load");
            load_from_path(&path)
        }
        None => {
            tracing::info!("config_defaults");
            Ok(Config::default())
        }
    }
}
