//! Parse and load user configuration.

use std::{ffi::OsStr, fs, path::Path};

use crate::{Config, Error, error::excerpt_at};

/// Load and validate a `Config` from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&source, Some(path))
}

/// Parse and validate a `Config` from RON source text.
///
/// Blank input yields the defaults.
pub fn load_from_str(source: &str, path: Option<&Path>) -> Result<Config, Error> {
    let cfg: Config = if source.trim().is_empty() {
        Config::default()
    } else {
        ron::from_str(source).map_err(|e| {
            let (line, col) = (e.span.start.line, e.span.start.col);
            Error::Parse {
                path: path.map(Path::to_path_buf),
                line,
                col,
                message: e.code.to_string(),
                excerpt: excerpt_at(source, line, col),
            }
        })?
    };
    match (cfg.validate(), path) {
        (Err(e), Some(p)) => Err(e.with_path(p)),
        (Err(e), None) => Err(e),
        (Ok(()), _) => Ok(cfg),
    }
}
