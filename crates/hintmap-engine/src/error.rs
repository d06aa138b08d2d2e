use std::result::Result as StdResult;

use hint_labels::LabelError;
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the hint engine.
///
/// Only construction and reconfiguration can fail; key handling and session
/// management degrade instead of erroring.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration failed validation.
    #[error("Config error: {0}")]
    Config(#[from] config::Error),

    /// The label alphabet is unusable.
    #[error("Label alphabet error: {0}")]
    Labels(#[from] LabelError),
}
