//! Error type for setup-time failures.
//!
//! Per-tick simulation code never returns errors; only configuration and
//! entity construction can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A renderable was requested by a name the model catalog does not know.
    #[error("unknown model `{0}`")]
    UnknownModel(String),

    /// A weapon pattern was built with an inconsistent timeline.
    #[error("invalid weapon pattern: {reason}")]
    InvalidPattern { reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
