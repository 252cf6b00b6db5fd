//! Forward translator errors

use laddercore_ir::{ConfigurationError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    /// Strict-mode translation aborted on validation errors
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, ForwardError>;
