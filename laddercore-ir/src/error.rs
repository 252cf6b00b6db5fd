//! # Error Types for the LadderCore IR

use crate::limits::LimitsError;
use thiserror::Error;

/// Fatal configuration errors, surfaced at startup before any translation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("instruction tables missing required category: {category}")]
    MissingCategory { category: &'static str },

    #[error("instruction table is empty: {table}")]
    EmptyTable { table: &'static str },

    #[error("invalid limits: {0}")]
    InvalidLimits(#[from] LimitsError),
}
