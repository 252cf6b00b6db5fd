//! # Translator Limits
//!
//! One explicit, immutable configuration value passed into translator
//! constructors; never reloaded per call.

use std::fmt;

/// Bounds applied during translation and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limits {
    /// Maximum nesting-frame depth before translation reports an error
    /// instead of combining further (no silent truncation)
    pub max_nesting_depth: usize,
}

/// Upper bound accepted for `max_nesting_depth`
pub const MAX_NESTING_CEILING: usize = 64;

impl Limits {
    /// Default bound: 16 nesting levels
    pub const DEFAULT: Self = Self {
        max_nesting_depth: 16,
    };

    /// Create limits with validation
    pub fn new(max_nesting_depth: usize) -> Result<Self, LimitsError> {
        if max_nesting_depth == 0 || max_nesting_depth > MAX_NESTING_CEILING {
            return Err(LimitsError::InvalidNestingDepth(max_nesting_depth));
        }
        Ok(Self { max_nesting_depth })
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Limits {{ max_nesting_depth: {} }}", self.max_nesting_depth)
    }
}

/// Limits construction error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitsError {
    /// Depth must be in range [1, 64]
    InvalidNestingDepth(usize),
}

impl fmt::Display for LimitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitsError::InvalidNestingDepth(depth) => {
                write!(
                    f,
                    "max_nesting_depth must be in range [1, {}], got {}",
                    MAX_NESTING_CEILING, depth
                )
            }
        }
    }
}

impl std::error::Error for LimitsError {}
