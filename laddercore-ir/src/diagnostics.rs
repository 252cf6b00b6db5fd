//! # Translation Diagnostics
//!
//! The structured diagnostics channel returned from every `parse` call.
//! Nothing in the core prints; callers decide how to surface these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A script line matched no extraction rule; recorded as an
    /// unrecognized instruction rather than dropped
    ExtractionAmbiguity,
    /// Operand count did not match the declared arity; the instruction is
    /// kept with the defect marked
    ArityMismatch,
    /// A numeric field (duration, preset, shift amount) failed to parse
    UnparsedValue,
    /// An opcode outside the closed instruction set
    UnrecognizedOpcode,
    /// Nesting depth exceeded the configured bound during grouping
    NestingOverflow,
}

/// One diagnostic attached to a source line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based source line number
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {:?}: {}", self.line, self.kind, self.message)
    }
}
