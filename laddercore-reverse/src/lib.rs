//! # LadderCore Reverse Translator
//!
//! Translate validator-script text back into Ladder-Logic text through the
//! LadderCore IR, for inspection, auditing, and round-trip editing.
//!
//! ## Example
//!
//! ```rust
//! let script = "assert-if-false \"condition 0: input\" (X1)";
//! let out = laddercore_reverse::translate(script).unwrap();
//! assert!(out.ladder.contains("XIC X1"));
//! ```

pub mod error;
pub mod extractor;
pub mod formatter;
pub mod translator;

pub use error::{Result, ReverseError};
pub use extractor::{extract, ExtractionRules};
pub use formatter::format;
pub use translator::{translate, Mode, ReverseTranslation, ReverseTranslator};
