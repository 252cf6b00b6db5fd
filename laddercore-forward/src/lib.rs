//! # LadderCore Forward Translator
//!
//! Translate Ladder-Logic text into validator-script text through the
//! LadderCore IR.
//!
//! ## Example
//!
//! ```rust
//! let source = "INPUT X1\nAND X2\nOUTPUT Y1";
//! let out = laddercore_forward::translate(source).unwrap();
//! assert!(out.script.contains("assert-if-false"));
//! ```

pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod translator;

pub use emitter::emit;
pub use error::{ForwardError, Result};
pub use parser::parse;
pub use translator::{translate, ForwardTranslation, ForwardTranslator, Mode};
