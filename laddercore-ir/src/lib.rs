//! # LadderCore IR
//!
//! Canonical intermediate representation shared by the forward
//! (Ladder Logic -> validator script) and reverse (validator script ->
//! Ladder Logic) translators.
//!
//! ## Key pieces
//! - [`IrDocument`]: the unit of exchange, one ordered document per
//!   translation call
//! - [`Opcode`]: the closed instruction enumeration
//! - [`InstructionTables`]: read-only name/arity/symbol mappings, loaded once
//! - [`validate`]: structural and semantic checks gating both directions
//! - [`NestingStack`]: transient grouping of nested logical instructions
//!
//! Translation is pure and synchronous; the tables are the only shared
//! resource and are immutable after construction, so concurrent translations
//! may read them without locking.

pub mod anchor;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod instruction;
pub mod limits;
pub mod nesting;
pub mod opcode;
pub mod tables;
pub mod validation;

pub use anchor::{AnchorKind, AnchoringClause};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use document::IrDocument;
pub use error::ConfigurationError;
pub use instruction::{
    Comparator, Counter, CounterKind, FunctionBlock, Instruction, JumpInstruction, JumpKind,
    Latch, LatchKind, MathOperation, Timer, TimerKind,
};
pub use limits::{Limits, LimitsError};
pub use nesting::{NestingFrame, NestingOverflow, NestingStack};
pub use opcode::{Opcode, OpcodeCategory, ALL_OPCODES};
pub use tables::{Arity, InstructionTables, TableEntry};
pub use validation::{validate, ValidationError, ValidationReport, ValidationWarning};
