//! # LadderCore IR Document
//!
//! The unit of exchange between the two translation directions. Field names
//! are part of the compatibility surface; side tables are `BTreeMap`s so that
//! iteration order never depends on hash state.

use crate::anchor::AnchoringClause;
use crate::instruction::{
    Comparator, Counter, FunctionBlock, Instruction, JumpInstruction, JumpKind, Latch,
    MathOperation, Timer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete LadderCore IR document.
///
/// Constructed fresh per translation call, fully built before validation,
/// validated before emission, and discarded after emission. Carries no state
/// across calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IrDocument {
    /// Ordered instruction sequence
    #[serde(default)]
    pub instructions: Vec<Instruction>,

    /// Timers keyed by identifier
    #[serde(default)]
    pub timers: BTreeMap<String, Timer>,

    /// Counters keyed by identifier
    #[serde(default)]
    pub counters: BTreeMap<String, Counter>,

    /// Arithmetic and advanced-math operations keyed by destination
    #[serde(default)]
    pub math_operations: BTreeMap<String, MathOperation>,

    /// Comparison operations keyed by identifier
    #[serde(default)]
    pub comparators: BTreeMap<String, Comparator>,

    /// Set/reset latches keyed by identifier
    #[serde(default)]
    pub latches: BTreeMap<String, Latch>,

    /// Ordered jump-table entries
    #[serde(default)]
    pub jump_instructions: Vec<JumpInstruction>,

    /// Function blocks keyed by identifier
    #[serde(default)]
    pub function_blocks: BTreeMap<String, FunctionBlock>,

    /// Ordered anchoring clauses
    #[serde(default)]
    pub anchoring: Vec<AnchoringClause>,

    /// Scan-cycle trace: mnemonics in input order. Diagnostic only, never
    /// semantically load-bearing.
    #[serde(default)]
    pub scan_cycle: Vec<String>,
}

impl IrDocument {
    /// Create an empty document with every section present
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all semantic sections (the scan-cycle
    /// trace is excluded)
    pub fn len(&self) -> usize {
        self.instructions.len()
            + self.timers.len()
            + self.counters.len()
            + self.math_operations.len()
            + self.comparators.len()
            + self.latches.len()
            + self.jump_instructions.len()
            + self.function_blocks.len()
            + self.anchoring.len()
    }

    /// Whether the document holds no semantic content
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an instruction and return its index
    pub fn push_instruction(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    /// Append a jump-table entry
    pub fn push_jump(&mut self, kind: JumpKind, target: impl Into<String>) {
        self.jump_instructions.push(JumpInstruction {
            kind,
            target: target.into(),
        });
    }

    /// Record a mnemonic in the scan-cycle trace
    pub fn record_scan(&mut self, mnemonic: impl Into<String>) {
        self.scan_cycle.push(mnemonic.into());
    }

    /// Section-by-section equality, ignoring the diagnostic scan-cycle
    /// trace. This is the round-trip contract: the trace records how a
    /// document was read, not what it means.
    pub fn semantic_eq(&self, other: &IrDocument) -> bool {
        self.instructions == other.instructions
            && self.timers == other.timers
            && self.counters == other.counters
            && self.math_operations == other.math_operations
            && self.comparators == other.comparators
            && self.latches == other.latches
            && self.jump_instructions == other.jump_instructions
            && self.function_blocks == other.function_blocks
            && self.anchoring == other.anchoring
    }

    /// Iterator over jump targets of the given kind
    pub fn jump_targets(&self, kind: JumpKind) -> impl Iterator<Item = &str> {
        self.jump_instructions
            .iter()
            .filter(move |j| j.kind == kind)
            .map(|j| j.target.as_str())
    }
}
