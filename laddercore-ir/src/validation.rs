//! # IR Document Validation
//!
//! Structural and semantic checks gating both translation directions.
//! All checks run unconditionally and accumulate; nothing short-circuits and
//! nothing raises for malformed input. The caller decides whether errors
//! abort translation (strict mode) or annotate best-effort emission.

use crate::document::IrDocument;
use crate::instruction::JumpKind;
use crate::limits::Limits;
use crate::tables::InstructionTables;
use crate::Opcode;
use std::collections::BTreeSet;
use thiserror::Error;

/// Validation error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty identifier key in section {section}")]
    EmptyIdentifier { section: &'static str },

    #[error("unrecognized opcode {mnemonic} at instruction {index}")]
    UnknownOpcode { mnemonic: String, index: usize },

    #[error("operand count {found} for {opcode} at instruction {index} (expected {expected})")]
    ArityMismatch {
        opcode: &'static str,
        index: usize,
        expected: String,
        found: usize,
    },

    #[error("nesting level exceeded: depth {depth} over maximum {max}")]
    NestingDepthExceeded { depth: usize, max: usize },

    #[error("negative duration {value} for timer {timer}")]
    NegativeDuration { timer: String, value: i64 },

    #[error("negative preset {value} for counter {counter}")]
    NegativePreset { counter: String, value: i64 },

    #[error("unresolved jump target: {target}")]
    UnresolvedJumpTarget { target: String },

    #[error("verifiable-hash anchor at index {index} missing slot or digest")]
    IncompleteHashAnchor { index: usize },
}

/// Validation warning types (not errors, but worth noting)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A label no jump refers to; dead code is legal
    OrphanLabel { target: String },

    /// Document with no semantic content at all
    EmptyDocument,
}

/// Validation result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Collapse into the `Ok | Err(list)` contract
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// Validate an IR document against the instruction tables and limits.
///
/// Pure: repeated runs on the same document yield identical reports.
pub fn validate(
    doc: &IrDocument,
    tables: &InstructionTables,
    limits: &Limits,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_completeness(&mut report, doc);
    check_instruction_shape(&mut report, doc, tables);
    check_nesting_bound(&mut report, doc, limits);
    check_timer_counter_typing(&mut report, doc);
    check_jump_labels(&mut report, doc);
    check_anchoring(&mut report, doc);

    report
}

/// Check 1: every section key is a usable identifier
fn check_completeness(report: &mut ValidationReport, doc: &IrDocument) {
    if doc.is_empty() {
        report.add_warning(ValidationWarning::EmptyDocument);
    }

    check_keys(report, "timers", doc.timers.keys());
    check_keys(report, "counters", doc.counters.keys());
    check_keys(report, "math_operations", doc.math_operations.keys());
    check_keys(report, "comparators", doc.comparators.keys());
    check_keys(report, "latches", doc.latches.keys());
    check_keys(report, "function_blocks", doc.function_blocks.keys());

    for jump in &doc.jump_instructions {
        if jump.kind != JumpKind::Ret && jump.target.is_empty() {
            report.add_error(ValidationError::EmptyIdentifier {
                section: "jump_instructions",
            });
        }
    }
}

fn check_keys<'a>(
    report: &mut ValidationReport,
    section: &'static str,
    mut keys: impl Iterator<Item = &'a String>,
) {
    if keys.any(|k| k.is_empty()) {
        report.add_error(ValidationError::EmptyIdentifier { section });
    }
}

/// Check 2: opcode known, operand count matches declared arity
fn check_instruction_shape(
    report: &mut ValidationReport,
    doc: &IrDocument,
    tables: &InstructionTables,
) {
    for (index, inst) in doc.instructions.iter().enumerate() {
        if inst.opcode == Opcode::Unrecognized {
            let mnemonic = inst
                .operands
                .first()
                .cloned()
                .unwrap_or_else(|| "<empty>".to_string());
            report.add_error(ValidationError::UnknownOpcode { mnemonic, index });
            continue;
        }

        match tables.arity_for(inst.opcode) {
            Some(arity) => {
                if !arity.accepts(inst.operands.len()) {
                    report.add_error(ValidationError::ArityMismatch {
                        opcode: inst.opcode.mnemonic(),
                        index,
                        expected: arity.to_string(),
                        found: inst.operands.len(),
                    });
                }
            }
            None => {
                report.add_error(ValidationError::UnknownOpcode {
                    mnemonic: inst.opcode.mnemonic().to_string(),
                    index,
                });
            }
        }
    }
}

/// Check 3: running nesting counter stays within the configured bound.
/// Reported once, with the peak depth, regardless of how far the document
/// overshoots.
fn check_nesting_bound(report: &mut ValidationReport, doc: &IrDocument, limits: &Limits) {
    let mut depth: usize = 0;
    let mut peak: usize = 0;

    for inst in &doc.instructions {
        if inst.opcode.is_nested_logic() || inst.opcode == Opcode::Nested {
            depth += 1;
            peak = peak.max(depth);
        } else {
            depth = depth.saturating_sub(1);
        }
    }

    if peak > limits.max_nesting_depth {
        report.add_error(ValidationError::NestingDepthExceeded {
            depth: peak,
            max: limits.max_nesting_depth,
        });
    }
}

/// Check 4: durations and presets are non-negative
fn check_timer_counter_typing(report: &mut ValidationReport, doc: &IrDocument) {
    for (id, timer) in &doc.timers {
        if timer.duration_ms < 0 {
            report.add_error(ValidationError::NegativeDuration {
                timer: id.clone(),
                value: timer.duration_ms,
            });
        }
    }
    for (id, counter) in &doc.counters {
        if counter.preset < 0 {
            report.add_error(ValidationError::NegativePreset {
                counter: id.clone(),
                value: counter.preset,
            });
        }
    }
}

/// Check 5: every JMP target has a matching LBL; orphan labels are legal
fn check_jump_labels(report: &mut ValidationReport, doc: &IrDocument) {
    let labels: BTreeSet<&str> = doc.jump_targets(JumpKind::Lbl).collect();
    let jumps: BTreeSet<&str> = doc.jump_targets(JumpKind::Jmp).collect();

    for target in &jumps {
        if !labels.contains(target) {
            report.add_error(ValidationError::UnresolvedJumpTarget {
                target: target.to_string(),
            });
        }
    }
    for label in &labels {
        if !jumps.contains(label) {
            report.add_warning(ValidationWarning::OrphanLabel {
                target: label.to_string(),
            });
        }
    }
}

/// Check 6: verifiable-hash anchors carry both slot and digest
fn check_anchoring(report: &mut ValidationReport, doc: &IrDocument) {
    for (index, clause) in doc.anchoring.iter().enumerate() {
        if clause.kind == crate::anchor::AnchorKind::VerifiableHash
            && (clause.slot.is_none() || clause.digest.is_none())
        {
            report.add_error(ValidationError::IncompleteHashAnchor { index });
        }
    }
}
