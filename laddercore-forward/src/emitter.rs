//! # Validator-Script Emitter
//!
//! Renders an IR document as validator-script text. Emission is deterministic
//! and order-preserving: output line order follows IR section order
//! (instructions, timers, counters, math, comparators, latches, function
//! blocks, jumps, anchoring), and side tables iterate in key order.

use laddercore_ir::{
    AnchorKind, CounterKind, Instruction, IrDocument, InstructionTables, Opcode, OpcodeCategory,
    TimerKind,
};
use std::collections::BTreeSet;

/// Emit validator-script text for a validated IR document
pub fn emit(doc: &IrDocument, tables: &InstructionTables) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut emitted_windows: BTreeSet<String> = BTreeSet::new();

    for (index, inst) in doc.instructions.iter().enumerate() {
        lines.push(emit_instruction(index, inst, tables));
    }

    for (id, timer) in &doc.timers {
        if timer.kind == TimerKind::OnDelay {
            if let Some(slot) = &timer.slot {
                push_window(&mut lines, &mut emitted_windows, slot);
            }
        }
        if let Some(assertion) = timer_assertion(id, timer) {
            lines.push(assertion);
        }
    }

    for (id, counter) in &doc.counters {
        let kind = counter.kind.as_str();
        let ops: &[&str] = match counter.kind {
            CounterKind::Up => &["<="],
            CounterKind::Down => &[">="],
            // Up-down counters carry both bounds
            CounterKind::UpDown => &["<=", ">="],
            CounterKind::Reset => &["=="],
        };
        let bound = match counter.kind {
            CounterKind::Reset => 0,
            _ => counter.preset,
        };
        for op in ops {
            lines.push(format!(
                "assert-if-false \"counter {id} {kind}\" ({id} {op} {bound})"
            ));
        }
    }

    for (id, op) in &doc.math_operations {
        let mnemonic = op.operation.mnemonic().to_ascii_lowercase();
        let expr = math_expression(id, op, tables);
        lines.push(format!("assert-if-false \"math {id} {mnemonic}\" ({expr})"));
    }

    for (id, cmp) in &doc.comparators {
        let mnemonic = cmp.comparison.mnemonic().to_ascii_lowercase();
        let sym = tables.symbol_for(cmp.comparison).unwrap_or("==");
        let expr = match cmp.operands.as_slice() {
            [] => id.clone(),
            [rhs] => format!("{id} {sym} {rhs}"),
            [a, b, ..] => format!("{a} {sym} {b}"),
        };
        lines.push(format!("assert-if-false \"compare {id} {mnemonic}\" ({expr})"));
    }

    for (id, latch) in &doc.latches {
        lines.push(format!(
            "assert-if-false \"latch {id} {}\" ({id})",
            latch.kind.as_str()
        ));
    }

    for (id, block) in &doc.function_blocks {
        let expr = if block.operands.is_empty() {
            id.clone()
        } else {
            block.operands.join(" && ")
        };
        lines.push(format!(
            "assert-if-false \"block {id} {}\" ({expr})",
            block.kind
        ));
    }

    for jump in &doc.jump_instructions {
        if jump.target.is_empty() {
            lines.push(jump.kind.mnemonic().to_string());
        } else {
            lines.push(format!("{} {}", jump.kind.mnemonic(), jump.target));
        }
    }

    for clause in &doc.anchoring {
        match clause.kind {
            AnchorKind::SlotBound | AnchorKind::Immediate => {
                if let Some(slot) = &clause.slot {
                    push_window(&mut lines, &mut emitted_windows, slot);
                }
            }
            AnchorKind::FinalityDeferred => {
                lines.push("-- deferred-anchor".to_string());
            }
            AnchorKind::VerifiableHash => {
                if let Some(hex) = clause.digest_hex() {
                    lines.push(format!("-- anchor-digest {hex}"));
                }
                // The window stays adjacent to its digest so the reverse
                // direction can rebind them; it bypasses deduplication
                if let Some(slot) = &clause.slot {
                    lines.push(window_line(slot));
                }
            }
        }
    }

    let mut script = lines.join("\n");
    if !script.is_empty() {
        script.push('\n');
    }
    script
}

fn window_line(slot: &str) -> String {
    format!("must-validate-in (from {slot})")
}

fn push_window(lines: &mut Vec<String>, emitted: &mut BTreeSet<String>, slot: &str) {
    if emitted.insert(slot.to_string()) {
        lines.push(window_line(slot));
    }
}

fn emit_instruction(index: usize, inst: &Instruction, _tables: &InstructionTables) -> String {
    match inst.opcode {
        Opcode::Unrecognized => {
            format!("-- unrecognized: {}", inst.operands.join(" "))
        }
        Opcode::Mov if is_timestamp_update(inst) => {
            format!("timestamp {}", inst.operands[1])
        }
        Opcode::Mov if is_shorthand_update(inst) => {
            let id = &inst.operands[0];
            let op = inst.operands[1].trim_end_matches('=');
            format!("let {id} = {id} {op} {}", inst.operands[2])
        }
        Opcode::Shl | Opcode::Shr | Opcode::Rol | Opcode::Ror
            if inst.operands.len() == 3 =>
        {
            format!(
                "let {} = {} {} {}",
                inst.operands[0],
                inst.operands[1],
                inst.opcode.mnemonic(),
                inst.operands[2]
            )
        }
        _ => {
            let description = inst.description.clone().unwrap_or_else(|| {
                format!(
                    "condition {index}: {}",
                    inst.opcode.mnemonic().to_ascii_lowercase()
                )
            });
            let expr = if inst.operands.is_empty() {
                "true".to_string()
            } else {
                inst.operands.join(&format!(" {} ", inst.opcode.join_operator()))
            };
            format!("assert-if-false \"{description}\" ({expr})")
        }
    }
}

/// `MOV timestamp <n>` produced by reverse extraction of a timestamp datum
fn is_timestamp_update(inst: &Instruction) -> bool {
    inst.operands.len() == 2 && inst.operands[0] == "timestamp"
}

/// `MOV <id> <op>= <n>` shorthand increment/decrement
fn is_shorthand_update(inst: &Instruction) -> bool {
    inst.operands.len() == 3
        && inst.operands[1].len() == 2
        && inst.operands[1].ends_with('=')
        && !inst.operands[1].starts_with('=')
}

fn timer_assertion(id: &str, timer: &laddercore_ir::Timer) -> Option<String> {
    let kind = timer.kind.as_str();
    let slot_suffix = timer
        .slot
        .as_ref()
        .map(|s| format!(" from {s}"))
        .unwrap_or_default();

    match timer.kind {
        TimerKind::Reset => Some(format!(
            "assert-if-false \"timer {id} {kind}\" ({id} == 0)"
        )),
        TimerKind::OnDelay | TimerKind::Retentive if timer.duration_ms > 0 => Some(format!(
            "assert-if-false \"timer {id} {kind}{slot_suffix}\" ({id} >= {})",
            timer.duration_ms
        )),
        TimerKind::OffDelay | TimerKind::Pulse if timer.duration_ms > 0 => Some(format!(
            "assert-if-false \"timer {id} {kind}{slot_suffix}\" ({id} <= {})",
            timer.duration_ms
        )),
        _ => None,
    }
}

fn math_expression(
    id: &str,
    op: &laddercore_ir::MathOperation,
    tables: &InstructionTables,
) -> String {
    let sym = tables.symbol_for(op.operation).unwrap_or("+");
    match (op.operation.category(), op.operands.as_slice()) {
        (_, []) => id.to_string(),
        (OpcodeCategory::Arithmetic, [src]) if op.operation == Opcode::Mov => {
            format!("{id} == {src}")
        }
        (OpcodeCategory::AdvancedMath, [src]) => format!("{id} == {sym}({src})"),
        (_, operands) => {
            format!("{id} == {}", operands.join(&format!(" {sym} ")))
        }
    }
}
