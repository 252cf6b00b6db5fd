//! # Ladder-Logic Formatter
//!
//! Renders an IR document as Ladder-Logic text. Emission follows a fixed
//! section order -- conditions, state updates, arithmetic, bitwise, control
//! flow, nested compounds, then the remaining side tables in document order.
//! The contract is this section order, not source line order.

use laddercore_ir::{
    AnchorKind, CounterKind, Instruction, IrDocument, Opcode, OpcodeCategory, TimerKind,
};

/// Format an IR document as Ladder-Logic text
pub fn format(doc: &IrDocument) -> String {
    let mut conditions: Vec<String> = Vec::new();
    let mut updates: Vec<String> = Vec::new();
    let mut bitwise: Vec<String> = Vec::new();
    let mut nested: Vec<String> = Vec::new();

    for (index, inst) in doc.instructions.iter().enumerate() {
        match inst.opcode {
            Opcode::Mov => updates.push(format_update(inst)),
            Opcode::Nested => nested.push(format!(
                "NESTED {}",
                inst.operands.join(&format!(" {} ", inst.opcode.join_operator()))
            )),
            Opcode::Unrecognized => conditions.push(inst.operands.join(" ")),
            op if op.category() == OpcodeCategory::Bitwise => {
                let mut line = op.mnemonic().to_string();
                for operand in &inst.operands {
                    line.push(' ');
                    line.push_str(operand);
                }
                bitwise.push(line);
            }
            _ => conditions.push(format_condition(index, inst)),
        }
    }

    let mut lines = conditions;
    lines.extend(updates);
    for (id, op) in &doc.math_operations {
        let mut line = format!("{} {id}", op.operation.mnemonic());
        for operand in &op.operands {
            line.push(' ');
            line.push_str(operand);
        }
        lines.push(line);
    }
    lines.extend(bitwise);
    for jump in &doc.jump_instructions {
        if jump.target.is_empty() {
            lines.push(jump.kind.mnemonic().to_string());
        } else {
            lines.push(format!("{} {}", jump.kind.mnemonic(), jump.target));
        }
    }
    lines.extend(nested);

    for (id, timer) in &doc.timers {
        if timer.kind == TimerKind::Reset {
            lines.push(format!("RES {id}"));
            continue;
        }
        let mut line = format!("{} {id} {}", timer.kind.mnemonic(), timer.duration_ms);
        if let Some(slot) = &timer.slot {
            line.push(' ');
            line.push_str(slot);
        }
        lines.push(line);
    }

    for (id, counter) in &doc.counters {
        if counter.kind == CounterKind::Reset {
            lines.push(format!("RES {id}"));
        } else {
            lines.push(format!("{} {id} {}", counter.kind.mnemonic(), counter.preset));
        }
    }

    for (id, cmp) in &doc.comparators {
        let mut line = format!("{} {id}", cmp.comparison.mnemonic());
        for operand in &cmp.operands {
            line.push(' ');
            line.push_str(operand);
        }
        lines.push(line);
    }

    for (id, latch) in &doc.latches {
        lines.push(format!("{} {id}", latch.kind.mnemonic()));
    }

    for (id, block) in &doc.function_blocks {
        let mut line = format!("{} {id}", block.kind);
        for operand in &block.operands {
            line.push(' ');
            line.push_str(operand);
        }
        lines.push(line);
    }

    for clause in &doc.anchoring {
        let mut line = format!("ANCHOR {}", clause.kind.as_str());
        if let Some(slot) = &clause.slot {
            line.push(' ');
            line.push_str(slot);
        }
        if clause.kind == AnchorKind::VerifiableHash {
            if let Some(hex) = clause.digest_hex() {
                line.push(' ');
                line.push_str(&hex);
            }
        }
        lines.push(line);
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// `XIC <expr> OTE <description>`
fn format_condition(index: usize, inst: &Instruction) -> String {
    let expr = if inst.operands.is_empty() {
        "true".to_string()
    } else {
        inst.operands.join(&format!(" {} ", inst.opcode.join_operator()))
    };
    let description = inst.description.clone().unwrap_or_else(|| {
        format!(
            "condition {index}: {}",
            inst.opcode.mnemonic().to_ascii_lowercase()
        )
    });
    format!("XIC {expr} OTE {description}")
}

/// `MOV <assignment>` state-update templates
fn format_update(inst: &Instruction) -> String {
    let mut line = String::from("MOV");
    for operand in &inst.operands {
        line.push(' ');
        line.push_str(operand);
    }
    line
}
