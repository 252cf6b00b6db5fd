//! # Ladder-Logic Parser
//!
//! Builds a fresh IR document from Ladder-Logic text. Each non-blank line's
//! leading token is the case-insensitive opcode; remaining tokens are
//! operands. Nested-logic opcodes are grouped through a nesting stack and
//! combined into one compound instruction when the group closes (on the next
//! non-nested line or at end of input).
//!
//! Nothing is silently dropped: lines outside every family are recorded as
//! unrecognized instructions and reported through the diagnostics list.

use crate::lexer::tokenize_line;
use laddercore_ir::{
    AnchoringClause, Counter, CounterKind, Diagnostic, DiagnosticKind, FunctionBlock,
    Instruction, IrDocument, JumpKind, Latch, LatchKind, Limits, MathOperation, NestingFrame,
    NestingStack, Opcode, OpcodeCategory, Timer, TimerKind,
};
use laddercore_ir::{Comparator, InstructionTables};

/// Parse Ladder-Logic text into an IR document plus diagnostics
pub fn parse(
    source: &str,
    tables: &InstructionTables,
    limits: &Limits,
) -> (IrDocument, Vec<Diagnostic>) {
    let mut doc = IrDocument::new();
    let mut diagnostics = Vec::new();
    let mut stack = NestingStack::new(limits.max_nesting_depth);
    // Index of a contact instruction eligible to seed the next nesting group
    let mut pending_contact: Option<usize> = None;

    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no + 1;

        // Rung template produced by the reverse direction:
        // XIC <expr> OTE <description>
        if let Some(inst) = parse_rung_template(line.trim()) {
            close_group(&mut doc, &mut stack, &mut pending_contact);
            doc.record_scan("XIC");
            doc.push_instruction(inst);
            continue;
        }

        let tokens = tokenize_line(line);
        let Some((mnemonic, operands)) = tokens.split_first() else {
            continue;
        };
        let operands: Vec<String> = operands.to_vec();

        if mnemonic.eq_ignore_ascii_case("ANCHOR") {
            close_group(&mut doc, &mut stack, &mut pending_contact);
            doc.record_scan(mnemonic.to_ascii_uppercase());
            parse_anchor(&mut doc, &mut diagnostics, line_no, &operands);
            continue;
        }

        let Some(opcode) = tables.opcode_for(mnemonic) else {
            close_group(&mut doc, &mut stack, &mut pending_contact);
            doc.record_scan(mnemonic.to_ascii_uppercase());
            diagnostics.push(Diagnostic::new(
                line_no,
                DiagnosticKind::UnrecognizedOpcode,
                format!("unknown instruction: {mnemonic}"),
            ));
            let mut kept = vec![mnemonic.to_ascii_uppercase()];
            kept.extend(operands);
            doc.push_instruction(Instruction::new(Opcode::Unrecognized, kept));
            continue;
        };

        doc.record_scan(mnemonic.to_ascii_uppercase());

        if opcode.is_nested_logic() {
            push_nested(
                &mut doc,
                &mut diagnostics,
                &mut stack,
                &mut pending_contact,
                line_no,
                opcode,
                &operands,
            );
            continue;
        }

        // Any non-nested opcode closes an open nesting group
        close_group(&mut doc, &mut stack, &mut pending_contact);

        match opcode.category() {
            OpcodeCategory::Contact => {
                let index = doc.push_instruction(Instruction::new(opcode, operands));
                pending_contact = Some(index);
            }
            OpcodeCategory::Coil | OpcodeCategory::Bitwise | OpcodeCategory::Compound => {
                let operands = if opcode == Opcode::Nested {
                    strip_join_symbols(operands)
                } else {
                    operands
                };
                doc.push_instruction(Instruction::new(opcode, operands));
            }
            OpcodeCategory::Timer => {
                parse_timer(&mut doc, &mut diagnostics, line_no, opcode, operands);
            }
            OpcodeCategory::Counter => {
                parse_counter(&mut doc, &mut diagnostics, line_no, opcode, operands);
            }
            OpcodeCategory::Arithmetic | OpcodeCategory::AdvancedMath => {
                if opcode == Opcode::Mov && is_state_update(&operands) {
                    doc.push_instruction(Instruction::new(opcode, operands));
                } else if operands.len() >= 2 {
                    doc.math_operations.insert(
                        operands[0].clone(),
                        MathOperation {
                            operation: opcode,
                            operands: operands[1..].to_vec(),
                        },
                    );
                } else {
                    doc.push_instruction(Instruction::new(opcode, operands));
                }
            }
            OpcodeCategory::Comparison => {
                if operands.len() >= 2 {
                    doc.comparators.insert(
                        operands[0].clone(),
                        Comparator {
                            comparison: opcode,
                            operands: operands[1..].to_vec(),
                        },
                    );
                } else {
                    doc.push_instruction(Instruction::new(opcode, operands));
                }
            }
            OpcodeCategory::Latch => {
                if let (Some(id), Some(kind)) = (operands.first(), LatchKind::from_opcode(opcode))
                {
                    doc.latches.insert(id.clone(), Latch { kind });
                } else {
                    doc.push_instruction(Instruction::new(opcode, operands));
                }
            }
            OpcodeCategory::Jump => {
                let kind = JumpKind::from_opcode(opcode)
                    .expect("jump-family opcode maps to a jump kind");
                let target = operands.first().cloned().unwrap_or_default();
                doc.push_jump(kind, target);
            }
            OpcodeCategory::FunctionBlock => {
                if let Some(id) = operands.first() {
                    doc.function_blocks.insert(
                        id.clone(),
                        FunctionBlock {
                            kind: opcode.mnemonic().to_string(),
                            operands: operands[1..].to_vec(),
                        },
                    );
                } else {
                    doc.push_instruction(Instruction::new(opcode, operands));
                }
            }
            OpcodeCategory::NestedLogic | OpcodeCategory::Unknown => {
                // Nested handled above; Unknown only reachable from custom
                // tables routing a name to Unrecognized
                doc.push_instruction(Instruction::new(opcode, operands));
            }
        }
    }

    close_group(&mut doc, &mut stack, &mut pending_contact);
    (doc, diagnostics)
}

fn push_nested(
    doc: &mut IrDocument,
    diagnostics: &mut Vec<Diagnostic>,
    stack: &mut NestingStack,
    pending_contact: &mut Option<usize>,
    line_no: usize,
    opcode: Opcode,
    operands: &[String],
) {
    // A contact read just before the group opens becomes the left-hand side
    // of the compound condition
    if stack.is_empty() {
        if let Some(index) = pending_contact.take() {
            if index + 1 == doc.instructions.len() {
                let contact = doc.instructions.pop().expect("pending contact exists");
                stack.seed(&contact.operands);
            }
        }
    }

    let frame = NestingFrame {
        opcode,
        operands: strip_join_symbols(operands.to_vec()),
    };
    if let Err(overflow) = stack.push(frame) {
        diagnostics.push(Diagnostic::new(
            line_no,
            DiagnosticKind::NestingOverflow,
            format!(
                "nesting depth {} exceeds maximum {}",
                overflow.depth, overflow.max_depth
            ),
        ));
        // Kept as a plain instruction so the validator sees the depth
        doc.push_instruction(Instruction::new(opcode, operands.to_vec()));
    }
}

fn close_group(
    doc: &mut IrDocument,
    stack: &mut NestingStack,
    pending_contact: &mut Option<usize>,
) {
    if let Some(compound) = stack.drain() {
        doc.push_instruction(compound);
    }
    *pending_contact = None;
}

/// Parse `XIC <expr> OTE <description>` back into a condition instruction.
/// A canonical `condition <i>: <mnemonic>` description restores the original
/// opcode; any other description is kept verbatim.
fn parse_rung_template(line: &str) -> Option<Instruction> {
    let rest = line.strip_prefix("XIC ")?;
    let (expr, description) = rest.split_once(" OTE ")?;
    let expr = expr.trim();

    let canonical = description
        .strip_prefix("condition ")
        .and_then(|tail| tail.split_once(": "))
        .filter(|(index, _)| index.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|(_, mnemonic)| Opcode::from_mnemonic(mnemonic));

    Some(match canonical {
        // Canonical descriptions restore the opcode; its own arity governs
        // the split operand list
        Some(opcode) => {
            let operands: Vec<String> = if expr == "true" {
                Vec::new()
            } else {
                expr.split("&&")
                    .flat_map(|part| part.split("||"))
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            };
            Instruction::new(opcode, operands)
        }
        // Free-form descriptions keep the expression as one operand
        None => {
            let operands: Vec<String> = if expr == "true" {
                Vec::new()
            } else {
                vec![expr.to_string()]
            };
            Instruction::new(Opcode::Xic, operands).with_description(description)
        }
    })
}

/// `MOV timestamp <n>` and `MOV <id> <op>= <n>` are state updates, kept as
/// instructions rather than keyed math operations
fn is_state_update(operands: &[String]) -> bool {
    match operands {
        [first, _] => first == "timestamp",
        [_, op, _] => op.len() == 2 && op.ends_with('=') && !op.starts_with('='),
        _ => false,
    }
}

/// Drop nested mnemonics and boolean join symbols from a nested opcode's
/// operand list, keeping only condition identifiers
fn strip_join_symbols(operands: Vec<String>) -> Vec<String> {
    operands
        .into_iter()
        .filter(|op| {
            op != "&&"
                && op != "||"
                && !Opcode::from_mnemonic(op)
                    .map(|o| o.is_nested_logic())
                    .unwrap_or(false)
        })
        .collect()
}

fn parse_timer(
    doc: &mut IrDocument,
    diagnostics: &mut Vec<Diagnostic>,
    line_no: usize,
    opcode: Opcode,
    operands: Vec<String>,
) {
    let kind = TimerKind::from_opcode(opcode).expect("timer-family opcode maps to a timer kind");

    // RES takes a bare identifier
    if kind == TimerKind::Reset {
        if let Some(id) = operands.first() {
            doc.timers.insert(
                id.clone(),
                Timer {
                    kind,
                    duration_ms: 0,
                    slot: None,
                },
            );
        } else {
            doc.push_instruction(Instruction::new(opcode, operands));
        }
        return;
    }

    if operands.len() < 2 {
        // Kept with the arity defect marked by the validator
        doc.push_instruction(Instruction::new(opcode, operands));
        return;
    }

    let duration_ms = parse_value(diagnostics, line_no, "duration", &operands[1]);
    doc.timers.insert(
        operands[0].clone(),
        Timer {
            kind,
            duration_ms,
            slot: operands.get(2).cloned(),
        },
    );
}

fn parse_counter(
    doc: &mut IrDocument,
    diagnostics: &mut Vec<Diagnostic>,
    line_no: usize,
    opcode: Opcode,
    operands: Vec<String>,
) {
    let kind = CounterKind::from_opcode(opcode).expect("counter-family opcode maps to a kind");
    if operands.len() < 2 {
        doc.push_instruction(Instruction::new(opcode, operands));
        return;
    }
    let preset = parse_value(diagnostics, line_no, "preset", &operands[1]);
    doc.counters.insert(operands[0].clone(), Counter { kind, preset });
}

/// Parse a numeric field, reporting failures and substituting -1 so the
/// typing check flags the entry instead of the parser crashing
fn parse_value(
    diagnostics: &mut Vec<Diagnostic>,
    line_no: usize,
    field: &str,
    raw: &str,
) -> i64 {
    match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            diagnostics.push(Diagnostic::new(
                line_no,
                DiagnosticKind::UnparsedValue,
                format!("{field} is not an integer: {raw}"),
            ));
            -1
        }
    }
}

fn parse_anchor(
    doc: &mut IrDocument,
    diagnostics: &mut Vec<Diagnostic>,
    line_no: usize,
    operands: &[String],
) {
    let clause = match operands.first().map(String::as_str) {
        Some("slot-bound") => operands.get(1).map(|s| AnchoringClause::slot_bound(s.clone())),
        Some("immediate") => operands.get(1).map(|s| AnchoringClause::immediate(s.clone())),
        Some("finality-deferred") => Some(AnchoringClause::finality_deferred()),
        Some("verifiable-hash") => match (operands.get(1), operands.get(2)) {
            (Some(slot), Some(payload)) => {
                // A 64-digit hex operand is taken as a precomputed digest
                match AnchoringClause::parse_digest_hex(payload) {
                    Some(digest) => Some(AnchoringClause::with_digest(slot, digest)),
                    None => Some(AnchoringClause::verifiable_hash(slot, payload.as_bytes())),
                }
            }
            _ => None,
        },
        _ => None,
    };

    match clause {
        Some(clause) => doc.anchoring.push(clause),
        None => {
            diagnostics.push(Diagnostic::new(
                line_no,
                DiagnosticKind::UnparsedValue,
                format!("malformed anchor directive: ANCHOR {}", operands.join(" ")),
            ));
            let mut kept = vec!["ANCHOR".to_string()];
            kept.extend(operands.iter().cloned());
            doc.push_instruction(Instruction::new(Opcode::Unrecognized, kept));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laddercore_ir::AnchorKind;

    fn parse_builtin(source: &str) -> (IrDocument, Vec<Diagnostic>) {
        let tables = InstructionTables::builtin();
        parse(source, &tables, &Limits::default())
    }

    #[test]
    fn test_contact_and_coil() {
        let (doc, diags) = parse_builtin("INPUT X1\nOUTPUT Y1");
        assert!(diags.is_empty());
        assert_eq!(doc.instructions.len(), 2);
        assert_eq!(doc.instructions[0].opcode, Opcode::Input);
        assert_eq!(doc.instructions[1].opcode, Opcode::Output);
        assert_eq!(doc.scan_cycle, vec!["INPUT", "OUTPUT"]);
    }

    #[test]
    fn test_nested_group_seeded_by_contact() {
        // Scenario A: one compound condition over X1, X2 and one coil for Y1
        let (doc, diags) = parse_builtin("INPUT X1\nAND X2\nOUTPUT Y1");
        assert!(diags.is_empty());
        assert_eq!(doc.instructions.len(), 2);
        assert_eq!(doc.instructions[0].opcode, Opcode::Nested);
        assert_eq!(
            doc.instructions[0].operands,
            vec!["X1".to_string(), "X2".to_string()]
        );
        assert_eq!(doc.instructions[1].opcode, Opcode::Output);
        assert_eq!(doc.instructions[1].operands, vec!["Y1".to_string()]);
    }

    #[test]
    fn test_nested_group_drains_at_end_of_input() {
        let (doc, _) = parse_builtin("AND X1\nOR X2");
        assert_eq!(doc.instructions.len(), 1);
        assert_eq!(doc.instructions[0].opcode, Opcode::Nested);
        // LIFO: last-pushed frame's operands lead
        assert_eq!(
            doc.instructions[0].operands,
            vec!["X2".to_string(), "X1".to_string()]
        );
    }

    #[test]
    fn test_parenthesized_nested_operands() {
        let (doc, _) = parse_builtin("INPUT X1\nOR (X3 AND X4)\nOUTPUT Y1");
        assert_eq!(doc.instructions[0].opcode, Opcode::Nested);
        assert_eq!(
            doc.instructions[0].operands,
            vec!["X1".to_string(), "X3".to_string(), "X4".to_string()]
        );
    }

    #[test]
    fn test_timer_with_duration() {
        // Scenario B
        let (doc, diags) = parse_builtin("TON T1 1000");
        assert!(diags.is_empty());
        let timer = &doc.timers["T1"];
        assert_eq!(timer.kind, TimerKind::OnDelay);
        assert_eq!(timer.duration_ms, 1000);
        assert!(timer.slot.is_none());
    }

    #[test]
    fn test_timer_with_slot_binding() {
        let (doc, _) = parse_builtin("TON T1 1000 slot42");
        assert_eq!(doc.timers["T1"].slot.as_deref(), Some("slot42"));
    }

    #[test]
    fn test_timer_unparseable_duration() {
        let (doc, diags) = parse_builtin("TON T1 soon");
        assert_eq!(doc.timers["T1"].duration_ms, -1);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnparsedValue);
    }

    #[test]
    fn test_timer_missing_operands_kept_as_defect() {
        let (doc, _) = parse_builtin("TON T1");
        assert!(doc.timers.is_empty());
        assert_eq!(doc.instructions[0].opcode, Opcode::Ton);
    }

    #[test]
    fn test_reset_timer_single_operand() {
        let (doc, _) = parse_builtin("RES T1");
        assert_eq!(doc.timers["T1"].kind, TimerKind::Reset);
    }

    #[test]
    fn test_counter() {
        let (doc, _) = parse_builtin("CTU C1 10\nCTD C2 3");
        assert_eq!(doc.counters["C1"].kind, CounterKind::Up);
        assert_eq!(doc.counters["C1"].preset, 10);
        assert_eq!(doc.counters["C2"].kind, CounterKind::Down);
    }

    #[test]
    fn test_math_operation() {
        let (doc, _) = parse_builtin("ADD C A B");
        let op = &doc.math_operations["C"];
        assert_eq!(op.operation, Opcode::Add);
        assert_eq!(op.operands, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_advanced_math() {
        let (doc, _) = parse_builtin("SQRT R X");
        assert_eq!(doc.math_operations["R"].operation, Opcode::Sqrt);
    }

    #[test]
    fn test_comparator() {
        let (doc, _) = parse_builtin("GRT K A B");
        let cmp = &doc.comparators["K"];
        assert_eq!(cmp.comparison, Opcode::Grt);
        assert_eq!(cmp.operands, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_latches() {
        let (doc, _) = parse_builtin("SR Q1\nRS Q2");
        assert_eq!(doc.latches["Q1"].kind, LatchKind::SetDominant);
        assert_eq!(doc.latches["Q2"].kind, LatchKind::ResetDominant);
    }

    #[test]
    fn test_jump_entries_ordered() {
        let (doc, _) = parse_builtin("JMP L1\nLBL L1\nJSR SUB1\nRET");
        assert_eq!(doc.jump_instructions.len(), 4);
        assert_eq!(doc.jump_instructions[0].kind, JumpKind::Jmp);
        assert_eq!(doc.jump_instructions[0].target, "L1");
        assert_eq!(doc.jump_instructions[3].kind, JumpKind::Ret);
        assert_eq!(doc.jump_instructions[3].target, "");
    }

    #[test]
    fn test_call_alias() {
        let (doc, _) = parse_builtin("CALL FB1");
        assert_eq!(doc.jump_instructions[0].kind, JumpKind::Jsr);
    }

    #[test]
    fn test_function_block_with_selection() {
        let (doc, _) = parse_builtin("FB FB1 A B\nMUX M1 IN1 IN2 IN3");
        assert_eq!(doc.function_blocks["FB1"].kind, "FB");
        assert_eq!(
            doc.function_blocks["M1"].operands,
            vec!["IN1".to_string(), "IN2".to_string(), "IN3".to_string()]
        );
    }

    #[test]
    fn test_unrecognized_not_dropped() {
        let (doc, diags) = parse_builtin("FROB A B");
        assert_eq!(doc.instructions[0].opcode, Opcode::Unrecognized);
        assert_eq!(
            doc.instructions[0].operands,
            vec!["FROB".to_string(), "A".to_string(), "B".to_string()]
        );
        assert_eq!(diags[0].kind, DiagnosticKind::UnrecognizedOpcode);
        assert_eq!(doc.scan_cycle, vec!["FROB"]);
    }

    #[test]
    fn test_case_insensitive_opcodes() {
        let (doc, _) = parse_builtin("input X1\nton T1 500");
        assert_eq!(doc.instructions[0].opcode, Opcode::Input);
        assert_eq!(doc.timers["T1"].duration_ms, 500);
    }

    #[test]
    fn test_anchor_directives() {
        let (doc, diags) = parse_builtin(
            "ANCHOR slot-bound slot42\nANCHOR finality-deferred\nANCHOR verifiable-hash slot7 payload",
        );
        assert!(diags.is_empty());
        assert_eq!(doc.anchoring.len(), 3);
        assert_eq!(doc.anchoring[0].kind, AnchorKind::SlotBound);
        assert_eq!(doc.anchoring[1].kind, AnchorKind::FinalityDeferred);
        assert_eq!(doc.anchoring[2].kind, AnchorKind::VerifiableHash);
        assert!(doc.anchoring[2].digest.is_some());
    }

    #[test]
    fn test_malformed_anchor_kept() {
        let (doc, diags) = parse_builtin("ANCHOR sideways");
        assert_eq!(doc.instructions[0].opcode, Opcode::Unrecognized);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_nesting_overflow_reported() {
        let tables = InstructionTables::builtin();
        let limits = Limits::new(2).unwrap();
        let source = "AND A\nAND B\nAND C";
        let (doc, diags) = parse(source, &tables, &limits);
        assert!(diags
            .iter()
            .any(|d| d.kind == DiagnosticKind::NestingOverflow));
        // Two frames combined; the overflowing line kept as plain instruction
        assert_eq!(doc.instructions.len(), 2);
    }

    #[test]
    fn test_rung_template_restores_opcode() {
        let (doc, diags) = parse_builtin("XIC X1 && X2 OTE condition 0: nested");
        assert!(diags.is_empty());
        assert_eq!(doc.instructions[0].opcode, Opcode::Nested);
        assert_eq!(
            doc.instructions[0].operands,
            vec!["X1".to_string(), "X2".to_string()]
        );
        assert!(doc.instructions[0].description.is_none());
    }

    #[test]
    fn test_rung_template_keeps_free_description() {
        let (doc, _) = parse_builtin("XIC balance >= 100 OTE Check balance >= 100");
        assert_eq!(doc.instructions[0].opcode, Opcode::Xic);
        assert_eq!(
            doc.instructions[0].description.as_deref(),
            Some("Check balance >= 100")
        );
    }

    #[test]
    fn test_blank_lines_ignored() {
        let (doc, _) = parse_builtin("\n\nINPUT X1\n\n");
        assert_eq!(doc.instructions.len(), 1);
        assert_eq!(doc.scan_cycle.len(), 1);
    }
}
