//! # Script Extraction Rules
//!
//! Reconstructs an IR document from validator-script text. Each line runs
//! through an ordered rule list and the first match wins:
//!
//! 1. validity-window clause -> ON-delay timer with a synthesized identifier
//! 2. timestamp datum -> state-update instruction
//! 3. assertion clause -> classified by its description shape
//! 4. comparison expression (`if X <op> Y`) -> comparator
//! 5. state assignment (`let V = A <op> B`) -> math operation, plus a
//!    shorthand update when the left-hand identifier recurs on the right
//! 6. bit-shift assignment -> bitwise instruction
//! 7. control-flow mnemonics -> jump-table entries
//! 8. nested-logic mnemonics -> nesting frames, combined LIFO
//!
//! Lines matching nothing become unrecognized instructions; no input content
//! silently vanishes.

use laddercore_ir::{
    AnchoringClause, Comparator, Counter, CounterKind, Diagnostic, DiagnosticKind, FunctionBlock,
    Instruction, InstructionTables, IrDocument, JumpKind, Latch, LatchKind, Limits,
    MathOperation, NestingFrame, NestingStack, Opcode, OpcodeCategory, Timer, TimerKind,
};
use regex::Regex;
use std::collections::BTreeMap;

/// Compiled extraction patterns; built once per translator construction
#[derive(Debug)]
pub struct ExtractionRules {
    window: Regex,
    timestamp: Regex,
    assertion: Regex,
    comparison: Regex,
    assignment: Regex,
    shift: Regex,
    control: Regex,
    digest: Regex,

    desc_timer: Regex,
    desc_counter: Regex,
    desc_math: Regex,
    desc_compare: Regex,
    desc_latch: Regex,
    desc_block: Regex,
    desc_condition: Regex,

    bound_expr: Regex,
    unary_expr: Regex,
}

impl ExtractionRules {
    pub fn new() -> Self {
        Self {
            window: Regex::new(r"^must-validate-in \(from ([A-Za-z0-9_]+)\)$")
                .expect("window pattern compiles"),
            timestamp: Regex::new(r"^(?:timestamp|POSIXTime)\s+(\d+)$")
                .expect("timestamp pattern compiles"),
            assertion: Regex::new(r#"^(?:assert-if-false|traceIfFalse) "([^"]*)" \((.*)\)$"#)
                .expect("assertion pattern compiles"),
            comparison: Regex::new(r"^if (\w+) ([=!<>]=?) ([\w.]+)$")
                .expect("comparison pattern compiles"),
            assignment: Regex::new(r"^let (\w+) = (\w+) ([+\-*/%]) (\w+)$")
                .expect("assignment pattern compiles"),
            shift: Regex::new(r"^let (\w+) = (\w+) (SHL|SHR|ROL|ROR) (\w+)$")
                .expect("shift pattern compiles"),
            control: Regex::new(r"^(JMP|LBL|JSR|RET)(?:\s+(\w+))?$")
                .expect("control pattern compiles"),
            digest: Regex::new(r"^-- anchor-digest ([0-9a-fA-F]{64})$")
                .expect("digest pattern compiles"),

            desc_timer: Regex::new(
                r"^timer (\S+) (on-delay|off-delay|pulse|retentive|reset)(?: from (\S+))?$",
            )
            .expect("timer description pattern compiles"),
            desc_counter: Regex::new(r"^counter (\S+) (up|down|up-down|reset)$")
                .expect("counter description pattern compiles"),
            desc_math: Regex::new(r"^math (\S+) ([a-z_]+)$")
                .expect("math description pattern compiles"),
            desc_compare: Regex::new(r"^compare (\S+) ([a-z]+)$")
                .expect("compare description pattern compiles"),
            desc_latch: Regex::new(r"^latch (\S+) (set-dominant|reset-dominant)$")
                .expect("latch description pattern compiles"),
            desc_block: Regex::new(r"^block (\S+) (\S+)$")
                .expect("block description pattern compiles"),
            desc_condition: Regex::new(r"^condition \d+: ([a-z_]+)$")
                .expect("condition description pattern compiles"),

            bound_expr: Regex::new(r"^(\S+) (>=|<=|==) (-?\d+)$")
                .expect("bound expression pattern compiles"),
            unary_expr: Regex::new(r"^(\S+) == ([a-z]+)\((\S+)\)$")
                .expect("unary expression pattern compiles"),
        }
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract an IR document from validator-script text
pub fn extract(
    source: &str,
    rules: &ExtractionRules,
    tables: &InstructionTables,
    limits: &Limits,
) -> (IrDocument, Vec<Diagnostic>) {
    let mut ex = Extraction {
        doc: IrDocument::new(),
        diagnostics: Vec::new(),
        stack: NestingStack::new(limits.max_nesting_depth),
        synthesized: BTreeMap::new(),
        synthesized_count: 0,
        pending_digest: None,
    };

    for (line_no, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        ex.process_line(line_no + 1, line, rules, tables);
    }
    ex.close_group();

    (ex.doc, ex.diagnostics)
}

struct Extraction {
    doc: IrDocument,
    diagnostics: Vec<Diagnostic>,
    stack: NestingStack,
    /// Slot -> synthesized timer ids, so a later named timer assertion bound
    /// to the same slot can reclaim the window
    synthesized: BTreeMap<String, Vec<String>>,
    synthesized_count: usize,
    pending_digest: Option<[u8; 32]>,
}

impl Extraction {
    fn process_line(
        &mut self,
        line_no: usize,
        line: &str,
        rules: &ExtractionRules,
        tables: &InstructionTables,
    ) {
        // Comment markers first: they carry anchoring state
        if let Some(caps) = rules.digest.captures(line) {
            self.close_group();
            self.doc.record_scan("ANCHOR");
            self.pending_digest = AnchoringClause::parse_digest_hex(&caps[1]);
            return;
        }
        if line == "-- deferred-anchor" {
            self.close_group();
            self.doc.record_scan("ANCHOR");
            self.doc.anchoring.push(AnchoringClause::finality_deferred());
            return;
        }
        if line.starts_with("--") {
            // Plain annotation; inert
            return;
        }

        // Rule 1: validity-window clause
        if let Some(caps) = rules.window.captures(line) {
            self.close_group();
            let slot = caps[1].to_string();
            if let Some(digest) = self.pending_digest.take() {
                self.doc.record_scan("ANCHOR");
                self.doc
                    .anchoring
                    .push(AnchoringClause::with_digest(slot, digest));
            } else {
                self.synthesized_count += 1;
                let id = format!("Timer{}", self.synthesized_count);
                self.doc.record_scan("TON");
                self.doc.timers.insert(
                    id.clone(),
                    Timer {
                        kind: TimerKind::OnDelay,
                        duration_ms: 0,
                        slot: Some(slot.clone()),
                    },
                );
                self.synthesized.entry(slot).or_default().push(id);
            }
            return;
        }

        // Rule 2: explicit timestamp datum
        if let Some(caps) = rules.timestamp.captures(line) {
            self.close_group();
            self.doc.record_scan("MOV");
            self.doc.push_instruction(Instruction::new(
                Opcode::Mov,
                ["timestamp".to_string(), caps[1].to_string()],
            ));
            return;
        }

        // Rule 3: assertion clause
        if let Some(caps) = rules.assertion.captures(line) {
            self.close_group();
            let description = caps[1].to_string();
            let expr = caps[2].to_string();
            self.classify_assertion(&description, &expr, rules, tables);
            return;
        }

        // Rule 4: comparison expression
        if let Some(caps) = rules.comparison.captures(line) {
            if let Some(op) = tables.opcode_for_symbol(&caps[2]) {
                if op.category() == OpcodeCategory::Comparison {
                    self.close_group();
                    self.doc.record_scan(op.mnemonic());
                    self.doc.comparators.insert(
                        caps[1].to_string(),
                        Comparator {
                            comparison: op,
                            operands: vec![caps[3].to_string()],
                        },
                    );
                    return;
                }
            }
        }

        // Rule 5: state assignment
        if let Some(caps) = rules.assignment.captures(line) {
            if let Some(op) = tables.opcode_for_symbol(&caps[3]) {
                self.close_group();
                let (dest, a, b) = (&caps[1], &caps[2], &caps[4]);
                self.doc.record_scan(op.mnemonic());
                self.doc.math_operations.insert(
                    dest.to_string(),
                    MathOperation {
                        operation: op,
                        operands: vec![a.to_string(), b.to_string()],
                    },
                );
                // `counter = counter + 1` is additionally a shorthand update
                if dest == a || dest == b {
                    let other = if dest == a { b } else { a };
                    self.doc.push_instruction(Instruction::new(
                        Opcode::Mov,
                        [
                            dest.to_string(),
                            format!("{}=", &caps[3]),
                            other.to_string(),
                        ],
                    ));
                }
                return;
            }
        }

        // Rule 6: bit-shift assignment
        if let Some(caps) = rules.shift.captures(line) {
            if let Some(op) = Opcode::from_mnemonic(&caps[3]) {
                self.close_group();
                self.doc.record_scan(op.mnemonic());
                self.doc.push_instruction(Instruction::new(
                    op,
                    [caps[1].to_string(), caps[2].to_string(), caps[4].to_string()],
                ));
                return;
            }
        }

        // Rule 7: control-flow mnemonics
        if let Some(caps) = rules.control.captures(line) {
            if let Some(kind) = Opcode::from_mnemonic(&caps[1]).and_then(JumpKind::from_opcode) {
                self.close_group();
                self.doc.record_scan(caps[1].to_ascii_uppercase());
                let target = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
                self.doc.push_jump(kind, target);
                return;
            }
        }

        // Rule 8: lines carrying nested-logic mnemonics
        if self.try_nested(line_no, line) {
            return;
        }

        // No rule matched: keep the line as an unrecognized instruction
        self.close_group();
        self.doc.record_scan("UNRECOGNIZED");
        self.diagnostics.push(Diagnostic::new(
            line_no,
            DiagnosticKind::ExtractionAmbiguity,
            format!("no extraction rule matched: {line}"),
        ));
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        self.doc
            .push_instruction(Instruction::new(Opcode::Unrecognized, tokens));
    }

    fn classify_assertion(
        &mut self,
        description: &str,
        expr: &str,
        rules: &ExtractionRules,
        tables: &InstructionTables,
    ) {
        // Timer assertion
        if let Some(caps) = rules.desc_timer.captures(description) {
            let id = caps[1].to_string();
            let kind = TimerKind::from_str_name(&caps[2]).expect("matched by pattern");
            let slot = caps.get(3).map(|m| m.as_str().to_string());
            let duration_ms = if kind == TimerKind::Reset {
                0
            } else {
                bound_value(rules, expr)
            };
            // A named timer bound to a slot supersedes the synthesized
            // window-only timer for that slot
            if let Some(slot) = &slot {
                if let Some(ids) = self.synthesized.get_mut(slot) {
                    if let Some(stale) = ids.pop() {
                        self.doc.timers.remove(&stale);
                    }
                }
            }
            self.doc.record_scan(kind.mnemonic());
            self.doc.timers.insert(id, Timer { kind, duration_ms, slot });
            return;
        }

        // Counter assertion
        if let Some(caps) = rules.desc_counter.captures(description) {
            let kind = CounterKind::from_str_name(&caps[2]).expect("matched by pattern");
            let preset = if kind == CounterKind::Reset {
                0
            } else {
                bound_value(rules, expr)
            };
            self.doc.record_scan(kind.mnemonic());
            self.doc
                .counters
                .insert(caps[1].to_string(), Counter { kind, preset });
            return;
        }

        // Math assertion
        if let Some(caps) = rules.desc_math.captures(description) {
            if let Some(op) = Opcode::from_mnemonic(&caps[2]).filter(|o| {
                matches!(
                    o.category(),
                    OpcodeCategory::Arithmetic | OpcodeCategory::AdvancedMath
                )
            }) {
                let id = caps[1].to_string();
                let operands = math_operands(rules, tables, &id, op, expr);
                self.doc.record_scan(op.mnemonic());
                self.doc
                    .math_operations
                    .insert(id, MathOperation { operation: op, operands });
                return;
            }
        }

        // Comparator assertion
        if let Some(caps) = rules.desc_compare.captures(description) {
            if let Some(op) = Opcode::from_mnemonic(&caps[2])
                .filter(|o| o.category() == OpcodeCategory::Comparison)
            {
                let id = caps[1].to_string();
                let sym = tables.symbol_for(op).unwrap_or("==");
                let parts: Vec<String> = expr
                    .split(&format!(" {sym} "))
                    .map(str::to_string)
                    .collect();
                let operands = match parts.as_slice() {
                    [a, b] if *a == id => vec![b.clone()],
                    _ => parts,
                };
                self.doc.record_scan(op.mnemonic());
                self.doc
                    .comparators
                    .insert(id, Comparator { comparison: op, operands });
                return;
            }
        }

        // Latch assertion
        if let Some(caps) = rules.desc_latch.captures(description) {
            let kind = LatchKind::from_str_name(&caps[2]).expect("matched by pattern");
            self.doc.record_scan(kind.mnemonic());
            self.doc.latches.insert(caps[1].to_string(), Latch { kind });
            return;
        }

        // Function-block assertion
        if let Some(caps) = rules.desc_block.captures(description) {
            let id = caps[1].to_string();
            let operands = if expr == id {
                Vec::new()
            } else {
                expr.split(" && ").map(str::to_string).collect()
            };
            self.doc.record_scan(caps[2].to_ascii_uppercase());
            self.doc.function_blocks.insert(
                id,
                FunctionBlock {
                    kind: caps[2].to_string(),
                    operands,
                },
            );
            return;
        }

        // Canonical condition description
        if let Some(caps) = rules.desc_condition.captures(description) {
            if let Some(op) = Opcode::from_mnemonic(&caps[1]) {
                self.doc.record_scan(op.mnemonic());
                self.doc
                    .push_instruction(Instruction::new(op, split_expression(expr)));
                return;
            }
        }

        // Free-form description: keep the whole expression as one condition
        // operand so the XIC template's declared arity holds
        let operands = if expr == "true" {
            Vec::new()
        } else {
            vec![expr.to_string()]
        };
        self.doc.record_scan("XIC");
        self.doc.push_instruction(
            Instruction::new(Opcode::Xic, operands).with_description(description),
        );
    }

    fn try_nested(&mut self, line_no: usize, line: &str) -> bool {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(opcode) = tokens.iter().find_map(|t| {
            Opcode::from_mnemonic(t).filter(|o| o.is_nested_logic())
        }) else {
            return false;
        };

        let operands: Vec<String> = tokens
            .iter()
            .filter(|t| {
                **t != "&&"
                    && **t != "||"
                    && !Opcode::from_mnemonic(t)
                        .map(|o| o.is_nested_logic())
                        .unwrap_or(false)
            })
            .map(|t| t.trim_matches(|c| c == '(' || c == ')').to_string())
            .filter(|t| !t.is_empty())
            .collect();

        self.doc.record_scan(opcode.mnemonic());
        let frame = NestingFrame { opcode, operands };
        if let Err(overflow) = self.stack.push(frame) {
            self.diagnostics.push(Diagnostic::new(
                line_no,
                DiagnosticKind::NestingOverflow,
                format!(
                    "nesting depth {} exceeds maximum {}",
                    overflow.depth, overflow.max_depth
                ),
            ));
            let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
            self.doc.push_instruction(Instruction::new(opcode, tokens));
        }
        true
    }

    fn close_group(&mut self) {
        if let Some(compound) = self.stack.drain() {
            self.doc.push_instruction(compound);
        }
    }
}

fn math_operands(
    rules: &ExtractionRules,
    tables: &InstructionTables,
    id: &str,
    op: Opcode,
    expr: &str,
) -> Vec<String> {
    if let Some(caps) = rules.unary_expr.captures(expr) {
        if &caps[1] == id {
            return vec![caps[3].to_string()];
        }
    }
    match expr.strip_prefix(&format!("{id} == ")) {
        Some(rhs) if op == Opcode::Mov => vec![rhs.to_string()],
        Some(rhs) => {
            let sym = tables.symbol_for(op).unwrap_or("+");
            rhs.split(&format!(" {sym} ")).map(str::to_string).collect()
        }
        None => vec![expr.to_string()],
    }
}

fn bound_value(rules: &ExtractionRules, expr: &str) -> i64 {
    rules
        .bound_expr
        .captures(expr)
        .and_then(|caps| caps[3].parse::<i64>().ok())
        .unwrap_or(0)
}

/// Split a boolean expression on its join operators into bare operands
fn split_expression(expr: &str) -> Vec<String> {
    if expr == "true" {
        return Vec::new();
    }
    expr.split("&&")
        .flat_map(|part| part.split("||"))
        .map(|part| part.trim().trim_matches(|c| c == '(' || c == ')').to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
