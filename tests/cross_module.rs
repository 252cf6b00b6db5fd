//! Cross-module interaction tests
//!
//! Tests the integration between the forward translator, the reverse
//! translator, and the shared IR validator.

use laddercore_forward::{ForwardTranslator, Mode as ForwardMode};
use laddercore_ir::{
    InstructionTables, Limits, Opcode, TimerKind, ValidationError,
};
use laddercore_reverse::{Mode as ReverseMode, ReverseTranslator};

// ============================================================================
// Forward -> Reverse Tests
// ============================================================================

#[test]
fn test_nested_condition_survives_both_directions() {
    // Scenario A: INPUT X1 / AND X2 / OUTPUT Y1 becomes one compound
    // condition over X1, X2 plus one coil instruction for Y1
    let forward = laddercore_forward::translate("INPUT X1\nAND X2\nOUTPUT Y1").unwrap();
    assert_eq!(forward.ir.instructions.len(), 2);
    assert_eq!(forward.ir.instructions[0].opcode, Opcode::Nested);
    assert_eq!(forward.ir.instructions[0].operands, vec!["X1", "X2"]);
    assert_eq!(forward.ir.instructions[1].opcode, Opcode::Output);

    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    assert!(forward.ir.semantic_eq(&reverse.ir));
}

#[test]
fn test_timer_without_slot_emits_no_window() {
    // Scenario B
    let forward = laddercore_forward::translate("TON T1 1000").unwrap();
    let timer = &forward.ir.timers["T1"];
    assert_eq!(timer.kind, TimerKind::OnDelay);
    assert_eq!(timer.duration_ms, 1000);
    assert!(!forward.script.contains("must-validate-in"));

    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    assert!(forward.ir.semantic_eq(&reverse.ir));
}

#[test]
fn test_window_clause_round_trips_through_forward_emitter() {
    // Scenario C: a bare window reverse-parses to a synthesized ON-delay
    // timer which forward-emits an equivalent window
    let reverse = laddercore_reverse::translate("must-validate-in (from slot42)").unwrap();
    let timer = &reverse.ir.timers["Timer1"];
    assert_eq!(timer.kind, TimerKind::OnDelay);
    assert_eq!(timer.slot.as_deref(), Some("slot42"));

    let forward = laddercore_forward::translate(&reverse.ladder).unwrap();
    assert!(forward.script.contains("must-validate-in (from slot42)"));
}

#[test]
fn test_unresolved_jump_rejected_in_both_directions() {
    // Scenario D
    let forward_err = laddercore_forward::translate("JMP L1").unwrap_err();
    match forward_err {
        laddercore_forward::ForwardError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(
                &errors[0],
                ValidationError::UnresolvedJumpTarget { target } if target == "L1"
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let reverse_err = laddercore_reverse::translate("JMP L1").unwrap_err();
    match reverse_err {
        laddercore_reverse::ReverseError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_full_program_forward_then_reverse() {
    let source = "\
INPUT X1
AND X2
OUTPUT Y1
TON T1 1000
TOF T2 250
CTU C1 10
CTD C2 3
ADD Sum A B
MOV Dst Src
SQRT Root X
GRT K A B
SR Q1
RS Q2
JMP L1
LBL L1
JSR SUB1
RET
FB FB1 A B
MUX M1 IN1 IN2 IN3";

    let forward = laddercore_forward::translate(source).unwrap();
    assert!(forward.report.is_valid());
    assert!(forward.diagnostics.is_empty());

    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    assert!(
        forward.ir.semantic_eq(&reverse.ir),
        "IR mismatch:\nforward: {:#?}\nreverse: {:#?}",
        forward.ir,
        reverse.ir
    );
}

#[test]
fn test_slotted_timer_keeps_identity_across_directions() {
    let forward = laddercore_forward::translate("TON Gate 1000 slot42").unwrap();
    assert!(forward.script.contains("must-validate-in (from slot42)"));

    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    // The named assertion reclaims the synthesized window timer
    assert_eq!(reverse.ir.timers.len(), 1);
    let timer = &reverse.ir.timers["Gate"];
    assert_eq!(timer.duration_ms, 1000);
    assert_eq!(timer.slot.as_deref(), Some("slot42"));
}

#[test]
fn test_anchoring_clauses_across_directions() {
    let source = "ANCHOR finality-deferred\nANCHOR verifiable-hash slot7 payload";
    let forward = laddercore_forward::translate(source).unwrap();
    assert!(forward.script.contains("-- deferred-anchor"));
    assert!(forward.script.contains("-- anchor-digest "));

    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    assert_eq!(reverse.ir.anchoring.len(), 2);
    assert!(forward.ir.semantic_eq(&reverse.ir));
}

// ============================================================================
// Reverse -> Forward Tests
// ============================================================================

#[test]
fn test_imperative_script_to_ladder() {
    let script = "\
assert-if-false \"condition 0: nested\" (X1 && X2)
if balance >= 100
let result = A + B
let counter = counter + 1
let shifted = C SHL 2
JMP LABEL1
LBL LABEL1";

    let reverse = laddercore_reverse::translate(script).unwrap();
    assert!(reverse.ladder.contains("NESTED X1 && X2"));
    assert!(reverse.ladder.contains("GEQ balance 100"));
    assert!(reverse.ladder.contains("ADD result A B"));
    assert!(reverse.ladder.contains("MOV counter += 1"));
    assert!(reverse.ladder.contains("SHL shifted C 2"));
    assert!(reverse.ladder.contains("JMP LABEL1"));

    // The regenerated ladder parses cleanly in the forward direction
    let tables = InstructionTables::builtin();
    let forward = ForwardTranslator::new(&tables)
        .with_mode(ForwardMode::Lenient)
        .translate(&reverse.ladder)
        .unwrap();
    assert_eq!(forward.ir.comparators["balance"].comparison, Opcode::Geq);
    assert!(forward.ir.math_operations.contains_key("result"));
}

#[test]
fn test_legacy_trace_if_false_clause() {
    let script = "traceIfFalse \"Condition 1 failed\" (X1 && X2)";
    let reverse = laddercore_reverse::translate(script).unwrap();
    assert_eq!(reverse.ladder, "XIC X1 && X2 OTE Condition 1 failed\n");
}

// ============================================================================
// Shared configuration
// ============================================================================

#[test]
fn test_translators_share_one_table_set() {
    let tables = InstructionTables::builtin();
    let limits = Limits::new(4).unwrap();

    let forward = ForwardTranslator::new(&tables).with_limits(limits);
    let reverse = ReverseTranslator::new(&tables).with_limits(limits);

    let out = forward.translate("INPUT X1\nAND X2\nOUTPUT Y1").unwrap();
    let back = reverse.translate(&out.script).unwrap();
    assert!(out.ir.semantic_eq(&back.ir));
}

#[test]
fn test_nesting_limit_enforced_in_reverse() {
    let tables = InstructionTables::builtin();
    let script = "AND A\nAND B\nAND C";
    let out = ReverseTranslator::new(&tables)
        .with_limits(Limits::new(2).unwrap())
        .with_mode(ReverseMode::Lenient)
        .translate(script)
        .unwrap();
    assert!(out
        .diagnostics
        .iter()
        .any(|d| d.kind == laddercore_ir::DiagnosticKind::NestingOverflow));
}

#[test]
fn test_unrecognized_content_is_never_dropped() {
    let tables = InstructionTables::builtin();

    let forward = ForwardTranslator::new(&tables)
        .with_mode(ForwardMode::Lenient)
        .translate("FROB A B")
        .unwrap();
    assert!(forward.script.contains("-- unrecognized: FROB A B"));

    let reverse = ReverseTranslator::new(&tables)
        .with_mode(ReverseMode::Lenient)
        .translate("entirely opaque line")
        .unwrap();
    assert!(reverse.ladder.contains("entirely opaque line"));
}
