//! End-to-end pipeline tests over a realistic ladder program

use laddercore_forward::{ForwardTranslator, Mode};
use laddercore_ir::{
    AnchorKind, CounterKind, InstructionTables, JumpKind, Limits, Opcode, TimerKind,
};

/// A small conveyor-control program touching every opcode family
const CONVEYOR: &str = "\
INPUT StartPb
AND NotEstop
OUTPUT MotorRun
TON StartDelay 2000 slot88
TOF StopDelay 500
CTU BoxCount 24
EQU AtTarget BoxCount 24
ADD Total BoxCount Carry
SR RunLatch
JMP UNLOAD
LBL UNLOAD
JSR ALARMS
RET
FB Conveyor SpeedRef RampRef
ANCHOR verifiable-hash slot88 batch-7
";

#[test]
fn test_conveyor_program_full_pipeline() {
    let forward = laddercore_forward::translate(CONVEYOR).unwrap();
    assert!(forward.diagnostics.is_empty());
    assert!(forward.report.is_valid());

    // Compound condition absorbed the seeding contact
    assert_eq!(forward.ir.instructions[0].opcode, Opcode::Nested);
    assert_eq!(
        forward.ir.instructions[0].operands,
        vec!["StartPb", "NotEstop"]
    );

    // Sections populated as routed
    assert_eq!(forward.ir.timers["StartDelay"].kind, TimerKind::OnDelay);
    assert_eq!(
        forward.ir.timers["StartDelay"].slot.as_deref(),
        Some("slot88")
    );
    assert_eq!(forward.ir.counters["BoxCount"].kind, CounterKind::Up);
    assert_eq!(forward.ir.comparators["AtTarget"].comparison, Opcode::Equ);
    assert_eq!(forward.ir.math_operations["Total"].operation, Opcode::Add);
    assert!(forward.ir.latches.contains_key("RunLatch"));
    assert_eq!(forward.ir.function_blocks["Conveyor"].kind, "FB");
    assert_eq!(forward.ir.anchoring[0].kind, AnchorKind::VerifiableHash);

    // Script carries the window once, bound to the hash anchor and timer
    assert!(forward.script.contains("must-validate-in (from slot88)"));
    assert!(forward.script.contains("-- anchor-digest "));

    // Reverse reconstructs the same semantic document
    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    assert!(
        forward.ir.semantic_eq(&reverse.ir),
        "forward: {:#?}\nreverse: {:#?}",
        forward.ir,
        reverse.ir
    );

    // And the regenerated ladder reparses to the same side tables
    let reparsed = laddercore_forward::translate(&reverse.ladder).unwrap();
    assert_eq!(forward.ir.timers, reparsed.ir.timers);
    assert_eq!(forward.ir.counters, reparsed.ir.counters);
    assert_eq!(forward.ir.jump_instructions, reparsed.ir.jump_instructions);
    assert_eq!(forward.ir.anchoring, reparsed.ir.anchoring);
}

#[test]
fn test_scan_cycle_traces_input_order() {
    let forward = laddercore_forward::translate(CONVEYOR).unwrap();
    assert_eq!(forward.ir.scan_cycle[0], "INPUT");
    assert_eq!(forward.ir.scan_cycle[1], "AND");
    assert_eq!(forward.ir.scan_cycle.len(), 15);
}

#[test]
fn test_byte_identical_repeated_translation() {
    let first = laddercore_forward::translate(CONVEYOR).unwrap();
    let second = laddercore_forward::translate(CONVEYOR).unwrap();
    assert_eq!(first.script, second.script);

    let rev_first = laddercore_reverse::translate(&first.script).unwrap();
    let rev_second = laddercore_reverse::translate(&second.script).unwrap();
    assert_eq!(rev_first.ladder, rev_second.ladder);
}

#[test]
fn test_ir_serialization_surface() {
    let forward = laddercore_forward::translate(CONVEYOR).unwrap();
    let json = serde_json::to_value(&forward.ir).unwrap();
    let obj = json.as_object().unwrap();

    for section in [
        "instructions",
        "timers",
        "counters",
        "math_operations",
        "comparators",
        "latches",
        "jump_instructions",
        "function_blocks",
        "anchoring",
        "scan_cycle",
    ] {
        assert!(obj.contains_key(section), "missing section {section}");
    }

    // Documents deserialize back unchanged
    let back: laddercore_ir::IrDocument = serde_json::from_value(json).unwrap();
    assert_eq!(forward.ir, back);
}

#[test]
fn test_lenient_translation_reports_but_proceeds() {
    let tables = InstructionTables::builtin();
    let source = "INPUT X1\nFROB A\nJMP NOWHERE\nTON T1 soon";
    let out = ForwardTranslator::new(&tables)
        .with_mode(Mode::Lenient)
        .translate(source)
        .unwrap();

    // Everything kept, everything reported
    assert_eq!(out.diagnostics.len(), 2);
    assert!(!out.report.is_valid());
    assert!(out.script.contains("-- unrecognized: FROB A"));
    assert!(out.script.contains("JMP NOWHERE"));
}

#[test]
fn test_translators_are_reusable_and_stateless() {
    let tables = InstructionTables::builtin();
    let translator = ForwardTranslator::new(&tables);

    let a1 = translator.translate("INPUT X1").unwrap();
    let _ = translator.translate("OUTPUT Y9\nTON Tx 5").unwrap();
    let a2 = translator.translate("INPUT X1").unwrap();

    // No state leaks between calls
    assert_eq!(a1.script, a2.script);
    assert_eq!(a1.ir, a2.ir);
}

#[test]
fn test_custom_limits_flow_through() {
    let tables = InstructionTables::builtin();
    let translator = ForwardTranslator::new(&tables)
        .with_limits(Limits::new(1).unwrap())
        .with_mode(Mode::Lenient);

    let out = translator.translate("AND A\nAND B").unwrap();
    assert!(out
        .diagnostics
        .iter()
        .any(|d| d.kind == laddercore_ir::DiagnosticKind::NestingOverflow));
}

#[test]
fn test_jump_table_preserves_subroutine_flow() {
    let source = "JSR CHECKS\nJMP DONE\nLBL DONE\nRET";
    let forward = laddercore_forward::translate(source).unwrap();
    let kinds: Vec<JumpKind> = forward
        .ir
        .jump_instructions
        .iter()
        .map(|j| j.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![JumpKind::Jsr, JumpKind::Jmp, JumpKind::Lbl, JumpKind::Ret]
    );

    let reverse = laddercore_reverse::translate(&forward.script).unwrap();
    assert_eq!(forward.ir.jump_instructions, reverse.ir.jump_instructions);
}
