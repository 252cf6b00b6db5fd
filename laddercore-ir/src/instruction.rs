//! # LadderCore IR Instruction Types
//!
//! The element types held by the IR document sections: instructions, timers,
//! counters, latches, math operations, comparators, function blocks, and
//! jump-table entries.

use crate::opcode::Opcode;
use serde::{Deserialize, Serialize};

/// A single IR instruction: an opcode plus its ordered operand identifiers.
///
/// The optional description survives reverse extraction of an assertion
/// clause whose text does not follow the canonical description shapes, so
/// that no script content is lost across the round trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Instruction {
    /// Create an instruction from an opcode and operand identifiers
    pub fn new<I, S>(opcode: Opcode, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            opcode,
            operands: operands.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Attach a free-form description recovered from script text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Timer kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerKind {
    OnDelay,
    OffDelay,
    Pulse,
    Retentive,
    Reset,
}

impl TimerKind {
    /// Kind name as it appears in emitted assertion descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::OnDelay => "on-delay",
            TimerKind::OffDelay => "off-delay",
            TimerKind::Pulse => "pulse",
            TimerKind::Retentive => "retentive",
            TimerKind::Reset => "reset",
        }
    }

    /// Parse a kind name from an assertion description
    pub fn from_str_name(name: &str) -> Option<TimerKind> {
        match name {
            "on-delay" => Some(TimerKind::OnDelay),
            "off-delay" => Some(TimerKind::OffDelay),
            "pulse" => Some(TimerKind::Pulse),
            "retentive" => Some(TimerKind::Retentive),
            "reset" => Some(TimerKind::Reset),
            _ => None,
        }
    }

    /// Map a timer-family opcode to its kind
    pub fn from_opcode(op: Opcode) -> Option<TimerKind> {
        match op {
            Opcode::Ton => Some(TimerKind::OnDelay),
            Opcode::Tof => Some(TimerKind::OffDelay),
            Opcode::Tp => Some(TimerKind::Pulse),
            Opcode::Rto => Some(TimerKind::Retentive),
            Opcode::Res => Some(TimerKind::Reset),
            _ => None,
        }
    }

    /// Ladder-Logic mnemonic for this kind
    pub fn mnemonic(&self) -> &'static str {
        match self {
            TimerKind::OnDelay => "TON",
            TimerKind::OffDelay => "TOF",
            TimerKind::Pulse => "TP",
            TimerKind::Retentive => "RTO",
            TimerKind::Reset => "RES",
        }
    }
}

/// Timer entry, keyed by identifier in the document's `timers` section.
///
/// Duration is kept signed so a negative value reaches the validator as a
/// typing error instead of failing at parse time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub kind: TimerKind,
    /// Duration in milliseconds; must be non-negative to validate
    pub duration_ms: i64,
    /// Optional symbolic time-slot binding; an ON-delay timer with a slot
    /// materializes as a validity-window clause in the emitted script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// Counter kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterKind {
    Up,
    Down,
    UpDown,
    Reset,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Up => "up",
            CounterKind::Down => "down",
            CounterKind::UpDown => "up-down",
            CounterKind::Reset => "reset",
        }
    }

    pub fn from_str_name(name: &str) -> Option<CounterKind> {
        match name {
            "up" => Some(CounterKind::Up),
            "down" => Some(CounterKind::Down),
            "up-down" => Some(CounterKind::UpDown),
            "reset" => Some(CounterKind::Reset),
            _ => None,
        }
    }

    pub fn from_opcode(op: Opcode) -> Option<CounterKind> {
        match op {
            Opcode::Ctu => Some(CounterKind::Up),
            Opcode::Ctd => Some(CounterKind::Down),
            Opcode::Ctud => Some(CounterKind::UpDown),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            CounterKind::Up => "CTU",
            CounterKind::Down => "CTD",
            CounterKind::UpDown => "CTUD",
            CounterKind::Reset => "RES",
        }
    }
}

/// Counter entry, keyed by identifier in the document's `counters` section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub kind: CounterKind,
    /// Preset count; must be non-negative to validate
    pub preset: i64,
}

/// Latch kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatchKind {
    SetDominant,
    ResetDominant,
}

impl LatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LatchKind::SetDominant => "set-dominant",
            LatchKind::ResetDominant => "reset-dominant",
        }
    }

    pub fn from_str_name(name: &str) -> Option<LatchKind> {
        match name {
            "set-dominant" => Some(LatchKind::SetDominant),
            "reset-dominant" => Some(LatchKind::ResetDominant),
            _ => None,
        }
    }

    pub fn from_opcode(op: Opcode) -> Option<LatchKind> {
        match op {
            Opcode::Sr => Some(LatchKind::SetDominant),
            Opcode::Rs => Some(LatchKind::ResetDominant),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            LatchKind::SetDominant => "SR",
            LatchKind::ResetDominant => "RS",
        }
    }
}

/// Latch entry, keyed by identifier in the document's `latches` section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latch {
    pub kind: LatchKind,
}

/// Function block invocation, keyed by identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBlock {
    /// Block kind tag (FB, SFB, FC, MUX, LIMIT)
    pub kind: String,
    pub operands: Vec<String>,
}

/// Arithmetic or advanced-math operation, keyed by destination identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathOperation {
    pub operation: Opcode,
    pub operands: Vec<String>,
}

/// Comparison operation, keyed by identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparator {
    pub comparison: Opcode,
    pub operands: Vec<String>,
}

/// Jump-table entry kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JumpKind {
    Jmp,
    Lbl,
    Jsr,
    Ret,
}

impl JumpKind {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            JumpKind::Jmp => "JMP",
            JumpKind::Lbl => "LBL",
            JumpKind::Jsr => "JSR",
            JumpKind::Ret => "RET",
        }
    }

    pub fn from_opcode(op: Opcode) -> Option<JumpKind> {
        match op {
            Opcode::Jmp => Some(JumpKind::Jmp),
            Opcode::Lbl => Some(JumpKind::Lbl),
            Opcode::Jsr => Some(JumpKind::Jsr),
            Opcode::Ret => Some(JumpKind::Ret),
            _ => None,
        }
    }
}

/// Jump-table entry. An ordered list rather than a label-keyed map: `JMP L1`
/// and `LBL L1` are distinct entries that must both survive for the
/// jump/label consistency check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpInstruction {
    pub kind: JumpKind,
    /// Target label; empty for a bare RET
    pub target: String,
}
