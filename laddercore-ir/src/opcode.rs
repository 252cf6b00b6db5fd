//! # LadderCore Opcode Definitions
//!
//! The closed instruction enumeration shared by both translation directions.
//!
//! ## Opcode Families
//!
//! Opcodes are organized by instruction family:
//! - Contacts (INPUT, XIC, XIO)
//! - Coils (OUTPUT, OTE, OTL, OTU)
//! - Nested logic (AND, OR, NOT, XOR, NAND, NOR, XNOR)
//! - Timers (TON, TOF, TP, RTO, RES)
//! - Counters (CTU, CTD, CTUD)
//! - Arithmetic (ADD, SUB, MUL, DIV, MOD, MOV)
//! - Advanced math (SQRT, EXP, LOG, SIN, COS, TAN)
//! - Comparison (EQU, NEQ, LES, LEQ, GRT, GEQ)
//! - Bitwise (SHL, SHR, ROL, ROR, AND_BIT, OR_BIT, XOR_BIT, NOT_BIT)
//! - Latches (SR, RS)
//! - Jump/subroutine (JMP, LBL, JSR, RET)
//! - Function blocks (FB, SFB, FC, MUX, LIMIT)
//! - Synthetic (NESTED, UNRECOGNIZED)

use serde::{Deserialize, Serialize};

/// Instruction opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Opcode {
    // ========== Contacts ==========
    /// INPUT: examine a discrete input
    Input,
    /// XIC: examine if closed
    Xic,
    /// XIO: examine if open
    Xio,

    // ========== Coils ==========
    /// OUTPUT: energize a discrete output
    Output,
    /// OTE: output energize
    Ote,
    /// OTL: output latch
    Otl,
    /// OTU: output unlatch
    Otu,

    // ========== Nested logic ==========
    /// AND: conjunction of rung conditions
    And,
    /// OR: disjunction of rung conditions
    Or,
    /// NOT: negation of a rung condition
    Not,
    /// XOR: exclusive disjunction
    Xor,
    /// NAND: negated conjunction
    Nand,
    /// NOR: negated disjunction
    Nor,
    /// XNOR: negated exclusive disjunction
    Xnor,

    // ========== Timers ==========
    /// TON: ON-delay timer
    Ton,
    /// TOF: OFF-delay timer
    Tof,
    /// TP: pulse timer
    Tp,
    /// RTO: retentive timer
    Rto,
    /// RES: timer/counter reset
    Res,

    // ========== Counters ==========
    /// CTU: count up
    Ctu,
    /// CTD: count down
    Ctd,
    /// CTUD: count up/down
    Ctud,

    // ========== Arithmetic ==========
    /// ADD: dest = a + b
    Add,
    /// SUB: dest = a - b
    Sub,
    /// MUL: dest = a * b
    Mul,
    /// DIV: dest = a / b
    Div,
    /// MOD: dest = a % b
    Mod,
    /// MOV: dest = a
    Mov,

    // ========== Advanced math ==========
    /// SQRT: dest = sqrt(a)
    Sqrt,
    /// EXP: dest = exp(a)
    Exp,
    /// LOG: dest = log(a)
    Log,
    /// SIN: dest = sin(a)
    Sin,
    /// COS: dest = cos(a)
    Cos,
    /// TAN: dest = tan(a)
    Tan,

    // ========== Comparison ==========
    /// EQU: a == b
    Equ,
    /// NEQ: a != b
    Neq,
    /// LES: a < b
    Les,
    /// LEQ: a <= b
    Leq,
    /// GRT: a > b
    Grt,
    /// GEQ: a >= b
    Geq,

    // ========== Bitwise ==========
    /// SHL: dest = a << n
    Shl,
    /// SHR: dest = a >> n
    Shr,
    /// ROL: dest = rotate-left(a, n)
    Rol,
    /// ROR: dest = rotate-right(a, n)
    Ror,
    /// AND_BIT: dest = a & b
    AndBit,
    /// OR_BIT: dest = a | b
    OrBit,
    /// XOR_BIT: dest = a ^ b
    XorBit,
    /// NOT_BIT: dest = !a
    NotBit,

    // ========== Latches ==========
    /// SR: set-dominant latch
    Sr,
    /// RS: reset-dominant latch
    Rs,

    // ========== Jump / subroutine ==========
    /// JMP: jump to label
    Jmp,
    /// LBL: label marker
    Lbl,
    /// JSR: jump to subroutine
    Jsr,
    /// RET: return from subroutine
    Ret,

    // ========== Function blocks ==========
    /// FB: function block invocation
    Fb,
    /// SFB: system function block invocation
    Sfb,
    /// FC: function call
    Fc,
    /// MUX: selection multiplexer
    Mux,
    /// LIMIT: clamp a value between bounds
    Limit,

    // ========== Synthetic ==========
    /// NESTED: compound condition combined from a nesting group
    Nested,
    /// UNRECOGNIZED: opcode outside every known family, kept for diagnostics
    Unrecognized,
}

/// Opcode family, used for section routing and validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpcodeCategory {
    Contact,
    Coil,
    NestedLogic,
    Timer,
    Counter,
    Arithmetic,
    AdvancedMath,
    Comparison,
    Bitwise,
    Latch,
    Jump,
    FunctionBlock,
    Compound,
    Unknown,
}

impl Opcode {
    /// Get the canonical Ladder-Logic mnemonic
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Input => "INPUT",
            Opcode::Xic => "XIC",
            Opcode::Xio => "XIO",
            Opcode::Output => "OUTPUT",
            Opcode::Ote => "OTE",
            Opcode::Otl => "OTL",
            Opcode::Otu => "OTU",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Xor => "XOR",
            Opcode::Nand => "NAND",
            Opcode::Nor => "NOR",
            Opcode::Xnor => "XNOR",
            Opcode::Ton => "TON",
            Opcode::Tof => "TOF",
            Opcode::Tp => "TP",
            Opcode::Rto => "RTO",
            Opcode::Res => "RES",
            Opcode::Ctu => "CTU",
            Opcode::Ctd => "CTD",
            Opcode::Ctud => "CTUD",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Mov => "MOV",
            Opcode::Sqrt => "SQRT",
            Opcode::Exp => "EXP",
            Opcode::Log => "LOG",
            Opcode::Sin => "SIN",
            Opcode::Cos => "COS",
            Opcode::Tan => "TAN",
            Opcode::Equ => "EQU",
            Opcode::Neq => "NEQ",
            Opcode::Les => "LES",
            Opcode::Leq => "LEQ",
            Opcode::Grt => "GRT",
            Opcode::Geq => "GEQ",
            Opcode::Shl => "SHL",
            Opcode::Shr => "SHR",
            Opcode::Rol => "ROL",
            Opcode::Ror => "ROR",
            Opcode::AndBit => "AND_BIT",
            Opcode::OrBit => "OR_BIT",
            Opcode::XorBit => "XOR_BIT",
            Opcode::NotBit => "NOT_BIT",
            Opcode::Sr => "SR",
            Opcode::Rs => "RS",
            Opcode::Jmp => "JMP",
            Opcode::Lbl => "LBL",
            Opcode::Jsr => "JSR",
            Opcode::Ret => "RET",
            Opcode::Fb => "FB",
            Opcode::Sfb => "SFB",
            Opcode::Fc => "FC",
            Opcode::Mux => "MUX",
            Opcode::Limit => "LIMIT",
            Opcode::Nested => "NESTED",
            Opcode::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Resolve a mnemonic, case-insensitively. Returns `None` for names
    /// outside the closed instruction set.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        let upper = name.to_ascii_uppercase();
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == upper)
            .copied()
    }

    /// Get the opcode family
    pub fn category(&self) -> OpcodeCategory {
        match self {
            Opcode::Input | Opcode::Xic | Opcode::Xio => OpcodeCategory::Contact,
            Opcode::Output | Opcode::Ote | Opcode::Otl | Opcode::Otu => OpcodeCategory::Coil,
            Opcode::And
            | Opcode::Or
            | Opcode::Not
            | Opcode::Xor
            | Opcode::Nand
            | Opcode::Nor
            | Opcode::Xnor => OpcodeCategory::NestedLogic,
            Opcode::Ton | Opcode::Tof | Opcode::Tp | Opcode::Rto | Opcode::Res => {
                OpcodeCategory::Timer
            }
            Opcode::Ctu | Opcode::Ctd | Opcode::Ctud => OpcodeCategory::Counter,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod | Opcode::Mov => {
                OpcodeCategory::Arithmetic
            }
            Opcode::Sqrt | Opcode::Exp | Opcode::Log | Opcode::Sin | Opcode::Cos | Opcode::Tan => {
                OpcodeCategory::AdvancedMath
            }
            Opcode::Equ | Opcode::Neq | Opcode::Les | Opcode::Leq | Opcode::Grt | Opcode::Geq => {
                OpcodeCategory::Comparison
            }
            Opcode::Shl
            | Opcode::Shr
            | Opcode::Rol
            | Opcode::Ror
            | Opcode::AndBit
            | Opcode::OrBit
            | Opcode::XorBit
            | Opcode::NotBit => OpcodeCategory::Bitwise,
            Opcode::Sr | Opcode::Rs => OpcodeCategory::Latch,
            Opcode::Jmp | Opcode::Lbl | Opcode::Jsr | Opcode::Ret => OpcodeCategory::Jump,
            Opcode::Fb | Opcode::Sfb | Opcode::Fc | Opcode::Mux | Opcode::Limit => {
                OpcodeCategory::FunctionBlock
            }
            Opcode::Nested => OpcodeCategory::Compound,
            Opcode::Unrecognized => OpcodeCategory::Unknown,
        }
    }

    /// Whether this opcode belongs to the nested-logic set that participates
    /// in nesting-frame grouping
    pub fn is_nested_logic(&self) -> bool {
        self.category() == OpcodeCategory::NestedLogic
    }

    /// Boolean join operator used when emitting this opcode's operand
    /// expression: `||` for the OR/NOR/XOR/XNOR family, `&&` otherwise.
    pub fn join_operator(&self) -> &'static str {
        match self {
            Opcode::Or | Opcode::Nor | Opcode::Xor | Opcode::Xnor => "||",
            _ => "&&",
        }
    }
}

/// All opcodes in declaration order, used for mnemonic resolution and for
/// building the default instruction tables.
pub const ALL_OPCODES: &[Opcode] = &[
    Opcode::Input,
    Opcode::Xic,
    Opcode::Xio,
    Opcode::Output,
    Opcode::Ote,
    Opcode::Otl,
    Opcode::Otu,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Xor,
    Opcode::Nand,
    Opcode::Nor,
    Opcode::Xnor,
    Opcode::Ton,
    Opcode::Tof,
    Opcode::Tp,
    Opcode::Rto,
    Opcode::Res,
    Opcode::Ctu,
    Opcode::Ctd,
    Opcode::Ctud,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Mod,
    Opcode::Mov,
    Opcode::Sqrt,
    Opcode::Exp,
    Opcode::Log,
    Opcode::Sin,
    Opcode::Cos,
    Opcode::Tan,
    Opcode::Equ,
    Opcode::Neq,
    Opcode::Les,
    Opcode::Leq,
    Opcode::Grt,
    Opcode::Geq,
    Opcode::Shl,
    Opcode::Shr,
    Opcode::Rol,
    Opcode::Ror,
    Opcode::AndBit,
    Opcode::OrBit,
    Opcode::XorBit,
    Opcode::NotBit,
    Opcode::Sr,
    Opcode::Rs,
    Opcode::Jmp,
    Opcode::Lbl,
    Opcode::Jsr,
    Opcode::Ret,
    Opcode::Fb,
    Opcode::Sfb,
    Opcode::Fc,
    Opcode::Mux,
    Opcode::Limit,
    Opcode::Nested,
    Opcode::Unrecognized,
];
