//! # Instruction Tables
//!
//! Read-only mappings from symbolic instruction names to IR opcodes, declared
//! arities, and target-notation symbols. Supplied once at process start and
//! never mutated; translators borrow the tables for their whole lifetime.
//!
//! Three category tables mirror the external configuration surface:
//! - `instruction_set`: canonical mnemonic -> entry
//! - `ladder_symbols`: ladder-notation aliases -> entry
//! - `structured_symbols`: target-notation symbol -> entry

use crate::error::ConfigurationError;
use crate::opcode::{Opcode, OpcodeCategory, ALL_OPCODES};
use std::collections::BTreeMap;
use std::fmt;

/// Declared operand arity for an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many operands
    Exact(usize),
    /// This many operands or more
    AtLeast(usize),
}

impl Arity {
    /// Whether an operand count satisfies this arity
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// One instruction-table entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableEntry {
    /// Target-notation symbol for this instruction (`+`, `>=`, `sqrt`, ...)
    pub symbol: String,
    /// Canonical IR opcode
    pub ir: Opcode,
    /// Declared operand arity
    pub arity: Arity,
}

/// The three read-only category tables.
///
/// Construction validates completeness: a table set missing a required
/// category is a configuration error surfaced before any translation.
#[derive(Clone, Debug)]
pub struct InstructionTables {
    instruction_set: BTreeMap<String, TableEntry>,
    ladder_symbols: BTreeMap<String, TableEntry>,
    structured_symbols: BTreeMap<String, TableEntry>,
}

impl InstructionTables {
    /// Build the tables from externally supplied category maps
    pub fn new(
        instruction_set: BTreeMap<String, TableEntry>,
        ladder_symbols: BTreeMap<String, TableEntry>,
        structured_symbols: BTreeMap<String, TableEntry>,
    ) -> Result<Self, ConfigurationError> {
        let tables = Self {
            instruction_set,
            ladder_symbols,
            structured_symbols,
        };
        tables.ensure_complete()?;
        Ok(tables)
    }

    /// The built-in static configuration covering the full instruction set
    pub fn builtin() -> Self {
        let mut instruction_set = BTreeMap::new();
        for op in ALL_OPCODES {
            instruction_set.insert(
                op.mnemonic().to_string(),
                TableEntry {
                    symbol: builtin_symbol(*op).to_string(),
                    ir: *op,
                    arity: builtin_arity(*op),
                },
            );
        }

        // Ladder-notation aliases accepted on input in addition to the
        // canonical mnemonics
        let mut ladder_symbols = BTreeMap::new();
        for (alias, op) in [("CALL", Opcode::Jsr), ("OUT", Opcode::Ote), ("IN", Opcode::Input)] {
            ladder_symbols.insert(
                alias.to_string(),
                TableEntry {
                    symbol: builtin_symbol(op).to_string(),
                    ir: op,
                    arity: builtin_arity(op),
                },
            );
        }

        // Symbol -> opcode for expression extraction in the reverse direction
        let mut structured_symbols = BTreeMap::new();
        for op in ALL_OPCODES {
            let symbol = builtin_symbol(*op);
            if symbol.is_empty() {
                continue;
            }
            structured_symbols
                .entry(symbol.to_string())
                .or_insert_with(|| TableEntry {
                    symbol: symbol.to_string(),
                    ir: *op,
                    arity: builtin_arity(*op),
                });
        }

        Self {
            instruction_set,
            ladder_symbols,
            structured_symbols,
        }
    }

    /// Look up an entry by instruction name, case-insensitively. Checks the
    /// canonical instruction set first, then the ladder-notation aliases.
    pub fn lookup(&self, name: &str) -> Option<&TableEntry> {
        let upper = name.to_ascii_uppercase();
        self.instruction_set
            .get(&upper)
            .or_else(|| self.ladder_symbols.get(&upper))
    }

    /// Resolve an instruction name to its IR opcode
    pub fn opcode_for(&self, name: &str) -> Option<Opcode> {
        self.lookup(name).map(|entry| entry.ir)
    }

    /// Declared arity for an opcode
    pub fn arity_for(&self, opcode: Opcode) -> Option<Arity> {
        self.instruction_set
            .get(opcode.mnemonic())
            .map(|entry| entry.arity)
    }

    /// Target-notation symbol for an opcode
    pub fn symbol_for(&self, opcode: Opcode) -> Option<&str> {
        self.instruction_set
            .get(opcode.mnemonic())
            .map(|entry| entry.symbol.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Reverse lookup: target-notation symbol to opcode
    pub fn opcode_for_symbol(&self, symbol: &str) -> Option<Opcode> {
        self.structured_symbols.get(symbol).map(|entry| entry.ir)
    }

    fn ensure_complete(&self) -> Result<(), ConfigurationError> {
        if self.instruction_set.is_empty() {
            return Err(ConfigurationError::EmptyTable {
                table: "instruction_set",
            });
        }
        for (category, name) in [
            (OpcodeCategory::NestedLogic, "nested-logic"),
            (OpcodeCategory::Timer, "timer"),
            (OpcodeCategory::Counter, "counter"),
            (OpcodeCategory::Comparison, "comparison"),
            (OpcodeCategory::Jump, "jump"),
        ] {
            let present = self
                .instruction_set
                .values()
                .any(|entry| entry.ir.category() == category);
            if !present {
                return Err(ConfigurationError::MissingCategory { category: name });
            }
        }
        Ok(())
    }
}

fn builtin_arity(op: Opcode) -> Arity {
    use Opcode::*;
    match op {
        Input | Xic | Xio | Output | Ote | Otl | Otu | Not => Arity::Exact(1),
        And | Or | Xor | Nand | Nor | Xnor => Arity::AtLeast(1),
        Ton | Tof | Tp | Rto => Arity::AtLeast(2),
        Res => Arity::AtLeast(1),
        Ctu | Ctd | Ctud => Arity::Exact(2),
        Add | Sub | Mul | Div | Mod => Arity::Exact(3),
        // MOV also covers `<id> <op>= <n>` shorthand updates
        Mov => Arity::AtLeast(2),
        Sqrt | Exp | Log | Sin | Cos | Tan => Arity::Exact(2),
        Equ | Neq | Les | Leq | Grt | Geq => Arity::AtLeast(2),
        Shl | Shr | Rol | Ror | AndBit | OrBit | XorBit => Arity::Exact(3),
        NotBit => Arity::Exact(2),
        Sr | Rs => Arity::AtLeast(1),
        Jmp | Lbl | Jsr => Arity::Exact(1),
        Ret => Arity::AtLeast(0),
        Fb | Sfb | Fc => Arity::AtLeast(1),
        Mux | Limit => Arity::AtLeast(2),
        Nested => Arity::AtLeast(1),
        Unrecognized => Arity::AtLeast(0),
    }
}

fn builtin_symbol(op: Opcode) -> &'static str {
    use Opcode::*;
    match op {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        Mov => "=",
        Sqrt => "sqrt",
        Exp => "exp",
        Log => "log",
        Sin => "sin",
        Cos => "cos",
        Tan => "tan",
        Equ => "==",
        Neq => "!=",
        Les => "<",
        Leq => "<=",
        Grt => ">",
        Geq => ">=",
        Shl => "SHL",
        Shr => "SHR",
        Rol => "ROL",
        Ror => "ROR",
        AndBit => "&",
        OrBit => "|",
        XorBit => "^",
        NotBit => "~",
        And | Nand => "&&",
        Or | Nor | Xor | Xnor => "||",
        Not => "!",
        _ => "",
    }
}
