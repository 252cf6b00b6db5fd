//! Forward translation pipeline: parse, validate, emit

use crate::emitter::emit;
use crate::error::{ForwardError, Result};
use crate::parser::parse;
use laddercore_ir::{
    validate, Diagnostic, InstructionTables, IrDocument, Limits, ValidationReport,
};

/// Translation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Abort on validation errors
    #[default]
    Strict,
    /// Proceed with best-effort emission; defects stay annotated in the
    /// script and in the report
    Lenient,
}

/// Result of one forward translation call
#[derive(Clone, Debug)]
pub struct ForwardTranslation {
    /// Emitted validator-script text
    pub script: String,
    /// The intermediate document the script was emitted from
    pub ir: IrDocument,
    /// Parse-time diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Validation outcome
    pub report: ValidationReport,
}

/// Ladder Logic -> IR -> validator script.
///
/// Holds only borrowed, immutable configuration; every `translate` call owns
/// its entire mutable state, so one translator may serve concurrent callers.
#[derive(Clone, Copy, Debug)]
pub struct ForwardTranslator<'t> {
    tables: &'t InstructionTables,
    limits: Limits,
    mode: Mode,
}

impl<'t> ForwardTranslator<'t> {
    pub fn new(tables: &'t InstructionTables) -> Self {
        Self {
            tables,
            limits: Limits::default(),
            mode: Mode::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Translate Ladder-Logic text into validator-script text
    pub fn translate(&self, source: &str) -> Result<ForwardTranslation> {
        let (ir, diagnostics) = parse(source, self.tables, &self.limits);
        tracing::debug!(
            instructions = ir.instructions.len(),
            diagnostics = diagnostics.len(),
            "parsed ladder logic"
        );

        let report = validate(&ir, self.tables, &self.limits);
        if self.mode == Mode::Strict && !report.is_valid() {
            return Err(ForwardError::Validation(report.errors));
        }

        let script = emit(&ir, self.tables);
        tracing::debug!(lines = script.lines().count(), "emitted validator script");

        Ok(ForwardTranslation {
            script,
            ir,
            diagnostics,
            report,
        })
    }
}

/// Translate with the built-in instruction tables and default limits
pub fn translate(source: &str) -> Result<ForwardTranslation> {
    let tables = InstructionTables::builtin();
    ForwardTranslator::new(&tables).translate(source)
}
