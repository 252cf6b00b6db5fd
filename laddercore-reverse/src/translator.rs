//! Reverse translation pipeline: extract, validate, format

use crate::error::{Result, ReverseError};
use crate::extractor::{extract, ExtractionRules};
use crate::formatter::format;
use laddercore_ir::{
    validate, Diagnostic, InstructionTables, IrDocument, Limits, ValidationReport,
};

/// Translation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Abort on validation errors
    #[default]
    Strict,
    /// Proceed with best-effort emission
    Lenient,
}

/// Result of one reverse translation call
#[derive(Clone, Debug)]
pub struct ReverseTranslation {
    /// Emitted Ladder-Logic text
    pub ladder: String,
    /// The intermediate document the text was emitted from
    pub ir: IrDocument,
    /// Extraction diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Validation outcome
    pub report: ValidationReport,
}

/// Validator script -> IR -> Ladder Logic.
///
/// Extraction patterns compile once at construction; each `translate` call
/// owns its entire mutable state.
#[derive(Debug)]
pub struct ReverseTranslator<'t> {
    tables: &'t InstructionTables,
    rules: ExtractionRules,
    limits: Limits,
    mode: Mode,
}

impl<'t> ReverseTranslator<'t> {
    pub fn new(tables: &'t InstructionTables) -> Self {
        Self {
            tables,
            rules: ExtractionRules::new(),
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

    /// Translate validator-script text into Ladder-Logic text
    pub fn translate(&self, source: &str) -> Result<ReverseTranslation> {
        let (ir, diagnostics) = extract(source, &self.rules, self.tables, &self.limits);
        tracing::debug!(
            sections = ir.len(),
            diagnostics = diagnostics.len(),
            "extracted validator script"
        );

        let report = validate(&ir, self.tables, &self.limits);
        if self.mode == Mode::Strict && !report.is_valid() {
            return Err(ReverseError::Validation(report.errors));
        }

        let ladder = format(&ir);
        tracing::debug!(lines = ladder.lines().count(), "emitted ladder logic");

        Ok(ReverseTranslation {
            ladder,
            ir,
            diagnostics,
            report,
        })
    }
}

/// Translate with the built-in instruction tables and default limits
pub fn translate(source: &str) -> Result<ReverseTranslation> {
    let tables = InstructionTables::builtin();
    ReverseTranslator::new(&tables).translate(source)
}
