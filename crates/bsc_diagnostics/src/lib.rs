//! bsc_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every problem the scanner, parser or type checks find is reported as a
//! [`Diagnostic`] value built from one of the [`messages`] templates. Nothing
//! in this crate filters or re-levels diagnostics; that happens in the program
//! layer according to the project configuration.

use bsc_core::text::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    #[serde(alias = "warn")]
    Warning,
    #[serde(alias = "info")]
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// A diagnostic message template with a code and severity.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1003, 1009).
    pub code: u32,
    /// The severity of this diagnostic.
    pub severity: DiagnosticSeverity,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: u32,
    /// The resolved message text.
    pub message: String,
    /// The source range this diagnostic is attributed to.
    pub range: Range,
    pub severity: DiagnosticSeverity,
    /// The file path, set once the diagnostic leaves the parser.
    pub file: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic at a range.
    pub fn new(message: &DiagnosticMessage, args: &[&str], range: Range) -> Self {
        Self {
            code: message.code,
            message: format_message(message.message, args),
            range,
            severity: message.severity,
            file: None,
        }
    }

    /// Attach a file path.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:{} - ", file, self.range)?;
        }
        write!(f, "{} BS{}: {}", self.severity, self.code, self.message)
    }
}

/// The diagnostic for a value of type `source` used where `target` is
/// required.
pub fn type_mismatch(source: &impl fmt::Display, target: &impl fmt::Display, range: Range) -> Diagnostic {
    Diagnostic::new(
        &messages::TYPE_0_IS_NOT_CONVERTIBLE_TO_TYPE_1,
        &[&source.to_string(), &target.to_string()],
        range,
    )
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during compilation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Keep only the diagnostics matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&Diagnostic) -> bool) {
        self.diagnostics.retain(f);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.range.start.cmp(&b.range.start))
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, severity: DiagnosticSeverity::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, severity: DiagnosticSeverity::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1019)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1001, Error, "Unterminated string at end of line");
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1002, Error, "Unexpected character '{0}'");

    // ========================================================================
    // Syntax errors (1020-1059)
    // ========================================================================
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1020, Error, "Unexpected token '{0}'");
    pub const _0_EXPECTED_BUT_FOUND_1: DiagnosticMessage = diag!(1022, Error, "Expected '{0}' but found '{1}'");
    pub const EXPECTED_EXPRESSION_BUT_FOUND_0: DiagnosticMessage = diag!(1023, Error, "Expected expression but found '{0}'");
    pub const EXPECTED_IDENTIFIER_BUT_FOUND_0: DiagnosticMessage = diag!(1024, Error, "Expected identifier but found '{0}'");
    pub const EXPECTED_STATEMENT_OR_FUNCTION_CALL: DiagnosticMessage = diag!(1025, Error, "Expected statement or function call, but received an expression");
    pub const EXPECTED_PROPERTY_NAME_AFTER_PERIOD: DiagnosticMessage = diag!(1026, Error, "Expected property name after '.'");
    pub const EXPECTED_NEWLINE_OR_COLON: DiagnosticMessage = diag!(1027, Error, "Expected newline or ':' at the end of a statement");
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: DiagnosticMessage = diag!(1028, Error, "Maximum nesting depth exceeded");
    pub const UNKNOWN_TYPE_0: DiagnosticMessage = diag!(1029, Error, "Unknown type '{0}'");
    pub const EXPECTED_0_TO_TERMINATE_1: DiagnosticMessage = diag!(1030, Error, "Expected '{0}' to terminate '{1}'");

    // ========================================================================
    // Semantic errors (1060-1099)
    // ========================================================================
    pub const CANNOT_USE_RESERVED_WORD_0_AS_IDENTIFIER: DiagnosticMessage = diag!(1060, Error, "Cannot use reserved word '{0}' as an identifier");
    pub const BS_FEATURE_NOT_SUPPORTED_IN_BRS_FILES: DiagnosticMessage = diag!(1061, Error, "BrighterScript feature '{0}' is not supported in standard BrightScript files");
    pub const TYPE_0_IS_NOT_CONVERTIBLE_TO_TYPE_1: DiagnosticMessage = diag!(1062, Error, "Type '{0}' is not convertible to type '{1}'");
    pub const REQUIRED_PARAMETER_AFTER_OPTIONAL: DiagnosticMessage = diag!(1063, Warning, "Required parameter '{0}' follows an optional parameter");
}
