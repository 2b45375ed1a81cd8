//! bsc_transpiler: syntax tree to BrightScript text.
//!
//! Prints parsed statements back as standard BrightScript. BrighterScript
//! conditional expressions are lowered to calls of runtime helper functions;
//! see [`conditional`] for how the call form is chosen.

pub mod conditional;
mod printer;

use bsc_ast::{Expression, Statement};
use serde::{Deserialize, Serialize};

pub use conditional::{expression_shape, CaptureScope, ExpressionShape};
pub use printer::{Printer, PrinterOptions};

/// How conditional expressions with possibly effectful branches are lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeProtection {
    /// Only the chosen branch runs; branches read their variables from a
    /// captured scope.
    #[default]
    Safe,
    /// Always use the eager helper, which evaluates both branches.
    None,
}

impl std::str::FromStr for ScopeProtection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "safe" => Ok(ScopeProtection::Safe),
            "none" => Ok(ScopeProtection::None),
            _ => Err(format!("unknown scope protection '{}', expected 'safe' or 'none'", s)),
        }
    }
}

/// Options for one transpile.
#[derive(Debug, Clone)]
pub struct TranspileOptions {
    pub scope_protection: ScopeProtection,
    /// Prefix of the runtime helper functions, e.g. `bslib_`.
    pub helper_prefix: String,
    pub printer: PrinterOptions,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            scope_protection: ScopeProtection::Safe,
            helper_prefix: "bslib_".to_string(),
            printer: PrinterOptions::default(),
        }
    }
}

/// Print a statement list as BrightScript.
pub fn transpile(statements: &[Statement<'_>], options: &TranspileOptions) -> String {
    let mut printer = Printer::new(options);
    printer.print_statements(statements)
}

/// Print a single expression as BrightScript, without a trailing newline.
pub fn transpile_expression(expression: &Expression<'_>, options: &TranspileOptions) -> String {
    let mut printer = Printer::new(options);
    printer.print_expression_text(expression)
}
