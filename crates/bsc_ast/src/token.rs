//! Tokens produced by the scanner and consumed by the parser.

use crate::syntax_kind::SyntaxKind;
use bsc_core::text::Range;
use bsc_types::Type;

/// The value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i32),
    LongInteger(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Invalid,
}

impl LiteralValue {
    /// The type of this value.
    pub fn ty(&self) -> Type {
        match self {
            LiteralValue::String(_) => Type::String,
            LiteralValue::Integer(_) => Type::Integer,
            LiteralValue::LongInteger(_) => Type::LongInteger,
            LiteralValue::Float(_) => Type::Float,
            LiteralValue::Double(_) => Type::Double,
            LiteralValue::Boolean(_) => Type::Boolean,
            LiteralValue::Invalid => Type::Invalid,
        }
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// The raw source text. Combined keywords keep their original spelling,
    /// e.g. `End If`.
    pub text: String,
    pub literal: Option<LiteralValue>,
    pub range: Range,
}

impl Token {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, range: Range) -> Self {
        Self {
            kind,
            text: text.into(),
            literal: None,
            range,
        }
    }

    pub fn with_literal(mut self, literal: LiteralValue) -> Self {
        self.literal = Some(literal);
        self
    }

    /// A zero-width end-of-file token at `range`.
    pub fn eof(range: Range) -> Self {
        Self::new(SyntaxKind::EndOfFile, "", range)
    }

    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }
}
