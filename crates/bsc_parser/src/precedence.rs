//! Operator precedence for binary operators and prefix `not`.

use bsc_ast::SyntaxKind;

/// Operator precedence levels, from lowest to highest. Prefix `-`/`+`
/// and postfix operators bind tighter than all of these and are handled
/// directly by the unary and call parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    /// `test ? consequent : alternate`
    Conditional = 1,
    Or = 2,
    And = 3,
    /// Prefix `not`. Its operand is a relational expression.
    Not = 4,
    Relational = 5,
    Shift = 6,
    Additive = 7,
    Multiplicative = 8,
    Exponent = 9,
    Invalid = 255,
}

/// Get the binary operator precedence for a given token kind.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::Or => OperatorPrecedence::Or,
        SyntaxKind::And => OperatorPrecedence::And,
        SyntaxKind::Equal
        | SyntaxKind::LessGreater
        | SyntaxKind::Less
        | SyntaxKind::LessEqual
        | SyntaxKind::Greater
        | SyntaxKind::GreaterEqual => OperatorPrecedence::Relational,
        SyntaxKind::LeftShift | SyntaxKind::RightShift => OperatorPrecedence::Shift,
        SyntaxKind::Plus | SyntaxKind::Minus => OperatorPrecedence::Additive,
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Backslash | SyntaxKind::Mod => {
            OperatorPrecedence::Multiplicative
        }
        SyntaxKind::Caret => OperatorPrecedence::Exponent,
        _ => OperatorPrecedence::Invalid,
    }
}
