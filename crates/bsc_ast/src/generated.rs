//! Generated helpers for syntax tree nodes.
//!
//! Node kind checks and uniform access to [`NodeData`].

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use bsc_core::text::Range;

/// Helper to get the NodeData from any statement.
impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::Assignment(n) => &n.data,
            Statement::DottedSet(n) => &n.data,
            Statement::IndexedSet(n) => &n.data,
            Statement::Expression(n) => &n.data,
            Statement::Increment(n) => &n.data,
            Statement::Print(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::ForEach(n) => &n.data,
            Statement::Comment(n) => &n.data,
            Statement::FunctionDeclaration(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Goto(n) => &n.data,
            Statement::Label(n) => &n.data,
            Statement::ExitFor(d) => d,
            Statement::ExitWhile(d) => d,
            Statement::End(d) => d,
            Statement::Stop(d) => d,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn range(&self) -> Range {
        self.data().range
    }

    /// The text of a comment statement.
    pub fn as_comment(&self) -> Option<&'a str> {
        match self {
            Statement::Comment(n) => Some(n.text),
            _ => None,
        }
    }
}

/// Helper to get the NodeData from any expression.
impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Literal(n) => &n.data,
            Expression::Variable(n) => &n.data,
            Expression::DottedGet(n) => &n.data,
            Expression::IndexedGet(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::ArrayLiteral(n) => &n.data,
            Expression::AALiteral(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Grouping(n) => &n.data,
            Expression::Function(n) => &n.data,
            Expression::Conditional(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn range(&self) -> Range {
        self.data().range
    }

    /// Whether this expression may stand alone as a statement.
    pub fn is_call(&self) -> bool {
        matches!(self, Expression::Call(_))
    }
}

impl AAMember<'_> {
    pub fn data(&self) -> &NodeData {
        match self {
            AAMember::Property(n) => &n.data,
            AAMember::Comment(n) => &n.data,
        }
    }
}
