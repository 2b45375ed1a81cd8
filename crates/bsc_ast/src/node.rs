//! Syntax tree node definitions.
//!
//! Nodes are allocated in a bump arena owned by the caller of the parser and
//! reference their children through `&'a` references and arena slices.

use crate::syntax_kind::SyntaxKind;
use bsc_core::text::Range;
use bsc_types::{FunctionType, Type};

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    /// The kind of this node.
    pub kind: SyntaxKind,
    /// Source range.
    pub range: Range,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, range: Range) -> Self {
        Self { kind, range }
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

/// A name as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'a> {
    pub name: &'a str,
    pub range: Range,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Literal(LiteralExpression<'a>),
    Variable(VariableExpression<'a>),
    DottedGet(DottedGetExpression<'a>),
    IndexedGet(IndexedGetExpression<'a>),
    Call(CallExpression<'a>),
    ArrayLiteral(ArrayLiteralExpression<'a>),
    AALiteral(AALiteralExpression<'a>),
    Binary(BinaryExpression<'a>),
    Unary(UnaryExpression<'a>),
    Grouping(GroupingExpression<'a>),
    Function(FunctionExpression<'a>),
    Conditional(ConditionalExpression<'a>),
}

/// A string, number, boolean or `invalid` literal.
#[derive(Debug)]
pub struct LiteralExpression<'a> {
    pub data: NodeData,
    /// The literal token kind, e.g. `StringLiteral` or `True`.
    pub token_kind: SyntaxKind,
    /// Raw source text, including quotes and type suffixes.
    pub text: &'a str,
}

impl LiteralExpression<'_> {
    /// The static type of the literal.
    pub fn ty(&self) -> Type {
        match self.token_kind {
            SyntaxKind::StringLiteral => Type::String,
            SyntaxKind::IntegerLiteral => Type::Integer,
            SyntaxKind::LongIntegerLiteral => Type::LongInteger,
            SyntaxKind::FloatLiteral => Type::Float,
            SyntaxKind::DoubleLiteral => Type::Double,
            SyntaxKind::True | SyntaxKind::False => Type::Boolean,
            SyntaxKind::Invalid => Type::Invalid,
            _ => Type::Dynamic,
        }
    }
}

#[derive(Debug)]
pub struct VariableExpression<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

/// `object.name`
#[derive(Debug)]
pub struct DottedGetExpression<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub name: Identifier<'a>,
}

/// `object[index]`
#[derive(Debug)]
pub struct IndexedGetExpression<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub index: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub callee: &'a Expression<'a>,
    pub args: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ArrayLiteralExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct AALiteralExpression<'a> {
    pub data: NodeData,
    /// Members in source order. Keys may repeat; the last one wins at runtime.
    pub members: NodeList<'a, AAMember<'a>>,
}

#[derive(Debug)]
pub enum AAMember<'a> {
    Property(AAProperty<'a>),
    Comment(CommentStatement<'a>),
}

#[derive(Debug)]
pub struct AAProperty<'a> {
    pub data: NodeData,
    /// The key without quotes.
    pub key: &'a str,
    /// Whether the key was written as a string literal.
    pub quoted: bool,
    pub value: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator: SyntaxKind,
    /// Operator spelling as written, e.g. `AND`.
    pub operator_text: &'a str,
    pub right: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operator_text: &'a str,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct GroupingExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

/// An anonymous `function` or `sub`, also the value of every declaration.
#[derive(Debug)]
pub struct FunctionExpression<'a> {
    pub data: NodeData,
    pub is_sub: bool,
    pub parameters: NodeList<'a, Parameter<'a>>,
    /// The declared return type. Subs and undeclared functions default to
    /// `void` and `dynamic` respectively.
    pub return_type: Type,
    pub body: Block<'a>,
}

impl FunctionExpression<'_> {
    /// Build the signature of this function.
    pub fn signature(&self, name: Option<&str>) -> FunctionType {
        let mut func = FunctionType::new(self.return_type.clone());
        func.set_sub(self.is_sub);
        if let Some(name) = name {
            func.set_name(name);
        }
        for param in self.parameters {
            func.add_parameter(param.name.name, param.ty.clone(), Some(param.is_required()));
        }
        func
    }
}

#[derive(Debug)]
pub struct Parameter<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub ty: Type,
    pub default_value: OptionalNode<'a, Expression<'a>>,
}

impl Parameter<'_> {
    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }
}

/// `test ? consequent : alternate`
#[derive(Debug)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub consequent: &'a Expression<'a>,
    pub alternate: &'a Expression<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    Assignment(AssignmentStatement<'a>),
    DottedSet(DottedSetStatement<'a>),
    IndexedSet(IndexedSetStatement<'a>),
    Expression(ExpressionStatement<'a>),
    Increment(IncrementStatement<'a>),
    Print(PrintStatement<'a>),
    If(IfStatement<'a>),
    While(WhileStatement<'a>),
    For(ForStatement<'a>),
    ForEach(ForEachStatement<'a>),
    Comment(CommentStatement<'a>),
    FunctionDeclaration(FunctionDeclaration<'a>),
    Return(ReturnStatement<'a>),
    Goto(GotoStatement<'a>),
    Label(LabelStatement<'a>),
    ExitFor(NodeData),
    ExitWhile(NodeData),
    End(NodeData),
    Stop(NodeData),
}

/// An ordered statement list. Comments are members like any other statement.
#[derive(Debug)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

/// `name = value`, or a compound form such as `name += value`.
#[derive(Debug)]
pub struct AssignmentStatement<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub operator: SyntaxKind,
    pub value: &'a Expression<'a>,
}

/// `object.name = value`
#[derive(Debug)]
pub struct DottedSetStatement<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub name: Identifier<'a>,
    pub operator: SyntaxKind,
    pub value: &'a Expression<'a>,
}

/// `object[index] = value`
#[derive(Debug)]
pub struct IndexedSetStatement<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub index: &'a Expression<'a>,
    pub operator: SyntaxKind,
    pub value: &'a Expression<'a>,
}

/// A call used as a statement.
#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

/// `value++` or `value--`
#[derive(Debug)]
pub struct IncrementStatement<'a> {
    pub data: NodeData,
    pub value: &'a Expression<'a>,
    pub operator: SyntaxKind,
}

#[derive(Debug)]
pub struct PrintStatement<'a> {
    pub data: NodeData,
    pub items: NodeList<'a, PrintItem<'a>>,
}

#[derive(Debug)]
pub enum PrintItem<'a> {
    Expression(&'a Expression<'a>),
    /// `,` or `;`
    Separator(SyntaxKind),
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub then_branch: Block<'a>,
    pub else_ifs: NodeList<'a, ElseIfClause<'a>>,
    pub else_branch: Option<Block<'a>>,
    /// Written on a single line, e.g. `if x then y = 1 else y = 2`.
    pub is_inline: bool,
}

#[derive(Debug)]
pub struct ElseIfClause<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub then_branch: Block<'a>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub body: Block<'a>,
}

/// `for counter = start to end [step step]`
#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub counter: Identifier<'a>,
    pub start: &'a Expression<'a>,
    pub end: &'a Expression<'a>,
    pub step: OptionalNode<'a, Expression<'a>>,
    pub body: Block<'a>,
}

/// `for each item in target`
#[derive(Debug)]
pub struct ForEachStatement<'a> {
    pub data: NodeData,
    pub item: Identifier<'a>,
    pub target: &'a Expression<'a>,
    pub body: Block<'a>,
}

/// One comment, or a run of own-line comments on consecutive lines.
#[derive(Debug)]
pub struct CommentStatement<'a> {
    pub data: NodeData,
    /// Comment text including the leading `'` or `rem`; merged runs are
    /// joined with `\n`.
    pub text: &'a str,
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub func: FunctionExpression<'a>,
}

impl FunctionDeclaration<'_> {
    pub fn signature(&self) -> FunctionType {
        self.func.signature(Some(self.name.name))
    }
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub value: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct GotoStatement<'a> {
    pub data: NodeData,
    pub label: Identifier<'a>,
}

/// `name:` on its own line.
#[derive(Debug)]
pub struct LabelStatement<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}
