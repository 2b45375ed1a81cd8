//! SyntaxKind enum - all token and node kinds in the syntax tree.

/// The kind of a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown,
    EndOfFile,
    Newline,
    Comment,

    // Literals
    StringLiteral,
    IntegerLiteral,
    LongIntegerLiteral,
    FloatLiteral,
    DoubleLiteral,

    Identifier,

    // Punctuation
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    LeftCurly,
    RightCurly,
    Comma,
    Colon,
    Semicolon,
    Dot,
    QuestionMark,

    // Operators
    Equal,
    LessGreater,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Backslash,
    Caret,
    LeftShift,
    RightShift,
    PlusPlus,
    MinusMinus,

    // Compound assignment
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    BackslashEqual,
    LeftShiftEqual,
    RightShiftEqual,

    // Keywords
    And,
    Or,
    Not,
    Mod,
    True,
    False,
    Invalid,
    If,
    Then,
    Else,
    ElseIf,
    EndIf,
    For,
    To,
    Step,
    Next,
    EndFor,
    Each,
    While,
    EndWhile,
    Exit,
    ExitFor,
    ExitWhile,
    Function,
    EndFunction,
    Sub,
    EndSub,
    Return,
    Print,
    End,
    Stop,
    Goto,

    // ========================================================================
    // Nodes
    // ========================================================================

    // Statements
    AssignmentStatement,
    DottedSetStatement,
    IndexedSetStatement,
    ExpressionStatement,
    IncrementStatement,
    PrintStatement,
    IfStatement,
    ElseIfClause,
    Block,
    WhileStatement,
    ForStatement,
    ForEachStatement,
    CommentStatement,
    FunctionDeclaration,
    ReturnStatement,
    ExitForStatement,
    ExitWhileStatement,
    EndStatement,
    StopStatement,
    GotoStatement,
    LabelStatement,

    // Expressions
    LiteralExpression,
    VariableExpression,
    DottedGetExpression,
    IndexedGetExpression,
    CallExpression,
    ArrayLiteralExpression,
    AALiteralExpression,
    AAMember,
    BinaryExpression,
    UnaryExpression,
    GroupingExpression,
    FunctionExpression,
    ConditionalExpression,
    Parameter,
}

impl SyntaxKind {
    /// Map lowercased word text to its keyword kind.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "and" => SyntaxKind::And,
            "or" => SyntaxKind::Or,
            "not" => SyntaxKind::Not,
            "mod" => SyntaxKind::Mod,
            "true" => SyntaxKind::True,
            "false" => SyntaxKind::False,
            "invalid" => SyntaxKind::Invalid,
            "if" => SyntaxKind::If,
            "then" => SyntaxKind::Then,
            "else" => SyntaxKind::Else,
            "elseif" => SyntaxKind::ElseIf,
            "endif" => SyntaxKind::EndIf,
            "for" => SyntaxKind::For,
            "to" => SyntaxKind::To,
            "step" => SyntaxKind::Step,
            "next" => SyntaxKind::Next,
            "endfor" => SyntaxKind::EndFor,
            "each" => SyntaxKind::Each,
            "while" => SyntaxKind::While,
            "endwhile" => SyntaxKind::EndWhile,
            "exit" => SyntaxKind::Exit,
            "exitfor" => SyntaxKind::ExitFor,
            "exitwhile" => SyntaxKind::ExitWhile,
            "function" => SyntaxKind::Function,
            "endfunction" => SyntaxKind::EndFunction,
            "sub" => SyntaxKind::Sub,
            "endsub" => SyntaxKind::EndSub,
            "return" => SyntaxKind::Return,
            "print" => SyntaxKind::Print,
            "end" => SyntaxKind::End,
            "stop" => SyntaxKind::Stop,
            "goto" => SyntaxKind::Goto,
            _ => return None,
        };
        Some(kind)
    }

    /// The kind that two words separated by whitespace combine into,
    /// e.g. `end if` or `else if`.
    pub fn combine_keywords(first: SyntaxKind, second: SyntaxKind) -> Option<SyntaxKind> {
        match (first, second) {
            (SyntaxKind::End, SyntaxKind::If) => Some(SyntaxKind::EndIf),
            (SyntaxKind::End, SyntaxKind::For) => Some(SyntaxKind::EndFor),
            (SyntaxKind::End, SyntaxKind::While) => Some(SyntaxKind::EndWhile),
            (SyntaxKind::End, SyntaxKind::Function) => Some(SyntaxKind::EndFunction),
            (SyntaxKind::End, SyntaxKind::Sub) => Some(SyntaxKind::EndSub),
            (SyntaxKind::Exit, SyntaxKind::For) => Some(SyntaxKind::ExitFor),
            (SyntaxKind::Exit, SyntaxKind::While) => Some(SyntaxKind::ExitWhile),
            (SyntaxKind::Else, SyntaxKind::If) => Some(SyntaxKind::ElseIf),
            _ => None,
        }
    }

    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::And => Some("and"),
            SyntaxKind::Or => Some("or"),
            SyntaxKind::Not => Some("not"),
            SyntaxKind::Mod => Some("mod"),
            SyntaxKind::True => Some("true"),
            SyntaxKind::False => Some("false"),
            SyntaxKind::Invalid => Some("invalid"),
            SyntaxKind::If => Some("if"),
            SyntaxKind::Then => Some("then"),
            SyntaxKind::Else => Some("else"),
            SyntaxKind::ElseIf => Some("else if"),
            SyntaxKind::EndIf => Some("end if"),
            SyntaxKind::For => Some("for"),
            SyntaxKind::To => Some("to"),
            SyntaxKind::Step => Some("step"),
            SyntaxKind::Next => Some("next"),
            SyntaxKind::EndFor => Some("end for"),
            SyntaxKind::Each => Some("each"),
            SyntaxKind::While => Some("while"),
            SyntaxKind::EndWhile => Some("end while"),
            SyntaxKind::Exit => Some("exit"),
            SyntaxKind::ExitFor => Some("exit for"),
            SyntaxKind::ExitWhile => Some("exit while"),
            SyntaxKind::Function => Some("function"),
            SyntaxKind::EndFunction => Some("end function"),
            SyntaxKind::Sub => Some("sub"),
            SyntaxKind::EndSub => Some("end sub"),
            SyntaxKind::Return => Some("return"),
            SyntaxKind::Print => Some("print"),
            SyntaxKind::End => Some("end"),
            SyntaxKind::Stop => Some("stop"),
            SyntaxKind::Goto => Some("goto"),
            _ => None,
        }
    }

    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::LeftParen => Some("("),
            SyntaxKind::RightParen => Some(")"),
            SyntaxKind::LeftSquare => Some("["),
            SyntaxKind::RightSquare => Some("]"),
            SyntaxKind::LeftCurly => Some("{"),
            SyntaxKind::RightCurly => Some("}"),
            SyntaxKind::Comma => Some(","),
            SyntaxKind::Colon => Some(":"),
            SyntaxKind::Semicolon => Some(";"),
            SyntaxKind::Dot => Some("."),
            SyntaxKind::QuestionMark => Some("?"),
            SyntaxKind::Equal => Some("="),
            SyntaxKind::LessGreater => Some("<>"),
            SyntaxKind::Less => Some("<"),
            SyntaxKind::LessEqual => Some("<="),
            SyntaxKind::Greater => Some(">"),
            SyntaxKind::GreaterEqual => Some(">="),
            SyntaxKind::Plus => Some("+"),
            SyntaxKind::Minus => Some("-"),
            SyntaxKind::Star => Some("*"),
            SyntaxKind::Slash => Some("/"),
            SyntaxKind::Backslash => Some("\\"),
            SyntaxKind::Caret => Some("^"),
            SyntaxKind::LeftShift => Some("<<"),
            SyntaxKind::RightShift => Some(">>"),
            SyntaxKind::PlusPlus => Some("++"),
            SyntaxKind::MinusMinus => Some("--"),
            SyntaxKind::PlusEqual => Some("+="),
            SyntaxKind::MinusEqual => Some("-="),
            SyntaxKind::StarEqual => Some("*="),
            SyntaxKind::SlashEqual => Some("/="),
            SyntaxKind::BackslashEqual => Some("\\="),
            SyntaxKind::LeftShiftEqual => Some("<<="),
            SyntaxKind::RightShiftEqual => Some(">>="),
            _ => None,
        }
    }

    /// Display text used in diagnostics for an expected token.
    pub fn display_text(self) -> &'static str {
        self.punctuation_text()
            .or_else(|| self.keyword_text())
            .unwrap_or(match self {
                SyntaxKind::Newline => "newline",
                SyntaxKind::EndOfFile => "end of file",
                SyntaxKind::Identifier => "identifier",
                _ => "token",
            })
    }

    pub fn is_keyword(self) -> bool {
        self.keyword_text().is_some()
    }

    /// Identifiers and keywords. Any of these may name an AA member or
    /// follow a `.`.
    pub fn is_word(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral
                | SyntaxKind::IntegerLiteral
                | SyntaxKind::LongIntegerLiteral
                | SyntaxKind::FloatLiteral
                | SyntaxKind::DoubleLiteral
                | SyntaxKind::True
                | SyntaxKind::False
                | SyntaxKind::Invalid
        )
    }

    /// `=` and the compound assignment operators.
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Equal
                | SyntaxKind::PlusEqual
                | SyntaxKind::MinusEqual
                | SyntaxKind::StarEqual
                | SyntaxKind::SlashEqual
                | SyntaxKind::BackslashEqual
                | SyntaxKind::LeftShiftEqual
                | SyntaxKind::RightShiftEqual
        )
    }

    /// Tokens that end a statement.
    pub fn is_statement_separator(self) -> bool {
        matches!(self, SyntaxKind::Newline | SyntaxKind::Colon | SyntaxKind::EndOfFile)
    }
}
