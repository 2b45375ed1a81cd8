//! The BrightScript parser implementation.
//!
//! A recursive descent parser over the scanner's token stream. Statements
//! are parsed one at a time; a statement that fails to parse reports one
//! diagnostic, is dropped, and the parser resumes at the next statement
//! boundary. Expressions use precedence climbing.

use std::path::Path;

use bsc_ast::*;
use bsc_core::arena::alloc_vec_in;
use bsc_core::text::Range;
use bsc_diagnostics::{messages, type_mismatch, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use bsc_types::Type;
use bumpalo::Bump;

use crate::precedence::{get_binary_operator_precedence, OperatorPrecedence};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Keywords that close a block. Error recovery never skips past them.
const BLOCK_TERMINATORS: &[SyntaxKind] = &[
    SyntaxKind::EndIf,
    SyntaxKind::Else,
    SyntaxKind::ElseIf,
    SyntaxKind::EndWhile,
    SyntaxKind::EndFor,
    SyntaxKind::Next,
    SyntaxKind::EndSub,
    SyntaxKind::EndFunction,
];

const IF_TERMINATORS: &[SyntaxKind] = &[SyntaxKind::ElseIf, SyntaxKind::Else, SyntaxKind::EndIf];
const FOR_TERMINATORS: &[SyntaxKind] = &[SyntaxKind::EndFor, SyntaxKind::Next];
const FUNCTION_TERMINATORS: &[SyntaxKind] = &[SyntaxKind::EndSub, SyntaxKind::EndFunction];

/// Which language the token stream is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Plain BrightScript (`.brs`). BrighterScript-only syntax is reported.
    #[default]
    BrightScript,
    /// BrighterScript (`.bs`).
    BrighterScript,
}

impl ParseMode {
    /// The mode for a source file, chosen by its extension.
    pub fn for_path(path: &Path) -> ParseMode {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bs") => ParseMode::BrighterScript,
            _ => ParseMode::BrightScript,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub mode: ParseMode,
}

/// The outcome of one parse. The statement list is always present, even
/// when diagnostics were reported.
#[derive(Debug)]
pub struct ParseResult<'a> {
    pub statements: NodeList<'a, Statement<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Marks a statement that could not be parsed. The diagnostic has already
/// been reported by the time this is returned.
#[derive(Debug)]
struct Cancelled;

type PResult<T> = Result<T, Cancelled>;

/// The parser produces a statement list from BrightScript tokens.
pub struct Parser<'a, 't> {
    arena: &'a Bump,
    tokens: &'t [Token],
    /// Stands in for a missing end-of-file token.
    eof: Token,
    pos: usize,
    mode: ParseMode,
    diagnostics: DiagnosticCollection,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
    /// Number of enclosing function bodies.
    function_depth: u32,
    /// Set when the statement being parsed used syntax the current mode
    /// does not allow. The statement is dropped once it is complete.
    discard_statement: bool,
}

impl<'a, 't> Parser<'a, 't> {
    /// Parse a token stream. Empty input yields no statements and no
    /// diagnostics.
    pub fn parse(arena: &'a Bump, tokens: &'t [Token], options: ParseOptions) -> ParseResult<'a> {
        let mut parser = Parser::new(arena, tokens, options.mode);
        let mut statements = Vec::new();
        parser.parse_statements_into(&mut statements, &[]);
        tracing::trace!(
            tokens = tokens.len(),
            statements = statements.len(),
            diagnostics = parser.diagnostics.len(),
            "parsed token stream"
        );
        ParseResult {
            statements: alloc_vec_in(arena, statements),
            diagnostics: parser.diagnostics.into_diagnostics(),
        }
    }

    fn new(arena: &'a Bump, tokens: &'t [Token], mode: ParseMode) -> Self {
        let eof_range = tokens
            .last()
            .map(|token| Range::empty(token.range.end))
            .unwrap_or_default();
        Self {
            arena,
            tokens,
            eof: Token::eof(eof_range),
            pos: 0,
            mode,
            diagnostics: DiagnosticCollection::new(),
            recursion_depth: 0,
            function_depth: 0,
            discard_statement: false,
        }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn token(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    #[inline]
    fn kind(&self) -> SyntaxKind {
        self.token().kind
    }

    #[inline]
    fn range(&self) -> Range {
        self.token().range
    }

    fn peek_kind(&self, offset: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(SyntaxKind::EndOfFile, |token| token.kind)
    }

    /// Range of the most recently consumed token.
    fn previous_range(&self) -> Range {
        match self.pos.checked_sub(1).and_then(|index| self.tokens.get(index)) {
            Some(token) => token.range,
            None => Range::empty(self.range().start),
        }
    }

    #[inline]
    fn at(&self, kind: SyntaxKind) -> bool {
        self.kind() == kind
    }

    /// Whether the current token is the identifier `word`, e.g. `as` or `in`.
    fn at_contextual(&self, word: &str) -> bool {
        let token = self.token();
        token.kind == SyntaxKind::Identifier && token.text.eq_ignore_ascii_case(word)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn optional(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> PResult<Range> {
        if self.at(kind) {
            let range = self.range();
            self.advance();
            Ok(range)
        } else {
            let found = self.found_text();
            self.error_at_current(&messages::_0_EXPECTED_BUT_FOUND_1, &[kind.display_text(), &found]);
            Err(Cancelled)
        }
    }

    fn skip_newlines(&mut self) {
        while self.at(SyntaxKind::Newline) {
            self.advance();
        }
    }

    /// Text of the current token for use in messages.
    fn found_text(&self) -> String {
        let token = self.token();
        match token.kind {
            SyntaxKind::Newline | SyntaxKind::EndOfFile => token.kind.display_text().to_string(),
            _ => token.text.clone(),
        }
    }

    fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    fn alloc_text(&self) -> &'a str {
        self.arena.alloc_str(&self.token().text)
    }

    /// Consume the current token as a name.
    fn take_identifier(&mut self) -> Identifier<'a> {
        let identifier = Identifier {
            name: self.alloc_text(),
            range: self.range(),
        };
        self.advance();
        identifier
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    fn error_at(&mut self, message: &DiagnosticMessage, args: &[&str], range: Range) {
        self.diagnostics.add(Diagnostic::new(message, args, range));
    }

    fn error_at_current(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let range = self.range();
        self.error_at(message, args, range);
    }

    // ========================================================================
    // Statement lists
    // ========================================================================

    /// Parse statements until end of file or one of `terminators`, which is
    /// left unconsumed.
    fn parse_statements_into(&mut self, statements: &mut Vec<Statement<'a>>, terminators: &[SyntaxKind]) {
        loop {
            match self.kind() {
                SyntaxKind::Newline | SyntaxKind::Colon => {
                    self.advance();
                    continue;
                }
                SyntaxKind::EndOfFile => break,
                SyntaxKind::Comment => {
                    let comment = self.parse_comment(true);
                    statements.push(Statement::Comment(comment));
                    continue;
                }
                kind if self.is_terminator(kind, terminators) => break,
                _ => {}
            }

            let start = self.pos;
            match self.parse_statement() {
                Ok(statement) => {
                    statements.push(statement);
                    self.finish_statement(statements);
                }
                Err(Cancelled) => {
                    if self.pos == start {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }
    }

    /// Whether `kind` closes the body being parsed. Inside a function, `end
    /// sub` and `end function` close every nested body as well. A keyword
    /// followed by an assignment operator is an assignment target instead.
    fn is_terminator(&self, kind: SyntaxKind, terminators: &[SyntaxKind]) -> bool {
        let closes = terminators.contains(&kind)
            || (self.function_depth > 0 && FUNCTION_TERMINATORS.contains(&kind));
        closes && !self.peek_kind(1).is_assignment_operator()
    }

    /// Handle what follows a complete statement: a comment on the same line
    /// becomes its own statement, anything else must end the line.
    fn finish_statement(&mut self, statements: &mut Vec<Statement<'a>>) {
        if self.at(SyntaxKind::Comment) {
            let comment = self.parse_comment(false);
            statements.push(Statement::Comment(comment));
        }
        match self.kind() {
            kind if kind.is_statement_separator() || BLOCK_TERMINATORS.contains(&kind) => {}
            _ => {
                self.error_at_current(&messages::EXPECTED_NEWLINE_OR_COLON, &[]);
                self.advance();
                match statements.last() {
                    Some(Statement::If(node)) if node.is_inline => self.synchronize_inline_if(),
                    _ => self.synchronize(),
                }
            }
        }
    }

    /// Skip to the next statement boundary.
    fn synchronize(&mut self) {
        loop {
            match self.kind() {
                kind if kind.is_statement_separator() || BLOCK_TERMINATORS.contains(&kind) => break,
                _ => self.advance(),
            }
        }
    }

    /// Skip the rest of a single-line `if`. Its `else` branches share the
    /// line, so unlike [`Parser::synchronize`] this does not stop at them.
    fn synchronize_inline_if(&mut self) {
        loop {
            match self.kind() {
                SyntaxKind::Newline | SyntaxKind::Comment | SyntaxKind::EndOfFile => break,
                SyntaxKind::Else | SyntaxKind::ElseIf => self.advance(),
                kind if BLOCK_TERMINATORS.contains(&kind) => break,
                _ => self.advance(),
            }
        }
    }

    /// Parse the body of a block up to one of `terminators`. A comment right
    /// after the block header is the first statement of the body.
    fn parse_block(&mut self, terminators: &[SyntaxKind]) -> Block<'a> {
        let start = self.range();
        let mut statements = Vec::new();
        if self.at(SyntaxKind::Comment) {
            statements.push(Statement::Comment(self.parse_comment(false)));
        }
        self.parse_statements_into(&mut statements, terminators);
        self.make_block(statements, start)
    }

    fn make_block(&self, statements: Vec<Statement<'a>>, start: Range) -> Block<'a> {
        // Starts on the header line so a leading comment can be told apart
        // from one on its own line.
        let range = match statements.last() {
            Some(last) => start.union(&last.range()),
            None => Range::empty(start.start),
        };
        Block {
            data: NodeData::new(SyntaxKind::Block, range),
            statements: alloc_vec_in(self.arena, statements),
        }
    }

    /// Parse a comment. With `merge_following`, own-line comments on the
    /// directly following lines are joined into this one.
    fn parse_comment(&mut self, merge_following: bool) -> CommentStatement<'a> {
        let first = self.range();
        let mut text = self.token().text.clone();
        let mut range = first;
        self.advance();

        if merge_following {
            let tokens = self.tokens;
            while self.at(SyntaxKind::Newline) && self.peek_kind(1) == SyntaxKind::Comment {
                let next = &tokens[self.pos + 1];
                if next.range.start.line != range.end.line + 1 {
                    break;
                }
                text.push('\n');
                text.push_str(&next.text);
                range = range.union(&next.range);
                self.advance();
                self.advance();
            }
        }

        CommentStatement {
            data: NodeData::new(SyntaxKind::CommentStatement, range),
            text: self.arena.alloc_str(&text),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> PResult<Statement<'a>> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.error_at_current(&messages::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[]);
            self.recursion_depth -= 1;
            return Err(Cancelled);
        }
        let outer_discard = std::mem::replace(&mut self.discard_statement, false);
        let result = self.parse_statement_kind();
        let discard = std::mem::replace(&mut self.discard_statement, outer_discard);
        self.recursion_depth -= 1;
        if discard {
            return Err(Cancelled);
        }
        result
    }

    fn parse_statement_kind(&mut self) -> PResult<Statement<'a>> {
        let kind = self.kind();
        // `word = value`. Reserved words are reported but still assigned.
        if kind.is_word() && self.peek_kind(1).is_assignment_operator() {
            return self.parse_assignment();
        }

        match kind {
            SyntaxKind::If => self.parse_if_statement(),
            SyntaxKind::While => self.parse_while_statement(),
            SyntaxKind::For => self.parse_for_statement(),
            SyntaxKind::Function | SyntaxKind::Sub => self.parse_function_declaration(),
            SyntaxKind::Return => self.parse_return_statement(),
            SyntaxKind::Print | SyntaxKind::QuestionMark => self.parse_print_statement(),
            SyntaxKind::Goto => {
                let start = self.range();
                self.advance();
                let label = self.parse_identifier()?;
                Ok(Statement::Goto(GotoStatement {
                    data: NodeData::new(SyntaxKind::GotoStatement, start.union(&label.range)),
                    label,
                }))
            }
            SyntaxKind::ExitFor => Ok(Statement::ExitFor(self.parse_keyword_statement(SyntaxKind::ExitForStatement))),
            SyntaxKind::ExitWhile => {
                Ok(Statement::ExitWhile(self.parse_keyword_statement(SyntaxKind::ExitWhileStatement)))
            }
            SyntaxKind::End => Ok(Statement::End(self.parse_keyword_statement(SyntaxKind::EndStatement))),
            SyntaxKind::Stop => Ok(Statement::Stop(self.parse_keyword_statement(SyntaxKind::StopStatement))),
            SyntaxKind::Identifier
                if self.peek_kind(1) == SyntaxKind::Colon
                    && matches!(
                        self.peek_kind(2),
                        SyntaxKind::Newline | SyntaxKind::EndOfFile | SyntaxKind::Comment
                    ) =>
            {
                let name = self.take_identifier();
                self.advance();
                Ok(Statement::Label(LabelStatement {
                    data: NodeData::new(SyntaxKind::LabelStatement, name.range),
                    name,
                }))
            }
            kind if kind.is_keyword() && !starts_expression(kind) => {
                let found = self.found_text();
                self.error_at_current(&messages::UNEXPECTED_TOKEN, &[&found]);
                self.advance();
                Err(Cancelled)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_keyword_statement(&mut self, kind: SyntaxKind) -> NodeData {
        let data = NodeData::new(kind, self.range());
        self.advance();
        data
    }

    /// Parse a name being declared or assigned. Reserved words are reported
    /// once and still accepted so the rest of the statement parses.
    fn parse_identifier(&mut self) -> PResult<Identifier<'a>> {
        let kind = self.kind();
        if !kind.is_word() {
            let found = self.found_text();
            self.error_at_current(&messages::EXPECTED_IDENTIFIER_BUT_FOUND_0, &[&found]);
            return Err(Cancelled);
        }
        let identifier = self.take_identifier();
        if is_reserved_word(identifier.name) {
            self.error_at(
                &messages::CANNOT_USE_RESERVED_WORD_0_AS_IDENTIFIER,
                &[identifier.name],
                identifier.range,
            );
        } else if kind != SyntaxKind::Identifier {
            self.error_at(&messages::EXPECTED_IDENTIFIER_BUT_FOUND_0, &[identifier.name], identifier.range);
        }
        Ok(identifier)
    }

    fn parse_assignment(&mut self) -> PResult<Statement<'a>> {
        let name = self.parse_identifier()?;
        let operator = self.kind();
        self.advance();
        let value = self.parse_expression()?;
        Ok(Statement::Assignment(AssignmentStatement {
            data: NodeData::new(SyntaxKind::AssignmentStatement, name.range.union(&value.range())),
            name,
            operator,
            value,
        }))
    }

    /// A statement that starts with an expression: a call, a property or
    /// index assignment, or an increment.
    fn parse_expression_statement(&mut self) -> PResult<Statement<'a>> {
        let left = self.parse_unary_expression()?;
        let kind = self.kind();

        if kind.is_assignment_operator() {
            return self.parse_set_statement(left);
        }

        if matches!(kind, SyntaxKind::PlusPlus | SyntaxKind::MinusMinus) {
            let range = left.range().union(&self.range());
            self.advance();
            return Ok(Statement::Increment(IncrementStatement {
                data: NodeData::new(SyntaxKind::IncrementStatement, range),
                value: self.alloc(left),
                operator: kind,
            }));
        }

        let expression = if get_binary_operator_precedence(kind) != OperatorPrecedence::Invalid
            || kind == SyntaxKind::QuestionMark
        {
            let left = self.parse_binary_rest(left, OperatorPrecedence::Conditional)?;
            self.parse_conditional_rest(left)?
        } else {
            left
        };

        if !expression.is_call() {
            if !self.discard_statement {
                self.error_at(&messages::EXPECTED_STATEMENT_OR_FUNCTION_CALL, &[], expression.range());
            }
            return Err(Cancelled);
        }

        Ok(Statement::Expression(ExpressionStatement {
            data: NodeData::new(SyntaxKind::ExpressionStatement, expression.range()),
            expression: self.alloc(expression),
        }))
    }

    /// `object.name = value` or `object[index] = value`.
    fn parse_set_statement(&mut self, target: Expression<'a>) -> PResult<Statement<'a>> {
        let operator = self.kind();
        let operator_range = self.range();
        let operator_text = self.found_text();
        self.advance();

        match target {
            Expression::Variable(variable) => {
                let value = self.parse_expression()?;
                Ok(Statement::Assignment(AssignmentStatement {
                    data: NodeData::new(SyntaxKind::AssignmentStatement, variable.data.range.union(&value.range())),
                    name: variable.name,
                    operator,
                    value,
                }))
            }
            Expression::DottedGet(get) => {
                let value = self.parse_expression()?;
                Ok(Statement::DottedSet(DottedSetStatement {
                    data: NodeData::new(SyntaxKind::DottedSetStatement, get.data.range.union(&value.range())),
                    object: get.object,
                    name: get.name,
                    operator,
                    value,
                }))
            }
            Expression::IndexedGet(get) => {
                let value = self.parse_expression()?;
                Ok(Statement::IndexedSet(IndexedSetStatement {
                    data: NodeData::new(SyntaxKind::IndexedSetStatement, get.data.range.union(&value.range())),
                    object: get.object,
                    index: get.index,
                    operator,
                    value,
                }))
            }
            _ => {
                self.error_at(&messages::UNEXPECTED_TOKEN, &[&operator_text], operator_range);
                Err(Cancelled)
            }
        }
    }

    fn parse_print_statement(&mut self) -> PResult<Statement<'a>> {
        let start = self.range();
        self.advance();
        let mut items = Vec::new();
        loop {
            match self.kind() {
                SyntaxKind::Newline
                | SyntaxKind::Colon
                | SyntaxKind::EndOfFile
                | SyntaxKind::Comment
                | SyntaxKind::Else
                | SyntaxKind::ElseIf => break,
                separator @ (SyntaxKind::Semicolon | SyntaxKind::Comma) => {
                    items.push(PrintItem::Separator(separator));
                    self.advance();
                }
                _ => items.push(PrintItem::Expression(self.parse_expression()?)),
            }
        }
        Ok(Statement::Print(PrintStatement {
            data: NodeData::new(SyntaxKind::PrintStatement, start.union(&self.previous_range())),
            items: alloc_vec_in(self.arena, items),
        }))
    }

    fn parse_return_statement(&mut self) -> PResult<Statement<'a>> {
        let start = self.range();
        self.advance();
        let value = match self.kind() {
            SyntaxKind::Newline
            | SyntaxKind::Colon
            | SyntaxKind::EndOfFile
            | SyntaxKind::Comment
            | SyntaxKind::Else
            | SyntaxKind::ElseIf => None,
            _ => Some(self.parse_expression()?),
        };
        Ok(Statement::Return(ReturnStatement {
            data: NodeData::new(SyntaxKind::ReturnStatement, start.union(&self.previous_range())),
            value,
        }))
    }

    /// Consume the keyword that closes `construct`, or report it missing.
    fn expect_terminator(&mut self, kind: SyntaxKind, construct: &str) {
        if !self.optional(kind) {
            self.error_at_current(&messages::EXPECTED_0_TO_TERMINATE_1, &[kind.display_text(), construct]);
        }
    }

    fn parse_if_statement(&mut self) -> PResult<Statement<'a>> {
        let start = self.range();
        self.advance();
        let condition = self.parse_expression()?;
        self.optional(SyntaxKind::Then);

        if !matches!(self.kind(), SyntaxKind::Newline | SyntaxKind::Comment | SyntaxKind::EndOfFile) {
            return self.parse_inline_if(start, condition);
        }

        let then_branch = self.parse_block(IF_TERMINATORS);
        let mut else_ifs = Vec::new();
        let mut else_branch = None;
        loop {
            match self.kind() {
                SyntaxKind::ElseIf => {
                    let clause_start = self.range();
                    self.advance();
                    let condition = self.parse_expression()?;
                    self.optional(SyntaxKind::Then);
                    let then_branch = self.parse_block(IF_TERMINATORS);
                    else_ifs.push(ElseIfClause {
                        data: NodeData::new(SyntaxKind::ElseIfClause, clause_start.union(&self.previous_range())),
                        condition,
                        then_branch,
                    });
                }
                SyntaxKind::Else => {
                    self.advance();
                    else_branch = Some(self.parse_block(&[SyntaxKind::EndIf]));
                    break;
                }
                _ => break,
            }
        }
        self.expect_terminator(SyntaxKind::EndIf, "if");

        Ok(Statement::If(IfStatement {
            data: NodeData::new(SyntaxKind::IfStatement, start.union(&self.previous_range())),
            condition,
            then_branch,
            else_ifs: alloc_vec_in(self.arena, else_ifs),
            else_branch,
            is_inline: false,
        }))
    }

    /// `if cond then stmt [: stmt]* [else if ...] [else stmt [: stmt]*]`
    ///
    /// A failed branch drops the whole line, so its diagnostic is the only one.
    fn parse_inline_if(&mut self, start: Range, condition: &'a Expression<'a>) -> PResult<Statement<'a>> {
        let result = self.parse_inline_if_branches(start, condition);
        if result.is_err() {
            self.synchronize_inline_if();
        }
        result
    }

    fn parse_inline_if_branches(&mut self, start: Range, condition: &'a Expression<'a>) -> PResult<Statement<'a>> {
        let then_branch = self.parse_inline_block()?;
        let mut else_ifs = Vec::new();
        let mut else_branch = None;
        loop {
            match self.kind() {
                SyntaxKind::ElseIf => {
                    let clause_start = self.range();
                    self.advance();
                    let condition = self.parse_expression()?;
                    self.optional(SyntaxKind::Then);
                    let then_branch = self.parse_inline_block()?;
                    else_ifs.push(ElseIfClause {
                        data: NodeData::new(SyntaxKind::ElseIfClause, clause_start.union(&self.previous_range())),
                        condition,
                        then_branch,
                    });
                }
                SyntaxKind::Else => {
                    self.advance();
                    else_branch = Some(self.parse_inline_block()?);
                    break;
                }
                _ => break,
            }
        }

        Ok(Statement::If(IfStatement {
            data: NodeData::new(SyntaxKind::IfStatement, start.union(&self.previous_range())),
            condition,
            then_branch,
            else_ifs: alloc_vec_in(self.arena, else_ifs),
            else_branch,
            is_inline: true,
        }))
    }

    /// Colon-separated statements up to the end of the line or `else`.
    fn parse_inline_block(&mut self) -> PResult<Block<'a>> {
        let start = self.range();
        let mut statements = Vec::new();
        loop {
            statements.push(self.parse_statement()?);
            if !self.optional(SyntaxKind::Colon) {
                break;
            }
            if matches!(
                self.kind(),
                SyntaxKind::Newline | SyntaxKind::EndOfFile | SyntaxKind::Comment | SyntaxKind::Else | SyntaxKind::ElseIf
            ) {
                break;
            }
        }
        Ok(self.make_block(statements, start))
    }

    fn parse_while_statement(&mut self) -> PResult<Statement<'a>> {
        let start = self.range();
        self.advance();
        let condition = self.parse_expression()?;
        let body = self.parse_block(&[SyntaxKind::EndWhile]);
        self.expect_terminator(SyntaxKind::EndWhile, "while");
        Ok(Statement::While(WhileStatement {
            data: NodeData::new(SyntaxKind::WhileStatement, start.union(&self.previous_range())),
            condition,
            body,
        }))
    }

    fn parse_for_statement(&mut self) -> PResult<Statement<'a>> {
        let start = self.range();
        self.advance();
        if self.optional(SyntaxKind::Each) {
            return self.parse_for_each_rest(start);
        }

        let counter = self.parse_identifier()?;
        self.expect(SyntaxKind::Equal)?;
        let initial = self.parse_expression()?;
        self.expect(SyntaxKind::To)?;
        let end = self.parse_expression()?;
        let step = if self.optional(SyntaxKind::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let body = self.parse_block(FOR_TERMINATORS);
        self.finish_for_loop();

        Ok(Statement::For(ForStatement {
            data: NodeData::new(SyntaxKind::ForStatement, start.union(&self.previous_range())),
            counter,
            start: initial,
            end,
            step,
            body,
        }))
    }

    /// `for each item in target`, after `for each`.
    fn parse_for_each_rest(&mut self, start: Range) -> PResult<Statement<'a>> {
        let item = self.parse_identifier()?;
        if !self.at_contextual("in") {
            let found = self.found_text();
            self.error_at_current(&messages::_0_EXPECTED_BUT_FOUND_1, &["in", &found]);
            return Err(Cancelled);
        }
        self.advance();
        let target = self.parse_expression()?;
        let body = self.parse_block(FOR_TERMINATORS);
        self.finish_for_loop();

        Ok(Statement::ForEach(ForEachStatement {
            data: NodeData::new(SyntaxKind::ForEachStatement, start.union(&self.previous_range())),
            item,
            target,
            body,
        }))
    }

    /// `end for`, or `next` with an optional counter name.
    fn finish_for_loop(&mut self) {
        if self.optional(SyntaxKind::Next) {
            if self.at(SyntaxKind::Identifier) {
                self.advance();
            }
        } else {
            self.expect_terminator(SyntaxKind::EndFor, "for");
        }
    }

    fn parse_function_declaration(&mut self) -> PResult<Statement<'a>> {
        let start = self.range();
        let is_sub = self.at(SyntaxKind::Sub);
        self.advance();
        let name = self.parse_identifier()?;
        let func = self.parse_function_rest(start, is_sub)?;
        Ok(Statement::FunctionDeclaration(FunctionDeclaration {
            data: NodeData::new(SyntaxKind::FunctionDeclaration, func.data.range),
            name,
            func,
        }))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Everything after `function name` or an anonymous `function`: the
    /// parameter list, return type, body and closing keyword.
    fn parse_function_rest(&mut self, start: Range, is_sub: bool) -> PResult<FunctionExpression<'a>> {
        self.expect(SyntaxKind::LeftParen)?;
        let parameters = self.parse_parameters()?;
        let return_type = if self.at_contextual("as") {
            self.advance();
            self.parse_type()?
        } else if is_sub {
            Type::Void
        } else {
            Type::Dynamic
        };

        self.function_depth += 1;
        let body = self.parse_block(FUNCTION_TERMINATORS);
        self.function_depth -= 1;

        let (expected, construct) = if is_sub {
            (SyntaxKind::EndSub, "sub")
        } else {
            (SyntaxKind::EndFunction, "function")
        };
        match self.kind() {
            kind @ (SyntaxKind::EndSub | SyntaxKind::EndFunction) => {
                if kind != expected {
                    self.error_at_current(&messages::EXPECTED_0_TO_TERMINATE_1, &[expected.display_text(), construct]);
                }
                self.advance();
            }
            _ => self.error_at_current(&messages::EXPECTED_0_TO_TERMINATE_1, &[expected.display_text(), construct]),
        }

        Ok(FunctionExpression {
            data: NodeData::new(SyntaxKind::FunctionExpression, start.union(&self.previous_range())),
            is_sub,
            parameters,
            return_type,
            body,
        })
    }

    /// Parameters up to and including the closing `)`.
    fn parse_parameters(&mut self) -> PResult<NodeList<'a, Parameter<'a>>> {
        let mut parameters: Vec<Parameter<'a>> = Vec::new();
        let mut seen_optional = false;
        if !self.at(SyntaxKind::RightParen) {
            loop {
                let parameter = self.parse_parameter()?;
                if !parameter.is_required() {
                    seen_optional = true;
                } else if seen_optional {
                    self.error_at(
                        &messages::REQUIRED_PARAMETER_AFTER_OPTIONAL,
                        &[parameter.name.name],
                        parameter.name.range,
                    );
                }
                parameters.push(parameter);
                if !self.optional(SyntaxKind::Comma) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::RightParen)?;
        Ok(alloc_vec_in(self.arena, parameters))
    }

    /// `name [= default] [as type]`
    fn parse_parameter(&mut self) -> PResult<Parameter<'a>> {
        let name = self.parse_identifier()?;
        let default_value = if self.optional(SyntaxKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let ty = if self.at_contextual("as") {
            self.advance();
            self.parse_type()?
        } else {
            Type::Dynamic
        };

        // `invalid` is the conventional "no value" default for any type.
        if let Some(Expression::Literal(literal)) = default_value {
            let literal_type = literal.ty();
            if literal_type != Type::Invalid && !literal_type.is_convertible_to(&ty) {
                self.diagnostics.add(type_mismatch(&literal_type, &ty, literal.data.range));
            }
        }

        Ok(Parameter {
            data: NodeData::new(SyntaxKind::Parameter, name.range.union(&self.previous_range())),
            name,
            ty,
            default_value,
        })
    }

    /// The type name after `as`. Unknown names are reported and treated as
    /// `dynamic`.
    fn parse_type(&mut self) -> PResult<Type> {
        if !self.kind().is_word() {
            let found = self.found_text();
            self.error_at_current(&messages::EXPECTED_IDENTIFIER_BUT_FOUND_0, &[&found]);
            return Err(Cancelled);
        }
        let range = self.range();
        let name = self.token().text.clone();
        self.advance();
        match Type::from_type_name(&name) {
            Some(ty) => Ok(ty),
            None => {
                self.error_at(&messages::UNKNOWN_TYPE_0, &[&name], range);
                Ok(Type::Dynamic)
            }
        }
    }

    // ========================================================================
    // Expression parsing
    // ========================================================================

    fn parse_expression(&mut self) -> PResult<&'a Expression<'a>> {
        let expression = self.parse_expression_value()?;
        Ok(self.alloc(expression))
    }

    fn parse_expression_value(&mut self) -> PResult<Expression<'a>> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.error_at_current(&messages::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[]);
            self.recursion_depth -= 1;
            return Err(Cancelled);
        }
        let result = self.parse_conditional_expression();
        self.recursion_depth -= 1;
        result
    }

    fn parse_conditional_expression(&mut self) -> PResult<Expression<'a>> {
        let test = self.parse_binary_expression(OperatorPrecedence::Conditional)?;
        self.parse_conditional_rest(test)
    }

    /// `test ? consequent : alternate`, right-associative. In BrightScript
    /// files the expression is still parsed so the statement ends cleanly,
    /// then the whole statement is dropped.
    fn parse_conditional_rest(&mut self, test: Expression<'a>) -> PResult<Expression<'a>> {
        if !self.at(SyntaxKind::QuestionMark) {
            return Ok(test);
        }
        if self.mode == ParseMode::BrightScript {
            if !self.discard_statement {
                self.error_at_current(&messages::BS_FEATURE_NOT_SUPPORTED_IN_BRS_FILES, &["ternary operator"]);
            }
            self.discard_statement = true;
        }
        self.advance();

        let consequent = self.parse_expression()?;
        self.expect(SyntaxKind::Colon)?;
        let alternate = self.parse_expression()?;
        let range = test.range().union(&alternate.range());
        Ok(Expression::Conditional(ConditionalExpression {
            data: NodeData::new(SyntaxKind::ConditionalExpression, range),
            test: self.alloc(test),
            consequent,
            alternate,
        }))
    }

    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> PResult<Expression<'a>> {
        let left = self.parse_unary_expression()?;
        self.parse_binary_rest(left, min_precedence)
    }

    /// Continue a binary expression whose left operand is already parsed.
    fn parse_binary_rest(
        &mut self,
        mut left: Expression<'a>,
        min_precedence: OperatorPrecedence,
    ) -> PResult<Expression<'a>> {
        loop {
            let operator = self.kind();
            let precedence = get_binary_operator_precedence(operator);
            if precedence == OperatorPrecedence::Invalid || precedence <= min_precedence {
                break;
            }

            let operator_text = self.alloc_text();
            self.advance();
            let right = self.parse_binary_expression(precedence)?;
            let range = left.range().union(&right.range());
            left = Expression::Binary(BinaryExpression {
                data: NodeData::new(SyntaxKind::BinaryExpression, range),
                left: self.alloc(left),
                operator,
                operator_text,
                right: self.alloc(right),
            });
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> PResult<Expression<'a>> {
        let operator = self.kind();
        if !matches!(operator, SyntaxKind::Not | SyntaxKind::Minus | SyntaxKind::Plus) {
            return self.parse_postfix_expression();
        }

        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.error_at_current(&messages::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[]);
            self.recursion_depth -= 1;
            return Err(Cancelled);
        }
        let start = self.range();
        let operator_text = self.alloc_text();
        self.advance();
        // `not` applies to a whole relational expression, `-` and `+` to
        // the next operand only.
        let operand = if operator == SyntaxKind::Not {
            self.parse_binary_expression(OperatorPrecedence::Not)
        } else {
            self.parse_unary_expression()
        };
        self.recursion_depth -= 1;

        let operand = operand?;
        Ok(Expression::Unary(UnaryExpression {
            data: NodeData::new(SyntaxKind::UnaryExpression, start.union(&operand.range())),
            operator,
            operator_text,
            operand: self.alloc(operand),
        }))
    }

    /// A primary expression followed by any number of calls, `.name` and
    /// `[index]` accessors.
    fn parse_postfix_expression(&mut self) -> PResult<Expression<'a>> {
        let mut expression = self.parse_primary_expression()?;

        loop {
            match self.kind() {
                SyntaxKind::LeftParen => {
                    self.advance();
                    let args = self.parse_call_arguments()?;
                    let range = expression.range().union(&self.previous_range());
                    expression = Expression::Call(CallExpression {
                        data: NodeData::new(SyntaxKind::CallExpression, range),
                        callee: self.alloc(expression),
                        args,
                    });
                }
                SyntaxKind::Dot => {
                    let dot = self.range();
                    self.advance();
                    match self.kind() {
                        kind if kind.is_word() => {
                            let name = self.take_identifier();
                            let range = expression.range().union(&name.range);
                            expression = Expression::DottedGet(DottedGetExpression {
                                data: NodeData::new(SyntaxKind::DottedGetExpression, range),
                                object: self.alloc(expression),
                                name,
                            });
                        }
                        SyntaxKind::Newline | SyntaxKind::EndOfFile | SyntaxKind::Comment | SyntaxKind::Colon => {
                            // Keep what was parsed so far, the line is still usable.
                            self.error_at(&messages::EXPECTED_PROPERTY_NAME_AFTER_PERIOD, &[], dot);
                            break;
                        }
                        _ => {
                            self.error_at(&messages::EXPECTED_PROPERTY_NAME_AFTER_PERIOD, &[], dot);
                            return Err(Cancelled);
                        }
                    }
                }
                SyntaxKind::LeftSquare => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(SyntaxKind::RightSquare)?;
                    let range = expression.range().union(&self.previous_range());
                    expression = Expression::IndexedGet(IndexedGetExpression {
                        data: NodeData::new(SyntaxKind::IndexedGetExpression, range),
                        object: self.alloc(expression),
                        index,
                    });
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    /// Arguments up to and including the closing `)`.
    fn parse_call_arguments(&mut self) -> PResult<NodeList<'a, Expression<'a>>> {
        let mut args = Vec::new();
        self.skip_newlines();
        if !self.at(SyntaxKind::RightParen) {
            loop {
                args.push(self.parse_expression_value()?);
                self.skip_newlines();
                if !self.optional(SyntaxKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }
        self.expect(SyntaxKind::RightParen)?;
        Ok(alloc_vec_in(self.arena, args))
    }

    fn parse_primary_expression(&mut self) -> PResult<Expression<'a>> {
        let kind = self.kind();
        match kind {
            kind if kind.is_literal() => {
                let literal = LiteralExpression {
                    data: NodeData::new(SyntaxKind::LiteralExpression, self.range()),
                    token_kind: kind,
                    text: self.alloc_text(),
                };
                self.advance();
                Ok(Expression::Literal(literal))
            }
            SyntaxKind::Identifier => {
                let name = self.take_identifier();
                Ok(Expression::Variable(VariableExpression {
                    data: NodeData::new(SyntaxKind::VariableExpression, name.range),
                    name,
                }))
            }
            SyntaxKind::LeftParen => {
                let start = self.range();
                self.advance();
                let expression = self.parse_expression()?;
                self.expect(SyntaxKind::RightParen)?;
                Ok(Expression::Grouping(GroupingExpression {
                    data: NodeData::new(SyntaxKind::GroupingExpression, start.union(&self.previous_range())),
                    expression,
                }))
            }
            SyntaxKind::LeftSquare => self.parse_array_literal(),
            SyntaxKind::LeftCurly => self.parse_aa_literal(),
            SyntaxKind::Function | SyntaxKind::Sub => {
                let start = self.range();
                self.advance();
                let func = self.parse_function_rest(start, kind == SyntaxKind::Sub)?;
                Ok(Expression::Function(func))
            }
            _ => {
                let found = self.found_text();
                self.error_at_current(&messages::EXPECTED_EXPRESSION_BUT_FOUND_0, &[&found]);
                Err(Cancelled)
            }
        }
    }

    /// `[a, b, c]`, with newlines allowed between elements and comments
    /// skipped.
    fn parse_array_literal(&mut self) -> PResult<Expression<'a>> {
        let start = self.range();
        self.advance();
        let mut elements = Vec::new();
        loop {
            while matches!(self.kind(), SyntaxKind::Newline | SyntaxKind::Comment) {
                self.advance();
            }
            if self.at(SyntaxKind::RightSquare) {
                break;
            }
            elements.push(self.parse_expression_value()?);
            if !self.optional(SyntaxKind::Comma)
                && !matches!(self.kind(), SyntaxKind::Newline | SyntaxKind::Comment | SyntaxKind::RightSquare)
            {
                let found = self.found_text();
                self.error_at_current(&messages::_0_EXPECTED_BUT_FOUND_1, &["]", &found]);
                return Err(Cancelled);
            }
        }
        self.expect(SyntaxKind::RightSquare)?;
        Ok(Expression::ArrayLiteral(ArrayLiteralExpression {
            data: NodeData::new(SyntaxKind::ArrayLiteralExpression, start.union(&self.previous_range())),
            elements: alloc_vec_in(self.arena, elements),
        }))
    }

    /// `{key: value, "key": value}`. Keys may be any word, including
    /// reserved words. Comments between members are kept as members.
    fn parse_aa_literal(&mut self) -> PResult<Expression<'a>> {
        let start = self.range();
        self.advance();
        let mut members = Vec::new();
        loop {
            self.skip_newlines();
            match self.kind() {
                SyntaxKind::RightCurly => break,
                SyntaxKind::Comment => {
                    members.push(AAMember::Comment(self.parse_comment(false)));
                    continue;
                }
                _ => {}
            }

            let key_range = self.range();
            let (key, quoted) = match self.kind() {
                SyntaxKind::StringLiteral => {
                    let token = self.token();
                    let key: &'a str = match &token.literal {
                        Some(LiteralValue::String(value)) => self.arena.alloc_str(value),
                        _ => self.arena.alloc_str(token.text.trim_matches('"')),
                    };
                    (key, true)
                }
                kind if kind.is_word() => (self.alloc_text(), false),
                _ => {
                    let found = self.found_text();
                    self.error_at_current(&messages::EXPECTED_IDENTIFIER_BUT_FOUND_0, &[&found]);
                    return Err(Cancelled);
                }
            };
            self.advance();
            self.expect(SyntaxKind::Colon)?;
            let value = self.parse_expression()?;
            members.push(AAMember::Property(AAProperty {
                data: NodeData::new(SyntaxKind::AAMember, key_range.union(&value.range())),
                key,
                quoted,
                value,
            }));

            if !self.optional(SyntaxKind::Comma)
                && !matches!(self.kind(), SyntaxKind::Newline | SyntaxKind::Comment | SyntaxKind::RightCurly)
            {
                let found = self.found_text();
                self.error_at_current(&messages::_0_EXPECTED_BUT_FOUND_1, &["}", &found]);
                return Err(Cancelled);
            }
        }
        self.expect(SyntaxKind::RightCurly)?;
        Ok(Expression::AALiteral(AALiteralExpression {
            data: NodeData::new(SyntaxKind::AALiteralExpression, start.union(&self.previous_range())),
            members: alloc_vec_in(self.arena, members),
        }))
    }
}

/// Keywords that may begin an expression statement.
fn starts_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::True | SyntaxKind::False | SyntaxKind::Invalid | SyntaxKind::Not
    )
}
