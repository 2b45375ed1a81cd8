//! The BrightScript scanner.
//!
//! Walks the source text once, producing every token up front. Columns are
//! counted in UTF-16 code units so ranges line up with editor positions.

use crate::char_codes::*;
use bsc_ast::{LiteralValue, SyntaxKind, Token};
use bsc_core::text::{Position, Range};
use bsc_diagnostics::{messages, Diagnostic, DiagnosticCollection};

/// The tokens and diagnostics produced for one source text.
#[derive(Debug)]
pub struct ScanResult {
    /// Always terminated by an EndOfFile token.
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Saved scanner state for lookahead.
#[derive(Clone, Copy)]
struct ScannerState {
    pos: usize,
    line: u32,
    character: u32,
}

/// The scanner converts source text into tokens.
pub struct Lexer<'s> {
    text: &'s str,
    /// Current byte offset.
    pos: usize,
    line: u32,
    character: u32,
    /// Byte offset and position where the current token starts.
    token_start: usize,
    token_start_pos: Position,
    tokens: Vec<Token>,
    diagnostics: DiagnosticCollection,
}

impl<'s> Lexer<'s> {
    fn new(text: &'s str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
            character: 0,
            token_start: 0,
            token_start_pos: Position::default(),
            tokens: Vec::new(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Scan the whole text.
    pub fn scan(text: &str) -> ScanResult {
        let mut lexer = Lexer::new(text);
        while lexer.pos < lexer.text.len() {
            lexer.scan_token();
        }
        let end = lexer.position();
        lexer.tokens.push(Token::eof(Range::empty(end)));
        ScanResult {
            tokens: lexer.tokens,
            diagnostics: lexer.diagnostics.into_diagnostics(),
        }
    }

    // ========================================================================
    // Cursor management
    // ========================================================================

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.text[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.character = 0;
        } else {
            self.character += ch.len_utf16() as u32;
        }
        Some(ch)
    }

    /// Jump forward to a byte offset on the current line.
    fn advance_to(&mut self, end: usize) {
        self.character += utf16_len(&self.text[self.pos..end]);
        self.pos = end;
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn save(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            line: self.line,
            character: self.character,
        }
    }

    fn restore(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.character = state.character;
    }

    #[inline]
    fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }

    #[inline]
    fn current_range(&self) -> Range {
        Range::from_positions(self.token_start_pos, self.position())
    }

    #[inline]
    fn current_text(&self) -> &'s str {
        &self.text[self.token_start..self.pos]
    }

    fn push(&mut self, kind: SyntaxKind) {
        let token = Token::new(kind, self.current_text(), self.current_range());
        self.tokens.push(token);
    }

    fn push_literal(&mut self, kind: SyntaxKind, literal: LiteralValue) {
        let token = Token::new(kind, self.current_text(), self.current_range()).with_literal(literal);
        self.tokens.push(token);
    }

    fn error(&mut self, msg: &bsc_diagnostics::DiagnosticMessage, args: &[&str]) {
        let range = self.current_range();
        self.diagnostics.add(Diagnostic::new(msg, args, range));
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    fn scan_token(&mut self) {
        self.token_start = self.pos;
        self.token_start_pos = self.position();
        let Some(ch) = self.advance() else { return };

        match ch {
            c if is_whitespace(c) => {}
            '\n' => self.push(SyntaxKind::Newline),
            '\'' => self.scan_comment(),
            '"' => self.scan_string(),
            '(' => self.push(SyntaxKind::LeftParen),
            ')' => self.push(SyntaxKind::RightParen),
            '[' => self.push(SyntaxKind::LeftSquare),
            ']' => self.push(SyntaxKind::RightSquare),
            '{' => self.push(SyntaxKind::LeftCurly),
            '}' => self.push(SyntaxKind::RightCurly),
            ',' => self.push(SyntaxKind::Comma),
            ':' => self.push(SyntaxKind::Colon),
            ';' => self.push(SyntaxKind::Semicolon),
            '?' => self.push(SyntaxKind::QuestionMark),
            '=' => self.push(SyntaxKind::Equal),
            '^' => self.push(SyntaxKind::Caret),
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) && !self.previous_ends_operand() {
                    self.scan_number(true);
                } else {
                    self.push(SyntaxKind::Dot);
                }
            }
            '<' => {
                let kind = if self.matches('>') {
                    SyntaxKind::LessGreater
                } else if self.matches('=') {
                    SyntaxKind::LessEqual
                } else if self.matches('<') {
                    if self.matches('=') { SyntaxKind::LeftShiftEqual } else { SyntaxKind::LeftShift }
                } else {
                    SyntaxKind::Less
                };
                self.push(kind);
            }
            '>' => {
                let kind = if self.matches('=') {
                    SyntaxKind::GreaterEqual
                } else if self.matches('>') {
                    if self.matches('=') { SyntaxKind::RightShiftEqual } else { SyntaxKind::RightShift }
                } else {
                    SyntaxKind::Greater
                };
                self.push(kind);
            }
            '+' => {
                let kind = if self.matches('+') {
                    SyntaxKind::PlusPlus
                } else if self.matches('=') {
                    SyntaxKind::PlusEqual
                } else {
                    SyntaxKind::Plus
                };
                self.push(kind);
            }
            '-' => {
                let kind = if self.matches('-') {
                    SyntaxKind::MinusMinus
                } else if self.matches('=') {
                    SyntaxKind::MinusEqual
                } else {
                    SyntaxKind::Minus
                };
                self.push(kind);
            }
            '*' => {
                let kind = if self.matches('=') { SyntaxKind::StarEqual } else { SyntaxKind::Star };
                self.push(kind);
            }
            '/' => {
                let kind = if self.matches('=') { SyntaxKind::SlashEqual } else { SyntaxKind::Slash };
                self.push(kind);
            }
            '\\' => {
                let kind = if self.matches('=') { SyntaxKind::BackslashEqual } else { SyntaxKind::Backslash };
                self.push(kind);
            }
            '&' if matches!(self.peek(), Some('h' | 'H')) => self.scan_hex_number(),
            c if c.is_ascii_digit() => self.scan_number(false),
            c if is_identifier_start(c) => self.scan_word(),
            other => {
                let text = other.to_string();
                self.error(&messages::UNEXPECTED_CHARACTER, &[&text]);
            }
        }
    }

    /// Whether the last token can be followed by a member access, in which
    /// case `.5` is a dot and a number rather than a float literal.
    fn previous_ends_operand(&self) -> bool {
        self.tokens.last().is_some_and(|t| {
            t.kind == SyntaxKind::Identifier
                || t.kind == SyntaxKind::RightParen
                || t.kind == SyntaxKind::RightSquare
        })
    }

    /// Consume the rest of the line, not including the line break.
    fn skip_to_end_of_line(&mut self) {
        let rest = &self.text.as_bytes()[self.pos..];
        let mut end = match memchr::memchr(LINE_FEED, rest) {
            Some(i) => self.pos + i,
            None => self.text.len(),
        };
        if end > self.pos && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        self.advance_to(end);
    }

    fn scan_comment(&mut self) {
        self.skip_to_end_of_line();
        self.push(SyntaxKind::Comment);
    }

    fn scan_string(&mut self) {
        let mut value = String::new();
        loop {
            let rest = &self.text.as_bytes()[self.pos..];
            match memchr::memchr2(DOUBLE_QUOTE, LINE_FEED, rest) {
                Some(i) if rest[i] == DOUBLE_QUOTE => {
                    let quote = self.pos + i;
                    value.push_str(&self.text[self.pos..quote]);
                    self.advance_to(quote + 1);
                    // `""` inside a string is an escaped quote
                    if self.peek() == Some('"') {
                        self.advance();
                        value.push('"');
                        continue;
                    }
                    self.push_literal(SyntaxKind::StringLiteral, LiteralValue::String(value));
                    return;
                }
                found => {
                    let mut end = found.map_or(self.text.len(), |i| self.pos + i);
                    if end > self.pos && self.text.as_bytes()[end - 1] == b'\r' {
                        end -= 1;
                    }
                    value.push_str(&self.text[self.pos..end]);
                    self.advance_to(end);
                    self.error(&messages::UNTERMINATED_STRING_LITERAL, &[]);
                    self.push_literal(SyntaxKind::StringLiteral, LiteralValue::String(value));
                    return;
                }
            }
        }
    }

    fn scan_number(&mut self, starts_with_dot: bool) {
        let mut is_decimal = starts_with_dot;
        self.advance_while(|c| c.is_ascii_digit());

        if !is_decimal && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
            is_decimal = true;
        }

        if matches!(self.peek(), Some('e' | 'E'))
            && self.peek_next().is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
            is_decimal = true;
        }

        let digits_end = self.pos;
        let suffix = match self.peek() {
            Some(c @ ('%' | '!' | '#' | '&')) => {
                self.advance();
                Some(c)
            }
            _ => None,
        };
        let digits = &self.text[self.token_start..digits_end];

        let (kind, literal) = match suffix {
            Some('%') => (SyntaxKind::IntegerLiteral, parse_integer(digits)),
            Some('&') => (SyntaxKind::LongIntegerLiteral, LiteralValue::LongInteger(digits.parse().unwrap_or(0))),
            Some('#') => (SyntaxKind::DoubleLiteral, LiteralValue::Double(digits.parse().unwrap_or(0.0))),
            Some(_) => (SyntaxKind::FloatLiteral, LiteralValue::Float(digits.parse().unwrap_or(0.0))),
            None if is_decimal => (SyntaxKind::FloatLiteral, LiteralValue::Float(digits.parse().unwrap_or(0.0))),
            None => match digits.parse::<i32>() {
                Ok(value) => (SyntaxKind::IntegerLiteral, LiteralValue::Integer(value)),
                Err(_) => match digits.parse::<i64>() {
                    Ok(value) => (SyntaxKind::LongIntegerLiteral, LiteralValue::LongInteger(value)),
                    Err(_) => (SyntaxKind::DoubleLiteral, LiteralValue::Double(digits.parse().unwrap_or(0.0))),
                },
            },
        };
        self.push_literal(kind, literal);
    }

    /// `&hFF`, optionally suffixed with `&` for a long integer.
    fn scan_hex_number(&mut self) {
        self.advance();
        let digits_start = self.pos;
        self.advance_while(|c| c.is_ascii_hexdigit());
        let digits = &self.text[digits_start..self.pos];
        let value = u64::from_str_radix(digits, 16).unwrap_or(0);
        if self.matches('&') {
            self.push_literal(SyntaxKind::LongIntegerLiteral, LiteralValue::LongInteger(value as i64));
        } else {
            // 32-bit hex literals wrap, so &hFFFFFFFF is -1
            self.push_literal(SyntaxKind::IntegerLiteral, LiteralValue::Integer(value as u32 as i32));
        }
    }

    fn scan_word(&mut self) {
        self.advance_while(is_identifier_part);
        if self.peek().is_some_and(is_type_designator) {
            self.advance();
            self.push(SyntaxKind::Identifier);
            return;
        }

        let lower = self.current_text().to_ascii_lowercase();
        if lower == "rem" {
            self.scan_comment();
            return;
        }

        let Some(kind) = SyntaxKind::from_keyword(&lower) else {
            self.push(SyntaxKind::Identifier);
            return;
        };

        match kind {
            SyntaxKind::End | SyntaxKind::Exit | SyntaxKind::Else => {
                let combined = self.try_combine(kind);
                self.push(combined.unwrap_or(kind));
            }
            SyntaxKind::True => self.push_literal(kind, LiteralValue::Boolean(true)),
            SyntaxKind::False => self.push_literal(kind, LiteralValue::Boolean(false)),
            SyntaxKind::Invalid => self.push_literal(kind, LiteralValue::Invalid),
            _ => self.push(kind),
        }
    }

    /// Try to extend `end`, `exit` or `else` with the next word on the same
    /// line. Restores the cursor when the pair does not combine.
    fn try_combine(&mut self, first: SyntaxKind) -> Option<SyntaxKind> {
        let saved = self.save();
        self.advance_while(|c| c == ' ' || c == '\t');
        let word_start = self.pos;
        if self.peek().is_some_and(is_identifier_start) {
            self.advance_while(is_identifier_part);
            let second = self.text[word_start..self.pos].to_ascii_lowercase();
            let next_is_designator = self.peek().is_some_and(is_type_designator);
            if !next_is_designator {
                if let Some(combined) = SyntaxKind::from_keyword(&second)
                    .and_then(|second| SyntaxKind::combine_keywords(first, second))
                {
                    return Some(combined);
                }
            }
        }
        self.restore(saved);
        None
    }
}

fn parse_integer(digits: &str) -> LiteralValue {
    LiteralValue::Integer(digits.parse().unwrap_or(0))
}
