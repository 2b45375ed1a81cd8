//! Syntax tree to BrightScript text.

use bsc_ast::*;
use bsc_types::Type;

use crate::TranspileOptions;

/// Options for the printer.
#[derive(Debug, Clone)]
pub struct PrinterOptions {
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
    /// Whether to emit a trailing newline.
    pub trailing_newline: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            new_line: "\n".to_string(),
            trailing_newline: true,
        }
    }
}

/// The printer converts syntax tree nodes to BrightScript text.
pub struct Printer<'o> {
    output: String,
    indent_level: u32,
    pub(crate) options: &'o TranspileOptions,
}

impl<'o> Printer<'o> {
    pub fn new(options: &'o TranspileOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
        }
    }

    /// Print a statement list, one statement per line.
    pub fn print_statements(&mut self, statements: &[Statement<'_>]) -> String {
        self.output.clear();
        self.indent_level = 0;
        let mut previous_line = None;
        for (i, stmt) in statements.iter().enumerate() {
            if !self.continue_line(stmt, previous_line) && i > 0 {
                self.write_newline();
                self.write_indent();
            }
            self.print_statement(stmt);
            previous_line = Some(stmt.range().end.line);
        }
        if self.options.printer.trailing_newline && !self.output.is_empty() {
            self.write_newline();
        }
        std::mem::take(&mut self.output)
    }

    /// Print one expression at the current indentation.
    pub fn print_expression_text(&mut self, expression: &Expression<'_>) -> String {
        self.output.clear();
        self.print_expression(expression);
        std::mem::take(&mut self.output)
    }

    /// A comment that shared a line with the code before it stays on that
    /// line. Writes the separating space and returns true in that case.
    fn continue_line(&mut self, stmt: &Statement<'_>, previous_line: Option<u32>) -> bool {
        match (stmt, previous_line) {
            (Statement::Comment(comment), Some(line)) if comment.data.range.start.line == line => {
                self.write(" ");
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Statement printing
    // ========================================================================

    fn print_statement(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::Assignment(n) => {
                self.write(n.name.name);
                self.print_assignment_operator(n.operator);
                self.print_expression(n.value);
            }
            Statement::DottedSet(n) => {
                self.print_expression(n.object);
                self.write(".");
                self.write(n.name.name);
                self.print_assignment_operator(n.operator);
                self.print_expression(n.value);
            }
            Statement::IndexedSet(n) => {
                self.print_expression(n.object);
                self.write("[");
                self.print_expression(n.index);
                self.write("]");
                self.print_assignment_operator(n.operator);
                self.print_expression(n.value);
            }
            Statement::Expression(n) => self.print_expression(n.expression),
            Statement::Increment(n) => {
                self.print_expression(n.value);
                self.write(n.operator.display_text());
            }
            Statement::Print(n) => self.print_print_statement(n),
            Statement::If(n) if n.is_inline => self.print_inline_if_statement(n),
            Statement::If(n) => self.print_if_statement(n),
            Statement::While(n) => {
                self.write("while ");
                self.print_expression(n.condition);
                self.print_block(&n.body);
                self.write_line_start();
                self.write("end while");
            }
            Statement::For(n) => {
                self.write("for ");
                self.write(n.counter.name);
                self.write(" = ");
                self.print_expression(n.start);
                self.write(" to ");
                self.print_expression(n.end);
                if let Some(step) = n.step {
                    self.write(" step ");
                    self.print_expression(step);
                }
                self.print_block(&n.body);
                self.write_line_start();
                self.write("end for");
            }
            Statement::ForEach(n) => {
                self.write("for each ");
                self.write(n.item.name);
                self.write(" in ");
                self.print_expression(n.target);
                self.print_block(&n.body);
                self.write_line_start();
                self.write("end for");
            }
            Statement::Comment(n) => self.print_comment(n),
            Statement::FunctionDeclaration(n) => self.print_function(&n.func, Some(n.name.name)),
            Statement::Return(n) => {
                self.write("return");
                if let Some(value) = n.value {
                    self.write(" ");
                    self.print_expression(value);
                }
            }
            Statement::Goto(n) => {
                self.write("goto ");
                self.write(n.label.name);
            }
            Statement::Label(n) => {
                self.write(n.name.name);
                self.write(":");
            }
            Statement::ExitFor(_) => self.write("exit for"),
            Statement::ExitWhile(_) => self.write("exit while"),
            Statement::End(_) => self.write("end"),
            Statement::Stop(_) => self.write("stop"),
        }
    }

    fn print_assignment_operator(&mut self, operator: SyntaxKind) {
        self.write(" ");
        self.write(operator.display_text());
        self.write(" ");
    }

    fn print_print_statement(&mut self, node: &PrintStatement<'_>) {
        self.write("print");
        for item in node.items {
            match item {
                PrintItem::Expression(expr) => {
                    self.write(" ");
                    self.print_expression(expr);
                }
                PrintItem::Separator(kind) => self.write(kind.display_text()),
            }
        }
    }

    /// Print the statements of a block on their own lines, one level deeper.
    /// The block range starts on the header line.
    fn print_block(&mut self, block: &Block<'_>) {
        self.increase_indent();
        let mut previous_line = Some(block.data.range.start.line);
        for stmt in block.statements {
            if !self.continue_line(stmt, previous_line) {
                self.write_line_start();
            }
            self.print_statement(stmt);
            previous_line = Some(stmt.range().end.line);
        }
        self.decrease_indent();
    }

    fn print_if_statement(&mut self, node: &IfStatement<'_>) {
        self.write("if ");
        self.print_expression(node.condition);
        self.write(" then");
        self.print_block(&node.then_branch);
        for clause in node.else_ifs {
            self.write_line_start();
            self.write("else if ");
            self.print_expression(clause.condition);
            self.write(" then");
            self.print_block(&clause.then_branch);
        }
        if let Some(ref else_branch) = node.else_branch {
            self.write_line_start();
            self.write("else");
            self.print_block(else_branch);
        }
        self.write_line_start();
        self.write("end if");
    }

    fn print_inline_if_statement(&mut self, node: &IfStatement<'_>) {
        self.write("if ");
        self.print_expression(node.condition);
        self.write(" then ");
        self.print_inline_block(&node.then_branch);
        for clause in node.else_ifs {
            self.write(" else if ");
            self.print_expression(clause.condition);
            self.write(" then ");
            self.print_inline_block(&clause.then_branch);
        }
        if let Some(ref else_branch) = node.else_branch {
            self.write(" else ");
            self.print_inline_block(else_branch);
        }
    }

    fn print_inline_block(&mut self, block: &Block<'_>) {
        for (i, stmt) in block.statements.iter().enumerate() {
            if i > 0 {
                self.write(" : ");
            }
            self.print_statement(stmt);
        }
    }

    fn print_comment(&mut self, node: &CommentStatement<'_>) {
        for (i, line) in node.text.split('\n').enumerate() {
            if i > 0 {
                self.write_line_start();
            }
            self.write(line);
        }
    }

    fn print_function(&mut self, func: &FunctionExpression<'_>, name: Option<&str>) {
        let keyword = if func.is_sub { "sub" } else { "function" };
        self.write(keyword);
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        self.write("(");
        for (i, param) in func.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(param.name.name);
            if let Some(default_value) = param.default_value {
                self.write(" = ");
                self.print_expression(default_value);
            }
            if param.ty != Type::Dynamic {
                self.write(" as ");
                self.write_owned(type_name(&param.ty));
            }
        }
        self.write(")");
        let implied = if func.is_sub { Type::Void } else { Type::Dynamic };
        if func.return_type != implied {
            self.write(" as ");
            self.write_owned(type_name(&func.return_type));
        }
        self.print_block(&func.body);
        self.write_line_start();
        self.write(if func.is_sub { "end sub" } else { "end function" });
    }

    // ========================================================================
    // Expression printing
    // ========================================================================

    pub(crate) fn print_expression(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::Literal(n) => self.write(n.text),
            Expression::Variable(n) => self.write(n.name.name),
            Expression::DottedGet(n) => {
                self.print_expression(n.object);
                self.write(".");
                self.write(n.name.name);
            }
            Expression::IndexedGet(n) => {
                self.print_expression(n.object);
                self.write("[");
                self.print_expression(n.index);
                self.write("]");
            }
            Expression::Call(n) => {
                self.print_expression(n.callee);
                self.write("(");
                self.print_expression_list(n.args);
                self.write(")");
            }
            Expression::ArrayLiteral(n) => {
                self.write("[");
                self.print_expression_list(n.elements);
                self.write("]");
            }
            Expression::AALiteral(n) => self.print_aa_literal(n),
            Expression::Binary(n) => {
                self.print_expression(n.left);
                self.write(" ");
                self.write(n.operator_text);
                self.write(" ");
                self.print_expression(n.right);
            }
            Expression::Unary(n) => {
                self.write(n.operator_text);
                // `- -y` must not print as `--y`.
                let sign_follows = matches!(
                    n.operand,
                    Expression::Unary(inner) if matches!(inner.operator, SyntaxKind::Minus | SyntaxKind::Plus)
                );
                if n.operator == SyntaxKind::Not || sign_follows {
                    self.write(" ");
                }
                self.print_expression(n.operand);
            }
            Expression::Grouping(n) => {
                self.write("(");
                self.print_expression(n.expression);
                self.write(")");
            }
            Expression::Function(n) => self.print_function(n, None),
            Expression::Conditional(n) => self.print_conditional(n),
        }
    }

    fn print_expression_list(&mut self, expressions: &[Expression<'_>]) {
        for (i, expr) in expressions.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expression(expr);
        }
    }

    /// Members go on their own lines; BrightScript allows newlines in place
    /// of commas.
    fn print_aa_literal(&mut self, node: &AALiteralExpression<'_>) {
        if node.members.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.increase_indent();
        for member in node.members {
            self.write_line_start();
            match member {
                AAMember::Property(prop) => {
                    if prop.quoted {
                        self.write_string_literal(prop.key);
                    } else {
                        self.write(prop.key);
                    }
                    self.write(": ");
                    self.print_expression(prop.value);
                }
                AAMember::Comment(comment) => self.print_comment(comment),
            }
        }
        self.decrease_indent();
        self.write_line_start();
        self.write("}");
    }

    // ========================================================================
    // Output helpers
    // ========================================================================

    pub(crate) fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_owned(&mut self, s: String) {
        self.output.push_str(&s);
    }

    /// Write `value` as a quoted string literal.
    pub(crate) fn write_string_literal(&mut self, value: &str) {
        self.output.push('"');
        self.output.push_str(&value.replace('"', "\"\""));
        self.output.push('"');
    }

    fn write_newline(&mut self) {
        self.output.push_str(&self.options.printer.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.printer.indent_str);
        }
    }

    /// Start a new line at the current indentation.
    pub(crate) fn write_line_start(&mut self) {
        self.write_newline();
        self.write_indent();
    }

    pub(crate) fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// The name of a type as written after `as`.
fn type_name(ty: &Type) -> String {
    match ty {
        Type::Function(_) => "function".to_string(),
        other => other.to_string(),
    }
}
