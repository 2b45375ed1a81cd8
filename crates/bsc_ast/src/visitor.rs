//! Syntax tree visitor.
//!
//! Implement [`AstVisitor`] and override the node kinds of interest. Default
//! implementations walk into children in source order.

use crate::node::*;

/// A visitor that traverses the tree.
pub trait AstVisitor<'a> {
    fn visit_statements(&mut self, statements: &[Statement<'a>]) {
        for stmt in statements {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        match stmt {
            Statement::Assignment(n) => self.visit_expression(n.value),
            Statement::DottedSet(n) => {
                self.visit_expression(n.object);
                self.visit_expression(n.value);
            }
            Statement::IndexedSet(n) => {
                self.visit_expression(n.object);
                self.visit_expression(n.index);
                self.visit_expression(n.value);
            }
            Statement::Expression(n) => self.visit_expression(n.expression),
            Statement::Increment(n) => self.visit_expression(n.value),
            Statement::Print(n) => {
                for item in n.items {
                    if let PrintItem::Expression(expr) = item {
                        self.visit_expression(expr);
                    }
                }
            }
            Statement::If(n) => self.visit_if_statement(n),
            Statement::While(n) => {
                self.visit_expression(n.condition);
                self.visit_block(&n.body);
            }
            Statement::For(n) => {
                self.visit_expression(n.start);
                self.visit_expression(n.end);
                if let Some(step) = n.step {
                    self.visit_expression(step);
                }
                self.visit_block(&n.body);
            }
            Statement::ForEach(n) => {
                self.visit_expression(n.target);
                self.visit_block(&n.body);
            }
            Statement::Comment(n) => self.visit_comment(n),
            Statement::FunctionDeclaration(n) => self.visit_function_expression(&n.func),
            Statement::Return(n) => {
                if let Some(value) = n.value {
                    self.visit_expression(value);
                }
            }
            Statement::Goto(_)
            | Statement::Label(_)
            | Statement::ExitFor(_)
            | Statement::ExitWhile(_)
            | Statement::End(_)
            | Statement::Stop(_) => {}
        }
    }

    fn visit_block(&mut self, block: &Block<'a>) {
        self.visit_statements(block.statements);
    }

    fn visit_if_statement(&mut self, node: &IfStatement<'a>) {
        self.visit_expression(node.condition);
        self.visit_block(&node.then_branch);
        for clause in node.else_ifs {
            self.visit_expression(clause.condition);
            self.visit_block(&clause.then_branch);
        }
        if let Some(ref else_branch) = node.else_branch {
            self.visit_block(else_branch);
        }
    }

    fn visit_comment(&mut self, _node: &CommentStatement<'a>) {}

    // -- Expressions --

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        match expr {
            Expression::Literal(n) => self.visit_literal_expression(n),
            Expression::Variable(n) => self.visit_variable_expression(n),
            Expression::DottedGet(n) => self.visit_dotted_get_expression(n),
            Expression::IndexedGet(n) => self.visit_indexed_get_expression(n),
            Expression::Call(n) => self.visit_call_expression(n),
            Expression::ArrayLiteral(n) => self.visit_array_literal_expression(n),
            Expression::AALiteral(n) => self.visit_aa_literal_expression(n),
            Expression::Binary(n) => self.visit_binary_expression(n),
            Expression::Unary(n) => self.visit_unary_expression(n),
            Expression::Grouping(n) => self.visit_expression(n.expression),
            Expression::Function(n) => self.visit_function_expression(n),
            Expression::Conditional(n) => self.visit_conditional_expression(n),
        }
    }

    fn visit_literal_expression(&mut self, _node: &LiteralExpression<'a>) {}

    fn visit_variable_expression(&mut self, _node: &VariableExpression<'a>) {}

    fn visit_dotted_get_expression(&mut self, node: &DottedGetExpression<'a>) {
        self.visit_expression(node.object);
    }

    fn visit_indexed_get_expression(&mut self, node: &IndexedGetExpression<'a>) {
        self.visit_expression(node.object);
        self.visit_expression(node.index);
    }

    fn visit_call_expression(&mut self, node: &CallExpression<'a>) {
        self.visit_expression(node.callee);
        for arg in node.args {
            self.visit_expression(arg);
        }
    }

    fn visit_array_literal_expression(&mut self, node: &ArrayLiteralExpression<'a>) {
        for element in node.elements {
            self.visit_expression(element);
        }
    }

    fn visit_aa_literal_expression(&mut self, node: &AALiteralExpression<'a>) {
        for member in node.members {
            match member {
                AAMember::Property(prop) => self.visit_expression(prop.value),
                AAMember::Comment(comment) => self.visit_comment(comment),
            }
        }
    }

    fn visit_binary_expression(&mut self, node: &BinaryExpression<'a>) {
        self.visit_expression(node.left);
        self.visit_expression(node.right);
    }

    fn visit_unary_expression(&mut self, node: &UnaryExpression<'a>) {
        self.visit_expression(node.operand);
    }

    fn visit_function_expression(&mut self, node: &FunctionExpression<'a>) {
        for param in node.parameters {
            if let Some(default_value) = param.default_value {
                self.visit_expression(default_value);
            }
        }
        self.visit_block(&node.body);
    }

    fn visit_conditional_expression(&mut self, node: &ConditionalExpression<'a>) {
        self.visit_expression(node.test);
        self.visit_expression(node.consequent);
        self.visit_expression(node.alternate);
    }
}
