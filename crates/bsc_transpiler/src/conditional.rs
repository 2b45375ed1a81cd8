//! Lowering of `test ? consequent : alternate`.
//!
//! BrightScript has no conditional expression, so one is emitted as a call
//! to a runtime helper. When no operand can have an observable effect, the
//! eager helper is used and both branches are evaluated up front:
//!
//! ```text
//! bslib_simpleTernary(test, consequent, alternate)
//! ```
//!
//! Otherwise, with scope protection on, each branch becomes a function and
//! only the chosen one runs. The variables the operands read are passed in
//! a scope object and rebound inside the branch that uses them:
//!
//! ```text
//! bslib_scopeSafeTernary(test, {
//!     "name": name
//! }, function(scope)
//!     name = scope.name
//!     return consequent
//! end function, function(scope)
//!     return alternate
//! end function)
//! ```
//!
//! The test is evaluated exactly once in both forms.

use bitflags::bitflags;
use bsc_ast::visitor::AstVisitor;
use bsc_ast::*;
use bsc_core::text::Range;
use indexmap::IndexMap;

use crate::printer::Printer;
use crate::ScopeProtection;

bitflags! {
    /// The kinds of expression found in a subtree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExpressionShape: u8 {
        const NONE        = 0;
        const LITERAL     = 1 << 0;
        const IDENTIFIER  = 1 << 1;
        const OPERATOR    = 1 << 2;
        const COLLECTION  = 1 << 3;
        const FUNCTION    = 1 << 4;
        const CALL        = 1 << 5;
        const DOTTED_GET  = 1 << 6;
        const INDEXED_GET = 1 << 7;

        /// Evaluating any of these may be observable: a call can do
        /// anything and a property read can hit an interface method.
        const RISKY = Self::CALL.bits() | Self::DOTTED_GET.bits() | Self::INDEXED_GET.bits();
    }
}

impl ExpressionShape {
    pub fn is_risky(self) -> bool {
        self.intersects(Self::RISKY)
    }
}

/// Classify an expression. Bodies of nested anonymous functions are not
/// evaluated by the expression and do not count.
pub fn expression_shape(expression: &Expression<'_>) -> ExpressionShape {
    let mut collector = ShapeCollector { shape: ExpressionShape::NONE };
    collector.visit_expression(expression);
    collector.shape
}

struct ShapeCollector {
    shape: ExpressionShape,
}

impl<'a> AstVisitor<'a> for ShapeCollector {
    fn visit_literal_expression(&mut self, _node: &LiteralExpression<'a>) {
        self.shape |= ExpressionShape::LITERAL;
    }

    fn visit_variable_expression(&mut self, _node: &VariableExpression<'a>) {
        self.shape |= ExpressionShape::IDENTIFIER;
    }

    fn visit_dotted_get_expression(&mut self, node: &DottedGetExpression<'a>) {
        self.shape |= ExpressionShape::DOTTED_GET;
        self.visit_expression(node.object);
    }

    fn visit_indexed_get_expression(&mut self, node: &IndexedGetExpression<'a>) {
        self.shape |= ExpressionShape::INDEXED_GET;
        self.visit_expression(node.object);
        self.visit_expression(node.index);
    }

    fn visit_call_expression(&mut self, node: &CallExpression<'a>) {
        self.shape |= ExpressionShape::CALL;
        self.visit_expression(node.callee);
        for arg in node.args {
            self.visit_expression(arg);
        }
    }

    fn visit_array_literal_expression(&mut self, node: &ArrayLiteralExpression<'a>) {
        self.shape |= ExpressionShape::COLLECTION;
        for element in node.elements {
            self.visit_expression(element);
        }
    }

    fn visit_aa_literal_expression(&mut self, node: &AALiteralExpression<'a>) {
        self.shape |= ExpressionShape::COLLECTION;
        for member in node.members {
            if let AAMember::Property(prop) = member {
                self.visit_expression(prop.value);
            }
        }
    }

    fn visit_binary_expression(&mut self, node: &BinaryExpression<'a>) {
        self.shape |= ExpressionShape::OPERATOR;
        self.visit_expression(node.left);
        self.visit_expression(node.right);
    }

    fn visit_unary_expression(&mut self, node: &UnaryExpression<'a>) {
        self.shape |= ExpressionShape::OPERATOR;
        self.visit_expression(node.operand);
    }

    fn visit_function_expression(&mut self, _node: &FunctionExpression<'a>) {
        self.shape |= ExpressionShape::FUNCTION;
    }
}

// ============================================================================
// Free variables
// ============================================================================

/// A variable read by a conditional expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'a> {
    /// The name as first written.
    pub name: &'a str,
    /// Where it was first read.
    pub range: Range,
}

/// The free variables of some expressions, in first-occurrence order.
/// Names are compared case-insensitively.
#[derive(Debug, Default)]
pub struct CaptureScope<'a> {
    captures: IndexMap<String, Capture<'a>>,
}

impl<'a> CaptureScope<'a> {
    /// Collect the variables read by `expressions`, walked in order.
    ///
    /// Bare identifiers and the root of every dotted or indexed chain are
    /// captured. Call arguments are walked before the callee and an index
    /// before the object it indexes. A bare identifier being called names
    /// a function and is not captured. Nested anonymous functions are not
    /// entered.
    pub fn collect(expressions: &[&Expression<'a>]) -> Self {
        let mut collector = CaptureCollector { scope: CaptureScope::default() };
        for expression in expressions {
            collector.visit_expression(expression);
        }
        collector.scope
    }

    fn insert(&mut self, name: &'a str, range: Range) {
        self.captures
            .entry(name.to_ascii_lowercase())
            .or_insert(Capture { name, range });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.captures.contains_key(&name.to_ascii_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&Capture<'a>> {
        self.captures.get(&name.to_ascii_lowercase())
    }

    /// Captured names in capture order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.captures.values().map(|capture| capture.name)
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

struct CaptureCollector<'a> {
    scope: CaptureScope<'a>,
}

impl<'a> AstVisitor<'a> for CaptureCollector<'a> {
    fn visit_variable_expression(&mut self, node: &VariableExpression<'a>) {
        self.scope.insert(node.name.name, node.name.range);
    }

    fn visit_indexed_get_expression(&mut self, node: &IndexedGetExpression<'a>) {
        self.visit_expression(node.index);
        self.visit_expression(node.object);
    }

    fn visit_call_expression(&mut self, node: &CallExpression<'a>) {
        for arg in node.args {
            self.visit_expression(arg);
        }
        if !matches!(node.callee, Expression::Variable(_)) {
            self.visit_expression(node.callee);
        }
    }

    fn visit_function_expression(&mut self, _node: &FunctionExpression<'a>) {}
}

// ============================================================================
// Emission
// ============================================================================

impl Printer<'_> {
    pub(crate) fn print_conditional(&mut self, node: &ConditionalExpression<'_>) {
        let shape = expression_shape(node.test)
            | expression_shape(node.consequent)
            | expression_shape(node.alternate);
        if self.options.scope_protection == ScopeProtection::None || !shape.is_risky() {
            self.print_simple_ternary(node);
        } else {
            self.print_scope_safe_ternary(node);
        }
    }

    fn print_simple_ternary(&mut self, node: &ConditionalExpression<'_>) {
        let options = self.options;
        self.write(&options.helper_prefix);
        self.write("simpleTernary(");
        self.print_expression(node.test);
        self.write(", ");
        self.print_expression(node.consequent);
        self.write(", ");
        self.print_expression(node.alternate);
        self.write(")");
    }

    fn print_scope_safe_ternary(&mut self, node: &ConditionalExpression<'_>) {
        let options = self.options;
        let scope = CaptureScope::collect(&[node.test, node.consequent, node.alternate]);
        tracing::trace!(captures = scope.len(), "lowering conditional with scope protection");

        self.write(&options.helper_prefix);
        self.write("scopeSafeTernary(");
        self.print_expression(node.test);
        self.write(", {");
        if !scope.is_empty() {
            self.increase_indent();
            for name in scope.names() {
                self.write_line_start();
                self.write_string_literal(name);
                self.write(": ");
                self.write(name);
            }
            self.decrease_indent();
            self.write_line_start();
        }
        self.write("}, ");
        self.print_branch_function(node.consequent, &scope);
        self.write(", ");
        self.print_branch_function(node.alternate, &scope);
        self.write(")");
    }

    /// `function(scope)` rebinding the captured names the branch reads,
    /// then returning the branch value.
    fn print_branch_function(&mut self, branch: &Expression<'_>, scope: &CaptureScope<'_>) {
        let used = CaptureScope::collect(&[branch]);
        self.write("function(scope)");
        self.increase_indent();
        for name in scope.names().filter(|name| used.contains(name)) {
            self.write_line_start();
            self.write(name);
            self.write(" = scope.");
            self.write(name);
        }
        self.write_line_start();
        self.write("return ");
        self.print_expression(branch);
        self.decrease_indent();
        self.write_line_start();
        self.write("end function");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsc_parser::{ParseMode, ParseOptions, Parser};
    use bsc_scanner::Lexer;
    use bumpalo::Bump;

    /// Parse `x = <source>` and hand the value to `f`.
    fn with_expression<R>(source: &str, f: impl FnOnce(&Expression<'_>) -> R) -> R {
        let arena = Bump::new();
        let scanned = Lexer::scan(&format!("x = {}", source));
        let result = Parser::parse(&arena, &scanned.tokens, ParseOptions { mode: ParseMode::BrighterScript });
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        match &result.statements[0] {
            Statement::Assignment(assignment) => f(assignment.value),
            other => panic!("expected assignment, got {:?}", other.kind()),
        }
    }

    fn captured_names(source: &str) -> Vec<String> {
        with_expression(source, |expr| match expr {
            Expression::Conditional(node) => CaptureScope::collect(&[node.test, node.consequent, node.alternate])
                .names()
                .map(str::to_string)
                .collect(),
            other => panic!("expected conditional, got {:?}", other.kind()),
        })
    }

    #[test]
    fn test_literals_and_arithmetic_are_not_risky() {
        for source in ["\"text\"", "a + 1 * b", "not done", "[1, two]", "{a: b}", "(count)"] {
            assert!(!with_expression(source, expression_shape).is_risky(), "{}", source);
        }
    }

    #[test]
    fn test_calls_and_member_access_are_risky() {
        for source in ["getName()", "user.name", "items[0]", "1 + m.count", "[a, b.c]", "-list.count()"] {
            assert!(with_expression(source, expression_shape).is_risky(), "{}", source);
        }
    }

    #[test]
    fn test_nested_function_bodies_are_not_inspected() {
        let shape = with_expression("function()\n    return m.top.findNode(\"x\")\nend function", expression_shape);
        assert_eq!(shape, ExpressionShape::FUNCTION);
    }

    #[test]
    fn test_capture_order_visits_arguments_before_callee() {
        assert_eq!(
            captured_names("user ? m.defaults.getAccount(settings.name) : \"no\""),
            vec!["user", "settings", "m"]
        );
    }

    #[test]
    fn test_capture_skips_called_function_names() {
        assert_eq!(captured_names("isReady() ? format(name) : fallback"), vec!["name", "fallback"]);
    }

    #[test]
    fn test_capture_visits_index_before_object() {
        assert_eq!(captured_names("items[index].ok ? 1 : 0"), vec!["index", "items"]);
    }

    #[test]
    fn test_capture_is_case_insensitive_and_keeps_first_spelling() {
        let arena = Bump::new();
        let scanned = Lexer::scan("x = User.ok ? USER.name : user");
        let result = Parser::parse(&arena, &scanned.tokens, ParseOptions { mode: ParseMode::BrighterScript });
        let Statement::Assignment(assignment) = &result.statements[0] else {
            panic!("expected assignment");
        };
        let Expression::Conditional(node) = assignment.value else {
            panic!("expected conditional");
        };
        let scope = CaptureScope::collect(&[node.test, node.consequent, node.alternate]);
        assert_eq!(scope.len(), 1);
        assert!(scope.contains("user"));
        let first = scope.get("USER").map(|capture| (capture.name, capture.range));
        assert_eq!(first, Some(("User", Range::new(0, 4, 0, 8))));
    }
}
