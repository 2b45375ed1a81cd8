//! Parser integration tests.
//!
//! Verifies that the parser builds the expected statements from scanned
//! BrightScript and BrighterScript source, and that it recovers from errors.

use bsc_ast::*;
use bsc_core::text::Range;
use bsc_diagnostics::{messages, Diagnostic};
use bsc_parser::{ParseMode, ParseOptions, ParseResult, Parser};
use bsc_scanner::Lexer;
use bsc_types::Type;
use bumpalo::Bump;

/// Helper: scan and parse source text in the given mode.
fn parse_mode<'a>(arena: &'a Bump, source: &str, mode: ParseMode) -> ParseResult<'a> {
    let scanned = Lexer::scan(source);
    assert!(scanned.diagnostics.is_empty(), "scanner diagnostics: {:?}", scanned.diagnostics);
    Parser::parse(arena, &scanned.tokens, ParseOptions { mode })
}

/// Helper: parse BrightScript source.
fn parse<'a>(arena: &'a Bump, source: &str) -> ParseResult<'a> {
    parse_mode(arena, source, ParseMode::BrightScript)
}

/// Helper: parse BrighterScript source.
fn parse_bs<'a>(arena: &'a Bump, source: &str) -> ParseResult<'a> {
    parse_mode(arena, source, ParseMode::BrighterScript)
}

fn messages_of(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

/// Helper: the body of the function declared by `statements[index]`.
fn function_body<'a>(statements: &'a [Statement<'a>], index: usize) -> &'a [Statement<'a>] {
    match &statements[index] {
        Statement::FunctionDeclaration(decl) => decl.func.body.statements,
        other => panic!("expected a function declaration, got {:?}", other.kind()),
    }
}

fn comment_text<'a>(statement: &Statement<'a>) -> &'a str {
    match statement.as_comment() {
        Some(text) => text,
        None => panic!("expected a comment, got {:?}", statement.kind()),
    }
}

fn assignment_value<'a>(statement: &Statement<'a>) -> &'a Expression<'a> {
    match statement {
        Statement::Assignment(assignment) => assignment.value,
        other => panic!("expected an assignment, got {:?}", other.kind()),
    }
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_token_list() {
    let arena = Bump::new();
    let result = Parser::parse(&arena, &[], ParseOptions::default());
    assert!(result.statements.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_tracks_error_locations() {
    let arena = Bump::new();
    let result = parse(&arena, "\n            sub main()\n                call()a\n            end sub\n        ");
    let ranges: Vec<_> = result.diagnostics.iter().map(|d| d.range.to_array()).collect();
    assert_eq!(ranges, vec![[2, 22, 2, 23]]);
    assert_eq!(function_body(result.statements, 0).len(), 1);
}

#[test]
fn test_unknown_return_type_keeps_function() {
    let arena = Bump::new();
    let result = parse(&arena, "function log() as UNKNOWN_TYPE\nend function\n");
    assert_eq!(messages_of(&result.diagnostics), vec!["Unknown type 'UNKNOWN_TYPE'"]);
    match &result.statements[0] {
        Statement::FunctionDeclaration(decl) => assert_eq!(decl.func.return_type, Type::Dynamic),
        other => panic!("expected a function declaration, got {:?}", other.kind()),
    }
}

#[test]
fn test_conditionals_without_then() {
    let arena = Bump::new();
    let result = parse(
        &arena,
        r#"
        function printNumber()
            if true then
                print 1
            else if true
                print 2
            end if
        end function
        "#,
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    match &function_body(result.statements, 0)[0] {
        Statement::If(stmt) => {
            assert!(!stmt.is_inline);
            assert_eq!(stmt.else_ifs.len(), 1);
            assert!(stmt.else_branch.is_none());
        }
        other => panic!("expected if, got {:?}", other.kind()),
    }
}

#[test]
fn test_single_line_if() {
    let arena = Bump::new();
    let result = parse(&arena, r#"If true Then print "error" : Stop"#);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    match &result.statements[0] {
        Statement::If(stmt) => {
            assert!(stmt.is_inline);
            assert_eq!(stmt.then_branch.statements.len(), 2);
            assert_eq!(stmt.then_branch.statements[1].kind(), SyntaxKind::StopStatement);
        }
        other => panic!("expected if, got {:?}", other.kind()),
    }
}

#[test]
fn test_single_line_if_with_else() {
    let arena = Bump::new();
    let result = parse(&arena, "if x > 1 then y = 1 else if x = 1 then y = 2 else y = 3 : z = 4");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    match &result.statements[0] {
        Statement::If(stmt) => {
            assert_eq!(stmt.else_ifs.len(), 1);
            let else_branch = stmt.else_branch.as_ref().map(|b| b.statements.len());
            assert_eq!(else_branch, Some(2));
        }
        other => panic!("expected if, got {:?}", other.kind()),
    }
}

#[test]
fn test_ternary_in_single_line_if_reports_once() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    if a then b = x ? 1 : 2 else c = 4\n    d = 1\nend sub");
    assert_eq!(
        messages_of(&result.diagnostics),
        vec!["BrighterScript feature 'ternary operator' is not supported in standard BrightScript files"]
    );
    assert_eq!(result.diagnostics[0].range.to_array(), [1, 20, 1, 21]);
    let body = function_body(result.statements, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind(), SyntaxKind::AssignmentStatement);

    let arena = Bump::new();
    let result = parse_bs(&arena, "sub main()\n    if a then b = x ? 1 : 2 else c = 4\n    d = 1\nend sub");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(function_body(result.statements, 0).len(), 2);
}

#[test]
fn test_syntax_error_in_single_line_if_reports_once() {
    let arena = Bump::new();
    let result = parse(&arena, "if a then foo()bar else c = 2");
    assert_eq!(messages_of(&result.diagnostics), vec!["Expected newline or ':' at the end of a statement"]);
    assert_eq!(result.diagnostics[0].range.to_array(), [0, 15, 0, 18]);

    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    if a then c = 1 else print )\n    d = 1\nend sub");
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let body = function_body(result.statements, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind(), SyntaxKind::AssignmentStatement);
}

#[test]
fn test_excess_newlines() {
    let arena = Bump::new();
    let source = "function boolToNumber() as string\n\n   if true then\n\n       print 1\n\n   elseif true then\n\n       print 0\n\n   else\n\n       print 1\n\n   end if\n\nend function\n\n";
    let result = parse(&arena, source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_property_access_statement_is_one_error() {
    let arena = Bump::new();
    let result = parse(&arena, "\n    sub main()\n        person.a\n    end sub\n\n");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, messages::EXPECTED_STATEMENT_OR_FUNCTION_CALL.code);
    assert!(function_body(result.statements, 0).is_empty());
}

#[test]
fn test_trailing_period_keeps_partial_expression() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    print a.\n    print b\nend sub");
    assert_eq!(messages_of(&result.diagnostics), vec!["Expected property name after '.'"]);
    let body = function_body(result.statements, 0);
    assert_eq!(body.len(), 2);
    match &body[0] {
        Statement::Print(print) => {
            assert!(matches!(print.items[0], PrintItem::Expression(Expression::Variable(_))));
        }
        other => panic!("expected print, got {:?}", other.kind()),
    }
}

#[test]
fn test_recovers_at_next_line() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    x = (1 +\n    y = 2\nend sub");
    assert_eq!(result.diagnostics.len(), 1);
    let body = function_body(result.statements, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind(), SyntaxKind::AssignmentStatement);
}

#[test]
fn test_missing_terminator_is_reported() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    while true\n        print 1\nend sub");
    assert_eq!(messages_of(&result.diagnostics), vec!["Expected 'end while' to terminate 'while'"]);
    assert_eq!(result.statements.len(), 1);
}

#[test]
fn test_mismatched_function_terminator() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\nend function");
    assert_eq!(messages_of(&result.diagnostics), vec!["Expected 'end sub' to terminate 'sub'"]);
}

#[test]
fn test_deep_nesting_is_reported() {
    // Run on a large stack so the guard, not the thread, decides.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("x = {}1{}", "(".repeat(300), ")".repeat(300));
            let arena = Bump::new();
            let result = parse(&arena, &source);
            result.diagnostics.iter().map(|d| d.code).collect::<Vec<_>>()
        })
        .unwrap();
    let codes = handle.join().unwrap();
    assert_eq!(codes, vec![messages::MAXIMUM_NESTING_DEPTH_EXCEEDED.code]);
}

// ============================================================================
// Statements and expressions
// ============================================================================

#[test]
fn test_assignment_forms() {
    let arena = Bump::new();
    let result = parse(&arena, "a = 1\na += 2\nm.name = \"x\"\nitems[0] = 3\ncount++\nm.total -= 1");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let kinds: Vec<_> = result.statements.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::AssignmentStatement,
            SyntaxKind::AssignmentStatement,
            SyntaxKind::DottedSetStatement,
            SyntaxKind::IndexedSetStatement,
            SyntaxKind::IncrementStatement,
            SyntaxKind::DottedSetStatement,
        ]
    );
    match &result.statements[1] {
        Statement::Assignment(assignment) => assert_eq!(assignment.operator, SyntaxKind::PlusEqual),
        other => panic!("expected assignment, got {:?}", other.kind()),
    }
}

#[test]
fn test_equality_inside_expression() {
    let arena = Bump::new();
    let result = parse(&arena, "isEqual = a = b");
    assert!(result.diagnostics.is_empty());
    match assignment_value(&result.statements[0]) {
        Expression::Binary(binary) => assert_eq!(binary.operator, SyntaxKind::Equal),
        other => panic!("expected binary, got {:?}", other.kind()),
    }
}

#[test]
fn test_operator_precedence() {
    let arena = Bump::new();
    let result = parse(&arena, "x = 1 + 2 * 3 = 7 and not done or failed");
    assert!(result.diagnostics.is_empty());
    // ((((1 + (2 * 3)) = 7) and (not done)) or failed)
    let Expression::Binary(or) = assignment_value(&result.statements[0]) else {
        panic!("expected binary");
    };
    assert_eq!(or.operator, SyntaxKind::Or);
    let Expression::Binary(and) = or.left else {
        panic!("expected and");
    };
    assert_eq!(and.operator, SyntaxKind::And);
    assert!(matches!(and.right, Expression::Unary(unary) if unary.operator == SyntaxKind::Not));
    let Expression::Binary(eq) = and.left else {
        panic!("expected equality");
    };
    assert_eq!(eq.operator, SyntaxKind::Equal);
    let Expression::Binary(add) = eq.left else {
        panic!("expected addition");
    };
    assert_eq!(add.operator, SyntaxKind::Plus);
    assert!(matches!(add.right, Expression::Binary(mul) if mul.operator == SyntaxKind::Star));
}

#[test]
fn test_not_applies_to_comparison() {
    let arena = Bump::new();
    let result = parse(&arena, "x = not a = b");
    let Expression::Unary(unary) = assignment_value(&result.statements[0]) else {
        panic!("expected unary");
    };
    assert!(matches!(unary.operand, Expression::Binary(binary) if binary.operator == SyntaxKind::Equal));
}

#[test]
fn test_print_separators_and_shorthand() {
    let arena = Bump::new();
    let result = parse(&arena, "print \"a\"; b, c\n? \"total: \" total");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    match &result.statements[0] {
        Statement::Print(print) => {
            assert_eq!(print.items.len(), 5);
            assert!(matches!(print.items[1], PrintItem::Separator(SyntaxKind::Semicolon)));
            assert!(matches!(print.items[3], PrintItem::Separator(SyntaxKind::Comma)));
        }
        other => panic!("expected print, got {:?}", other.kind()),
    }
    match &result.statements[1] {
        Statement::Print(print) => assert_eq!(print.items.len(), 2),
        other => panic!("expected print, got {:?}", other.kind()),
    }
}

#[test]
fn test_loops() {
    let arena = Bump::new();
    let result = parse(
        &arena,
        "for i = 10 to 0 step -1\n    exit for\nnext\nfor each item in items\nend for\nwhile true\n    exit while\nend while",
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let kinds: Vec<_> = result.statements.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::ForStatement, SyntaxKind::ForEachStatement, SyntaxKind::WhileStatement]
    );
    match &result.statements[0] {
        Statement::For(stmt) => {
            assert_eq!(stmt.counter.name, "i");
            assert!(stmt.step.is_some());
            assert_eq!(stmt.body.statements[0].kind(), SyntaxKind::ExitForStatement);
        }
        other => panic!("expected for, got {:?}", other.kind()),
    }
}

#[test]
fn test_labels_goto_end_and_stop() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\nretry:\n    goto retry\n    stop\n    end\nend sub");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let kinds: Vec<_> = function_body(result.statements, 0).iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::LabelStatement,
            SyntaxKind::GotoStatement,
            SyntaxKind::StopStatement,
            SyntaxKind::EndStatement,
        ]
    );
}

#[test]
fn test_anonymous_function_and_literals() {
    let arena = Bump::new();
    let result = parse(
        &arena,
        "handler = function(a as integer, b = \"x\" as string) as boolean\n    return a > 0\nend function\nlist = [1, 2.5, \"three\",\n    [true, invalid]\n]\n",
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let Expression::Function(func) = assignment_value(&result.statements[0]) else {
        panic!("expected function expression");
    };
    assert_eq!(
        func.signature(Some("handler")).to_string(),
        "function handler(a as integer, b? as string) as boolean"
    );
    let Expression::ArrayLiteral(array) = assignment_value(&result.statements[1]) else {
        panic!("expected array");
    };
    assert_eq!(array.elements.len(), 4);
}

#[test]
fn test_sub_signature() {
    let arena = Bump::new();
    let result = parse(&arena, "sub init(node as object)\nend sub");
    match &result.statements[0] {
        Statement::FunctionDeclaration(decl) => {
            assert_eq!(decl.signature().to_string(), "sub init(node as object) as void");
        }
        other => panic!("expected function, got {:?}", other.kind()),
    }
}

#[test]
fn test_parameter_default_type_mismatch() {
    let arena = Bump::new();
    let result = parse(&arena, "function f(count = \"ten\" as integer, ratio = 1 as float, node = invalid as object)\nend function");
    assert_eq!(
        messages_of(&result.diagnostics),
        vec!["Type 'string' is not convertible to type 'integer'"]
    );
    assert_eq!(result.statements.len(), 1);
}

#[test]
fn test_required_parameter_after_optional_is_a_warning() {
    let arena = Bump::new();
    let result = parse(&arena, "sub f(a = 1, b)\nend sub");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(!result.diagnostics[0].is_error());
}

#[test]
fn test_nested_call_chain() {
    let arena = Bump::new();
    let result = parse(&arena, "m.top.findNode(\"list\").items[2].setFocus(true)");
    assert!(result.diagnostics.is_empty());
    match &result.statements[0] {
        Statement::Expression(stmt) => assert!(stmt.expression.is_call()),
        other => panic!("expected expression statement, got {:?}", other.kind()),
    }
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_combines_multi_line_comments() {
    let arena = Bump::new();
    let result = parse(&arena, "\n    'line 1\n    'line 2\n    'line 3\n");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.statements.len(), 1);
    assert_eq!(comment_text(&result.statements[0]), "'line 1\n'line 2\n'line 3");
}

#[test]
fn test_blank_lines_split_comments() {
    let arena = Bump::new();
    let result = parse(&arena, "\n    'line 1\n\n    'line 2\n\n    'line 3\n");
    assert!(result.diagnostics.is_empty());
    let texts: Vec<_> = result.statements.iter().map(comment_text).collect();
    assert_eq!(texts, vec!["'line 1", "'line 2", "'line 3"]);
}

#[test]
fn test_comment_after_print() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    print \"hi\" 'comment 1\nend sub");
    assert!(result.diagnostics.is_empty());
    assert_eq!(comment_text(&function_body(result.statements, 0)[1]), "'comment 1");
}

#[test]
fn test_declaration_level_comments() {
    let arena = Bump::new();
    let result = parse(&arena, "\n'comment 1\nfunction a()\nend function\n'comment 2\n");
    assert!(result.diagnostics.is_empty());
    assert_eq!(comment_text(&result.statements[0]), "'comment 1");
    assert_eq!(comment_text(&result.statements[2]), "'comment 2");
}

#[test]
fn test_comment_member_in_aa_literal() {
    let arena = Bump::new();
    let result = parse(&arena, "obj = {\n    \"name\": true,\n    'comment\n}\n");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let Expression::AALiteral(aa) = assignment_value(&result.statements[0]) else {
        panic!("expected aa literal");
    };
    assert_eq!(aa.members.len(), 2);
    assert!(matches!(&aa.members[1], AAMember::Comment(c) if c.text == "'comment"));
}

#[test]
fn test_comment_after_call() {
    let arena = Bump::new();
    let result = parse(&arena, "sub Main()\n    name = \"Hello\"\n    DoSomething(name) 'comment 1\nend sub");
    assert!(result.diagnostics.is_empty());
    assert_eq!(comment_text(&function_body(result.statements, 0)[2]), "'comment 1");
}

#[test]
fn test_function_comments() {
    let arena = Bump::new();
    let result = parse(
        &arena,
        "function a() 'comment 1\n    'comment 2\n    num = 1\n    'comment 3\nend function 'comment 4\n",
    );
    assert!(result.diagnostics.is_empty());
    let body = function_body(result.statements, 0);
    assert_eq!(comment_text(&body[0]), "'comment 1");
    assert_eq!(comment_text(&body[1]), "'comment 2");
    assert_eq!(comment_text(&body[3]), "'comment 3");
    assert_eq!(comment_text(&result.statements[1]), "'comment 4");
}

#[test]
fn test_if_statement_comments() {
    let arena = Bump::new();
    let result = parse(
        &arena,
        r#"
        function a()
            if true then 'comment 1
                'comment 2
                print "hello"
                'comment 3
            else if true then 'comment 4
                'comment 5
                print "hello"
                'comment 6
            else 'comment 7
                'comment 8
                print "hello"
                'comment 9
            end if 'comment 10
        end function
        "#,
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let body = function_body(result.statements, 0);
    let Statement::If(stmt) = &body[0] else {
        panic!("expected if");
    };
    let then_texts = &stmt.then_branch.statements;
    assert_eq!(comment_text(&then_texts[0]), "'comment 1");
    assert_eq!(comment_text(&then_texts[1]), "'comment 2");
    assert_eq!(comment_text(&then_texts[3]), "'comment 3");
    let else_if = &stmt.else_ifs[0].then_branch.statements;
    assert_eq!(comment_text(&else_if[0]), "'comment 4");
    assert_eq!(comment_text(&else_if[1]), "'comment 5");
    assert_eq!(comment_text(&else_if[3]), "'comment 6");
    let else_branch = stmt.else_branch.as_ref().map(|b| b.statements).unwrap_or_default();
    assert_eq!(comment_text(&else_branch[0]), "'comment 7");
    assert_eq!(comment_text(&else_branch[1]), "'comment 8");
    assert_eq!(comment_text(&else_branch[3]), "'comment 9");
    assert_eq!(comment_text(&body[1]), "'comment 10");
}

#[test]
fn test_loop_comments() {
    let sources = [
        "function a()\n    while true 'comment 1\n        'comment 2\n        print \"true\"\n        'comment 3\n    end while 'comment 4\nend function",
        "function a()\n    for i = 0 to 10 step 1 'comment 1\n        'comment 2\n        print 1\n        'comment 3\n    end for 'comment 4\nend function",
        "function a()\n    for each val in [1,2,3] 'comment 1\n        'comment 2\n        print 1\n        'comment 3\n    end for 'comment 4\nend function",
    ];
    for source in sources {
        let arena = Bump::new();
        let result = parse(&arena, source);
        assert!(result.diagnostics.is_empty(), "{}: {:?}", source, result.diagnostics);
        let body = function_body(result.statements, 0);
        let loop_body = match &body[0] {
            Statement::While(stmt) => stmt.body.statements,
            Statement::For(stmt) => stmt.body.statements,
            Statement::ForEach(stmt) => stmt.body.statements,
            other => panic!("expected a loop, got {:?}", other.kind()),
        };
        assert_eq!(comment_text(&loop_body[0]), "'comment 1");
        assert_eq!(comment_text(&loop_body[1]), "'comment 2");
        assert_eq!(comment_text(&loop_body[3]), "'comment 3");
        assert_eq!(comment_text(&body[1]), "'comment 4");
    }
}

// ============================================================================
// Reserved words
// ============================================================================

const RESERVED_WORDS: [&str; 37] = [
    "and", "dim", "each", "else", "elseif", "end", "endfunction", "endif", "endsub", "endwhile", "eval",
    "exit", "exitwhile", "false", "for", "function", "goto", "if", "invalid", "let", "line_num", "next",
    "not", "objfun", "or", "pos", "print", "return", "step", "stop", "sub", "tab", "then", "to", "true",
    "type", "while",
];

#[test]
fn test_then_is_not_a_local_identifier() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    then = true\nend sub");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Cannot use reserved word 'then' as an identifier");
}

#[test]
fn test_then_is_allowed_as_property_name() {
    let arena = Bump::new();
    let result = parse(
        &arena,
        "sub main()\n    person = {\n        then: true\n    }\n    person.then = false\n    print person.then\nend sub",
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_end_is_not_a_local_identifier() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    end = true\nend sub");
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_no_reserved_word_can_be_a_local_variable() {
    for word in RESERVED_WORDS {
        let arena = Bump::new();
        let result = parse(&arena, &format!("sub main()\n    {} = true\nend sub", word));
        assert!(
            !result.diagnostics.is_empty(),
            "assigning to reserved word \"{}\" should have been an error",
            word
        );
        assert!(is_reserved_word(word));
    }
}

#[test]
fn test_every_reserved_word_is_allowed_as_key_and_property() {
    for word in RESERVED_WORDS {
        let arena = Bump::new();
        let source = format!("sub main()\n    o = {{ {0}: 1 }}\n    o.{0} = 2\n    print o.{0}\nend sub", word);
        let result = parse(&arena, &source);
        assert!(result.diagnostics.is_empty(), "\"{}\": {:?}", word, result.diagnostics);
    }
}

#[test]
fn test_every_reserved_word_is_an_error_in_one_line_sub() {
    for word in RESERVED_WORDS {
        let arena = Bump::new();
        let result = parse(&arena, &format!("sub main() {} = true end sub", word));
        assert!(!result.diagnostics.is_empty(), "\"{}\" should have been an error", word);
    }
}

// ============================================================================
// Conditional expressions
// ============================================================================

#[test]
fn test_ternary_in_brightscript_is_one_feature_error() {
    let arena = Bump::new();
    let result = parse(&arena, r#"a = true ? "human" : "Zombie""#);
    assert_eq!(
        messages_of(&result.diagnostics),
        vec!["BrighterScript feature 'ternary operator' is not supported in standard BrightScript files"]
    );
    assert!(result.statements.is_empty());
    assert_eq!(result.diagnostics[0].range.to_array(), [0, 9, 0, 10]);
}

#[test]
fn test_nested_ternary_in_brightscript_reports_once() {
    let arena = Bump::new();
    let result = parse(&arena, "sub main()\n    a = x ? (y ? 1 : 2) : 3\n    b = 1\nend sub");
    assert_eq!(result.diagnostics.len(), 1);
    let body = function_body(result.statements, 0);
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind(), SyntaxKind::AssignmentStatement);
}

#[test]
fn test_ternary_as_statement_is_rejected() {
    let arena = Bump::new();
    let tokens = vec![
        Token::new(SyntaxKind::True, "true", Range::new(0, 0, 0, 4)).with_literal(LiteralValue::Boolean(true)),
        Token::new(SyntaxKind::QuestionMark, "?", Range::new(0, 5, 0, 6)),
        Token::new(SyntaxKind::StringLiteral, "\"Human\"", Range::new(0, 7, 0, 14))
            .with_literal(LiteralValue::String("Human".into())),
        Token::new(SyntaxKind::Colon, ":", Range::new(0, 15, 0, 16)),
        Token::new(SyntaxKind::StringLiteral, "\"Zombie\"", Range::new(0, 17, 0, 25))
            .with_literal(LiteralValue::String("Zombie".into())),
        Token::eof(Range::new(0, 25, 0, 25)),
    ];
    let result = Parser::parse(&arena, &tokens, ParseOptions { mode: ParseMode::BrighterScript });
    assert!(!result.diagnostics.is_empty());
    assert!(result.statements.is_empty());

    for test in ["true", "false", "len(\"person\") = 10", "m.getResponse()"] {
        let arena = Bump::new();
        let result = parse_bs(&arena, &format!("{} ? \"human\" : \"zombie\"", test));
        assert!(!result.diagnostics.is_empty(), "{}", test);
        assert!(result.statements.is_empty(), "{}", test);
    }
}

#[test]
fn test_ternary_assignments() {
    let sources = [
        r#"being = isZombie = false ? "human" : "zombie""#,
        r#"a = user.getAccount() ? "logged in" : "not logged in""#,
        "a = true ? [\n  \"one\"\n  \"two\"\n  \"three\"] : [\n  \"one\"\n  \"two\"\n  \"three\"]",
        r#"a = true ? {"a":"a"} : {}"#,
        "a = true ? {\n  \"a\":\"a\"\n  \"b\":\"b\"\n  } : {\n  \"b\": \"test\"\n  }",
    ];
    for source in sources {
        let arena = Bump::new();
        let result = parse_bs(&arena, source);
        assert!(result.diagnostics.is_empty(), "{}: {:?}", source, result.diagnostics);
        assert!(
            matches!(assignment_value(&result.statements[0]), Expression::Conditional(_)),
            "{}",
            source
        );
    }
}

#[test]
fn test_ternary_consequents_and_alternates() {
    let operands = ["true", "len(\"person\") = 10", "m.getResponse()", "m.myZombies[3].ifFed = true", "getZombieName"];
    for operand in operands {
        for source in [
            format!("result = true ? {} : \"zombie\"", operand),
            format!("result = true ? \"zombie\" : {}", operand),
        ] {
            let arena = Bump::new();
            let result = parse_bs(&arena, &source);
            assert!(result.diagnostics.is_empty(), "{}: {:?}", source, result.diagnostics);
            assert!(matches!(assignment_value(&result.statements[0]), Expression::Conditional(_)));
        }
    }
}

#[test]
fn test_ternary_is_right_associative() {
    let arena = Bump::new();
    let result = parse_bs(&arena, "a = x ? 1 : y ? 2 : 3");
    let Expression::Conditional(outer) = assignment_value(&result.statements[0]) else {
        panic!("expected conditional");
    };
    assert!(matches!(outer.test, Expression::Variable(_)));
    assert!(matches!(outer.alternate, Expression::Conditional(_)));
}

#[test]
fn test_ternary_in_call_arguments() {
    let cases = [
        (r#"m.eatBrains(a.count() > 10 ? ["a","B"] : ["c", "d"])"#, 1),
        (r#"m.eatBrains(a.count() > 10 ? {"a":1} : {"b": ["c", "d"]})"#, 1),
        (r#"m.eatBrains(a = true ? "a" : "b")"#, 1),
        (r#"m.eatBrains(a = true ? "a" : "b", true, 12)"#, 3),
    ];
    for (source, arg_count) in cases {
        let arena = Bump::new();
        let result = parse_bs(&arena, source);
        assert!(result.diagnostics.is_empty(), "{}: {:?}", source, result.diagnostics);
        let Statement::Expression(stmt) = &result.statements[0] else {
            panic!("expected expression statement");
        };
        let Expression::Call(call) = stmt.expression else {
            panic!("expected call");
        };
        assert_eq!(call.args.len(), arg_count);
        assert!(matches!(call.args[0], Expression::Conditional(_)));
    }

    let arena = Bump::new();
    let result = parse_bs(&arena, r#"m.eatBrains((a = true ? "a" : "b").count() = 3, true, 12)"#);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn test_ternary_in_array_and_aa() {
    let arena = Bump::new();
    let result = parse_bs(&arena, r#"a = [a = true ? {"a":"a"} : {"b":"b"}, "c"]"#);
    assert!(result.diagnostics.is_empty());
    let Expression::ArrayLiteral(array) = assignment_value(&result.statements[0]) else {
        panic!("expected array");
    };
    assert!(matches!(array.elements[0], Expression::Conditional(_)));
    assert!(matches!(array.elements[1], Expression::Literal(_)));

    let arena = Bump::new();
    let result = parse_bs(&arena, r#"a = {"v1": a = true ? {"a":"a"} : {"b":"b"}, "v2": "c"}"#);
    assert!(result.diagnostics.is_empty());
    let Expression::AALiteral(aa) = assignment_value(&result.statements[0]) else {
        panic!("expected aa");
    };
    let properties: Vec<_> = aa
        .members
        .iter()
        .filter_map(|member| match member {
            AAMember::Property(property) => Some(property),
            AAMember::Comment(_) => None,
        })
        .collect();
    assert_eq!(properties[0].key, "v1");
    assert!(properties[0].quoted);
    assert!(matches!(properties[0].value, Expression::Conditional(_)));
    assert_eq!(properties[1].key, "v2");
    assert!(matches!(properties[1].value, Expression::Literal(_)));
}

#[test]
fn test_ternary_in_for_each() {
    let arena = Bump::new();
    let result = parse_bs(
        &arena,
        "for each person in isZombieMode ? zombies : humans\n    ? \"person is \" ; person\nend for\n",
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let Statement::ForEach(stmt) = &result.statements[0] else {
        panic!("expected for each");
    };
    assert!(matches!(stmt.target, Expression::Conditional(_)));
    assert_eq!(stmt.body.statements[0].kind(), SyntaxKind::PrintStatement);
}
