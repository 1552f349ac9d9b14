//! Lex, syntax and validation failures, and where they are reported.

use pretty_assertions::assert_eq;
use protoparser::{parse, LexErrorKind, ParseError, Position, ValidationError};

fn error(source: &str) -> ParseError {
    parse("err.proto", source).expect_err("parse should fail")
}

fn line_col(err: &ParseError) -> (usize, usize) {
    let p = err.position();
    (p.line, p.column)
}

// =============================================================================
// Lex errors
// =============================================================================

#[test]
fn test_unterminated_string() {
    let err = error("package \"abc;\n");
    assert!(matches!(
        &err,
        ParseError::Lex(e) if e.kind == LexErrorKind::UnterminatedString
    ));
    assert_eq!(line_col(&err), (1, 9));
}

#[test]
fn test_unterminated_block_comment() {
    let err = error("message M {}\n/* dangling");
    assert!(matches!(
        &err,
        ParseError::Lex(e) if e.kind == LexErrorKind::UnterminatedComment
    ));
    assert_eq!(line_col(&err), (2, 1));
}

#[test]
fn test_illegal_character() {
    let err = error("message M { optional int32 a = 1; $ }");
    assert!(matches!(
        &err,
        ParseError::Lex(e) if e.kind == LexErrorKind::IllegalCharacter('$')
    ));
}

// =============================================================================
// Syntax errors
// =============================================================================

#[test]
fn test_missing_semicolon_deep_inside_nested_message() {
    let source = "\
package p;
message A {
  message B {
    message C {
      optional int32 x = 1
    }
  }
}
";
    let err = error(source);
    match &err {
        ParseError::Syntax(e) => {
            assert_eq!(e.expected, "';'");
            assert_eq!(e.found, "'}'");
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
    // The closing brace on line 6, not the start of any enclosing message.
    assert_eq!(line_col(&err), (6, 5));
}

#[test]
fn test_unexpected_top_level_token() {
    let err = error("message M {}\nfoo bar;");
    match &err {
        ParseError::Syntax(e) => assert_eq!(e.found, "identifier 'foo'"),
        other => panic!("expected syntax error, got {:?}", other),
    }
    assert_eq!(line_col(&err), (2, 1));
}

#[test]
fn test_unclosed_message() {
    let err = error("message M { optional int32 a = 1;");
    match &err {
        ParseError::Syntax(e) => assert_eq!(e.found, "end of input"),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_missing_returns_keyword() {
    let err = error("service S { rpc Get (A) (B); }");
    match &err {
        ParseError::Syntax(e) => {
            assert_eq!(e.expected, "'returns'");
            assert_eq!(e.found, "'('");
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_float_tag_is_syntax_error() {
    assert!(matches!(
        error("message M { optional int32 a = 1.5; }"),
        ParseError::Syntax(_)
    ));
}

#[test]
fn test_error_display_format() {
    let err = error("message M {\n  optional int32 a = ;\n}");
    assert_eq!(
        err.to_string(),
        "expected field tag, found ';' at 2:22"
    );
}

// =============================================================================
// Validation errors
// =============================================================================

#[test]
fn test_duplicate_field_tag() {
    let err = error("message M { optional int32 a = 1; optional string b = 1; }");
    match &err {
        ParseError::Validation {
            error: ValidationError::DuplicateTag { tag, first, second, .. },
            ..
        } => {
            assert_eq!(*tag, 1);
            assert_eq!(first, "a");
            assert_eq!(second, "b");
        }
        other => panic!("expected duplicate tag, got {:?}", other),
    }
    assert_eq!(err.position(), Position::new(1, 1, 0));
}

#[test]
fn test_duplicate_field_name() {
    assert!(matches!(
        error("message M { optional int32 a = 1; optional int32 a = 2; }"),
        ParseError::Validation {
            error: ValidationError::DuplicateName { .. },
            ..
        }
    ));
}

#[test]
fn test_field_tag_out_of_range() {
    let err = error("message M {\n  optional int32 a = 0;\n}");
    assert!(matches!(
        &err,
        ParseError::Validation {
            error: ValidationError::TagOutOfRange { tag: 0, .. },
            ..
        }
    ));
    assert_eq!(line_col(&err), (2, 3));

    assert!(matches!(
        error("message M { optional int32 a = 536870912; }"),
        ParseError::Validation {
            error: ValidationError::TagOutOfRange { .. },
            ..
        }
    ));
    assert!(matches!(
        error("message M { optional int32 a = -1; }"),
        ParseError::Validation {
            error: ValidationError::TagOutOfRange { tag: -1, .. },
            ..
        }
    ));
}

#[test]
fn test_reserved_field_tag() {
    assert!(matches!(
        error("message M { optional int32 a = 19000; }"),
        ParseError::Validation {
            error: ValidationError::ReservedTag { tag: 19000, .. },
            ..
        }
    ));
}

#[test]
fn test_field_tag_in_extension_range() {
    assert!(matches!(
        error("message M { extensions 10 to 20; optional int32 a = 15; }"),
        ParseError::Validation {
            error: ValidationError::TagInExtensionRange { tag: 15, .. },
            ..
        }
    ));
}

#[test]
fn test_invalid_extension_range() {
    assert!(matches!(
        error("message M { extensions 20 to 10; }"),
        ParseError::Validation {
            error: ValidationError::InvalidExtensionRange { start: 20, end: 10 },
            ..
        }
    ));
}

#[test]
fn test_enum_value_out_of_range() {
    assert!(matches!(
        error("enum E { BIG = 2147483648; }"),
        ParseError::Validation {
            error: ValidationError::EnumTagOutOfRange { .. },
            ..
        }
    ));
    assert!(parse("e.proto", "enum E { SMALL = -2147483648; }").is_ok());
}

#[test]
fn test_duplicate_enum_tag_without_alias() {
    assert!(matches!(
        error("enum E { A = 1; B = 1; }"),
        ParseError::Validation {
            error: ValidationError::DuplicateTag { .. },
            ..
        }
    ));
}

#[test]
fn test_second_package_statement() {
    let err = error("package a;\npackage b;");
    assert_eq!(
        err,
        ParseError::Validation {
            error: ValidationError::DuplicatePackage {
                existing: "a".into()
            },
            position: Position::new(2, 1, 11),
        }
    );
}

#[test]
fn test_duplicate_top_level_names() {
    let err = error("message M {}\nenum M { A = 0; }");
    assert!(matches!(
        &err,
        ParseError::Validation {
            error: ValidationError::DuplicateName { .. },
            ..
        }
    ));
    assert_eq!(line_col(&err), (2, 1));
}

#[test]
fn test_duplicate_extend_field_tags() {
    assert!(matches!(
        error("extend Foo { optional int32 a = 100; optional int32 b = 100; }"),
        ParseError::Validation {
            error: ValidationError::DuplicateTag { .. },
            ..
        }
    ));
}

#[test]
fn test_duplicate_rpc_names() {
    assert!(matches!(
        error("service S { rpc A (X) returns (Y); rpc A (X) returns (Y); }"),
        ParseError::Validation {
            error: ValidationError::DuplicateName { .. },
            ..
        }
    ));
}

#[test]
fn test_float_literal_overflow() {
    let err = error("option ratio = 1e400;");
    assert!(matches!(
        &err,
        ParseError::Lex(e) if e.kind == LexErrorKind::FloatOverflow("1e400".into())
    ));
    assert_eq!(line_col(&err), (1, 16));
}

#[test]
fn test_non_utf8_import_path() {
    let err = error("import \"a\\377.proto\";");
    match &err {
        ParseError::Syntax(e) => assert_eq!(e.expected, "import path as UTF-8 text"),
        other => panic!("expected syntax error, got {:?}", other),
    }
    assert_eq!(line_col(&err), (1, 8));
}

// =============================================================================
// Nesting limits
// =============================================================================

#[test]
fn test_deeply_nested_option_literal_is_rejected() {
    let source = format!("option (x) = {};", "{ a ".repeat(50_000));
    let err = error(&source);
    match &err {
        ParseError::Syntax(e) => {
            assert_eq!(e.expected, "at most 100 levels of nesting");
            assert_eq!(e.found, "'{'");
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_deeply_nested_lists_are_rejected() {
    let source = format!("option x = {};", "[".repeat(50_000));
    assert!(matches!(error(&source), ParseError::Syntax(_)));
}

#[test]
fn test_nesting_limit_for_messages() {
    let nested = |depth: usize| format!("{}{}", "message M { ".repeat(depth), "} ".repeat(depth));

    let file = parse("deep.proto", &nested(100)).unwrap();
    assert_eq!(file.types_recursive().count(), 100);

    let err = error(&nested(101));
    match &err {
        ParseError::Syntax(e) => {
            assert_eq!(e.expected, "at most 100 levels of nesting");
            assert_eq!(e.found, "identifier 'message'");
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
    assert_eq!(line_col(&err), (1, 1 + 100 * "message M { ".len()));
}
