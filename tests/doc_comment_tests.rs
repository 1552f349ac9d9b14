//! Which comments become documentation, under each configuration.

use pretty_assertions::assert_eq;
use protoparser::{parse, parse_with_config, ParserConfig, ProtoFile};

fn message_doc(file: &ProtoFile, index: usize) -> &str {
    file.types()[index].documentation()
}

#[test]
fn test_comment_immediately_before_is_attached() {
    let file = parse("d.proto", "// Describes M.\nmessage M {}").unwrap();
    assert_eq!(message_doc(&file, 0), "Describes M.");
}

#[test]
fn test_comment_separated_by_blank_line_is_not_attached() {
    let file = parse("d.proto", "// Stray note.\n\nmessage M {}").unwrap();
    assert_eq!(message_doc(&file, 0), "");
}

#[test]
fn test_only_comments_after_last_blank_line_attach() {
    let source = "// License header.\n\n// Real doc.\nmessage M {}";
    let file = parse("d.proto", source).unwrap();
    assert_eq!(message_doc(&file, 0), "Real doc.");
}

#[test]
fn test_consecutive_lines_are_joined() {
    let source = "// First line.\n// Second line.\nmessage M {}";
    let file = parse("d.proto", source).unwrap();
    assert_eq!(message_doc(&file, 0), "First line.\nSecond line.");
}

#[test]
fn test_blank_line_rule_can_be_disabled() {
    let config = ParserConfig::new().with_blank_line_detaches(false);
    let source = "// License header.\n\n// Real doc.\nmessage M {}";
    let file = parse_with_config("d.proto", source, &config).unwrap();
    assert_eq!(message_doc(&file, 0), "License header.\nReal doc.");
}

#[test]
fn test_join_can_be_disabled() {
    let config = ParserConfig::new().with_join_consecutive(false);
    let source = "// First line.\n// Second line.\nmessage M {}";
    let file = parse_with_config("d.proto", source, &config).unwrap();
    assert_eq!(message_doc(&file, 0), "Second line.");
}

#[test]
fn test_trailing_comment_does_not_leak_forward() {
    let source = "message M {\n  optional int32 a = 1; // about a\n  optional int32 b = 2;\n}";
    let file = parse("d.proto", source).unwrap();
    let m = file.types()[0].as_message().unwrap();
    assert_eq!(m.fields()[0].documentation(), "");
    assert_eq!(m.fields()[1].documentation(), "");
}

#[test]
fn test_docs_on_every_declaration_kind() {
    let source = r#"
// The enum.
enum E {
  // The value.
  V = 1;
}

message M {
  // The field.
  optional int32 f = 1;
  // The range.
  extensions 10 to 20;
}

// The extend.
extend M {
  // The extension field.
  optional int32 x = 10;
}

// The service.
service S {
  // The method.
  rpc Call (M) returns (M);
}
"#;
    let file = parse("d.proto", source).unwrap();

    let e = file.types()[0].as_enum().unwrap();
    assert_eq!(e.documentation(), "The enum.");
    assert_eq!(e.values()[0].documentation(), "The value.");

    let m = file.types()[1].as_message().unwrap();
    assert_eq!(m.documentation(), "");
    assert_eq!(m.fields()[0].documentation(), "The field.");
    assert_eq!(m.extensions()[0].documentation(), "The range.");

    let extend = &file.extend_declarations()[0];
    assert_eq!(extend.documentation(), "The extend.");
    assert_eq!(extend.fields()[0].documentation(), "The extension field.");

    let service = &file.services()[0];
    assert_eq!(service.documentation(), "The service.");
    assert_eq!(service.methods()[0].documentation(), "The method.");
}

#[test]
fn test_block_comment_documentation() {
    let source = "/**\n * Multi-line\n * block doc.\n */\nmessage M {}";
    let file = parse("d.proto", source).unwrap();
    assert_eq!(message_doc(&file, 0), "Multi-line\nblock doc.");
}

#[test]
fn test_comment_inside_declaration_is_not_its_doc() {
    let source = "message M { // opening remark\n}";
    let file = parse("d.proto", source).unwrap();
    assert_eq!(message_doc(&file, 0), "");
}
