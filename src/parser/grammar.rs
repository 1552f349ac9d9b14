use tracing::debug;

use super::cursor::{unexpected, Cursor};
use super::lexer::{Keyword, Located, Token};
use super::scope::Scope;
use crate::error::{ParseError, Position, ValidationError};
use crate::types::*;

fn at(position: Position) -> impl FnOnce(ValidationError) -> ParseError {
    move |error| ParseError::validation(error, position)
}

fn doc_of(tok: &Located) -> String {
    tok.doc.clone().unwrap_or_default()
}

/// Parse a whole source unit into a `ProtoFile`.
pub fn parse_file(cursor: &mut Cursor, file_name: &str) -> Result<ProtoFile, ParseError> {
    let mut scope = Scope::new();
    let mut parts = FileParts::default();
    let mut first = true;
    // Start of every top-level type and service, for locating name clashes.
    let mut declared: Vec<(String, Position)> = Vec::new();

    loop {
        let tok = cursor.peek()?.clone();
        match tok.token.keyword() {
            _ if tok.token == Token::Eof => break,
            _ if tok.token == Token::Semi => {
                cursor.next()?;
            }
            Some(Keyword::Syntax) if first => {
                parts.syntax = Some(parse_syntax(cursor)?);
            }
            Some(Keyword::Package) => {
                cursor.next()?;
                let package = cursor.expect_ident("package name")?;
                cursor.expect(Token::Semi)?;
                scope.set_package(package).map_err(at(tok.position))?;
                parts.package = scope.package().to_string();
                parts.types_before_package = parts.types.len();
                parts.services_before_package = parts.services.len();
            }
            Some(Keyword::Import) => {
                cursor.next()?;
                let public = cursor.eat_keyword(Keyword::Public)?;
                let path = cursor.expect_string("import path")?;
                cursor.expect(Token::Semi)?;
                if public {
                    parts.public_dependencies.push(path);
                } else {
                    parts.dependencies.push(path);
                }
            }
            Some(Keyword::Option) => {
                cursor.next()?;
                parts.options.push(parse_option_statement(cursor)?);
            }
            Some(Keyword::Message) => {
                let message = parse_message(cursor, &mut scope)?;
                declared.push((message.name().to_string(), tok.position));
                parts.types.push(Type::Message(message));
            }
            Some(Keyword::Enum) => {
                let enum_type = parse_enum(cursor, &scope)?;
                declared.push((enum_type.name().to_string(), tok.position));
                parts.types.push(Type::Enum(enum_type));
            }
            Some(Keyword::Extend) => {
                parts.extends.push(parse_extend(cursor)?);
            }
            Some(Keyword::Service) => {
                let service = parse_service(cursor, &scope)?;
                declared.push((service.name().to_string(), tok.position));
                parts.services.push(service);
            }
            _ => {
                return Err(unexpected(
                    &tok,
                    "'package', 'import', 'option', 'message', 'enum', 'extend' or 'service'",
                ));
            }
        }
        first = false;
    }

    debug!(
        file = file_name,
        package = %parts.package,
        types = parts.types.len(),
        services = parts.services.len(),
        "parsed file"
    );
    ProtoFile::new(file_name, parts).map_err(|error| {
        let position = match &error {
            ValidationError::DuplicateName { name, .. } => declared
                .iter()
                .rev()
                .find(|(declared_name, _)| declared_name == name)
                .map(|(_, position)| *position),
            _ => None,
        };
        ParseError::validation(error, position.unwrap_or(Position::new(1, 1, 0)))
    })
}

fn parse_syntax(cursor: &mut Cursor) -> Result<String, ParseError> {
    cursor.expect_keyword(Keyword::Syntax)?;
    cursor.expect(Token::Eq)?;
    let position = cursor.position()?;
    let syntax = cursor.expect_string("syntax version")?;
    cursor.expect(Token::Semi)?;
    if syntax != "proto2" {
        return Err(ParseError::validation(
            ValidationError::UnsupportedSyntax(syntax),
            position,
        ));
    }
    Ok(syntax)
}

fn parse_message(cursor: &mut Cursor, scope: &mut Scope) -> Result<MessageType, ParseError> {
    let start = cursor.expect_keyword(Keyword::Message)?;
    cursor.descend(&start)?;
    let name = cursor.expect_name("message name")?;
    let fully_qualified_name = scope.qualify(&name);
    cursor.expect(Token::LBrace)?;

    scope.enter(&name);
    let parts = parse_message_body(cursor, scope)?;
    scope.leave();
    cursor.ascend();

    cursor.expect(Token::RBrace)?;
    MessageType::new(name, fully_qualified_name, doc_of(&start), parts).map_err(at(start.position))
}

fn parse_message_body(cursor: &mut Cursor, scope: &mut Scope) -> Result<MessageParts, ParseError> {
    let mut parts = MessageParts::default();

    loop {
        let tok = cursor.peek()?.clone();
        match &tok.token {
            Token::RBrace => break,
            Token::Semi => {
                cursor.next()?;
                continue;
            }
            Token::Ident(ident) if ident == "map" => {
                parts.fields.push(parse_map_field(cursor)?);
                continue;
            }
            _ => {}
        }
        match tok.token.keyword() {
            Some(Keyword::Required | Keyword::Optional | Keyword::Repeated) => {
                parts.fields.push(parse_field(cursor)?);
            }
            Some(Keyword::Message) => {
                parts.nested_types.push(Type::Message(parse_message(cursor, scope)?));
            }
            Some(Keyword::Enum) => {
                parts.nested_types.push(Type::Enum(parse_enum(cursor, scope)?));
            }
            Some(Keyword::Extend) => {
                parts.extends.push(parse_extend(cursor)?);
            }
            Some(Keyword::Extensions) => {
                parts.extensions.extend(parse_extensions(cursor)?);
            }
            Some(Keyword::Option) => {
                cursor.next()?;
                parts.options.push(parse_option_statement(cursor)?);
            }
            _ => {
                return Err(unexpected(
                    &tok,
                    "field, 'message', 'enum', 'extend', 'extensions', 'option' or '}'",
                ));
            }
        }
    }

    Ok(parts)
}

fn parse_field(cursor: &mut Cursor) -> Result<Field, ParseError> {
    let start = cursor.next()?;
    let label = match start.token.keyword() {
        Some(Keyword::Required) => Label::Required,
        Some(Keyword::Optional) => Label::Optional,
        Some(Keyword::Repeated) => Label::Repeated,
        _ => return Err(unexpected(&start, "'required', 'optional' or 'repeated'")),
    };
    let type_name = cursor.expect_ident("field type")?;
    finish_field(cursor, &start, label, type_name)
}

/// `map<K, V> name = tag;`. Map fields carry no label and are stored as
/// repeated fields whose type name is the map signature.
fn parse_map_field(cursor: &mut Cursor) -> Result<Field, ParseError> {
    let start = cursor.next()?;
    cursor.expect(Token::Lt)?;
    let key = cursor.expect_ident("map key type")?;
    cursor.expect(Token::Comma)?;
    let value = cursor.expect_ident("map value type")?;
    cursor.expect(Token::Gt)?;
    let type_name = format!("map<{}, {}>", key, value);
    finish_field(cursor, &start, Label::Repeated, type_name)
}

fn finish_field(
    cursor: &mut Cursor,
    start: &Located,
    label: Label,
    type_name: String,
) -> Result<Field, ParseError> {
    let name = cursor.expect_name("field name")?;
    cursor.expect(Token::Eq)?;
    let tag = cursor.expect_int("field tag")?;
    let options = parse_bracket_options(cursor)?;
    cursor.expect(Token::Semi)?;
    Field::new(label, type_name, name, tag, doc_of(start), options).map_err(at(start.position))
}

fn parse_extensions(cursor: &mut Cursor) -> Result<Vec<ExtensionRange>, ParseError> {
    let start = cursor.expect_keyword(Keyword::Extensions)?;
    let doc = doc_of(&start);
    let mut ranges = Vec::new();

    loop {
        let position = cursor.position()?;
        let low = cursor.expect_int("extension range start")?;
        let high = if cursor.eat_keyword(Keyword::To)? {
            if cursor.eat_keyword(Keyword::Max)? {
                MAX_TAG as i128
            } else {
                cursor.expect_int("extension range end or 'max'")?
            }
        } else {
            low
        };
        ranges.push(ExtensionRange::new(doc.clone(), low, high).map_err(at(position))?);
        if !cursor.eat(&Token::Comma)? {
            break;
        }
    }

    cursor.expect(Token::Semi)?;
    Ok(ranges)
}

fn parse_enum(cursor: &mut Cursor, scope: &Scope) -> Result<EnumType, ParseError> {
    let start = cursor.expect_keyword(Keyword::Enum)?;
    let name = cursor.expect_name("enum name")?;
    let fully_qualified_name = scope.qualify(&name);
    cursor.expect(Token::LBrace)?;

    let mut values = Vec::new();
    let mut options = Vec::new();
    loop {
        let tok = cursor.peek()?.clone();
        match &tok.token {
            Token::RBrace => break,
            Token::Semi => {
                cursor.next()?;
            }
            _ if tok.token.keyword() == Some(Keyword::Option) => {
                cursor.next()?;
                options.push(parse_option_statement(cursor)?);
            }
            Token::Ident(_) => values.push(parse_enum_value(cursor)?),
            _ => return Err(unexpected(&tok, "enum value, 'option' or '}'")),
        }
    }
    cursor.expect(Token::RBrace)?;

    EnumType::new(name, fully_qualified_name, doc_of(&start), values, options)
        .map_err(at(start.position))
}

fn parse_enum_value(cursor: &mut Cursor) -> Result<EnumValue, ParseError> {
    let start = cursor.peek()?.clone();
    let name = cursor.expect_name("enum value name")?;
    cursor.expect(Token::Eq)?;
    let tag = cursor.expect_int("enum value")?;
    let options = parse_bracket_options(cursor)?;
    cursor.expect(Token::Semi)?;
    EnumValue::new(name, tag, doc_of(&start), options).map_err(at(start.position))
}

fn parse_extend(cursor: &mut Cursor) -> Result<Extend, ParseError> {
    let start = cursor.expect_keyword(Keyword::Extend)?;
    let type_name = cursor.expect_ident("extended type name")?;
    cursor.expect(Token::LBrace)?;

    let mut fields = Vec::new();
    loop {
        let tok = cursor.peek()?.clone();
        match tok.token.keyword() {
            _ if tok.token == Token::RBrace => break,
            _ if tok.token == Token::Semi => {
                cursor.next()?;
            }
            Some(Keyword::Required | Keyword::Optional | Keyword::Repeated) => {
                fields.push(parse_field(cursor)?);
            }
            _ => return Err(unexpected(&tok, "field or '}'")),
        }
    }
    cursor.expect(Token::RBrace)?;

    Extend::new(type_name, doc_of(&start), fields).map_err(at(start.position))
}

fn parse_service(cursor: &mut Cursor, scope: &Scope) -> Result<Service, ParseError> {
    let start = cursor.expect_keyword(Keyword::Service)?;
    let name = cursor.expect_name("service name")?;
    let fully_qualified_name = scope.qualify(&name);
    cursor.expect(Token::LBrace)?;

    let mut options = Vec::new();
    let mut methods = Vec::new();
    loop {
        let tok = cursor.peek()?.clone();
        match tok.token.keyword() {
            _ if tok.token == Token::RBrace => break,
            _ if tok.token == Token::Semi => {
                cursor.next()?;
            }
            Some(Keyword::Option) => {
                cursor.next()?;
                options.push(parse_option_statement(cursor)?);
            }
            Some(Keyword::Rpc) => methods.push(parse_rpc(cursor)?),
            _ => return Err(unexpected(&tok, "'rpc', 'option' or '}'")),
        }
    }
    cursor.expect(Token::RBrace)?;

    Service::new(name, fully_qualified_name, doc_of(&start), options, methods)
        .map_err(at(start.position))
}

fn parse_rpc(cursor: &mut Cursor) -> Result<Method, ParseError> {
    let start = cursor.expect_keyword(Keyword::Rpc)?;
    let name = cursor.expect_name("rpc name")?;
    cursor.expect(Token::LParen)?;
    let request_type = cursor.expect_ident("request type")?;
    cursor.expect(Token::RParen)?;
    cursor.expect_keyword(Keyword::Returns)?;
    cursor.expect(Token::LParen)?;
    let response_type = cursor.expect_ident("response type")?;
    cursor.expect(Token::RParen)?;

    let mut options = Vec::new();
    if cursor.eat(&Token::LBrace)? {
        loop {
            let tok = cursor.peek()?.clone();
            match tok.token.keyword() {
                _ if tok.token == Token::RBrace => break,
                _ if tok.token == Token::Semi => {
                    cursor.next()?;
                }
                Some(Keyword::Option) => {
                    cursor.next()?;
                    options.push(parse_option_statement(cursor)?);
                }
                _ => return Err(unexpected(&tok, "'option' or '}'")),
            }
        }
        cursor.expect(Token::RBrace)?;
        cursor.eat(&Token::Semi)?;
    } else {
        cursor.expect(Token::Semi)?;
    }

    Method::new(name, doc_of(&start), request_type, response_type, options)
        .map_err(at(start.position))
}

/// `name = value;` following an `option` keyword.
fn parse_option_statement(cursor: &mut Cursor) -> Result<ProtoOption, ParseError> {
    let name = parse_option_name(cursor)?;
    cursor.expect(Token::Eq)?;
    let value = parse_option_value(cursor)?;
    cursor.expect(Token::Semi)?;
    Ok(ProtoOption::new(name, value))
}

/// `[name = value, ...]` after a field or enum value, if present.
fn parse_bracket_options(cursor: &mut Cursor) -> Result<Vec<ProtoOption>, ParseError> {
    let mut options = Vec::new();
    if !cursor.eat(&Token::LBracket)? {
        return Ok(options);
    }
    loop {
        let name = parse_option_name(cursor)?;
        cursor.expect(Token::Eq)?;
        let value = parse_option_value(cursor)?;
        options.push(ProtoOption::new(name, value));
        if !cursor.eat(&Token::Comma)? {
            break;
        }
    }
    cursor.expect(Token::RBracket)?;
    Ok(options)
}

/// `simple`, `dotted.name` or `(custom.ext).field.path`.
fn parse_option_name(cursor: &mut Cursor) -> Result<String, ParseError> {
    let tok = cursor.next()?;
    let mut name = match tok.token {
        Token::Ident(name) => name,
        Token::LParen => {
            let inner = cursor.expect_ident("extension name")?;
            cursor.expect(Token::RParen)?;
            format!("({})", inner)
        }
        _ => return Err(unexpected(&tok, "option name")),
    };
    loop {
        let suffix = match &cursor.peek()?.token {
            Token::Ident(s) if s.starts_with('.') => s.clone(),
            _ => break,
        };
        cursor.next()?;
        name.push_str(&suffix);
    }
    Ok(name)
}

fn parse_option_value(cursor: &mut Cursor) -> Result<OptionValue, ParseError> {
    if matches!(cursor.peek()?.token, Token::Str(_)) {
        let bytes = cursor.expect_string_bytes("option value")?;
        return Ok(match String::from_utf8(bytes) {
            Ok(text) => OptionValue::Str(text),
            Err(e) => OptionValue::Bytes(e.into_bytes()),
        });
    }
    let tok = cursor.next()?;
    match tok.token {
        Token::Int(n) => Ok(OptionValue::Int(n)),
        Token::Float(n) => Ok(OptionValue::Float(n)),
        Token::Ident(ident) => Ok(OptionValue::Ident(ident)),
        Token::LBracket | Token::LBrace | Token::Lt => {
            cursor.descend(&tok)?;
            let value = match tok.token {
                Token::LBracket => parse_option_list(cursor)?,
                Token::LBrace => parse_option_map(cursor, Token::RBrace)?,
                _ => parse_option_map(cursor, Token::Gt)?,
            };
            cursor.ascend();
            Ok(value)
        }
        _ => Err(unexpected(&tok, "option value")),
    }
}

/// Items of a `[ ... ]` list, after the opening bracket.
fn parse_option_list(cursor: &mut Cursor) -> Result<OptionValue, ParseError> {
    let mut items = Vec::new();
    if cursor.eat(&Token::RBracket)? {
        return Ok(OptionValue::List(items));
    }
    loop {
        items.push(parse_option_value(cursor)?);
        if !cursor.eat(&Token::Comma)? {
            break;
        }
    }
    cursor.expect(Token::RBracket)?;
    Ok(OptionValue::List(items))
}

/// Entries of a `{ ... }` or `< ... >` literal, up to and including `close`.
fn parse_option_map(cursor: &mut Cursor, close: Token) -> Result<OptionValue, ParseError> {
    let mut entries = Vec::new();
    while !cursor.eat(&close)? {
        let key = if cursor.eat(&Token::LBracket)? {
            let ext = cursor.expect_ident("extension name")?;
            cursor.expect(Token::RBracket)?;
            format!("[{}]", ext)
        } else {
            parse_option_name(cursor)?
        };

        let value = if cursor.eat(&Token::Colon)? {
            parse_option_value(cursor)?
        } else {
            // The colon is optional before a nested message literal.
            let tok = cursor.peek()?.clone();
            match tok.token {
                Token::LBrace | Token::Lt => parse_option_value(cursor)?,
                _ => return Err(unexpected(&tok, "':'")),
            }
        };
        entries.push(ProtoOption::new(key, value));

        if !cursor.eat(&Token::Comma)? {
            cursor.eat(&Token::Semi)?;
        }
    }
    Ok(OptionValue::Map(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocCommentConfig;
    use crate::parser::lexer::Lexer;

    fn parse(source: &str) -> Result<ProtoFile, ParseError> {
        let mut cursor = Cursor::new(Lexer::new(source, DocCommentConfig::default()));
        parse_file(&mut cursor, "test.proto")
    }

    #[test]
    fn test_parse_simple_message() {
        let file = parse("message M { optional int32 a = 1; }").unwrap();
        assert_eq!(file.types().len(), 1);
        let m = file.types()[0].as_message().unwrap();
        assert_eq!(m.name(), "M");
        assert_eq!(m.fields().len(), 1);
        let a = &m.fields()[0];
        assert_eq!(a.name(), "a");
        assert_eq!(a.tag(), 1);
        assert_eq!(a.label(), Label::Optional);
        assert_eq!(a.type_name(), "int32");
    }

    #[test]
    fn test_parse_nested_names() {
        let file = parse("package foo; message Outer { message Inner {} enum E { X = 0; } }").unwrap();
        let outer = &file.types()[0];
        assert_eq!(outer.fully_qualified_name(), "foo.Outer");
        assert_eq!(outer.nested_types()[0].fully_qualified_name(), "foo.Outer.Inner");
        assert_eq!(outer.nested_types()[1].fully_qualified_name(), "foo.Outer.E");
    }

    #[test]
    fn test_sibling_scope_restored() {
        let file = parse("message A { message B {} } message C {}").unwrap();
        assert_eq!(file.types()[1].fully_qualified_name(), "C");
    }

    #[test]
    fn test_parse_extensions() {
        let file = parse("message M { extensions 100 to 199, 300, 500 to max; }").unwrap();
        let m = file.types()[0].as_message().unwrap();
        let ranges: Vec<(u32, u32)> = m.extensions().iter().map(|r| (r.start(), r.end())).collect();
        assert_eq!(ranges, vec![(100, 199), (300, 300), (500, MAX_TAG)]);
    }

    #[test]
    fn test_parse_map_field() {
        let file = parse("message M { map<string, int32> counts = 1; }").unwrap();
        let f = &file.types()[0].as_message().unwrap().fields()[0];
        assert_eq!(f.type_name(), "map<string, int32>");
        assert_eq!(f.label(), Label::Repeated);
    }

    #[test]
    fn test_parse_rpc_with_options() {
        let file = parse(
            "service S { rpc Get (Req) returns (Resp) { option deadline = 1.5; } rpc Put (A) returns (B); }",
        )
        .unwrap();
        let s = &file.services()[0];
        assert_eq!(s.methods().len(), 2);
        assert_eq!(
            s.methods()[0].option("deadline"),
            Some(&OptionValue::Float(1.5))
        );
        assert_eq!(s.methods()[1].request_type(), "A");
    }

    #[test]
    fn test_parse_custom_option_name() {
        let file = parse("option (my.ext).field.sub = 3;").unwrap();
        assert_eq!(file.options()[0].name(), "(my.ext).field.sub");
    }

    #[test]
    fn test_parse_option_map_forms() {
        let file = parse(r#"option (x) = { a: 1 b { c: "s" } d: < e: E >; f: [1, 2] };"#).unwrap();
        let value = file.options()[0].value();
        assert_eq!(value.get("a"), Some(&OptionValue::Int(1)));
        assert_eq!(
            value.get("b").and_then(|b| b.get("c")),
            Some(&OptionValue::Str("s".into()))
        );
        assert_eq!(
            value.get("d").and_then(|d| d.get("e")),
            Some(&OptionValue::Ident("E".into()))
        );
        assert_eq!(
            value.get("f"),
            Some(&OptionValue::List(vec![OptionValue::Int(1), OptionValue::Int(2)]))
        );
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        let file = parse(r#"option java_package = "com." "example";"#).unwrap();
        assert_eq!(file.option("java_package"), Some(&OptionValue::Str("com.example".into())));
    }

    #[test]
    fn test_unknown_body_token() {
        let err = parse("message M { int32 a = 1; }").unwrap_err();
        match err {
            ParseError::Syntax(e) => {
                assert_eq!(e.found, "identifier 'int32'");
                assert_eq!(e.position.column, 13);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_field_name_rejected() {
        assert!(matches!(
            parse("message M { optional int32 a.b = 1; }"),
            Err(ParseError::Syntax(_))
        ));
    }

    #[test]
    fn test_syntax_must_come_first() {
        assert!(parse(r#"syntax = "proto2"; package a;"#).is_ok());
        assert!(matches!(
            parse(r#"package a; syntax = "proto2";"#),
            Err(ParseError::Syntax(_))
        ));
        assert!(matches!(
            parse(r#"syntax = "proto3";"#),
            Err(ParseError::Validation {
                error: ValidationError::UnsupportedSyntax(_),
                ..
            })
        ));
    }
}
