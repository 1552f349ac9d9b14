//! Helpers shared by the `Display` implementations of the model.

use super::option::ProtoOption;

pub(crate) fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Write documentation as `//` lines.
pub(crate) fn write_doc(out: &mut String, doc: &str, depth: usize) {
    if doc.is_empty() {
        return;
    }
    for line in doc.split('\n') {
        indent(out, depth);
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// `option name = value;` lines for a declaration body.
pub(crate) fn write_option_statements(out: &mut String, options: &[ProtoOption], depth: usize) {
    for option in options {
        indent(out, depth);
        out.push_str("option ");
        out.push_str(&option.to_string());
        out.push_str(";\n");
    }
}

/// ` [a = 1, b = 2]` suffix for fields and enum values.
pub(crate) fn bracket_options(options: &[ProtoOption]) -> String {
    if options.is_empty() {
        return String::new();
    }
    let list: Vec<String> = options.iter().map(ToString::to_string).collect();
    format!(" [{}]", list.join(", "))
}

/// Quote a string literal, escaping what the lexer would otherwise reject.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote raw string-literal bytes. Anything outside printable ASCII is
/// written as a three-digit octal escape so the exact bytes re-lex.
pub(crate) fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote("\u{1}"), r#""\x01""#);
    }

    #[test]
    fn test_quote_bytes_escapes() {
        assert_eq!(quote_bytes(&[0xff, 0x01, b'a', b'"']), r#""\377\001a\"""#);
        assert_eq!(quote_bytes(&[0x00, b'7']), r#""\0007""#);
    }

    #[test]
    fn test_write_doc_lines() {
        let mut out = String::new();
        write_doc(&mut out, "one\n\ntwo", 1);
        assert_eq!(out, "  // one\n  //\n  // two\n");
    }
}
