pub mod lexer;
mod cursor;
mod grammar;
mod scope;

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::{LexError, LexErrorKind, ParseError, Position};
use crate::types::ProtoFile;
use cursor::Cursor;
use lexer::Lexer;

/// Parse `.proto` source text into a `ProtoFile`.
///
/// This is the main entry point for the parser module. `file_name` is only
/// recorded on the result; nothing is read from disk.
pub fn parse(file_name: &str, source: &str) -> Result<ProtoFile, ParseError> {
    parse_with_config(file_name, source, &ParserConfig::default())
}

/// Like [`parse`], with explicit control over documentation comments.
pub fn parse_with_config(
    file_name: &str,
    source: &str,
    config: &ParserConfig,
) -> Result<ProtoFile, ParseError> {
    debug!(file = file_name, bytes = source.len(), "parsing");
    let mut cursor = Cursor::new(Lexer::new(source, config.doc_comments));
    let result = grammar::parse_file(&mut cursor, file_name);
    if let Err(e) = &result {
        debug!(file = file_name, error = %e, "parse failed");
    }
    result
}

/// Parse a UTF-8 byte buffer. A leading byte-order mark is skipped.
pub fn parse_bytes(file_name: &str, source: &[u8]) -> Result<ProtoFile, ParseError> {
    let source = source.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(source);
    let text = std::str::from_utf8(source).map_err(|e| {
        let valid = &source[..e.valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = valid.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&valid[line_start..]).chars().count() + 1;
        LexError {
            kind: LexErrorKind::InvalidUtf8,
            position: Position::new(line, column, e.valid_up_to()),
        }
    })?;
    parse(file_name, text)
}
