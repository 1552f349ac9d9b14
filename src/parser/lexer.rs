use std::fmt;

use crate::config::DocCommentConfig;
use crate::error::{LexError, LexErrorKind, Position};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `;`
    Semi,
    /// `=`
    Eq,
    /// `,`
    Comma,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `:`
    Colon,
    /// An identifier or keyword, possibly dotted (`foo.Bar`, `.foo.Bar`).
    Ident(String),
    /// An integer literal in decimal, octal or hex form, sign applied.
    Int(i128),
    /// A floating point literal.
    Float(f64),
    /// A quoted string literal with escapes resolved. Octal and hex escapes
    /// may produce bytes that are not UTF-8, so the raw bytes are kept.
    Str(Vec<u8>),
    /// End of input
    Eof,
}

/// Reserved words of the grammar. They are lexed as identifiers so that
/// they stay usable as field and value names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Syntax,
    Package,
    Import,
    Public,
    Option,
    Message,
    Enum,
    Extend,
    Extensions,
    Service,
    Rpc,
    Returns,
    Required,
    Optional,
    Repeated,
    To,
    Max,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Syntax => "syntax",
            Keyword::Package => "package",
            Keyword::Import => "import",
            Keyword::Public => "public",
            Keyword::Option => "option",
            Keyword::Message => "message",
            Keyword::Enum => "enum",
            Keyword::Extend => "extend",
            Keyword::Extensions => "extensions",
            Keyword::Service => "service",
            Keyword::Rpc => "rpc",
            Keyword::Returns => "returns",
            Keyword::Required => "required",
            Keyword::Optional => "optional",
            Keyword::Repeated => "repeated",
            Keyword::To => "to",
            Keyword::Max => "max",
        }
    }

    fn from_ident(s: &str) -> Option<Keyword> {
        Some(match s {
            "syntax" => Keyword::Syntax,
            "package" => Keyword::Package,
            "import" => Keyword::Import,
            "public" => Keyword::Public,
            "option" => Keyword::Option,
            "message" => Keyword::Message,
            "enum" => Keyword::Enum,
            "extend" => Keyword::Extend,
            "extensions" => Keyword::Extensions,
            "service" => Keyword::Service,
            "rpc" => Keyword::Rpc,
            "returns" => Keyword::Returns,
            "required" => Keyword::Required,
            "optional" => Keyword::Optional,
            "repeated" => Keyword::Repeated,
            "to" => Keyword::To,
            "max" => Keyword::Max,
            _ => return None,
        })
    }
}

impl Token {
    /// The keyword this token spells, if it is an identifier matching one.
    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            Token::Ident(s) => Keyword::from_ident(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Semi => f.write_str("';'"),
            Token::Eq => f.write_str("'='"),
            Token::Comma => f.write_str("','"),
            Token::Lt => f.write_str("'<'"),
            Token::Gt => f.write_str("'>'"),
            Token::Colon => f.write_str("':'"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::Int(n) => write!(f, "integer {}", n),
            Token::Float(n) => write!(f, "float {}", n),
            Token::Str(s) => write!(f, "string \"{}\"", s.escape_ascii()),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its source location and any documentation comment that
/// immediately precedes it.
#[derive(Debug, Clone)]
pub struct Located {
    pub token: Token,
    pub position: Position,
    pub doc: Option<String>,
}

/// Tokenizer for `.proto` source text.
///
/// Implements `Iterator`, yielding tokens up to and including `Eof`.
pub struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    docs: DocCommentConfig,
    /// Whether a newline was crossed since the last emitted token.
    crossed_newline: bool,
    emitted_any: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, docs: DocCommentConfig) -> Self {
        Lexer {
            source,
            input: source.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            docs,
            crossed_newline: false,
            emitted_any: false,
            finished: false,
        }
    }

    fn current_position(&self) -> Position {
        let column = self.input[self.line_start..self.pos]
            .iter()
            .filter(|&&b| b & 0xC0 != 0x80)
            .count()
            + 1;
        Position::new(self.line, column, self.pos)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_byte_at(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(b)
    }

    fn error(&self, kind: LexErrorKind, position: Position) -> LexError {
        LexError { kind, position }
    }

    /// Skip whitespace and comments, returning the documentation collected
    /// for the token that follows.
    fn skip_whitespace_and_comments(&mut self) -> Result<Option<String>, LexError> {
        let mut docs: Vec<String> = Vec::new();
        // Newlines seen since the last comment (or since the previous token).
        let mut newlines = 0;

        loop {
            match self.peek_byte() {
                Some(b'\n') => {
                    self.advance();
                    self.crossed_newline = true;
                    newlines += 1;
                    if newlines >= 2 && self.docs.blank_line_detaches {
                        docs.clear();
                    }
                }
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(0x0b) | Some(0x0c) => {
                    self.advance();
                }
                Some(b'/') if self.peek_byte_at(1) == Some(b'/') => {
                    let trailing = self.emitted_any && !self.crossed_newline;
                    let start = self.pos + 2;
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                    if !trailing {
                        let text = normalize_line_comment(&self.source[start..self.pos]);
                        self.push_doc(&mut docs, text);
                    }
                    newlines = 0;
                }
                Some(b'/') if self.peek_byte_at(1) == Some(b'*') => {
                    let trailing = self.emitted_any && !self.crossed_newline;
                    let open = self.current_position();
                    self.advance();
                    self.advance();
                    let start = self.pos;
                    loop {
                        match self.peek_byte() {
                            None => {
                                return Err(self.error(LexErrorKind::UnterminatedComment, open))
                            }
                            Some(b'*') if self.peek_byte_at(1) == Some(b'/') => break,
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                    let end = self.pos;
                    self.advance();
                    self.advance();
                    if !trailing {
                        let text = normalize_block_comment(&self.source[start..end]);
                        self.push_doc(&mut docs, text);
                    }
                    newlines = 0;
                }
                _ => break,
            }
        }

        if docs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(docs.join("\n")))
        }
    }

    fn push_doc(&self, docs: &mut Vec<String>, text: String) {
        if !self.docs.join_consecutive {
            docs.clear();
        }
        docs.push(text);
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        // A leading '.' marks a fully-qualified reference.
        if self.peek_byte() == Some(b'.') {
            self.advance();
        }
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.advance();
            } else {
                break;
            }
        }
        self.source[start..self.pos].to_string()
    }

    fn read_number(&mut self, position: Position) -> Result<Token, LexError> {
        let start = self.pos;
        let negative = self.peek_byte() == Some(b'-');
        if negative {
            self.advance();
        }
        let digits_start = self.pos;

        if self.peek_byte() == Some(b'0') && matches!(self.peek_byte_at(1), Some(b'x' | b'X')) {
            self.advance();
            self.advance();
            let hex_start = self.pos;
            while matches!(self.peek_byte(), Some(b) if b.is_ascii_hexdigit()) {
                self.advance();
            }
            let hex = &self.source[hex_start..self.pos];
            self.reject_trailing_ident_chars(start, position)?;
            if hex.is_empty() {
                return Err(self.error(
                    LexErrorKind::MalformedNumber(self.source[start..self.pos].to_string()),
                    position,
                ));
            }
            return self.integer(start, hex, 16, negative, position);
        }

        let mut is_float = false;
        while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
            self.advance();
        }
        if self.peek_byte() == Some(b'.') {
            is_float = true;
            self.advance();
            while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            let exponent_ok = match self.peek_byte_at(1) {
                Some(b'+' | b'-') => matches!(self.peek_byte_at(2), Some(b) if b.is_ascii_digit()),
                Some(b) => b.is_ascii_digit(),
                None => false,
            };
            if exponent_ok {
                is_float = true;
                self.advance();
                if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                    self.advance();
                }
                while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        self.reject_trailing_ident_chars(start, position)?;

        let text = &self.source[start..self.pos];
        if is_float {
            let value = text.parse::<f64>().map_err(|_| {
                self.error(LexErrorKind::MalformedNumber(text.to_string()), position)
            })?;
            if !value.is_finite() {
                return Err(self.error(LexErrorKind::FloatOverflow(text.to_string()), position));
            }
            return Ok(Token::Float(value));
        }

        let digits = &self.source[digits_start..self.pos];
        if digits.len() > 1 && digits.starts_with('0') {
            self.integer(start, &digits[1..], 8, negative, position)
        } else {
            self.integer(start, digits, 10, negative, position)
        }
    }

    fn reject_trailing_ident_chars(&mut self, start: usize, position: Position) -> Result<(), LexError> {
        if matches!(self.peek_byte(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            while matches!(self.peek_byte(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'.') {
                self.advance();
            }
            return Err(self.error(
                LexErrorKind::MalformedNumber(self.source[start..self.pos].to_string()),
                position,
            ));
        }
        Ok(())
    }

    fn integer(
        &self,
        start: usize,
        digits: &str,
        radix: u32,
        negative: bool,
        position: Position,
    ) -> Result<Token, LexError> {
        let text = &self.source[start..self.pos];
        let magnitude = u64::from_str_radix(digits, radix).map_err(|e| {
            use std::num::IntErrorKind;
            let kind = match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    LexErrorKind::IntegerOverflow(text.to_string())
                }
                _ => LexErrorKind::MalformedNumber(text.to_string()),
            };
            self.error(kind, position)
        })?;
        let value = magnitude as i128;
        Ok(Token::Int(if negative { -value } else { value }))
    }

    fn read_string(&mut self, position: Position) -> Result<Token, LexError> {
        let quote = self.advance();
        let mut buf: Vec<u8> = Vec::new();
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    return Err(self.error(LexErrorKind::UnterminatedString, position));
                }
                Some(b) if Some(b) == quote => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    let escape_pos = self.current_position();
                    self.advance();
                    self.read_escape(&mut buf, escape_pos)?;
                }
                Some(b) => {
                    self.advance();
                    buf.push(b);
                }
            }
        }
        Ok(Token::Str(buf))
    }

    fn read_escape(&mut self, buf: &mut Vec<u8>, position: Position) -> Result<(), LexError> {
        let Some(b) = self.advance() else {
            return Err(self.error(LexErrorKind::UnterminatedString, position));
        };
        let byte = match b {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            b'\\' | b'\'' | b'"' | b'?' => b,
            b'x' | b'X' => {
                let mut value: u32 = 0;
                let mut count = 0;
                while count < 2 {
                    match self.peek_byte() {
                        Some(h) if h.is_ascii_hexdigit() => {
                            self.advance();
                            value = value * 16 + (h as char).to_digit(16).unwrap_or(0);
                            count += 1;
                        }
                        _ => break,
                    }
                }
                if count == 0 {
                    return Err(self.error(LexErrorKind::InvalidEscape(b as char), position));
                }
                value as u8
            }
            b'0'..=b'7' => {
                let mut value: u32 = (b - b'0') as u32;
                let mut count = 1;
                while count < 3 {
                    match self.peek_byte() {
                        Some(o @ b'0'..=b'7') => {
                            self.advance();
                            value = value * 8 + (o - b'0') as u32;
                            count += 1;
                        }
                        _ => break,
                    }
                }
                if value > 0xff {
                    return Err(self.error(LexErrorKind::InvalidEscape(b as char), position));
                }
                value as u8
            }
            other => {
                let c = if other.is_ascii() {
                    other as char
                } else {
                    self.source[self.pos - 1..].chars().next().unwrap_or('?')
                };
                return Err(self.error(LexErrorKind::InvalidEscape(c), position));
            }
        };
        buf.push(byte);
        Ok(())
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Result<Located, LexError> {
        let doc = self.skip_whitespace_and_comments()?;
        let position = self.current_position();

        let token = match self.peek_byte() {
            None => Token::Eof,
            Some(b) => match b {
                b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';' | b'=' | b',' | b'<' | b'>' | b':' => {
                    self.advance();
                    match b {
                        b'{' => Token::LBrace,
                        b'}' => Token::RBrace,
                        b'(' => Token::LParen,
                        b')' => Token::RParen,
                        b'[' => Token::LBracket,
                        b']' => Token::RBracket,
                        b';' => Token::Semi,
                        b'=' => Token::Eq,
                        b',' => Token::Comma,
                        b'<' => Token::Lt,
                        b'>' => Token::Gt,
                        _ => Token::Colon,
                    }
                }
                b'"' | b'\'' => self.read_string(position)?,
                b if b.is_ascii_alphabetic() || b == b'_' => Token::Ident(self.read_ident()),
                b'.' if matches!(self.peek_byte_at(1), Some(c) if c.is_ascii_alphabetic() || c == b'_') => {
                    Token::Ident(self.read_ident())
                }
                b'.' if matches!(self.peek_byte_at(1), Some(c) if c.is_ascii_digit()) => {
                    self.read_number(position)?
                }
                b if b.is_ascii_digit() => self.read_number(position)?,
                b'-' if matches!(self.peek_byte_at(1), Some(c) if c.is_ascii_digit() || c == b'.') => {
                    self.read_number(position)?
                }
                b'-' if matches!(self.peek_byte_at(1), Some(c) if c.is_ascii_alphabetic()) => {
                    // Only `-inf` and `-nan` are meaningful after a minus sign.
                    self.advance();
                    let ident = self.read_ident();
                    if ident == "inf" || ident == "nan" {
                        Token::Ident(format!("-{}", ident))
                    } else {
                        return Err(self.error(LexErrorKind::IllegalCharacter('-'), position));
                    }
                }
                _ => {
                    let c = self.source[self.pos..].chars().next().unwrap_or('\u{fffd}');
                    return Err(self.error(LexErrorKind::IllegalCharacter(c), position));
                }
            },
        };

        self.emitted_any = true;
        self.crossed_newline = false;
        Ok(Located {
            token,
            position,
            doc,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Located, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if !matches!(result, Ok(Located { token: Token::Eof, .. })) && result.is_ok() {
            return Some(result);
        }
        self.finished = true;
        Some(result)
    }
}

fn normalize_line_comment(text: &str) -> String {
    let text = text.trim_start_matches('/');
    text.strip_prefix(' ').unwrap_or(text).trim_end().to_string()
}

fn normalize_block_comment(text: &str) -> String {
    let text = text.strip_prefix('*').unwrap_or(text);
    let lines: Vec<&str> = text
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input, DocCommentConfig::default())
            .map(|t| t.unwrap().token)
            .collect()
    }

    fn docs(input: &str, config: DocCommentConfig) -> Vec<Option<String>> {
        Lexer::new(input, config).map(|t| t.unwrap().doc).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            tokens("message Person { optional int32 id = 1; }"),
            vec![
                Token::Ident("message".into()),
                Token::Ident("Person".into()),
                Token::LBrace,
                Token::Ident("optional".into()),
                Token::Ident("int32".into()),
                Token::Ident("id".into()),
                Token::Eq,
                Token::Int(1),
                Token::Semi,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(Token::Ident("message".into()).keyword(), Some(Keyword::Message));
        assert_eq!(Token::Ident("Message".into()).keyword(), None);
        assert_eq!(Token::Int(3).keyword(), None);
    }

    #[test]
    fn test_dotted_identifiers() {
        assert_eq!(
            tokens("foo.bar.Baz .fq.Type"),
            vec![
                Token::Ident("foo.bar.Baz".into()),
                Token::Ident(".fq.Type".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_forms() {
        assert_eq!(
            tokens("10 0x1F 017 -5 0"),
            vec![
                Token::Int(10),
                Token::Int(31),
                Token::Int(15),
                Token::Int(-5),
                Token::Int(0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(
            tokens("1.5 1e3 -2.5E-1 .25"),
            vec![
                Token::Float(1.5),
                Token::Float(1000.0),
                Token::Float(-0.25),
                Token::Float(0.25),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_negative_inf() {
        assert_eq!(tokens("-inf"), vec![Token::Ident("-inf".into()), Token::Eof]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""a\"b\n\x41\101" 'single'"#),
            vec![
                Token::Str(b"a\"b\nAA".to_vec()),
                Token::Str(b"single".to_vec()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens("// line\n/* block\n comment */ message"),
            vec![Token::Ident("message".into()), Token::Eof]
        );
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut lex = Lexer::new("a\n  b\n\tc", DocCommentConfig::default());
        let a = lex.next_token().unwrap();
        assert_eq!((a.position.line, a.position.column), (1, 1));
        let b = lex.next_token().unwrap();
        assert_eq!((b.position.line, b.position.column), (2, 3));
        let c = lex.next_token().unwrap();
        assert_eq!((c.position.line, c.position.column), (3, 2));
        assert_eq!(c.position.offset, 7);
    }

    #[test]
    fn test_leading_doc_attached() {
        let d = docs("// Doc line\nmessage", DocCommentConfig::default());
        assert_eq!(d[0].as_deref(), Some("Doc line"));
    }

    #[test]
    fn test_blank_line_detaches_doc() {
        let d = docs("// Detached\n\nmessage", DocCommentConfig::default());
        assert_eq!(d[0], None);

        let keep = DocCommentConfig {
            blank_line_detaches: false,
            ..Default::default()
        };
        let d = docs("// Kept\n\nmessage", keep);
        assert_eq!(d[0].as_deref(), Some("Kept"));
    }

    #[test]
    fn test_consecutive_comments() {
        let d = docs("// one\n// two\nmessage", DocCommentConfig::default());
        assert_eq!(d[0].as_deref(), Some("one\ntwo"));

        let last_only = DocCommentConfig {
            join_consecutive: false,
            ..Default::default()
        };
        let d = docs("// one\n// two\nmessage", last_only);
        assert_eq!(d[0].as_deref(), Some("two"));
    }

    #[test]
    fn test_trailing_comment_not_attached_forward() {
        let d = docs("a; // trailing\nb", DocCommentConfig::default());
        assert_eq!(d, vec![None, None, None, None]);
    }

    #[test]
    fn test_block_comment_doc() {
        let d = docs("/**\n * First\n * Second\n */\nmessage", DocCommentConfig::default());
        assert_eq!(d[0].as_deref(), Some("First\nSecond"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abc\n", DocCommentConfig::default())
            .next_token()
            .unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.position, Position::new(1, 1, 0));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("x /* never closed", DocCommentConfig::default())
            .nth(1)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.position.column, 3);
    }

    #[test]
    fn test_illegal_character() {
        let err = Lexer::new("message @", DocCommentConfig::default())
            .nth(1)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind, LexErrorKind::IllegalCharacter('@'));
    }

    #[test]
    fn test_invalid_escape() {
        let err = Lexer::new(r#""\q""#, DocCommentConfig::default())
            .next_token()
            .unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidEscape('q'));
    }

    #[test]
    fn test_integer_overflow() {
        let err = Lexer::new("99999999999999999999", DocCommentConfig::default())
            .next_token()
            .unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::IntegerOverflow(_)));
    }

    #[test]
    fn test_malformed_number() {
        let err = Lexer::new("12abc", DocCommentConfig::default())
            .next_token()
            .unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::MalformedNumber(_)));
        let err = Lexer::new("09", DocCommentConfig::default())
            .next_token()
            .unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::MalformedNumber(_)));
    }

    #[test]
    fn test_escaped_bytes_are_kept() {
        assert_eq!(
            tokens(r#""\377\001" "\376\001" "\303\251""#),
            vec![
                Token::Str(vec![0xff, 0x01]),
                Token::Str(vec![0xfe, 0x01]),
                Token::Str("\u{e9}".as_bytes().to_vec()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_float_overflow() {
        let err = Lexer::new("1e400", DocCommentConfig::default())
            .next_token()
            .unwrap_err();
        assert_eq!(err.kind, LexErrorKind::FloatOverflow("1e400".into()));
        assert_eq!(tokens("1e300"), vec![Token::Float(1e300), Token::Eof]);
    }

    #[test]
    fn test_positions_through_iterator() {
        let positions: Vec<(usize, usize)> = Lexer::new("message M {
  /* c */ x;
}", DocCommentConfig::default())
            .map(|t| {
                let p = t.unwrap().position;
                (p.line, p.column)
            })
            .collect();
        assert_eq!(positions, vec![(1, 1), (1, 9), (1, 11), (2, 11), (2, 12), (3, 1), (3, 2)]);
    }
}
