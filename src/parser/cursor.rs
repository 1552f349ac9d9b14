//! Token cursor over the lexer with one token of lookahead.

use tracing::trace;

use super::lexer::{Keyword, Lexer, Located, Token};
use crate::error::{ParseError, Position, SyntaxError};

/// Deepest nesting of messages and option literals accepted.
pub const MAX_NESTING_DEPTH: usize = 100;

pub struct Cursor<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Located>,
    depth: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Cursor {
            lexer,
            peeked: None,
            depth: 0,
        }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Located, ParseError> {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(tok))
    }

    /// Consume the next token.
    pub fn next(&mut self) -> Result<Located, ParseError> {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        trace!(line = tok.position.line, column = tok.position.column, token = %tok.token, "consume");
        Ok(tok)
    }

    /// Enter a nested block opened by `at`. Fails once the nesting limit is
    /// reached so hostile input cannot exhaust the stack.
    pub fn descend(&mut self, at: &Located) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(unexpected(
                at,
                format!("at most {} levels of nesting", MAX_NESTING_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Position of the next token.
    pub fn position(&mut self) -> Result<Position, ParseError> {
        Ok(self.peek()?.position)
    }

    pub fn at(&mut self, expected: &Token) -> Result<bool, ParseError> {
        Ok(&self.peek()?.token == expected)
    }

    pub fn at_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        Ok(self.peek()?.token.keyword() == Some(keyword))
    }

    /// Consume the next token if it equals `expected`.
    pub fn eat(&mut self, expected: &Token) -> Result<bool, ParseError> {
        if self.at(expected)? {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        if self.at_keyword(keyword)? {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn expect(&mut self, expected: Token) -> Result<Located, ParseError> {
        let tok = self.next()?;
        if tok.token == expected {
            Ok(tok)
        } else {
            Err(unexpected(&tok, expected.to_string()))
        }
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<Located, ParseError> {
        let tok = self.next()?;
        if tok.token.keyword() == Some(keyword) {
            Ok(tok)
        } else {
            Err(unexpected(&tok, format!("'{}'", keyword.as_str())))
        }
    }

    /// Consume an identifier, returning its text.
    pub fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        let tok = self.next()?;
        match tok.token {
            Token::Ident(name) => Ok(name),
            _ => Err(unexpected(&tok, what.to_string())),
        }
    }

    /// Consume an undotted identifier naming a declaration.
    pub fn expect_name(&mut self, what: &str) -> Result<String, ParseError> {
        let tok = self.next()?;
        match tok.token {
            Token::Ident(name) if !name.contains('.') && !name.starts_with('-') => Ok(name),
            _ => Err(unexpected(&tok, what.to_string())),
        }
    }

    /// Consume an integer literal.
    pub fn expect_int(&mut self, what: &str) -> Result<i128, ParseError> {
        let tok = self.next()?;
        match tok.token {
            Token::Int(n) => Ok(n),
            _ => Err(unexpected(&tok, what.to_string())),
        }
    }

    /// Consume one or more adjacent string literals, concatenated, as raw
    /// bytes.
    pub fn expect_string_bytes(&mut self, what: &str) -> Result<Vec<u8>, ParseError> {
        let tok = self.next()?;
        let Token::Str(mut value) = tok.token else {
            return Err(unexpected(&tok, what.to_string()));
        };
        while let Token::Str(_) = self.peek()?.token {
            if let Token::Str(more) = self.next()?.token {
                value.extend_from_slice(&more);
            }
        }
        Ok(value)
    }

    /// Like [`Cursor::expect_string_bytes`], for literals that must be text.
    pub fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        let position = self.position()?;
        let bytes = self.expect_string_bytes(what)?;
        String::from_utf8(bytes).map_err(|e| {
            ParseError::Syntax(SyntaxError {
                position,
                expected: format!("{} as UTF-8 text", what),
                found: format!("string \"{}\"", e.as_bytes().escape_ascii()),
            })
        })
    }
}

/// Build the error for a token that does not fit the current production.
pub fn unexpected(tok: &Located, expected: impl Into<String>) -> ParseError {
    ParseError::Syntax(SyntaxError {
        position: tok.position,
        expected: expected.into(),
        found: tok.token.to_string(),
    })
}
