use std::fmt;

/// A location in the source text. Lines and columns are 1-based, `offset` is
/// the 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The character-level problem a [`LexError`] reports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("integer literal '{0}' is out of range")]
    IntegerOverflow(String),

    #[error("float literal '{0}' is out of range")]
    FloatOverflow(String),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("unexpected character '{0}'")]
    IllegalCharacter(char),

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// Malformed input at the character level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

/// The token stream does not match the production being parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found} at {position}")]
pub struct SyntaxError {
    pub position: Position,
    pub expected: String,
    pub found: String,
}

/// A well-formed declaration that breaks a structural rule of the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate tag {tag} in '{scope}' (used by '{first}' and '{second}')")]
    DuplicateTag {
        scope: String,
        tag: i64,
        first: String,
        second: String,
    },

    #[error("duplicate name '{name}' in '{scope}'")]
    DuplicateName { scope: String, name: String },

    #[error("tag {tag} of '{name}' is out of range 1..={max}")]
    TagOutOfRange { name: String, tag: i128, max: u32 },

    #[error("tag {tag} of '{name}' is in the reserved range 19000..=19999")]
    ReservedTag { name: String, tag: u32 },

    #[error("tag {tag} of '{name}' falls inside extension range {start} to {end}")]
    TagInExtensionRange {
        name: String,
        tag: u32,
        start: u32,
        end: u32,
    },

    #[error("enum value '{name}' = {tag} does not fit in a signed 32-bit integer")]
    EnumTagOutOfRange { name: String, tag: i128 },

    #[error("invalid extension range {start} to {end}")]
    InvalidExtensionRange { start: i128, end: i128 },

    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("package already declared as '{existing}'")]
    DuplicatePackage { existing: String },

    #[error("unsupported syntax '{0}', only \"proto2\" is accepted")]
    UnsupportedSyntax(String),
}

/// Top-level error returned by the parse entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{error} at {position}")]
    Validation {
        error: ValidationError,
        position: Position,
    },
}

impl ParseError {
    /// Where in the source the problem was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::Syntax(e) => e.position,
            ParseError::Validation { position, .. } => *position,
        }
    }

    pub(crate) fn validation(error: ValidationError, position: Position) -> Self {
        ParseError::Validation { error, position }
    }
}

/// Result type alias for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;
