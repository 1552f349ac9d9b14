//! Parser configuration.

/// Controls which comments become the documentation of a declaration.
///
/// A comment that starts on the same line as the preceding token is always
/// treated as trailing and never attaches forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocCommentConfig {
    /// A blank line between a comment and the next declaration detaches the
    /// comment.
    pub blank_line_detaches: bool,
    /// Consecutive comments are joined with `\n`. When `false` only the
    /// comment closest to the declaration is kept.
    pub join_consecutive: bool,
}

impl Default for DocCommentConfig {
    fn default() -> Self {
        DocCommentConfig {
            blank_line_detaches: true,
            join_consecutive: true,
        }
    }
}

/// Options for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    pub doc_comments: DocCommentConfig,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blank_line_detaches(mut self, detaches: bool) -> Self {
        self.doc_comments.blank_line_detaches = detaches;
        self
    }

    pub fn with_join_consecutive(mut self, join: bool) -> Self {
        self.doc_comments.join_consecutive = join;
        self
    }
}
