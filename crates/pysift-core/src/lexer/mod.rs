//! Lexer for Python source code, scoped to import extraction
//!
//! The lexer converts source code into a stream of tokens, handling:
//! - The `import`, `from`, and `as` keywords and dotted identifiers
//! - String literals (single- and triple-quoted) so quoted text never
//!   masquerades as an import statement
//! - Comments and explicit line continuations
//! - Source location tracking
//!
//! Everything else in the language lexes as an undifferentiated `Other`
//! token; the parser skips past it.

mod span;
mod token;

pub use span::{LineIndex, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, and source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// The source text of the token
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexError {
    #[default]
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("unterminated string literal")]
    UnterminatedString,
}

/// A lexer error with location information
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// Tokenize Python source code.
///
/// # Errors
///
/// Returns the first lexical error encountered, with its span. A file
/// that cannot be tokenized cannot be searched for imports reliably.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SpannedError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(kind) => tokens.push(Token::new(kind, span, lexer.slice())),
            Err(error) => return Err(SpannedError { error, span }),
        }
    }

    Ok(tokens)
}
