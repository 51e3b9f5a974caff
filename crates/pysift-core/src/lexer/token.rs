//! Token types for the pysift Python lexer

use super::LexError;
use logos::{Lexer, Logos};

/// Scan the body of a triple-quoted string, including the closing delimiter.
///
/// A backslash escapes the following character, so an escaped quote never
/// terminates the string. The opening delimiter has already been consumed.
fn scan_triple(lex: &mut Lexer<'_, TokenKind>, quote: u8) -> Result<(), LexError> {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i] == quote
            && i + 2 < bytes.len()
            && bytes[i + 1] == quote
            && bytes[i + 2] == quote
        {
            lex.bump(i + 3);
            return Ok(());
        } else {
            i += 1;
        }
    }
    Err(LexError::UnterminatedString)
}

fn unterminated(_: &mut Lexer<'_, TokenKind>) -> Result<(), LexError> {
    Err(LexError::UnterminatedString)
}

/// The kind of token produced by the lexer
///
/// Only the tokens that matter for import extraction are distinguished;
/// everything else Python can contain lexes as `Str` or `Other` so the
/// token stream stays synchronized across string literals and comments.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\x0c]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"\\\r?\n")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("import")]
    Import,
    #[token("from")]
    From,
    #[token("as")]
    As,

    // ========== Identifiers ==========
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // ========== Punctuation ==========
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("*")]
    Star,
    #[token(";")]
    Semi,
    #[token("\n")]
    Newline,

    // ========== Literals ==========
    /// String literal (single- or triple-quoted; prefixes like `r"..."`
    /// lex as an identifier followed by the string)
    #[token("\"\"\"", |lex| scan_triple(lex, b'"'))]
    #[token("'''", |lex| scan_triple(lex, b'\''))]
    #[regex(r#""([^"\\\n]|\\[^\n]|\\\r?\n)*""#)]
    #[regex(r"'([^'\\\n]|\\[^\n]|\\\r?\n)*'")]
    #[regex(r#""([^"\\\n]|\\[^\n]|\\\r?\n)*"#, unterminated)]
    #[regex(r"'([^'\\\n]|\\[^\n]|\\\r?\n)*", unterminated)]
    Str,

    /// Any other character (operators, digits, brackets, ...)
    #[regex(r".", priority = 0)]
    Other,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Import => "'import'",
            Self::From => "'from'",
            Self::As => "'as'",
            Self::Ident => "identifier",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Star => "'*'",
            Self::Semi => "';'",
            Self::Newline => "newline",
            Self::Str => "string literal",
            Self::Other => "token",
        };
        write!(f, "{name}")
    }
}
