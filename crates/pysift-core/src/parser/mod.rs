//! Parser for Python import statements
//!
//! Walks the token stream and builds an AST of the import statements only.
//! Every other statement is skipped token by token. `import` is a reserved
//! word that appears nowhere else in the grammar, so any occurrence starts
//! an import statement; `from` also occurs mid-statement (`yield from`,
//! `raise ... from`), so a from-import is only recognized when the keyword
//! sits at a statement start. This finds imports at any nesting depth
//! (inside functions, `try` blocks, one-line compound statements) the same
//! way an AST walk would.

mod error;

pub use error::{ParseError, ParseErrorKind};

use crate::lexer::{tokenize, Span, Token, TokenKind};

/// A dotted module path such as `os.path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedName {
    /// The path segments, in order
    pub segments: Vec<String>,
    /// The span covering the full path
    pub span: Span,
}

impl DottedName {
    /// The top-level module: the first segment of the path.
    ///
    /// `a.b.c` refers to the installable unit `a`; sub-paths never name
    /// a separately installable package.
    #[must_use]
    pub fn top_level(&self) -> &str {
        &self.segments[0]
    }

    /// The full dotted path as written.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl std::fmt::Display for DottedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// A parsed import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStmt {
    /// `import a.b as c, d`
    Import {
        /// The modules named, aliases dropped
        names: Vec<DottedName>,
    },

    /// `from a.b import x, y` or `from . import x`
    FromImport {
        /// Number of leading dots (0 for absolute imports)
        level: u32,
        /// The module path, absent for pure relative imports
        module: Option<DottedName>,
    },
}

impl ImportStmt {
    /// The external module paths this statement references.
    ///
    /// Relative from-imports resolve within the scanned package itself and
    /// reference nothing installable.
    pub fn referenced(&self) -> impl Iterator<Item = &DottedName> {
        let names: Vec<&DottedName> = match self {
            Self::Import { names } => names.iter().collect(),
            Self::FromImport { level: 0, module } => module.iter().collect(),
            Self::FromImport { .. } => Vec::new(),
        };
        names.into_iter()
    }
}

/// Parse all import statements out of Python source code.
///
/// # Errors
///
/// Returns an error if the source cannot be tokenized or an import
/// statement is malformed. Callers treat a failed file as skippable.
pub fn parse_imports(source: &str) -> Result<Vec<ImportStmt>, ParseError> {
    let tokens = tokenize(source)
        .map_err(|e| ParseError::new(ParseErrorKind::Lex(e.error), e.span))?;
    let eof = Span::from_range(source.len()..source.len());
    Parser { tokens, pos: 0, eof }.run()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: Span,
}

impl Parser {
    fn run(mut self) -> Result<Vec<ImportStmt>, ParseError> {
        let mut stmts = Vec::new();

        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Import => stmts.push(self.import_stmt()?),
                TokenKind::From if self.at_statement_start() => {
                    stmts.push(self.from_import_stmt()?);
                }
                _ => self.pos += 1,
            }
        }

        Ok(stmts)
    }

    /// Whether the current token begins a statement: start of file, after
    /// a `\n` or `;` separator, or after the `:` of a compound-statement
    /// header (`if ok: from x import y`). `yield from` and `raise ... from`
    /// never put `from` in this position.
    fn at_statement_start(&self) -> bool {
        match self.tokens[..self.pos].last() {
            None => true,
            Some(token) => {
                matches!(token.kind, TokenKind::Newline | TokenKind::Semi)
                    || (token.kind == TokenKind::Other && token.lexeme == ":")
            }
        }
    }

    /// `import a.b as c, d.e` (the `import` token is current)
    fn import_stmt(&mut self) -> Result<ImportStmt, ParseError> {
        self.pos += 1;
        let mut names = vec![self.dotted_name()?];
        self.alias()?;

        while self.eat(TokenKind::Comma) {
            names.push(self.dotted_name()?);
            self.alias()?;
        }

        Ok(ImportStmt::Import { names })
    }

    /// `from .a.b import x as y, (z)` (the `from` token is current)
    fn from_import_stmt(&mut self) -> Result<ImportStmt, ParseError> {
        self.pos += 1;

        let mut level = 0u32;
        while self.eat(TokenKind::Dot) {
            level += 1;
        }

        let module = if self.peek() == Some(TokenKind::Ident) {
            Some(self.dotted_name()?)
        } else {
            None
        };

        if level == 0 && module.is_none() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedModuleName,
                self.current_span(),
            ));
        }

        if !self.eat(TokenKind::Import) {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedImport,
                self.current_span(),
            ));
        }

        // The imported names are irrelevant; consume them to stay in sync.
        if self.eat(TokenKind::LParen) {
            // Newlines are allowed inside the parenthesized list
            loop {
                match self.peek() {
                    Some(TokenKind::RParen) => {
                        self.pos += 1;
                        break;
                    }
                    Some(_) => self.pos += 1,
                    None => {
                        return Err(ParseError::new(ParseErrorKind::UnexpectedEof, self.eof));
                    }
                }
            }
        } else {
            while let Some(kind) = self.peek() {
                if matches!(kind, TokenKind::Newline | TokenKind::Semi) {
                    break;
                }
                self.pos += 1;
            }
        }

        Ok(ImportStmt::FromImport { level, module })
    }

    /// `a.b.c`
    fn dotted_name(&mut self) -> Result<DottedName, ParseError> {
        let first = self.expect_ident()?;
        let mut span = first.span;
        let mut segments = vec![first.lexeme];

        while self.peek() == Some(TokenKind::Dot) {
            self.pos += 1;
            let seg = self.expect_ident()?;
            span = span.merge(seg.span);
            segments.push(seg.lexeme);
        }

        Ok(DottedName { segments, span })
    }

    /// Optional `as <ident>`; the alias itself is discarded
    fn alias(&mut self) -> Result<(), ParseError> {
        if self.eat(TokenKind::As) {
            self.expect_ident()?;
        }
        Ok(())
    }

    fn expect_ident(&mut self) -> Result<Token, ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Ident => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    found: token.kind,
                    expected: "identifier",
                },
                token.span,
            )),
            None => Err(ParseError::new(ParseErrorKind::UnexpectedEof, self.eof)),
        }
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.eof, |t| t.span)
    }
}
