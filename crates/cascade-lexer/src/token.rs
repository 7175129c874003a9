/// A region of source text.
///
/// `start`/`end` are character offsets (not bytes). Lines and columns are
/// 1-based; `end_line`/`end_column` point just past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Span {
    pub fn new(
        start: usize,
        end: usize,
        line: usize,
        column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start,
            end,
            line,
            column,
            end_line,
            end_column,
        }
    }
}

/// Token classification for CSS source.
///
/// Text-carrying variants hold the raw source spelling, so the parser can
/// reproduce vendor or unknown syntax without reformatting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Names
    Ident(String),
    /// `name(`: the name without the parenthesis.
    Function(String),
    /// `@name`: the name without the `@`.
    AtKeyword(String),
    /// `#name`: the name without the `#`.
    Hash(String),

    // Literals (raw spelling)
    /// Quoted string, quotes included.
    String(String),
    /// Contents of an unquoted `url(...)`, surrounding whitespace trimmed.
    Url(String),
    Number(String),
    /// Numeric part of `50%`.
    Percentage(String),
    Dimension { value: String, unit: String },
    UnicodeRange(String),

    // Trivia
    Whitespace,
    /// Text between `/*` and `*/`.
    Comment(String),
    Cdo, // <!--
    Cdc, // -->

    // Punctuation
    Colon,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,

    /// Any other single character (`>`, `+`, `~`, `*`, `.`, `!`, `/`, ...).
    Delim(char),

    // End of input
    Eof,
}

/// A token produced by the CSS lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment(_))
    }
}
