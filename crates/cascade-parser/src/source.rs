//! Shared helpers for the sub-parsers: source text access, location
//! building, and token-slice utilities.

use crate::ast::{Location, Node, NodeKind, Position};
use crate::parser::ParseOptions;
use cascade_lexer::{Span, Token, TokenKind};

/// Source name used when positions are recorded without a filename.
pub const UNKNOWN_SOURCE: &str = "<unknown>";

/// The text being parsed plus the location policy.
pub(crate) struct Source {
    chars: Vec<char>,
    /// `Some` only when positions are recorded.
    source_name: Option<String>,
}

impl Source {
    pub(crate) fn new(text: &str, options: &ParseOptions) -> Self {
        let source_name = options.positions.then(|| {
            options
                .filename
                .clone()
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
        });
        Self {
            chars: text.chars().collect(),
            source_name,
        }
    }

    /// Original spelling of a token run.
    pub(crate) fn text(&self, tokens: &[Token]) -> String {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => self
                .chars
                .get(first.span.start..last.span.end)
                .map(|chars| chars.iter().collect())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Location covering `first` through `last`, if positions are recorded.
    pub(crate) fn location(&self, first: &Span, last: &Span) -> Option<Location> {
        let source_name = self.source_name.as_ref()?;
        Some(Location {
            source_name: source_name.clone(),
            start: Position::new(first.line, first.column, first.start),
            end: Position::new(last.end_line, last.end_column, last.end),
        })
    }

    /// Build a node located over a token run (no location for an empty run).
    pub(crate) fn node(&self, kind: NodeKind, tokens: &[Token]) -> Node {
        let location = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => self.location(&first.span, &last.span),
            _ => None,
        };
        Node::with_location(kind, location)
    }

    /// Build a node located over a single token.
    pub(crate) fn token_node(&self, kind: NodeKind, token: &Token) -> Node {
        Node::with_location(kind, self.location(&token.span, &token.span))
    }

    /// A `Raw` node holding the original text of a token run.
    pub(crate) fn raw(&self, tokens: &[Token]) -> Node {
        self.node(
            NodeKind::Raw {
                value: self.text(tokens),
            },
            tokens,
        )
    }
}

/// Strip leading and trailing whitespace/comment tokens.
pub(crate) fn trim(tokens: &[Token]) -> &[Token] {
    let start = tokens
        .iter()
        .position(|t| !t.is_trivia())
        .unwrap_or(tokens.len());
    let end = tokens
        .iter()
        .rposition(|t| !t.is_trivia())
        .map_or(start, |i| i + 1);
    &tokens[start..end]
}

pub(crate) fn is_opener(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Function(_) | TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
    )
}

pub(crate) fn is_closer(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
    )
}

/// Split a token run on separators found at nesting depth 0.
pub(crate) fn split_top_level(
    tokens: &[Token],
    is_separator: impl Fn(&TokenKind) -> bool,
) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if is_opener(&token.kind) {
            depth += 1;
        } else if is_closer(&token.kind) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && is_separator(&token.kind) {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Index of the token closing the group opened at `open`.
pub(crate) fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if is_opener(&token.kind) {
            depth += 1;
        } else if is_closer(&token.kind) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_lexer::Scanner;
    use pretty_assertions::assert_eq;

    fn toks(source: &str) -> Vec<Token> {
        let mut tokens = Scanner::tokenize(source).unwrap();
        tokens.pop(); // EOF
        tokens
    }

    #[test]
    fn test_trim() {
        let tokens = toks("  /* c */ a b ");
        let trimmed = trim(&tokens);
        assert_eq!(trimmed.len(), 3);
        assert_eq!(trimmed[0].kind, TokenKind::Ident("a".into()));
    }

    #[test]
    fn test_trim_all_trivia() {
        let tokens = toks("  /* c */ ");
        assert!(trim(&tokens).is_empty());
    }

    #[test]
    fn test_split_ignores_nested_commas() {
        let tokens = toks("a,f(b,c),d");
        let parts = split_top_level(&tokens, |k| matches!(k, TokenKind::Comma));
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 5);
    }

    #[test]
    fn test_matching_close() {
        let tokens = toks("(a (b)c)d");
        assert_eq!(matching_close(&tokens, 0), Some(7));
        assert_eq!(matching_close(&tokens, 3), Some(5));
    }

    #[test]
    fn test_matching_close_unbalanced() {
        let tokens = toks("(a");
        assert_eq!(matching_close(&tokens, 0), None);
    }

    #[test]
    fn test_text_and_location() {
        let options = ParseOptions {
            filename: Some("a.css".into()),
            positions: true,
        };
        let source = Source::new("x  yz", &options);
        let tokens = toks("x  yz");
        assert_eq!(source.text(&tokens), "x  yz");

        let node = source.node(NodeKind::Raw { value: "yz".into() }, &tokens[2..]);
        let location = node.location.unwrap();
        assert_eq!(location.source_name, "a.css");
        assert_eq!(location.start, Position::new(1, 4, 3));
        assert_eq!(location.end, Position::new(1, 6, 5));
    }

    #[test]
    fn test_no_location_without_positions() {
        let source = Source::new("x", &ParseOptions::default());
        let tokens = toks("x");
        assert!(source.token_node(NodeKind::Cdo, &tokens[0]).location.is_none());
    }
}
