//! Component-value parsing for declaration values and at-rule preludes.

use crate::ast::{Node, NodeKind};
use crate::source::{matching_close, split_top_level, trim, Source};
use cascade_lexer::{Token, TokenKind};

/// Operators that never need whitespace around them.
const TIGHT_OPERATORS: &[&str] = &[",", "/", "*", ":", "="];

/// Parse a declaration value. Falls back to `Raw` when the tokens hold
/// something a component list cannot represent.
pub(crate) fn parse_value(source: &Source, tokens: &[Token]) -> Node {
    let tokens = trim(tokens);
    match parse_components(source, tokens) {
        Some(children) => source.node(NodeKind::Value { children }, tokens),
        None => source.raw(tokens),
    }
}

/// Parse an at-rule prelude. `None` when the prelude is empty.
pub(crate) fn parse_atrule_prelude(source: &Source, name: &str, tokens: &[Token]) -> Option<Node> {
    let tokens = trim(tokens);
    if tokens.is_empty() {
        return None;
    }

    let media = if name.eq_ignore_ascii_case("media") || name.eq_ignore_ascii_case("custom-media") {
        parse_media_query_list(source, tokens)
    } else {
        None
    };
    let children = match media {
        Some(list) => vec![list],
        None => parse_components(source, tokens).unwrap_or_else(|| vec![source.raw(tokens)]),
    };

    Some(source.node(NodeKind::AtrulePrelude { children }, tokens))
}

/// Parse a generic list of component values.
pub(crate) fn parse_components(source: &Source, tokens: &[Token]) -> Option<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let kind = match &token.kind {
            // A comment separates tokens like whitespace does.
            TokenKind::Whitespace | TokenKind::Comment(_) => NodeKind::WhiteSpace { value: " ".into() },
            TokenKind::Ident(name) => NodeKind::Identifier { name: name.clone() },
            TokenKind::Number(value) => NodeKind::Number {
                value: value.clone(),
            },
            TokenKind::Percentage(value) => NodeKind::Percentage {
                value: value.clone(),
            },
            TokenKind::Dimension { value, unit } => NodeKind::Dimension {
                value: value.clone(),
                unit: unit.clone(),
            },
            TokenKind::Hash(value) => NodeKind::Hash {
                value: value.clone(),
            },
            TokenKind::String(value) => NodeKind::String {
                value: value.clone(),
            },
            TokenKind::UnicodeRange(value) => NodeKind::UnicodeRange {
                value: value.clone(),
            },
            TokenKind::Url(raw) => NodeKind::Url {
                value: Box::new(source.token_node(NodeKind::Raw { value: raw.clone() }, token)),
            },
            TokenKind::Comma => NodeKind::Operator { value: ",".into() },
            TokenKind::Colon => NodeKind::Operator { value: ":".into() },
            TokenKind::Delim(c) => NodeKind::Operator {
                value: c.to_string(),
            },
            TokenKind::Function(_) | TokenKind::LParen | TokenKind::LBracket => {
                let close = matching_close(tokens, i)?;
                let group = &tokens[i..=close];
                nodes.push(parse_group(source, group)?);
                i = close + 1;
                continue;
            }
            TokenKind::Semicolon
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::AtKeyword(_)
            | TokenKind::Cdo
            | TokenKind::Cdc
            | TokenKind::Eof => return None,
        };
        nodes.push(source.token_node(kind, token));
        i += 1;
    }

    Some(normalize_whitespace(nodes))
}

/// Parse a function, parenthesized or bracketed group (opening through
/// closing token).
fn parse_group(source: &Source, group: &[Token]) -> Option<Node> {
    let (open, inner) = group.split_first()?;
    let inner = trim(inner.split_last()?.1);
    let children = parse_components(source, inner)?;

    let kind = match &open.kind {
        TokenKind::Function(name) if name.eq_ignore_ascii_case("url") && is_single_string(&children) => {
            let value = children.into_iter().next()?;
            NodeKind::Url {
                value: Box::new(value),
            }
        }
        TokenKind::Function(name) => NodeKind::Function {
            name: name.clone(),
            children,
        },
        TokenKind::LBracket => NodeKind::Brackets { children },
        _ => NodeKind::Parentheses { children },
    };
    Some(source.node(kind, group))
}

fn is_single_string(children: &[Node]) -> bool {
    matches!(children, [node] if matches!(node.kind, NodeKind::String { .. }))
}

fn is_whitespace(node: &Node) -> bool {
    matches!(node.kind, NodeKind::WhiteSpace { .. })
}

fn is_tight(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Operator { value } if TIGHT_OPERATORS.contains(&value.as_str()))
}

/// Collapse whitespace runs, and drop whitespace at the edges and next to
/// operators that do not need it.
fn normalize_whitespace(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut pending: Option<Node> = None;

    for node in nodes {
        if is_whitespace(&node) {
            let keep = out.last().is_some_and(|prev| !is_tight(prev));
            if keep && pending.is_none() {
                pending = Some(node);
            }
            continue;
        }
        if let Some(ws) = pending.take() {
            if !is_tight(&node) {
                out.push(ws);
            }
        }
        out.push(node);
    }

    out
}

// ---------------------------------------------------------------------------
// Media queries
// ---------------------------------------------------------------------------

/// `screen and (min-width: 100px), print` → `MediaQueryList`. `None` when
/// the prelude uses syntax outside the classic media query grammar.
fn parse_media_query_list(source: &Source, tokens: &[Token]) -> Option<Node> {
    let mut queries = Vec::new();
    for part in split_top_level(tokens, |k| matches!(k, TokenKind::Comma)) {
        let part = trim(part);
        if part.is_empty() {
            return None;
        }
        queries.push(parse_media_query(source, part)?);
    }
    Some(source.node(NodeKind::MediaQueryList { children: queries }, tokens))
}

fn parse_media_query(source: &Source, tokens: &[Token]) -> Option<Node> {
    let mut children: Vec<Node> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        match &token.kind {
            TokenKind::Whitespace | TokenKind::Comment(_) => {
                if children.last().is_some_and(|prev| !is_whitespace(prev)) {
                    children.push(source.token_node(NodeKind::WhiteSpace { value: " ".into() }, token));
                }
                i += 1;
            }
            TokenKind::Ident(name) => {
                children.push(source.token_node(NodeKind::Identifier { name: name.clone() }, token));
                i += 1;
            }
            TokenKind::LParen => {
                let close = matching_close(tokens, i)?;
                children.push(parse_media_feature(source, &tokens[i..=close])?);
                i = close + 1;
            }
            _ => return None,
        }
    }

    if children.last().is_some_and(is_whitespace) {
        children.pop();
    }
    Some(source.node(NodeKind::MediaQuery { children }, tokens))
}

/// `(name)` or `(name: value)`, parentheses included in `group`.
fn parse_media_feature(source: &Source, group: &[Token]) -> Option<Node> {
    let inner = trim(group.get(1..group.len().checked_sub(1)?)?);
    let (first, rest) = inner.split_first()?;
    let name = match &first.kind {
        TokenKind::Ident(name) => name.clone(),
        _ => return None,
    };

    let rest = trim(rest);
    let value = match rest.split_first() {
        None => None,
        Some((colon, value_tokens)) if colon.kind == TokenKind::Colon => {
            Some(Box::new(parse_media_feature_value(source, trim(value_tokens))?))
        }
        Some(_) => return None,
    };

    Some(source.node(NodeKind::MediaFeature { name, value }, group))
}

fn parse_media_feature_value(source: &Source, tokens: &[Token]) -> Option<Node> {
    let significant: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
    let kind = match significant.as_slice() {
        [left, slash, right] if slash.kind == TokenKind::Delim('/') => {
            match (&left.kind, &right.kind) {
                (TokenKind::Number(l), TokenKind::Number(r)) => NodeKind::Ratio {
                    left: l.clone(),
                    right: r.clone(),
                },
                _ => return None,
            }
        }
        [single] => match &single.kind {
            TokenKind::Number(value) => NodeKind::Number {
                value: value.clone(),
            },
            TokenKind::Dimension { value, unit } => NodeKind::Dimension {
                value: value.clone(),
                unit: unit.clone(),
            },
            TokenKind::Ident(name) => NodeKind::Identifier { name: name.clone() },
            _ => return None,
        },
        _ => return None,
    };
    Some(source.node(kind, tokens))
}
