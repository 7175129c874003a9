//! Selector parsing: selector lists, compound selectors, combinators,
//! attribute selectors, pseudo-classes and `An+B` arguments.
//!
//! Every function returns `None` on syntax it does not model; callers fall
//! back to a `Raw` node so the original text is preserved.

use crate::ast::{Node, NodeKind};
use crate::source::{matching_close, split_top_level, trim, Source};
use cascade_lexer::{Token, TokenKind};

/// Pseudo-classes and pseudo-elements whose argument is a selector list.
const SELECTOR_ARGUMENT_PSEUDOS: &[&str] = &[
    "not",
    "is",
    "where",
    "matches",
    "has",
    "-moz-any",
    "-webkit-any",
    "host",
    "host-context",
    "slotted",
    "cue",
    "current",
    "past",
    "future",
];

/// Pseudo-classes whose argument is `An+B [of <selector-list>]`.
const NTH_PSEUDOS: &[&str] = &[
    "nth-child",
    "nth-last-child",
    "nth-of-type",
    "nth-last-of-type",
    "nth-col",
    "nth-last-col",
];

/// Parse a qualified rule prelude, falling back to `Raw` (keyframe
/// selectors such as `50%`, namespaces, malformed selectors).
pub(crate) fn parse_rule_prelude(source: &Source, tokens: &[Token]) -> Node {
    let tokens = trim(tokens);
    parse_selector_list(source, tokens).unwrap_or_else(|| source.raw(tokens))
}

pub(crate) fn parse_selector_list(source: &Source, tokens: &[Token]) -> Option<Node> {
    let tokens = trim(tokens);
    let mut selectors = Vec::new();
    for part in split_top_level(tokens, |k| matches!(k, TokenKind::Comma)) {
        let part = trim(part);
        if part.is_empty() {
            return None;
        }
        selectors.push(parse_selector(source, part)?);
    }
    Some(source.node(NodeKind::SelectorList { children: selectors }, tokens))
}

fn is_combinator(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Combinator { .. })
}

/// Parse one complex selector (`a > b .c:hover`).
fn parse_selector(source: &Source, tokens: &[Token]) -> Option<Node> {
    let mut children: Vec<Node> = Vec::new();
    let mut descendant: Option<&Token> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        match &token.kind {
            TokenKind::Whitespace => {
                if children.last().is_some_and(|last| !is_combinator(last)) {
                    descendant = Some(token);
                }
                i += 1;
                continue;
            }
            TokenKind::Comment(_) => {
                // `a/**/b` is two compounds; `a/**/.b` stays one.
                let starts_type = matches!(
                    tokens.get(i + 1).map(|t| &t.kind),
                    Some(TokenKind::Ident(_) | TokenKind::Delim('*'))
                );
                if starts_type && children.last().is_some_and(|last| !is_combinator(last)) {
                    descendant = Some(token);
                }
                i += 1;
                continue;
            }
            TokenKind::Delim(c @ ('>' | '+' | '~')) => {
                descendant = None;
                // A leading combinator is allowed (relative selectors in `:has()`).
                if children.last().is_some_and(is_combinator) {
                    return None;
                }
                children.push(source.token_node(NodeKind::Combinator { name: c.to_string() }, token));
                i += 1;
                continue;
            }
            _ => {}
        }

        if let Some(ws) = descendant.take() {
            children.push(source.token_node(NodeKind::Combinator { name: " ".into() }, ws));
        }
        let (node, next) = parse_simple_selector(source, tokens, i)?;
        children.push(node);
        i = next;
    }

    if children.last().map_or(true, is_combinator) {
        return None;
    }
    Some(source.node(NodeKind::Selector { children }, tokens))
}

/// Parse the simple selector starting at `i`, returning it and the index
/// just past it.
fn parse_simple_selector(source: &Source, tokens: &[Token], i: usize) -> Option<(Node, usize)> {
    let token = &tokens[i];
    match &token.kind {
        TokenKind::Ident(name) => {
            if matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Delim('|'))) {
                return None;
            }
            let node = source.token_node(NodeKind::TypeSelector { name: name.clone() }, token);
            Some((node, i + 1))
        }
        TokenKind::Delim('*') => {
            if matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Delim('|'))) {
                return None;
            }
            let node = source.token_node(NodeKind::TypeSelector { name: "*".into() }, token);
            Some((node, i + 1))
        }
        TokenKind::Delim('.') => match tokens.get(i + 1).map(|t| &t.kind) {
            Some(TokenKind::Ident(name)) => {
                let node = source.node(NodeKind::ClassSelector { name: name.clone() }, &tokens[i..i + 2]);
                Some((node, i + 2))
            }
            _ => None,
        },
        TokenKind::Hash(name) => {
            let node = source.token_node(NodeKind::IdSelector { name: name.clone() }, token);
            Some((node, i + 1))
        }
        TokenKind::LBracket => {
            let close = matching_close(tokens, i)?;
            let node = parse_attribute_selector(source, &tokens[i..=close])?;
            Some((node, close + 1))
        }
        TokenKind::Colon => parse_pseudo(source, tokens, i),
        _ => None,
    }
}

/// `:name`, `:name(...)`, `::name`, `::name(...)` starting at the first colon.
fn parse_pseudo(source: &Source, tokens: &[Token], i: usize) -> Option<(Node, usize)> {
    let element = matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::Colon));
    let name_at = if element { i + 2 } else { i + 1 };
    let name_token = tokens.get(name_at)?;

    let (name, children, end) = match &name_token.kind {
        TokenKind::Ident(name) => (name.clone(), None, name_at),
        TokenKind::Function(name) => {
            let close = matching_close(tokens, name_at)?;
            let args = parse_pseudo_arguments(source, name, &tokens[name_at + 1..close]);
            (name.clone(), Some(args), close)
        }
        _ => return None,
    };

    let kind = if element {
        NodeKind::PseudoElementSelector { name, children }
    } else {
        NodeKind::PseudoClassSelector { name, children }
    };
    Some((source.node(kind, &tokens[i..=end]), end + 1))
}

fn parse_pseudo_arguments(source: &Source, name: &str, tokens: &[Token]) -> Vec<Node> {
    let tokens = trim(tokens);
    let lower = name.to_ascii_lowercase();

    let node = if SELECTOR_ARGUMENT_PSEUDOS.contains(&lower.as_str()) {
        parse_selector_list(source, tokens)
    } else if NTH_PSEUDOS.contains(&lower.as_str()) {
        parse_nth(source, tokens)
    } else if lower == "lang" || lower == "dir" {
        match tokens {
            [token] => match &token.kind {
                TokenKind::Ident(name) => {
                    Some(source.token_node(NodeKind::Identifier { name: name.clone() }, token))
                }
                _ => None,
            },
            _ => None,
        }
    } else {
        None
    };

    vec![node.unwrap_or_else(|| source.raw(tokens))]
}

/// `2n+1`, `odd`, `-n+3 of .item`.
fn parse_nth(source: &Source, tokens: &[Token]) -> Option<Node> {
    let of_at = tokens.iter().enumerate().position(|(i, t)| {
        i > 0
            && matches!(&t.kind, TokenKind::Ident(word) if word.eq_ignore_ascii_case("of"))
            && tokens[i - 1].kind == TokenKind::Whitespace
    });
    let (nth_tokens, selector) = match of_at {
        Some(at) => {
            let selector = parse_selector_list(source, &tokens[at + 1..])?;
            (trim(&tokens[..at]), Some(Box::new(selector)))
        }
        None => (tokens, None),
    };

    let text: String = source
        .text(nth_tokens)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let kind = if text.eq_ignore_ascii_case("odd") || text.eq_ignore_ascii_case("even") {
        NodeKind::Identifier { name: text }
    } else {
        let (a, b) = parse_an_plus_b(&text)?;
        NodeKind::AnPlusB { a, b }
    };

    let nth = source.node(kind, nth_tokens);
    Some(source.node(
        NodeKind::Nth {
            nth: Box::new(nth),
            selector,
        },
        tokens,
    ))
}

/// Split `An+B` text (whitespace already removed) into its coefficients.
pub(crate) fn parse_an_plus_b(text: &str) -> Option<(Option<String>, Option<String>)> {
    match text.find(['n', 'N']) {
        Some(n_at) => {
            let a = match &text[..n_at] {
                "" => "1".to_string(),
                "+" => "+1".to_string(),
                "-" => "-1".to_string(),
                other if is_integer(other) => other.to_string(),
                _ => return None,
            };
            let rest = &text[n_at + 1..];
            let b = if rest.is_empty() {
                None
            } else if rest.starts_with(['+', '-']) && is_integer(rest) {
                Some(rest.strip_prefix('+').unwrap_or(rest).to_string())
            } else {
                return None;
            };
            Some((Some(a), b))
        }
        None if is_integer(&text) => Some((None, Some(text.to_string()))),
        None => None,
    }
}

/// `[+-]?[0-9]+`
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// `[name]`, `[name=value]`, `[name~="value" i]` (brackets included).
fn parse_attribute_selector(source: &Source, group: &[Token]) -> Option<Node> {
    let inner = group.get(1..group.len().checked_sub(1)?)?;
    let parts: Vec<&Token> = inner.iter().filter(|t| !t.is_trivia()).collect();

    let name = match parts.first().map(|t| &t.kind) {
        Some(TokenKind::Ident(name)) => name.clone(),
        _ => return None,
    };
    let mut idx = 1;

    let mut matcher = None;
    let mut value = None;
    let mut flags = None;

    if idx < parts.len() {
        matcher = match (&parts[idx].kind, parts.get(idx + 1).map(|t| &t.kind)) {
            (TokenKind::Delim('='), _) => {
                idx += 1;
                Some("=".to_string())
            }
            (TokenKind::Delim(c @ ('~' | '|' | '^' | '$' | '*')), Some(TokenKind::Delim('='))) => {
                idx += 2;
                Some(format!("{c}="))
            }
            _ => return None,
        };

        let token = parts.get(idx)?;
        let kind = match &token.kind {
            TokenKind::Ident(name) => NodeKind::Identifier { name: name.clone() },
            TokenKind::String(raw) => NodeKind::String { value: raw.clone() },
            _ => return None,
        };
        value = Some(Box::new(source.token_node(kind, token)));
        idx += 1;

        if let Some(token) = parts.get(idx) {
            match &token.kind {
                TokenKind::Ident(flag) => flags = Some(flag.clone()),
                _ => return None,
            }
            idx += 1;
        }
    }

    if idx != parts.len() {
        return None;
    }

    Some(source.node(
        NodeKind::AttributeSelector {
            name,
            matcher,
            value,
            flags,
        },
        group,
    ))
}
