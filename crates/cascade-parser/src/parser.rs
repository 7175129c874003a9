//! Stylesheet parser.
//!
//! Parses the token stream from `cascade-lexer` into a `StyleSheet` AST.
//! Structure (rules, at-rules, blocks, declarations) is handled here with
//! recursive descent; selector and value token runs are handed to the
//! `selector` and `value` sub-parsers.

use crate::ast::{Node, NodeKind};
use crate::selector::parse_rule_prelude;
use crate::source::{is_closer, is_opener, trim, Source};
use crate::value::{parse_atrule_prelude, parse_value};
use crate::ParseError;
use cascade_lexer::{Scanner, Token, TokenKind};
use serde::{Deserialize, Serialize};

/// At-rules whose block holds declarations rather than rules.
const DECLARATION_ATRULES: &[&str] = &[
    "font-face",
    "page",
    "viewport",
    "counter-style",
    "property",
    "font-palette-values",
    "top-left-corner",
    "top-left",
    "top-center",
    "top-right",
    "top-right-corner",
    "bottom-left-corner",
    "bottom-left",
    "bottom-center",
    "bottom-right",
    "bottom-right-corner",
    "left-top",
    "left-middle",
    "left-bottom",
    "right-top",
    "right-middle",
    "right-bottom",
];

/// Parser configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Source name recorded in node locations (`<unknown>` when absent).
    pub filename: Option<String>,
    /// Attach a `location` to every node.
    pub positions: bool,
}

/// CSS stylesheet parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    source: Source,
}

impl Parser {
    /// Create a parser over tokens produced from `text`.
    pub fn new(text: &str, tokens: Vec<Token>, options: &ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            source: Source::new(text, options),
        }
    }

    /// Parse source text into a `StyleSheet` node.
    pub fn parse(text: &str, options: &ParseOptions) -> Result<Node, ParseError> {
        let tokens = Scanner::tokenize(text)?;
        let mut parser = Parser::new(text, tokens, options);
        parser.parse_stylesheet()
    }

    fn parse_stylesheet(&mut self) -> Result<Node, ParseError> {
        let children = self.parse_rule_list(true)?;
        Ok(self
            .source
            .node(NodeKind::StyleSheet { children }, &self.tokens))
    }

    // =========================================================================
    // Rules and at-rules
    // =========================================================================

    /// Parse rules until `}` (nested) or EOF.
    fn parse_rule_list(&mut self, top_level: bool) -> Result<Vec<Node>, ParseError> {
        let mut children = Vec::new();

        loop {
            match &self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::RBrace if top_level => {
                    return Err(self.error("Unexpected '}'".into()));
                }
                TokenKind::RBrace => break,
                TokenKind::Whitespace | TokenKind::Semicolon => self.advance(),
                TokenKind::Comment(text) => {
                    if top_level {
                        let kind = NodeKind::Comment { value: text.clone() };
                        children.push(self.source.token_node(kind, self.peek()));
                    }
                    self.advance();
                }
                TokenKind::Cdo | TokenKind::Cdc => {
                    if top_level {
                        let kind = if self.peek().kind == TokenKind::Cdo {
                            NodeKind::Cdo
                        } else {
                            NodeKind::Cdc
                        };
                        children.push(self.source.token_node(kind, self.peek()));
                    }
                    self.advance();
                }
                TokenKind::AtKeyword(_) => children.push(self.parse_atrule()?),
                _ => children.push(self.parse_rule()?),
            }
        }

        Ok(children)
    }

    /// Parse `@name prelude;` or `@name prelude { ... }`.
    fn parse_atrule(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        let name = match &self.peek().kind {
            TokenKind::AtKeyword(name) => name.clone(),
            _ => return Err(self.error("Expected at-rule".into())),
        };
        self.advance();

        let prelude_start = self.pos;
        self.skip_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace));
        let prelude = parse_atrule_prelude(&self.source, &name, &self.tokens[prelude_start..self.pos]);

        let block = match &self.peek().kind {
            TokenKind::LBrace if holds_declarations(&name) => Some(self.parse_declaration_block()?),
            TokenKind::LBrace => Some(self.parse_rule_block()?),
            TokenKind::Semicolon => {
                self.advance();
                None
            }
            _ => None,
        };

        let kind = NodeKind::Atrule {
            name,
            prelude: prelude.map(Box::new),
            block: block.map(Box::new),
        };
        Ok(self.source.node(kind, trim(&self.tokens[start..self.pos])))
    }

    /// Parse `selectors { declarations }`.
    fn parse_rule(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.skip_until(|k| matches!(k, TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace));
        if self.peek().kind != TokenKind::LBrace {
            return Err(self.error("Expected '{'".into()));
        }

        let prelude = parse_rule_prelude(&self.source, &self.tokens[start..self.pos]);
        let block = self.parse_declaration_block()?;

        let kind = NodeKind::Rule {
            prelude: Box::new(prelude),
            block: Box::new(block),
        };
        Ok(self.source.node(kind, &self.tokens[start..self.pos]))
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// `{ rules }`. A missing `}` at EOF closes the block.
    fn parse_rule_block(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.advance(); // consume `{`
        let children = self.parse_rule_list(false)?;
        self.expect_block_end();
        Ok(self
            .source
            .node(NodeKind::Block { children }, &self.tokens[start..self.pos]))
    }

    /// `{ declarations }`, with nested at-rules allowed (`@page` margins).
    fn parse_declaration_block(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.advance(); // consume `{`

        let mut children = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Whitespace | TokenKind::Semicolon | TokenKind::Comment(_) => {
                    self.advance()
                }
                TokenKind::AtKeyword(_) => children.push(self.parse_atrule()?),
                _ => children.push(self.parse_declaration()?),
            }
        }
        self.expect_block_end();

        Ok(self
            .source
            .node(NodeKind::Block { children }, &self.tokens[start..self.pos]))
    }

    fn expect_block_end(&mut self) {
        if self.peek().kind == TokenKind::RBrace {
            self.advance();
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parse `property: value [!important]` up to `;` or `}`.
    fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.skip_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::RBrace));
        let tokens = trim(&self.tokens[start..self.pos]);

        let Some(colon) = tokens.iter().position(|t| t.kind == TokenKind::Colon) else {
            return Err(self.error_at(&tokens[0], "Expected ':' after property".into()));
        };

        let property = self.source.text(trim(&tokens[..colon]));
        if property.is_empty() || property.chars().any(char::is_whitespace) {
            return Err(self.error_at(&tokens[0], "Expected property name".into()));
        }

        let (value_tokens, important) = split_important(&tokens[colon + 1..]);
        let value = if property.starts_with("--") {
            self.source.raw(value_tokens)
        } else {
            parse_value(&self.source, value_tokens)
        };

        let kind = NodeKind::Declaration {
            important,
            property,
            value: Box::new(value),
        };
        Ok(self.source.node(kind, tokens))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Advance to the first depth-0 token matching `stop`, or EOF.
    fn skip_until(&mut self, stop: impl Fn(&TokenKind) -> bool) {
        let mut depth = 0usize;
        loop {
            let kind = &self.peek().kind;
            if *kind == TokenKind::Eof || (depth == 0 && stop(kind)) {
                break;
            }
            if is_opener(kind) {
                depth += 1;
            } else if is_closer(kind) {
                depth = depth.saturating_sub(1);
            }
            self.advance();
        }
    }

    fn peek(&self) -> &Token {
        static EOF: std::sync::LazyLock<Token> = std::sync::LazyLock::new(|| {
            Token::new(TokenKind::Eof, cascade_lexer::Span::new(0, 0, 1, 1, 1, 1))
        });
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&self, message: String) -> ParseError {
        self.error_at(self.peek(), message)
    }

    fn error_at(&self, token: &Token, message: String) -> ParseError {
        ParseError {
            message,
            line: token.span.line,
            column: token.span.column,
        }
    }
}

fn holds_declarations(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    DECLARATION_ATRULES.contains(&strip_vendor_prefix(&lower))
}

/// `-webkit-keyframes` -> `keyframes`.
fn strip_vendor_prefix(name: &str) -> &str {
    if name.starts_with("--") {
        return name;
    }
    name.strip_prefix('-')
        .and_then(|rest| rest.find('-').map(|i| &rest[i + 1..]))
        .unwrap_or(name)
}

/// Split a trailing `! important` off a declaration value.
fn split_important(tokens: &[Token]) -> (&[Token], bool) {
    let tokens = trim(tokens);
    if let [rest @ .., last] = tokens {
        if matches!(&last.kind, TokenKind::Ident(word) if word.eq_ignore_ascii_case("important")) {
            if let [before @ .., bang] = trim(rest) {
                if bang.kind == TokenKind::Delim('!') {
                    return (trim(before), true);
                }
            }
        }
    }
    (tokens, false)
}
