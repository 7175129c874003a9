//! Cascade Parser
//!
//! Parses CSS source into the stylesheet AST consumed by `cascade-codegen`.
//! The parser is forgiving: selectors, preludes and values it cannot model
//! become `Raw` nodes holding the original text, so unknown or vendor syntax
//! survives a parse/generate round-trip.
//!
//! Whitespace is normalized while parsing (collapsed, and dropped where it
//! carries no meaning), which is what lets the generator emit minimal CSS
//! by plain concatenation.

pub mod ast;
pub mod parser;
mod selector;
mod source;
mod value;

pub use ast::{Location, Node, NodeKind, Position};
pub use parser::{ParseOptions, Parser};
pub use source::UNKNOWN_SOURCE;

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<cascade_lexer::LexerError> for ParseError {
    fn from(e: cascade_lexer::LexerError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}
