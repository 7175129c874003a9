//! Cascade Lexer
//!
//! Tokenizes CSS source text into a stream of tokens.
//! Whitespace and comments are kept as tokens so the parser can decide
//! where they are significant (descendant combinators, value separators).
//!
//! # Example
//!
//! ```
//! use cascade_lexer::Scanner;
//!
//! let tokens = Scanner::tokenize("").unwrap();
//! assert_eq!(tokens.len(), 1); // Just EOF
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Span, Token, TokenKind};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
