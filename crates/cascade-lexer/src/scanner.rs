use crate::token::{Span, Token, TokenKind};
use crate::LexerError;

/// CSS source scanner.
///
/// Tokenizes stylesheet text into a flat stream of tokens, following the
/// shape of the CSS Syntax tokenizer:
/// - `Vec<char>` source for index-based navigation
/// - Raw spelling preserved on every text-carrying token
/// - Line/column tracking across newlines, recorded on every token
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    start: usize,
    start_line: usize,
    start_column: usize,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            start: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens()?;
        Ok(scanner.tokens)
    }

    /// Scan all tokens from the source.
    fn scan_tokens(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() {
            self.mark();
            self.scan_token()?;
        }

        self.mark();
        self.emit(TokenKind::Eof);
        Ok(())
    }

    /// Scan the next token.
    fn scan_token(&mut self) -> Result<(), LexerError> {
        let ch = self.peek();

        match ch {
            c if is_whitespace(c) => {
                while !self.is_at_end() && is_whitespace(self.peek()) {
                    self.advance();
                }
                self.emit(TokenKind::Whitespace);
                Ok(())
            }

            '/' if self.peek_at(1) == '*' => self.scan_comment(),

            '"' | '\'' => self.scan_string(),

            '#' => {
                self.advance();
                if is_name_char(self.peek()) || self.is_valid_escape_at(0) {
                    let name = self.consume_name();
                    self.emit(TokenKind::Hash(name));
                } else {
                    self.emit(TokenKind::Delim('#'));
                }
                Ok(())
            }

            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),

            '<' if self.lookahead("<!--") => {
                self.advance_by(4);
                self.emit(TokenKind::Cdo);
                Ok(())
            }

            '-' if self.starts_number() => self.scan_numeric(),
            '-' if self.lookahead("-->") => {
                self.advance_by(3);
                self.emit(TokenKind::Cdc);
                Ok(())
            }
            '-' if self.starts_ident_at(0) => self.scan_ident_like(),

            '+' | '.' if self.starts_number() => self.scan_numeric(),

            '0'..='9' => self.scan_numeric(),

            '@' if self.starts_ident_at(1) => {
                self.advance();
                let name = self.consume_name();
                self.emit(TokenKind::AtKeyword(name));
                Ok(())
            }

            'u' | 'U'
                if self.peek_at(1) == '+'
                    && (self.peek_at(2).is_ascii_hexdigit() || self.peek_at(2) == '?') =>
            {
                self.scan_unicode_range()
            }

            c if is_name_start(c) || self.is_valid_escape_at(0) => self.scan_ident_like(),

            c => self.single(TokenKind::Delim(c)),
        }
    }

    // --- Scanners ---

    /// Scan a quoted string. The token keeps the raw spelling, quotes and
    /// escapes included.
    fn scan_string(&mut self) -> Result<(), LexerError> {
        let quote = self.peek();
        let mut value = String::new();
        value.push(quote);
        self.advance(); // consume opening quote

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(self.error_at_start("Unterminated string"));
            }
            let c = self.peek();
            if c == '\\' {
                value.push(c);
                self.advance();
                if self.is_at_end() {
                    return Err(self.error_at_start("Unterminated string"));
                }
                value.push(self.peek());
                self.advance();
            } else if c == quote {
                value.push(c);
                self.advance();
                break;
            } else {
                value.push(c);
                self.advance();
            }
        }

        self.emit(TokenKind::String(value));
        Ok(())
    }

    /// Scan a `/* ... */` comment.
    fn scan_comment(&mut self) -> Result<(), LexerError> {
        self.advance_by(2); // consume `/*`

        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(self.error_at_start("Unterminated comment"));
            }
            if self.peek() == '*' && self.peek_at(1) == '/' {
                self.advance_by(2);
                break;
            }
            content.push(self.peek());
            self.advance();
        }

        self.emit(TokenKind::Comment(content));
        Ok(())
    }

    /// Scan a number followed by an optional `%` or unit.
    fn scan_numeric(&mut self) -> Result<(), LexerError> {
        let mut value = String::new();

        if matches!(self.peek(), '+' | '-') {
            value.push(self.peek());
            self.advance();
        }
        self.consume_digits(&mut value);
        if self.peek() == '.' && self.peek_at(1).is_ascii_digit() {
            value.push('.');
            self.advance();
            self.consume_digits(&mut value);
        }
        if matches!(self.peek(), 'e' | 'E') {
            let sign = matches!(self.peek_at(1), '+' | '-');
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_ascii_digit() {
                value.push(self.peek());
                self.advance();
                if sign {
                    value.push(self.peek());
                    self.advance();
                }
                self.consume_digits(&mut value);
            }
        }

        if self.starts_ident_at(0) {
            let unit = self.consume_name();
            self.emit(TokenKind::Dimension { value, unit });
        } else if self.peek() == '%' {
            self.advance();
            self.emit(TokenKind::Percentage(value));
        } else {
            self.emit(TokenKind::Number(value));
        }
        Ok(())
    }

    /// Scan an identifier, a function name, or an unquoted `url(...)`.
    fn scan_ident_like(&mut self) -> Result<(), LexerError> {
        let name = self.consume_name();

        if self.peek() != '(' {
            self.emit(TokenKind::Ident(name));
            return Ok(());
        }
        self.advance(); // consume `(`

        if name.eq_ignore_ascii_case("url") {
            let mut offset = 0;
            while is_whitespace(self.peek_at(offset)) {
                offset += 1;
            }
            if !matches!(self.peek_at(offset), '"' | '\'') {
                return self.scan_url();
            }
        }

        self.emit(TokenKind::Function(name));
        Ok(())
    }

    /// Scan the rest of an unquoted `url(` up to and including `)`.
    fn scan_url(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() && is_whitespace(self.peek()) {
            self.advance();
        }

        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(self.error_at_start("Unterminated url"));
            }
            match self.peek() {
                ')' => {
                    self.advance();
                    break;
                }
                '\\' if self.is_valid_escape_at(0) => {
                    content.push('\\');
                    self.advance();
                    content.push(self.peek());
                    self.advance();
                }
                c if is_whitespace(c) => {
                    while !self.is_at_end() && is_whitespace(self.peek()) {
                        self.advance();
                    }
                    if self.peek() != ')' {
                        return Err(self.error("Unexpected whitespace in url".into()));
                    }
                }
                c => {
                    content.push(c);
                    self.advance();
                }
            }
        }

        self.emit(TokenKind::Url(content));
        Ok(())
    }

    /// Scan `U+0025-00FF` / `u+4??`.
    fn scan_unicode_range(&mut self) -> Result<(), LexerError> {
        let mut value = String::new();
        value.push(self.peek());
        value.push('+');
        self.advance_by(2);

        let mut count = 0;
        while count < 6 && (self.peek().is_ascii_hexdigit() || self.peek() == '?') {
            value.push(self.peek());
            self.advance();
            count += 1;
        }
        if self.peek() == '-' && self.peek_at(1).is_ascii_hexdigit() {
            value.push('-');
            self.advance();
            let mut count = 0;
            while count < 6 && self.peek().is_ascii_hexdigit() {
                value.push(self.peek());
                self.advance();
                count += 1;
            }
        }

        self.emit(TokenKind::UnicodeRange(value));
        Ok(())
    }

    // --- Name helpers ---

    /// Consume a name (ident code points and escapes), returning its raw spelling.
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            let c = self.peek();
            if is_name_char(c) {
                name.push(c);
                self.advance();
            } else if self.is_valid_escape_at(0) {
                name.push('\\');
                self.advance();
                let escaped = self.peek();
                name.push(escaped);
                self.advance();
                if escaped.is_ascii_hexdigit() {
                    let mut count = 1;
                    while count < 6 && self.peek().is_ascii_hexdigit() {
                        name.push(self.peek());
                        self.advance();
                        count += 1;
                    }
                    if is_whitespace(self.peek()) {
                        name.push(self.peek());
                        self.advance();
                    }
                }
            } else {
                break;
            }
        }
        name
    }

    fn consume_digits(&mut self, out: &mut String) {
        while self.peek().is_ascii_digit() {
            out.push(self.peek());
            self.advance();
        }
    }

    fn starts_number(&self) -> bool {
        match self.peek() {
            '+' | '-' => {
                self.peek_at(1).is_ascii_digit()
                    || (self.peek_at(1) == '.' && self.peek_at(2).is_ascii_digit())
            }
            '.' => self.peek_at(1).is_ascii_digit(),
            c => c.is_ascii_digit(),
        }
    }

    fn starts_ident_at(&self, offset: usize) -> bool {
        let c = self.peek_at(offset);
        if c == '-' {
            let next = self.peek_at(offset + 1);
            is_name_start(next) || next == '-' || self.is_valid_escape_at(offset + 1)
        } else {
            is_name_start(c) || self.is_valid_escape_at(offset)
        }
    }

    fn is_valid_escape_at(&self, offset: usize) -> bool {
        self.peek_at(offset) == '\\'
            && self.pos + offset + 1 < self.chars.len()
            && self.peek_at(offset + 1) != '\n'
    }

    // --- Helpers ---

    fn mark(&mut self) {
        self.start = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn single(&mut self, kind: TokenKind) -> Result<(), LexerError> {
        self.advance();
        self.emit(kind);
        Ok(())
    }

    fn emit(&mut self, kind: TokenKind) {
        let span = Span::new(
            self.start,
            self.pos,
            self.start_line,
            self.start_column,
            self.line,
            self.column,
        );
        self.tokens.push(Token::new(kind, span));
    }

    fn lookahead(&self, text: &str) -> bool {
        text.chars().enumerate().all(|(i, c)| self.peek_at(i) == c)
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if let Some(&c) = self.chars.get(self.pos) {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: String) -> LexerError {
        LexerError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    fn error_at_start(&self, message: &str) -> LexerError {
        LexerError {
            message: message.into(),
            line: self.start_line,
            column: self.start_column,
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c != '\0')
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: tokenize and return token kinds (ignoring spans).
    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    /// Helper: tokenize and panic on error.
    fn tokens(source: &str) -> Vec<Token> {
        Scanner::tokenize(source).unwrap()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.into())
    }

    // =========================================================================
    // Structure: empty, whitespace, EOF
    // =========================================================================

    #[test]
    fn test_empty_source() {
        let toks = tokens("");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        assert_eq!(kinds(" \n\t "), vec![TokenKind::Whitespace, TokenKind::Eof]);
    }

    // =========================================================================
    // Rules
    // =========================================================================

    #[test]
    fn test_simple_rule() {
        assert_eq!(
            kinds(".a{color:red}"),
            vec![
                TokenKind::Delim('.'),
                ident("a"),
                TokenKind::LBrace,
                ident("color"),
                TokenKind::Colon,
                ident("red"),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_at_keyword() {
        assert_eq!(
            kinds("@media screen"),
            vec![
                TokenKind::AtKeyword("media".into()),
                TokenKind::Whitespace,
                ident("screen"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_at_is_delim() {
        assert_eq!(kinds("@ "), vec![TokenKind::Delim('@'), TokenKind::Whitespace, TokenKind::Eof]);
    }

    #[test]
    fn test_hash() {
        assert_eq!(
            kinds("#ff0000 #"),
            vec![
                TokenKind::Hash("ff0000".into()),
                TokenKind::Whitespace,
                TokenKind::Delim('#'),
                TokenKind::Eof,
            ]
        );
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    #[test]
    fn test_numeric_tokens() {
        assert_eq!(
            kinds("10 1.5em 50% -.5 +3 1e3"),
            vec![
                TokenKind::Number("10".into()),
                TokenKind::Whitespace,
                TokenKind::Dimension { value: "1.5".into(), unit: "em".into() },
                TokenKind::Whitespace,
                TokenKind::Percentage("50".into()),
                TokenKind::Whitespace,
                TokenKind::Number("-.5".into()),
                TokenKind::Whitespace,
                TokenKind::Number("+3".into()),
                TokenKind::Whitespace,
                TokenKind::Number("1e3".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dimension_with_e_unit() {
        assert_eq!(
            kinds("2em"),
            vec![
                TokenKind::Dimension { value: "2".into(), unit: "em".into() },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_nth_like_dimension() {
        assert_eq!(
            kinds("2n-1"),
            vec![
                TokenKind::Dimension { value: "2".into(), unit: "n-1".into() },
                TokenKind::Eof,
            ]
        );
    }

    // =========================================================================
    // Identifiers and functions
    // =========================================================================

    #[test]
    fn test_custom_property_ident() {
        assert_eq!(kinds("--main-color"), vec![ident("--main-color"), TokenKind::Eof]);
    }

    #[test]
    fn test_vendor_ident() {
        assert_eq!(kinds("-webkit-box"), vec![ident("-webkit-box"), TokenKind::Eof]);
    }

    #[test]
    fn test_escaped_ident() {
        assert_eq!(kinds("a\\:b"), vec![ident("a\\:b"), TokenKind::Eof]);
    }

    #[test]
    fn test_function() {
        assert_eq!(
            kinds("rgba(0,0)"),
            vec![
                TokenKind::Function("rgba".into()),
                TokenKind::Number("0".into()),
                TokenKind::Comma,
                TokenKind::Number("0".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unquoted_url() {
        assert_eq!(
            kinds("url( img/a.png )"),
            vec![TokenKind::Url("img/a.png".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_quoted_url_is_function() {
        assert_eq!(
            kinds("url(\"a.png\")"),
            vec![
                TokenKind::Function("url".into()),
                TokenKind::String("\"a.png\"".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unicode_range() {
        assert_eq!(
            kinds("U+0025-00FF"),
            vec![TokenKind::UnicodeRange("U+0025-00FF".into()), TokenKind::Eof]
        );
    }

    // =========================================================================
    // Strings and comments
    // =========================================================================

    #[test]
    fn test_string_keeps_quotes_and_escapes() {
        assert_eq!(
            kinds("'a\\'b'"),
            vec![TokenKind::String("'a\\'b'".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_unterminated() {
        let result = Scanner::tokenize("\"hello");
        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("Unterminated string"));
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            kinds("/* note */"),
            vec![TokenKind::Comment(" note ".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_comment_unterminated() {
        let err = Scanner::tokenize("a /* open").unwrap_err();
        assert!(err.message.contains("Unterminated comment"));
        assert_eq!(err.column, 3);
    }

    #[test]
    fn test_cdo_cdc() {
        assert_eq!(
            kinds("<!-- -->"),
            vec![TokenKind::Cdo, TokenKind::Whitespace, TokenKind::Cdc, TokenKind::Eof]
        );
    }

    // =========================================================================
    // Span tracking
    // =========================================================================

    #[test]
    fn test_span_line_column() {
        let toks = tokens(".a {\n  color: red;\n}");
        let color = toks.iter().find(|t| t.kind == ident("color")).unwrap();
        assert_eq!(color.span.line, 2);
        assert_eq!(color.span.column, 3);
        assert_eq!(color.span.start, 7);
        assert_eq!(color.span.end, 12);
        assert_eq!(color.span.end_column, 8);
    }

    #[test]
    fn test_span_counts_chars_not_bytes() {
        let toks = tokens("é b");
        assert_eq!(toks[2].span.start, 2);
        assert_eq!(toks[2].span.column, 3);
    }
}
