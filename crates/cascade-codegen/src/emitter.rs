//! Output buffer that tracks the generated position as text is appended.

/// A position in generated text. Both fields are 0-based, as source map
/// generated positions are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeneratedPosition {
    pub line: usize,
    pub column: usize,
}

impl GeneratedPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Accumulates generated CSS.
///
/// `\n` advances the line and resets the column; every other character
/// advances the column. The offset counts characters, not bytes.
#[derive(Debug, Default)]
pub struct Emitter {
    out: String,
    line: usize,
    column: usize,
    offset: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: &str) {
        for c in text.chars() {
            self.advance(c);
        }
        self.out.push_str(text);
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.offset += 1;
    }

    pub fn position(&self) -> GeneratedPosition {
        GeneratedPosition::new(self.line, self.column)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_starts_at_origin() {
        let emitter = Emitter::new();
        assert_eq!(emitter.position(), GeneratedPosition::new(0, 0));
        assert_eq!(emitter.offset(), 0);
    }

    #[test]
    fn test_single_line() {
        let mut emitter = Emitter::new();
        emitter.write(".a");
        emitter.write("{");
        assert_eq!(emitter.position(), GeneratedPosition::new(0, 3));
        assert_eq!(emitter.finish(), ".a{");
    }

    #[test]
    fn test_newline_resets_column() {
        let mut emitter = Emitter::new();
        emitter.write("a{\n  b\n");
        assert_eq!(emitter.position(), GeneratedPosition::new(2, 0));
        emitter.write("}");
        assert_eq!(emitter.position(), GeneratedPosition::new(2, 1));
        assert_eq!(emitter.offset(), 8);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let mut emitter = Emitter::new();
        emitter.write("\"é→\"");
        assert_eq!(emitter.position(), GeneratedPosition::new(0, 4));
        assert_eq!(emitter.offset(), 4);
    }
}
