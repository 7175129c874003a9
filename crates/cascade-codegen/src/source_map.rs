//! Source map recording, `mappings` encoding and map assembly.
//!
//! The recorder is driven by the CSS writer: `enter` right before a node's
//! first character is written and `leave` right after its last. Only
//! at-rules, selectors and declarations produce mappings. The end of a
//! mapped node is kept as a pending range end and is written as a
//! one-field segment when the next mapping starts somewhere else, or at the
//! end of the output.

use crate::emitter::GeneratedPosition;
use crate::{vlq, GenerateOptions};
use cascade_parser::{Node, NodeKind};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Source map format revision.
pub const VERSION: u8 = 3;

/// A 0-based position in an original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Index into the map's `sources`.
    pub source: usize,
    pub line: usize,
    pub column: usize,
}

/// One recorded segment. A mapping without `original` ends the range
/// started by the previous mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated: GeneratedPosition,
    pub original: Option<OriginalPosition>,
}

/// Collects mappings while a stylesheet is generated.
#[derive(Debug, Default)]
pub struct MappingRecorder {
    sources: IndexSet<String>,
    mappings: Vec<Mapping>,
    last_original: Option<OriginalPosition>,
    pending_end: Option<GeneratedPosition>,
}

impl MappingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node kinds that produce mappings.
    pub fn is_tracked(kind: &NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Atrule { .. } | NodeKind::Selector { .. } | NodeKind::Declaration { .. }
        )
    }

    pub fn enter(&mut self, node: &Node, at: GeneratedPosition) {
        if !Self::is_tracked(&node.kind) {
            return;
        }
        let Some(location) = &node.location else {
            return;
        };

        let (source, _) = self.sources.insert_full(location.source_name.clone());
        let original = OriginalPosition {
            source,
            line: location.start.line.saturating_sub(1),
            column: location.start.column.saturating_sub(1),
        };
        if self.last_original == Some(original) {
            return;
        }

        if let Some(end) = self.pending_end.take() {
            if end != at {
                self.mappings.push(Mapping {
                    generated: end,
                    original: None,
                });
            }
        }

        trace!(
            kind = node.type_name(),
            line = at.line,
            column = at.column,
            original_line = original.line,
            original_column = original.column,
            "mapping"
        );
        self.mappings.push(Mapping {
            generated: at,
            original: Some(original),
        });
        self.last_original = Some(original);
    }

    pub fn leave(&mut self, node: &Node, at: GeneratedPosition) {
        if Self::is_tracked(&node.kind) && !self.mappings.is_empty() {
            self.pending_end = Some(at);
        }
    }

    /// Flush the pending range end and return the sources table and the
    /// mappings in generated order.
    pub fn finish(mut self) -> (Vec<String>, Vec<Mapping>) {
        if let Some(end) = self.pending_end.take() {
            if self.mappings.last().map(|m| m.generated) != Some(end) {
                self.mappings.push(Mapping {
                    generated: end,
                    original: None,
                });
            }
        }
        (self.sources.into_iter().collect(), self.mappings)
    }
}

/// Encode mappings (sorted by generated position) as a `mappings` string.
pub fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut out = String::new();
    let mut line = 0;
    let mut line_start = true;
    let mut prev_column = 0i64;
    let mut prev_source = 0i64;
    let mut prev_line = 0i64;
    let mut prev_original_column = 0i64;

    for mapping in mappings {
        while line < mapping.generated.line {
            out.push(';');
            line += 1;
            line_start = true;
            prev_column = 0;
        }
        if !line_start {
            out.push(',');
        }
        line_start = false;

        let column = mapping.generated.column as i64;
        vlq::encode_into(column - prev_column, &mut out);
        prev_column = column;

        if let Some(original) = mapping.original {
            let source = original.source as i64;
            let original_line = original.line as i64;
            let original_column = original.column as i64;
            vlq::encode_into(source - prev_source, &mut out);
            vlq::encode_into(original_line - prev_line, &mut out);
            vlq::encode_into(original_column - prev_original_column, &mut out);
            prev_source = source;
            prev_line = original_line;
            prev_original_column = original_column;
        }
    }

    out
}

/// A revision 3 source map.
///
/// `Display` renders compact JSON with keys in the order `version`,
/// `sources`, `names`, `mappings`, `file`, `sourceRoot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
}

impl SourceMap {
    pub fn assemble(sources: Vec<String>, mappings: &[Mapping], options: &GenerateOptions) -> Self {
        Self {
            version: VERSION,
            sources,
            names: Vec::new(),
            mappings: encode_mappings(mappings),
            file: options.file.clone(),
            source_root: options.source_root.clone(),
        }
    }

    /// The comment that links a stylesheet to its map.
    pub fn to_comment(url: &str) -> String {
        format!("/*# sourceMappingURL={url} */")
    }
}

impl fmt::Display for SourceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
