//! Cascade Code Generator
//!
//! Turns the stylesheet AST back into canonical minimal CSS, optionally with
//! a revision 3 source map linking the output to the original source.
//!
//! ```text
//! Node ─▶ CssWriter ─▶ Emitter ─▶ css
//!             │
//!             └─▶ MappingRecorder ─▶ encode_mappings ─▶ SourceMap
//! ```

pub mod css;
pub mod emitter;
pub mod plain;
pub mod source_map;
pub mod vlq;

pub use plain::{from_plain_object, to_plain_object, PlainTree};
pub use source_map::SourceMap;

use cascade_parser::Node;
use css::CssWriter;
use serde::{Deserialize, Serialize};
use source_map::MappingRecorder;
use tracing::debug;

/// Code generation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
    #[error("Malformed node: {0}")]
    MalformedNode(String),
}

/// Generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateOptions {
    /// Produce a source map alongside the CSS.
    pub source_map: bool,
    /// `file` entry of the map.
    pub file: Option<String>,
    /// `sourceRoot` entry of the map.
    pub source_root: Option<String>,
}

/// Generated CSS, plus the map when one was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutput {
    pub css: String,
    pub map: Option<SourceMap>,
}

/// Generate CSS text for an AST.
pub fn generate(ast: &Node) -> String {
    generate_with_options(ast, &GenerateOptions::default()).css
}

/// Generate CSS, and a source map when `options.source_map` is set.
pub fn generate_with_options(ast: &Node, options: &GenerateOptions) -> GenerateOutput {
    let recorder = options.source_map.then(MappingRecorder::new);
    let mut writer = CssWriter::new(recorder);
    writer.node(ast);
    let (css, recorder) = writer.finish();

    let map = recorder.map(|recorder| {
        let (sources, mappings) = recorder.finish();
        debug!(
            sources = sources.len(),
            mappings = mappings.len(),
            "assembled source map"
        );
        SourceMap::assemble(sources, &mappings, options)
    });

    debug!(
        root = ast.type_name(),
        chars = css.chars().count(),
        source_map = options.source_map,
        "generated stylesheet"
    );
    GenerateOutput { css, map }
}

/// Decode a plain-object tree and generate from it.
pub fn generate_plain(tree: &PlainTree, options: &GenerateOptions) -> Result<GenerateOutput, GenerateError> {
    let ast = from_plain_object(tree)?;
    Ok(generate_with_options(&ast, options))
}
