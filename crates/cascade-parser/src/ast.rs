//! Abstract Syntax Tree for CSS stylesheets.
//!
//! A `Node` is a `NodeKind` plus an optional source `Location`. Children are
//! held generically (`Box<Node>` / `Vec<Node>`) so that any subtree can be
//! replaced by an opaque `Raw` node carrying text the parser did not model.
//!
//! The serialized form is the plain-object tree: every node is a JSON object
//! with a `type` discriminant, its fields, and an optional `location`.

use serde::{Deserialize, Serialize};

/// A node of the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn with_location(kind: NodeKind, location: Option<Location>) -> Self {
        Self { kind, location }
    }

    /// The `type` discriminant of this node, as it appears in the plain tree.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Node::new(kind)
    }
}

/// Where a node came from in the original source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub source_name: String,
    pub start: Position,
    pub end: Position,
}

/// A point in source text. `line` and `column` are 1-based; `offset` is a
/// 0-based character index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Node variants. The set is closed: the plain-object decoder rejects any
/// `type` not listed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    // --- Structure ---
    StyleSheet {
        children: Vec<Node>,
    },
    Atrule {
        name: String,
        prelude: Option<Box<Node>>,
        block: Option<Box<Node>>,
    },
    AtrulePrelude {
        children: Vec<Node>,
    },
    Rule {
        prelude: Box<Node>,
        block: Box<Node>,
    },
    Block {
        children: Vec<Node>,
    },
    DeclarationList {
        children: Vec<Node>,
    },
    Declaration {
        #[serde(default)]
        important: bool,
        property: String,
        value: Box<Node>,
    },

    // --- Selectors ---
    SelectorList {
        children: Vec<Node>,
    },
    Selector {
        children: Vec<Node>,
    },
    TypeSelector {
        name: String,
    },
    IdSelector {
        name: String,
    },
    ClassSelector {
        name: String,
    },
    AttributeSelector {
        name: String,
        matcher: Option<String>,
        value: Option<Box<Node>>,
        flags: Option<String>,
    },
    PseudoClassSelector {
        name: String,
        children: Option<Vec<Node>>,
    },
    PseudoElementSelector {
        name: String,
        children: Option<Vec<Node>>,
    },
    /// `" "` for the descendant combinator, otherwise `>`, `+`, `~`.
    Combinator {
        name: String,
    },
    Nth {
        nth: Box<Node>,
        selector: Option<Box<Node>>,
    },
    /// `a` and `b` keep their written sign: `2n+1` is `a: "2", b: "1"`,
    /// `-n-3` is `a: "-1", b: "-3"`.
    AnPlusB {
        a: Option<String>,
        b: Option<String>,
    },

    // --- Values ---
    Value {
        children: Vec<Node>,
    },
    Identifier {
        name: String,
    },
    Number {
        value: String,
    },
    Dimension {
        value: String,
        unit: String,
    },
    Percentage {
        value: String,
    },
    Hash {
        value: String,
    },
    /// Raw quoted spelling, quotes included.
    String {
        value: String,
    },
    Url {
        value: Box<Node>,
    },
    UnicodeRange {
        value: String,
    },
    Function {
        name: String,
        children: Vec<Node>,
    },
    Parentheses {
        children: Vec<Node>,
    },
    Brackets {
        children: Vec<Node>,
    },
    Operator {
        value: String,
    },
    WhiteSpace {
        value: String,
    },
    Comment {
        value: String,
    },
    /// Opaque text, emitted exactly as stored.
    Raw {
        value: String,
    },

    // --- Media queries ---
    MediaQueryList {
        children: Vec<Node>,
    },
    MediaQuery {
        children: Vec<Node>,
    },
    MediaFeature {
        name: String,
        value: Option<Box<Node>>,
    },
    Ratio {
        left: String,
        right: String,
    },

    // --- HTML comment markers ---
    #[serde(rename = "CDO")]
    Cdo,
    #[serde(rename = "CDC")]
    Cdc,
}

impl NodeKind {
    /// Every `type` discriminant, in declaration order.
    pub const TYPE_NAMES: &'static [&'static str] = &[
        "StyleSheet",
        "Atrule",
        "AtrulePrelude",
        "Rule",
        "Block",
        "DeclarationList",
        "Declaration",
        "SelectorList",
        "Selector",
        "TypeSelector",
        "IdSelector",
        "ClassSelector",
        "AttributeSelector",
        "PseudoClassSelector",
        "PseudoElementSelector",
        "Combinator",
        "Nth",
        "AnPlusB",
        "Value",
        "Identifier",
        "Number",
        "Dimension",
        "Percentage",
        "Hash",
        "String",
        "Url",
        "UnicodeRange",
        "Function",
        "Parentheses",
        "Brackets",
        "Operator",
        "WhiteSpace",
        "Comment",
        "Raw",
        "MediaQueryList",
        "MediaQuery",
        "MediaFeature",
        "Ratio",
        "CDO",
        "CDC",
    ];

    /// The `type` discriminant of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::StyleSheet { .. } => "StyleSheet",
            NodeKind::Atrule { .. } => "Atrule",
            NodeKind::AtrulePrelude { .. } => "AtrulePrelude",
            NodeKind::Rule { .. } => "Rule",
            NodeKind::Block { .. } => "Block",
            NodeKind::DeclarationList { .. } => "DeclarationList",
            NodeKind::Declaration { .. } => "Declaration",
            NodeKind::SelectorList { .. } => "SelectorList",
            NodeKind::Selector { .. } => "Selector",
            NodeKind::TypeSelector { .. } => "TypeSelector",
            NodeKind::IdSelector { .. } => "IdSelector",
            NodeKind::ClassSelector { .. } => "ClassSelector",
            NodeKind::AttributeSelector { .. } => "AttributeSelector",
            NodeKind::PseudoClassSelector { .. } => "PseudoClassSelector",
            NodeKind::PseudoElementSelector { .. } => "PseudoElementSelector",
            NodeKind::Combinator { .. } => "Combinator",
            NodeKind::Nth { .. } => "Nth",
            NodeKind::AnPlusB { .. } => "AnPlusB",
            NodeKind::Value { .. } => "Value",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Number { .. } => "Number",
            NodeKind::Dimension { .. } => "Dimension",
            NodeKind::Percentage { .. } => "Percentage",
            NodeKind::Hash { .. } => "Hash",
            NodeKind::String { .. } => "String",
            NodeKind::Url { .. } => "Url",
            NodeKind::UnicodeRange { .. } => "UnicodeRange",
            NodeKind::Function { .. } => "Function",
            NodeKind::Parentheses { .. } => "Parentheses",
            NodeKind::Brackets { .. } => "Brackets",
            NodeKind::Operator { .. } => "Operator",
            NodeKind::WhiteSpace { .. } => "WhiteSpace",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::Raw { .. } => "Raw",
            NodeKind::MediaQueryList { .. } => "MediaQueryList",
            NodeKind::MediaQuery { .. } => "MediaQuery",
            NodeKind::MediaFeature { .. } => "MediaFeature",
            NodeKind::Ratio { .. } => "Ratio",
            NodeKind::Cdo => "CDO",
            NodeKind::Cdc => "CDC",
        }
    }

    /// Whether `name` is the discriminant of a known node type.
    pub fn is_known_type(name: &str) -> bool {
        Self::TYPE_NAMES.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> Node {
        Node::new(NodeKind::Identifier { name: name.into() })
    }

    #[test]
    fn test_type_name_matches_serialized_tag() {
        let samples = vec![
            Node::new(NodeKind::StyleSheet { children: vec![] }),
            Node::new(NodeKind::Cdo),
            Node::new(NodeKind::Cdc),
            ident("red"),
            Node::new(NodeKind::Url {
                value: Box::new(Node::new(NodeKind::Raw { value: "a.png".into() })),
            }),
        ];
        for node in samples {
            let value = serde_json::to_value(&node).unwrap();
            assert_eq!(value["type"], node.type_name());
            assert!(NodeKind::is_known_type(node.type_name()));
        }
    }

    #[test]
    fn test_unknown_type_name() {
        assert!(!NodeKind::is_known_type("xxx"));
        assert!(!NodeKind::is_known_type("stylesheet"));
    }

    #[test]
    fn test_plain_shape() {
        let node = Node::new(NodeKind::Declaration {
            important: true,
            property: "color".into(),
            value: Box::new(Node::new(NodeKind::Value {
                children: vec![ident("red")],
            })),
        });
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "Declaration",
                "important": true,
                "property": "color",
                "value": {
                    "type": "Value",
                    "children": [{ "type": "Identifier", "name": "red" }]
                }
            })
        );
    }

    #[test]
    fn test_location_serializes_camel_case() {
        let node = Node::with_location(
            NodeKind::Cdo,
            Some(Location {
                source_name: "a.css".into(),
                start: Position::new(1, 1, 0),
                end: Position::new(1, 5, 4),
            }),
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["location"]["sourceName"], "a.css");
        assert_eq!(value["location"]["end"]["column"], 5);

        let back: Node = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }
}
