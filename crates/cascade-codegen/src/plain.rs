//! Conversion between the typed AST and the plain-object tree.
//!
//! The plain tree is the AST as generic JSON objects and arrays. It is the
//! form the AST crosses process and language boundaries in, so decoding is
//! where node types are checked against the known set.

use crate::GenerateError;
use cascade_parser::{Node, NodeKind};
use serde::Deserialize;
use serde_json::Value;

/// The AST as generic JSON containers.
pub type PlainTree = Value;

/// Copy a typed AST into a plain tree.
pub fn to_plain_object(node: &Node) -> Result<PlainTree, GenerateError> {
    serde_json::to_value(node).map_err(|e| GenerateError::MalformedNode(e.to_string()))
}

/// Decode a plain tree. Every object's `type` is checked before any field
/// is interpreted, so an unknown type is reported even when the rest of
/// the node is also malformed.
pub fn from_plain_object(tree: &PlainTree) -> Result<Node, GenerateError> {
    check_types(tree)?;
    Node::deserialize(tree).map_err(|e| GenerateError::MalformedNode(e.to_string()))
}

fn check_types(tree: &Value) -> Result<(), GenerateError> {
    match tree {
        Value::Object(fields) => {
            if let Some(Value::String(tag)) = fields.get("type") {
                check_type(tag)?;
            }
            for (key, value) in fields {
                if key != "location" {
                    check_types(value)?;
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(check_types),
        _ => Ok(()),
    }
}

fn check_type(tag: &str) -> Result<(), GenerateError> {
    match tag {
        known if NodeKind::is_known_type(known) => Ok(()),
        unknown => Err(GenerateError::UnknownNodeType(unknown.to_string())),
    }
}
