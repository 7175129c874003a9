//! WASM bindings for Cascade.
//!
//! Exposes `parse()`, `generate()` and `version()` to JavaScript via
//! wasm-bindgen. ASTs cross the boundary as plain objects; errors are
//! thrown as JS errors carrying the Rust message.

use cascade_codegen::{GenerateOptions, GenerateOutput, PlainTree};
use cascade_parser::ParseOptions;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Parse CSS into a plain-object AST.
///
/// `options` is `{ filename?: string, positions?: boolean }` or undefined.
#[wasm_bindgen]
pub fn parse(source: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options: ParseOptions = options_from_js(options)?;
    let tree = parse_to_plain(source, &options).map_err(|e| JsError::new(&e))?;
    to_js(&tree)
}

/// Generate CSS from a plain-object AST.
///
/// Returns the CSS string, or `{ css: string, map: object }` when
/// `options.sourceMap` is set.
#[wasm_bindgen]
pub fn generate(ast: JsValue, options: JsValue) -> Result<JsValue, JsError> {
    let options: GenerateOptions = options_from_js(options)?;
    let tree: PlainTree =
        serde_wasm_bindgen::from_value(ast).map_err(|e| JsError::new(&e.to_string()))?;
    let output = generate_from_plain(&tree, &options).map_err(|e| JsError::new(&e))?;

    let Some(map) = output.map else {
        return Ok(output.css.into());
    };

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"css".into(), &output.css.into())
        .map_err(|_| JsError::new("Failed to set css property"))?;
    js_sys::Reflect::set(&js_obj, &"map".into(), &to_js(&map)?)
        .map_err(|_| JsError::new("Failed to set map property"))?;
    Ok(js_obj.into())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn options_from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Serialize as plain JS objects rather than `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

// =========================================================================
// Native pipeline (shared by the exports, testable off-wasm)
// =========================================================================

fn parse_to_plain(source: &str, options: &ParseOptions) -> Result<PlainTree, String> {
    let ast = cascade_parser::Parser::parse(source, options).map_err(|e| e.to_string())?;
    cascade_codegen::to_plain_object(&ast).map_err(|e| e.to_string())
}

fn generate_from_plain(tree: &PlainTree, options: &GenerateOptions) -> Result<GenerateOutput, String> {
    cascade_codegen::generate_plain(tree, options).map_err(|e| e.to_string())
}
