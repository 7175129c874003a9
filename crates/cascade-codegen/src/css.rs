//! CSS code generator.
//!
//! Walks the stylesheet AST and writes canonical minimal CSS through an
//! `Emitter`. When a `MappingRecorder` is attached, it is notified as each
//! node starts and finishes, at the exact generated positions.

use crate::emitter::Emitter;
use crate::source_map::MappingRecorder;
use cascade_parser::{Node, NodeKind};

/// Stylesheet writer.
pub struct CssWriter {
    emitter: Emitter,
    recorder: Option<MappingRecorder>,
}

impl CssWriter {
    pub fn new(recorder: Option<MappingRecorder>) -> Self {
        Self {
            emitter: Emitter::new(),
            recorder,
        }
    }

    /// Write a node and its subtree.
    pub fn node(&mut self, node: &Node) {
        if let Some(recorder) = &mut self.recorder {
            recorder.enter(node, self.emitter.position());
        }

        self.kind(&node.kind);

        if let Some(recorder) = &mut self.recorder {
            recorder.leave(node, self.emitter.position());
        }
    }

    pub fn finish(self) -> (String, Option<MappingRecorder>) {
        (self.emitter.finish(), self.recorder)
    }

    fn kind(&mut self, kind: &NodeKind) {
        match kind {
            NodeKind::StyleSheet { children }
            | NodeKind::AtrulePrelude { children }
            | NodeKind::Selector { children }
            | NodeKind::Value { children }
            | NodeKind::MediaQuery { children } => self.children(children),

            NodeKind::Atrule {
                name,
                prelude,
                block,
            } => {
                self.write("@");
                self.write(name);
                if let Some(prelude) = prelude {
                    self.write(" ");
                    self.node(prelude);
                }
                match block {
                    Some(block) => self.node(block),
                    None => self.write(";"),
                }
            }
            NodeKind::Rule { prelude, block } => {
                self.node(prelude);
                self.node(block);
            }
            NodeKind::Block { children } => {
                self.write("{");
                self.declarations(children);
                self.write("}");
            }
            NodeKind::DeclarationList { children } => self.declarations(children),
            NodeKind::Declaration {
                important,
                property,
                value,
            } => {
                self.write(property);
                self.write(":");
                self.node(value);
                if *important {
                    self.write("!important");
                }
            }

            // --- Selectors ---
            NodeKind::SelectorList { children } | NodeKind::MediaQueryList { children } => {
                self.join(children, ",")
            }
            NodeKind::TypeSelector { name } | NodeKind::Combinator { name } => self.write(name),
            NodeKind::IdSelector { name } => {
                self.write("#");
                self.write(name);
            }
            NodeKind::ClassSelector { name } => {
                self.write(".");
                self.write(name);
            }
            NodeKind::AttributeSelector {
                name,
                matcher,
                value,
                flags,
            } => {
                self.write("[");
                self.write(name);
                if let Some(matcher) = matcher {
                    self.write(matcher);
                    if let Some(value) = value {
                        self.node(value);
                    }
                }
                if let Some(flags) = flags {
                    self.write(" ");
                    self.write(flags);
                }
                self.write("]");
            }
            NodeKind::PseudoClassSelector { name, children } => {
                self.write(":");
                self.pseudo(name, children.as_deref());
            }
            NodeKind::PseudoElementSelector { name, children } => {
                self.write("::");
                self.pseudo(name, children.as_deref());
            }
            NodeKind::Nth { nth, selector } => {
                self.node(nth);
                if let Some(selector) = selector {
                    self.write(" of ");
                    self.node(selector);
                }
            }
            NodeKind::AnPlusB { a, b } => {
                let text = an_plus_b(a.as_deref(), b.as_deref());
                self.write(&text);
            }

            // --- Values ---
            NodeKind::Identifier { name } => self.write(name),
            NodeKind::Number { value }
            | NodeKind::String { value }
            | NodeKind::Raw { value }
            | NodeKind::UnicodeRange { value }
            | NodeKind::Operator { value }
            | NodeKind::WhiteSpace { value } => self.write(value),
            NodeKind::Dimension { value, unit } => {
                self.write(value);
                self.write(unit);
            }
            NodeKind::Percentage { value } => {
                self.write(value);
                self.write("%");
            }
            NodeKind::Hash { value } => {
                self.write("#");
                self.write(value);
            }
            NodeKind::Url { value } => {
                self.write("url(");
                self.node(value);
                self.write(")");
            }
            NodeKind::Function { name, children } => {
                self.write(name);
                self.write("(");
                self.children(children);
                self.write(")");
            }
            NodeKind::Parentheses { children } => {
                self.write("(");
                self.children(children);
                self.write(")");
            }
            NodeKind::Brackets { children } => {
                self.write("[");
                self.children(children);
                self.write("]");
            }
            NodeKind::Comment { value } => {
                self.write("/*");
                self.write(value);
                self.write("*/");
            }

            // --- Media queries ---
            NodeKind::MediaFeature { name, value } => {
                self.write("(");
                self.write(name);
                if let Some(value) = value {
                    self.write(":");
                    self.node(value);
                }
                self.write(")");
            }
            NodeKind::Ratio { left, right } => {
                self.write(left);
                self.write("/");
                self.write(right);
            }

            NodeKind::Cdo => self.write("<!--"),
            NodeKind::Cdc => self.write("-->"),
        }
    }

    fn pseudo(&mut self, name: &str, children: Option<&[Node]>) {
        self.write(name);
        if let Some(children) = children {
            self.write("(");
            self.children(children);
            self.write(")");
        }
    }

    fn children(&mut self, children: &[Node]) {
        for child in children {
            self.node(child);
        }
    }

    fn join(&mut self, children: &[Node], separator: &str) {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            self.node(child);
        }
    }

    /// Block contents: `;` after each declaration that has a next sibling.
    fn declarations(&mut self, children: &[Node]) {
        for (i, child) in children.iter().enumerate() {
            self.node(child);
            if matches!(child.kind, NodeKind::Declaration { .. }) && i + 1 < children.len() {
                self.write(";");
            }
        }
    }

    fn write(&mut self, text: &str) {
        self.emitter.write(text);
    }
}

/// Render `An+B` from its stored coefficients.
pub fn an_plus_b(a: Option<&str>, b: Option<&str>) -> String {
    let mut out = String::new();
    match a {
        Some(a) => {
            match a {
                "1" => out.push('n'),
                "+1" => out.push_str("+n"),
                "-1" => out.push_str("-n"),
                other => {
                    out.push_str(other);
                    out.push('n');
                }
            }
            if let Some(b) = b {
                if !b.starts_with(['+', '-']) {
                    out.push('+');
                }
                out.push_str(b);
            }
        }
        None => {
            if let Some(b) = b {
                out.push_str(b);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;
    use cascade_parser::{ParseOptions, Parser};
    use pretty_assertions::assert_eq;

    fn node(kind: NodeKind) -> Node {
        Node::new(kind)
    }

    fn ident(name: &str) -> Node {
        node(NodeKind::Identifier { name: name.into() })
    }

    fn gen(source: &str) -> String {
        let ast = Parser::parse(source, &ParseOptions::default()).unwrap();
        generate(&ast)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    #[test]
    fn test_empty_stylesheet() {
        assert_eq!(generate(&node(NodeKind::StyleSheet { children: vec![] })), "");
    }

    #[test]
    fn test_rule_is_minified() {
        assert_eq!(gen(".a {\n  color: red;\n}\n"), ".a{color:red}");
    }

    #[test]
    fn test_semicolons_only_between_declarations() {
        assert_eq!(
            gen("a { display: block; float: left; }"),
            "a{display:block;float:left}"
        );
    }

    #[test]
    fn test_declaration_list_without_braces() {
        let list = node(NodeKind::DeclarationList {
            children: vec![
                node(NodeKind::Declaration {
                    important: false,
                    property: "color".into(),
                    value: Box::new(node(NodeKind::Value { children: vec![ident("red")] })),
                }),
                node(NodeKind::Declaration {
                    important: true,
                    property: "top".into(),
                    value: Box::new(node(NodeKind::Value {
                        children: vec![node(NodeKind::Number { value: "0".into() })],
                    })),
                }),
            ],
        });
        assert_eq!(generate(&list), "color:red;top:0!important");
    }

    #[test]
    fn test_statement_atrule() {
        assert_eq!(gen("@charset \"utf-8\" ;"), "@charset \"utf-8\";");
    }

    #[test]
    fn test_atrule_without_prelude() {
        assert_eq!(
            gen("@font-face { font-family: x }"),
            "@font-face{font-family:x}"
        );
    }

    #[test]
    fn test_nested_atrule() {
        assert_eq!(
            gen("@media screen and (max-width: 600px) {\n  .a { color: red }\n  .b { color: blue }\n}"),
            "@media screen and (max-width:600px){.a{color:red}.b{color:blue}}"
        );
    }

    #[test]
    fn test_top_level_comment_and_markers() {
        assert_eq!(gen("<!-- /* hi */ a {} -->"), "<!--/* hi */a{}-->");
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    #[test]
    fn test_selector_list_and_combinators() {
        assert_eq!(gen("a , b > c  d ~ e + f {}"), "a,b>c d~e+f{}");
    }

    #[test]
    fn test_attribute_selectors() {
        assert_eq!(
            gen("[ disabled ] , [ href ^= \"http\" i ] , [lang|=en] {}"),
            "[disabled],[href^=\"http\" i],[lang|=en]{}"
        );
    }

    #[test]
    fn test_pseudo_selectors() {
        assert_eq!(
            gen("a:hover::before , :not( .a , .b ) {}"),
            "a:hover::before,:not(.a,.b){}"
        );
    }

    #[test]
    fn test_nth_selectors() {
        assert_eq!(
            gen("li:nth-child( 2n + 1 of .item ), li:nth-last-child(-n+3), li:nth-of-type(odd) {}"),
            "li:nth-child(2n+1 of .item),li:nth-last-child(-n+3),li:nth-of-type(odd){}"
        );
    }

    #[test]
    fn test_raw_prelude() {
        assert_eq!(
            gen("@keyframes x { 0% { opacity: 0 } to { opacity: 1 } }"),
            "@keyframes x{0%{opacity:0}to{opacity:1}}"
        );
    }

    // =========================================================================
    // Values
    // =========================================================================

    #[test]
    fn test_value_whitespace() {
        assert_eq!(
            gen("a { margin : 0   auto ; font: 12px / 1.5 a , b }"),
            "a{margin:0 auto;font:12px/1.5 a,b}"
        );
    }

    #[test]
    fn test_functions_and_urls() {
        assert_eq!(
            gen("a { width: calc( 100% - 10px ); background: url( a.png ), url( \"b.png\" ) }"),
            "a{width:calc(100% - 10px);background:url(a.png),url(\"b.png\")}"
        );
    }

    #[test]
    fn test_important_and_hash() {
        assert_eq!(gen("a { color: #FFF !important }"), "a{color:#FFF!important}");
    }

    #[test]
    fn test_custom_property_kept_verbatim() {
        assert_eq!(gen("a { --x:  { a: b }  ; }"), "a{--x:{ a: b }}");
    }

    #[test]
    fn test_media_feature_and_ratio() {
        let feature = node(NodeKind::MediaFeature {
            name: "aspect-ratio".into(),
            value: Some(Box::new(node(NodeKind::Ratio {
                left: "16".into(),
                right: "9".into(),
            }))),
        });
        assert_eq!(generate(&feature), "(aspect-ratio:16/9)");
        assert_eq!(gen("@media (min-aspect-ratio: 16 / 9) {}"), "@media (min-aspect-ratio:16/9){}");
    }

    // =========================================================================
    // An+B
    // =========================================================================

    #[test]
    fn test_an_plus_b() {
        assert_eq!(an_plus_b(Some("1"), None), "n");
        assert_eq!(an_plus_b(Some("+1"), Some("2")), "+n+2");
        assert_eq!(an_plus_b(Some("-1"), Some("-3")), "-n-3");
        assert_eq!(an_plus_b(Some("2"), Some("+1")), "2n+1");
        assert_eq!(an_plus_b(Some("0"), None), "0n");
        assert_eq!(an_plus_b(None, Some("5")), "5");
        assert_eq!(an_plus_b(None, None), "");
    }
}
