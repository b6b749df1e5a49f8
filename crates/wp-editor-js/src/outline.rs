//! Outline bindings for the help-center navigation tree.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use wp_docs::OutlineNode;

/// A navigation tree node, shaped for tree widgets.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsOutlineNode {
    pub title: String,
    pub key: String,
    pub path: String,
    pub level: usize,
    pub children: Vec<JsOutlineNode>,
}

impl From<OutlineNode> for JsOutlineNode {
    fn from(node: OutlineNode) -> Self {
        Self {
            title: node.title,
            key: node.key,
            path: node.path,
            level: node.level,
            children: node.children.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsOutline {
    pub roots: Vec<JsOutlineNode>,
}

impl From<Vec<OutlineNode>> for JsOutline {
    fn from(forest: Vec<OutlineNode>) -> Self {
        Self {
            roots: forest.into_iter().map(Into::into).collect(),
        }
    }
}

/// Build the navigation forest from `SUMMARY.md` text.
#[wasm_bindgen(js_name = buildOutline)]
pub fn build_outline(markdown: &str) -> JsOutline {
    wp_docs::outline_from_markdown(markdown).into()
}

/// Build the forest and keep only nodes matching `query` and their
/// ancestors.
#[wasm_bindgen(js_name = filterOutline)]
pub fn filter_outline(markdown: &str, query: &str) -> JsOutline {
    let forest = wp_docs::outline_from_markdown(markdown);
    wp_docs::filter_forest(&forest, query).into()
}

/// The flat entry list, in document order.
#[wasm_bindgen(js_name = parseOutline)]
pub fn parse_outline(markdown: &str) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&wp_docs::parse(markdown))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Path of the document to open first, if any.
#[wasm_bindgen(js_name = firstDocument)]
pub fn first_document(markdown: &str) -> Option<String> {
    let entries = wp_docs::parse(markdown);
    wp_docs::first_document(&entries).map(|entry| entry.path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_nested_nodes() {
        let outline = build_outline("- [A](a.md)\n  - [B](b.md)\n- [C](c.md)\n");
        assert_eq!(outline.roots.len(), 2);
        assert_eq!(outline.roots[0].children[0].key, "B-b.md");
        assert_eq!(first_document("- [A](a.md)").as_deref(), Some("a.md"));
    }
}
