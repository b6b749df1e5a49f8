//! JsEditorHost - a controlled editor for JavaScript callers.

use wasm_bindgen::prelude::*;

use wp_editor_core::{
    EditorError, EditorHandle, EditorHost, EngineKind, HostProps, InputEvent, Selection, Surface,
};

fn js_error(err: EditorError) -> JsError {
    JsError::new(&err.to_string())
}

/// One mounted editor engine.
///
/// Mirrors a controlled component: pass the parent's value through
/// `setProps` on every render and receive user edits through the `onChange`
/// callback given at construction.
#[wasm_bindgen]
pub struct JsEditorHost {
    host: EditorHost,
    handle: EditorHandle,
}

#[wasm_bindgen]
impl JsEditorHost {
    /// Mount an engine (`"jar"`, `"mirror"` or `"studio"`) seeded with
    /// `value`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        value: &str,
        on_change: Option<js_sys::Function>,
    ) -> Result<JsEditorHost, JsError> {
        let kind: EngineKind = kind
            .parse()
            .map_err(|other| JsError::new(&format!("Unknown editor kind: {other}")))?;

        let mut props = HostProps::new(value, kind);
        if let Some(callback) = on_change {
            props = props.on_change(move |text: &str| {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(text)) {
                    tracing::warn!(target: "wp_editor::js", ?err, "onChange threw");
                }
            });
        }

        let mut host = EditorHost::new(Some(Surface::new(format!("wp-editor-{kind}"))));
        let handle = host.mount(props).map_err(js_error)?;
        Ok(Self { host, handle })
    }

    /// Engine name, or undefined once destroyed.
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> Option<String> {
        self.host.kind().map(|kind| kind.to_string())
    }

    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&self) -> Result<String, JsError> {
        self.handle.get_value().map_err(js_error)
    }

    /// Replace the content imperatively. Does not fire `onChange`.
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, value: &str) -> Result<(), JsError> {
        self.handle.set_value(value).map_err(js_error)
    }

    /// Apply the parent's current value. Returns true when the engine was
    /// updated.
    #[wasm_bindgen(js_name = setProps)]
    pub fn set_props(&mut self, value: &str) -> Result<bool, JsError> {
        self.host.set_props(value).map_err(js_error)
    }

    /// Type `text` at the caret as if the user did.
    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&self, text: &str) -> Result<(), JsError> {
        self.host
            .dispatch_input(InputEvent::insert(text))
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&self, anchor: usize, head: usize) -> Result<(), JsError> {
        self.handle
            .set_selection(Selection::new(anchor, head))
            .map_err(js_error)
    }

    /// Caret offset (selection head).
    #[wasm_bindgen(js_name = getCursor)]
    pub fn get_cursor(&self) -> Result<usize, JsError> {
        self.handle
            .selection()
            .map(|selection| selection.head)
            .map_err(js_error)
    }

    /// Highlighted markup for studio editors, once the runtime has loaded.
    #[wasm_bindgen(js_name = highlightedHtml)]
    pub fn highlighted_html(&self) -> Result<Option<String>, JsError> {
        self.handle.highlighted_html().map_err(js_error)
    }

    /// Tear down the engine. Safe to call twice.
    pub fn destroy(&mut self) {
        self.host.unmount();
    }
}
