//! WASM bindings for the wp-editor host.
//!
//! Exposes [`JsEditorHost`], a controlled editor usable from any JS
//! framework, and [`build_outline`] for the help-center navigation tree.

mod host;
mod outline;

pub use host::*;
pub use outline::*;

use wasm_bindgen::prelude::*;
use wp_editor_core::studio::StudioRuntime;

/// Install the panic hook and start loading the studio highlighting
/// runtime. Studio editors pick it up once the load finishes.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_bindgen_futures::spawn_local(async {
        let runtime = StudioRuntime::load().await;
        tracing::debug!(target: "wp_editor::js", ?runtime, "studio runtime ready");
    });
}
