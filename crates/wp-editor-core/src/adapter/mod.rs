//! The uniform editor contract and its three engine adapters.
//!
//! Every adapter guarantees the same things regardless of the engine:
//! `on_user_edit` runs for user driven modifications only (never for
//! [`EditorEngineAdapter::set_value`]), `set_value` keeps the caret where
//! it can and otherwise drops it at the end of the document, and
//! `destroy` is idempotent.

mod jar;
mod mirror;
mod studio;

pub use jar::JarAdapter;
pub use mirror::{MirrorAdapter, MirrorOptions};
pub use studio::StudioAdapter;

use crate::error::EditorError;
use crate::jar::JarOptions;
use crate::studio::StudioOptions;
use crate::surface::Surface;
use crate::types::{EngineKind, InputEvent, Selection};

/// Called with the full text after every user edit.
pub type UserEditCallback = Box<dyn FnMut(&str)>;

/// One editing engine behind the uniform contract.
pub trait EditorEngineAdapter {
    fn kind(&self) -> EngineKind;

    /// Current text, verbatim.
    fn get_value(&self) -> String;

    /// Replace the content without notifying `on_user_edit`.
    fn set_value(&mut self, text: &str);

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// Deliver a user input event from the mount surface.
    fn input(&mut self, event: InputEvent);

    /// Release listeners, surface nodes and engine resources. Idempotent.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;

    /// Highlighted markup, for engines that render through a runtime.
    fn highlighted_html(&self) -> Option<String> {
        None
    }
}

/// Per-engine presentation options. The variant picks the engine.
#[derive(Clone, Debug)]
pub enum EngineOptions {
    Jar(JarOptions),
    Mirror(MirrorOptions),
    Studio(StudioOptions),
}

impl EngineOptions {
    /// Default options for an engine kind.
    pub fn for_kind(kind: EngineKind) -> Self {
        match kind {
            EngineKind::Jar => EngineOptions::Jar(JarOptions::default()),
            EngineKind::Mirror => EngineOptions::Mirror(MirrorOptions::default()),
            EngineKind::Studio => EngineOptions::Studio(StudioOptions::default()),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            EngineOptions::Jar(_) => EngineKind::Jar,
            EngineOptions::Mirror(_) => EngineKind::Mirror,
            EngineOptions::Studio(_) => EngineKind::Studio,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::for_kind(EngineKind::default())
    }
}

impl From<EngineKind> for EngineOptions {
    fn from(kind: EngineKind) -> Self {
        Self::for_kind(kind)
    }
}

/// Construct the engine picked by `options` on `surface`, seeded with
/// `initial`.
pub fn initialize(
    surface: Option<&Surface>,
    options: EngineOptions,
    initial: &str,
    on_user_edit: UserEditCallback,
) -> Result<Box<dyn EditorEngineAdapter>, EditorError> {
    let Some(surface) = surface else {
        tracing::warn!(target: "wp_editor::adapter", kind = %options.kind(), "no mount surface");
        return Err(EditorError::MissingSurface);
    };

    let adapter: Box<dyn EditorEngineAdapter> = match options {
        EngineOptions::Jar(options) => {
            Box::new(JarAdapter::new(surface, options, initial, on_user_edit))
        }
        EngineOptions::Mirror(options) => {
            Box::new(MirrorAdapter::new(surface, options, initial, on_user_edit))
        }
        EngineOptions::Studio(options) => {
            Box::new(StudioAdapter::new(surface, options, initial, on_user_edit))
        }
    };
    tracing::debug!(
        target: "wp_editor::adapter",
        kind = %adapter.kind(),
        surface = %surface.id(),
        "engine initialized"
    );
    Ok(adapter)
}

/// Shared fallback when a caret can not be carried across `set_value`.
pub(crate) fn log_caret_fallback(kind: EngineKind, err: &crate::error::CaretError) {
    tracing::debug!(
        target: "wp_editor::caret",
        %kind,
        error = %err,
        "caret restore failed, moving caret to end"
    );
}
