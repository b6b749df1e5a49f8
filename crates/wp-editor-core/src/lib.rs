//! wp-editor-core: pluggable code editors behind one uniform contract.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage, with the ropey-backed `EditorRope`
//! - three independent editing engines: [`jar`] (minimal highlighting),
//!   [`mirror`] (modular, extension based) and [`studio`] (IDE-grade)
//! - [`EditorEngineAdapter`], the contract each engine is wrapped in
//! - [`EditorHost`], which owns one adapter and bridges a controlled
//!   `value`/`on_change` pair to it without edit loops
//!
//! Everything here is single-threaded and DOM-free. Engines mount onto a
//! [`Surface`] placeholder that platform layers map onto real elements.

pub mod adapter;
pub mod caret;
pub mod error;
pub mod highlight;
pub mod host;
pub mod jar;
pub mod mirror;
pub mod studio;
pub mod surface;
pub mod text;
pub mod types;

pub use adapter::{
    EditorEngineAdapter, EngineOptions, JarAdapter, MirrorAdapter, StudioAdapter,
    UserEditCallback, initialize,
};
pub use caret::{TextDiff, relocate, relocate_selection};
pub use error::{CaretError, EditorError};
pub use highlight::{Grammar, Token, TokenKind};
pub use host::{ChangeCallback, EditorHandle, EditorHost, HostPhase, HostProps};
pub use smol_str::SmolStr;
pub use surface::{NodeId, Surface};
pub use text::{EditorRope, TextBuffer};
pub use types::{EngineKind, InputEvent, Selection};
