//! Error types for editor hosting and caret restoration.

use thiserror::Error;

/// Errors surfaced by adapters and the editor host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// The engine was asked to mount without a surface.
    #[error("editor mount surface is missing")]
    MissingSurface,

    /// The host has no live engine (never mounted, or already unmounted).
    #[error("editor host is not mounted")]
    NotMounted,

    /// A second mount was attempted while an engine is live.
    #[error("editor host already owns a mounted engine")]
    AlreadyMounted,

    /// The host was unmounted; it can not be mounted again.
    #[error("editor host was destroyed")]
    Destroyed,

    /// A handle call re-entered the host while it was dispatching.
    #[error("editor host is busy dispatching an update")]
    Busy,
}

/// Failure to carry a caret across a content replacement.
///
/// Never surfaced to users: adapters recover by moving the caret to the
/// end of the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CaretError {
    /// The caret sat inside text that the replacement rewrote.
    #[error("caret offset {offset} fell inside replaced text {start}..{end}")]
    Invalidated {
        offset: usize,
        start: usize,
        end: usize,
    },

    /// The saved caret points past the end of the document.
    #[error("caret offset {offset} is out of bounds (length {len})")]
    OutOfBounds { offset: usize, len: usize },

    /// A line/column position does not exist in the model.
    #[error("position {line}:{column} is not valid in the model")]
    InvalidPosition { line: usize, column: usize },
}
