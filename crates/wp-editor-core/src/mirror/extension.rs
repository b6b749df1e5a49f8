//! Composable view extensions.

use std::fmt;
use std::time::Duration;

use smol_str::SmolStr;

use super::history::{DEFAULT_DEPTH, DEFAULT_GROUP_DELAY};
use super::state::{ChangeSet, EditorState, TransactionOrigin};
use crate::highlight::Grammar;

/// What a dispatched transaction did, as seen by update listeners.
pub struct ViewUpdate<'a> {
    pub state: &'a EditorState,
    pub changes: &'a [ChangeSet],
    pub doc_changed: bool,
    pub origin: TransactionOrigin,
}

pub type UpdateListenerFn = Box<dyn FnMut(&ViewUpdate<'_>)>;

/// A feature mixed into an [`EditorView`](super::EditorView).
pub enum Extension {
    /// Render a line number gutter.
    LineNumbers,
    /// Undo/redo history.
    History { depth: usize, group_delay: Duration },
    /// Bind Tab to indenting the selected lines.
    IndentWithTab,
    /// Text inserted per indentation level.
    IndentUnit(SmolStr),
    /// Syntax highlighting grammar.
    Language(&'static Grammar),
    /// Reject user edits.
    ReadOnly,
    UpdateListener(UpdateListenerFn),
}

impl Extension {
    pub fn history() -> Self {
        Extension::History {
            depth: DEFAULT_DEPTH,
            group_delay: DEFAULT_GROUP_DELAY,
        }
    }

    pub fn update_listener(listener: impl FnMut(&ViewUpdate<'_>) + 'static) -> Self {
        Extension::UpdateListener(Box::new(listener))
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extension::LineNumbers => f.write_str("LineNumbers"),
            Extension::History { depth, group_delay } => f
                .debug_struct("History")
                .field("depth", depth)
                .field("group_delay", group_delay)
                .finish(),
            Extension::IndentWithTab => f.write_str("IndentWithTab"),
            Extension::IndentUnit(unit) => f.debug_tuple("IndentUnit").field(unit).finish(),
            Extension::Language(grammar) => {
                f.debug_tuple("Language").field(&grammar.name()).finish()
            }
            Extension::ReadOnly => f.write_str("ReadOnly"),
            Extension::UpdateListener(_) => f.write_str("UpdateListener(..)"),
        }
    }
}

/// Line numbers, history, tab indentation and JavaScript highlighting.
pub fn basic_setup() -> Vec<Extension> {
    vec![
        Extension::LineNumbers,
        Extension::history(),
        Extension::IndentWithTab,
        Extension::Language(Grammar::javascript()),
    ]
}
