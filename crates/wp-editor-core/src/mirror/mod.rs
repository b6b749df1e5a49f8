//! Modular, extension based editor.
//!
//! State changes only happen through [`Transaction`]s dispatched to an
//! [`EditorView`]. Each transaction carries a [`ChangeSet`] and an origin;
//! the selection is mapped through the changes unless the transaction sets
//! one explicitly, so a programmatic edit elsewhere in the document keeps
//! the caret where the user left it.

mod extension;
mod history;
mod state;

pub use extension::{Extension, UpdateListenerFn, ViewUpdate, basic_setup};
pub use history::History;
pub use state::{Assoc, ChangeSet, ChangeSpec, EditorState, Transaction, TransactionOrigin};

use smol_str::SmolStr;
use web_time::Instant;

use self::history::HistoryEvent;
use crate::highlight::{self, Grammar, Token};
use crate::surface::{NodeId, Surface};
use crate::text::TextBuffer;
use crate::types::Selection;

#[derive(Debug, Clone)]
struct ViewConfig {
    line_numbers: bool,
    indent_with_tab: bool,
    indent_unit: SmolStr,
    grammar: Option<&'static Grammar>,
    read_only: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            line_numbers: false,
            indent_with_tab: false,
            indent_unit: SmolStr::new_static("  "),
            grammar: None,
            read_only: false,
        }
    }
}

pub struct EditorView {
    surface: Surface,
    nodes: Vec<NodeId>,
    state: EditorState,
    config: ViewConfig,
    history: Option<History>,
    listeners: Vec<UpdateListenerFn>,
    tokens: Vec<Token>,
    destroyed: bool,
}

impl EditorView {
    pub fn new(surface: &Surface, doc: &str, extensions: Vec<Extension>) -> Self {
        let mut config = ViewConfig::default();
        let mut history = None;
        let mut listeners = Vec::new();
        for extension in extensions {
            match extension {
                Extension::LineNumbers => config.line_numbers = true,
                Extension::History { depth, group_delay } => {
                    history = Some(History::new(depth, group_delay))
                }
                Extension::IndentWithTab => config.indent_with_tab = true,
                Extension::IndentUnit(unit) => config.indent_unit = unit,
                Extension::Language(grammar) => config.grammar = Some(grammar),
                Extension::ReadOnly => config.read_only = true,
                Extension::UpdateListener(listener) => listeners.push(listener),
            }
        }

        let mut nodes = vec![surface.attach("cm-editor")];
        if config.line_numbers {
            nodes.push(surface.attach("cm-gutters"));
        }

        let mut view = Self {
            surface: surface.clone(),
            nodes,
            state: EditorState::new(doc),
            config,
            history,
            listeners,
            tokens: Vec::new(),
            destroyed: false,
        };
        view.highlight();
        view
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn add_update_listener(&mut self, listener: impl FnMut(&ViewUpdate<'_>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a transaction and notify update listeners.
    pub fn dispatch(&mut self, tr: Transaction) {
        if self.destroyed {
            tracing::trace!(target: "wp_editor::mirror", "dispatch after destroy ignored");
            return;
        }

        let selection_before = self.state.selection;
        let doc_changed = !tr.changes.is_empty();
        let inverse = doc_changed.then(|| tr.changes.invert(&self.state.doc));

        tr.changes.apply(&mut self.state.doc);
        let selection = tr
            .selection
            .unwrap_or_else(|| tr.changes.map_selection(selection_before));
        self.state.selection = selection.clamp(self.state.len_chars());

        if let (Some(history), Some(inverse)) = (self.history.as_mut(), inverse) {
            match tr.origin {
                // Recorded inverses refer to the old coordinates.
                TransactionOrigin::Programmatic => history.clear(),
                _ if tr.add_to_history => {
                    history.record(inverse, selection_before, Instant::now())
                }
                _ => {}
            }
        }

        if doc_changed {
            self.highlight();
        }
        self.notify(std::slice::from_ref(&tr.changes), doc_changed, tr.origin);
    }

    // === Commands ===

    /// Replace the selection with typed text.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let range = self.state.selection.to_range();
        let caret = range.start + text.chars().count();
        self.dispatch(
            Transaction::user(
                ChangeSet::single(range.start, range.end, text),
                TransactionOrigin::Input,
            )
            .with_selection(Selection::collapsed(caret)),
        );
        true
    }

    /// Insert a line break, keeping the current line's indentation.
    pub fn insert_newline_and_indent(&mut self) -> bool {
        let line = self.state.doc.char_to_line(self.state.selection.start());
        let indent: String = self
            .state
            .doc
            .line(line)
            .unwrap_or_default()
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        self.insert_text(&format!("\n{indent}"))
    }

    pub fn delete_char_backward(&mut self) -> bool {
        let selection = self.state.selection;
        if selection.is_collapsed() {
            if selection.head == 0 {
                return false;
            }
            self.delete_range(selection.head - 1, selection.head)
        } else {
            self.delete_range(selection.start(), selection.end())
        }
    }

    pub fn delete_char_forward(&mut self) -> bool {
        let selection = self.state.selection;
        if selection.is_collapsed() {
            if selection.head >= self.state.len_chars() {
                return false;
            }
            self.delete_range(selection.head, selection.head + 1)
        } else {
            self.delete_range(selection.start(), selection.end())
        }
    }

    /// Tab key. Indents the selected lines when `IndentWithTab` is enabled;
    /// otherwise the key is not handled and focus would move on.
    pub fn handle_tab(&mut self) -> bool {
        if !self.config.indent_with_tab || !self.accepts_input() {
            return false;
        }
        let selection = self.state.selection;
        let first = self.state.doc.char_to_line(selection.start());
        let last = self.state.doc.char_to_line(selection.end());
        let specs = (first..=last)
            .map(|line| {
                let at = self.state.doc.line_to_char(line);
                ChangeSpec {
                    from: at,
                    to: at,
                    insert: self.config.indent_unit.clone(),
                }
            })
            .collect();
        self.dispatch(Transaction::user(
            ChangeSet::of(specs),
            TransactionOrigin::Input,
        ));
        true
    }

    pub fn select(&mut self, selection: Selection) {
        let selection = selection.clamp(self.state.len_chars());
        if let Some(history) = self.history.as_mut() {
            history.break_group();
        }
        self.dispatch(Transaction::select(selection));
    }

    pub fn undo(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(event) = self.history.as_mut().and_then(History::pop_undo) else {
            return false;
        };
        let reverted = self.revert(event, TransactionOrigin::Undo);
        if let Some(history) = self.history.as_mut() {
            history.push_undone(reverted);
        }
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(event) = self.history.as_mut().and_then(History::pop_redo) else {
            return false;
        };
        let reverted = self.revert(event, TransactionOrigin::Redo);
        if let Some(history) = self.history.as_mut() {
            history.push_done(reverted);
        }
        true
    }

    // === Presentation ===

    /// Line numbers shown in the gutter; empty without `LineNumbers`.
    pub fn gutter(&self) -> Vec<usize> {
        if !self.config.line_numbers {
            return Vec::new();
        }
        (1..=self.state.doc.len_lines()).collect()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn html(&self) -> String {
        highlight::render_html(&self.state.text(), &self.tokens)
    }

    pub fn can_undo(&self) -> bool {
        self.history.as_ref().is_some_and(History::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history.as_ref().is_some_and(History::can_redo)
    }

    // === Lifecycle ===

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for node in self.nodes.drain(..) {
            self.surface.detach(node);
        }
        self.listeners.clear();
        self.history = None;
        tracing::debug!(target: "wp_editor::mirror", surface = %self.surface.id(), "view destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // === Internals ===

    fn accepts_input(&self) -> bool {
        !self.destroyed && !self.config.read_only
    }

    fn delete_range(&mut self, from: usize, to: usize) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.dispatch(
            Transaction::user(ChangeSet::single(from, to, ""), TransactionOrigin::Delete)
                .with_selection(Selection::collapsed(from)),
        );
        true
    }

    /// Apply a history event and return the event that reverses it.
    fn revert(&mut self, event: HistoryEvent, origin: TransactionOrigin) -> HistoryEvent {
        let selection_before = self.state.selection;
        let mut inverses = Vec::with_capacity(event.changes.len());
        let mut applied = Vec::with_capacity(event.changes.len());
        for changes in event.changes.into_iter().rev() {
            inverses.push(changes.invert(&self.state.doc));
            changes.apply(&mut self.state.doc);
            self.state.selection = changes.map_selection(self.state.selection);
            applied.push(changes);
        }
        if let Some(selection) = event.selection {
            self.state.selection = selection;
        }
        self.state.selection = self.state.selection.clamp(self.state.len_chars());

        self.highlight();
        self.notify(&applied, true, origin);

        HistoryEvent {
            changes: inverses,
            selection: Some(selection_before),
        }
    }

    fn notify(&mut self, changes: &[ChangeSet], doc_changed: bool, origin: TransactionOrigin) {
        for listener in &mut self.listeners {
            listener(&ViewUpdate {
                state: &self.state,
                changes,
                doc_changed,
                origin,
            });
        }
    }

    fn highlight(&mut self) {
        self.tokens = match self.config.grammar {
            Some(grammar) => grammar.tokenize(&self.state.text()),
            None => Vec::new(),
        };
    }
}
