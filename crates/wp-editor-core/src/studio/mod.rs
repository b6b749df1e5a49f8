//! IDE-grade editor.
//!
//! A `StudioEditor` owns a [`TextModel`] and a selection, routes key presses
//! through a command table and raises [`ContentChangeEvent`]s for every
//! model change. Replacing the whole value raises a *flush* event and
//! resets the cursor to the top of the document; callers that want the
//! caret kept capture a [`ViewState`] before and restore it afterwards.

mod folding;
mod model;
mod runtime;

pub use folding::{FoldingRange, compute_folding_ranges};
pub use model::{ContentChange, ContentChangeEvent, Position, TextModel};
pub use runtime::StudioRuntime;

use std::collections::HashMap;
use std::sync::Arc;

use smol_str::{SmolStr, ToSmolStr};

use crate::error::CaretError;
use crate::surface::{NodeId, Surface};
use crate::types::Selection;

/// Maximum number of undo steps.
const UNDO_LIMIT: usize = 200;

#[derive(Clone, Debug)]
pub struct StudioOptions {
    pub tab_size: usize,
    /// Tab inserts spaces instead of a tab character.
    pub insert_spaces: bool,
    pub folding: bool,
    pub line_numbers: bool,
    pub language: SmolStr,
    /// Highlighting runtime; `None` uses the shared runtime once loaded.
    pub runtime: Option<Arc<StudioRuntime>>,
}

impl Default for StudioOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
            folding: true,
            line_numbers: true,
            language: SmolStr::new_static("javascript"),
            runtime: None,
        }
    }
}

/// Keys the command table can bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    Enter,
    Backspace,
    Delete,
    /// Ctrl/Cmd+Z
    Undo,
    /// Ctrl/Cmd+Shift+Z
    Redo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    /// Type text at the selection, as if entered from the keyboard.
    Type(SmolStr),
    NewLine,
    DeleteLeft,
    DeleteRight,
    Undo,
    Redo,
}

/// Cursor and scroll state captured by [`StudioEditor::save_view_state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub selection_start: Position,
    pub position: Position,
    /// First visible line.
    pub scroll_top: usize,
}

#[derive(Debug, Clone)]
struct EditOperation {
    pos: usize,
    deleted: SmolStr,
    inserted: SmolStr,
    selection_before: Selection,
}

type ContentListener = Box<dyn FnMut(&ContentChangeEvent, &TextModel)>;

pub struct StudioEditor {
    surface: Surface,
    nodes: Vec<NodeId>,
    model: TextModel,
    selection: Selection,
    scroll_top: usize,
    options: StudioOptions,
    commands: HashMap<KeyCode, EditorCommand>,
    listeners: Vec<ContentListener>,
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    disposed: bool,
}

impl StudioEditor {
    pub fn new(surface: &Surface, value: &str, options: StudioOptions) -> Self {
        let mut nodes = vec![surface.attach("monaco-editor")];
        if options.line_numbers {
            nodes.push(surface.attach("line-numbers"));
        }

        let tab = if options.insert_spaces {
            " ".repeat(options.tab_size).to_smolstr()
        } else {
            SmolStr::new_static("\t")
        };
        let commands = HashMap::from([
            (KeyCode::Tab, EditorCommand::Type(tab)),
            (KeyCode::Enter, EditorCommand::NewLine),
            (KeyCode::Backspace, EditorCommand::DeleteLeft),
            (KeyCode::Delete, EditorCommand::DeleteRight),
            (KeyCode::Undo, EditorCommand::Undo),
            (KeyCode::Redo, EditorCommand::Redo),
        ]);

        Self {
            surface: surface.clone(),
            nodes,
            model: TextModel::new(value, options.language.clone()),
            selection: Selection::default(),
            scroll_top: 1,
            options,
            commands,
            listeners: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            disposed: false,
        }
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn options(&self) -> &StudioOptions {
        &self.options
    }

    pub fn get_value(&self) -> String {
        self.model.get_value()
    }

    /// Replace the whole value. Raises a flush event, resets the cursor to
    /// 1:1 and clears the undo stack.
    pub fn set_value(&mut self, value: &str) {
        if self.disposed {
            return;
        }
        let event = self.model.set_value(value);
        self.selection = Selection::default();
        self.scroll_top = 1;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.emit(&event);
    }

    /// Listen for model changes. The listener sees the model after the change.
    pub fn on_did_change_model_content(
        &mut self,
        listener: impl FnMut(&ContentChangeEvent, &TextModel) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    /// Bind a key to a command, replacing any existing binding.
    pub fn add_command(&mut self, key: KeyCode, command: EditorCommand) {
        self.commands.insert(key, command);
    }

    pub fn command_for(&self, key: KeyCode) -> Option<&EditorCommand> {
        self.commands.get(&key)
    }

    // === Cursor ===

    pub fn get_position(&self) -> Position {
        self.model.get_position_at(self.selection.head)
    }

    pub fn set_position(&mut self, position: Position) {
        let offset = self.model.get_offset_at(position);
        self.selection = Selection::collapsed(offset);
    }

    /// Selection as char offsets.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.model.len_chars());
    }

    pub fn set_scroll_top(&mut self, line_number: usize) {
        self.scroll_top = line_number.clamp(1, self.model.get_line_count());
    }

    pub fn save_view_state(&self) -> ViewState {
        ViewState {
            selection_start: self.model.get_position_at(self.selection.anchor),
            position: self.model.get_position_at(self.selection.head),
            scroll_top: self.scroll_top,
        }
    }

    /// Restore a saved view state. Fails if either position is not in the
    /// current model.
    pub fn restore_view_state(&mut self, state: &ViewState) -> Result<(), CaretError> {
        for position in [state.selection_start, state.position] {
            if !self.model.is_valid_position(position) {
                return Err(CaretError::InvalidPosition {
                    line: position.line_number,
                    column: position.column,
                });
            }
        }
        self.selection = Selection::new(
            self.model.get_offset_at(state.selection_start),
            self.model.get_offset_at(state.position),
        );
        self.set_scroll_top(state.scroll_top);
        Ok(())
    }

    // === Commands ===

    /// Run the command bound to `key`. Returns false if the key is unbound.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.commands.get(&key).cloned() {
            Some(command) => {
                self.execute(&command);
                true
            }
            None => false,
        }
    }

    pub fn execute(&mut self, command: &EditorCommand) {
        if self.disposed {
            return;
        }
        match command {
            EditorCommand::Type(text) => self.trigger_type(text),
            EditorCommand::NewLine => self.new_line(),
            EditorCommand::DeleteLeft => {
                let sel = self.selection;
                if sel.is_collapsed() && sel.head > 0 {
                    self.edit(sel.head - 1..sel.head, "");
                } else if !sel.is_collapsed() {
                    self.edit(sel.to_range(), "");
                }
            }
            EditorCommand::DeleteRight => {
                let sel = self.selection;
                if sel.is_collapsed() && sel.head < self.model.len_chars() {
                    self.edit(sel.head..sel.head + 1, "");
                } else if !sel.is_collapsed() {
                    self.edit(sel.to_range(), "");
                }
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
        }
    }

    /// Type text over the selection.
    pub fn trigger_type(&mut self, text: &str) {
        if self.disposed {
            return;
        }
        self.edit(self.selection.to_range(), text);
    }

    pub fn undo(&mut self) {
        if self.disposed {
            return;
        }
        let Some(op) = self.undo_stack.pop() else {
            return;
        };
        let end = op.pos + op.inserted.chars().count();
        let (event, _) = self.model.apply_edit(op.pos..end, &op.deleted);
        self.selection = op.selection_before.clamp(self.model.len_chars());
        self.redo_stack.push(op);
        self.emit(&event);
    }

    pub fn redo(&mut self) {
        if self.disposed {
            return;
        }
        let Some(op) = self.redo_stack.pop() else {
            return;
        };
        let end = op.pos + op.deleted.chars().count();
        let (event, _) = self.model.apply_edit(op.pos..end, &op.inserted);
        self.selection = Selection::collapsed(op.pos + op.inserted.chars().count());
        self.undo_stack.push(op);
        self.emit(&event);
    }

    // === Presentation ===

    pub fn folding_ranges(&self) -> Vec<FoldingRange> {
        if !self.options.folding {
            return Vec::new();
        }
        compute_folding_ranges(&self.model, self.options.tab_size)
    }

    pub fn line_numbers(&self) -> Vec<usize> {
        if !self.options.line_numbers {
            return Vec::new();
        }
        (1..=self.model.get_line_count()).collect()
    }

    /// Highlighted markup, once a runtime is available.
    ///
    /// Without an explicit runtime the shared one is picked up as soon as
    /// [`StudioRuntime::load`] has finished.
    pub fn highlighted_html(&self) -> Option<String> {
        let runtime = self.options.runtime.clone().or_else(StudioRuntime::get)?;
        match runtime.highlight_html(&self.model.get_value(), self.model.language()) {
            Ok(html) => Some(html),
            Err(err) => {
                tracing::warn!(target: "wp_editor::studio", error = %err, "highlighting failed");
                None
            }
        }
    }

    // === Lifecycle ===

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for node in self.nodes.drain(..) {
            self.surface.detach(node);
        }
        self.listeners.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::debug!(target: "wp_editor::studio", surface = %self.surface.id(), "editor disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // === Internals ===

    fn new_line(&mut self) {
        let line = self.get_position().line_number;
        let indent: String = self
            .model
            .get_line_content(line)
            .unwrap_or_default()
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        self.edit(self.selection.to_range(), &format!("\n{indent}"));
    }

    fn edit(&mut self, range: std::ops::Range<usize>, text: &str) {
        let selection_before = self.selection;
        let (event, deleted) = self.model.apply_edit(range.clone(), text);
        self.selection = Selection::collapsed(range.start + text.chars().count());

        self.redo_stack.clear();
        self.undo_stack.push(EditOperation {
            pos: range.start,
            deleted,
            inserted: text.into(),
            selection_before,
        });
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }

        self.emit(&event);
    }

    fn emit(&mut self, event: &ContentChangeEvent) {
        for listener in &mut self.listeners {
            listener(event, &self.model);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn editor(value: &str) -> (StudioEditor, Rc<RefCell<Vec<ContentChangeEvent>>>) {
        let surface = Surface::new("studio-test");
        let mut editor = StudioEditor::new(&surface, value, StudioOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        editor.on_did_change_model_content(move |event, _| sink.borrow_mut().push(event.clone()));
        (editor, seen)
    }

    #[test]
    fn set_value_flushes_and_resets_cursor() {
        let (mut editor, seen) = editor("abc");
        editor.set_position(Position::new(1, 3));
        editor.set_value("xyz\nw");
        assert_eq!(editor.get_position(), Position::new(1, 1));
        assert!(seen.borrow()[0].is_flush);
    }

    #[test]
    fn typing_raises_incremental_events() {
        let (mut editor, seen) = editor("ac");
        editor.set_position(Position::new(1, 2));
        editor.trigger_type("b");
        assert_eq!(editor.get_value(), "abc");
        assert_eq!(editor.get_position(), Position::new(1, 3));
        let events = seen.borrow();
        assert!(!events[0].is_flush);
        assert_eq!(events[0].changes[0].range_offset, 1);
    }

    #[test]
    fn tab_binding_can_be_replaced() {
        let (mut editor, _) = editor("");
        editor.handle_key(KeyCode::Tab);
        assert_eq!(editor.get_value(), "    ");
        editor.add_command(KeyCode::Tab, EditorCommand::Type("\t".into()));
        editor.handle_key(KeyCode::Tab);
        assert_eq!(editor.get_value(), "    \t");
    }

    #[test]
    fn view_state_round_trip_and_rejection() {
        let (mut editor, _) = editor("one\ntwo\nthree");
        editor.set_selection(Selection::new(4, 6));
        let state = editor.save_view_state();
        assert_eq!(state.selection_start, Position::new(2, 1));
        assert_eq!(state.position, Position::new(2, 3));

        editor.set_value("one");
        assert_eq!(
            editor.restore_view_state(&state),
            Err(CaretError::InvalidPosition { line: 2, column: 1 })
        );
        editor.set_value("one\ntwo!");
        assert!(editor.restore_view_state(&state).is_ok());
        assert_eq!(editor.selection(), Selection::new(4, 6));
    }

    #[test]
    fn undo_redo_and_delete() {
        let (mut editor, _) = editor("");
        editor.trigger_type("ab");
        editor.execute(&EditorCommand::DeleteLeft);
        assert_eq!(editor.get_value(), "a");
        editor.undo();
        assert_eq!(editor.get_value(), "ab");
        editor.redo();
        assert_eq!(editor.get_value(), "a");
        editor.handle_key(KeyCode::Undo);
        editor.handle_key(KeyCode::Undo);
        assert_eq!(editor.get_value(), "");
    }

    #[test]
    fn new_line_keeps_indent_and_folding_follows() {
        let (mut editor, _) = editor("if (x) {");
        editor.set_position(Position::new(1, 9));
        editor.handle_key(KeyCode::Enter);
        editor.trigger_type("    y();\n}");
        assert_eq!(editor.get_value(), "if (x) {\n    y();\n}");
        assert_eq!(editor.folding_ranges(), vec![FoldingRange { start: 1, end: 2 }]);
        assert_eq!(editor.line_numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn dispose_is_idempotent() {
        let surface = Surface::new("studio-dispose");
        let mut editor = StudioEditor::new(&surface, "", StudioOptions::default());
        assert_eq!(surface.child_count(), 2);
        editor.dispose();
        editor.dispose();
        assert!(editor.is_disposed());
        assert_eq!(surface.child_count(), 0);
    }
}
