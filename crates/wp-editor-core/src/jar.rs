//! Minimal highlighting editor.
//!
//! `CodeJar` keeps its text as one `String` (what a contenteditable element
//! would hold as text content) plus a caret. Replacing the code drops the
//! caret to the end, so callers that care about the caret go through
//! [`CodeJar::save`] / [`CodeJar::restore`]. Update listeners run only for
//! user input, never for [`CodeJar::update_code`].

use smol_str::SmolStr;

use crate::error::CaretError;
use crate::highlight::{self, Grammar, Token};
use crate::surface::{NodeId, Surface};
use crate::text::char_to_byte;
use crate::types::Selection;

/// Maximum number of undo snapshots kept.
const HISTORY_LIMIT: usize = 300;

#[derive(Debug, Clone)]
pub struct JarOptions {
    /// Text inserted by the Tab key.
    pub tab: SmolStr,
    /// Carry the current line's indentation over on Enter.
    pub preserve_indent: bool,
    pub grammar: &'static Grammar,
}

impl Default for JarOptions {
    fn default() -> Self {
        Self {
            tab: SmolStr::new_static("\t"),
            preserve_indent: true,
            grammar: Grammar::javascript(),
        }
    }
}

/// Direction of a saved selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Caret position saved by [`CodeJar::save`], in char offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretSave {
    pub start: usize,
    pub end: usize,
    pub dir: Option<Direction>,
}

impl CaretSave {
    pub fn to_selection(&self) -> Selection {
        match self.dir {
            Some(Direction::Backward) => Selection::new(self.end, self.start),
            _ => Selection::new(self.start, self.end),
        }
    }

    pub fn from_selection(selection: Selection) -> Self {
        let dir = if selection.is_collapsed() {
            None
        } else if selection.is_backwards() {
            Some(Direction::Backward)
        } else {
            Some(Direction::Forward)
        };
        Self {
            start: selection.start(),
            end: selection.end(),
            dir,
        }
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    code: String,
    caret: Selection,
}

type UpdateListener = Box<dyn FnMut(&str)>;

pub struct CodeJar {
    surface: Surface,
    node: Option<NodeId>,
    code: String,
    caret: Selection,
    options: JarOptions,
    tokens: Vec<Token>,
    listeners: Vec<UpdateListener>,
    history: Vec<Snapshot>,
    at: usize,
}

impl CodeJar {
    pub fn new(surface: &Surface, options: JarOptions) -> Self {
        let node = surface.attach("codejar");
        let mut jar = Self {
            surface: surface.clone(),
            node: Some(node),
            code: String::new(),
            caret: Selection::default(),
            options,
            tokens: Vec::new(),
            listeners: Vec::new(),
            history: Vec::new(),
            at: 0,
        };
        jar.record_history();
        jar
    }

    pub fn on_update(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the whole code. Does not notify update listeners.
    pub fn update_code(&mut self, code: &str) {
        if self.is_destroyed() {
            tracing::trace!(target: "wp_editor::jar", "update_code after destroy ignored");
            return;
        }
        self.code.clear();
        self.code.push_str(code);
        self.caret = Selection::collapsed(self.len_chars());
        self.highlight();
        // Programmatic content starts a fresh history.
        self.history.clear();
        self.at = 0;
        self.record_history();
    }

    pub fn len_chars(&self) -> usize {
        self.code.chars().count()
    }

    pub fn caret(&self) -> Selection {
        self.caret
    }

    pub fn set_caret(&mut self, caret: Selection) {
        self.caret = caret.clamp(self.len_chars());
    }

    /// Save the current caret.
    pub fn save(&self) -> CaretSave {
        CaretSave::from_selection(self.caret)
    }

    /// Restore a saved caret. Fails if it no longer fits the text.
    pub fn restore(&mut self, pos: &CaretSave) -> Result<(), CaretError> {
        let len = self.len_chars();
        if pos.end > len {
            return Err(CaretError::OutOfBounds {
                offset: pos.end,
                len,
            });
        }
        self.caret = pos.to_selection();
        Ok(())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Highlighted markup of the current code.
    pub fn html(&self) -> String {
        highlight::render_html(&self.code, &self.tokens)
    }

    // === User input ===

    pub fn insert_text(&mut self, text: &str) {
        if self.is_destroyed() {
            return;
        }
        self.replace_selection(text);
        self.after_user_edit();
    }

    pub fn handle_new_line(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let mut text = String::from("\n");
        if self.options.preserve_indent {
            text.push_str(&self.current_indent());
        }
        self.replace_selection(&text);
        self.after_user_edit();
    }

    pub fn handle_tab(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let tab = self.options.tab.clone();
        self.replace_selection(&tab);
        self.after_user_edit();
    }

    pub fn delete_backward(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if self.caret.is_collapsed() {
            if self.caret.head == 0 {
                return;
            }
            self.caret = Selection::new(self.caret.head - 1, self.caret.head);
        }
        self.replace_selection("");
        self.after_user_edit();
    }

    pub fn delete_forward(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if self.caret.is_collapsed() {
            if self.caret.head >= self.len_chars() {
                return;
            }
            self.caret = Selection::new(self.caret.head, self.caret.head + 1);
        }
        self.replace_selection("");
        self.after_user_edit();
    }

    pub fn undo(&mut self) {
        if self.is_destroyed() || self.at == 0 {
            return;
        }
        self.at -= 1;
        self.apply_snapshot();
    }

    pub fn redo(&mut self) {
        if self.is_destroyed() || self.at + 1 >= self.history.len() {
            return;
        }
        self.at += 1;
        self.apply_snapshot();
    }

    // === Lifecycle ===

    pub fn destroy(&mut self) {
        let Some(node) = self.node.take() else {
            return;
        };
        self.surface.detach(node);
        self.listeners.clear();
        self.history.clear();
        self.at = 0;
        tracing::debug!(target: "wp_editor::jar", surface = %self.surface.id(), "jar destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.node.is_none()
    }

    // === Internals ===

    fn replace_selection(&mut self, text: &str) {
        let range = self.caret.to_range();
        let start = char_to_byte(&self.code, range.start);
        let end = char_to_byte(&self.code, range.end);
        self.code.replace_range(start..end, text);
        self.caret = Selection::collapsed(range.start + text.chars().count());
    }

    fn current_indent(&self) -> String {
        let caret = char_to_byte(&self.code, self.caret.start());
        let line_start = self.code[..caret].rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.code[line_start..caret]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    fn after_user_edit(&mut self) {
        self.highlight();
        self.record_history();
        for listener in &mut self.listeners {
            listener(&self.code);
        }
    }

    fn apply_snapshot(&mut self) {
        let Some(snapshot) = self.history.get(self.at).cloned() else {
            return;
        };
        self.code = snapshot.code;
        self.caret = snapshot.caret;
        self.highlight();
        for listener in &mut self.listeners {
            listener(&self.code);
        }
    }

    fn record_history(&mut self) {
        self.history.truncate(self.at + 1);
        self.history.push(Snapshot {
            code: self.code.clone(),
            caret: self.caret,
        });
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.at = self.history.len() - 1;
    }

    fn highlight(&mut self) {
        self.tokens = self.options.grammar.tokenize(&self.code);
    }
}

impl std::fmt::Display for CodeJar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn jar_with(code: &str) -> (CodeJar, Rc<RefCell<Vec<String>>>) {
        let surface = Surface::new("jar-test");
        let mut jar = CodeJar::new(&surface, JarOptions::default());
        jar.update_code(code);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        jar.on_update(move |code| sink.borrow_mut().push(code.to_string()));
        (jar, seen)
    }

    #[test]
    fn update_code_is_silent_and_moves_caret_to_end() {
        let (mut jar, seen) = jar_with("abc");
        jar.set_caret(Selection::collapsed(1));
        jar.update_code("abcdef");
        assert_eq!(jar.caret(), Selection::collapsed(6));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn undo_never_reaches_past_update_code() {
        let (mut jar, seen) = jar_with("");
        jar.insert_text("typed");
        jar.update_code("pushed");
        jar.undo();
        assert_eq!(jar.to_string(), "pushed");
        assert_eq!(*seen.borrow(), vec!["typed".to_string()]);
        jar.insert_text("!");
        jar.undo();
        assert_eq!(jar.to_string(), "pushed");
    }

    #[test]
    fn typing_notifies_listeners() {
        let (mut jar, seen) = jar_with("ab");
        jar.set_caret(Selection::collapsed(1));
        jar.insert_text("X");
        jar.delete_forward();
        assert_eq!(*seen.borrow(), vec!["aXb".to_string(), "aX".to_string()]);
        assert_eq!(jar.caret(), Selection::collapsed(2));
    }

    #[test]
    fn new_line_keeps_indent_and_tab_inserts_tab() {
        let (mut jar, _) = jar_with("if (x) {\n    y();");
        jar.set_caret(Selection::collapsed(jar.len_chars()));
        jar.handle_new_line();
        jar.handle_tab();
        assert_eq!(jar.to_string(), "if (x) {\n    y();\n    \t");
    }

    #[test]
    fn restore_rejects_out_of_bounds() {
        let (mut jar, _) = jar_with("abcdef");
        jar.set_caret(Selection::new(2, 5));
        let saved = jar.save();
        assert_eq!(saved.dir, Some(Direction::Forward));
        jar.update_code("ab");
        assert_eq!(
            jar.restore(&saved),
            Err(CaretError::OutOfBounds { offset: 5, len: 2 })
        );
        jar.update_code("abcdefgh");
        assert!(jar.restore(&saved).is_ok());
        assert_eq!(jar.caret(), Selection::new(2, 5));
    }

    #[test]
    fn undo_and_redo_walk_user_edits() {
        let (mut jar, seen) = jar_with("");
        jar.insert_text("a");
        jar.insert_text("b");
        jar.undo();
        assert_eq!(jar.to_string(), "a");
        jar.redo();
        assert_eq!(jar.to_string(), "ab");
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn destroy_is_idempotent_and_detaches() {
        let surface = Surface::new("jar");
        let mut jar = CodeJar::new(&surface, JarOptions::default());
        assert_eq!(surface.child_count(), 1);
        jar.destroy();
        jar.destroy();
        assert!(jar.is_destroyed());
        assert_eq!(surface.child_count(), 0);
    }
}
