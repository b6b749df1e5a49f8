use smol_str::SmolStr;

use super::{EditorEngineAdapter, UserEditCallback};
use crate::caret::TextDiff;
use crate::highlight::Grammar;
use crate::mirror::{ChangeSet, EditorView, Extension, Transaction};
use crate::surface::Surface;
use crate::types::{EngineKind, InputEvent, Selection};

/// Extension choices for the mirror engine.
#[derive(Clone, Debug)]
pub struct MirrorOptions {
    pub line_numbers: bool,
    pub history: bool,
    pub indent_with_tab: bool,
    pub indent_unit: SmolStr,
    pub language: Option<&'static Grammar>,
    pub read_only: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            history: true,
            indent_with_tab: true,
            indent_unit: SmolStr::new_static("  "),
            language: Some(Grammar::javascript()),
            read_only: false,
        }
    }
}

impl MirrorOptions {
    fn extensions(&self) -> Vec<Extension> {
        let mut extensions = vec![Extension::IndentUnit(self.indent_unit.clone())];
        if self.line_numbers {
            extensions.push(Extension::LineNumbers);
        }
        if self.history {
            extensions.push(Extension::history());
        }
        if self.indent_with_tab {
            extensions.push(Extension::IndentWithTab);
        }
        if let Some(grammar) = self.language {
            extensions.push(Extension::Language(grammar));
        }
        if self.read_only {
            extensions.push(Extension::ReadOnly);
        }
        extensions
    }
}

/// Adapter over [`EditorView`].
///
/// `set_value` dispatches only the changed span as a programmatic
/// transaction, so the view maps the selection through it natively.
pub struct MirrorAdapter {
    view: EditorView,
}

impl MirrorAdapter {
    pub fn new(
        surface: &Surface,
        options: MirrorOptions,
        initial: &str,
        mut on_user_edit: UserEditCallback,
    ) -> Self {
        let mut extensions = options.extensions();
        extensions.push(Extension::update_listener(move |update| {
            if update.doc_changed && update.origin.is_user() {
                on_user_edit(&update.state.text());
            }
        }));
        Self {
            view: EditorView::new(surface, initial, extensions),
        }
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }
}

impl EditorEngineAdapter for MirrorAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Mirror
    }

    fn get_value(&self) -> String {
        self.view.state().text()
    }

    fn set_value(&mut self, text: &str) {
        let old = self.view.state().text();
        let diff = TextDiff::between(&old, text);
        if diff.is_identity() {
            return;
        }
        let changes = ChangeSet::single(diff.prefix, diff.old_end, diff.inserted(text));
        self.view.dispatch(Transaction::programmatic(changes));
    }

    fn selection(&self) -> Selection {
        self.view.state().selection()
    }

    fn set_selection(&mut self, selection: Selection) {
        self.view.select(selection);
    }

    fn input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Insert(text) => {
                self.view.insert_text(&text);
            }
            InputEvent::Enter => {
                self.view.insert_newline_and_indent();
            }
            InputEvent::DeleteBackward => {
                self.view.delete_char_backward();
            }
            InputEvent::DeleteForward => {
                self.view.delete_char_forward();
            }
            InputEvent::Tab => {
                self.view.handle_tab();
            }
            InputEvent::Select(selection) => self.view.select(selection),
            InputEvent::Undo => {
                self.view.undo();
            }
            InputEvent::Redo => {
                self.view.redo();
            }
        }
    }

    fn destroy(&mut self) {
        self.view.destroy();
    }

    fn is_destroyed(&self) -> bool {
        self.view.is_destroyed()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn adapter(initial: &str) -> (MirrorAdapter, Rc<RefCell<Vec<String>>>) {
        let surface = Surface::new("mirror-adapter");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let adapter = MirrorAdapter::new(
            &surface,
            MirrorOptions::default(),
            initial,
            Box::new(move |text: &str| sink.borrow_mut().push(text.to_string())),
        );
        (adapter, seen)
    }

    #[test]
    fn set_value_maps_selection_natively() {
        let (mut adapter, seen) = adapter("abcdef");
        adapter.set_selection(Selection::collapsed(3));
        adapter.set_value("abcXdef");
        assert_eq!(adapter.selection(), Selection::collapsed(4));
        adapter.set_value("xabcXdef");
        assert_eq!(adapter.selection(), Selection::collapsed(5));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn undo_counts_as_user_edit() {
        let (mut adapter, seen) = adapter("");
        adapter.input(InputEvent::insert("a"));
        adapter.input(InputEvent::Undo);
        assert_eq!(adapter.get_value(), "");
        assert_eq!(*seen.borrow(), vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn tab_indents_with_the_configured_unit() {
        let (mut adapter, seen) = adapter("x");
        adapter.input(InputEvent::Tab);
        assert_eq!(adapter.get_value(), "  x");
        assert_eq!(seen.borrow().len(), 1);
    }
}
