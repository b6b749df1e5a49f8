use super::{EditorEngineAdapter, UserEditCallback, log_caret_fallback};
use crate::caret::{TextDiff, relocate_selection};
use crate::jar::{CaretSave, CodeJar, JarOptions};
use crate::surface::Surface;
use crate::types::{EngineKind, InputEvent, Selection};

/// Adapter over [`CodeJar`].
///
/// The jar drops the caret to the end whenever its code is replaced, so
/// `set_value` saves the caret first, relocates it across the change and
/// restores it.
pub struct JarAdapter {
    jar: CodeJar,
}

impl JarAdapter {
    pub fn new(
        surface: &Surface,
        options: JarOptions,
        initial: &str,
        on_user_edit: UserEditCallback,
    ) -> Self {
        let mut jar = CodeJar::new(surface, options);
        jar.update_code(initial);
        jar.on_update(on_user_edit);
        Self { jar }
    }

    pub fn jar(&self) -> &CodeJar {
        &self.jar
    }
}

impl EditorEngineAdapter for JarAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Jar
    }

    fn get_value(&self) -> String {
        self.jar.to_string()
    }

    fn set_value(&mut self, text: &str) {
        if self.jar.is_destroyed() {
            return;
        }
        let old = self.jar.to_string();
        if old == text {
            return;
        }
        let saved = self.jar.save();
        let diff = TextDiff::between(&old, text);
        self.jar.update_code(text);

        let restored = relocate_selection(&diff, saved.to_selection())
            .and_then(|selection| self.jar.restore(&CaretSave::from_selection(selection)));
        if let Err(err) = restored {
            log_caret_fallback(EngineKind::Jar, &err);
            self.jar.set_caret(Selection::collapsed(self.jar.len_chars()));
        }
    }

    fn selection(&self) -> Selection {
        self.jar.caret()
    }

    fn set_selection(&mut self, selection: Selection) {
        self.jar.set_caret(selection);
    }

    fn input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Insert(text) => self.jar.insert_text(&text),
            InputEvent::Enter => self.jar.handle_new_line(),
            InputEvent::DeleteBackward => self.jar.delete_backward(),
            InputEvent::DeleteForward => self.jar.delete_forward(),
            InputEvent::Tab => self.jar.handle_tab(),
            InputEvent::Select(selection) => self.jar.set_caret(selection),
            InputEvent::Undo => self.jar.undo(),
            InputEvent::Redo => self.jar.redo(),
        }
    }

    fn destroy(&mut self) {
        self.jar.destroy();
    }

    fn is_destroyed(&self) -> bool {
        self.jar.is_destroyed()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn adapter(initial: &str) -> (JarAdapter, Rc<RefCell<Vec<String>>>) {
        let surface = Surface::new("jar-adapter");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let adapter = JarAdapter::new(
            &surface,
            JarOptions::default(),
            initial,
            Box::new(move |text: &str| sink.borrow_mut().push(text.to_string())),
        );
        (adapter, seen)
    }

    #[test]
    fn set_value_keeps_caret_after_insertion() {
        let (mut adapter, seen) = adapter("abcdef");
        adapter.set_selection(Selection::collapsed(3));
        adapter.set_value("abcXdef");
        assert_eq!(adapter.get_value(), "abcXdef");
        assert_eq!(adapter.selection(), Selection::collapsed(4));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn set_value_falls_back_to_end() {
        let (mut adapter, _) = adapter("abcdef");
        adapter.set_selection(Selection::collapsed(4));
        adapter.set_value("abXYZf");
        assert_eq!(adapter.selection(), Selection::collapsed(6));
    }

    #[test]
    fn user_input_reports_full_text() {
        let (mut adapter, seen) = adapter("x");
        adapter.input(InputEvent::Select(Selection::collapsed(1)));
        adapter.input(InputEvent::Tab);
        adapter.input(InputEvent::insert("y"));
        assert_eq!(*seen.borrow(), vec!["x\t".to_string(), "x\ty".to_string()]);
    }
}
