use super::{EditorEngineAdapter, UserEditCallback, log_caret_fallback};
use crate::caret::{TextDiff, relocate_selection};
use crate::studio::{EditorCommand, KeyCode, StudioEditor, StudioOptions, ViewState};
use crate::surface::Surface;
use crate::types::{EngineKind, InputEvent, Selection};

/// Adapter over [`StudioEditor`].
///
/// `set_value` on the editor flushes the model and resets the cursor, so
/// the adapter saves the view state, relocates it across the change and
/// restores it. Flush events are never reported as user edits.
pub struct StudioAdapter {
    editor: StudioEditor,
}

impl StudioAdapter {
    pub fn new(
        surface: &Surface,
        options: StudioOptions,
        initial: &str,
        mut on_user_edit: UserEditCallback,
    ) -> Self {
        let mut editor = StudioEditor::new(surface, initial, options);
        editor.add_command(KeyCode::Tab, EditorCommand::Type("\t".into()));
        editor.on_did_change_model_content(move |event, model| {
            if event.is_flush {
                return;
            }
            on_user_edit(&model.get_value());
        });
        Self { editor }
    }

    pub fn editor(&self) -> &StudioEditor {
        &self.editor
    }
}

impl EditorEngineAdapter for StudioAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Studio
    }

    fn get_value(&self) -> String {
        self.editor.get_value()
    }

    fn set_value(&mut self, text: &str) {
        if self.editor.is_disposed() {
            return;
        }
        let old = self.editor.get_value();
        if old == text {
            return;
        }
        let saved = self.editor.save_view_state();
        let selection = self.editor.selection();
        let diff = TextDiff::between(&old, text);
        self.editor.set_value(text);

        let restored = relocate_selection(&diff, selection).and_then(|selection| {
            let model = self.editor.model();
            let state = ViewState {
                selection_start: model.get_position_at(selection.anchor),
                position: model.get_position_at(selection.head),
                scroll_top: saved.scroll_top,
            };
            self.editor.restore_view_state(&state)
        });
        if let Err(err) = restored {
            log_caret_fallback(EngineKind::Studio, &err);
            let end = self.editor.model().len_chars();
            self.editor.set_selection(Selection::collapsed(end));
        }
    }

    fn selection(&self) -> Selection {
        self.editor.selection()
    }

    fn highlighted_html(&self) -> Option<String> {
        if self.editor.is_disposed() {
            return None;
        }
        self.editor.highlighted_html()
    }

    fn set_selection(&mut self, selection: Selection) {
        self.editor.set_selection(selection);
    }

    fn input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Insert(text) => self.editor.trigger_type(&text),
            InputEvent::Enter => {
                self.editor.handle_key(KeyCode::Enter);
            }
            InputEvent::DeleteBackward => {
                self.editor.handle_key(KeyCode::Backspace);
            }
            InputEvent::DeleteForward => {
                self.editor.handle_key(KeyCode::Delete);
            }
            InputEvent::Tab => {
                self.editor.handle_key(KeyCode::Tab);
            }
            InputEvent::Select(selection) => self.editor.set_selection(selection),
            InputEvent::Undo => self.editor.undo(),
            InputEvent::Redo => self.editor.redo(),
        }
    }

    fn destroy(&mut self) {
        self.editor.dispose();
    }

    fn is_destroyed(&self) -> bool {
        self.editor.is_disposed()
    }
}
