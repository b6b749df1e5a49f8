//! Lazily loaded highlighting runtime for the studio engine.
//!
//! Loading the syntax definitions is the expensive part of bringing up a
//! studio editor, so it happens once per process behind an async cell.
//! Editors created before the runtime is ready simply render unhighlighted.

use std::sync::Arc;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tokio::sync::OnceCell;

static RUNTIME: OnceCell<Arc<StudioRuntime>> = OnceCell::const_new();

pub struct StudioRuntime {
    syntaxes: SyntaxSet,
}

impl StudioRuntime {
    /// Load the shared runtime, or return it if it is already loaded.
    pub async fn load() -> Arc<StudioRuntime> {
        RUNTIME
            .get_or_init(|| async {
                tracing::debug!(target: "wp_editor::studio", "loading syntax definitions");
                Arc::new(StudioRuntime {
                    syntaxes: SyntaxSet::load_defaults_newlines(),
                })
            })
            .await
            .clone()
    }

    /// The runtime if some earlier `load` finished.
    pub fn get() -> Option<Arc<StudioRuntime>> {
        RUNTIME.get().cloned()
    }

    pub fn supports(&self, language: &str) -> bool {
        self.syntaxes.find_syntax_by_token(language).is_some()
    }

    /// Highlight `code` as HTML with space separated scope classes.
    ///
    /// Unknown languages fall back to plain text.
    pub fn highlight_html(&self, code: &str, language: &str) -> Result<String, syntect::Error> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl std::fmt::Debug for StudioRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioRuntime")
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .finish()
    }
}
