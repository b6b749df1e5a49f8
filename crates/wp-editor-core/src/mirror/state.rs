//! Editor state, change sets and transactions.

use smol_str::SmolStr;

use crate::text::{EditorRope, TextBuffer};
use crate::types::Selection;

/// One replaced range, in coordinates of the document before the change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeSpec {
    pub from: usize,
    pub to: usize,
    pub insert: SmolStr,
}

/// Which side of an insertion a mapped position sticks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// A set of non-overlapping changes, sorted by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    specs: Vec<ChangeSpec>,
}

impl ChangeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(mut specs: Vec<ChangeSpec>) -> Self {
        specs.sort_by_key(|s| (s.from, s.to));
        debug_assert!(
            specs.windows(2).all(|w| w[0].to <= w[1].from),
            "change specs must not overlap"
        );
        Self { specs }
    }

    pub fn single(from: usize, to: usize, insert: impl Into<SmolStr>) -> Self {
        Self {
            specs: vec![ChangeSpec {
                from,
                to,
                insert: insert.into(),
            }],
        }
    }

    pub fn specs(&self) -> &[ChangeSpec] {
        &self.specs
    }

    /// True when applying the set leaves any document unchanged.
    pub fn is_empty(&self) -> bool {
        self.specs
            .iter()
            .all(|s| s.from == s.to && s.insert.is_empty())
    }

    pub fn apply<B: TextBuffer>(&self, doc: &mut B) {
        // Back to front keeps earlier coordinates valid.
        for spec in self.specs.iter().rev() {
            doc.replace(spec.from..spec.to, &spec.insert);
        }
    }

    /// The change set that undoes this one, given the document it applies to.
    pub fn invert<B: TextBuffer>(&self, doc_before: &B) -> ChangeSet {
        let mut delta: isize = 0;
        let mut specs = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            let deleted = doc_before.slice(spec.from..spec.to).unwrap_or_default();
            let inserted = spec.insert.chars().count();
            let from = (spec.from as isize + delta) as usize;
            specs.push(ChangeSpec {
                from,
                to: from + inserted,
                insert: deleted,
            });
            delta += inserted as isize - (spec.to - spec.from) as isize;
        }
        ChangeSet { specs }
    }

    /// Map a position in the old document to the new one.
    ///
    /// Positions inside a replaced range land at the end of its insertion.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut delta: isize = 0;
        for spec in &self.specs {
            if pos < spec.from {
                break;
            }
            let inserted = spec.insert.chars().count() as isize;
            if pos > spec.to {
                delta += inserted - (spec.to - spec.from) as isize;
                continue;
            }
            let from = spec.from as isize + delta;
            return if spec.from == spec.to {
                match assoc {
                    Assoc::Before => from as usize,
                    Assoc::After => (from + inserted) as usize,
                }
            } else if pos == spec.from {
                from as usize
            } else {
                (from + inserted) as usize
            };
        }
        (pos as isize + delta) as usize
    }

    pub fn map_selection(&self, selection: Selection) -> Selection {
        Selection::new(
            self.map_pos(selection.anchor, Assoc::After),
            self.map_pos(selection.head, Assoc::After),
        )
    }
}

/// Where a transaction came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionOrigin {
    Input,
    Delete,
    Undo,
    Redo,
    Select,
    /// Content pushed in by the embedding application.
    Programmatic,
}

impl TransactionOrigin {
    /// Whether the transaction was driven by the user.
    pub fn is_user(&self) -> bool {
        !matches!(self, TransactionOrigin::Programmatic)
    }
}

/// A state update: changes, an optional explicit selection and its origin.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub changes: ChangeSet,
    pub selection: Option<Selection>,
    pub origin: TransactionOrigin,
    pub add_to_history: bool,
}

impl Transaction {
    pub fn user(changes: ChangeSet, origin: TransactionOrigin) -> Self {
        Self {
            changes,
            selection: None,
            origin,
            add_to_history: true,
        }
    }

    /// Content pushed by the application. Not recorded in history.
    pub fn programmatic(changes: ChangeSet) -> Self {
        Self {
            changes,
            selection: None,
            origin: TransactionOrigin::Programmatic,
            add_to_history: false,
        }
    }

    pub fn select(selection: Selection) -> Self {
        Self {
            changes: ChangeSet::empty(),
            selection: Some(selection),
            origin: TransactionOrigin::Select,
            add_to_history: false,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// Document plus selection.
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    pub(crate) doc: EditorRope,
    pub(crate) selection: Selection,
}

impl EditorState {
    pub fn new(doc: &str) -> Self {
        Self {
            doc: EditorRope::from(doc),
            selection: Selection::default(),
        }
    }

    pub fn doc(&self) -> &EditorRope {
        &self.doc
    }

    pub fn text(&self) -> String {
        self.doc.to_string()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn len_chars(&self) -> usize {
        self.doc.len_chars()
    }
}
