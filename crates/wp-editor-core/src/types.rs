//! Engine-agnostic types passed across the adapter boundary.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use smol_str::SmolStr;

/// Char-offset selection. `anchor` stays put while `head` follows the caret.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn collapsed(at: usize) -> Self {
        Self::new(at, at)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Head before anchor, as after a shift-left drag.
    pub fn is_backwards(&self) -> bool {
        self.head < self.anchor
    }

    /// Pull both ends inside a document of `len` chars.
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.head.min(len))
    }
}

/// The concrete engine behind an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EngineKind {
    /// Minimal highlighting editor.
    Jar,
    /// Modular, extension based editor.
    Mirror,
    /// IDE-grade editor with folding and commands.
    #[default]
    Studio,
}

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [EngineKind::Jar, EngineKind::Mirror, EngineKind::Studio];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Jar => "jar",
            EngineKind::Mirror => "mirror",
            EngineKind::Studio => "studio",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = SmolStr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jar" | "codejar" => Ok(EngineKind::Jar),
            "mirror" | "codemirror" => Ok(EngineKind::Mirror),
            "studio" | "monaco" => Ok(EngineKind::Studio),
            other => Err(SmolStr::new(other)),
        }
    }
}

/// A user input event delivered from the mount surface to an engine.
///
/// Every event is a user-driven modification (or caret move); engines
/// notify their change listeners for the ones that alter the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Insert text at the selection, replacing it.
    Insert(SmolStr),
    /// Line break. Engines may carry indentation over.
    Enter,
    /// Delete the selection or the char before the caret.
    DeleteBackward,
    /// Delete the selection or the char after the caret.
    DeleteForward,
    /// Tab key. Handling is engine specific.
    Tab,
    /// Move the caret / selection.
    Select(Selection),
    Undo,
    Redo,
}

impl InputEvent {
    pub fn insert(text: impl Into<SmolStr>) -> Self {
        InputEvent::Insert(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_bounds() {
        let sel = Selection::new(5, 2);
        assert_eq!(sel.start(), 2);
        assert_eq!(sel.end(), 5);
        assert!(sel.is_backwards());
        assert_eq!(sel.to_range(), 2..5);
        assert_eq!(sel.clamp(3), Selection::new(3, 2));
    }

    #[test]
    fn engine_kind_parses_aliases() {
        assert_eq!("CodeMirror".parse::<EngineKind>(), Ok(EngineKind::Mirror));
        assert_eq!("jar".parse::<EngineKind>(), Ok(EngineKind::Jar));
        assert_eq!("monaco".parse::<EngineKind>(), Ok(EngineKind::Studio));
        assert!("vim".parse::<EngineKind>().is_err());
    }
}
