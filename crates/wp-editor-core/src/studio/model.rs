//! Line oriented text model with 1-based positions.

use std::fmt;
use std::ops::Range;

use smol_str::SmolStr;

use crate::text::{EditorRope, TextBuffer};

/// A position in the model. Both fields are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line_number: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line_number: usize, column: usize) -> Self {
        Self {
            line_number,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_number, self.column)
    }
}

/// One replaced range within a content change event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentChange {
    /// Char offset of the replaced range.
    pub range_offset: usize,
    /// Char length of the replaced range.
    pub range_length: usize,
    pub text: SmolStr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentChangeEvent {
    pub changes: Vec<ContentChange>,
    pub version_id: u64,
    /// The whole content was replaced through `set_value`.
    pub is_flush: bool,
}

#[derive(Clone, Debug)]
pub struct TextModel {
    buffer: EditorRope,
    version_id: u64,
    language: SmolStr,
}

impl TextModel {
    pub fn new(text: &str, language: impl Into<SmolStr>) -> Self {
        Self {
            buffer: EditorRope::from(text),
            version_id: 1,
            language: language.into(),
        }
    }

    pub fn get_value(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn version_id(&self) -> u64 {
        self.version_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<SmolStr>) {
        self.language = language.into();
    }

    /// Replace the whole content.
    pub fn set_value(&mut self, text: &str) -> ContentChangeEvent {
        let old_len = self.buffer.len_chars();
        self.buffer.set(text);
        self.version_id += 1;
        ContentChangeEvent {
            changes: vec![ContentChange {
                range_offset: 0,
                range_length: old_len,
                text: text.into(),
            }],
            version_id: self.version_id,
            is_flush: true,
        }
    }

    /// Replace a char range. Returns the event and the replaced text.
    pub fn apply_edit(&mut self, range: Range<usize>, text: &str) -> (ContentChangeEvent, SmolStr) {
        let len = self.buffer.len_chars();
        let range = range.start.min(len)..range.end.min(len).max(range.start.min(len));
        let deleted = self.buffer.slice(range.clone()).unwrap_or_default();
        self.buffer.replace(range.clone(), text);
        self.version_id += 1;
        let event = ContentChangeEvent {
            changes: vec![ContentChange {
                range_offset: range.start,
                range_length: range.end - range.start,
                text: text.into(),
            }],
            version_id: self.version_id,
            is_flush: false,
        };
        (event, deleted)
    }

    pub fn get_line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    pub fn get_line_content(&self, line_number: usize) -> Option<SmolStr> {
        if line_number == 0 {
            return None;
        }
        self.buffer.line(line_number - 1)
    }

    /// One past the last column of a line.
    pub fn get_line_max_column(&self, line_number: usize) -> usize {
        self.get_line_content(line_number)
            .map(|line| line.chars().count() + 1)
            .unwrap_or(1)
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        position.line_number >= 1
            && position.line_number <= self.get_line_count()
            && position.column >= 1
            && position.column <= self.get_line_max_column(position.line_number)
    }

    /// Clamp a position into the model.
    pub fn validate_position(&self, position: Position) -> Position {
        let line_number = position.line_number.clamp(1, self.get_line_count());
        let column = position
            .column
            .clamp(1, self.get_line_max_column(line_number));
        Position::new(line_number, column)
    }

    pub fn get_offset_at(&self, position: Position) -> usize {
        let position = self.validate_position(position);
        self.buffer.line_to_char(position.line_number - 1) + position.column - 1
    }

    pub fn get_position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(offset);
        Position::new(line + 1, offset - self.buffer.line_to_char(line) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_and_positions() {
        let model = TextModel::new("ab\ncde\n", "javascript");
        assert_eq!(model.get_line_count(), 3);
        assert_eq!(model.get_position_at(0), Position::new(1, 1));
        assert_eq!(model.get_position_at(2), Position::new(1, 3));
        assert_eq!(model.get_position_at(3), Position::new(2, 1));
        assert_eq!(model.get_position_at(7), Position::new(3, 1));
        assert_eq!(model.get_offset_at(Position::new(2, 3)), 5);
        assert_eq!(model.get_line_max_column(2), 4);
    }

    #[test]
    fn positions_are_validated() {
        let model = TextModel::new("ab\ncde", "plaintext");
        assert!(model.is_valid_position(Position::new(2, 4)));
        assert!(!model.is_valid_position(Position::new(2, 5)));
        assert!(!model.is_valid_position(Position::new(0, 1)));
        assert!(!model.is_valid_position(Position::new(3, 1)));
        assert_eq!(model.validate_position(Position::new(9, 9)), Position::new(2, 4));
        assert_eq!(model.get_offset_at(Position::new(1, 40)), 2);
    }

    #[test]
    fn edits_bump_version() {
        let mut model = TextModel::new("hello", "plaintext");
        let (event, deleted) = model.apply_edit(1..3, "EY");
        assert_eq!(model.get_value(), "hEYlo");
        assert_eq!(deleted, "el");
        assert!(!event.is_flush);
        assert_eq!(event.version_id, 2);

        let event = model.set_value("bye");
        assert!(event.is_flush);
        assert_eq!(event.changes[0].range_length, 5);
        assert_eq!(model.version_id(), 3);
    }
}
