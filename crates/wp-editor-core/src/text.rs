//! Char-indexed text storage shared by the engines.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// Editable text addressed by char offsets.
///
/// Out-of-range offsets clamp on writes and return `None` on reads.
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn insert(&mut self, at: usize, text: &str);

    fn delete(&mut self, range: Range<usize>);

    fn replace(&mut self, range: Range<usize>, text: &str) {
        self.delete(range.clone());
        self.insert(range.start, text);
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr>;

    fn to_string(&self) -> String;

    /// Line count; `""` and `"a\n"` both count a trailing empty line.
    fn len_lines(&self) -> usize;

    fn char_to_line(&self, at: usize) -> usize;

    /// First char of `line`, or the document length past the last line.
    fn line_to_char(&self, line: usize) -> usize;

    /// Text of `line` with its `\n` / `\r\n` stripped.
    fn line(&self, line: usize) -> Option<SmolStr>;
}

/// Document text held in a `ropey::Rope`.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn set(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
    }
}

impl From<&str> for EditorRope {
    fn from(text: &str) -> Self {
        let rope = ropey::Rope::from_str(text);
        Self { rope }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.len_chars());
        self.rope.insert(at, text);
    }

    fn delete(&mut self, range: Range<usize>) {
        let len = self.len_chars();
        let (from, to) = (range.start.min(len), range.end.min(len));
        if from < to {
            self.rope.remove(from..to);
        }
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        (range.start <= range.end && range.end <= self.len_chars())
            .then(|| self.rope.slice(range).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    fn char_to_line(&self, at: usize) -> usize {
        self.rope.char_to_line(at.min(self.len_chars()))
    }

    fn line_to_char(&self, line: usize) -> usize {
        if line < self.rope.len_lines() {
            self.rope.line_to_char(line)
        } else {
            self.len_chars()
        }
    }

    fn line(&self, line: usize) -> Option<SmolStr> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let raw = self.rope.line(line).to_smolstr();
        Some(raw.trim_end_matches(['\n', '\r']).to_smolstr())
    }
}

/// Convert a char offset into a byte offset of `text`, clamping to the end.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
