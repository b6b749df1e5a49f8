//! Caret relocation across whole-content replacement.
//!
//! When the host pushes a new value into an engine, the old and new text
//! usually share a prefix and a suffix (the user typed, or the parent
//! reformatted one spot). `TextDiff` finds the rewritten middle so saved
//! caret positions can be carried over:
//!
//! - positions in the shared suffix shift by the length delta (a caret
//!   sitting exactly at an insertion point ends up after the inserted text)
//! - positions in the shared prefix stay put
//! - positions strictly inside the rewritten region can not be mapped

use crate::error::CaretError;
use crate::types::Selection;

/// The rewritten region between two texts, in char offsets.
///
/// `old[prefix..old_end]` was replaced by `new[prefix..new_end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextDiff {
    pub prefix: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl TextDiff {
    pub fn between(old: &str, new: &str) -> Self {
        let old_len = old.chars().count();
        let new_len = new.chars().count();

        let prefix = old
            .chars()
            .zip(new.chars())
            .take_while(|(a, b)| a == b)
            .count();

        // The suffix may not overlap the prefix on either side.
        let max_suffix = old_len.min(new_len) - prefix;
        let suffix = old
            .chars()
            .rev()
            .zip(new.chars().rev())
            .take_while(|(a, b)| a == b)
            .count()
            .min(max_suffix);

        Self {
            prefix,
            old_end: old_len - suffix,
            new_end: new_len - suffix,
        }
    }

    /// True when both texts are identical.
    pub fn is_identity(&self) -> bool {
        self.prefix == self.old_end && self.prefix == self.new_end
    }

    /// Chars removed from the old text.
    pub fn deleted_len(&self) -> usize {
        self.old_end - self.prefix
    }

    /// Chars inserted by the new text.
    pub fn inserted_len(&self) -> usize {
        self.new_end - self.prefix
    }

    /// The inserted text, sliced out of `new`.
    pub fn inserted<'a>(&self, new: &'a str) -> &'a str {
        let start = crate::text::char_to_byte(new, self.prefix);
        let end = crate::text::char_to_byte(new, self.new_end);
        &new[start..end]
    }
}

/// Map a char offset in the old text to the new text.
pub fn relocate(diff: &TextDiff, offset: usize) -> Result<usize, CaretError> {
    if offset >= diff.old_end {
        Ok(offset - diff.old_end + diff.new_end)
    } else if offset <= diff.prefix {
        Ok(offset)
    } else {
        Err(CaretError::Invalidated {
            offset,
            start: diff.prefix,
            end: diff.old_end,
        })
    }
}

/// Map both ends of a selection; fails if either end can not be mapped.
pub fn relocate_selection(diff: &TextDiff, selection: Selection) -> Result<Selection, CaretError> {
    Ok(Selection::new(
        relocate(diff, selection.anchor)?,
        relocate(diff, selection.head)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_at_caret_moves_caret_after_it() {
        let diff = TextDiff::between("abcdef", "abcXdef");
        assert_eq!(
            diff,
            TextDiff {
                prefix: 3,
                old_end: 3,
                new_end: 4
            }
        );
        assert_eq!(relocate(&diff, 3), Ok(4));
        assert_eq!(relocate(&diff, 1), Ok(1));
        assert_eq!(relocate(&diff, 6), Ok(7));
        assert_eq!(diff.inserted("abcXdef"), "X");
    }

    #[test]
    fn caret_inside_rewritten_region_is_invalidated() {
        let diff = TextDiff::between("abcdef", "abXYZf");
        assert_eq!(diff.prefix, 2);
        assert_eq!(diff.old_end, 5);
        assert_eq!(
            relocate(&diff, 4),
            Err(CaretError::Invalidated {
                offset: 4,
                start: 2,
                end: 5
            })
        );
        // Edges of the region are still mappable.
        assert_eq!(relocate(&diff, 2), Ok(2));
        assert_eq!(relocate(&diff, 5), Ok(5));
    }

    #[test]
    fn deletion_keeps_caret_at_prefix() {
        let diff = TextDiff::between("hello world", "hello");
        assert_eq!(diff.deleted_len(), 6);
        assert_eq!(diff.inserted_len(), 0);
        assert_eq!(relocate(&diff, 5), Ok(5));
        assert_eq!(relocate(&diff, 11), Ok(5));
    }

    #[test]
    fn repeated_chars_do_not_overlap() {
        let diff = TextDiff::between("aaa", "aaaa");
        assert_eq!(diff.prefix, 3);
        assert_eq!(diff.old_end, 3);
        assert_eq!(diff.new_end, 4);
        assert!(TextDiff::between("same", "same").is_identity());
    }

    #[test]
    fn selection_relocation() {
        let diff = TextDiff::between("let x = 1;", "let value = 1;");
        let sel = Selection::new(8, 10);
        assert_eq!(relocate_selection(&diff, sel), Ok(Selection::new(12, 14)));
        assert_eq!(
            relocate_selection(&diff, Selection::new(0, 5)),
            Ok(Selection::new(0, 9))
        );

        let rewritten = TextDiff::between("abcdef", "abXYZf");
        assert!(relocate_selection(&rewritten, Selection::new(0, 4)).is_err());
    }
}
