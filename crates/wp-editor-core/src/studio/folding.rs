//! Indentation based folding.

use super::model::TextModel;

/// A foldable line range, 1-based and inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoldingRange {
    pub start: usize,
    pub end: usize,
}

/// Visual indentation of a line, or `None` for blank lines.
fn indent_of(line: &str, tab_size: usize) -> Option<usize> {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += tab_size - width % tab_size,
            _ => return Some(width),
        }
    }
    None
}

/// A range starts at every line followed by more deeply indented lines and
/// ends at the last of them. Blank lines never end a range.
pub fn compute_folding_ranges(model: &TextModel, tab_size: usize) -> Vec<FoldingRange> {
    let tab_size = tab_size.max(1);
    let indents: Vec<Option<usize>> = (1..=model.get_line_count())
        .map(|n| {
            model
                .get_line_content(n)
                .and_then(|line| indent_of(&line, tab_size))
        })
        .collect();

    let mut ranges = Vec::new();
    for (i, indent) in indents.iter().enumerate() {
        let Some(indent) = *indent else {
            continue;
        };
        let mut end = None;
        for (j, other) in indents.iter().enumerate().skip(i + 1) {
            match other {
                None => continue,
                Some(other) if *other > indent => end = Some(j),
                Some(_) => break,
            }
        }
        if let Some(end) = end {
            ranges.push(FoldingRange {
                start: i + 1,
                end: end + 1,
            });
        }
    }
    ranges
}
