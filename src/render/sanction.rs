//! Deciding which lines are close enough to a change to be worth showing.
//!
//! A line is *sanctioned* if it should be displayed. Sanctioning runs as a separate forward pass
//! over the diff operations before anything is rendered, so it has to advance its line cursors in
//! exactly the same way the sides do while rendering: one line per line break.

use crate::diff::{DiffOp, OpKind};
use log::debug;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// How many unchanged lines are kept before and after a change.
pub const CONTEXT_RADIUS: i64 = 4;

/// The set of sanctioned line numbers for a single side.
///
/// Line numbers are signed because synthetic offset lines are numbered below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Sanctioned(BTreeSet<i64>);

impl Sanctioned {
    pub fn contains(&self, line: i64) -> bool {
        self.0.contains(&line)
    }

    pub(crate) fn mark(&mut self, lines: RangeInclusive<i64>) {
        self.0.extend(lines);
    }

    /// Whether a change sanctioned any real line. The offset lines below zero don't count, so a
    /// side without changes stays fully visible.
    pub fn has_changes(&self) -> bool {
        self.0.range(0..).next().is_some()
    }

    #[cfg(test)]
    pub fn lines(&self) -> Vec<i64> {
        self.0.iter().copied().collect()
    }
}

/// The sanctioned lines of both sides of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SanctionMap {
    pub old: Sanctioned,
    pub new: Sanctioned,
}

/// Line cursor and bounds for one side while building the map.
struct Cursor {
    line: i64,
    first: i64,
    total: i64,
}

impl Cursor {
    fn new(line_offset: i64, total: usize) -> Self {
        Cursor {
            line: -line_offset,
            first: -line_offset,
            total: total as i64 - line_offset,
        }
    }

    /// Sanction the window around a change spanning `breaks` lines, then step past it.
    ///
    /// The window ends `CONTEXT_RADIUS` lines after the last changed line. A change without a line
    /// break still touches the line under the cursor.
    fn change(&mut self, breaks: i64, sanctioned: &mut Sanctioned) {
        if self.line >= 0 {
            let last_changed = self.line + breaks.max(1) - 1;
            let start = (self.line - CONTEXT_RADIUS).max(self.first);
            let end = (last_changed + CONTEXT_RADIUS).min(self.total);
            if start <= end {
                sanctioned.mark(start..=end);
            }
        }
        self.line += breaks;
    }
}

impl SanctionMap {
    /// Build the map with a single pass over `ops`.
    ///
    /// `old_total` and `new_total` are the number of lines in each text, including the
    /// `line_offset` synthetic lines at the top which are always sanctioned.
    pub fn build(ops: &[DiffOp], line_offset: usize, old_total: usize, new_total: usize) -> Self {
        let offset = line_offset as i64;
        let mut map = SanctionMap::default();
        if offset > 0 {
            map.old.mark(-offset..=-1);
            map.new.mark(-offset..=-1);
        }

        let mut old = Cursor::new(offset, old_total);
        let mut new = Cursor::new(offset, new_total);

        for op in ops {
            let breaks = op.line_breaks() as i64;
            match op.kind {
                OpKind::Equal => {
                    old.line += breaks;
                    new.line += breaks;
                }
                OpKind::Removed => old.change(breaks, &mut map.old),
                OpKind::Added => new.change(breaks, &mut map.new),
            }
        }
        debug!(
            "Sanctioned {} old line(s) and {} new line(s)",
            map.old.0.len(),
            map.new.0.len()
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered_lines(range: std::ops::Range<usize>) -> String {
        range.map(|n| format!("line {n}\n")).collect()
    }

    #[test]
    fn test_single_change_window() {
        let ops = vec![
            DiffOp::new(OpKind::Equal, numbered_lines(0..20)),
            DiffOp::new(OpKind::Removed, "old\n"),
            DiffOp::new(OpKind::Added, "new\n"),
            DiffOp::new(OpKind::Equal, numbered_lines(21..40)),
        ];
        let map = SanctionMap::build(&ops, 0, 40, 40);
        let expected: Vec<i64> = (16..=24).collect();
        assert_eq!(map.old.lines(), expected);
        assert_eq!(map.new.lines(), expected);
    }

    #[test]
    fn test_multi_line_change_window() {
        let ops = vec![
            DiffOp::new(OpKind::Equal, numbered_lines(0..20)),
            DiffOp::new(OpKind::Added, "a\nb\nc\n"),
            DiffOp::new(OpKind::Equal, numbered_lines(20..40)),
        ];
        let map = SanctionMap::build(&ops, 0, 40, 43);
        let expected: Vec<i64> = (16..=26).collect();
        assert_eq!(map.new.lines(), expected);
        assert!(map.old.lines().is_empty());
    }

    #[test]
    fn test_change_without_line_break_sanctions_its_line() {
        let ops = vec![
            DiffOp::new(OpKind::Equal, numbered_lines(0..10)),
            DiffOp::new(OpKind::Removed, "tail"),
        ];
        let map = SanctionMap::build(&ops, 0, 11, 10);
        let expected: Vec<i64> = (6..=11).collect();
        assert_eq!(map.old.lines(), expected);
    }

    #[test]
    fn test_only_real_lines_count_as_changes() {
        let mut sanctioned = Sanctioned::default();
        assert!(!sanctioned.has_changes());
        sanctioned.mark(-2..=-1);
        assert!(!sanctioned.has_changes());
        sanctioned.mark(0..=0);
        assert!(sanctioned.has_changes());
    }

    #[test]
    fn test_window_is_clamped_to_bounds() {
        let ops = vec![
            DiffOp::new(OpKind::Removed, "first\n"),
            DiffOp::new(OpKind::Equal, numbered_lines(1..3)),
        ];
        let map = SanctionMap::build(&ops, 0, 3, 2);
        assert_eq!(map.old.lines(), vec![0, 1, 2, 3]);
        assert!(map.new.lines().is_empty());
    }

    #[test]
    fn test_offset_lines_always_sanctioned() {
        let ops = vec![DiffOp::new(OpKind::Equal, numbered_lines(0..30))];
        let map = SanctionMap::build(&ops, 2, 30, 30);
        assert_eq!(map.old.lines(), vec![-2, -1]);
        assert_eq!(map.new.lines(), vec![-2, -1]);
    }

    #[test]
    fn test_changes_inside_offset_lines_do_not_sanction_content() {
        let ops = vec![
            DiffOp::new(OpKind::Removed, "a.txt\n"),
            DiffOp::new(OpKind::Added, "b.txt\n"),
            DiffOp::new(OpKind::Equal, "\n"),
            DiffOp::new(OpKind::Equal, numbered_lines(0..30)),
        ];
        let map = SanctionMap::build(&ops, 2, 32, 32);
        assert_eq!(map.old.lines(), vec![-2, -1]);
    }

    #[test]
    fn test_overlapping_windows_merge() {
        let ops = vec![
            DiffOp::new(OpKind::Equal, numbered_lines(0..10)),
            DiffOp::new(OpKind::Removed, "x\n"),
            DiffOp::new(OpKind::Equal, numbered_lines(11..14)),
            DiffOp::new(OpKind::Removed, "y\n"),
            DiffOp::new(OpKind::Equal, numbered_lines(15..40)),
        ];
        let map = SanctionMap::build(&ops, 0, 40, 40);
        let expected: Vec<i64> = (6..=18).collect();
        assert_eq!(map.old.lines(), expected);
        assert!(map.new.lines().is_empty());
    }
}
