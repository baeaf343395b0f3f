//! Two sides rendered in lockstep.

use super::side::Side;
use crate::diff::{DiffOp, OpKind};
use log::debug;

/// The left and right columns of one comparison or one hunk.
///
/// The two sides grow independently (removals only touch the left, additions only the right), so
/// before any unchanged text is added the shorter side is padded with blank rows. That way
/// unchanged lines always start on the same row on both sides.
#[derive(Debug)]
pub(crate) struct Pair {
    left: Side,
    right: Side,
    /// Set when the content is too large to render and a notice should be shown instead
    too_large: Option<String>,
}

impl Pair {
    pub fn new(left: Side, right: Side) -> Self {
        Pair {
            left,
            right,
            too_large: None,
        }
    }

    /// Pad the shorter side with blank rows so both sides have the same number of rows.
    pub fn align(&mut self) {
        let (left_rows, right_rows) = (self.left.row_count(), self.right.row_count());
        if left_rows < right_rows {
            self.left.pad_lines(right_rows - left_rows);
        } else if right_rows < left_rows {
            self.right.pad_lines(left_rows - right_rows);
        }
    }

    /// Add an unchanged fragment to each side.
    pub fn add_lines(&mut self, left: &str, right: &str) {
        self.left.push(left, false);
        self.right.push(right, false);
    }

    /// Add a fragment of the given kind, aligning first if it's unchanged text.
    pub fn push(&mut self, kind: OpKind, text: &str) {
        match kind {
            OpKind::Equal => {
                self.align();
                self.add_lines(text, text);
            }
            OpKind::Removed => self.left.push(text, true),
            OpKind::Added => self.right.push(text, true),
        }
    }

    pub fn apply(&mut self, op: &DiffOp) {
        self.push(op.kind, &op.text);
    }

    /// Add a blank row to both sides.
    pub fn pad_both(&mut self, count: usize) {
        self.align();
        self.left.pad_lines(count);
        self.right.pad_lines(count);
    }

    /// Add an ellipsis row to both sides.
    pub fn ellipsis_both(&mut self) {
        self.align();
        self.left.ellipsis();
        self.right.ellipsis();
    }

    /// Replace the whole pair with `notice` when it's combined.
    pub fn mark_too_large(&mut self, notice: &str) {
        self.too_large = Some(notice.to_string());
    }

    pub fn is_too_large(&self) -> bool {
        self.too_large.is_some()
    }

    /// The number of rows drawn with the changed style on either side.
    pub fn changed_rows(&self) -> usize {
        self.left.changed_rows() + self.right.changed_rows()
    }

    /// Finish both sides and join them into output rows.
    ///
    /// # Panics
    ///
    /// If the sides end up with different row counts. Alignment is an invariant of the pair and a
    /// mismatch means the sanctioning and rendering passes disagree.
    pub fn combine(mut self) -> Vec<String> {
        if let Some(notice) = self.too_large.take() {
            self.left.replace_with_notice(&notice);
            self.right.replace_with_notice("");
        } else {
            self.left.finish();
            self.right.finish();
            self.left.close_gap();
            self.right.close_gap();
        }
        self.align();

        let left = self.left.into_rows();
        let right = self.right.into_rows();
        assert_eq!(
            left.len(),
            right.len(),
            "Left and right sides have different row counts after alignment"
        );
        debug!("Combined pair into {} rows", left.len());
        left.into_iter()
            .zip(right)
            .map(|(left, right)| left + &right)
            .collect()
    }
}
