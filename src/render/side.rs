//! A single column of a side-by-side diff.

use super::sanction::Sanctioned;
use super::{MIN_COLUMN_WIDTH, SideStyles};
use crate::string_utils::{center, pad_left, pad_right, paint, wrap};
use log::trace;

/// The marker drawn in place of elided lines.
const ELLIPSIS: &str = "...";

/// What goes in the gutter on the left of every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gutter {
    /// No gutter at all, e.g. for file name headers.
    Plain,
    /// Line numbers right-aligned to `digits` columns, followed by a space.
    Numbered { digits: usize },
}

impl Gutter {
    /// A numbered gutter wide enough for every line number up to `max_line`.
    pub fn numbered(max_line: usize) -> Self {
        Gutter::Numbered {
            digits: max_line.max(1).to_string().len(),
        }
    }

    /// The visible width of the gutter.
    pub fn width(self) -> usize {
        match self {
            Gutter::Plain => 0,
            Gutter::Numbered { digits } => digits + 1,
        }
    }
}

/// The rows of one column, and the state needed to build them.
///
/// Text arrives in fragments that may start or end in the middle of a line. Fragments accumulate
/// until a line break completes a logical line, which is then wrapped into one or more physical
/// rows.
#[derive(Debug)]
pub(crate) struct Side {
    /// The number of the line currently being accumulated
    line_number: i64,
    /// The number of the first line this side ever saw
    first_line_number: i64,
    /// The part of the current line received so far
    pending: String,
    /// Whether any fragment of the current line was changed
    pending_changed: bool,
    /// Fully rendered rows, in display order
    rows: Vec<String>,
    /// Present when truncation is on. Lines outside the set are elided.
    sanctioned: Option<Sanctioned>,
    gutter: Gutter,
    column_width: usize,
    wrap_width: usize,
    styles: SideStyles,
    changed_rows: usize,
}

impl Side {
    /// Create an empty side.
    ///
    /// `first_line_number` is the number the first line receives. It's negative when there are
    /// synthetic offset lines at the top; those lines are drawn without a line number. Displayed
    /// line numbers are one-based.
    pub fn new(
        column_width: usize,
        gutter: Gutter,
        styles: SideStyles,
        first_line_number: i64,
    ) -> Self {
        // Line numbers are dropped when they'd leave no room for a wide grapheme
        let gutter = if gutter.width() + MIN_COLUMN_WIDTH <= column_width {
            gutter
        } else {
            Gutter::Plain
        };
        let wrap_width = column_width.saturating_sub(gutter.width()).max(1);
        Side {
            line_number: first_line_number,
            first_line_number,
            pending: String::new(),
            pending_changed: false,
            rows: Vec::new(),
            sanctioned: None,
            gutter,
            column_width,
            wrap_width,
            styles,
            changed_rows: 0,
        }
    }

    /// Only render the sanctioned lines, collapsing everything else into ellipses.
    ///
    /// A set without any change on this side has nothing to collapse around, so the side keeps
    /// showing every line.
    pub fn with_sanctioned(mut self, sanctioned: Sanctioned) -> Self {
        if sanctioned.has_changes() {
            self.sanctioned = Some(sanctioned);
        } else {
            trace!("No changes on this side, nothing to truncate");
        }
        self
    }

    /// The number of rows rendered so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The number of rows that were rendered with the changed style.
    pub fn changed_rows(&self) -> usize {
        self.changed_rows
    }

    /// Accept a fragment of text.
    ///
    /// Every line break in `text` completes the line being accumulated. Changed fragments are
    /// emphasized inline and mark the whole line as changed.
    pub fn push(&mut self, text: &str, changed: bool) {
        let mut pieces = text.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            let line_break = pieces.peek().is_some();
            if !piece.is_empty() {
                if changed {
                    let emphasized = self.styles.emphasis.apply_to(piece).to_string();
                    self.pending.push_str(&emphasized);
                } else {
                    self.pending.push_str(piece);
                }
            }
            if !piece.is_empty() || line_break {
                self.pending_changed |= changed;
            }
            if line_break {
                let line = std::mem::take(&mut self.pending);
                let line_changed = std::mem::take(&mut self.pending_changed);
                self.add_line(&line, line_changed);
            }
        }
    }

    /// Complete a trailing line that never received a line break.
    pub fn finish(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            let line_changed = std::mem::take(&mut self.pending_changed);
            self.add_line(&line, line_changed);
        }
    }

    /// Append one logical line.
    ///
    /// The line number always advances, even if the line isn't sanctioned and gets elided.
    pub fn add_line(&mut self, text: &str, changed: bool) {
        let number = self.line_number;
        self.line_number += 1;

        if let Some(sanctioned) = &self.sanctioned {
            if !sanctioned.contains(number) {
                trace!("Eliding line {number}");
                return;
            }
            if number > self.first_line_number && !sanctioned.contains(number - 1) {
                self.ellipsis();
            }
        }
        self.render_line(number, text, changed);
    }

    /// Close a collapsed region that runs to the end of the input.
    ///
    /// This adds an ellipsis if the last line this side saw was elided.
    pub fn close_gap(&mut self) {
        let last = self.line_number - 1;
        let elided = self
            .sanctioned
            .as_ref()
            .is_some_and(|sanctioned| !sanctioned.contains(last));
        if elided && last >= self.first_line_number {
            self.ellipsis();
        }
    }

    /// Append `count` blank rows.
    pub fn pad_lines(&mut self, count: usize) {
        self.rows
            .extend(std::iter::repeat_n(" ".repeat(self.column_width), count));
    }

    /// Append a row with a centered ellipsis.
    pub fn ellipsis(&mut self) {
        let marker = center(ELLIPSIS, self.column_width);
        self.rows
            .push(self.styles.ellipsis.apply_to(marker).to_string());
    }

    /// Throw away everything rendered so far and show `message` instead.
    pub fn replace_with_notice(&mut self, message: &str) {
        self.rows.clear();
        self.pending.clear();
        self.pending_changed = false;
        self.changed_rows = 0;
        if message.is_empty() {
            return;
        }
        for chunk in wrap(message, self.column_width) {
            self.rows.push(pad_right(&chunk, self.column_width));
        }
    }

    /// Consume the side and return its rows.
    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    fn render_line(&mut self, number: i64, text: &str, changed: bool) {
        // Synthetic offset lines carry no number and are always drawn neutral
        let display_number = (number >= 0).then_some(number + 1);
        let changed = changed && display_number.is_some();
        let gutter_width = self.gutter.width();

        for (idx, chunk) in wrap(text, self.wrap_width).iter().enumerate() {
            let gutter = match (self.gutter, display_number) {
                (Gutter::Numbered { digits }, Some(n)) if idx == 0 => {
                    format!("{} ", pad_left(&n.to_string(), digits))
                }
                _ => " ".repeat(gutter_width),
            };
            let body = pad_right(chunk, self.wrap_width);

            let mut row = String::with_capacity(self.column_width);
            if gutter_width > 0 {
                row.push_str(&self.styles.gutter.apply_to(gutter).to_string());
            }
            if changed {
                row.push_str(&paint(&body, &self.styles.changed));
                self.changed_rows += 1;
            } else {
                row.push_str(&body);
            }
            self.rows.push(row);
        }
    }
}
