//! The diff operations consumed by the renderer, and an adapter that computes them.
//!
//! The renderer only ever sees an ordered sequence of [`DiffOp`]s. Where they come from is up to
//! the caller; [`compute_ops`] produces them with the `similar` crate.

use logging_timer::time;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// The granularity of a text diff.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    /// Compare character by character.
    #[strum(to_string = "chars", serialize = "diffChars")]
    #[serde(alias = "diffChars")]
    Chars,
    /// Compare line by line.
    #[default]
    #[strum(to_string = "lines", serialize = "diffLines")]
    #[serde(alias = "diffLines")]
    Lines,
}

/// A diff type name that isn't supported.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a supported diff type (expected 'chars' or 'lines')")]
pub struct UnsupportedDiffType(pub String);

impl DiffType {
    /// Parse a diff type from its name.
    ///
    /// This is what user input should go through, so an unknown name is rejected before any work
    /// is done.
    pub fn from_name(name: &str) -> Result<Self, UnsupportedDiffType> {
        name.parse()
            .map_err(|_| UnsupportedDiffType(name.to_string()))
    }
}

/// Which document(s) a span of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Text present in both documents
    Equal,
    /// Text only present in the old document
    Removed,
    /// Text only present in the new document
    Added,
}

/// One contiguous span of a diff.
///
/// `text` may span several lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    pub kind: OpKind,
    pub text: String,
}

impl DiffOp {
    pub fn new(kind: OpKind, text: impl Into<String>) -> Self {
        DiffOp {
            kind,
            text: text.into(),
        }
    }

    /// Create an operation from the `added`/`removed` flag pair that most diff libraries emit.
    ///
    /// If neither flag is set the text is unchanged. `added` wins if both are set.
    pub fn from_flags(added: bool, removed: bool, value: impl Into<String>) -> Self {
        let kind = match (added, removed) {
            (true, _) => OpKind::Added,
            (false, true) => OpKind::Removed,
            (false, false) => OpKind::Equal,
        };
        DiffOp::new(kind, value)
    }

    /// The number of line breaks in this operation's text.
    ///
    /// This is how far the line cursor of each affected document advances past this operation.
    pub fn line_breaks(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'\n').count()
    }
}

/// The number of logical lines in a document.
///
/// An empty document still counts as a single (empty) line.
pub fn line_count(text: &str) -> usize {
    text.lines().count().max(1)
}

/// Compute the diff operations between two texts.
///
/// Consecutive changes of the same kind are merged into a single operation, and within a
/// replacement the removed text always precedes the added text.
#[time("info", "diff::{}")]
pub fn compute_ops(old: &str, new: &str, diff_type: DiffType) -> Vec<DiffOp> {
    let text_diff = match diff_type {
        DiffType::Chars => TextDiff::from_chars(old, new),
        DiffType::Lines => TextDiff::from_lines(old, new),
    };

    let mut ops: Vec<DiffOp> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let tag = change.tag();
        let op = DiffOp::from_flags(
            tag == ChangeTag::Insert,
            tag == ChangeTag::Delete,
            change.value(),
        );
        match ops.last_mut() {
            Some(last) if last.kind == op.kind => last.text.push_str(&op.text),
            _ => ops.push(op),
        }
    }
    ops
}
