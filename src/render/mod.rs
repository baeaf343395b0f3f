//! Side-by-side rendering of diffs.
//!
//! The rendering engine turns an ordered sequence of [diff operations](crate::diff::DiffOp) into
//! two fixed-width columns that are kept in lockstep row for row:
//!
//! - [`side`] accumulates the rows of a single column, wrapping long lines and drawing the gutter.
//! - [`sanction`] decides which unchanged lines are close enough to a change to be shown.
//! - [`pair`] couples a left and a right side and keeps their row counts equal.
//! - [`split`] drives all of the above for a pair of texts or a parsed patch.
//!
//! Everything in here is synchronous and allocates fresh state per comparison (or per hunk), so
//! the only inputs are the diff itself and the [`Options`].

mod pair;
mod sanction;
mod side;
mod split;

pub use self::sanction::CONTEXT_RADIUS;
pub use self::split::{
    LARGE_HUNK_MESSAGE, LARGE_HUNK_THRESHOLD, render_patch, split_ops, split_patch, split_strings,
};

use crate::diff::{DiffType, UnsupportedDiffType};
use crate::patch;
use console::{Color, Style};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fallback terminal width if none is provided.
pub const DEFAULT_COLUMNS: usize = 80;

/// The narrowest a side can get. Wide graphemes take two cells and still have to fit on a row.
pub const MIN_COLUMN_WIDTH: usize = 2;

/// Errors that stop a render before any output is produced.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    UnsupportedDiffType(#[from] UnsupportedDiffType),
    #[error("Patches can only be rendered line by line, but the diff type is '{0}'")]
    PatchRequiresLines(DiffType),
    #[error("Failed to parse the patch")]
    InvalidPatch(#[from] patch::ParseError),
}

/// The parameters for a single render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// The granularity of the diff. Patches only support [`DiffType::Lines`].
    pub diff_type: DiffType,
    /// The number of synthetic lines (e.g. an injected file name header) at the top of both texts.
    ///
    /// These lines are always shown and aren't numbered, so numbering starts at 1 right after them.
    pub line_offset: usize,
    /// Whether to collapse unchanged lines that are far away from any change.
    pub truncate: bool,
    /// The total output width. Each side gets half of it.
    pub columns: usize,
    /// Whether to render hunks that exceed [`LARGE_HUNK_THRESHOLD`].
    pub show_large_hunks: bool,
    /// Whether to draw line numbers in the gutter.
    pub line_numbers: bool,
    /// The colors to use.
    pub theme: Theme,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            diff_type: DiffType::default(),
            line_offset: 0,
            truncate: false,
            columns: DEFAULT_COLUMNS,
            show_large_hunks: false,
            line_numbers: true,
            theme: Theme::default(),
        }
    }
}

impl Options {
    /// The width of a single side.
    pub fn column_width(&self) -> usize {
        (self.columns / 2).max(MIN_COLUMN_WIDTH)
    }
}

/// A copy of the [Color](console::Color) enum so we can serialize using serde, and get around the
/// orphan rule.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(remote = "Color", rename_all = "snake_case")]
enum ColorDef {
    Color256(u8),
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    TrueColor(u8, u8, u8),
}

/// Workaround so we can use the `ColorDef` remote serialization mechanism with optional types
mod opt_color_def {
    use super::{Color, ColorDef};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Helper<'a>(#[serde(with = "ColorDef")] &'a Color);

        value.as_ref().map(Helper).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper(#[serde(with = "ColorDef")] Color);

        let helper = Option::deserialize(deserializer)?;
        Ok(helper.map(|Helper(external)| external))
    }
}

/// A helper function for the serde serializer
///
/// Due to the shenanigans we're using to serialize the optional color, we need to supply this
/// method so serde can infer a default value for an option when its key is missing.
fn default_option<T>() -> Option<T> {
    None
}

/// Colors for the rows of one side that contain changes.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ChangeStyle {
    /// Background color for every row of a changed line.
    #[serde(with = "opt_color_def", default = "default_option")]
    pub line_background: Option<Color>,
    /// Foreground color for the changed spans themselves.
    #[serde(with = "ColorDef")]
    pub emphasis_foreground: Color,
    /// Background color for the changed spans themselves.
    #[serde(with = "opt_color_def", default = "default_option")]
    pub emphasis_background: Option<Color>,
    /// Whether to bold the changed spans.
    pub bold: bool,
}

/// The colors used in a side-by-side diff.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct Theme {
    /// Styling for the left (old) column.
    pub removed: ChangeStyle,
    /// Styling for the right (new) column.
    pub added: ChangeStyle,
    /// Foreground color for line numbers.
    #[serde(with = "ColorDef")]
    pub gutter: Color,
    /// Foreground color for the `...` marker that stands in for elided lines.
    #[serde(with = "ColorDef")]
    pub ellipsis: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            removed: ChangeStyle {
                line_background: Some(Color::Color256(52)),
                emphasis_foreground: Color::Red,
                emphasis_background: Some(Color::Color256(88)),
                bold: true,
            },
            added: ChangeStyle {
                line_background: Some(Color::Color256(22)),
                emphasis_foreground: Color::Green,
                emphasis_background: Some(Color::Color256(28)),
                bold: true,
            },
            gutter: Color::Color256(240),
            ellipsis: Color::Cyan,
        }
    }
}

/// The concrete styles a single side renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SideStyles {
    /// Applied to every row of a changed line.
    pub changed: Style,
    /// Applied to the changed spans inside a line.
    pub emphasis: Style,
    /// Applied to the gutter.
    pub gutter: Style,
    /// Applied to ellipsis rows.
    pub ellipsis: Style,
}

impl SideStyles {
    fn from_theme(change: &ChangeStyle, theme: &Theme) -> Self {
        let mut changed = Style::new();
        if let Some(bg) = change.line_background {
            changed = changed.bg(bg);
        }

        let mut emphasis = Style::new().fg(change.emphasis_foreground);
        if let Some(bg) = change.emphasis_background {
            emphasis = emphasis.bg(bg);
        }
        if change.bold {
            emphasis = emphasis.bold();
        }

        SideStyles {
            changed,
            emphasis,
            gutter: Style::new().fg(theme.gutter),
            ellipsis: Style::new().fg(theme.ellipsis).dim(),
        }
    }

    /// Styles for the left column.
    pub fn removed(theme: &Theme) -> Self {
        Self::from_theme(&theme.removed, theme)
    }

    /// Styles for the right column.
    pub fn added(theme: &Theme) -> Self {
        Self::from_theme(&theme.added, theme)
    }
}
