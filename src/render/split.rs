//! Entry points that drive a [`Pair`] over two texts or a parsed patch.

use super::pair::Pair;
use super::sanction::SanctionMap;
use super::side::{Gutter, Side};
use super::{Options, SideStyles, SplitError};
use crate::diff::{self, DiffOp, DiffType, OpKind};
use crate::patch::{self, FilePatch, Hunk};
use crate::string_utils::normalize_tabs;
use log::{debug, info, warn};
use logging_timer::time;

/// Hunks whose raw lines add up to more characters than this are not rendered by default.
pub const LARGE_HUNK_THRESHOLD: usize = 150_000;

/// Shown in place of a hunk that exceeds [`LARGE_HUNK_THRESHOLD`].
pub const LARGE_HUNK_MESSAGE: &str =
    "This hunk is too large to display. Pass --show-large-hunks to render it anyway.";

/// Render two texts side by side.
///
/// Tabs are expanded before diffing, so every width computation sees the same text that ends up
/// on screen.
#[time("info", "render::{}")]
pub fn split_strings(old: &str, new: &str, options: &Options) -> String {
    let old = normalize_tabs(old);
    let new = normalize_tabs(new);
    let ops = diff::compute_ops(&old, &new, options.diff_type);
    split_ops(
        &ops,
        diff::line_count(&old),
        diff::line_count(&new),
        options,
    )
    .join("\n")
}

/// Render a sequence of diff operations into rows.
///
/// `old_total` and `new_total` are the number of lines in each text, counting the
/// `options.line_offset` synthetic lines.
pub fn split_ops(
    ops: &[DiffOp],
    old_total: usize,
    new_total: usize,
    options: &Options,
) -> Vec<String> {
    build_pair(ops, old_total, new_total, options).combine()
}

fn build_pair(ops: &[DiffOp], old_total: usize, new_total: usize, options: &Options) -> Pair {
    let offset = options.line_offset;
    let gutter = if options.line_numbers {
        Gutter::numbered(old_total.max(new_total).saturating_sub(offset))
    } else {
        Gutter::Plain
    };
    let first_line = -(offset as i64);
    let column_width = options.column_width();

    let mut left = Side::new(
        column_width,
        gutter,
        SideStyles::removed(&options.theme),
        first_line,
    );
    let mut right = Side::new(
        column_width,
        gutter,
        SideStyles::added(&options.theme),
        first_line,
    );
    if options.truncate {
        let map = SanctionMap::build(ops, offset, old_total, new_total);
        left = left.with_sanctioned(map.old);
        right = right.with_sanctioned(map.new);
    }

    let mut pair = Pair::new(left, right);
    for op in ops {
        pair.apply(op);
    }
    pair
}

/// Render a unified diff side by side.
///
/// Patches are always compared line by line, so any other diff type is rejected before the patch
/// is even parsed.
#[time("info", "render::{}")]
pub fn split_patch(text: &str, options: &Options) -> Result<String, SplitError> {
    if options.diff_type != DiffType::Lines {
        return Err(SplitError::PatchRequiresLines(options.diff_type));
    }
    let files = patch::parse_patch(text)?;
    Ok(render_patch(&files, options).join("\n"))
}

/// Render every file section of a parsed patch.
///
/// Sections that are missing either file name are skipped.
pub fn render_patch(files: &[FilePatch], options: &Options) -> Vec<String> {
    let mut rows = Vec::new();
    for file in files {
        let (Some(old_name), Some(new_name)) = (&file.old_file_name, &file.new_file_name) else {
            debug!("Skipping a patch section without both file names");
            continue;
        };
        info!("Rendering {} hunk(s) for {}", file.hunks.len(), new_name);
        rows.extend(render_file_header(old_name, new_name, options));
        for (idx, hunk) in file.hunks.iter().enumerate() {
            if idx > 0 {
                rows.extend(render_separator(options));
            }
            rows.extend(render_hunk(hunk, options));
        }
    }
    rows
}

/// A pair without line numbers, for rows that aren't source lines.
fn plain_pair(options: &Options) -> Pair {
    let column_width = options.column_width();
    Pair::new(
        Side::new(
            column_width,
            Gutter::Plain,
            SideStyles::removed(&options.theme),
            0,
        ),
        Side::new(
            column_width,
            Gutter::Plain,
            SideStyles::added(&options.theme),
            0,
        ),
    )
}

/// The two file names on a single row, followed by a blank row.
fn render_file_header(old_name: &str, new_name: &str, options: &Options) -> Vec<String> {
    let mut pair = plain_pair(options);
    pair.add_lines(
        &format!("{}\n", normalize_tabs(old_name)),
        &format!("{}\n", normalize_tabs(new_name)),
    );
    pair.pad_both(1);
    pair.combine()
}

/// An ellipsis row on both sides, between two hunks of the same file.
fn render_separator(options: &Options) -> Vec<String> {
    let mut pair = plain_pair(options);
    pair.ellipsis_both();
    pair.combine()
}

fn render_hunk(hunk: &Hunk, options: &Options) -> Vec<String> {
    let column_width = options.column_width();
    let gutter = if options.line_numbers {
        Gutter::numbered(
            (hunk.old_start + hunk.old_lines).max(hunk.new_start + hunk.new_lines),
        )
    } else {
        Gutter::Plain
    };
    let mut pair = Pair::new(
        Side::new(
            column_width,
            gutter,
            SideStyles::removed(&options.theme),
            hunk.old_start.saturating_sub(1) as i64,
        ),
        Side::new(
            column_width,
            gutter,
            SideStyles::added(&options.theme),
            hunk.new_start.saturating_sub(1) as i64,
        ),
    );

    let mut raw_length = 0;
    for line in &hunk.lines {
        raw_length += line.chars().count();
        if raw_length > LARGE_HUNK_THRESHOLD && !options.show_large_hunks {
            warn!(
                "Hunk -{},{} +{},{} is larger than {} characters, not rendering it",
                hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines, LARGE_HUNK_THRESHOLD
            );
            pair.mark_too_large(LARGE_HUNK_MESSAGE);
            break;
        }

        let mut chars = line.chars();
        let kind = match chars.next() {
            Some('-') => OpKind::Removed,
            Some('+') => OpKind::Added,
            Some('\\') => continue,
            _ => OpKind::Equal,
        };
        pair.push(kind, &format!("{}\n", normalize_tabs(chars.as_str())));
    }

    if !pair.is_too_large() {
        debug!(
            "Hunk -{},{} +{},{} has {} changed row(s)",
            hunk.old_start,
            hunk.old_lines,
            hunk.new_start,
            hunk.new_lines,
            pair.changed_rows()
        );
    }
    pair.combine()
}
