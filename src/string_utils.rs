//! Helpers for measuring, padding and wrapping text by its *visible* width.
//!
//! The text that flows through the renderer may already carry ANSI escape sequences (inline
//! emphasis for changed spans), so none of these helpers look at raw byte or character offsets.
//! Escape sequences contribute zero width and are never split.

use console::{Alignment, AnsiCodeIterator, Style, measure_text_width, pad_str};
use unicode_segmentation::UnicodeSegmentation;

/// What a single tab expands to before any width computation happens.
pub const TAB_REPLACEMENT: &str = "    ";

/// The SGR sequence that clears every active attribute.
const RESET: &str = "\x1b[0m";

/// The visible width of a string, ignoring escape sequences.
///
/// ```rust
/// # use libsplitdiff::string_utils::visible_width;
/// assert_eq!(visible_width("\x1b[31mred\x1b[0m"), 3);
/// ```
pub fn visible_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Right-pad `s` with spaces until it is `width` visible columns wide.
///
/// Strings that are already wider than `width` are returned unchanged.
pub fn pad_right(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Left, None).into_owned()
}

/// Left-pad `s` with spaces until it is `width` visible columns wide.
pub fn pad_left(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Right, None).into_owned()
}

/// Center `s` in a field `width` visible columns wide.
pub fn center(s: &str, width: usize) -> String {
    pad_str(s, width, Alignment::Center, None).into_owned()
}

/// Replace every tab with [`TAB_REPLACEMENT`].
pub fn normalize_tabs(s: &str) -> String {
    if !s.contains('\t') {
        return s.to_string();
    }
    s.replace('\t', TAB_REPLACEMENT)
}

/// Whether an escape sequence is a "select graphic rendition" sequence, i.e. a color or text
/// attribute.
fn is_sgr(code: &str) -> bool {
    code.starts_with("\x1b[") && code.ends_with('m')
}

/// Whether an SGR sequence resets every attribute.
fn is_reset(code: &str) -> bool {
    code == RESET || code == "\x1b[m"
}

/// Slice a string into chunks that are each `width` visible columns wide.
///
/// The last chunk may be narrower. An empty string yields exactly one empty chunk so that an empty
/// line still occupies a row.
///
/// Chunks are only ever split between graphemes. If a color is active at a split point, the chunk
/// is closed with a reset and the next chunk re-opens every sequence that was in effect, so each
/// chunk can be printed on its own without leaking or losing color state.
///
/// ```rust
/// # use libsplitdiff::string_utils::wrap;
/// assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
/// assert_eq!(wrap("", 4), vec![""]);
/// ```
pub fn wrap(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    // Every SGR sequence seen since the last reset
    let mut active = String::new();

    for (segment, is_ansi) in AnsiCodeIterator::new(s) {
        if is_ansi {
            if is_reset(segment) {
                active.clear();
            } else if is_sgr(segment) {
                active.push_str(segment);
            }
            current.push_str(segment);
            continue;
        }

        for grapheme in segment.graphemes(true) {
            let grapheme_width = measure_text_width(grapheme);
            if current_width > 0 && current_width + grapheme_width > width {
                if !active.is_empty() {
                    current.push_str(RESET);
                }
                chunks.push(std::mem::take(&mut current));
                current.push_str(&active);
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += grapheme_width;
        }
    }
    chunks.push(current);
    chunks
}

/// Apply `style` to every visible run of `s`.
///
/// Styling the whole string at once doesn't work when `s` contains its own resets: everything
/// after the first inner reset would lose the outer style. Instead each run of text is styled on
/// its own, with the sequences that were active before it replayed inside the outer style so they
/// still take precedence (e.g. an emphasis background over a line background).
pub fn paint(s: &str, style: &Style) -> String {
    let mut painted = String::with_capacity(s.len());
    let mut active = String::new();

    for (segment, is_ansi) in AnsiCodeIterator::new(s) {
        if is_ansi {
            if is_reset(segment) {
                active.clear();
            } else if is_sgr(segment) {
                active.push_str(segment);
            }
            continue;
        }
        let run = format!("{active}{segment}");
        painted.push_str(&style.apply_to(run).to_string());
    }
    painted
}
