//! A lenient parser for unified diff patches, e.g. the output of `git diff` or `diff -u`.
//!
//! The parser only extracts what the renderer needs: the old/new file names and the hunks of each
//! file section. Extended headers (`index ...`, `new file mode ...`, etc.) are ignored. File names
//! are kept as they appear in the patch, so `a/` and `b/` prefixes survive.

use log::{debug, trace};
use thiserror::Error;

/// A contiguous block of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hunk {
    /// The first line of the hunk in the old file (1-based)
    pub old_start: usize,
    /// How many old lines the hunk covers
    pub old_lines: usize,
    /// The first line of the hunk in the new file (1-based)
    pub new_start: usize,
    /// How many new lines the hunk covers
    pub new_lines: usize,
    /// The raw hunk lines, each starting with ` `, `-`, `+` or `\`
    pub lines: Vec<String>,
}

/// The changes to a single file.
///
/// Either name may be missing if the patch is malformed. It's up to the consumer to decide what
/// to do with such entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilePatch {
    pub old_file_name: Option<String>,
    pub new_file_name: Option<String>,
    pub hunks: Vec<Hunk>,
}

/// Errors that can arise when parsing a patch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed hunk header on line {line}: '{header}'")]
    MalformedHunkHeader { line: usize, header: String },
}

/// Parse a `start[,count]` range from a hunk header. The count defaults to 1 when it's omitted.
fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Parse a header of the form `@@ -a,b +c,d @@ optional section heading`.
fn parse_hunk_header(header: &str) -> Option<Hunk> {
    let ranges = header.strip_prefix("@@ -")?;
    let (ranges, _heading) = ranges.split_once(" @@")?;
    let (old, new) = ranges.split_once(" +")?;
    let (old_start, old_lines) = parse_range(old)?;
    let (new_start, new_lines) = parse_range(new)?;
    Some(Hunk {
        old_start,
        old_lines,
        new_start,
        new_lines,
        lines: Vec::new(),
    })
}

/// Extract the file name from a `---`/`+++` header, dropping a trailing timestamp.
fn parse_file_name(header: &str) -> String {
    let name = header.split('\t').next().unwrap_or(header);
    name.trim_end().to_string()
}

/// Parse a unified diff into its file sections.
///
/// A new section starts at every `diff ...` or `Index: ...` line, or at a `---` header that
/// follows a section that already has an old file name. Hunk bodies are consumed according to
/// the line counts in their header, so removed lines that look like headers (`--- foo`) are still
/// read as hunk content.
pub fn parse_patch(text: &str) -> Result<Vec<FilePatch>, ParseError> {
    let mut files = Vec::new();
    let mut current: Option<FilePatch> = None;
    let mut lines = text.lines().enumerate().peekable();

    while let Some((idx, line)) = lines.next() {
        if line.starts_with("diff ") || line.starts_with("Index: ") {
            files.extend(current.take());
            current = Some(FilePatch::default());
            continue;
        }

        if let Some(name) = line.strip_prefix("--- ") {
            if current
                .as_ref()
                .is_some_and(|file| file.old_file_name.is_some() || !file.hunks.is_empty())
            {
                files.extend(current.take());
            }
            current.get_or_insert_with(FilePatch::default).old_file_name =
                Some(parse_file_name(name));
            continue;
        }

        if let Some(name) = line.strip_prefix("+++ ") {
            current.get_or_insert_with(FilePatch::default).new_file_name =
                Some(parse_file_name(name));
            continue;
        }

        if line.starts_with("@@") {
            let mut hunk =
                parse_hunk_header(line).ok_or_else(|| ParseError::MalformedHunkHeader {
                    line: idx + 1,
                    header: line.to_string(),
                })?;
            let (mut old_seen, mut new_seen) = (0, 0);

            while let Some(&(_, body)) = lines.peek() {
                let tag = body.chars().next().unwrap_or(' ');
                let wanted = old_seen < hunk.old_lines || new_seen < hunk.new_lines;
                // "\ No newline at end of file" may trail a hunk whose counts are exhausted
                if !wanted && tag != '\\' {
                    break;
                }
                match tag {
                    ' ' => {
                        old_seen += 1;
                        new_seen += 1;
                    }
                    '-' => old_seen += 1,
                    '+' => new_seen += 1,
                    '\\' => {}
                    _ => {
                        debug!("Hunk at line {} ended early at unexpected line", idx + 1);
                        break;
                    }
                }
                // Some tools strip the trailing space off empty context lines
                hunk.lines.push(if body.is_empty() {
                    " ".to_string()
                } else {
                    body.to_string()
                });
                lines.next();
            }
            trace!(
                "Parsed hunk -{},{} +{},{} with {} lines",
                hunk.old_start,
                hunk.old_lines,
                hunk.new_start,
                hunk.new_lines,
                hunk.lines.len()
            );
            current
                .get_or_insert_with(FilePatch::default)
                .hunks
                .push(hunk);
            continue;
        }

        trace!("Ignoring patch line {}", idx + 1);
    }
    files.extend(current);
    debug!("Parsed {} file section(s) from patch", files.len());
    Ok(files)
}
