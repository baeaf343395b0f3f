//! The supporting library for `splitdiff`.
//!
//! The binary is a thin layer over this crate. The interesting parts are:
//!
//! - [`render`], which lays out a diff as two columns kept in lockstep row for row.
//! - [`diff`], which turns two texts into the operations the renderer consumes.
//! - [`patch`], which reads unified diffs so they can be rendered hunk by hunk.

pub mod cli;
pub mod config;
pub mod console_utils;
pub mod diff;
mod figment_utils;
pub mod patch;
pub mod render;
pub mod string_utils;

use anyhow::{Context, Result};
use log::{debug, info};
use render::Options;
use std::{fs, path::Path};

/// The number of header lines [`split_files`] puts above each file's contents.
pub const FILE_HEADER_LINES: usize = 2;

/// Render two files side by side.
///
/// Each file's contents are preceded by its path and a blank line. Those header lines are always
/// shown and aren't numbered, so `options.line_offset` is overridden.
pub fn split_files(old: &Path, new: &Path, options: &Options) -> Result<String> {
    let old_text = read_with_header(old)?;
    let new_text = read_with_header(new)?;
    info!("Comparing {} and {}", old.display(), new.display());
    let options = Options {
        line_offset: FILE_HEADER_LINES,
        ..options.clone()
    };
    Ok(render::split_strings(&old_text, &new_text, &options))
}

fn read_with_header(path: &Path) -> Result<String> {
    debug!("Reading {} to string", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{}\n\n{}", path.display(), text))
}
