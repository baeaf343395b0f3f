//! Code related to the CLI

use crate::console_utils::ColorOutputPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Side-by-side diffs in the terminal.
///
/// With two files, compare them. With no files, read a unified diff (such as the output of `git
/// diff`) from stdin and render every hunk in it.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Option<Command>,

    /// Print debug output
    ///
    /// This will print debug logs at the trace level. This is useful for debugging and bug reports
    /// should contain debug logging info.
    #[clap(short, long)]
    pub debug: bool,

    /// The first file to compare against
    ///
    /// Text that is in this file but is not in the new file is considered a deletion
    #[clap(value_name = "OLD", requires = "new")]
    pub old: Option<PathBuf>,

    /// The file that the old file is compared against
    ///
    /// Text that is in this file but is not in the old file is considered an addition
    #[clap(value_name = "NEW")]
    pub new: Option<PathBuf>,

    /// Compare files by `lines` or by `chars`
    ///
    /// This overrides the config. Patches read from stdin only support `lines`.
    #[clap(short = 't', long)]
    pub diff_type: Option<String>,

    /// The total width of the output
    ///
    /// Defaults to the width of the terminal, or 80 columns if stdout isn't a terminal.
    #[clap(short = 'w', long)]
    pub columns: Option<usize>,

    /// Collapse unchanged lines that are far away from any change
    #[clap(long)]
    pub truncate: bool,

    /// Render hunks that would otherwise be too large to display
    #[clap(long)]
    pub show_large_hunks: bool,

    /// Don't draw line numbers
    #[clap(long)]
    pub no_line_numbers: bool,

    /// Set the color output policy. Valid values are: "auto", "on", "off".
    ///
    /// "auto" will automatically detect whether colors should be applied by trying to determine
    /// whether the process is outputting to a TTY. "on" will enable output and "off" will
    /// disable color output regardless of whether the process detects a TTY.
    #[clap(long, default_value_t)]
    pub color_output: ColorOutputPolicy,

    /// Manually set the file path for the config file
    #[clap(short, long, env = "SPLITDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore any config files and use the default config
    #[clap(short, long)]
    pub no_config: bool,
}

/// Commands that don't involve rendering a diff
#[derive(Debug, Eq, PartialEq, Clone, Copy, Subcommand)]
pub enum Command {
    /// Dump the default config to stdout
    DumpDefaultConfig,

    /// Generate shell completion scripts for splitdiff
    GenCompletion {
        /// The shell to generate completion scripts for.
        #[clap(value_enum)]
        shell: clap_complete::Shell,
    },
}
