//! Helper functions for dealing with the terminal

use crate::render::DEFAULT_COLUMNS;
use console::{Term, set_colors_enabled, set_colors_enabled_stderr};
use log::debug;
use strum::{Display, EnumString};

/// Whether the output to the terminal should be colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ColorOutputPolicy {
    /// Automatically enable color if printing to a TTY, otherwise disable color
    #[default]
    Auto,
    /// Force plaintext output
    Off,
    /// Force color output
    On,
}

/// Set terminal color settings based on the output policy.
pub fn set_term_colors(setting: ColorOutputPolicy) {
    let colors_enabled = match setting {
        ColorOutputPolicy::Auto => return,
        ColorOutputPolicy::On => true,
        ColorOutputPolicy::Off => false,
    };
    set_colors_enabled(colors_enabled);
    set_colors_enabled_stderr(colors_enabled);
}

/// The total width available for output.
///
/// An explicit override wins. Otherwise this asks the terminal attached to stdout, and falls back
/// to [`DEFAULT_COLUMNS`] when stdout isn't a terminal.
pub fn terminal_width(columns_override: Option<usize>) -> usize {
    if let Some(columns) = columns_override {
        debug!("Using {columns} columns from user override");
        return columns;
    }
    match Term::stdout().size_checked() {
        Some((_rows, columns)) => {
            debug!("Detected terminal width of {columns} columns");
            usize::from(columns)
        }
        None => {
            debug!("Unable to detect terminal size, using {DEFAULT_COLUMNS} columns");
            DEFAULT_COLUMNS
        }
    }
}
