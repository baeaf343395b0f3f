//! Utilities and definitions for config handling

use crate::diff::DiffType;
use crate::figment_utils::{JsonProvider, kebab_env};
use crate::render::{Options, Theme};
use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::Format;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[cfg(target_os = "windows")]
use directories_next::ProjectDirs;

/// The expected filename for the config file
const CFG_FILE_NAME: &str = "config.json5";

/// Environment variables with this prefix override values from the config file
const ENV_PREFIX: &str = "SPLITDIFF_";

/// The config struct for the application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// How finely to compare two files. Patches are always compared by lines.
    pub diff_type: DiffType,

    /// Collapse unchanged lines that are far away from any change
    pub truncate: bool,

    /// Render hunks even if they're huge
    pub show_large_hunks: bool,

    /// Draw line numbers next to each line
    pub line_numbers: bool,

    /// A fixed output width. If this isn't set, the width of the terminal is used.
    pub columns: Option<usize>,

    /// Colors for the output
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            diff_type: DiffType::default(),
            truncate: false,
            show_large_hunks: false,
            line_numbers: true,
            columns: None,
            theme: Theme::default(),
        }
    }
}

/// The possible errors that can arise when attempting to read a config
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("The file failed to deserialize")]
    DeserializationFailure(#[from] anyhow::Error),
    #[error("Failed to read the config file")]
    ReadFileFailure(#[from] io::Error),
    #[error("Unable to compute the default config file path")]
    NoDefault,
}

impl Config {
    /// Layer the contents of a config file and the environment. Missing keys take their default
    /// values when the config is extracted.
    fn figment(contents: Option<&str>) -> Figment {
        let mut figment = Figment::new();
        if let Some(contents) = contents {
            figment = figment.merge(JsonProvider::string(contents));
        }
        figment.merge(kebab_env(ENV_PREFIX))
    }

    /// Read a config from a given filepath, or fall back to the default file paths
    pub fn try_from_file<P: AsRef<Path>>(path: Option<&P>) -> Result<Self, ReadError> {
        let config_fp: PathBuf = match path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_config_file_path().map_err(|_| ReadError::NoDefault)?,
        };
        info!("Reading config at {}", config_fp.to_string_lossy());
        let config_contents = fs::read_to_string(&config_fp)?;
        let config = Self::figment(Some(&config_contents))
            .extract()
            .with_context(|| format!("Failed to parse config at {}", config_fp.to_string_lossy()))
            .map_err(ReadError::DeserializationFailure)?;
        Ok(config)
    }

    /// The default config with environment overrides applied, for when there's no config file.
    pub fn from_env() -> Result<Self, ReadError> {
        let config = Self::figment(None)
            .extract()
            .context("Failed to read config from the environment")
            .map_err(ReadError::DeserializationFailure)?;
        Ok(config)
    }

    /// Render options for this config.
    ///
    /// `columns` is the total output width, which the caller resolves since the config value is
    /// only an override.
    pub fn to_options(&self, columns: usize, line_offset: usize) -> Options {
        Options {
            diff_type: self.diff_type,
            line_offset,
            truncate: self.truncate,
            columns,
            show_large_hunks: self.show_large_hunks,
            line_numbers: self.line_numbers,
            theme: self.theme.clone(),
        }
    }
}

/// Return the location of the config file (for *nix, Linux and MacOS), this will use
/// `$XDG_CONFIG_HOME/splitdiff`, where `$XDG_CONFIG_HOME` is `$HOME/.config` by default.
#[cfg(not(target_os = "windows"))]
fn default_config_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("splitdiff");
    xdg_dirs
        .find_config_file(CFG_FILE_NAME)
        .context("No config file in the XDG config directories")
}

/// Return the default location for the config file (for windows), this will use the roaming
/// application data directory.
#[cfg(target_os = "windows")]
fn default_config_file_path() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("", "", "splitdiff").context("Was not able to retrieve config path")?;
    let mut config_file: PathBuf = proj_dirs.config_dir().into();
    config_file.push(CFG_FILE_NAME);
    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::Color;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    const SAMPLE_CONFIG: &str = r#"{
        // Comments are allowed since this is JSON5
        "diff-type": "chars",
        truncate: true,
        columns: 120,
        theme: {
            gutter: "yellow",
        },
    }"#;

    #[test]
    fn test_sample_config() {
        Jail::expect_with(|jail| {
            jail.create_file(CFG_FILE_NAME, SAMPLE_CONFIG)?;
            let config = Config::try_from_file(Some(&PathBuf::from(CFG_FILE_NAME))).unwrap();
            assert_eq!(config.diff_type, DiffType::Chars);
            assert!(config.truncate);
            assert!(config.line_numbers);
            assert_eq!(config.columns, Some(120));
            assert_eq!(config.theme.gutter, Color::Yellow);
            assert_eq!(config.theme.added, Theme::default().added);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CFG_FILE_NAME, SAMPLE_CONFIG)?;
            jail.set_env("SPLITDIFF_TRUNCATE", "false");
            jail.set_env("SPLITDIFF_LINE_NUMBERS", "false");
            jail.set_env("SPLITDIFF_SHOW_LARGE_HUNKS", "true");
            let config = Config::try_from_file(Some(&PathBuf::from(CFG_FILE_NAME))).unwrap();
            assert!(!config.truncate);
            assert!(!config.line_numbers);
            assert!(config.show_large_hunks);
            Ok(())
        });
    }

    #[test]
    fn test_env_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("SPLITDIFF_COLUMNS", "90");
            let config = Config::from_env().unwrap();
            assert_eq!(config.columns, Some(90));
            assert_eq!(config.diff_type, DiffType::Lines);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_a_read_failure() {
        Jail::expect_with(|_| {
            let result = Config::try_from_file(Some(&PathBuf::from("nope.json5")));
            assert!(matches!(result, Err(ReadError::ReadFileFailure(_))));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_a_deserialization_failure() {
        Jail::expect_with(|jail| {
            jail.create_file(CFG_FILE_NAME, "{ truncate: ")?;
            let result = Config::try_from_file(Some(&PathBuf::from(CFG_FILE_NAME)));
            assert!(matches!(result, Err(ReadError::DeserializationFailure(_))));
            Ok(())
        });
    }

    #[test]
    fn test_unsupported_diff_type_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(CFG_FILE_NAME, r#"{ "diff-type": "words" }"#)?;
            let result = Config::try_from_file(Some(&PathBuf::from(CFG_FILE_NAME)));
            assert!(matches!(result, Err(ReadError::DeserializationFailure(_))));
            Ok(())
        });
    }

    #[test]
    fn test_legacy_diff_type_names() {
        Jail::expect_with(|jail| {
            jail.create_file(CFG_FILE_NAME, r#"{ "diff-type": "diffLines" }"#)?;
            let config = Config::try_from_file(Some(&PathBuf::from(CFG_FILE_NAME))).unwrap();
            assert_eq!(config.diff_type, DiffType::Lines);
            Ok(())
        });
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::default();
        let serialized = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = json5::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_to_options() {
        let config = Config {
            truncate: true,
            line_numbers: false,
            ..Default::default()
        };
        let options = config.to_options(100, 2);
        assert_eq!(options.columns, 100);
        assert_eq!(options.line_offset, 2);
        assert!(options.truncate);
        assert!(!options.line_numbers);
        assert_eq!(options.diff_type, DiffType::Lines);
    }
}
