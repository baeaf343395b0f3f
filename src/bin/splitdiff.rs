use ::console::Term;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap::FromArgMatches;
#[cfg(panic = "unwind")]
use human_panic::setup_panic;
use libsplitdiff::cli::{self, Args};
use libsplitdiff::config::{Config, ReadError};
use libsplitdiff::console_utils;
use libsplitdiff::diff::DiffType;
use libsplitdiff::render::{self, Options};
use log::{LevelFilter, debug, error, info, warn};
use serde_json as json;
use std::io::{self, Read};

#[cfg(feature = "jemallocator")]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Return an instance of [Config] from a config file path (or the inferred default path)
///
/// If a config path isn't provided or there is some other failure, fall back to the default
/// config. This will error out if a config is found but is found to be an invalid config.
fn derive_config(args: &Args) -> Result<Config> {
    if args.no_config {
        info!("`no_config` specified, falling back to default config");
        return Ok(Config::default());
    }
    match Config::try_from_file(args.config.as_ref()) {
        Ok(config) => Ok(config),
        Err(e) => match e {
            // Not having a config file at all is normal, and an unreadable file isn't worth
            // refusing to run over
            ReadError::ReadFileFailure(_) | ReadError::NoDefault => {
                warn!("{} - falling back to default config", e);
                Ok(Config::from_env()?)
            }
            // A config that exists but doesn't parse is a mistake the user needs to hear about
            ReadError::DeserializationFailure(e) => {
                error!("Failed to deserialize config file: {}", e);
                Err(anyhow::anyhow!(e))
            }
        },
    }
}

/// Apply the command line overrides on top of the config.
fn apply_args(args: &Args, config: &mut Config) -> Result<()> {
    if let Some(diff_type) = &args.diff_type {
        config.diff_type = DiffType::from_name(diff_type)?;
    }
    if args.columns.is_some() {
        config.columns = args.columns;
    }
    config.truncate |= args.truncate;
    config.show_large_hunks |= args.show_large_hunks;
    if args.no_line_numbers {
        config.line_numbers = false;
    }
    Ok(())
}

/// Render the diff described by the arguments
fn run_diff(args: &Args, options: &Options) -> Result<String> {
    match (&args.old, &args.new) {
        (Some(old), Some(new)) => libsplitdiff::split_files(old, new, options),
        _ => {
            debug!("No input files, reading a patch from stdin");
            let mut patch = String::new();
            io::stdin()
                .read_to_string(&mut patch)
                .context("Failed to read a patch from stdin")?;
            Ok(render::split_patch(&patch, options)?)
        }
    }
}

/// Serialize the default options struct to a json file and print that to stdout
fn dump_default_config() -> Result<()> {
    let config = Config::default();
    println!("{}", json::to_string_pretty(&config)?);
    Ok(())
}

/// Print shell completion scripts to `stdout`.
///
/// This is a basic wrapper for the subcommand.
fn print_shell_completion(shell: clap_complete::Shell) {
    let mut app = cli::Args::command();
    clap_complete::generate(shell, &mut app, "splitdiff", &mut io::stdout());
}

fn main() -> Result<()> {
    // Set up a panic handler that will yield more human-readable errors.
    #[cfg(panic = "unwind")]
    setup_panic!();

    use cli::Command;

    let command = Args::command();
    let matches = command.get_matches();
    let args = Args::from_arg_matches(&matches)?;

    let log_level = if args.debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Off
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log_level)
        .init();

    // We parse the config as early as possible so users can get quick feedback if anything is off
    // with their config.
    let mut config = derive_config(&args)?;

    if let Some(cmd) = args.cmd {
        match cmd {
            Command::DumpDefaultConfig => dump_default_config()?,
            Command::GenCompletion { shell } => print_shell_completion(shell),
        }
        return Ok(());
    }

    // An unsupported diff type fails here, before any input is read
    apply_args(&args, &mut config)?;
    console_utils::set_term_colors(args.color_output);
    let columns = console_utils::terminal_width(config.columns);
    let options = config.to_options(columns, 0);

    let output = run_diff(&args, &options)?;
    // Buffer the whole render so the terminal is written to once
    let term = Term::buffered_stdout();
    if !output.is_empty() {
        term.write_line(&output)?;
    }
    term.flush()?;
    Ok(())
}
