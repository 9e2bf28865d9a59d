//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ResolveOptions;

/// Print the build version of a project.
///
/// Uses the git tag at HEAD, then the short HEAD commit id, then the
/// version declared in the nearest package.json or Cargo.toml.
#[derive(Parser)]
#[command(name = "build-version")]
#[command(version)]
pub struct Cli {
    /// Directory to resolve the version in (defaults to the current directory).
    #[arg(short = 'C', long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Print the version, its source and dirty flag as JSON.
    #[arg(long)]
    pub json: bool,

    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Resolution options selected by the arguments.
    #[must_use]
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            cwd: self.cwd.clone(),
        }
    }

    /// Log filter directive for the selected verbosity.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
