//! Command line arguments for setup-doc.

use crate::DoctorOptions;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Run the diagnostic battery (default)
    #[default]
    Check,
    /// List the checks in the battery without running them
    List,
    /// Print the default battery as TOML, ready to save as setup-doc.toml
    Init,
    /// Print version information
    Version,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON, reusable as a baseline
    Json,
    /// JUnit XML for CI integration
    Junit,
}

/// Parsed command line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "setup-doc",
    version,
    about = "Check that a project environment is ready to run",
    after_help = "EXIT CODES:\n    0  All checks passed\n    1  One or more required checks failed\n    2  Only advisory checks failed\n    3  Usage or configuration error"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Battery config file, relative to the current directory (default:
    /// setup-doc.toml in the project root)
    #[arg(long, global = true, env = "SETUP_DOC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root that relative paths are resolved against
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Dotenv file layered under the process environment, relative to the
    /// current directory (default: .env in the project root, if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, env = "SETUP_DOC_FORMAT")]
    pub format: OutputFormat,

    /// Only output failing checks
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Include severity and timing, and enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable colored output (also honours NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Per-check timeout in milliseconds, 0 disables it
    #[arg(long = "timeout", global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Compare the results against a JSON report saved earlier
    #[arg(long, global = true, value_name = "PATH")]
    pub baseline: Option<PathBuf>,
}

impl Args {
    /// The command to run, defaulting to `check`
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    /// Whether colored output should be produced
    pub fn color_enabled(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
    }

    /// Library options described by these arguments
    pub fn doctor_options(&self) -> DoctorOptions {
        DoctorOptions {
            root: self.root.clone(),
            config_path: self.config.clone(),
            env_file: self.env_file.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}
