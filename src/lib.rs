//! setup-doc library
//!
//! Environment readiness diagnostics for project setups.
//!
//! This library provides:
//! - A sequential diagnostic runner that always produces a complete report
//! - Built-in checks for files, directories, environment variables, ports,
//!   and manifest scripts
//! - A declarative TOML battery with a built-in default
//! - Text, JSON, and JUnit XML report formatting
//!
//! # Example
//!
//! ```no_run
//! use setup_doc::checks::FileExists;
//! use setup_doc::engine::check::CheckContext;
//! use setup_doc::engine::runner::DiagnosticRunner;
//! use setup_doc::summarize;
//!
//! # async fn demo() -> Result<(), setup_doc::SetupDocError> {
//! let mut runner = DiagnosticRunner::new(CheckContext::from_process());
//! runner.register_check("server.js exists", FileExists::new("server.js"), Some("create server.js"))?;
//! let report = runner.run().await;
//! println!("{}", summarize(&report));
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod platform;
pub mod version;

use config::DoctorConfig;
use engine::check::CheckContext;
use platform::env::{EnvSource, LayeredEnv, ProcessEnv};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

// Re-exports for public API
pub use cli::output::summarize;
pub use engine::check::{predicate_fn, Check, Predicate, Severity};
pub use engine::result::{CheckResult, ResultSummary, RunReport};
pub use engine::runner::DiagnosticRunner;

/// Error types for setup-doc operations.
///
/// Environment problems observed by checks are never errors; they are
/// recorded in the [`RunReport`].
#[derive(Debug, Error)]
pub enum SetupDocError {
    /// Two checks with the same name were registered
    #[error("duplicate check name: '{name}'")]
    DuplicateCheck { name: String },

    /// Config file missing or malformed
    #[error("invalid configuration{}: {message}", config_location(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    /// I/O error
    #[error("I/O error in {context}: {message}")]
    Io { context: String, message: String },

    /// Parse error
    #[error("parse error in {context}: {message}")]
    Parse { context: String, message: String },
}

/// Dotenv file picked up from the project root
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Options for a full diagnostic run.
#[derive(Debug, Clone)]
pub struct DoctorOptions {
    /// Project root that relative paths are resolved against
    pub root: PathBuf,
    /// Explicit config file (otherwise discovered in `root`)
    pub config_path: Option<PathBuf>,
    /// Dotenv file layered under the process environment, used as given
    /// like `config_path`; `.env` in `root` is used when present and this
    /// is unset
    pub env_file: Option<PathBuf>,
    /// Overrides the config's per-check timeout
    pub timeout_ms: Option<u64>,
}

impl Default for DoctorOptions {
    fn default() -> Self {
        DoctorOptions {
            root: PathBuf::from("."),
            config_path: None,
            env_file: None,
            timeout_ms: None,
        }
    }
}

impl DoctorOptions {
    /// Environment source described by these options
    pub fn env_source(&self) -> Result<Arc<dyn EnvSource>, SetupDocError> {
        let path = match &self.env_file {
            Some(path) => path.clone(),
            None => {
                let default = self.root.join(DEFAULT_ENV_FILE);
                if !default.is_file() {
                    return Ok(Arc::new(ProcessEnv));
                }
                default
            }
        };
        Ok(Arc::new(LayeredEnv::from_dotenv(&path)?))
    }

    /// Load the battery config and apply overrides
    pub fn load_config(&self) -> Result<DoctorConfig, SetupDocError> {
        let mut config = DoctorConfig::discover(&self.root, self.config_path.as_deref())?;
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = Some(timeout_ms);
        }
        Ok(config)
    }

    /// Build the runner for these options without executing anything
    pub fn build_runner(&self) -> Result<DiagnosticRunner, SetupDocError> {
        let config = self.load_config()?;
        let context = CheckContext::new(&self.root, self.env_source()?);
        config.build_runner(context)
    }
}

/// Run the configured battery.
///
/// This is the main entry point used by the CLI. The only errors are
/// configuration problems detected before any check executes.
///
/// # Example
///
/// ```no_run
/// use setup_doc::{run_doctor, DoctorOptions};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn demo() {
/// match run_doctor(&DoctorOptions::default(), &CancellationToken::new()).await {
///     Ok(report) => println!("Passed: {}, Failed: {}", report.passed_count(), report.failed_count()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// # }
/// ```
pub async fn run_doctor(
    options: &DoctorOptions,
    cancel: &CancellationToken,
) -> Result<RunReport, SetupDocError> {
    let runner = options.build_runner()?;
    tracing::info!(
        root = %options.root.display(),
        checks = runner.checks().len(),
        "starting diagnostic run"
    );
    Ok(runner.run_until_cancelled(cancel).await)
}

fn config_location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}
