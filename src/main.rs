//! setup-doc CLI entry point
//!
//! Checks that a project environment is ready to run.

use clap::Parser;
use setup_doc::cli::args::{Args, Command, OutputFormat};
use setup_doc::cli::output::{format_comparison, get_formatter};
use setup_doc::config::DoctorConfig;
use setup_doc::engine::result::load_baseline;
use setup_doc::version::get_build_info;
use setup_doc::{run_doctor, RunReport, SetupDocError};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const EXIT_REQUIRED_FAILED: u8 = 1;
const EXIT_ADVISORY_FAILED: u8 = 2;
const EXIT_USAGE: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    init_tracing(args.verbose);

    let result = match args.command() {
        Command::Version => print_version(args.format),
        Command::Init => print_default_config(),
        Command::List => list_checks(&args),
        Command::Check => run_checks(&args).await,
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_USAGE)
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_version(format: OutputFormat) -> Result<ExitCode, SetupDocError> {
    let info = get_build_info();
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&info).map_err(|e| SetupDocError::Parse {
                context: "version".to_string(),
                message: e.to_string(),
            })?;
            println!("{}", json);
        }
        _ => println!("{}", info),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_default_config() -> Result<ExitCode, SetupDocError> {
    print!("{}", DoctorConfig::default().to_toml()?);
    Ok(ExitCode::SUCCESS)
}

fn list_checks(args: &Args) -> Result<ExitCode, SetupDocError> {
    let runner = args.doctor_options().build_runner()?;

    println!("Checks ({}):", runner.checks().len());
    for check in runner.checks() {
        match check.failure_hint() {
            Some(hint) => println!("  [{}] {} - {}", check.severity(), check.name(), hint),
            None => println!("  [{}] {}", check.severity(), check.name()),
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_checks(args: &Args) -> Result<ExitCode, SetupDocError> {
    // Load the baseline first so a bad path fails before any check runs
    let baseline = args.baseline.as_deref().map(load_baseline).transpose()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, skipping remaining checks");
            on_interrupt.cancel();
        }
    });

    let report = run_doctor(&args.doctor_options(), &cancel).await?;

    let formatter = get_formatter(args.format, args.color_enabled(), args.verbose, args.quiet);
    println!("{}", formatter.format(&report));

    if let Some(baseline) = baseline {
        eprintln!();
        eprint!("{}", format_comparison(&report.compare_to_baseline(&baseline)));
    }

    Ok(exit_code(&report))
}

fn exit_code(report: &RunReport) -> ExitCode {
    let summary = report.summary();
    if summary.required_failed > 0 {
        ExitCode::from(EXIT_REQUIRED_FAILED)
    } else if summary.failed > 0 {
        ExitCode::from(EXIT_ADVISORY_FAILED)
    } else {
        ExitCode::SUCCESS
    }
}
