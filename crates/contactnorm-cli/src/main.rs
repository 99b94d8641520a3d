mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, fields, normalize, Context};
use crate::error::{exit_code_for, report_error};
use contactnorm_config as config;
use contactnorm_core::{DataNormalizer, NormalizationService};

#[derive(Debug, Parser)]
#[command(
    name = "contactnorm",
    version,
    about = "Normalize phone numbers and birth dates in contact CSV files"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Country code assumed for local phone numbers
    #[arg(long, global = true, value_name = "DIGITS")]
    country_code: Option<String>,
    /// Two-digit years up to this value are read as 20xx
    #[arg(long, global = true, value_name = "YY")]
    pivot_year: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize a `;`-delimited contacts file
    Normalize(normalize::NormalizeArgs),
    /// Normalize a single phone number
    Phone(fields::FieldArgs),
    /// Normalize a single date of birth
    Dob(fields::FieldArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        country_code,
        pivot_year,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let overrides = config::Overrides {
                default_country_code: country_code,
                pivot_year,
            };
            let app_config = config::load_with_overrides(config_path.clone(), &overrides)
                .with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
                debug!(
                    country_code = %app_config.normalizer.default_country_code,
                    pivot_year = app_config.normalizer.pivot_year,
                    base_year = app_config.normalizer.base_year,
                    "normalizer settings"
                );
            }

            let normalizer =
                DataNormalizer::new(app_config.normalizer).with_context(|| "build normalizer")?;
            let ctx = Context {
                service: NormalizationService::new(normalizer),
                json,
            };

            match command {
                Command::Normalize(args) => normalize::normalize(&ctx, args),
                Command::Phone(args) => fields::phone(&ctx, args),
                Command::Dob(args) => fields::dob(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
