use anyhow::Error;
use contactnorm_config::ConfigError;
use contactnorm_core::{FieldError, PipelineError, PipelineErrorKind, SettingsError};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    let root = err.root_cause();
    if verbose {
        eprintln!("error: {:#}", err);
    } else if err.chain().count() > 1 {
        eprintln!("error: {}: {}", err, root);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &Error) -> u8 {
    for cause in err.chain() {
        if cause.downcast_ref::<CliError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
        if let Some(pipeline_err) = cause.downcast_ref::<PipelineError>() {
            return pipeline_exit_code(pipeline_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if cause.downcast_ref::<FieldError>().is_some()
            || cause.downcast_ref::<SettingsError>().is_some()
        {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn pipeline_exit_code(err: &PipelineError) -> u8 {
    match err.kind() {
        PipelineErrorKind::Input if matches!(err, PipelineError::Read(_)) => EXIT_FAILURE,
        PipelineErrorKind::Input | PipelineErrorKind::Schema | PipelineErrorKind::Malformed => {
            EXIT_INVALID_INPUT
        }
        PipelineErrorKind::Output => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidSettings(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
