//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::NotFound(_) => exitcode::NOINPUT,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                    ApplicationError::Domain(DomainError::ExampleNotFound(_)) => exitcode::NOINPUT,
                    ApplicationError::Domain(_) => exitcode::DATAERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case(CliError::Usage("x".into()), exitcode::USAGE)]
    #[case(ApplicationError::NotFound(PathBuf::from("t.json")).into(), exitcode::NOINPUT)]
    #[case(ApplicationError::Config { message: "bad".into() }.into(), exitcode::CONFIG)]
    #[case(ApplicationError::from(DomainError::MissingRoot).into(), exitcode::DATAERR)]
    #[case(ApplicationError::from(DomainError::ExampleNotFound("x".into())).into(), exitcode::NOINPUT)]
    #[case(
        InfraError::io("write", std::io::Error::other("disk full")).into(),
        exitcode::IOERR
    )]
    fn given_error_when_mapping_then_uses_sysexits_code(#[case] err: CliError, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }
}
