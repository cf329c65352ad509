//! CLI-level errors (wraps dispatch errors)

use thiserror::Error;

use crate::application::DispatchError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Dispatch(#[from] DispatchError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Dispatch(e) if e.is_usage() => crate::exitcode::USAGE,
            CliError::Dispatch(_) => crate::exitcode::SOFTWARE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;

    #[test]
    fn test_exit_codes() {
        let usage: CliError = DispatchError::from(ParseError::UndefinedFlag {
            name: "x".into(),
        })
        .into();
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);

        let software: CliError = DispatchError::Intercepted("boom".into()).into();
        assert_eq!(software.exit_code(), crate::exitcode::SOFTWARE);
    }
}
