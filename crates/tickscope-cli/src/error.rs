//! Error types for the tickscope CLI

use thiserror::Error;
use tickscope_graph::GraphError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Monitor error: {0}")]
    Graph(#[from] GraphError),

    #[error("Source thread '{0}' panicked")]
    SourcePanicked(&'static str),

    #[error("Failed to spawn source thread: {0}")]
    Spawn(std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfiguration(_) => 2,
            Self::Graph(e) if e.is_configuration() => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_exit_with_two() {
        assert_eq!(
            CliError::InvalidConfiguration("fps must be positive".into()).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(GraphError::parse("expected value")).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(GraphError::ClockRateMismatch {
                config: 1_000,
                clock: 1_000_000_000,
            })
            .exit_code(),
            2
        );
    }

    #[test]
    fn test_runtime_errors_exit_with_one() {
        assert_eq!(CliError::SourcePanicked("Timer").exit_code(), 1);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(CliError::from(io).exit_code(), 1);
    }
}
