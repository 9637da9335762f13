//! Error types.
//!
//! Configuration and input problems are reported synchronously before any
//! solver call. Solver outcomes (optimal, time limit, infeasible) are not
//! errors; they travel in [`SolveStatus`](crate::milp::SolveStatus).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors raised while generating instances, building models or decoding
/// solver output.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The scenario name is not one of `loose`, `medium`, `tight`.
    #[error("unknown scenario '{0}', expected one of 'loose', 'medium', 'tight'")]
    InvalidScenario(String),
    /// The job count is zero.
    #[error("job count must be positive, got {0}")]
    InvalidSize(usize),
    /// A parameter or an input vector is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The solver returned values that do not form a valid assignment.
    #[error("solver assignment is inconsistent: {0}")]
    InconsistentAssignment(String),
    /// The solver backend failed internally.
    #[error("solver backend failed: {0}")]
    Oracle(String),
    #[error("IO error, more details: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
}

impl ScheduleError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Errors raised while reading the whitespace-separated problem inputs.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input, expected {0}")]
    MissingToken(&'static str),
    #[error("'{token}' is not a valid {expected}")]
    InvalidToken {
        token: String,
        expected: &'static str,
    },
    #[error("expected {expected} entries, but read {parsed}")]
    CountMismatch { expected: usize, parsed: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScheduleError::InvalidScenario("harsh".into());
        assert!(err.to_string().contains("'harsh'"));

        let err = ScheduleError::InvalidSize(0);
        assert_eq!(err.to_string(), "job count must be positive, got 0");

        let err = ScheduleError::config("time limit must be positive");
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));

        let err = ScheduleError::from(InputError::MissingToken("capacity"));
        assert_eq!(
            err.to_string(),
            "invalid input: unexpected end of input, expected capacity"
        );
    }

    #[test]
    fn test_input_error_messages() {
        let err = InputError::InvalidToken {
            token: "x".into(),
            expected: "weight",
        };
        assert_eq!(err.to_string(), "'x' is not a valid weight");

        let err = InputError::CountMismatch {
            expected: 3,
            parsed: 2,
        };
        assert_eq!(err.to_string(), "expected 3 entries, but read 2");
    }
}
