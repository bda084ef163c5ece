//! Tagged result of a recoverable stage.

use std::fmt::Display;

/// A stage either completed or fell back to a substitute value.
///
/// Recoverable stages return this instead of `Result`, so a caller always
/// has a value to continue with.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Completed(T),
    Fallback { value: T, cause: String },
}

impl<T> StageOutcome<T> {
    /// Keep the success value, or substitute `fallback()` and record the cause.
    pub fn from_result<E: Display>(result: Result<T, E>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => StageOutcome::Completed(value),
            Err(e) => StageOutcome::Fallback {
                value: fallback(),
                cause: e.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StageOutcome::Fallback { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            StageOutcome::Completed(value) | StageOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            StageOutcome::Completed(_) => None,
            StageOutcome::Fallback { cause, .. } => Some(cause),
        }
    }

    pub fn into_value(self) -> T {
        match self {
            StageOutcome::Completed(value) | StageOutcome::Fallback { value, .. } => value,
        }
    }
}
