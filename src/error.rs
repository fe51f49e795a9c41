//! Error types produced by listener execution.
//!
//! [`TaskError`] is the outcome type of every scheduled listener invocation.
//! It is never thrown into `emit`; it only reaches whoever awaits the
//! corresponding [`TaskHandle`](crate::TaskHandle).
//!
//! Helper methods (`as_label`, `as_message`) mirror what subscribers and
//! metrics exporters usually want.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced by a single listener invocation.
///
/// Each variant is local to one task: the scheduler keeps starting queued
/// work regardless of how a previous task ended.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The listener body returned an error.
    #[error("listener failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The listener body panicked; the panic was caught by the scheduler.
    #[error("listener panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// The task was dropped by the runtime before it could report an outcome
    /// (e.g. the runtime shut down while the task was queued or running).
    #[error("task dropped before completion")]
    Canceled,
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use queue_emitter::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "listener failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use queue_emitter::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Canceled => "dropped before completion".to_string(),
        }
    }

    /// Renders a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        TaskError::Panicked { info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(
            TaskError::Panicked { info: "boom".into() }.as_label(),
            "task_panicked"
        );
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    }

    #[test]
    fn test_from_panic_payloads() {
        let static_str: Box<dyn std::any::Any + Send> = Box::new("static boom");
        assert_eq!(
            TaskError::from_panic(static_str.as_ref()),
            TaskError::Panicked { info: "static boom".into() }
        );

        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(
            TaskError::from_panic(owned.as_ref()),
            TaskError::Panicked { info: "owned boom".into() }
        );

        let other: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(
            TaskError::from_panic(other.as_ref()),
            TaskError::Panicked { info: "unknown panic".into() }
        );
    }
}
