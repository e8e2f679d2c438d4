//! Calculator API trait and types
//!
//! Contract trait and types for the calculator service.

use async_trait::async_trait;

/// Calculator API trait
///
/// Implemented by the gRPC client in this crate and by the in-process
/// client of the `calculator` crate.
#[async_trait]
pub trait CalculatorClientV1: Send + Sync {
    /// Apply `operator` (`+`, `-`, `*` or `/`) to the two operands.
    ///
    /// # Errors
    /// Returns [`CalculatorError::InvalidArgument`] on division by zero or an
    /// unknown operator, and [`CalculatorError::Transport`] when the call
    /// could not be completed.
    async fn calculate(
        &self,
        operand1: f64,
        operand2: f64,
        operator: &str,
    ) -> Result<f64, CalculatorError>;
}

/// Error type for Calculator operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    /// The request can never succeed as given.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("gRPC transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CalculatorError {
    /// True for caller errors (not retryable, not a server fault).
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<tonic::Status> for CalculatorError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::InvalidArgument => Self::InvalidArgument(status.message().to_owned()),
            _ => Self::Transport(format!("{}: {}", status.code(), status.message())),
        }
    }
}
