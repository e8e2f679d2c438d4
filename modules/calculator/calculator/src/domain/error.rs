//! Domain errors for calculator
//!
//! Both kinds are caller errors: the request can never succeed as given.

/// Error returned by [`super::Service::calculate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}
