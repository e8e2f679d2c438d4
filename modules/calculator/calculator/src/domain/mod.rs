//! Domain layer for calculator module
//!
//! Contains the arithmetic contract and its error taxonomy.

pub mod error;
pub mod operator;
pub mod service;

pub use error::DomainError;
pub use operator::Operator;
pub use service::Service;
