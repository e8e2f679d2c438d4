//! Calculator SDK
//!
//! This crate provides everything needed to consume the calculator service:
//! - API trait (`CalculatorClientV1`)
//! - Error types (`CalculatorError`)
//! - gRPC client (`CalculatorGrpcClient`) and its transport config
//! - Proto stubs for server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use calculator_sdk::{CalculatorClientV1, CalculatorGrpcClient, GrpcClientConfig};
//!
//! let cfg = GrpcClientConfig::default();
//! let client = CalculatorGrpcClient::connect("http://127.0.0.1:8088", &cfg).await?;
//! let result = client.calculate(6.0, 2.0, "/").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
pub use api::{CalculatorClientV1, CalculatorError};

// === GRPC CLIENT ===
mod client;
pub use client::{CalculatorGrpcClient, GrpcClientConfig};

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for `CalculatorService`
#[allow(clippy::pedantic)]
pub mod proto {
    tonic::include_proto!("calculator.v1");
}

// Re-export proto types needed by server
pub use proto::calculator_service_server::{CalculatorService, CalculatorServiceServer};
pub use proto::{CalculateRequest, CalculateResponse};

/// Fully qualified service name, also the path prefix of every RPC route.
pub const SERVICE_NAME: &str = "calculator.v1.CalculatorService";

/// Route of the `Calculate` method (`/<service>/<method>`).
pub const CALCULATE_PATH: &str = "/calculator.v1.CalculatorService/Calculate";
