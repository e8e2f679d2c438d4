//! Calculator Module
//!
//! A single-method arithmetic service exposed over gRPC and Connect.
//!
//! ## Architecture
//!
//! - `domain/` - Core business logic (operators, errors, `Service`)
//! - `api/grpc/` - tonic server implementation
//! - `api/connect/` - Connect unary binding (JSON and binary protobuf)
//! - `cors.rs` - Cross-origin policy for the HTTP surface
//! - `server.rs` - Router assembly and the `serve` bootstrap
//!
//! External consumers should use the `calculator-sdk` crate, which provides
//! the gRPC client and the `CalculatorClientV1` trait.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod cors;
pub mod server;

mod client;
pub use client::LocalCalculatorClient;

pub use config::{CalculatorConfig, CorsConfig};
pub use server::{build_router, parse_bind_address, serve, serve_with_listener};

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;

/// Name of this module's section under `modules` in the application config.
pub const MODULE_NAME: &str = "calculator";
