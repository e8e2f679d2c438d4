//! Connect unary binding for calculator module
//!
//! Serves `POST /calculator.v1.CalculatorService/Calculate` with either
//! proto3 JSON or binary protobuf bodies, selected by `Content-Type`.

mod codec;
mod error;

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, StatusCode};
use tracing::debug;

use calculator_sdk::{CALCULATE_PATH, CalculateResponse, SERVICE_NAME};

use crate::domain::Service;

pub use codec::{Codec, SUPPORTED_CONTENT_TYPES};
pub use error::{Code, ConnectError};

/// Header carrying the Connect protocol version.
pub const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";

/// The only Connect protocol version this server speaks.
pub const PROTOCOL_VERSION: &str = "1";

/// Build the Connect routes for the calculator service.
///
/// Other methods under the service path answer `unimplemented`.
pub fn router(service: Arc<Service>) -> Router {
    let other_methods = format!("/{SERVICE_NAME}/{{method}}");
    Router::new()
        .route(CALCULATE_PATH, post(handle_calculate))
        .route(&other_methods, post(handle_unknown_method))
        .with_state(service)
}

async fn handle_unknown_method(Path(method): Path<String>) -> ConnectError {
    ConnectError::unimplemented(format!("{SERVICE_NAME}/{method} is not implemented"))
}

/// Handler for `POST /calculator.v1.CalculatorService/Calculate`.
pub async fn handle_calculate(
    State(service): State<Arc<Service>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(codec) = Codec::from_content_type(headers.get(CONTENT_TYPE)) else {
        let accept_post = HeaderName::from_static("accept-post");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            [(accept_post, SUPPORTED_CONTENT_TYPES)],
        )
            .into_response();
    };

    match unary(*service, codec, &headers, &body) {
        Ok(payload) => ([(CONTENT_TYPE, codec.content_type())], payload).into_response(),
        Err(err) => {
            debug!(code = err.code.as_str(), message = %err.message, "connect call failed");
            err.into_response()
        }
    }
}

fn unary(
    service: Service,
    codec: Codec,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Vec<u8>, ConnectError> {
    check_protocol_version(headers)?;

    let req = codec.decode_request(body)?;
    debug!(?codec, "connect calculate request");

    let result = service.calculate(req.operand1, req.operand2, &req.operator)?;

    codec.encode_response(&CalculateResponse { result })
}

// Absent is fine; present must be exactly "1".
fn check_protocol_version(headers: &HeaderMap) -> Result<(), ConnectError> {
    match headers.get(PROTOCOL_VERSION_HEADER) {
        None => Ok(()),
        Some(v) if v.as_bytes() == PROTOCOL_VERSION.as_bytes() => Ok(()),
        Some(v) => Err(ConnectError::invalid_argument(format!(
            "{PROTOCOL_VERSION_HEADER} must be {PROTOCOL_VERSION:?}: got {:?}",
            String::from_utf8_lossy(v.as_bytes())
        ))),
    }
}
