//! Router assembly and server bootstrap.
//!
//! gRPC and Connect share one listener and one route path, so requests are
//! steered by `Content-Type`: `application/grpc*` goes to tonic, everything
//! else to the Connect handler.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use http::header::CONTENT_TYPE;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use calculator_sdk::CalculatorServiceServer;

use crate::api::{connect, grpc::CalculatorServiceImpl};
use crate::config::CalculatorConfig;
use crate::cors::build_cors_layer;
use crate::domain::Service;

fn is_grpc(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/grpc"))
}

async fn steer_grpc(State(grpc): State<Router>, req: Request, next: Next) -> Response {
    if !is_grpc(&req) {
        return next.run(req).await;
    }
    match grpc.oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// Build the HTTP router serving both bindings of the calculator service.
///
/// # Errors
/// Returns an error if the CORS policy is invalid.
pub fn build_router(service: Arc<Service>, cfg: &CalculatorConfig) -> anyhow::Result<Router> {
    let server = CalculatorServiceServer::new(CalculatorServiceImpl::new(Arc::clone(&service)));
    let grpc = tonic::service::Routes::new(server).into_axum_router();

    let mut router =
        connect::router(service).layer(middleware::from_fn_with_state(grpc, steer_grpc));

    if let Some(cors) = build_cors_layer(cfg)? {
        router = router.layer(cors);
    }

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            version = ?req.version(),
            module = crate::MODULE_NAME,
        )
    });

    Ok(router.layer(trace))
}

/// Parse bind address from configuration string.
///
/// # Errors
/// Returns an error if `bind_addr` is not an `ip:port` socket address.
pub fn parse_bind_address(bind_addr: &str) -> anyhow::Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}

/// Bind `cfg.bind_addr` and serve until `cancel` fires.
///
/// # Errors
/// Returns an error if the config is invalid, the address cannot be bound,
/// or the server fails.
pub async fn serve(cfg: &CalculatorConfig, cancel: CancellationToken) -> anyhow::Result<()> {
    let addr = parse_bind_address(&cfg.bind_addr)?;
    let router = build_router(Arc::new(Service::new()), cfg)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind calculator server on {addr}"))?;

    serve_with_listener(listener, router, cancel).await
}

/// Serve `router` on an already bound listener until `cancel` fires.
///
/// # Errors
/// Returns an error if the listener address cannot be read or the server fails.
pub async fn serve_with_listener(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let bound_addr = listener.local_addr()?;
    tracing::info!(%bound_addr, "calculator server listening (gRPC + Connect)");

    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("calculator server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
