//! gRPC client implementation of `CalculatorClientV1`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

use crate::api::{CalculatorClientV1, CalculatorError};
use crate::proto::CalculateRequest;
use crate::proto::calculator_service_client::CalculatorServiceClient;

/// Transport settings for the calculator gRPC client.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Timeout for establishing the initial connection.
    pub connect_timeout: Duration,

    /// Timeout for individual RPC calls.
    pub rpc_timeout: Duration,

    /// HTTP/2 keepalive ping interval.
    pub keepalive_interval: Duration,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(30),
            keepalive_interval: Duration::from_secs(30),
        }
    }
}

impl GrpcClientConfig {
    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the RPC timeout.
    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }
}

fn build_endpoint(
    uri: String,
    cfg: &GrpcClientConfig,
) -> Result<Endpoint, tonic::transport::Error> {
    let endpoint = Endpoint::from_shared(uri)?
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.rpc_timeout)
        .tcp_keepalive(Some(cfg.keepalive_interval))
        .http2_keep_alive_interval(cfg.keepalive_interval)
        .keep_alive_timeout(Duration::from_secs(10));

    Ok(endpoint)
}

/// gRPC client for a remote calculator service.
#[derive(Clone)]
pub struct CalculatorGrpcClient {
    inner: CalculatorServiceClient<Channel>,
}

impl CalculatorGrpcClient {
    /// Connect to the `CalculatorService` at `uri` (e.g. `http://127.0.0.1:8088`).
    ///
    /// # Errors
    /// Returns an error if the URI is invalid or the connection cannot be established.
    pub async fn connect(uri: impl Into<String>, cfg: &GrpcClientConfig) -> Result<Self> {
        let uri = uri.into();
        let span = tracing::debug_span!("grpc_connect", service = crate::SERVICE_NAME, uri = %uri);

        async move {
            let channel = build_endpoint(uri, cfg)?.connect().await?;
            tracing::debug!("connected to calculator service");
            Ok(Self::from_channel(channel))
        }
        .instrument(span)
        .await
    }

    /// Wrap an already established channel.
    #[must_use]
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: CalculatorServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl CalculatorClientV1 for CalculatorGrpcClient {
    async fn calculate(
        &self,
        operand1: f64,
        operand2: f64,
        operator: &str,
    ) -> Result<f64, CalculatorError> {
        let mut client = self.inner.clone();

        let request = tonic::Request::new(CalculateRequest {
            operand1,
            operand2,
            operator: operator.to_owned(),
        });

        let response = client.calculate(request).await?;

        Ok(response.into_inner().result)
    }
}
