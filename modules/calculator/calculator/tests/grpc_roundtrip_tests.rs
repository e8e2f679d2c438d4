#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

//! End-to-end tests over a real socket using the SDK gRPC client.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use calculator::domain::Service;
use calculator::{CalculatorConfig, LocalCalculatorClient, build_router, serve_with_listener};
use calculator_sdk::{CalculatorClientV1, CalculatorError, CalculatorGrpcClient, GrpcClientConfig};

struct TestServer {
    endpoint: String,
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let router = build_router(Arc::new(Service::new()), &CalculatorConfig::default()).unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(serve_with_listener(listener, router, cancel.clone()));

        Self {
            endpoint,
            cancel,
            handle,
        }
    }

    async fn client(&self) -> CalculatorGrpcClient {
        CalculatorGrpcClient::connect(self.endpoint.clone(), &GrpcClientConfig::default())
            .await
            .expect("connect to test server")
    }

    /// Graceful shutdown waits for open connections, so drop clients first.
    async fn stop(self) {
        self.cancel.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down in time");
        result.unwrap().unwrap();
    }
}

#[tokio::test]
async fn grpc_scenarios() {
    let server = TestServer::start().await;
    let client = server.client().await;

    let cases = [
        ("Addition", 1.0, 2.0, "+", 3.0),
        ("Subtraction", 5.0, 2.0, "-", 3.0),
        ("Multiplication", 2.0, 3.0, "*", 6.0),
        ("Division", 6.0, 2.0, "/", 3.0),
    ];
    for (name, a, b, op, want) in cases {
        assert_eq!(client.calculate(a, b, op).await, Ok(want), "{name}");
    }

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn grpc_errors_are_invalid_argument() {
    let server = TestServer::start().await;
    let client = server.client().await;

    let err = client.calculate(1.0, 0.0, "/").await.unwrap_err();
    assert_eq!(
        err,
        CalculatorError::InvalidArgument("division by zero".to_owned())
    );

    let err = client.calculate(1.0, 1.0, "%").await.unwrap_err();
    assert_eq!(
        err,
        CalculatorError::InvalidArgument("unknown operator: %".to_owned())
    );

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn grpc_and_local_clients_agree() {
    let server = TestServer::start().await;
    let clients: [Box<dyn CalculatorClientV1>; 2] = [
        Box::new(server.client().await),
        Box::new(LocalCalculatorClient::default()),
    ];

    for (a, b, op) in [
        (0.1, 0.2, "+"),
        (-3.5, 2.0, "*"),
        (1.0, 3.0, "/"),
        (1.0, 0.0, "/"),
    ] {
        let remote = clients[0].calculate(a, b, op).await;
        let local = clients[1].calculate(a, b, op).await;
        assert_eq!(remote, local, "{a} {op} {b}");
    }

    drop(clients);
    server.stop().await;
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let server = TestServer::start().await;
    let client = server.client().await;

    let mut tasks = Vec::new();
    for i in 0..32_u32 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let a = f64::from(i);
            (a, client.calculate(a, 2.0, "*").await)
        }));
    }

    for task in tasks {
        let (a, result) = task.await.unwrap();
        assert_eq!(result, Ok(a * 2.0));
    }

    drop(client);
    server.stop().await;
}
