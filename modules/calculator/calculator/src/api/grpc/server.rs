//! gRPC Server implementation for calculator
//!
//! The server implementation handles gRPC requests and delegates
//! to the domain Service for business logic.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use calculator_sdk::{CalculateRequest, CalculateResponse, CalculatorService};

use crate::domain::{DomainError, Service};

/// gRPC service implementation that wraps the domain Service.
#[derive(Clone)]
pub struct CalculatorServiceImpl {
    service: Arc<Service>,
}

impl CalculatorServiceImpl {
    /// Create a new `CalculatorService` implementation with the given Service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

impl From<DomainError> for Status {
    fn from(e: DomainError) -> Self {
        Status::invalid_argument(e.to_string())
    }
}

#[tonic::async_trait]
impl CalculatorService for CalculatorServiceImpl {
    async fn calculate(
        &self,
        request: Request<CalculateRequest>,
    ) -> Result<Response<CalculateResponse>, Status> {
        let req = request.into_inner();

        let result = self
            .service
            .calculate(req.operand1, req.operand2, &req.operator)?;

        Ok(Response::new(CalculateResponse { result }))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn request(operand1: f64, operand2: f64, operator: &str) -> Request<CalculateRequest> {
        Request::new(CalculateRequest {
            operand1,
            operand2,
            operator: operator.to_owned(),
        })
    }

    #[tokio::test]
    async fn test_calculate_ok() {
        let svc = CalculatorServiceImpl::new(Arc::new(Service::new()));
        let resp = svc.calculate(request(2.0, 3.0, "*")).await.unwrap();
        assert_eq!(resp.into_inner().result, 6.0);
    }

    #[tokio::test]
    async fn test_domain_errors_are_invalid_argument() {
        let svc = CalculatorServiceImpl::new(Arc::new(Service::new()));

        let status = svc.calculate(request(1.0, 0.0, "/")).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert_eq!(status.message(), "division by zero");

        let status = svc.calculate(request(1.0, 1.0, "%")).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert_eq!(status.message(), "unknown operator: %");
    }
}
