//! In-process `CalculatorClientV1` implementation
//!
//! Lets callers in the same process use the SDK trait without a network hop.

use async_trait::async_trait;

use calculator_sdk::{CalculatorClientV1, CalculatorError};

use crate::domain::{DomainError, Service};

/// `CalculatorClientV1` backed directly by the domain [`Service`].
#[derive(Debug, Clone, Default)]
pub struct LocalCalculatorClient {
    service: Service,
}

impl LocalCalculatorClient {
    #[must_use]
    pub fn new(service: Service) -> Self {
        Self { service }
    }
}

impl From<DomainError> for CalculatorError {
    fn from(e: DomainError) -> Self {
        CalculatorError::InvalidArgument(e.to_string())
    }
}

#[async_trait]
impl CalculatorClientV1 for LocalCalculatorClient {
    async fn calculate(
        &self,
        operand1: f64,
        operand2: f64,
        operator: &str,
    ) -> Result<f64, CalculatorError> {
        Ok(self.service.calculate(operand1, operand2, operator)?)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_client_returns_result() {
        let client = LocalCalculatorClient::default();
        assert_eq!(client.calculate(6.0, 2.0, "/").await, Ok(3.0));
    }

    #[tokio::test]
    async fn local_client_surfaces_invalid_argument() {
        let client: Box<dyn CalculatorClientV1> = Box::new(LocalCalculatorClient::default());

        let err = client.calculate(1.0, 0.0, "/").await.unwrap_err();
        assert_eq!(
            err,
            CalculatorError::InvalidArgument("division by zero".to_owned())
        );

        let err = client.calculate(1.0, 1.0, "%").await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("unknown operator: %"));
    }
}
