//! Domain service for calculator
//!
//! Contains the core business logic for arithmetic operations.

use tracing::{debug, instrument};

use super::{DomainError, Operator};

/// Domain service that performs arithmetic operations.
///
/// Stateless: every call is a pure function of its inputs, so one instance
/// is shared by all transports and invoked concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct Service;

impl Service {
    /// Create a new service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply `operator` to the two operands.
    ///
    /// The operator is validated before the divisor, so an unknown operator
    /// is reported even when `operand2` is zero.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownOperator`] if `operator` is not one of
    /// `+`, `-`, `*`, `/`, and [`DomainError::DivisionByZero`] for `/` with a
    /// zero `operand2`.
    #[instrument(level = "debug", skip(self))]
    pub fn calculate(
        &self,
        operand1: f64,
        operand2: f64,
        operator: &str,
    ) -> Result<f64, DomainError> {
        let op: Operator = operator.parse()?;
        let result = op.apply(operand1, operand2)?;
        debug!(result, "calculation completed");
        Ok(result)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_scenarios() {
        let service = Service::new();

        let cases = [
            ("Addition", 1.0, 2.0, "+", Ok(3.0)),
            ("Subtraction", 5.0, 2.0, "-", Ok(3.0)),
            ("Multiplication", 2.0, 3.0, "*", Ok(6.0)),
            ("Division", 6.0, 2.0, "/", Ok(3.0)),
            (
                "DivideByZero",
                1.0,
                0.0,
                "/",
                Err(DomainError::DivisionByZero),
            ),
            (
                "UnknownOperator",
                1.0,
                1.0,
                "%",
                Err(DomainError::UnknownOperator("%".to_owned())),
            ),
        ];

        for (name, a, b, op, want) in cases {
            assert_eq!(service.calculate(a, b, op), want, "{name}");
        }
    }

    #[test]
    fn test_matches_native_arithmetic() {
        let service = Service::new();
        let values = [0.1, -2.5, 1e308, -1e-308, 3.0, 7.25];

        for a in values {
            for b in values {
                assert_eq!(service.calculate(a, b, "+"), Ok(a + b));
                assert_eq!(service.calculate(a, b, "-"), Ok(a - b));
                assert_eq!(service.calculate(a, b, "*"), Ok(a * b));
                assert_eq!(service.calculate(a, b, "/"), Ok(a / b));
            }
        }
    }

    #[test]
    fn test_division_by_zero_for_any_dividend() {
        let service = Service::new();
        for a in [0.0, -1.0, 42.0, f64::INFINITY, f64::NAN] {
            assert_eq!(
                service.calculate(a, 0.0, "/"),
                Err(DomainError::DivisionByZero)
            );
        }
    }

    #[test]
    fn test_unknown_operator_wins_over_zero_divisor() {
        let service = Service::new();
        assert_eq!(
            service.calculate(1.0, 0.0, "%"),
            Err(DomainError::UnknownOperator("%".to_owned()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(DomainError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            DomainError::UnknownOperator("%".to_owned()).to_string(),
            "unknown operator: %"
        );
    }

    #[test]
    fn test_idempotent() {
        let service = Service::new();
        let first = service.calculate(0.1, 0.2, "+");
        for _ in 0..10 {
            assert_eq!(service.calculate(0.1, 0.2, "+"), first);
        }
    }
}
