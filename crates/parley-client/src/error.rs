//! Error types for the remote exchange client.

use parley_core::ParleyError;

/// Errors from a single exchange with the answering service.
///
/// All variants are non-fatal to the session: a failed `ask` becomes a
/// placeholder bot message, a failed feedback report is only logged.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("server returned status {status}")]
    Server { status: u16 },
    /// The service answered 2xx but the body was not the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ExchangeError> for ParleyError {
    fn from(err: ExchangeError) -> Self {
        ParleyError::Exchange(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExchangeError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = ExchangeError::Server { status: 503 };
        assert_eq!(err.to_string(), "server returned status 503");

        let err = ExchangeError::InvalidResponse("missing field".to_string());
        assert_eq!(err.to_string(), "invalid response: missing field");
    }

    #[test]
    fn test_conversion_to_parley_error() {
        let err: ParleyError = ExchangeError::Server { status: 500 }.into();
        assert!(matches!(err, ParleyError::Exchange(_)));
        assert!(err.to_string().contains("500"));
    }
}
