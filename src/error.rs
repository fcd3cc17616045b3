//! Errors surfaced by decorated connections.

use thiserror::Error;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by connections, statements, and transactions.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying connection does not implement the requested optional
    /// capability. This is a signal to try a fallback path, not a failure;
    /// it is never logged or retried.
    #[error("operation not supported by the underlying connection")]
    Unsupported,

    /// A failure raised by the underlying connection, forwarded unchanged.
    #[error("{0}")]
    Driver(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wrap an underlying driver failure.
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Error::Driver(err.into())
    }

    /// True when the underlying connection lacks the requested capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_is_distinguishable() {
        assert!(Error::Unsupported.is_unsupported());
        assert!(!Error::driver("boom").is_unsupported());
    }

    #[test]
    fn driver_errors_keep_their_message() {
        assert_eq!(Error::driver("connection reset").to_string(), "connection reset");
    }
}
