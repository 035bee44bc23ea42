//! Generation error types.

use thiserror::Error;

/// Errors a content generator can report.
///
/// The runner retries `RateLimited`, `Timeout` and `Unavailable`; the rest
/// fail the request immediately.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend asked us to slow down.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The backend refused the request outright.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backend returned something that is not usable content.
    #[error("malformed content: {0}")]
    Malformed(String),

    /// The request timed out.
    #[error("generation timed out after {0}s")]
    Timeout(u64),

    /// The backend could not be reached.
    #[error("generator unavailable: {0}")]
    Unavailable(String),
}

impl GenerationError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Timeout(_)
                | GenerationError::Unavailable(_)
        )
    }

    /// Backend-suggested wait before the next attempt.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            GenerationError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(GenerationError::Timeout(30).is_transient());
        assert!(GenerationError::RateLimited { retry_after_ms: 10 }.is_transient());
        assert!(!GenerationError::Rejected("bad profile".into()).is_transient());
        assert!(!GenerationError::Malformed("{".into()).is_transient());
    }

    #[test]
    fn rate_limit_message_and_hint() {
        let err = GenerationError::RateLimited { retry_after_ms: 250 };
        assert_eq!(err.to_string(), "rate limited, retry after 250ms");
        assert_eq!(err.retry_after_ms(), Some(250));
        assert_eq!(GenerationError::Timeout(1).retry_after_ms(), None);
    }
}
