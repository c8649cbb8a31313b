use std::time::Duration;

/// Errors raised while talking to a resource provider.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider unavailable")]
    Unavailable,
    #[error("Provider dropped response channel")]
    Dropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(String),
}

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced an answer; retry is the remedy.
    Network,
    /// The provider rejected the input; the caller should let the user fix it.
    Validation,
    NotFound,
}

impl ProviderError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ProviderError::NotFound(_) => FailureKind::NotFound,
            ProviderError::Validation(_) => FailureKind::Validation,
            ProviderError::Unavailable
            | ProviderError::Dropped
            | ProviderError::Timeout(_)
            | ProviderError::Network(_) => FailureKind::Network,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_network_failures() {
        let error = ProviderError::Timeout(Duration::from_secs(10));
        assert_eq!(error.failure_kind(), FailureKind::Network);
        assert_eq!(error.to_string(), "Request timed out after 10s");
        assert_eq!(
            ProviderError::Validation("title must not be empty".into()).failure_kind(),
            FailureKind::Validation
        );
    }
}
