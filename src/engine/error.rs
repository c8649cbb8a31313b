use crate::framework::{FailureKind, ProviderError};

/// Errors returned by catalog write operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Catalog engine closed")]
    EngineClosed,
    #[error("Catalog engine dropped response channel")]
    EngineDropped,
}

impl CatalogError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CatalogError::Provider(error) => error.failure_kind(),
            CatalogError::EngineClosed | CatalogError::EngineDropped => FailureKind::Network,
        }
    }

    /// True when the caller should keep its form open for correction.
    pub fn is_validation(&self) -> bool {
        self.failure_kind() == FailureKind::Validation
    }
}
