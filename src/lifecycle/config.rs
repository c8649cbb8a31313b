//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! debounce_ms = 300
//! request_timeout_ms = 5000
//! duplicate_placement = "byMembership"
//! ```

use crate::engine::DuplicatePlacement;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet period after the last filter change before a fetch fires.
    pub debounce_ms: u64,
    /// Upper bound on any single provider call.
    pub request_timeout_ms: u64,
    pub mailbox_capacity: usize,
    pub default_page_size: usize,
    /// Capacity of the most-recent window partition.
    pub recent_window: usize,
    pub duplicate_placement: DuplicatePlacement,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            request_timeout_ms: 10_000,
            mailbox_capacity: 32,
            default_page_size: 10,
            recent_window: 10,
            duplicate_placement: DuplicatePlacement::PublicAndMine,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid("mailbox_capacity must be positive".into()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid("default_page_size must be positive".into()));
        }
        if self.recent_window == 0 {
            return Err(ConfigError::Invalid("recent_window must be positive".into()));
        }
        Ok(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = debounce.as_millis() as u64;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn with_recent_window(mut self, capacity: usize) -> Self {
        self.recent_window = capacity;
        self
    }

    pub fn with_duplicate_placement(mut self, placement: DuplicatePlacement) -> Self {
        self.duplicate_placement = placement;
        self
    }
}
