/// Represents a laboratory protocol in the catalog.
///
/// # Catalog Engine
/// This struct implements the [`CatalogEntity`](crate::framework::CatalogEntity) trait,
/// allowing it to be served by a [`ResourceActor`](crate::framework::ResourceActor)
/// and shown in catalog partitions.
///
/// See [`impl CatalogEntity for Protocol`](#impl-CatalogEntity-for-Protocol) for details on:
/// - Creation parameters ([`ProtocolCreate`])
/// - Update parameters ([`ProtocolUpdate`])
use super::{ResourceRecord, ResourceStatus, Visibility};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Protocols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolId(pub u32);

impl From<u32> for ProtocolId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "protocol_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub id: ProtocolId,
    #[serde(flatten)]
    pub record: ResourceRecord,
    /// Semantic version string shown next to the title.
    pub version: String,
    pub steps: Vec<String>,
}

/// Payload for creating a new protocol.
#[derive(Debug, Clone)]
pub struct ProtocolCreate {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub owner: String,
    pub visibility: Visibility,
    pub steps: Vec<String>,
}

impl ProtocolCreate {
    pub fn new(title: impl Into<String>, category: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: category.into(),
            owner: owner.into(),
            visibility: Visibility::Private,
            steps: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }
}

/// Payload for updating an existing protocol. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<ResourceStatus>,
    pub visibility: Option<Visibility>,
    pub version: Option<String>,
    pub steps: Option<Vec<String>>,
}
