//! # CatalogEntity Trait
//!
//! The contract every resource kind (Protocol, Report, …) implements so the
//! generic backing service, view store, local pipeline and mutation
//! coordinator can handle it without knowing its concrete shape.
//!
//! # Architecture Note
//! Everything the engine needs to reason about lives in the shared
//! [`ResourceRecord`] header (`record()`), while kind-specific fields stay on
//! the concrete type. Associated types keep create/update payloads typed per
//! kind: a `ProtocolCreate` can never be sent to a report service.

use crate::model::{ResourceRecord, Visibility};
use crate::pipeline::SortRegistry;
use chrono::{DateTime, Utc};
use std::fmt::{Debug, Display};
use std::hash::Hash;

pub trait CatalogEntity: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Human-readable kind used in logs and notifications (e.g. "Protocol").
    const KIND: &'static str;

    /// Stable identity key across partitions.
    /// Must be convertible from u32 for id generation by the backing service.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32> + 'static;

    /// Payload for creating a new instance.
    type Create: Clone + Send + Sync + Debug + 'static;

    /// Payload for updating an existing instance.
    type Update: Clone + Send + Sync + Debug + 'static;

    /// Validation error raised by the entity's own hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    fn record(&self) -> &ResourceRecord;

    fn record_mut(&mut self) -> &mut ResourceRecord;

    /// Construct the full entity from a fresh id and the create payload.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        now: DateTime<Utc>,
    ) -> Result<Self, Self::Error>;

    /// Overwrite the requested visibility of a create payload.
    fn force_visibility(params: &mut Self::Create, visibility: Visibility);

    /// Apply an update payload in place.
    fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;

    /// Clone this entity under a new id.
    fn duplicate_as(&self, id: Self::Id, now: DateTime<Utc>) -> Self;

    /// Sort keys this kind supports in the local pipeline.
    fn sort_registry() -> SortRegistry<Self> {
        SortRegistry::standard()
    }
}
