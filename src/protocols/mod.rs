//! Protocol-specific entity logic and catalog wiring.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProtocolCatalog;
use crate::engine::CatalogActor;
use crate::framework::{ResourceActor, ResourceClient};
use crate::lifecycle::EngineConfig;
use crate::model::Protocol;
use crate::store::{PartitionMode, PartitionName};

/// Protocols are browsed as the shared library and the user's own drafts,
/// both paginated by the provider.
pub const PARTITIONS: [(PartitionName, PartitionMode); 2] = [
    (PartitionName::Public, PartitionMode::ServerPaginated),
    (PartitionName::Mine, PartitionMode::ServerPaginated),
];

/// Creates the in-memory protocol store and its client.
pub fn new_service(config: &EngineConfig) -> (ResourceActor<Protocol>, ResourceClient<Protocol>) {
    ResourceActor::new(config.mailbox_capacity.max(1))
}

/// Creates the protocol catalog engine and its client.
pub fn new_catalog(config: &EngineConfig) -> (CatalogActor<Protocol>, ProtocolCatalog) {
    let (actor, client) = CatalogActor::new(config.clone(), &PARTITIONS);
    (actor, ProtocolCatalog::new(client, config.default_page_size))
}
