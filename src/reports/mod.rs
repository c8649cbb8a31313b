//! Report-specific entity logic and catalog wiring.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ReportCatalog;
use crate::engine::CatalogActor;
use crate::framework::{ResourceActor, ResourceClient};
use crate::lifecycle::EngineConfig;
use crate::model::Report;
use crate::notify::{Downloader, Notifier};
use crate::store::{PartitionMode, PartitionName};
use std::sync::Arc;

/// Public and private reports are paginated by the provider; the recent
/// window is fetched once and filtered locally.
pub fn partitions(config: &EngineConfig) -> [(PartitionName, PartitionMode); 3] {
    [
        (PartitionName::Public, PartitionMode::ServerPaginated),
        (PartitionName::Mine, PartitionMode::ServerPaginated),
        (
            PartitionName::Recent,
            PartitionMode::Window {
                capacity: config.recent_window,
            },
        ),
    ]
}

/// Creates the in-memory report store and its client.
pub fn new_service(config: &EngineConfig) -> (ResourceActor<Report>, ResourceClient<Report>) {
    ResourceActor::new(config.mailbox_capacity.max(1))
}

/// Creates the report catalog engine and its client.
pub fn new_catalog(
    config: &EngineConfig,
    downloader: Arc<dyn Downloader<Report>>,
    notifier: Arc<dyn Notifier>,
) -> (CatalogActor<Report>, ReportCatalog) {
    let (actor, client) = CatalogActor::new(config.clone(), &partitions(config));
    let catalog = ReportCatalog::new(client, downloader, notifier, config.default_page_size);
    (actor, catalog)
}
