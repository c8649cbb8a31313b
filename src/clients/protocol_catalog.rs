use crate::clients::CatalogHandle;
use crate::engine::{CatalogClient, CatalogError};
use crate::model::{Protocol, ProtocolCreate, ProtocolId, ProtocolUpdate, ResourceStatus};
use crate::store::PartitionName;
use tracing::{debug, instrument};

/// Client for the protocol library screen.
#[derive(Clone)]
pub struct ProtocolCatalog {
    inner: CatalogClient<Protocol>,
    default_page_size: usize,
}

impl ProtocolCatalog {
    pub fn new(inner: CatalogClient<Protocol>, default_page_size: usize) -> Self {
        Self {
            inner,
            default_page_size,
        }
    }

    /// Loads the public and private lists; resolves when both have settled.
    pub async fn mount(&self) {
        self.inner.mount(Vec::new()).await;
    }

    pub fn public_protocols(&self) -> Vec<Protocol> {
        self.items(PartitionName::Public)
    }

    pub fn my_protocols(&self) -> Vec<Protocol> {
        self.items(PartitionName::Mine)
    }

    #[instrument(skip(self, params))]
    pub async fn create_protocol(&self, params: ProtocolCreate) -> Result<Protocol, CatalogError> {
        debug!(?params, "create_protocol called");
        self.inner.create(params).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_protocol(
        &self,
        id: ProtocolId,
        update: ProtocolUpdate,
    ) -> Result<Protocol, CatalogError> {
        debug!(?update, "update_protocol called");
        self.inner.update(id, update).await
    }

    /// Moves a draft into review.
    pub async fn submit_for_review(&self, id: ProtocolId) -> Result<Protocol, CatalogError> {
        let update = ProtocolUpdate {
            status: Some(ResourceStatus::InReview),
            ..Default::default()
        };
        self.update_protocol(id, update).await
    }
}

impl CatalogHandle<Protocol> for ProtocolCatalog {
    fn inner(&self) -> &CatalogClient<Protocol> {
        &self.inner
    }

    fn default_page_size(&self) -> usize {
        self.default_page_size
    }
}
