use crate::engine::{CatalogClient, CatalogError};
use crate::framework::CatalogEntity;
use crate::notify::Confirmation;
use crate::query::{FilterChange, FilterState, Selection, StatusFilter};
use crate::store::{CatalogSnapshot, PartitionName};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for kind-specific catalogs to inherit the list-screen callbacks
/// and the per-item actions every catalog offers.
///
/// Filter callbacks send a one-field change; the engine applies it to the
/// partition's current filter state and debounces the fetch.
#[async_trait]
pub trait CatalogHandle<T: CatalogEntity>: Send + Sync {
    /// Access the inner generic CatalogClient.
    fn inner(&self) -> &CatalogClient<T>;

    /// Page size used before a partition has any filter state.
    fn default_page_size(&self) -> usize;

    fn snapshot(&self) -> Arc<CatalogSnapshot<T>> {
        self.inner().snapshot()
    }

    fn items(&self, partition: PartitionName) -> Vec<T> {
        self.snapshot().items(partition).to_vec()
    }

    async fn current_filters(&self, partition: PartitionName) -> FilterState {
        self.inner()
            .filters(partition)
            .await
            .unwrap_or_else(|| FilterState::new(partition, self.default_page_size()))
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, partition: PartitionName, text: String) {
        self.inner().change_filter(partition, FilterChange::Search(text)).await;
    }

    #[tracing::instrument(skip(self))]
    async fn filter_category(&self, partition: PartitionName, category: Selection) {
        self.inner().change_filter(partition, FilterChange::Category(category)).await;
    }

    #[tracing::instrument(skip(self))]
    async fn filter_status(&self, partition: PartitionName, status: StatusFilter) {
        self.inner().change_filter(partition, FilterChange::Status(status)).await;
    }

    #[tracing::instrument(skip(self))]
    async fn go_to_page(&self, partition: PartitionName, page: usize) {
        self.inner().change_filter(partition, FilterChange::Page(page)).await;
    }

    #[tracing::instrument(skip(self))]
    async fn set_page_size(&self, partition: PartitionName, page_size: usize) {
        self.inner().change_filter(partition, FilterChange::PageSize(page_size)).await;
    }

    async fn refresh(&self, partition: PartitionName) {
        self.inner().refresh(partition).await;
    }

    async fn duplicate(&self, id: T::Id) -> Result<T, CatalogError> {
        self.inner().duplicate(id).await
    }

    async fn toggle_archive(&self, item: &T) -> Result<T, CatalogError> {
        self.inner().toggle_archive(item).await
    }

    async fn delete(&self, id: T::Id, confirmation: &dyn Confirmation) -> Result<bool, CatalogError> {
        self.inner().delete(id, confirmation).await
    }
}
