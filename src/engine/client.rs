use super::coordinator::toggle_archive;
use super::{CatalogError, CatalogRequest, Mutation, Response};
use crate::framework::CatalogEntity;
use crate::notify::Confirmation;
use crate::query::{FilterChange, FilterState};
use crate::store::{CatalogSnapshot, PartitionName};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};

/// Cloneable handle to a running [`CatalogActor`](super::CatalogActor).
///
/// Read paths (`set_filters`, `mount`, `refresh`, `snapshot`) never fail:
/// if the engine is gone they log and return. Write paths return
/// [`CatalogError`] so the calling dialog can decide whether to stay open.
pub struct CatalogClient<T: CatalogEntity> {
    sender: mpsc::Sender<CatalogRequest<T>>,
    snapshots: watch::Receiver<Arc<CatalogSnapshot<T>>>,
}

impl<T: CatalogEntity> Clone for CatalogClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<T: CatalogEntity> CatalogClient<T> {
    pub fn new(
        sender: mpsc::Sender<CatalogRequest<T>>,
        snapshots: watch::Receiver<Arc<CatalogSnapshot<T>>>,
    ) -> Self {
        Self { sender, snapshots }
    }

    /// Sends a read-path request; `None` when the engine is unavailable.
    async fn ask<R>(&self, build: impl FnOnce(oneshot::Sender<R>) -> CatalogRequest<T>) -> Option<R> {
        let (respond_to, response) = oneshot::channel();
        if self.sender.send(build(respond_to)).await.is_err() {
            warn!(entity_type = T::KIND, "Catalog engine closed");
            return None;
        }
        response.await.ok()
    }

    async fn write<R>(&self, build: impl FnOnce(Response<R>) -> CatalogRequest<T>) -> Result<R, CatalogError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| CatalogError::EngineClosed)?;
        response.await.map_err(|_| CatalogError::EngineDropped)?
    }

    /// Debounced: only the last state of a burst reaches the provider.
    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn set_filters(&self, filters: FilterState) {
        self.ask(|respond_to| CatalogRequest::SetFilters { filters, respond_to })
            .await;
    }

    /// Debounced like [`set_filters`](Self::set_filters), but edits one
    /// field of the state the engine currently holds.
    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn change_filter(&self, partition: PartitionName, change: FilterChange) {
        self.ask(|respond_to| CatalogRequest::ChangeFilter {
            partition,
            change,
            respond_to,
        })
        .await;
    }

    /// Fetches every partition now and waits until all have settled.
    /// Partitions without an entry in `filters` keep their current state.
    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn mount(&self, filters: Vec<FilterState>) {
        self.ask(|respond_to| CatalogRequest::Mount { filters, respond_to })
            .await;
    }

    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn refresh(&self, partition: PartitionName) {
        self.ask(|respond_to| CatalogRequest::Refresh { partition, respond_to })
            .await;
    }

    pub async fn filters(&self, partition: PartitionName) -> Option<FilterState> {
        self.ask(|respond_to| CatalogRequest::Filters { partition, respond_to })
            .await
            .flatten()
    }

    /// Latest published state of every partition.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot<T>> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot<T>>> {
        self.snapshots.clone()
    }

    async fn mutate(&self, mutation: Mutation<T>) -> Result<T, CatalogError> {
        self.write(|respond_to| CatalogRequest::Mutate { mutation, respond_to })
            .await
    }

    /// The new entity is always private.
    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn create(&self, params: T::Create) -> Result<T, CatalogError> {
        self.mutate(Mutation::Create(params)).await
    }

    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, CatalogError> {
        self.mutate(Mutation::Update { id, update }).await
    }

    #[tracing::instrument(skip(self), fields(entity_type = T::KIND))]
    pub async fn duplicate(&self, id: T::Id) -> Result<T, CatalogError> {
        self.mutate(Mutation::Duplicate(id)).await
    }

    pub async fn archive(&self, id: T::Id) -> Result<T, CatalogError> {
        self.mutate(Mutation::Archive(id)).await
    }

    pub async fn restore(&self, id: T::Id) -> Result<T, CatalogError> {
        self.mutate(Mutation::Restore(id)).await
    }

    /// Archives the item, or restores it if it is already archived.
    #[tracing::instrument(skip(self, item), fields(entity_type = T::KIND, id = %item.id()))]
    pub async fn toggle_archive(&self, item: &T) -> Result<T, CatalogError> {
        self.mutate(toggle_archive(item)).await
    }

    /// Asks `confirmation` first. Resolves to `false` when the user declines,
    /// in which case nothing is sent.
    #[tracing::instrument(skip(self, confirmation), fields(entity_type = T::KIND))]
    pub async fn delete(&self, id: T::Id, confirmation: &dyn Confirmation) -> Result<bool, CatalogError> {
        let prompt = format!("Are you sure you want to delete this {}?", T::KIND.to_lowercase());
        if !confirmation.confirm(&prompt).await {
            info!(%id, "Delete declined");
            return Ok(false);
        }
        self.write(|respond_to| CatalogRequest::Delete { id, respond_to })
            .await?;
        Ok(true)
    }
}
