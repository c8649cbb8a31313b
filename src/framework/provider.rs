use super::{CatalogEntity, ProviderError};
use crate::query::{ProviderPage, ProviderQuery};
use async_trait::async_trait;

/// Remote CRUD/query interface for one resource kind.
///
/// The engine only ever talks to this trait, so the in-memory
/// [`ResourceClient`](super::ResourceClient), the test mock and a real
/// network adapter are interchangeable. Every call may fail.
#[async_trait]
pub trait ResourceProvider<T: CatalogEntity>: Send + Sync {
    async fn get_many(&self, query: ProviderQuery) -> Result<ProviderPage<T>, ProviderError>;

    async fn create(&self, params: T::Create) -> Result<T, ProviderError>;

    async fn update(&self, id: T::Id, update: T::Update) -> Result<T, ProviderError>;

    async fn duplicate(&self, id: T::Id) -> Result<T, ProviderError>;

    async fn archive(&self, id: T::Id) -> Result<T, ProviderError>;

    async fn restore(&self, id: T::Id) -> Result<T, ProviderError>;

    async fn delete(&self, id: T::Id) -> Result<(), ProviderError>;
}
