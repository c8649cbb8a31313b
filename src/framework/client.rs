use super::{CatalogEntity, ProviderError, ResourceProvider, ResourceRequest};
use crate::query::{ProviderPage, ProviderQuery};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for a [`ResourceActor`](super::ResourceActor).
///
/// The provider operations come from its [`ResourceProvider`] impl.
pub struct ResourceClient<T: CatalogEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: CatalogEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: CatalogEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, ProviderError>>) -> ResourceRequest<T>,
    ) -> Result<R, ProviderError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ProviderError::Unavailable)?;
        response.await.map_err(|_| ProviderError::Dropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, ProviderError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }
}

#[async_trait]
impl<T: CatalogEntity> ResourceProvider<T> for ResourceClient<T> {
    async fn get_many(&self, query: ProviderQuery) -> Result<ProviderPage<T>, ProviderError> {
        self.request(|respond_to| ResourceRequest::GetMany { query, respond_to })
            .await
    }

    async fn create(&self, params: T::Create) -> Result<T, ProviderError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    async fn update(&self, id: T::Id, update: T::Update) -> Result<T, ProviderError> {
        self.request(|respond_to| ResourceRequest::Update { id, update, respond_to })
            .await
    }

    async fn duplicate(&self, id: T::Id) -> Result<T, ProviderError> {
        self.request(|respond_to| ResourceRequest::Duplicate { id, respond_to })
            .await
    }

    async fn archive(&self, id: T::Id) -> Result<T, ProviderError> {
        self.request(|respond_to| ResourceRequest::Archive { id, respond_to })
            .await
    }

    async fn restore(&self, id: T::Id) -> Result<T, ProviderError> {
        self.request(|respond_to| ResourceRequest::Restore { id, respond_to })
            .await
    }

    async fn delete(&self, id: T::Id) -> Result<(), ProviderError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }
}
