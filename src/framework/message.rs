use super::{CatalogEntity, ProviderError};
use crate::query::{ProviderPage, ProviderQuery};
use tokio::sync::oneshot;

/// One-shot response channel used by the backing service.
pub type Response<T> = oneshot::Sender<Result<T, ProviderError>>;

/// Message type sent to a [`ResourceActor`](super::ResourceActor).
///
/// # The Provider Contract
/// The variants map one to one onto the remote resource interface: a paged
/// query (`GetMany`), single reads, and the five write operations the
/// mutation coordinator performs. Writes answer with the stored entity so
/// the caller can reconcile its views from the server's version.
#[derive(Debug)]
pub enum ResourceRequest<T: CatalogEntity> {
    GetMany {
        query: ProviderQuery,
        respond_to: Response<ProviderPage<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Duplicate {
        id: T::Id,
        respond_to: Response<T>,
    },
    Archive {
        id: T::Id,
        respond_to: Response<T>,
    },
    Restore {
        id: T::Id,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
