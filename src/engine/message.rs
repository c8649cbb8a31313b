use super::{CatalogError, FetchTicket, Mutation, MutationKind};
use crate::framework::{CatalogEntity, ProviderError};
use crate::query::{FilterChange, FilterState, ProviderPage};
use crate::store::PartitionName;
use tokio::sync::oneshot;

pub type Response<T> = oneshot::Sender<Result<T, CatalogError>>;

/// Requests accepted by a [`CatalogActor`](super::CatalogActor).
#[derive(Debug)]
pub enum CatalogRequest<T: CatalogEntity> {
    /// Debounced filter change for the partition named by `filters.tab`.
    SetFilters {
        filters: FilterState,
        respond_to: oneshot::Sender<()>,
    },
    /// One-field edit applied to the partition's current filter state.
    ChangeFilter {
        partition: PartitionName,
        change: FilterChange,
        respond_to: oneshot::Sender<()>,
    },
    /// Immediate fetch of every partition; answers once all have settled.
    Mount {
        filters: Vec<FilterState>,
        respond_to: oneshot::Sender<()>,
    },
    /// Re-issue a partition's last query; answers once it has settled.
    Refresh {
        partition: PartitionName,
        respond_to: oneshot::Sender<()>,
    },
    Filters {
        partition: PartitionName,
        respond_to: oneshot::Sender<Option<FilterState>>,
    },
    Mutate {
        mutation: Mutation<T>,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

/// Provider results flowing back into the actor loop.
#[derive(Debug)]
pub(crate) enum SettleEvent<T: CatalogEntity> {
    Fetch {
        ticket: FetchTicket,
        result: Result<ProviderPage<T>, ProviderError>,
    },
    Saved {
        token: u64,
        result: Result<T, ProviderError>,
    },
    Deleted {
        token: u64,
        result: Result<(), ProviderError>,
    },
}

/// A write awaiting its provider answer.
pub(crate) struct PendingSave<T: CatalogEntity> {
    pub kind: MutationKind,
    pub targets: Vec<PartitionName>,
    pub respond_to: Response<T>,
}

pub(crate) struct PendingDelete<T: CatalogEntity> {
    pub id: T::Id,
    pub targets: Vec<PartitionName>,
    pub respond_to: Response<()>,
}
