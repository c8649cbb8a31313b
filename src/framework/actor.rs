//! # In-Memory Backing Service
//!
//! A [`ResourceActor`] stands in for the remote collection behind a
//! resource provider. It owns every entity of one kind and answers the
//! provider contract over an mpsc mailbox.
//!
//! **Concurrency Model**:
//! Each actor processes its messages sequentially, so the store needs no
//! `Mutex`. Query results are ordered most-recent-first (`created_at`
//! descending, later insertions first on ties) and paginated server-side.

use super::{CatalogEntity, ProviderError, ResourceClient, ResourceRequest};
use crate::model::ResourceStatus;
use crate::pipeline::{page_slice, total_pages, Predicate};
use crate::query::{PageMeta, ProviderPage, ProviderQuery};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct Stored<T> {
    seq: u64,
    item: T,
}

pub struct ResourceActor<T: CatalogEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Stored<T>>,
    next_id: u32,
    next_seq: u64,
}

impl<T: CatalogEntity> ResourceActor<T> {
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
            next_seq: 0,
        };
        (actor, ResourceClient::new(sender))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Preloads an entity before the actor starts serving.
    /// The payload is stored as given; `status` overrides the initial draft.
    pub fn seed(
        &mut self,
        params: T::Create,
        created_at: DateTime<Utc>,
        status: ResourceStatus,
    ) -> Result<T, T::Error> {
        let id = self.allocate_id();
        let mut item = T::from_create_params(id, params, created_at)?;
        item.record_mut().status = status;
        self.insert(item.clone());
        Ok(item)
    }

    fn allocate_id(&mut self) -> T::Id {
        let id = T::Id::from(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.store.insert(item.id().clone(), Stored { seq, item });
    }

    fn get_many(&self, query: &ProviderQuery) -> ProviderPage<T> {
        let predicate = Predicate::from(query);
        let mut matching: Vec<&Stored<T>> = self
            .store
            .values()
            .filter(|stored| predicate.matches(stored.item.record()))
            .collect();
        matching.sort_by_key(|stored| Reverse((stored.item.record().created_at, stored.seq)));

        let total = matching.len();
        let data = page_slice(&matching, query.page, query.limit)
            .iter()
            .map(|stored| stored.item.clone())
            .collect();
        ProviderPage {
            data,
            pagination: PageMeta {
                total,
                total_pages: total_pages(total, query.limit),
            },
        }
    }

    /// Applies `change` to a copy of the stored entity and keeps it only if
    /// the change succeeds.
    fn modify<F>(&mut self, id: &T::Id, change: F) -> Result<T, ProviderError>
    where
        F: FnOnce(&mut T) -> Result<(), T::Error>,
    {
        let stored = self
            .store
            .get_mut(id)
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))?;
        let mut item = stored.item.clone();
        change(&mut item).map_err(|e| ProviderError::Validation(e.to_string()))?;
        stored.item = item.clone();
        Ok(item)
    }

    /// Runs the actor's event loop until every client is dropped.
    pub async fn run(mut self) {
        let entity_type = T::KIND;
        info!(entity_type, size = self.store.len(), "Backing service started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::GetMany { query, respond_to } => {
                    let page = self.get_many(&query);
                    debug!(entity_type, ?query, returned = page.data.len(), total = page.pagination.total, "GetMany");
                    let _ = respond_to.send(Ok(page));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).map(|stored| stored.item.clone());
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = self.allocate_id();
                    match T::from_create_params(id.clone(), params, Utc::now()) {
                        Ok(item) => {
                            self.insert(item.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(ProviderError::Validation(e.to_string())));
                        }
                    }
                }
                ResourceRequest::Update { id, update, respond_to } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.modify(&id, |item| {
                        item.on_update(update)?;
                        item.record_mut().updated_at = Utc::now();
                        Ok(())
                    });
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Duplicate { id, respond_to } => {
                    debug!(entity_type, %id, "Duplicate");
                    let source = self.store.get(&id).map(|stored| stored.item.clone());
                    let result = match source {
                        Some(source) => {
                            let copy = source.duplicate_as(self.allocate_id(), Utc::now());
                            self.insert(copy.clone());
                            info!(entity_type, %id, copy = %copy.id(), size = self.store.len(), "Duplicated");
                            Ok(copy)
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            Err(ProviderError::NotFound(id.to_string()))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Archive { id, respond_to } => {
                    debug!(entity_type, %id, "Archive");
                    let result = self.modify(&id, |item| {
                        item.record_mut().archive(Utc::now());
                        Ok(())
                    });
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Archived"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Archive failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Restore { id, respond_to } => {
                    debug!(entity_type, %id, "Restore");
                    let result = self.modify(&id, |item| {
                        item.record_mut().restore(Utc::now());
                        Ok(())
                    });
                    match &result {
                        Ok(item) => info!(entity_type, %id, status = %item.record().status, "Restored"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Restore failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if self.store.remove(&id).is_some() {
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(ProviderError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ResourceProvider;
    use crate::model::{Protocol, ProtocolCreate, ProtocolId, ProtocolUpdate, Visibility};
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap()
    }

    fn spawn_seeded() -> ResourceClient<Protocol> {
        let (mut actor, client) = ResourceActor::<Protocol>::new(10);
        let public = |title: &str| {
            ProtocolCreate::new(title, "Molecular", "alice").with_visibility(Visibility::Public)
        };
        actor.seed(public("Older"), day(1), ResourceStatus::Approved).unwrap();
        actor.seed(public("Reviewing"), day(2), ResourceStatus::InReview).unwrap();
        actor.seed(public("Newest"), day(3), ResourceStatus::Draft).unwrap();
        actor
            .seed(ProtocolCreate::new("Private", "Cell", "alice"), day(4), ResourceStatus::Draft)
            .unwrap();
        tokio::spawn(actor.run());
        client
    }

    fn public_query() -> ProviderQuery {
        ProviderQuery {
            page: 1,
            limit: 10,
            search: None,
            category: None,
            status: None,
            is_public: Some(true),
            exclude_in_review: Some(true),
        }
    }

    #[tokio::test]
    async fn get_many_filters_orders_and_paginates() {
        let client = spawn_seeded();

        let page = client.get_many(public_query()).await.unwrap();
        let titles: Vec<_> = page.data.iter().map(|p| p.record.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Older"]);
        assert_eq!(page.pagination, PageMeta { total: 2, total_pages: 1 });

        let narrow = ProviderQuery { limit: 1, page: 2, ..public_query() };
        let page = client.get_many(narrow).await.unwrap();
        assert_eq!(page.data[0].record.title, "Older");
        assert_eq!(page.pagination, PageMeta { total: 2, total_pages: 2 });
    }

    #[tokio::test]
    async fn explicit_status_lifts_in_review_suppression() {
        let client = spawn_seeded();
        let query = ProviderQuery {
            status: Some(ResourceStatus::InReview),
            exclude_in_review: None,
            ..public_query()
        };
        let page = client.get_many(query).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].record.title, "Reviewing");
    }

    #[tokio::test]
    async fn write_operations_round_trip_through_the_store() {
        let client = spawn_seeded();

        let created = client
            .create(ProtocolCreate::new("Fresh", "Cell", "bob"))
            .await
            .unwrap();
        assert_eq!(created.id, ProtocolId(5));

        let update = ProtocolUpdate {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        let updated = client.update(created.id, update).await.unwrap();
        assert_eq!(updated.record.title, "Renamed");
        assert!(updated.record.updated_at >= created.record.updated_at);

        let copy = client.duplicate(ProtocolId(1)).await.unwrap();
        assert_eq!(copy.id, ProtocolId(6));
        assert_eq!(copy.record.title, "Older (Copy)");

        let archived = client.archive(ProtocolId(1)).await.unwrap();
        assert_eq!(archived.record.status, ResourceStatus::Archived);
        let restored = client.restore(ProtocolId(1)).await.unwrap();
        assert_eq!(restored.record.status, ResourceStatus::Approved);

        client.delete(ProtocolId(1)).await.unwrap();
        assert_eq!(client.get(ProtocolId(1)).await.unwrap(), None);
        assert_eq!(
            client.delete(ProtocolId(1)).await,
            Err(ProviderError::NotFound("protocol_1".into()))
        );
    }

    #[tokio::test]
    async fn rejected_update_leaves_entity_untouched() {
        let client = spawn_seeded();
        let update = ProtocolUpdate {
            title: Some("  ".into()),
            ..Default::default()
        };
        let result = client.update(ProtocolId(1), update).await;
        assert!(matches!(result, Err(ProviderError::Validation(_))));
        let stored = client.get(ProtocolId(1)).await.unwrap().unwrap();
        assert_eq!(stored.record.title, "Older");
    }
}
