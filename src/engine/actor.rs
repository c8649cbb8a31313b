//! # Catalog Actor
//!
//! One task per catalog owns the View Store, the per-partition fetch
//! orchestrators and all in-flight write bookkeeping. Provider calls run in
//! spawned tasks and report back through an internal settle channel, so
//! store updates only ever happen on this task.
//!
//! The loop waits on three sources at once:
//! - client requests (the mailbox),
//! - provider results (settle events),
//! - the earliest debounce deadline among the orchestrators.
//!
//! After every state change an immutable [`CatalogSnapshot`] is published on
//! a `watch` channel for render consumers.

use super::coordinator::{loading_targets, reconcile};
use super::message::{PendingDelete, PendingSave, SettleEvent};
use super::{CatalogClient, CatalogRequest, FetchOrchestrator, FetchTicket, MutationKind, Settle};
use crate::framework::{CatalogEntity, ProviderError, ResourceProvider};
use crate::lifecycle::EngineConfig;
use crate::notify::{NoticeKind, Notifier};
use crate::query::{FilterState, ProviderPage, ProviderQuery, QuerySpec};
use crate::store::{CatalogSnapshot, Pagination, PartitionMode, PartitionName, ViewStore};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Dependencies injected at `run` time.
pub struct CatalogContext<T: CatalogEntity> {
    pub provider: Arc<dyn ResourceProvider<T>>,
    pub notifier: Arc<dyn Notifier>,
}

impl<T: CatalogEntity> Clone for CatalogContext<T> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

/// Answers a mount or refresh once every listed fetch has settled.
struct Barrier {
    waiting: HashSet<(PartitionName, u64)>,
    respond_to: oneshot::Sender<()>,
}

pub struct CatalogActor<T: CatalogEntity> {
    receiver: mpsc::Receiver<CatalogRequest<T>>,
    settle_tx: mpsc::UnboundedSender<SettleEvent<T>>,
    settle_rx: mpsc::UnboundedReceiver<SettleEvent<T>>,
    snapshots: watch::Sender<Arc<CatalogSnapshot<T>>>,
    config: EngineConfig,
    store: ViewStore<T>,
    orchestrators: BTreeMap<PartitionName, FetchOrchestrator>,
    barriers: Vec<Barrier>,
    saves: HashMap<u64, PendingSave<T>>,
    deletes: HashMap<u64, PendingDelete<T>>,
    next_token: u64,
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn within<R>(
    limit: Duration,
    call: impl Future<Output = Result<R, ProviderError>>,
) -> Result<R, ProviderError> {
    time::timeout(limit, call)
        .await
        .unwrap_or(Err(ProviderError::Timeout(limit)))
}

impl<T: CatalogEntity> CatalogActor<T> {
    pub fn new(
        config: EngineConfig,
        partitions: &[(PartitionName, PartitionMode)],
    ) -> (Self, CatalogClient<T>) {
        let (sender, receiver) = mpsc::channel(config.mailbox_capacity.max(1));
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        let store = ViewStore::with_partitions(partitions);
        let (snapshots, snapshot_rx) = watch::channel(Arc::new(store.snapshot()));
        let orchestrators = partitions
            .iter()
            .map(|(name, _)| (*name, FetchOrchestrator::new(*name, config.debounce())))
            .collect();

        let actor = Self {
            receiver,
            settle_tx,
            settle_rx,
            snapshots,
            config,
            store,
            orchestrators,
            barriers: Vec::new(),
            saves: HashMap::new(),
            deletes: HashMap::new(),
            next_token: 0,
        };
        (actor, CatalogClient::new(sender, snapshot_rx))
    }

    /// Runs the event loop until every [`CatalogClient`] is dropped.
    pub async fn run(mut self, ctx: CatalogContext<T>) {
        let entity_type = T::KIND;
        info!(entity_type, partitions = self.orchestrators.len(), "Catalog engine started");

        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle_request(msg, &ctx),
                    None => break,
                },
                Some(event) = self.settle_rx.recv() => self.handle_settle(event, &ctx),
                _ = wait_for(deadline) => self.fire_due(&ctx),
            }
        }

        info!(
            entity_type,
            pending = self.saves.len() + self.deletes.len(),
            "Shutdown"
        );
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.orchestrators
            .values()
            .filter_map(FetchOrchestrator::deadline)
            .min()
    }

    fn window_capacity(&self, name: PartitionName) -> Option<usize> {
        match self.store.partition(name)?.mode() {
            PartitionMode::Window { capacity } => Some(capacity),
            PartitionMode::ServerPaginated => None,
        }
    }

    fn publish_snapshot(&self) {
        self.snapshots.send_replace(Arc::new(self.store.snapshot()));
    }

    fn handle_request(&mut self, msg: CatalogRequest<T>, ctx: &CatalogContext<T>) {
        let entity_type = T::KIND;
        match msg {
            CatalogRequest::SetFilters { filters, respond_to } => {
                let partition = filters.tab;
                let server_paged = self.window_capacity(partition).is_none();
                match self.orchestrators.get_mut(&partition) {
                    Some(orchestrator) if server_paged => {
                        let armed = orchestrator.publish(filters, Instant::now());
                        debug!(entity_type, %partition, armed, "Filters changed");
                    }
                    _ => debug!(entity_type, %partition, "No server-paged partition for filters"),
                }
                let _ = respond_to.send(());
            }
            CatalogRequest::ChangeFilter { partition, change, respond_to } => {
                let page_size = self.config.default_page_size;
                let server_paged = self.window_capacity(partition).is_none();
                match self.orchestrators.get_mut(&partition) {
                    Some(orchestrator) if server_paged => {
                        let current = orchestrator
                            .filters()
                            .cloned()
                            .unwrap_or_else(|| FilterState::new(partition, page_size));
                        let armed = orchestrator.publish(change.apply(current), Instant::now());
                        debug!(entity_type, %partition, armed, "Filter field changed");
                    }
                    _ => debug!(entity_type, %partition, "No server-paged partition for filters"),
                }
                let _ = respond_to.send(());
            }
            CatalogRequest::Mount { filters, respond_to } => {
                let names: Vec<PartitionName> = self.orchestrators.keys().copied().collect();
                let mut tickets = Vec::with_capacity(names.len());
                for name in names {
                    let window = self.window_capacity(name);
                    let initial = filters
                        .iter()
                        .find(|state| state.tab == name)
                        .cloned();
                    let page_size = self.config.default_page_size;
                    let Some(orchestrator) = self.orchestrators.get_mut(&name) else {
                        continue;
                    };
                    let ticket = match window {
                        Some(capacity) => orchestrator.dispatch_now(QuerySpec::window(capacity)),
                        None => {
                            let state = initial
                                .or_else(|| orchestrator.filters().cloned())
                                .unwrap_or_else(|| FilterState::new(name, page_size));
                            orchestrator.load(state)
                        }
                    };
                    tickets.push(ticket);
                }
                info!(entity_type, fetches = tickets.len(), "Mount");
                self.dispatch_all(tickets, Some(respond_to), ctx);
            }
            CatalogRequest::Refresh { partition, respond_to } => {
                let ticket = self
                    .orchestrators
                    .get_mut(&partition)
                    .and_then(FetchOrchestrator::refresh);
                debug!(entity_type, %partition, reissued = ticket.is_some(), "Refresh");
                self.dispatch_all(ticket.into_iter().collect(), Some(respond_to), ctx);
            }
            CatalogRequest::Filters { partition, respond_to } => {
                let filters = self
                    .orchestrators
                    .get(&partition)
                    .and_then(|orchestrator| orchestrator.filters().cloned());
                let _ = respond_to.send(filters);
            }
            CatalogRequest::Mutate { mutation, respond_to } => {
                let mutation = mutation.prepare();
                let kind = mutation.kind();
                let targets = loading_targets(
                    &self.store,
                    kind,
                    mutation.target(),
                    self.config.duplicate_placement,
                );
                debug!(entity_type, ?mutation, ?targets, "Mutation started");
                self.store.begin_mutation(&targets);
                self.publish_snapshot();

                let token = self.take_token();
                self.saves.insert(token, PendingSave { kind, targets, respond_to });

                let provider = ctx.provider.clone();
                let settle = self.settle_tx.clone();
                let limit = self.config.request_timeout();
                tokio::spawn(async move {
                    let result = within(limit, mutation.perform(provider.as_ref())).await;
                    let _ = settle.send(SettleEvent::Saved { token, result });
                });
            }
            CatalogRequest::Delete { id, respond_to } => {
                let targets = loading_targets(
                    &self.store,
                    MutationKind::Delete,
                    Some(&id),
                    self.config.duplicate_placement,
                );
                debug!(entity_type, %id, ?targets, "Delete started");
                self.store.begin_mutation(&targets);
                self.publish_snapshot();

                let token = self.take_token();
                self.deletes.insert(
                    token,
                    PendingDelete {
                        id: id.clone(),
                        targets,
                        respond_to,
                    },
                );

                let provider = ctx.provider.clone();
                let settle = self.settle_tx.clone();
                let limit = self.config.request_timeout();
                tokio::spawn(async move {
                    let result = within(limit, provider.delete(id)).await;
                    let _ = settle.send(SettleEvent::Deleted { token, result });
                });
            }
        }
    }

    fn take_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn fire_due(&mut self, ctx: &CatalogContext<T>) {
        let now = Instant::now();
        let tickets: Vec<FetchTicket> = self
            .orchestrators
            .values_mut()
            .filter_map(|orchestrator| orchestrator.poll(now))
            .collect();
        self.dispatch_all(tickets, None, ctx);
    }

    fn dispatch_all(
        &mut self,
        tickets: Vec<FetchTicket>,
        respond_to: Option<oneshot::Sender<()>>,
        ctx: &CatalogContext<T>,
    ) {
        let waiting: HashSet<(PartitionName, u64)> = tickets
            .iter()
            .map(|ticket| (ticket.partition, ticket.generation))
            .collect();
        for ticket in tickets {
            self.dispatch(ticket, ctx);
        }
        if let Some(respond_to) = respond_to {
            if waiting.is_empty() {
                let _ = respond_to.send(());
            } else {
                self.barriers.push(Barrier { waiting, respond_to });
            }
        }
        self.publish_snapshot();
    }

    fn dispatch(&mut self, ticket: FetchTicket, ctx: &CatalogContext<T>) {
        debug!(
            entity_type = T::KIND,
            partition = %ticket.partition,
            generation = ticket.generation,
            spec = ?ticket.spec,
            "Fetch dispatched"
        );
        self.store.set_fetching(ticket.partition, true);

        let provider = ctx.provider.clone();
        let settle = self.settle_tx.clone();
        let limit = self.config.request_timeout();
        tokio::spawn(async move {
            let query = ProviderQuery::from(&ticket.spec);
            let result = within(limit, provider.get_many(query)).await;
            let _ = settle.send(SettleEvent::Fetch { ticket, result });
        });
    }

    fn handle_settle(&mut self, event: SettleEvent<T>, ctx: &CatalogContext<T>) {
        match event {
            SettleEvent::Fetch { ticket, result } => self.settle_fetch(ticket, result, ctx),
            SettleEvent::Saved { token, result } => self.settle_save(token, result, ctx),
            SettleEvent::Deleted { token, result } => self.settle_delete(token, result, ctx),
        }
        self.publish_snapshot();
    }

    fn settle_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ProviderPage<T>, ProviderError>,
        ctx: &CatalogContext<T>,
    ) {
        let entity_type = T::KIND;
        let FetchTicket {
            partition,
            generation,
            spec,
        } = ticket;
        let settled = self
            .orchestrators
            .get_mut(&partition)
            .map(|orchestrator| orchestrator.settle(generation));

        match settled {
            Some(Settle::Current) => {
                self.store.set_fetching(partition, false);
                match result {
                    Ok(page) => {
                        let pagination = Pagination::from_server(spec.page, spec.limit, page.pagination);
                        info!(
                            entity_type,
                            %partition,
                            generation,
                            items = page.data.len(),
                            total = pagination.total,
                            "Partition loaded"
                        );
                        self.store.replace_partition(partition, page.data, pagination);
                    }
                    Err(e) => {
                        warn!(entity_type, %partition, generation, error = %e, "Fetch failed");
                        let message = format!(
                            "Failed to load {partition} {}s: {e}",
                            entity_type.to_lowercase()
                        );
                        ctx.notifier.notify(NoticeKind::Error, &message);
                    }
                }
            }
            Some(Settle::Stale) => {
                debug!(entity_type, %partition, generation, "Discarding stale response");
            }
            None => warn!(entity_type, %partition, "Response for unknown partition"),
        }

        self.release_barriers(partition, generation);
    }

    fn release_barriers(&mut self, partition: PartitionName, generation: u64) {
        let mut open = Vec::with_capacity(self.barriers.len());
        for mut barrier in self.barriers.drain(..) {
            barrier.waiting.remove(&(partition, generation));
            if barrier.waiting.is_empty() {
                let _ = barrier.respond_to.send(());
            } else {
                open.push(barrier);
            }
        }
        self.barriers = open;
    }

    fn settle_save(&mut self, token: u64, result: Result<T, ProviderError>, ctx: &CatalogContext<T>) {
        let entity_type = T::KIND;
        let Some(PendingSave { kind, targets, respond_to }) = self.saves.remove(&token) else {
            warn!(entity_type, token, "Result for unknown mutation");
            return;
        };
        self.store.end_mutation(&targets);

        match result {
            Ok(resource) => {
                let touched = reconcile(&mut self.store, kind, &resource, self.config.duplicate_placement);
                info!(entity_type, id = %resource.id(), action = kind.verb(), ?touched, "Mutation applied");
                ctx.notifier.notify(NoticeKind::Success, &kind.success_message(entity_type));
                let _ = respond_to.send(Ok(resource));
            }
            Err(e) => {
                warn!(entity_type, action = kind.verb(), error = %e, "Mutation failed");
                ctx.notifier.notify(NoticeKind::Error, &kind.failure_message(entity_type, &e));
                let _ = respond_to.send(Err(e.into()));
            }
        }
    }

    fn settle_delete(&mut self, token: u64, result: Result<(), ProviderError>, ctx: &CatalogContext<T>) {
        let entity_type = T::KIND;
        let Some(PendingDelete { id, targets, respond_to }) = self.deletes.remove(&token) else {
            warn!(entity_type, token, "Result for unknown delete");
            return;
        };
        self.store.end_mutation(&targets);

        let kind = MutationKind::Delete;
        match result {
            Ok(()) => {
                let touched = self.store.remove_across_partitions(&id);
                info!(entity_type, %id, ?touched, "Deleted");
                ctx.notifier.notify(NoticeKind::Success, &kind.success_message(entity_type));
                let _ = respond_to.send(Ok(()));
            }
            Err(e) => {
                warn!(entity_type, %id, error = %e, "Delete failed");
                ctx.notifier.notify(NoticeKind::Error, &kind.failure_message(entity_type, &e));
                let _ = respond_to.send(Err(e.into()));
            }
        }
    }
}
