//! Named partitions of a resource collection.

use crate::framework::CatalogEntity;
use crate::pipeline::total_pages;
use crate::query::PageMeta;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The views a catalog keeps of its backing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionName {
    /// Shared with everyone (`visibility == public`).
    Public,
    /// The current user's private items.
    Mine,
    /// Capped most-recent window.
    Recent,
}

impl Display for PartitionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PartitionName::Public => "public",
            PartitionName::Mine => "mine",
            PartitionName::Recent => "recent",
        })
    }
}

/// How a partition is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PartitionMode {
    /// One page at a time; pagination comes from the provider.
    ServerPaginated,
    /// One bounded fetch, then filtered/sorted/paginated locally.
    Window { capacity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// Server-reported totals for the requested page.
    pub fn from_server(page: usize, limit: usize, meta: PageMeta) -> Self {
        Self {
            page,
            limit,
            total: meta.total,
            total_pages: meta.total_pages,
        }
    }

    /// Pagination of a locally held list of `len` items.
    pub fn local(len: usize, limit: usize) -> Self {
        Self {
            page: 1,
            limit,
            total: len,
            total_pages: total_pages(len, limit),
        }
    }
}

/// An ordered list of entities plus pagination metadata and loading state.
#[derive(Debug, Clone)]
pub struct Partition<T: CatalogEntity> {
    name: PartitionName,
    mode: PartitionMode,
    items: Vec<T>,
    pagination: Pagination,
    fetching: bool,
    pending_mutations: usize,
}

impl<T: CatalogEntity> Partition<T> {
    pub fn new(name: PartitionName, mode: PartitionMode) -> Self {
        Self {
            name,
            mode,
            items: Vec::new(),
            pagination: Pagination::default(),
            fetching: false,
            pending_mutations: 0,
        }
    }

    pub fn name(&self) -> PartitionName {
        self.name
    }

    pub fn mode(&self) -> PartitionMode {
        self.mode
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// True while a fetch or any mutation touching this partition is in flight.
    pub fn loading(&self) -> bool {
        self.fetching || self.pending_mutations > 0
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn set_fetching(&mut self, fetching: bool) {
        self.fetching = fetching;
    }

    pub(crate) fn begin_mutation(&mut self) {
        self.pending_mutations += 1;
    }

    pub(crate) fn end_mutation(&mut self) {
        self.pending_mutations = self.pending_mutations.saturating_sub(1);
    }

    pub(crate) fn replace(&mut self, mut items: Vec<T>, pagination: Pagination) {
        match self.mode {
            PartitionMode::ServerPaginated => {
                self.items = items;
                self.pagination = pagination;
            }
            PartitionMode::Window { capacity } => {
                items.truncate(capacity);
                self.pagination = Pagination::local(items.len(), capacity);
                self.items = items;
            }
        }
    }

    /// Replace in place if present, otherwise insert at the head.
    /// Windows are kept within capacity.
    pub(crate) fn upsert_at_head(&mut self, item: T) {
        if let Some(index) = self.position(item.id()) {
            self.items[index] = item;
            return;
        }
        self.items.insert(0, item);
        if let PartitionMode::Window { capacity } = self.mode {
            self.items.truncate(capacity);
            self.pagination = Pagination::local(self.items.len(), capacity);
        }
    }

    /// Returns false when the id is not held here.
    pub(crate) fn replace_in_place(&mut self, item: &T) -> bool {
        match self.position(item.id()) {
            Some(index) => {
                self.items[index] = item.clone();
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: &T::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed = self.items.len() != before;
        if removed {
            if let PartitionMode::Window { capacity } = self.mode {
                self.pagination = Pagination::local(self.items.len(), capacity);
            }
        }
        removed
    }

    pub fn view(&self) -> PartitionView<T> {
        PartitionView {
            name: self.name,
            items: self.items.clone(),
            pagination: self.pagination,
            loading: self.loading(),
        }
    }
}

/// Immutable copy of a partition handed to render consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionView<T> {
    pub name: PartitionName,
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub loading: bool,
}
