//! # View Store
//!
//! Holds every partition of one catalog. All writes go through the
//! operations below so that an id present in several partitions always
//! carries the same field values after a mutation.
//!
//! The store is owned by a single [`CatalogActor`](crate::engine::CatalogActor)
//! task and is never shared, so it needs no locking.

use super::{Pagination, Partition, PartitionMode, PartitionName, PartitionView};
use crate::framework::CatalogEntity;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct ViewStore<T: CatalogEntity> {
    partitions: BTreeMap<PartitionName, Partition<T>>,
}

impl<T: CatalogEntity> Default for ViewStore<T> {
    fn default() -> Self {
        Self {
            partitions: BTreeMap::new(),
        }
    }
}

impl<T: CatalogEntity> ViewStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partitions(definitions: &[(PartitionName, PartitionMode)]) -> Self {
        let mut store = Self::new();
        for (name, mode) in definitions {
            store.define(*name, *mode);
        }
        store
    }

    /// Adds an empty partition. Redefining a name resets it.
    pub fn define(&mut self, name: PartitionName, mode: PartitionMode) {
        self.partitions.insert(name, Partition::new(name, mode));
    }

    pub fn partition(&self, name: PartitionName) -> Option<&Partition<T>> {
        self.partitions.get(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = PartitionName> + '_ {
        self.partitions.keys().copied()
    }

    /// Partitions currently holding `id`.
    pub fn containing(&self, id: &T::Id) -> Vec<PartitionName> {
        self.partitions
            .values()
            .filter(|partition| partition.contains(id))
            .map(Partition::name)
            .collect()
    }

    /// Full replace after a fetch. Applying the same payload twice yields
    /// the same state. Returns false for an unknown partition.
    pub fn replace_partition(
        &mut self,
        name: PartitionName,
        items: Vec<T>,
        pagination: Pagination,
    ) -> bool {
        match self.partitions.get_mut(&name) {
            Some(partition) => {
                partition.replace(items, pagination);
                true
            }
            None => false,
        }
    }

    /// For every partition: if `membership` holds, insert at head or replace
    /// in place by id; otherwise remove the id if present.
    /// Returns the partitions that now hold the resource.
    pub fn upsert_across_partitions<F>(&mut self, resource: &T, membership: F) -> Vec<PartitionName>
    where
        F: Fn(&T, PartitionName) -> bool,
    {
        let mut holders = Vec::new();
        for (name, partition) in self.partitions.iter_mut() {
            if membership(resource, *name) {
                partition.upsert_at_head(resource.clone());
                holders.push(*name);
            } else {
                partition.remove(resource.id());
            }
        }
        holders
    }

    /// Identity replace: overwrite the resource wherever it already is,
    /// without re-evaluating membership.
    pub fn replace_identity(&mut self, resource: &T) -> Vec<PartitionName> {
        self.partitions
            .values_mut()
            .filter_map(|partition| partition.replace_in_place(resource).then(|| partition.name()))
            .collect()
    }

    /// Deletes the id from every partition. Returns where it was removed.
    pub fn remove_across_partitions(&mut self, id: &T::Id) -> Vec<PartitionName> {
        self.partitions
            .values_mut()
            .filter_map(|partition| partition.remove(id).then(|| partition.name()))
            .collect()
    }

    pub fn set_fetching(&mut self, name: PartitionName, fetching: bool) {
        if let Some(partition) = self.partitions.get_mut(&name) {
            partition.set_fetching(fetching);
        }
    }

    pub fn begin_mutation(&mut self, names: &[PartitionName]) {
        for name in names {
            if let Some(partition) = self.partitions.get_mut(name) {
                partition.begin_mutation();
            }
        }
    }

    pub fn end_mutation(&mut self, names: &[PartitionName]) {
        for name in names {
            if let Some(partition) = self.partitions.get_mut(name) {
                partition.end_mutation();
            }
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot<T> {
        CatalogSnapshot {
            partitions: self.partitions.values().map(Partition::view).collect(),
        }
    }
}

/// What the render layer sees: every partition's items, pagination and
/// loading flag at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot<T> {
    pub partitions: Vec<PartitionView<T>>,
}

impl<T> Default for CatalogSnapshot<T> {
    fn default() -> Self {
        Self {
            partitions: Vec::new(),
        }
    }
}

impl<T: CatalogEntity> CatalogSnapshot<T> {
    pub fn partition(&self, name: PartitionName) -> Option<&PartitionView<T>> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// Items of a partition; empty for an unknown name.
    pub fn items(&self, name: PartitionName) -> &[T] {
        self.partition(name).map_or(&[], |p| p.items.as_slice())
    }

    pub fn ids(&self, name: PartitionName) -> Vec<T::Id> {
        self.items(name).iter().map(|item| item.id().clone()).collect()
    }

    pub fn is_loading(&self, name: PartitionName) -> bool {
        self.partition(name).is_some_and(|p| p.loading)
    }

    pub fn any_loading(&self) -> bool {
        self.partitions.iter().any(|p| p.loading)
    }
}
