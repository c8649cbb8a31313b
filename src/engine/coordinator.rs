//! # Mutation Coordinator
//!
//! Decides what a write does to the local views: which partitions show a
//! loading flag while the provider call runs, and how the confirmed result
//! is reconciled into the store. Nothing here touches local state before
//! the provider has answered.

use crate::framework::{CatalogEntity, ProviderError, ResourceProvider};
use crate::model::{ResourceStatus, Visibility};
use crate::store::{PartitionName, ViewStore};
use serde::{Deserialize, Serialize};

/// Where a duplicate is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePlacement {
    /// Head of both public and mine, whatever the copy's visibility.
    #[default]
    PublicAndMine,
    /// Only the partitions whose membership predicate accepts the copy.
    ByMembership,
}

/// A write that answers with the stored entity.
#[derive(Debug, Clone)]
pub enum Mutation<T: CatalogEntity> {
    Create(T::Create),
    Update { id: T::Id, update: T::Update },
    Duplicate(T::Id),
    Archive(T::Id),
    Restore(T::Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Duplicate,
    Archive,
    Restore,
    Delete,
}

impl MutationKind {
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Duplicate => "duplicate",
            MutationKind::Archive => "archive",
            MutationKind::Restore => "restore",
            MutationKind::Delete => "delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Duplicate => "duplicated",
            MutationKind::Archive => "archived",
            MutationKind::Restore => "restored",
            MutationKind::Delete => "deleted",
        }
    }

    pub fn success_message(&self, entity_kind: &str) -> String {
        format!("{entity_kind} {} successfully", self.past_tense())
    }

    pub fn failure_message(&self, entity_kind: &str, error: &ProviderError) -> String {
        format!("Failed to {} {}: {error}", self.verb(), entity_kind.to_lowercase())
    }
}

impl<T: CatalogEntity> Mutation<T> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Duplicate(_) => MutationKind::Duplicate,
            Mutation::Archive(_) => MutationKind::Archive,
            Mutation::Restore(_) => MutationKind::Restore,
        }
    }

    /// Id of the existing entity this mutation targets.
    pub fn target(&self) -> Option<&T::Id> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update { id, .. }
            | Mutation::Duplicate(id)
            | Mutation::Archive(id)
            | Mutation::Restore(id) => Some(id),
        }
    }

    /// Creation always starts private, whatever the caller asked for.
    pub fn prepare(mut self) -> Self {
        if let Mutation::Create(params) = &mut self {
            T::force_visibility(params, Visibility::Private);
        }
        self
    }

    pub async fn perform(self, provider: &dyn ResourceProvider<T>) -> Result<T, ProviderError> {
        match self {
            Mutation::Create(params) => provider.create(params).await,
            Mutation::Update { id, update } => provider.update(id, update).await,
            Mutation::Duplicate(id) => provider.duplicate(id).await,
            Mutation::Archive(id) => provider.archive(id).await,
            Mutation::Restore(id) => provider.restore(id).await,
        }
    }
}

/// Archive unless already archived, in which case restore.
pub fn toggle_archive<T: CatalogEntity>(item: &T) -> Mutation<T> {
    let id = item.id().clone();
    if item.record().status == ResourceStatus::Archived {
        Mutation::Restore(id)
    } else {
        Mutation::Archive(id)
    }
}

/// Which partitions an entity belongs to by its own fields.
pub fn default_membership<T: CatalogEntity>(item: &T, partition: PartitionName) -> bool {
    match partition {
        PartitionName::Public => item.record().is_public(),
        PartitionName::Mine => !item.record().is_public(),
        PartitionName::Recent => true,
    }
}

fn duplicate_target<T: CatalogEntity>(
    placement: DuplicatePlacement,
    item: &T,
    partition: PartitionName,
) -> bool {
    match placement {
        DuplicatePlacement::PublicAndMine => {
            matches!(partition, PartitionName::Public | PartitionName::Mine)
        }
        DuplicatePlacement::ByMembership => default_membership(item, partition),
    }
}

/// Partitions flagged as loading while the provider call runs.
pub fn loading_targets<T: CatalogEntity>(
    store: &ViewStore<T>,
    kind: MutationKind,
    target: Option<&T::Id>,
    placement: DuplicatePlacement,
) -> Vec<PartitionName> {
    let mut names: Vec<PartitionName> = match kind {
        MutationKind::Create => store
            .names()
            .filter(|name| *name == PartitionName::Mine)
            .collect(),
        MutationKind::Duplicate => store
            .names()
            .filter(|name| {
                placement == DuplicatePlacement::ByMembership
                    || matches!(name, PartitionName::Public | PartitionName::Mine)
            })
            .collect(),
        _ => Vec::new(),
    };
    if let Some(id) = target {
        for name in store.containing(id) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Applies a confirmed write to the store. Returns the partitions touched.
pub fn reconcile<T: CatalogEntity>(
    store: &mut ViewStore<T>,
    kind: MutationKind,
    resource: &T,
    placement: DuplicatePlacement,
) -> Vec<PartitionName> {
    match kind {
        MutationKind::Create => {
            store.upsert_across_partitions(resource, |_, name| name == PartitionName::Mine)
        }
        MutationKind::Duplicate => store.upsert_across_partitions(resource, |item, name| {
            duplicate_target(placement, item, name)
        }),
        MutationKind::Update | MutationKind::Archive | MutationKind::Restore => {
            store.replace_identity(resource)
        }
        MutationKind::Delete => store.remove_across_partitions(resource.id()),
    }
}
