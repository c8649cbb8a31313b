//! Fields shared by every catalog resource.
//!
//! Filtering, sorting and partition membership only ever look at this header,
//! so the pipeline and the view store stay generic over resource kinds.

use super::{ResourceStatus, Visibility};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub status: ResourceStatus,
    pub visibility: Visibility,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Status held before the resource was archived; restore returns to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_from: Option<ResourceStatus>,
}

impl ResourceRecord {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        owner: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: category.into(),
            format: None,
            status: ResourceStatus::Draft,
            visibility: Visibility::Private,
            owner: owner.into(),
            created_at: now,
            updated_at: now,
            archived_from: None,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility.is_public()
    }

    /// Moves the record into `Archived`, remembering where it came from.
    /// Archiving an already archived record is a no-op.
    pub fn archive(&mut self, now: DateTime<Utc>) {
        if self.status != ResourceStatus::Archived {
            self.archived_from = Some(self.status);
            self.status = ResourceStatus::Archived;
            self.updated_at = now;
        }
    }

    /// Returns an archived record to its pre-archive status (`Draft` if unknown).
    pub fn restore(&mut self, now: DateTime<Utc>) {
        if self.status == ResourceStatus::Archived {
            self.status = self.archived_from.take().unwrap_or(ResourceStatus::Draft);
            self.updated_at = now;
        }
    }

    /// Header for a copy of this record: fresh timestamps, back to draft.
    pub fn duplicate(&self, now: DateTime<Utc>) -> Self {
        Self {
            title: format!("{} (Copy)", self.title),
            status: ResourceStatus::Draft,
            archived_from: None,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}
