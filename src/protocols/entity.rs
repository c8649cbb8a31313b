//! CatalogEntity trait implementation for the Protocol domain type.
//!
//! See the trait implementation on [`Protocol`] for method documentation.

use super::ProtocolError;
use crate::framework::CatalogEntity;
use crate::model::{Protocol, ProtocolCreate, ProtocolId, ProtocolUpdate, ResourceRecord, Visibility};
use chrono::{DateTime, Utc};

const INITIAL_VERSION: &str = "1.0.0";

fn validate_steps(steps: &[String]) -> Result<(), ProtocolError> {
    match steps.iter().position(|step| step.trim().is_empty()) {
        Some(index) => Err(ProtocolError::BlankStep(index + 1)),
        None => Ok(()),
    }
}

impl CatalogEntity for Protocol {
    const KIND: &'static str = "Protocol";

    type Id = ProtocolId;
    type Create = ProtocolCreate;
    type Update = ProtocolUpdate;
    type Error = ProtocolError;

    fn id(&self) -> &ProtocolId {
        &self.id
    }

    fn record(&self) -> &ResourceRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut ResourceRecord {
        &mut self.record
    }

    /// Creates a new draft Protocol from creation parameters.
    fn from_create_params(
        id: ProtocolId,
        params: ProtocolCreate,
        now: DateTime<Utc>,
    ) -> Result<Self, ProtocolError> {
        if params.title.trim().is_empty() {
            return Err(ProtocolError::EmptyTitle);
        }
        if params.category.trim().is_empty() {
            return Err(ProtocolError::EmptyCategory);
        }
        validate_steps(&params.steps)?;

        let mut record = ResourceRecord::new(params.title, params.category, params.owner, now);
        record.description = params.description;
        record.visibility = params.visibility;
        Ok(Self {
            id,
            record,
            version: INITIAL_VERSION.to_string(),
            steps: params.steps,
        })
    }

    fn force_visibility(params: &mut ProtocolCreate, visibility: Visibility) {
        params.visibility = visibility;
    }

    /// Handles updates to the Protocol entity.
    ///
    /// The payload is validated as a whole before any field changes, so a
    /// rejected update leaves the protocol untouched.
    fn on_update(&mut self, update: ProtocolUpdate) -> Result<(), ProtocolError> {
        if matches!(&update.title, Some(title) if title.trim().is_empty()) {
            return Err(ProtocolError::EmptyTitle);
        }
        if matches!(&update.category, Some(category) if category.trim().is_empty()) {
            return Err(ProtocolError::EmptyCategory);
        }
        if let Some(steps) = &update.steps {
            validate_steps(steps)?;
        }

        let record = &mut self.record;
        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(description) = update.description {
            record.description = Some(description);
        }
        if let Some(category) = update.category {
            record.category = category;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(visibility) = update.visibility {
            record.visibility = visibility;
        }
        if let Some(version) = update.version {
            self.version = version;
        }
        if let Some(steps) = update.steps {
            self.steps = steps;
        }
        Ok(())
    }

    fn duplicate_as(&self, id: ProtocolId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            record: self.record.duplicate(now),
            version: INITIAL_VERSION.to_string(),
            steps: self.steps.clone(),
        }
    }
}
