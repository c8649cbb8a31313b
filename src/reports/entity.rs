//! CatalogEntity trait implementation for the Report domain type.
//!
//! Reports add the composite `uploadedBy.name` sort key and a free-form
//! `reportDate` key that is parsed as a date before comparison.

use super::ReportError;
use crate::framework::CatalogEntity;
use crate::model::{Report, ReportCreate, ReportId, ReportUpdate, ResourceRecord, Visibility};
use crate::pipeline::{SortRegistry, SortValue};
use chrono::{DateTime, Utc};

/// File formats the report store accepts, lowercase.
pub const SUPPORTED_FORMATS: &[&str] = &["pdf", "docx", "xlsx", "csv", "txt"];

fn validate_format(format: &str) -> Result<(), ReportError> {
    if SUPPORTED_FORMATS.contains(&format.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ReportError::UnsupportedFormat(format.to_string()))
    }
}

impl CatalogEntity for Report {
    const KIND: &'static str = "Report";

    type Id = ReportId;
    type Create = ReportCreate;
    type Update = ReportUpdate;
    type Error = ReportError;

    fn id(&self) -> &ReportId {
        &self.id
    }

    fn record(&self) -> &ResourceRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut ResourceRecord {
        &mut self.record
    }

    fn from_create_params(
        id: ReportId,
        params: ReportCreate,
        now: DateTime<Utc>,
    ) -> Result<Self, ReportError> {
        if params.title.trim().is_empty() {
            return Err(ReportError::EmptyTitle);
        }
        if params.category.trim().is_empty() {
            return Err(ReportError::EmptyType);
        }
        validate_format(&params.format)?;

        let mut record = ResourceRecord::new(
            params.title,
            params.category,
            params.uploaded_by.name.clone(),
            now,
        );
        record.description = params.description;
        record.format = Some(params.format.to_uppercase());
        record.visibility = params.visibility;
        Ok(Self {
            id,
            record,
            uploaded_by: params.uploaded_by,
            file_size: params.file_size,
            report_date: params.report_date,
        })
    }

    fn force_visibility(params: &mut ReportCreate, visibility: Visibility) {
        params.visibility = visibility;
    }

    fn on_update(&mut self, update: ReportUpdate) -> Result<(), ReportError> {
        if matches!(&update.title, Some(title) if title.trim().is_empty()) {
            return Err(ReportError::EmptyTitle);
        }
        if matches!(&update.category, Some(category) if category.trim().is_empty()) {
            return Err(ReportError::EmptyType);
        }
        if let Some(format) = &update.format {
            validate_format(format)?;
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
        if let Some(format) = update.format {
            record.format = Some(format.to_uppercase());
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(visibility) = update.visibility {
            record.visibility = visibility;
        }
        Ok(())
    }

    fn duplicate_as(&self, id: ReportId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            record: self.record.duplicate(now),
            ..self.clone()
        }
    }

    fn sort_registry() -> SortRegistry<Self> {
        SortRegistry::standard()
            .register("uploadedBy.name", |report: &Report| {
                SortValue::text(&report.uploaded_by.name)
            })
            .register("reportDate", |report: &Report| {
                SortValue::date_str(report.report_date.as_deref())
            })
            .register("fileSize", |report: &Report| {
                SortValue::Number(report.file_size as f64)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Uploader;

    #[test]
    fn create_normalizes_format() {
        let params = ReportCreate::new("Q1 yield", "Analysis", "pdf", Uploader::named("Bea"));
        let report = Report::from_create_params(ReportId(3), params, Utc::now()).unwrap();
        assert_eq!(report.record.format.as_deref(), Some("PDF"));
        assert_eq!(report.record.owner, "Bea");
    }

    #[test]
    fn create_rejects_unknown_format() {
        let params = ReportCreate::new("Q1 yield", "Analysis", "exe", Uploader::named("Bea"));
        let result = Report::from_create_params(ReportId(3), params, Utc::now());
        assert_eq!(
            result.unwrap_err(),
            ReportError::UnsupportedFormat("exe".into())
        );
    }

    #[test]
    fn registry_knows_uploader_name() {
        let registry = Report::sort_registry();
        assert!(registry.contains("uploadedBy.name"));
        assert!(registry.contains("createdAt"));
    }
}
