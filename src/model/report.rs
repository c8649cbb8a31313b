/// Represents an uploaded laboratory report.
///
/// Reports carry a file format and the uploader's identity, both of which
/// the report screens filter and sort on.
use super::{ResourceRecord, ResourceStatus, Visibility};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub u32);

impl From<u32> for ReportId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "report_{}", self.0)
    }
}

/// The person who uploaded a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uploader {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Uploader {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    #[serde(flatten)]
    pub record: ResourceRecord,
    pub uploaded_by: Uploader,
    /// Size of the attached file in bytes.
    pub file_size: u64,
    /// Date printed on the report itself, as entered on upload (free-form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
}

/// Payload for creating a new report.
#[derive(Debug, Clone)]
pub struct ReportCreate {
    pub title: String,
    pub description: Option<String>,
    /// Report type (e.g. "Analysis", "Incident").
    pub category: String,
    pub format: String,
    pub uploaded_by: Uploader,
    pub visibility: Visibility,
    pub file_size: u64,
    pub report_date: Option<String>,
}

impl ReportCreate {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        format: impl Into<String>,
        uploaded_by: Uploader,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: category.into(),
            format: format.into(),
            uploaded_by,
            visibility: Visibility::Private,
            file_size: 0,
            report_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_report_date(mut self, date: impl Into<String>) -> Self {
        self.report_date = Some(date.into());
        self
    }
}

/// Payload for updating an existing report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub format: Option<String>,
    pub status: Option<ResourceStatus>,
    pub visibility: Option<Visibility>,
}
