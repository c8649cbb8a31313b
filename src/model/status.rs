use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Workflow status of a catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    Draft,
    #[serde(rename = "In Review")]
    InReview,
    Approved,
    Published,
    Archived,
}

impl ResourceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceStatus::Draft => "Draft",
            ResourceStatus::InReview => "In Review",
            ResourceStatus::Approved => "Approved",
            ResourceStatus::Published => "Published",
            ResourceStatus::Archived => "Archived",
        }
    }
}

impl Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a status label does not name a known status.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ResourceStatus {
    type Err = UnknownStatus;

    /// Accepts display labels ("In Review") as well as compact forms
    /// ("in_review", "inreview"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match compact.as_str() {
            "draft" => Ok(ResourceStatus::Draft),
            "inreview" => Ok(ResourceStatus::InReview),
            "approved" => Ok(ResourceStatus::Approved),
            "published" => Ok(ResourceStatus::Published),
            "archived" => Ok(ResourceStatus::Archived),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Who can see a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }

    pub fn from_public_flag(is_public: bool) -> Self {
        if is_public {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_compact_forms() {
        assert_eq!("In Review".parse(), Ok(ResourceStatus::InReview));
        assert_eq!("in_review".parse(), Ok(ResourceStatus::InReview));
        assert_eq!("ARCHIVED".parse(), Ok(ResourceStatus::Archived));
        assert!("retired".parse::<ResourceStatus>().is_err());
    }

    #[test]
    fn serializes_in_review_with_space() {
        let json = serde_json::to_string(&ResourceStatus::InReview).unwrap();
        assert_eq!(json, "\"In Review\"");
    }
}
