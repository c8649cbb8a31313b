//! Canonical request/response shapes exchanged with a resource provider.

use super::QuerySpec;
use crate::model::ResourceStatus;
use serde::{Deserialize, Serialize};

/// Query parameters of `getMany`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuery {
    pub page: usize,
    pub limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResourceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_in_review: Option<bool>,
}

impl From<&QuerySpec> for ProviderQuery {
    fn from(spec: &QuerySpec) -> Self {
        Self {
            page: spec.page,
            limit: spec.limit,
            search: spec.search.clone(),
            category: spec.category.clone(),
            status: spec.status,
            is_public: spec.visibility.map(|v| v.is_public()),
            exclude_in_review: spec.exclude_in_review.then_some(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: usize,
    pub total_pages: usize,
}

/// Response of `getMany`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPage<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> ProviderPage<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            pagination: PageMeta::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_query, FilterState};
    use crate::store::PartitionName;

    #[test]
    fn public_query_serializes_to_canonical_shape() {
        let spec = build_query(&FilterState::new(PartitionName::Public, 10).with_search("pcr"));
        let json = serde_json::to_value(ProviderQuery::from(&spec)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 1,
                "limit": 10,
                "search": "pcr",
                "isPublic": true,
                "excludeInReview": true
            })
        );
    }

    #[test]
    fn false_exclusion_is_omitted() {
        let spec = build_query(&FilterState::new(PartitionName::Mine, 5));
        let query = ProviderQuery::from(&spec);
        assert_eq!(query.exclude_in_review, None);
        assert_eq!(query.is_public, Some(false));
    }

    #[test]
    fn page_meta_uses_camel_case() {
        let meta: PageMeta = serde_json::from_str(r#"{"total":12,"totalPages":3}"#).unwrap();
        assert_eq!(meta.total_pages, 3);
    }
}
