//! Canonical query derived from [`FilterState`].
//!
//! [`build_query`] is pure: equal filter states always produce equal specs,
//! which is what lets the fetch orchestrator detect "nothing changed".

use super::{FilterState, StatusFilter};
use crate::model::{ResourceStatus, Visibility};
use crate::store::PartitionName;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<ResourceStatus>,
    pub visibility: Option<Visibility>,
    pub page: usize,
    pub limit: usize,
    /// Hide "In Review" items even though no status was selected.
    pub exclude_in_review: bool,
}

impl QuerySpec {
    /// Unfiltered first page of `limit` items, used for bounded windows.
    pub fn window(limit: usize) -> Self {
        Self {
            search: None,
            category: None,
            status: None,
            visibility: None,
            page: 1,
            limit: limit.max(1),
            exclude_in_review: false,
        }
    }
}

fn visibility_for(tab: PartitionName) -> Option<Visibility> {
    match tab {
        PartitionName::Public => Some(Visibility::Public),
        PartitionName::Mine => Some(Visibility::Private),
        PartitionName::Recent => None,
    }
}

/// Normalizes raw UI state into a [`QuerySpec`].
///
/// The only business rule: on the public tab with no status selected,
/// "In Review" items are suppressed. Picking any explicit status lifts it.
pub fn build_query(state: &FilterState) -> QuerySpec {
    let search = state.search.trim();
    let status = match state.status {
        StatusFilter::All => None,
        StatusFilter::Only(status) => Some(status),
    };

    QuerySpec {
        search: (!search.is_empty()).then(|| search.to_string()),
        category: state.category.as_option().map(str::to_string),
        status,
        visibility: visibility_for(state.tab),
        page: state.page.max(1),
        limit: state.page_size.max(1),
        exclude_in_review: status.is_none() && state.tab == PartitionName::Public,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Selection;

    #[test]
    fn public_tab_with_all_status_excludes_in_review() {
        let spec = build_query(&FilterState::new(PartitionName::Public, 10));
        assert!(spec.exclude_in_review);
        assert_eq!(spec.visibility, Some(Visibility::Public));
        assert_eq!(spec.status, None);
    }

    #[test]
    fn explicit_status_lifts_suppression() {
        let state = FilterState::new(PartitionName::Public, 10)
            .with_status(StatusFilter::Only(ResourceStatus::InReview));
        let spec = build_query(&state);
        assert!(!spec.exclude_in_review);
        assert_eq!(spec.status, Some(ResourceStatus::InReview));
    }

    #[test]
    fn mine_tab_never_excludes() {
        let spec = build_query(&FilterState::new(PartitionName::Mine, 10));
        assert!(!spec.exclude_in_review);
        assert_eq!(spec.visibility, Some(Visibility::Private));
    }

    #[test]
    fn normalizes_search_and_bounds() {
        let state = FilterState::new(PartitionName::Mine, 0)
            .with_search("   ")
            .with_category(Selection::only("Molecular"))
            .with_page(0);
        let spec = build_query(&state);
        assert_eq!(spec.search, None);
        assert_eq!(spec.category.as_deref(), Some("Molecular"));
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 1);
    }

    #[test]
    fn equal_states_build_equal_specs() {
        let a = FilterState::new(PartitionName::Public, 10).with_search(" pcr ");
        let b = FilterState::new(PartitionName::Public, 10).with_search("pcr");
        assert_eq!(build_query(&a), build_query(&b));
    }
}
