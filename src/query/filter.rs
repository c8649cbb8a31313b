//! Raw filter state as the list screens hold it.
//!
//! Dropdowns use the sentinel `"all"` for "no filter"; [`Selection`] and
//! [`StatusFilter`] turn that sentinel into a typed value at the boundary.

use crate::model::{ResourceStatus, UnknownStatus};
use crate::store::PartitionName;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel value meaning "do not filter on this field".
pub const ALL: &str = "all";

/// An equality filter over a free-form field (category, type, format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::from(value.into())
    }

    /// `All` accepts everything; `Only` requires an exact match.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL || value.is_empty() {
            Selection::All
        } else {
            Selection::Only(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Only(value) => value,
        }
    }
}

/// Status dropdown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ResourceStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: ResourceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL || s.is_empty() {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::All => ALL.to_string(),
            StatusFilter::Only(status) => status.label().to_string(),
        }
    }
}

/// Everything a list screen lets the user change that affects the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Visibility tab; selects the partition this state drives.
    pub tab: PartitionName,
    pub search: String,
    pub category: Selection,
    pub status: StatusFilter,
    pub page: usize,
    pub page_size: usize,
}

impl FilterState {
    pub fn new(tab: PartitionName, page_size: usize) -> Self {
        Self {
            tab,
            search: String::new(),
            category: Selection::All,
            status: StatusFilter::All,
            page: 1,
            page_size,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<Selection>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// True when anything other than the page number differs.
    pub fn filters_differ(&self, other: &FilterState) -> bool {
        self.search != other.search
            || self.category != other.category
            || self.status != other.status
            || self.page_size != other.page_size
    }

    /// Any filter or page-size change sends the user back to page 1.
    pub fn rebase(mut self, previous: Option<&FilterState>) -> Self {
        if matches!(previous, Some(prev) if self.filters_differ(prev)) {
            self.page = 1;
        }
        self
    }
}

/// A single-field edit of a partition's [`FilterState`].
///
/// List-screen callbacks send these instead of whole states so the engine
/// applies each edit to the latest state it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Search(String),
    Category(Selection),
    Status(StatusFilter),
    Page(usize),
    PageSize(usize),
}

impl FilterChange {
    pub fn apply(self, state: FilterState) -> FilterState {
        match self {
            FilterChange::Search(search) => state.with_search(search),
            FilterChange::Category(category) => state.with_category(category),
            FilterChange::Status(status) => state.with_status(status),
            FilterChange::Page(page) => state.with_page(page),
            FilterChange::PageSize(page_size) => state.with_page_size(page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_round_trips() {
        assert_eq!(Selection::from("all"), Selection::All);
        assert_eq!(String::from(Selection::All), "all");
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "In Review".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ResourceStatus::InReview))
        );
    }

    #[test]
    fn selection_matches_exactly() {
        let filter = Selection::only("PDF");
        assert!(filter.accepts(Some("PDF")));
        assert!(!filter.accepts(Some("pdf")));
        assert!(!filter.accepts(None));
        assert!(Selection::All.accepts(None));
    }

    #[test]
    fn rebase_resets_page_on_filter_change_only() {
        let previous = FilterState::new(PartitionName::Public, 10).with_page(3);

        let paged = previous.clone().with_page(4).rebase(Some(&previous));
        assert_eq!(paged.page, 4);

        let searched = previous.clone().with_search("pcr").rebase(Some(&previous));
        assert_eq!(searched.page, 1);

        let resized = previous.clone().with_page_size(25).rebase(Some(&previous));
        assert_eq!(resized.page, 1);
    }

    #[test]
    fn filter_change_edits_one_field() {
        let base = FilterState::new(PartitionName::Public, 10).with_search("pcr");
        let changed = FilterChange::Status(StatusFilter::Only(ResourceStatus::Published)).apply(base.clone());
        assert_eq!(changed.search, "pcr");
        assert_eq!(changed.status, StatusFilter::Only(ResourceStatus::Published));
        assert_eq!(FilterChange::Page(3).apply(base).page, 3);
    }

    #[test]
    fn deserializes_from_ui_json() {
        let json = r#"{"tab":"public","search":"","category":"all","status":"In Review","page":2,"pageSize":5}"#;
        let state: FilterState = serde_json::from_str(json).unwrap();
        assert_eq!(state.status, StatusFilter::Only(ResourceStatus::InReview));
        assert_eq!(state.category, Selection::All);
        assert_eq!(state.page_size, 5);
    }
}
