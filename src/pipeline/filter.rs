//! Record predicate shared by the local pipeline and the in-memory backing
//! service, so both sides agree on what "matches" means.

use crate::model::{ResourceRecord, ResourceStatus, Visibility};
use crate::query::{ProviderQuery, Selection, StatusFilter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    /// Lowercased needle; `None` matches everything.
    search: Option<String>,
    pub category: Selection,
    pub format: Selection,
    pub status: StatusFilter,
    pub visibility: Option<Visibility>,
    pub exclude_in_review: bool,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: &str) -> Self {
        let needle = search.to_lowercase();
        self.search = (!needle.is_empty()).then_some(needle);
        self
    }

    pub fn with_category(mut self, category: Selection) -> Self {
        self.category = category;
        self
    }

    pub fn with_format(mut self, format: Selection) -> Self {
        self.format = format;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_visibility(mut self, visibility: Option<Visibility>) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn excluding_in_review(mut self, exclude: bool) -> Self {
        self.exclude_in_review = exclude;
        self
    }

    /// Case-insensitive substring match on title or description.
    /// A missing description counts as an empty string.
    pub fn matches_search(&self, record: &ResourceRecord) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        record.title.to_lowercase().contains(needle)
            || record
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(needle)
    }

    pub fn matches(&self, record: &ResourceRecord) -> bool {
        self.matches_search(record)
            && self.category.accepts(Some(&record.category))
            && self.format.accepts(record.format.as_deref())
            && self.status.accepts(record.status)
            && !(self.exclude_in_review && record.status == ResourceStatus::InReview)
            && self.visibility.map_or(true, |v| v == record.visibility)
    }
}

impl From<&ProviderQuery> for Predicate {
    fn from(query: &ProviderQuery) -> Self {
        let category = query
            .category
            .clone()
            .map_or(Selection::All, Selection::from);
        let status = query.status.map_or(StatusFilter::All, StatusFilter::Only);
        Predicate::new()
            .with_search(query.search.as_deref().unwrap_or_default())
            .with_category(category)
            .with_status(status)
            .with_visibility(query.is_public.map(Visibility::from_public_flag))
            .excluding_in_review(query.exclude_in_review.unwrap_or(false))
    }
}
