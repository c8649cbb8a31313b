//! Client-side list state for screens that fetch one bounded window and
//! filter, sort and paginate it in memory.

use super::{PageSlice, Predicate, SortRegistry, SortSpec};
use crate::framework::CatalogEntity;
use crate::query::{Selection, StatusFilter};

/// Filter/sort/page parameters of the local pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalQuery {
    pub search: String,
    pub category: Selection,
    pub format: Selection,
    pub status: StatusFilter,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: usize,
}

impl LocalQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            category: Selection::All,
            format: Selection::All,
            status: StatusFilter::All,
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn predicate(&self) -> Predicate {
        Predicate::new()
            .with_search(&self.search)
            .with_category(self.category.clone())
            .with_format(self.format.clone())
            .with_status(self.status)
    }

    /// Search → equality filters → sort → paginate.
    pub fn run<T: CatalogEntity>(&self, items: &[T], registry: &SortRegistry<T>) -> PageSlice<T> {
        let predicate = self.predicate();
        let mut filtered: Vec<T> = items
            .iter()
            .filter(|item| predicate.matches(item.record()))
            .cloned()
            .collect();
        if let Some(spec) = &self.sort {
            registry.sort(&mut filtered, spec);
        }
        PageSlice::from_filtered(&filtered, self.page, self.page_size)
    }
}

/// Holds one screen's local list state and applies the header-click and
/// page-reset rules.
///
/// Any filter or page-size change returns to page 1. Explicitly requesting
/// a page past the end renders an empty page.
pub struct LocalView<T: CatalogEntity> {
    query: LocalQuery,
    /// Sort the header arrows start from before the user clicks anything.
    /// It is not applied to the rendered list.
    default_sort: Option<SortSpec>,
    registry: SortRegistry<T>,
}

impl<T: CatalogEntity> LocalView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: LocalQuery::new(page_size),
            default_sort: None,
            registry: T::sort_registry(),
        }
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn query(&self) -> &LocalQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    pub fn set_category(&mut self, category: impl Into<Selection>) {
        self.query.category = category.into();
        self.query.page = 1;
    }

    pub fn set_format(&mut self, format: impl Into<Selection>) {
        self.query.format = format.into();
        self.query.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
        self.query.page = 1;
    }

    /// Column header click.
    pub fn click_sort(&mut self, key: &str) -> &SortSpec {
        let previous = self.query.sort.as_ref().or(self.default_sort.as_ref());
        let next = SortSpec::toggle(previous, key);
        self.query.sort.insert(next)
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size;
        self.query.page = 1;
    }

    pub fn render(&self, items: &[T]) -> PageSlice<T> {
        self.query.run(items, &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Report, ReportId, ResourceRecord, Uploader};
    use chrono::NaiveDate;

    fn report(id: u32, title: &str, created: &str, format: &str) -> Report {
        let created_at = NaiveDate::parse_from_str(created, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let mut record = ResourceRecord::new(title, "Analysis", "bea", created_at);
        record.format = Some(format.to_string());
        Report {
            id: ReportId(id),
            record,
            uploaded_by: Uploader::named(format!("uploader {}", 100 - id)),
            file_size: 0,
            report_date: None,
        }
    }

    fn created_dates(page: &PageSlice<Report>) -> Vec<String> {
        page.items
            .iter()
            .map(|r| r.record.created_at.format("%Y-%m-%d").to_string())
            .collect()
    }

    #[test]
    fn created_at_header_clicks_from_default_state() {
        let items = vec![
            report(1, "a", "2024-01-01", "PDF"),
            report(2, "b", "2024-03-01", "PDF"),
            report(3, "c", "2024-02-01", "PDF"),
        ];
        let mut view = LocalView::<Report>::new(10).with_default_sort(SortSpec::asc("createdAt"));
        assert_eq!(
            created_dates(&view.render(&items)),
            vec!["2024-01-01", "2024-03-01", "2024-02-01"]
        );

        view.click_sort("createdAt");
        assert_eq!(
            created_dates(&view.render(&items)),
            vec!["2024-03-01", "2024-02-01", "2024-01-01"]
        );

        view.click_sort("createdAt");
        assert_eq!(
            created_dates(&view.render(&items)),
            vec!["2024-01-01", "2024-02-01", "2024-03-01"]
        );
    }

    #[test]
    fn same_column_twice_reverses_order() {
        let items = vec![
            report(1, "gamma", "2024-01-01", "PDF"),
            report(2, "alpha", "2024-01-02", "PDF"),
            report(3, "beta", "2024-01-03", "PDF"),
        ];
        let mut view = LocalView::<Report>::new(10);
        view.click_sort("title");
        let first: Vec<_> = view.render(&items).items.into_iter().map(|r| r.id).collect();
        view.click_sort("title");
        let mut second: Vec<_> = view.render(&items).items.into_iter().map(|r| r.id).collect();
        second.reverse();
        assert_eq!(first, second);
        assert_eq!(first, vec![ReportId(2), ReportId(3), ReportId(1)]);
    }

    #[test]
    fn same_column_twice_reverses_tied_rows_too() {
        let items: Vec<Report> = [(1, "Analysis"), (2, "Analysis"), (3, "Incident")]
            .into_iter()
            .map(|(id, category)| {
                let mut item = report(id, "same", "2024-01-01", "PDF");
                item.record.category = category.to_string();
                item
            })
            .collect();
        let mut view = LocalView::<Report>::new(10);
        view.click_sort("category");
        let first: Vec<_> = view.render(&items).items.into_iter().map(|r| r.id).collect();
        assert_eq!(first, vec![ReportId(1), ReportId(2), ReportId(3)]);

        view.click_sort("category");
        let second: Vec<_> = view.render(&items).items.into_iter().map(|r| r.id).collect();
        assert_eq!(second, vec![ReportId(3), ReportId(2), ReportId(1)]);
    }

    #[test]
    fn composite_uploader_key_sorts_by_name() {
        let items = vec![report(1, "a", "2024-01-01", "PDF"), report(4, "b", "2024-01-01", "PDF")];
        let mut view = LocalView::<Report>::new(10);
        view.click_sort("uploadedBy.name");
        let ids: Vec<_> = view.render(&items).items.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![ReportId(4), ReportId(1)]);
    }

    #[test]
    fn filter_change_returns_to_first_page_but_explicit_page_is_not_clamped() {
        let items: Vec<Report> = (1..=12)
            .map(|i| report(i, &format!("report {i}"), "2024-01-01", if i % 2 == 0 { "PDF" } else { "CSV" }))
            .collect();
        let mut view = LocalView::<Report>::new(10);
        view.set_page_size(5);
        let page = view.render(&items);
        assert_eq!(page.total_pages, 3);

        view.set_page(4);
        let beyond = view.render(&items);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 12);

        view.set_page(3);
        view.set_format("PDF");
        assert_eq!(view.query().page, 1);
        let filtered = view.render(&items);
        assert_eq!(filtered.total, 6);
        assert!(filtered.items.iter().all(|r| r.record.format.as_deref() == Some("PDF")));
    }

    #[test]
    fn missing_description_never_breaks_search() {
        let items = vec![report(1, "Yield", "2024-01-01", "PDF")];
        let mut view = LocalView::<Report>::new(10);
        view.set_search("nothing here");
        assert!(view.render(&items).items.is_empty());
        view.set_search("yie");
        assert_eq!(view.render(&items).items.len(), 1);
    }
}
