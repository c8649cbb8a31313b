//! Column sorting for client-paginated lists.
//!
//! Sort keys resolve through a [`SortRegistry`], an explicit key→extractor
//! table. Composite keys such as `uploadedBy.name` are registered like any
//! other key instead of being special-cased inside the comparator.

use crate::framework::CatalogEntity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Header-click rule: the same key flips asc↔desc, any other key
    /// starts ascending.
    pub fn toggle(previous: Option<&SortSpec>, key: &str) -> SortSpec {
        match previous {
            Some(prev) if prev.key == key && prev.direction == SortDirection::Asc => {
                SortSpec::desc(key)
            }
            _ => SortSpec::asc(key),
        }
    }
}

/// A comparable value pulled out of an entity for one sort key.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Instant(DateTime<Utc>),
    Number(f64),
    Missing,
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(SortValue::Missing, SortValue::text)
    }

    /// Parses a date-like string (RFC 3339 or `YYYY-MM-DD`) into an instant.
    /// Unparseable input sorts as missing.
    pub fn date_str(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim) else {
            return SortValue::Missing;
        };
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return SortValue::Instant(instant.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map_or(SortValue::Missing, |dt| SortValue::Instant(dt.and_utc()))
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Instant(_) => 2,
            SortValue::Text(_) => 3,
        }
    }

    /// Total order: missing values first, then by kind, then by value.
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Instant(a), SortValue::Instant(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

pub type Extractor<T> = fn(&T) -> SortValue;

/// Key→extractor table for one entity kind.
pub struct SortRegistry<T> {
    extractors: HashMap<String, Extractor<T>>,
}

impl<T> Clone for SortRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            extractors: self.extractors.clone(),
        }
    }
}

impl<T> Default for SortRegistry<T> {
    fn default() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }
}

impl<T> SortRegistry<T> {
    pub fn register(mut self, key: impl Into<String>, extractor: Extractor<T>) -> Self {
        self.extractors.insert(key.into(), extractor);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.extractors.contains_key(key)
    }

    /// Stable ascending sort by `spec.key`, reversed as a whole for
    /// descending so ties flip too. Unknown keys leave the order untouched.
    pub fn sort(&self, items: &mut [T], spec: &SortSpec) {
        let Some(extract) = self.extractors.get(&spec.key) else {
            debug!(key = %spec.key, "Unknown sort key");
            return;
        };
        items.sort_by(|a, b| extract(a).compare(&extract(b)));
        if spec.direction == SortDirection::Desc {
            items.reverse();
        }
    }
}

impl<T: CatalogEntity> SortRegistry<T> {
    /// Keys every resource kind supports. `created` is an alias of `createdAt`.
    pub fn standard() -> Self {
        SortRegistry::default()
            .register("title", |item: &T| SortValue::text(&item.record().title))
            .register("category", |item: &T| SortValue::text(&item.record().category))
            .register("type", |item: &T| SortValue::text(&item.record().category))
            .register("format", |item: &T| {
                SortValue::optional_text(item.record().format.as_deref())
            })
            .register("status", |item: &T| SortValue::text(item.record().status.label()))
            .register("owner", |item: &T| SortValue::text(&item.record().owner))
            .register("createdAt", |item: &T| SortValue::Instant(item.record().created_at))
            .register("created", |item: &T| SortValue::Instant(item.record().created_at))
            .register("updatedAt", |item: &T| SortValue::Instant(item.record().updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_same_key_and_resets_new_key() {
        let first = SortSpec::toggle(None, "title");
        assert_eq!(first, SortSpec::asc("title"));

        let second = SortSpec::toggle(Some(&first), "title");
        assert_eq!(second, SortSpec::desc("title"));

        let third = SortSpec::toggle(Some(&second), "title");
        assert_eq!(third, SortSpec::asc("title"));

        let other = SortSpec::toggle(Some(&second), "createdAt");
        assert_eq!(other, SortSpec::asc("createdAt"));
    }

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let plain = SortValue::date_str(Some("2024-03-01"));
        let full = SortValue::date_str(Some("2024-03-01T00:00:00Z"));
        assert_eq!(plain, full);
        assert_eq!(SortValue::date_str(Some("soon")), SortValue::Missing);
        assert_eq!(SortValue::date_str(None), SortValue::Missing);
    }

    #[test]
    fn missing_sorts_before_values() {
        let missing = SortValue::Missing;
        let text = SortValue::text("a");
        assert_eq!(missing.compare(&text), Ordering::Less);
        assert_eq!(
            SortValue::text("Beta").compare(&SortValue::text("alpha")),
            Ordering::Greater
        );
    }
}
