//! Display projection over the store: search, category filter, sort.
//!
//! Nothing here mutates its input. [`view`] borrows the records it keeps and
//! returns them in display order; ties in every sort mode keep store order.

use crate::model::{Item, StoredItem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::{fmt, str::FromStr};

/// Field access the query engine needs from a record.
pub trait Listing {
    fn name(&self) -> &str;
    fn quantity(&self) -> u32;
    fn category(&self) -> &str;
    fn expiry(&self) -> Option<NaiveDate>;
}

impl Listing for Item {
    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn expiry(&self) -> Option<NaiveDate> {
        Some(self.expiry)
    }
}

impl Listing for StoredItem {
    fn name(&self) -> &str {
        &self.item.name
    }

    fn quantity(&self) -> u32 {
        self.item.quantity
    }

    fn category(&self) -> &str {
        &self.item.category
    }

    fn expiry(&self) -> Option<NaiveDate> {
        Some(self.item.expiry)
    }
}

/// The five display orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    ExpirySoonest,
    ExpiryLatest,
    NameAsc,
    NameDesc,
    QuantityDesc,
}

impl SortMode {
    pub const ALL: [Self; 5] = [
        Self::ExpirySoonest,
        Self::ExpiryLatest,
        Self::NameAsc,
        Self::NameDesc,
        Self::QuantityDesc,
    ];

    /// Short identifier accepted on the command line and in config.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::ExpirySoonest => "expiry-soonest",
            Self::ExpiryLatest => "expiry-latest",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::QuantityDesc => "quantity-desc",
        }
    }

    /// Human label, as shown in a sort picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExpirySoonest => "Expiry (soonest)",
            Self::ExpiryLatest => "Expiry (latest)",
            Self::NameAsc => "Name A→Z",
            Self::NameDesc => "Name Z→A",
            Self::QuantityDesc => "Quantity descending",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when parsing a [`SortMode`] from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortModeError {
    pub got: String,
}

impl fmt::Display for ParseSortModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected: Vec<&str> = SortMode::ALL.iter().map(|m| m.slug()).collect();
        write!(
            f,
            "invalid sort mode: '{}' (expected one of {})",
            self.got,
            expected.join(", ")
        )
    }
}

impl std::error::Error for ParseSortModeError {}

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    /// Accepts either the slug (case-insensitive) or the exact label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.slug().eq_ignore_ascii_case(trimmed) || mode.label() == trimmed)
            .ok_or_else(|| ParseSortModeError { got: s.to_string() })
    }
}

/// Category selection; `All` disables the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Label of the catch-all option.
    pub const ALL_LABEL: &'static str = "All";

    /// `"All"` and blank text mean no filter; anything else filters on it.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == Self::ALL_LABEL {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => category.to_lowercase() == wanted.to_lowercase(),
        }
    }
}

/// Everything that shapes one display projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortMode,
}

/// Filter and sort `items` for display.
///
/// Search is a case-insensitive substring match on the name; an empty
/// search matches everything. Both filters apply before sorting.
#[must_use]
pub fn view<'a, T: Listing>(items: &'a [T], query: &ViewQuery) -> Vec<&'a T> {
    let needle = query.search.to_lowercase();
    let mut shown: Vec<&T> = items
        .iter()
        .filter(|item| needle.is_empty() || item.name().to_lowercase().contains(&needle))
        .filter(|item| query.category.matches(item.category()))
        .collect();
    sort(&mut shown, query.sort);
    shown
}

/// Stable in-place sort of a projection.
pub fn sort<T: Listing>(items: &mut [&T], mode: SortMode) {
    match mode {
        SortMode::ExpirySoonest => {
            items.sort_by(|a, b| compare_expiry(a.expiry(), b.expiry(), false));
        }
        SortMode::ExpiryLatest => {
            items.sort_by(|a, b| compare_expiry(a.expiry(), b.expiry(), true));
        }
        SortMode::NameAsc => items.sort_by_cached_key(|item| item.name().to_lowercase()),
        SortMode::NameDesc => items.sort_by(|a, b| {
            b.name()
                .to_lowercase()
                .cmp(&a.name().to_lowercase())
        }),
        SortMode::QuantityDesc => items.sort_by(|a, b| b.quantity().cmp(&a.quantity())),
    }
}

/// Records without an expiry go last in both directions.
fn compare_expiry(a: Option<NaiveDate>, b: Option<NaiveDate>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct non-empty categories, sorted, for the category picker.
#[must_use]
pub fn categories<T: Listing>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.category().trim())
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
