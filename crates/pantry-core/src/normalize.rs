//! Coercion of loosely-typed records into canonical [`Item`]s.
//!
//! Records arrive from the data file as text cells and from callers as
//! whatever they happen to hold. Every field has a safe fallback: a blank or
//! unusable quantity becomes `0`, and an expiry that cannot be read as a date
//! becomes today's date. Nothing in this module returns an error.

use crate::model::Item;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A single untyped field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

static MISSING: RawValue = RawValue::Missing;

impl RawValue {
    /// Render the value as display text.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                format!("{value:.1}")
            }
            Self::Float(value) => value.to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// A loosely-typed record keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    fields: BTreeMap<String, RawValue>,
}

impl RawItem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Field value, or [`RawValue::Missing`] when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &RawValue {
        self.fields.get(key).unwrap_or(&MISSING)
    }
}

impl From<&Item> for RawItem {
    fn from(item: &Item) -> Self {
        Self::new()
            .with("name", item.name.as_str())
            .with("quantity", i64::from(item.quantity))
            .with("category", item.category.as_str())
            .with("expiry", item.expiry)
    }
}

/// Normalize records using the local calendar date as the expiry fallback.
#[must_use]
pub fn normalize(raw_items: &[RawItem]) -> Vec<Item> {
    normalize_at(raw_items, Local::now().date_naive())
}

/// Normalize records with an explicit fallback date. Output order matches
/// input order.
#[must_use]
pub fn normalize_at(raw_items: &[RawItem], today: NaiveDate) -> Vec<Item> {
    raw_items
        .iter()
        .map(|raw| normalize_one(raw, today))
        .collect()
}

/// Normalize a single record.
#[must_use]
pub fn normalize_one(raw: &RawItem, today: NaiveDate) -> Item {
    Item {
        name: raw.get("name").stringify().trim().to_string(),
        quantity: coerce_quantity(raw.get("quantity")),
        category: raw.get("category").stringify().trim().to_string(),
        expiry: coerce_expiry(raw.get("expiry"), today),
    }
}

/// Read a quantity, falling back to `0` for anything that is not a
/// non-negative whole number.
#[must_use]
pub fn coerce_quantity(value: &RawValue) -> u32 {
    let parsed = match value {
        RawValue::Missing => return 0,
        RawValue::Text(text) if text.trim().is_empty() => return 0,
        RawValue::Text(text) => {
            let text = text.trim();
            text.parse::<u32>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_u32))
        }
        RawValue::Integer(value) => u32::try_from(*value).ok(),
        RawValue::Float(value) => whole_u32(*value),
        RawValue::Date(_) | RawValue::DateTime(_) => None,
    };

    parsed.unwrap_or_else(|| {
        warn!(value = ?value, "unusable quantity, defaulting to 0");
        0
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u32(value: f64) -> Option<u32> {
    if value.is_finite() && value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

/// Read an expiry date. Never fails: anything unreadable becomes `today`.
#[must_use]
pub fn coerce_expiry(value: &RawValue, today: NaiveDate) -> NaiveDate {
    match value {
        RawValue::Date(date) => *date,
        RawValue::DateTime(dt) => dt.date(),
        RawValue::Text(text) => parse_iso_date(text)
            .or_else(|| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
            .unwrap_or_else(|| {
                if !text.trim().is_empty() {
                    warn!(value = %text, %today, "unparseable expiry, using today");
                }
                today
            }),
        RawValue::Missing => {
            debug!(%today, "missing expiry, using today");
            today
        }
        RawValue::Integer(_) | RawValue::Float(_) => {
            warn!(value = ?value, %today, "non-date expiry, using today");
            today
        }
    }
}

/// Parse ISO-8601 text as a calendar date, truncating any time component.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.f]]` with `T` or a space as
/// the separator, and RFC 3339 timestamps with an offset.
#[must_use]
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}
