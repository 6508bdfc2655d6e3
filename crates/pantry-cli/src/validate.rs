use chrono::NaiveDate;
use pantry_core::{ItemId, SortMode};
use std::fmt;

/// A rejected argument value, shown by clap after `invalid value '…' for …:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub reason: String,
    pub suggestion: &'static str,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>, suggestion: &'static str) -> Self {
        Self {
            reason: reason.into(),
            suggestion,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.suggestion)
    }
}

const ID_SUGGESTION: &str = "use an id from `pantry list`, like 3 or #3";

pub fn validate_expiry(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new(
            "must be a calendar date in YYYY-MM-DD form",
            "use a date like 2025-01-31",
        )
    })
}

pub fn validate_item_id(s: &str) -> Result<ItemId, ValidationError> {
    let id: ItemId = s
        .parse()
        .map_err(|_| ValidationError::new("must be a positive number", ID_SUGGESTION))?;
    if id.get() == 0 {
        return Err(ValidationError::new("ids start at 1", ID_SUGGESTION));
    }
    Ok(id)
}

pub fn validate_sort(s: &str) -> Result<SortMode, ValidationError> {
    s.parse::<SortMode>().map_err(|e| {
        ValidationError::new(
            e.to_string(),
            "use one of: expiry-soonest, expiry-latest, name-asc, name-desc, quantity-desc",
        )
    })
}

// clap value parsers

pub fn parse_expiry(s: &str) -> Result<NaiveDate, String> {
    validate_expiry(s).map_err(|e| e.to_string())
}

pub fn parse_item_id(s: &str) -> Result<ItemId, String> {
    validate_item_id(s).map_err(|e| e.to_string())
}

pub fn parse_sort(s: &str) -> Result<SortMode, String> {
    validate_sort(s).map_err(|e| e.to_string())
}
