use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// One pantry entry in canonical form.
///
/// Two items are equal when all four fields are equal; there is no other
/// notion of identity at this level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
    pub category: String,
    pub expiry: NaiveDate,
}

impl Item {
    /// Column order of the persisted file.
    pub const COLUMNS: [&'static str; 4] = ["name", "quantity", "category", "expiry"];
}

/// Input for the add operation, before trimming and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub quantity: u32,
    pub category: String,
    pub expiry: NaiveDate,
}

impl NewItem {
    /// Trim text fields into a canonical [`Item`].
    ///
    /// Returns `None` when the trimmed name is empty.
    #[must_use]
    pub fn into_item(self) -> Option<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Item {
            name: name.to_string(),
            quantity: self.quantity,
            category: self.category.trim().to_string(),
            expiry: self.expiry,
        })
    }
}

/// Session-scoped identifier for a record held by the store.
///
/// Ids are handed out in load order starting at 1 and are never reused
/// within one store. They are not written to the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    /// Accepts `7` and `#7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits.parse::<u64>().map(Self)
    }
}

/// An [`Item`] together with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredItem {
    pub id: ItemId,
    #[serde(flatten)]
    pub item: Item,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_item_trims_fields() {
        let item = NewItem {
            name: "  Olive Oil ".into(),
            quantity: 2,
            category: " Oils\t".into(),
            expiry: date(2025, 3, 1),
        }
        .into_item()
        .unwrap();
        assert_eq!(item.name, "Olive Oil");
        assert_eq!(item.category, "Oils");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn new_item_rejects_blank_name() {
        let draft = NewItem {
            name: "   ".into(),
            quantity: 1,
            category: String::new(),
            expiry: date(2025, 3, 1),
        };
        assert!(draft.into_item().is_none());
    }

    #[test]
    fn item_id_parses_with_and_without_hash() {
        assert_eq!("7".parse::<ItemId>().unwrap(), ItemId::new(7));
        assert_eq!("#12".parse::<ItemId>().unwrap(), ItemId::new(12));
        assert_eq!(" 3 ".parse::<ItemId>().unwrap(), ItemId::new(3));
        assert!("abc".parse::<ItemId>().is_err());
        assert!("-1".parse::<ItemId>().is_err());
    }

    #[test]
    fn stored_item_serializes_flat() {
        let stored = StoredItem {
            id: ItemId::new(4),
            item: Item {
                name: "Rice".into(),
                quantity: 3,
                category: "Grains".into(),
                expiry: date(2026, 1, 31),
            },
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["name"], "Rice");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["category"], "Grains");
        assert_eq!(json["expiry"], "2026-01-31");
    }
}
