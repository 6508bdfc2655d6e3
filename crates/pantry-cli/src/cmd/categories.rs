//! `pantry categories`: the category filter options.

use crate::cmd::Context;
use crate::output::render;
use pantry_core::query::{self, CategoryFilter};
use pantry_core::StoredItem;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CategoriesOutput {
    categories: Vec<String>,
}

/// `"All"` followed by every distinct non-empty category, sorted.
fn filter_options(entries: &[StoredItem]) -> Vec<String> {
    std::iter::once(CategoryFilter::ALL_LABEL.to_string())
        .chain(query::categories(entries))
        .collect()
}

pub fn run_categories(ctx: &Context<'_>) -> anyhow::Result<()> {
    let (store, _) = ctx.open_store()?;
    let payload = CategoriesOutput {
        categories: filter_options(store.entries()),
    };
    render(ctx.output, &payload, |p, w| {
        for category in &p.categories {
            writeln!(w, "{category}")?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pantry_core::{Item, ItemId};

    fn stored(id: u64, category: &str) -> StoredItem {
        StoredItem {
            id: ItemId::new(id),
            item: Item {
                name: format!("item {id}"),
                quantity: 1,
                category: category.into(),
                expiry: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            },
        }
    }

    #[test]
    fn all_comes_first_then_sorted_distinct() {
        let entries = vec![
            stored(1, "Spices"),
            stored(2, ""),
            stored(3, "Dairy"),
            stored(4, "Spices"),
        ];
        assert_eq!(filter_options(&entries), vec!["All", "Dairy", "Spices"]);
    }

    #[test]
    fn empty_store_has_only_all() {
        assert_eq!(filter_options(&[]), vec!["All"]);
    }
}
