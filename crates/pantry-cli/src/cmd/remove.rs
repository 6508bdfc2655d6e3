//! `pantry remove`: delete selected items.
//!
//! Items are selected either by the ids shown in `pantry list`, or with
//! `--match` by their full value. A value match removes every duplicate.

use crate::cmd::{Context, fail};
use crate::output::{render, render_warning};
use crate::validate;
use chrono::NaiveDate;
use clap::Args;
use pantry_core::store::{RemoveOutcome, Store, StoreError};
use pantry_core::{Item, ItemId};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Ids of the items to remove, as shown by `pantry list`.
    #[arg(value_name = "ID", value_parser = validate::parse_item_id)]
    pub ids: Vec<ItemId>,

    /// Remove every item equal to the given values instead of by id.
    #[arg(
        long = "match",
        id = "match",
        conflicts_with = "ids",
        requires_all = ["name", "expiry"]
    )]
    pub by_value: bool,

    /// Name to match.
    #[arg(long, requires = "match")]
    pub name: Option<String>,

    /// Quantity to match [default: 1].
    #[arg(long, requires = "match")]
    pub quantity: Option<u32>,

    /// Category to match [default: none].
    #[arg(long, requires = "match")]
    pub category: Option<String>,

    /// Expiry date to match, as YYYY-MM-DD.
    #[arg(long, value_parser = validate::parse_expiry, requires = "match")]
    pub expiry: Option<NaiveDate>,
}

impl RemoveArgs {
    /// The value selection, if `--match` was given.
    fn target(&self) -> Option<Item> {
        if !self.by_value {
            return None;
        }
        Some(Item {
            name: self.name.as_deref()?.trim().to_string(),
            quantity: self.quantity.unwrap_or(1),
            category: self.category.as_deref().unwrap_or_default().trim().to_string(),
            expiry: self.expiry?,
        })
    }

    fn apply(&self, store: &mut Store) -> Result<RemoveOutcome, StoreError> {
        match self.target() {
            Some(target) => store.remove_matching(&[target]),
            None => store.remove_ids(&self.ids),
        }
    }
}

#[derive(Debug, Serialize)]
struct RemoveOutput {
    ok: bool,
    removed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unknown: Vec<ItemId>,
    message: String,
}

/// User-facing summary of a removal.
pub fn removed_message(count: usize) -> String {
    format!("Removed {count} item(s).")
}

pub fn run_remove(args: &RemoveArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let (mut store, _) = ctx.open_store()?;

    match args.apply(&mut store).map_err(|e| fail(ctx.output, &e))? {
        RemoveOutcome::Rejected(warning) => render_warning(ctx.output, warning),
        RemoveOutcome::Removed { count, unknown } => {
            for id in &unknown {
                tracing::warn!(%id, "no item with this id");
            }
            let payload = RemoveOutput {
                ok: true,
                removed: count,
                unknown,
                message: removed_message(count),
            };
            if ctx.quiet && !ctx.output.is_json() {
                return Ok(());
            }
            render(ctx.output, &payload, |p, w| {
                writeln!(w, "✓ {}", p.message)?;
                if !p.unknown.is_empty() {
                    let ids: Vec<String> = p.unknown.iter().map(|id| format!("#{id}")).collect();
                    writeln!(w, "  not found: {}", ids.join(", "))?;
                }
                Ok(())
            })
        }
    }
}
