//! `pantry list`: filtered, sorted view of the pantry.

use crate::cmd::Context;
use crate::output::{Renderable, pretty_rule, render_list};
use crate::validate;
use clap::Args;
use pantry_core::query::{self, CategoryFilter, SortMode, ViewQuery};
use pantry_core::StoredItem;
use std::io::{self, Write};

/// Shown when the store holds items but the filters hide all of them.
pub const NOTHING_TO_SHOW: &str = "No items to show (or filters removed all items).";

/// Shown when the store is empty.
pub const NOTHING_STORED: &str = "No stored pantry items yet.";

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive substring to look for in item names.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only show this category ("All" shows everything).
    #[arg(short, long, default_value = CategoryFilter::ALL_LABEL)]
    pub category: String,

    /// Sort order. Defaults to the project's configured order.
    #[arg(long, value_parser = validate::parse_sort)]
    pub sort: Option<SortMode>,
}

impl ListArgs {
    fn query(&self, default_sort: SortMode) -> ViewQuery {
        ViewQuery {
            search: self.search.clone(),
            category: CategoryFilter::parse(&self.category),
            sort: self.sort.unwrap_or(default_sort),
        }
    }
}

/// One listed row.
struct ItemRow<'a>(&'a StoredItem);

impl Renderable for ItemRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let s = self.0;
        writeln!(
            w,
            "{:>4}  {:<28}  {:>5}  {:<14}  {}",
            format!("#{}", s.id),
            truncate(&s.item.name, 28),
            s.item.quantity,
            truncate(&s.item.category, 14),
            s.item.expiry
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self.0).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let s = self.0;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            s.id,
            one_line(&s.item.name),
            s.item.quantity,
            one_line(&s.item.category),
            s.item.expiry
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "NAME", "QUANTITY", "CATEGORY", "EXPIRY"]
    }

    fn human_header(w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:>4}  {:<28}  {:>5}  {:<14}  EXPIRY",
            "ID", "NAME", "QTY", "CATEGORY"
        )?;
        pretty_rule(w)
    }
}

fn truncate(text: &str, width: usize) -> String {
    let flat = one_line(text);
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn one_line(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ")
}

pub fn run_list(args: &ListArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let (store, cfg) = ctx.open_store()?;
    let view_query = args.query(cfg.list.default_sort);
    let shown = query::view(store.entries(), &view_query);
    tracing::debug!(
        total = store.len(),
        shown = shown.len(),
        sort = %view_query.sort,
        "listing items"
    );

    let rows: Vec<ItemRow<'_>> = shown.into_iter().map(ItemRow).collect();
    render_list(&rows, ctx.output)?;

    if rows.is_empty() && !ctx.output.is_json() && !ctx.quiet {
        let notice = if store.is_empty() {
            NOTHING_STORED
        } else {
            NOTHING_TO_SHOW
        };
        println!("{notice}");
    }
    Ok(())
}
