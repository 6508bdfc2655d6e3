//! `pantry add`: append one item to the pantry.

use crate::cmd::{Context, fail};
use crate::output::{render, render_warning};
use crate::validate;
use chrono::{Local, NaiveDate};
use clap::Args;
use pantry_core::NewItem;
use pantry_core::store::AddOutcome;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Item name (surrounding whitespace is trimmed).
    pub name: String,

    /// How many units are on hand.
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,

    /// Free-form category, e.g. "Dairy".
    #[arg(short, long, default_value = "")]
    pub category: String,

    /// Expiry date as YYYY-MM-DD. Defaults to today.
    #[arg(short, long, value_parser = validate::parse_expiry)]
    pub expiry: Option<NaiveDate>,
}

impl AddArgs {
    fn to_new_item(&self, today: NaiveDate) -> NewItem {
        NewItem {
            name: self.name.clone(),
            quantity: self.quantity,
            category: self.category.clone(),
            expiry: self.expiry.unwrap_or(today),
        }
    }
}

pub fn run_add(args: &AddArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let (mut store, _) = ctx.open_store()?;
    let draft = args.to_new_item(Local::now().date_naive());

    match store.add(draft).map_err(|e| fail(ctx.output, &e))? {
        AddOutcome::Added(stored) => {
            if ctx.quiet && !ctx.output.is_json() {
                return Ok(());
            }
            render(ctx.output, &stored, |s, w| {
                writeln!(
                    w,
                    "✓ Added #{} {} (qty {}, expires {})",
                    s.id, s.item.name, s.item.quantity, s.item.expiry
                )
            })
        }
        AddOutcome::Rejected(warning) => render_warning(ctx.output, warning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testutil::ctx;
    use clap::Parser;
    use pantry_core::store::{DEFAULT_DATA_FILE, load};

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AddArgs,
    }

    #[test]
    fn add_args_defaults() {
        let w = Wrapper::parse_from(["test", "Milk"]);
        assert_eq!(w.args.name, "Milk");
        assert_eq!(w.args.quantity, 1);
        assert_eq!(w.args.category, "");
        assert!(w.args.expiry.is_none());
    }

    #[test]
    fn add_args_full() {
        let w = Wrapper::parse_from([
            "test", "Rice", "-n", "3", "--category", "Grains", "--expiry", "2026-06-30",
        ]);
        assert_eq!(w.args.quantity, 3);
        assert_eq!(w.args.category, "Grains");
        assert_eq!(w.args.expiry, NaiveDate::from_ymd_opt(2026, 6, 30));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(Wrapper::try_parse_from(["test", "Milk", "--quantity", "0"]).is_err());
    }

    #[test]
    fn bad_expiry_is_rejected() {
        assert!(Wrapper::try_parse_from(["test", "Milk", "--expiry", "tomorrow"]).is_err());
    }

    #[test]
    fn missing_expiry_defaults_to_today() {
        let w = Wrapper::parse_from(["test", "Milk"]);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(w.args.to_new_item(today).expiry, today);
    }

    #[test]
    fn run_add_writes_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let w = Wrapper::parse_from(["test", " Olive Oil ", "--category", "Oils"]);
        run_add(&w.args, &ctx(dir.path())).unwrap();

        let items = load(&dir.path().join(DEFAULT_DATA_FILE));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Olive Oil");
        assert_eq!(items[0].category, "Oils");
    }

    #[test]
    fn run_add_keeps_long_names_and_odd_characters() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("{}\u{7}", "x".repeat(300));
        let category = format!("Dry\nGoods {}", "c".repeat(100));
        let w = Wrapper::parse_from(["test", name.as_str(), "--category", category.as_str()]);
        run_add(&w.args, &ctx(dir.path())).unwrap();

        let items = load(&dir.path().join(DEFAULT_DATA_FILE));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, name);
        assert_eq!(items[0].category, category);
    }

    #[test]
    fn run_add_blank_name_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let w = Wrapper::parse_from(["test", "   "]);
        run_add(&w.args, &ctx(dir.path())).unwrap();
        assert!(!dir.path().join(DEFAULT_DATA_FILE).exists());
    }
}
