//! `pantry save`: rewrite the data file from the current list.
//!
//! Mostly useful to normalize a hand-edited file: blank cells and loose
//! quantities are written back in canonical form.

use crate::cmd::{Context, fail};
use crate::output::{pretty_kv, render};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SaveOutput {
    ok: bool,
    path: String,
    items: usize,
    message: String,
}

pub fn run_save(ctx: &Context<'_>) -> anyhow::Result<()> {
    let (store, _) = ctx.open_store()?;
    store.save().map_err(|e| fail(ctx.output, &e))?;

    let file_name = store
        .path()
        .file_name()
        .map_or_else(|| store.path().display().to_string(), |n| n.to_string_lossy().into_owned());
    let payload = SaveOutput {
        ok: true,
        path: store.path().display().to_string(),
        items: store.len(),
        message: format!("Saved {file_name}."),
    };
    if ctx.quiet && !ctx.output.is_json() {
        return Ok(());
    }
    render(ctx.output, &payload, |p, w| {
        writeln!(w, "✓ {}", p.message)?;
        pretty_kv(w, "items", p.items.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testutil::ctx;
    use pantry_core::store::DEFAULT_DATA_FILE;

    #[test]
    fn save_rewrites_file_canonically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_DATA_FILE);
        std::fs::write(&path, "expiry,name,quantity,category\r\n2025-03-01, Milk ,2.0,Dairy\r\n")
            .unwrap();

        run_save(&ctx(dir.path())).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name,quantity,category,expiry\nMilk,2,Dairy,2025-03-01\n"
        );
    }

    #[test]
    fn save_on_fresh_pantry_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        run_save(&ctx(dir.path())).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join(DEFAULT_DATA_FILE)).unwrap(),
            "name,quantity,category,expiry\n"
        );
    }
}
