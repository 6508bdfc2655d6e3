//! `pantry clear`: drop every item and delete the data file.

use crate::cmd::Context;
use crate::output::render_success;

pub const CLEARED: &str = "Cleared all items.";

pub fn run_clear(ctx: &Context<'_>) -> anyhow::Result<()> {
    let (mut store, _) = ctx.open_store()?;
    let dropped = store.len();
    store.clear();
    tracing::debug!(dropped, "store cleared");
    render_success(ctx.output, ctx.quiet, CLEARED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testutil::ctx;
    use pantry_core::store::DEFAULT_DATA_FILE;

    #[test]
    fn clear_deletes_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_DATA_FILE);
        std::fs::write(&path, "name,quantity,category,expiry\nTea,1,,2027-01-01\n").unwrap();

        run_clear(&ctx(dir.path())).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn clear_on_fresh_pantry_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_clear(&ctx(dir.path())).is_ok());
    }
}
