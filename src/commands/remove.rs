use crate::store::ProfileStore;
use crate::ui;
use anyhow::Result;

pub fn execute(store: &ProfileStore, name: &str) -> Result<()> {
    store.remove(name)?;
    ui::success("Removed", format!("profile '{name}'"));
    Ok(())
}
