use crate::store::ProfileStore;
use crate::ui;
use anyhow::Result;

pub fn execute(store: &ProfileStore, name: &str) -> Result<()> {
    store.switch(name)?;
    ui::success("Switched", format!("to profile '{name}'"));
    Ok(())
}
