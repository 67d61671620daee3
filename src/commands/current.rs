use crate::store::ProfileStore;
use crate::ui;
use anyhow::Result;

pub fn execute(store: &ProfileStore) -> Result<()> {
    match store.active()? {
        Some(name) => println!("{name}"),
        None => ui::info("No active profile."),
    }
    Ok(())
}
