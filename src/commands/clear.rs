use crate::store::ProfileStore;
use crate::ui;
use anyhow::{Context, Result};

pub fn execute(store: &ProfileStore, force: bool) -> Result<()> {
    if !force {
        if !ui::stdin_is_terminal() {
            anyhow::bail!("Refusing to clear profiles without confirmation. Re-run with --force.");
        }

        let confirmed = ui::confirm(
            "Delete every profile, the live SSH keys, the SSH config and the global Git config?",
        )
        .context("Failed to read confirmation")?;
        if !confirmed {
            ui::info("Nothing was deleted.");
            return Ok(());
        }
    }

    store.clear()?;
    ui::success("Cleared", "all profiles and live SSH/Git configuration");
    Ok(())
}
