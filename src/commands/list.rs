use crate::store::ProfileStore;
use crate::ui;
use anyhow::Result;

pub fn execute(store: &ProfileStore) -> Result<()> {
    let mut profiles = store.list()?;
    let active = store.active()?;

    if profiles.is_empty() {
        ui::info("No profiles found. Use 'sshp create' to create one.");
        return Ok(());
    }

    profiles.sort();
    for name in &profiles {
        if active.as_deref() == Some(name.as_str()) {
            ui::success("Active", name);
        } else {
            ui::status("Profile", name);
        }
    }

    if let Some(active) = active.filter(|name| !profiles.contains(name)) {
        ui::warn(format!(
            "Active profile '{active}' no longer exists. Run 'sshp use <PROFILE>' to pick another."
        ));
    }
    Ok(())
}
