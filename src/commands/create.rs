use crate::profile::GitIdentity;
use crate::store::ProfileStore;
use crate::ui;
use anyhow::Result;

pub fn execute(
    store: &ProfileStore,
    name: String,
    email: String,
    full_name: Option<String>,
    username: Option<String>,
    token: Option<String>,
) -> Result<()> {
    let identity = GitIdentity {
        email,
        full_name: full_name.unwrap_or_else(whoami::realname),
        username: username.unwrap_or_else(whoami::username),
        token,
    };

    let progress = ui::Progress::start("Generating", format!("SSH key for profile '{name}'"));
    let public_key = match store.create(&name, &identity) {
        Ok(key) => key,
        Err(err) => {
            progress.fail();
            return Err(err.into());
        }
    };
    progress.finish("Created");

    ui::success(
        "Active",
        format!("{name} ({} <{}>)", identity.full_name, identity.email),
    );
    ui::info("Add this public key to your Git host:");
    println!("{}", public_key.trim_end());
    Ok(())
}
