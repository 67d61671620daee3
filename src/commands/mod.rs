use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::layout::Layout;
use crate::store::ProfileStore;
use crate::tools::{GitCli, SshKeygen};
use anyhow::{Context, Result};

mod clear;
mod create;
mod current;
mod key;
mod list;
mod remove;
mod use_profile;

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    // Open the store - this creates the profile root on first run
    let layout = Layout::from_config(&config)?;
    let store = ProfileStore::open(
        layout,
        SshKeygen::from_config(&config.keygen),
        GitCli::from_config(&config.git),
    )
    .context("Failed to open profile store")?;

    match cli.command {
        Commands::List => list::execute(&store),

        Commands::Current => current::execute(&store),

        Commands::Create {
            name,
            email,
            full_name,
            username,
            token,
        } => create::execute(&store, name, email, full_name, username, token),

        Commands::Use { name } => use_profile::execute(&store, &name),

        Commands::Remove { name } => remove::execute(&store, &name),

        Commands::Clear { force } => clear::execute(&store, force),

        Commands::Key { name } => key::execute(&store, &name),
    }
}
