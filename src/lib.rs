// Public API
pub mod cli;
pub mod commands;

// Core domain types
mod config;
mod error;
mod layout;
mod profile;
mod ssh_config;
mod store;
mod tools;
mod ui;
mod util;

// Re-export main types
pub use config::{Config, GitConfig, KeygenConfig};
pub use error::{ProfileError, Result};
pub use layout::{Layout, StorePath};
pub use profile::{validate_name, GitIdentity, ParsedIdentity, Profile};
pub use ssh_config::{HostStanza, SshConfig};
pub use store::ProfileStore;
pub use tools::{GitCli, GitConfigurator, KeyGenerator, SshKeygen};
