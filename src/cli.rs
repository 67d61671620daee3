use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SSH profile manager - switch between SSH keys and Git identities
///
/// sshp keeps one SSH key pair and Git identity per named profile under
/// `~/.ssh/profiles` and installs exactly one of them into `~/.ssh` and
/// `~/.gitconfig` at a time.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/sshp/config.toml)
    #[arg(long, global = true, value_name = "FILE", env = "SSHP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List profiles, marking the active one
    #[command(visible_alias = "ls")]
    List,

    /// Show the active profile
    Current,

    /// Generate a new SSH key pair and Git identity, and activate it
    ///
    /// Recreating an existing profile replaces its key material.
    Create {
        /// Profile name
        #[arg(value_name = "PROFILE")]
        name: String,

        /// Git email (user.email), also used as the key comment
        #[arg(short, long, value_name = "EMAIL")]
        email: String,

        /// Git full name (user.name), defaults to your account's real name
        #[arg(short = 'n', long = "name", value_name = "NAME")]
        full_name: Option<String>,

        /// Git host username (github.user), defaults to your login name
        #[arg(short, long, value_name = "USERNAME")]
        username: Option<String>,

        /// Access token stored alongside the identity
        #[arg(short, long, value_name = "TOKEN")]
        token: Option<String>,
    },

    /// Install a profile into ~/.ssh and the global Git config
    #[command(visible_alias = "switch")]
    Use {
        /// Profile name to activate
        #[arg(value_name = "PROFILE")]
        name: String,
    },

    /// Delete an inactive profile
    #[command(visible_alias = "rm")]
    Remove {
        /// Profile name to delete
        #[arg(value_name = "PROFILE")]
        name: String,
    },

    /// Delete all profiles and the live SSH keys, SSH config and Git config
    Clear {
        /// Clear without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Print a profile's SSH public key
    #[command(visible_alias = "show")]
    Key {
        /// Profile name
        #[arg(value_name = "PROFILE")]
        name: String,
    },
}
