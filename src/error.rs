use std::io;
use thiserror::Error;

pub type Result<T, E = ProfileError> = std::result::Result<T, E>;

/// Failures surfaced by profile store operations
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile directory with this name
    #[error("profile '{0}' does not exist")]
    ProfileNotFound(String),

    /// The active profile was targeted for removal
    #[error("cannot remove active profile '{0}'. Switch to another profile first")]
    CannotRemoveActive(String),

    /// The key generator exited unsuccessfully or could not be started
    #[error("key generation failed: {0}")]
    KeyGenFailed(String),

    /// The key generator did not finish in time
    #[error("key generation timed out after {0}s")]
    KeyGenTimeout(u64),

    /// The profile or its public key file is missing
    #[error("SSH public key not found for profile '{0}'")]
    KeyNotFound(String),

    /// Profile names must be a single, non-hidden path component
    #[error("invalid profile name '{0}': use letters, digits, '.', '_' or '-', starting with a letter or digit")]
    InvalidName(String),

    /// A git config invocation failed
    #[error("git config failed: {0}")]
    GitConfig(String),

    /// Filesystem failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Any failure during the multi-step activation of a profile
    #[error("failed to switch to profile '{name}': {source}")]
    SwitchFailed {
        name: String,
        #[source]
        source: Box<ProfileError>,
    },
}

impl ProfileError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn switch_failed(name: &str, source: ProfileError) -> Self {
        Self::SwitchFailed {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

/// Attach a context message to `io::Result`, mirroring `anyhow::Context`
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| ProfileError::io(f(), source))
    }
}
