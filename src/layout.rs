use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::util::xdg;

const ACTIVE_FILE: &str = ".active";
const SSH_CONFIG_FILE: &str = "config";
const GIT_CONFIG_FILE: &str = ".gitconfig";
const GIT_CONFIG_GLOBAL_ENV: &str = "GIT_CONFIG_GLOBAL";
pub(crate) const PRIVATE_KEY_FILE: &str = "id_rsa";
pub(crate) const PUBLIC_KEY_FILE: &str = "id_rsa.pub";

/// Locations the profile store reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePath {
    /// Profile root: ~/.ssh/profiles
    ProfileRoot,
    /// Active pointer: <profile root>/.active
    ActivePointer,
    /// Live SSH directory: ~/.ssh
    SshDir,
    /// Live SSH client config: <ssh dir>/config
    SshConfig,
    /// Live private key: <ssh dir>/id_rsa
    LivePrivateKey,
    /// Live public key: <ssh dir>/id_rsa.pub
    LivePublicKey,
    /// Global git config: $GIT_CONFIG_GLOBAL or ~/.gitconfig
    GitConfig,
}

/// Filesystem layout of profiles and the live SSH/Git configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    profile_root: PathBuf,
    ssh_dir: PathBuf,
    git_config: PathBuf,
}

impl Layout {
    /// Default layout rooted at a home directory
    ///
    /// - SSH dir: `<home>/.ssh`
    /// - Profile root: `<home>/.ssh/profiles`
    /// - Git config: `<home>/.gitconfig`
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let home_dir = home.into();
        let ssh_dir = home_dir.join(".ssh");
        Self {
            profile_root: ssh_dir.join("profiles"),
            ssh_dir,
            git_config: home_dir.join(GIT_CONFIG_FILE),
        }
    }

    /// Layout for the current user, with config overrides applied
    ///
    /// The git config follows `GIT_CONFIG_GLOBAL` when set, as `git` does.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut layout = Self::from_home(xdg::home_dir()?);

        if let Some(global) = std::env::var_os(GIT_CONFIG_GLOBAL_ENV).filter(|v| !v.is_empty()) {
            layout.git_config = PathBuf::from(global);
        }

        if let Some(ssh_dir) = &config.ssh_dir {
            layout.ssh_dir = xdg::expand_path(ssh_dir)?;
            // Profiles follow a relocated SSH dir unless placed explicitly.
            layout.profile_root = layout.ssh_dir.join("profiles");
        }
        if let Some(profile_root) = &config.profile_root {
            layout.profile_root = xdg::expand_path(profile_root)?;
        }

        Ok(layout)
    }

    /// Get path for a specific store location
    pub fn path(&self, path_type: StorePath) -> PathBuf {
        match path_type {
            StorePath::ProfileRoot => self.profile_root.clone(),
            StorePath::ActivePointer => self.profile_root.join(ACTIVE_FILE),
            StorePath::SshDir => self.ssh_dir.clone(),
            StorePath::SshConfig => self.ssh_dir.join(SSH_CONFIG_FILE),
            StorePath::LivePrivateKey => self.ssh_dir.join(PRIVATE_KEY_FILE),
            StorePath::LivePublicKey => self.ssh_dir.join(PUBLIC_KEY_FILE),
            StorePath::GitConfig => self.git_config.clone(),
        }
    }

    /// Directory holding a named profile
    pub fn profile_dir(&self, name: &str) -> PathBuf {
        self.profile_root.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;
    use std::env;

    #[rstest]
    #[case(StorePath::ProfileRoot, "/home/jane/.ssh/profiles")]
    #[case(StorePath::ActivePointer, "/home/jane/.ssh/profiles/.active")]
    #[case(StorePath::SshDir, "/home/jane/.ssh")]
    #[case(StorePath::SshConfig, "/home/jane/.ssh/config")]
    #[case(StorePath::LivePrivateKey, "/home/jane/.ssh/id_rsa")]
    #[case(StorePath::LivePublicKey, "/home/jane/.ssh/id_rsa.pub")]
    #[case(StorePath::GitConfig, "/home/jane/.gitconfig")]
    fn test_default_paths(#[case] path_type: StorePath, #[case] expected: &str) {
        let layout = Layout::from_home("/home/jane");
        assert_eq!(layout.path(path_type), PathBuf::from(expected));
    }

    #[test]
    fn test_profile_dir() {
        let layout = Layout::from_home("/home/jane");
        assert_eq!(
            layout.profile_dir("work"),
            PathBuf::from("/home/jane/.ssh/profiles/work")
        );
    }

    #[test]
    #[serial]
    fn test_from_config_overrides() {
        let config = Config {
            ssh_dir: Some("/tmp/alt-ssh".to_string()),
            ..Config::default()
        };
        let layout = Layout::from_config(&config).unwrap();
        assert_eq!(layout.path(StorePath::SshDir), PathBuf::from("/tmp/alt-ssh"));
        assert_eq!(
            layout.path(StorePath::ProfileRoot),
            PathBuf::from("/tmp/alt-ssh/profiles")
        );

        let config = Config {
            ssh_dir: Some("/tmp/alt-ssh".to_string()),
            profile_root: Some("/srv/profiles".to_string()),
            ..Config::default()
        };
        let layout = Layout::from_config(&config).unwrap();
        assert_eq!(
            layout.path(StorePath::ActivePointer),
            PathBuf::from("/srv/profiles/.active")
        );
    }

    #[test]
    #[serial]
    fn test_git_config_follows_global_override() {
        let original = env::var_os("GIT_CONFIG_GLOBAL");

        env::set_var("GIT_CONFIG_GLOBAL", "/tmp/alt/gitconfig");
        let layout = Layout::from_config(&Config::default()).unwrap();
        assert_eq!(
            layout.path(StorePath::GitConfig),
            PathBuf::from("/tmp/alt/gitconfig")
        );

        env::set_var("GIT_CONFIG_GLOBAL", "");
        let layout = Layout::from_config(&Config::default()).unwrap();
        assert_eq!(
            layout.path(StorePath::GitConfig),
            xdg::home_dir().unwrap().join(".gitconfig")
        );

        match original {
            Some(value) => env::set_var("GIT_CONFIG_GLOBAL", value),
            None => env::remove_var("GIT_CONFIG_GLOBAL"),
        }
    }
}
