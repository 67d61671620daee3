use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_KEYGEN_PROGRAM: &str = "ssh-keygen";
const DEFAULT_KEY_BITS: u32 = 4096;
const DEFAULT_KEYGEN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GIT_PROGRAM: &str = "git";

/// sshp configuration stored in `$XDG_CONFIG_HOME/sshp/config.toml`
///
/// Every key is optional. Path overrides accept `~` and environment
/// variables; unset paths fall back to `~/.ssh` and `~/.ssh/profiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile_root: Option<String>,
    pub ssh_dir: Option<String>,
    pub keygen: KeygenConfig,
    pub git: GitConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeygenConfig {
    pub program: String,
    pub bits: u32,
    pub timeout_secs: u64,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_KEYGEN_PROGRAM.to_string(),
            bits: DEFAULT_KEY_BITS,
            timeout_secs: DEFAULT_KEYGEN_TIMEOUT_SECS,
        }
    }
}

impl KeygenConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub program: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_GIT_PROGRAM.to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::util::xdg::config_dir()?.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        if config.keygen.bits < 2048 {
            anyhow::bail!(
                "Invalid config file {:?}: keygen.bits must be at least 2048 (got {})",
                path,
                config.keygen.bits
            );
        }
        if config.keygen.timeout_secs == 0 {
            anyhow::bail!(
                "Invalid config file {:?}: keygen.timeout_secs must be greater than 0",
                path
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.profile_root, None);
        assert_eq!(config.ssh_dir, None);
        assert_eq!(config.keygen.program, "ssh-keygen");
        assert_eq!(config.keygen.bits, 4096);
        assert_eq!(config.keygen.timeout(), Duration::from_secs(30));
        assert_eq!(config.git.program, "git");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "ssh_dir = \"~/alt-ssh\"\n\n[keygen]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ssh_dir.as_deref(), Some("~/alt-ssh"));
        assert_eq!(config.keygen.timeout_secs, 5);
        assert_eq!(config.keygen.bits, 4096);
        assert_eq!(config.git.program, "git");
    }

    #[test]
    fn test_load_rejects_weak_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[keygen]\nbits = 1024\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("keygen.bits"));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[keygen]\ntimeout_secs = 0\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_load_full_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let contents = r#"
profile_root = "/srv/profiles"

[keygen]
program = "/opt/bin/ssh-keygen"
bits = 3072

[git]
program = "/usr/local/bin/git"
"#;
        fs::write(&path, contents).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.profile_root.as_deref(), Some("/srv/profiles"));
        assert_eq!(config.ssh_dir, None);
        assert_eq!(config.keygen.program, "/opt/bin/ssh-keygen");
        assert_eq!(config.keygen.bits, 3072);
        assert_eq!(config.keygen.timeout_secs, 30);
        assert_eq!(config.git.program, "/usr/local/bin/git");
    }
}
