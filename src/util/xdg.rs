use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Get the XDG config directory for sshp
///
/// Returns `$XDG_CONFIG_HOME/sshp` or `~/.config/sshp` if not set
pub fn config_dir() -> Result<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home_dir()?.join(".config"),
    };

    Ok(base.join("sshp"))
}

/// Get the home directory
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .context("Failed to get home directory")
        .map(|bd| bd.home_dir().to_path_buf())
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path {:?}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir() {
        let dir = config_dir().unwrap();
        assert!(dir.ends_with("sshp"));
    }

    #[test]
    #[serial]
    fn test_config_dir_honours_xdg() {
        let temp = tempfile::TempDir::new().unwrap();
        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", temp.path());

        let dir = config_dir().unwrap();

        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        assert_eq!(dir, temp.path().join("sshp"));
    }

    #[test]
    fn test_home_dir() {
        let dir = home_dir().unwrap();
        assert!(dir.is_absolute());
    }

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(
            expand_path("/srv/profiles").unwrap(),
            PathBuf::from("/srv/profiles")
        );
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/.ssh").unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with(".ssh"));
    }
}
