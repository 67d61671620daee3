//! Minimal structured model of an OpenSSH client config.
//!
//! The live config is generated by the store, so the model only needs to
//! round-trip `Host` stanzas and their key/value entries. Comments and blank
//! lines are not preserved.

use std::fmt;
use std::path::{Path, PathBuf};

/// Host the generated stanza is written for
pub const DEFAULT_HOST: &str = "github.com";

const INDENT: &str = "    ";

/// A `Host` block and its ordered entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStanza {
    pub pattern: String,
    pub entries: Vec<(String, String)>,
}

impl HostStanza {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// First value for `key`, matched case-insensitively like ssh does
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn uses_identity(&self, identity: &Path) -> bool {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("IdentityFile"))
            .any(|(_, v)| same_path(v, identity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshConfig {
    /// Entries before the first `Host` line
    pub global: Vec<(String, String)>,
    pub hosts: Vec<HostStanza>,
}

impl SshConfig {
    /// The single-stanza config pointing the default host at `identity`
    pub fn for_identity(identity: &Path) -> Self {
        let stanza = HostStanza::new(DEFAULT_HOST)
            .with_entry("User", "git")
            .with_entry("IdentityFile", identity.display().to_string());
        Self {
            global: Vec::new(),
            hosts: vec![stanza],
        }
    }

    pub fn parse(contents: &str) -> Self {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = split_entry(line) else {
                continue;
            };

            if key.eq_ignore_ascii_case("Host") {
                config.hosts.push(HostStanza::new(value));
            } else if let Some(stanza) = config.hosts.last_mut() {
                stanza.entries.push((key.to_string(), value.to_string()));
            } else {
                config.global.push((key.to_string(), value.to_string()));
            }
        }

        config
    }

    /// Drop every stanza for `host` whose `IdentityFile` is `identity`
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_identity(&mut self, host: &str, identity: &Path) -> bool {
        let before = self.hosts.len();
        self.hosts
            .retain(|stanza| !(stanza.pattern == host && stanza.uses_identity(identity)));
        self.hosts.len() != before
    }

    pub fn host(&self, pattern: &str) -> Option<&HostStanza> {
        self.hosts.iter().find(|stanza| stanza.pattern == pattern)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.hosts.is_empty()
    }
}

impl fmt::Display for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.global {
            writeln!(f, "{key} {value}")?;
        }

        for (idx, stanza) in self.hosts.iter().enumerate() {
            if idx > 0 || !self.global.is_empty() {
                writeln!(f)?;
            }
            writeln!(f, "Host {}", stanza.pattern)?;
            for (key, value) in &stanza.entries {
                writeln!(f, "{INDENT}{key} {value}")?;
            }
        }

        Ok(())
    }
}

/// Split `Key Value` or `Key=Value`
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let key = &line[..idx];
    let rest = line[idx..].trim_start();
    let value = rest.strip_prefix('=').unwrap_or(rest).trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

fn same_path(raw: &str, identity: &Path) -> bool {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    expanded == identity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_identity_renders_single_stanza() {
        let config = SshConfig::for_identity(Path::new("/home/jane/.ssh/profiles/work/id_rsa"));
        assert_eq!(
            config.to_string(),
            "Host github.com\n    User git\n    IdentityFile /home/jane/.ssh/profiles/work/id_rsa\n"
        );
    }

    #[test]
    fn test_parse_generated_config() {
        let text = "Host github.com\n    User git\n    IdentityFile /p/work/id_rsa";
        let config = SshConfig::parse(text);

        assert!(config.global.is_empty());
        let stanza = config.host("github.com").unwrap();
        assert_eq!(stanza.get("user"), Some("git"));
        assert_eq!(stanza.get("identityfile"), Some("/p/work/id_rsa"));
    }

    #[test]
    fn test_parse_equals_quotes_and_globals() {
        let text = "# managed\nAddKeysToAgent yes\n\nHost gitlab.com\n  IdentityFile=\"/keys/a b/id_rsa\"\nHost *\n  ServerAliveInterval 60\n";
        let config = SshConfig::parse(text);

        assert_eq!(
            config.global,
            vec![("AddKeysToAgent".to_string(), "yes".to_string())]
        );
        assert_eq!(config.hosts.len(), 2);
        assert_eq!(
            config.host("gitlab.com").unwrap().get("IdentityFile"),
            Some("/keys/a b/id_rsa")
        );
        assert_eq!(config.host("*").unwrap().get("ServerAliveInterval"), Some("60"));
    }

    #[test]
    fn test_remove_identity_matches_literal_path() {
        // Regex metacharacters in the path must not matter.
        let key = Path::new("/home/j+ne/.ssh/profiles/work (old)/id_rsa");
        let mut config = SshConfig::for_identity(key);

        assert!(config.remove_identity(DEFAULT_HOST, key));
        assert!(config.is_empty());
        assert_eq!(config.to_string(), "");
    }

    #[test]
    fn test_remove_identity_keeps_other_stanzas() {
        let text = "Host github.com\n    User git\n    IdentityFile /p/work/id_rsa\n\nHost github.com\n    IdentityFile /p/home/id_rsa\n\nHost example.org\n    IdentityFile /p/work/id_rsa\n";
        let mut config = SshConfig::parse(text);

        assert!(config.remove_identity(DEFAULT_HOST, Path::new("/p/work/id_rsa")));
        assert_eq!(config.hosts.len(), 2);
        assert_eq!(
            config.hosts[0].get("IdentityFile"),
            Some("/p/home/id_rsa")
        );
        assert_eq!(config.hosts[1].pattern, "example.org");
    }

    #[test]
    fn test_remove_identity_no_match() {
        let mut config = SshConfig::for_identity(Path::new("/p/work/id_rsa"));
        assert!(!config.remove_identity(DEFAULT_HOST, Path::new("/p/personal/id_rsa")));
        assert_eq!(config.hosts.len(), 1);
    }

    #[test]
    fn test_display_separates_stanzas() {
        let config = SshConfig {
            global: vec![("AddKeysToAgent".to_string(), "yes".to_string())],
            hosts: vec![
                HostStanza::new("a").with_entry("User", "git"),
                HostStanza::new("b").with_entry("Port", "22"),
            ],
        };
        assert_eq!(
            config.to_string(),
            "AddKeysToAgent yes\n\nHost a\n    User git\n\nHost b\n    Port 22\n"
        );
    }
}
