use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{ProfileError, Result};
use crate::layout::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};

const IDENTITY_FILE: &str = ".gitconfig";
const STAGED_KEY_FILE: &str = "id_rsa.new";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("profile name pattern is valid")
    })
}

/// Check that a profile name is usable as a directory name
pub fn validate_name(name: &str) -> Result<()> {
    if name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(ProfileError::InvalidName(name.to_string()))
    }
}

/// A profile directory and the files inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    root: PathBuf,
}

impl Profile {
    pub fn new(name: impl Into<String>, root: PathBuf) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn private_key(&self) -> PathBuf {
        self.root.join(PRIVATE_KEY_FILE)
    }

    pub fn public_key(&self) -> PathBuf {
        self.root.join(PUBLIC_KEY_FILE)
    }

    /// Where a replacement key pair is generated before it is moved into place
    pub fn staged_private_key(&self) -> PathBuf {
        self.root.join(STAGED_KEY_FILE)
    }

    pub fn identity_file(&self) -> PathBuf {
        self.root.join(IDENTITY_FILE)
    }
}

/// Git identity attached to a profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitIdentity {
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub token: Option<String>,
}

/// Identity fields recovered from a profile's `.gitconfig`
///
/// Fields are optional because the file may have been edited by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIdentity {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
}

impl GitIdentity {
    /// Render in git-config syntax: a `[user]` and a `[github]` section
    pub fn render(&self) -> String {
        let mut out = format!(
            "[user]\nemail = {}\nname = {}\n\n[github]\nuser = {}\n",
            self.email, self.full_name, self.username
        );
        if let Some(token) = &self.token {
            out.push_str(&format!("token = {}\n", token));
        }
        out
    }

    /// Parse a rendered identity, tracking sections so `[github] user`
    /// never shadows `[user]` keys
    pub fn parse(contents: &str) -> ParsedIdentity {
        let mut parsed = ParsedIdentity::default();
        let mut section = String::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = header.trim().to_ascii_lowercase();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let value = Some(value.to_string());

            match (section.as_str(), key.trim().to_ascii_lowercase().as_str()) {
                ("user", "email") => parsed.email = value,
                ("user", "name") => parsed.full_name = value,
                ("github", "user") => parsed.username = value,
                ("github", "token") => parsed.token = value,
                _ => {}
            }
        }

        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn identity(token: Option<&str>) -> GitIdentity {
        GitIdentity {
            email: "jane@x.com".to_string(),
            full_name: "Jane Doe".to_string(),
            username: "jane".to_string(),
            token: token.map(str::to_string),
        }
    }

    #[rstest]
    #[case("work")]
    #[case("personal-2")]
    #[case("client.acme")]
    #[case("Jane_Doe")]
    #[case("9lives")]
    fn test_valid_names(#[case] name: &str) {
        assert!(validate_name(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".active")]
    #[case("..")]
    #[case("a/b")]
    #[case("-flag")]
    #[case("has space")]
    #[case("_hidden")]
    fn test_invalid_names(#[case] name: &str) {
        assert!(matches!(
            validate_name(name),
            Err(ProfileError::InvalidName(_))
        ));
    }

    #[test]
    fn test_profile_paths() {
        let profile = Profile::new("work", PathBuf::from("/p/work"));
        assert_eq!(profile.name(), "work");
        assert_eq!(profile.private_key(), PathBuf::from("/p/work/id_rsa"));
        assert_eq!(profile.public_key(), PathBuf::from("/p/work/id_rsa.pub"));
        assert_eq!(profile.identity_file(), PathBuf::from("/p/work/.gitconfig"));
    }

    #[test]
    fn test_render_without_token() {
        assert_eq!(
            identity(None).render(),
            "[user]\nemail = jane@x.com\nname = Jane Doe\n\n[github]\nuser = jane\n"
        );
    }

    #[test]
    fn test_render_with_token() {
        let rendered = identity(Some("tok123")).render();
        assert!(rendered.ends_with("[github]\nuser = jane\ntoken = tok123\n"));
    }

    #[test]
    fn test_parse_rendered_identity() {
        let parsed = GitIdentity::parse(&identity(Some("tok123")).render());
        assert_eq!(parsed.email.as_deref(), Some("jane@x.com"));
        assert_eq!(parsed.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.username.as_deref(), Some("jane"));
        assert_eq!(parsed.token.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_parse_is_section_aware() {
        let contents = "[github]\nuser = octo\n[user]\n\tname = Octo Cat\n\temail=octo@example.com\n[core]\nname = ignored\n";
        let parsed = GitIdentity::parse(contents);
        assert_eq!(parsed.full_name.as_deref(), Some("Octo Cat"));
        assert_eq!(parsed.email.as_deref(), Some("octo@example.com"));
        assert_eq!(parsed.username.as_deref(), Some("octo"));
        assert_eq!(parsed.token, None);
    }

    #[test]
    fn test_parse_missing_fields() {
        let parsed = GitIdentity::parse("[user]\nemail = a@b.c\n");
        assert_eq!(parsed.email.as_deref(), Some("a@b.c"));
        assert_eq!(parsed.full_name, None);
        assert_eq!(parsed.username, None);
    }
}
