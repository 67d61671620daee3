use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{IoContext, ProfileError, Result};
use crate::layout::{Layout, StorePath};
use crate::profile::{validate_name, GitIdentity, Profile};
use crate::ssh_config::{SshConfig, DEFAULT_HOST};
use crate::tools::{public_key_path, GitConfigurator, KeyGenerator};

const DIR_MODE: u32 = 0o700;
const PRIVATE_KEY_MODE: u32 = 0o600;
const PUBLIC_FILE_MODE: u32 = 0o644;
const SSH_CONFIG_MODE: u32 = 0o600;

/// Git keys set on every activation, in order
const GIT_EMAIL_KEY: &str = "user.email";
const GIT_NAME_KEY: &str = "user.name";
const GIT_USERNAME_KEY: &str = "github.user";

/// Profile store - owns every profile directory and the live SSH/Git files
///
/// The store keeps no state of its own beyond the layout: each operation
/// re-reads the filesystem, so separate instances see each other's changes.
pub struct ProfileStore {
    layout: Layout,
    keygen: Box<dyn KeyGenerator>,
    git: Box<dyn GitConfigurator>,
}

impl ProfileStore {
    /// Open the store, creating the profile root and SSH dir (0700) if missing
    pub fn open(
        layout: Layout,
        keygen: impl KeyGenerator + 'static,
        git: impl GitConfigurator + 'static,
    ) -> Result<Self> {
        ensure_private_dir(&layout.path(StorePath::SshDir))?;
        ensure_private_dir(&layout.path(StorePath::ProfileRoot))?;

        Ok(Self {
            layout,
            keygen: Box::new(keygen),
            git: Box::new(git),
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Names of all profiles, in directory order
    pub fn list(&self) -> Result<Vec<String>> {
        let root = self.layout.path(StorePath::ProfileRoot);
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in
            fs::read_dir(&root).io_context(|| format!("Failed to list profiles in {:?}", root))?
        {
            let entry = entry.io_context(|| format!("Failed to list profiles in {:?}", root))?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!(?raw, "Skipping profile directory with non UTF-8 name"),
            }
        }

        Ok(names)
    }

    /// Name stored in the active pointer, if any
    pub fn active(&self) -> Result<Option<String>> {
        let pointer = self.layout.path(StorePath::ActivePointer);
        match fs::read_to_string(&pointer) {
            Ok(contents) => {
                let name = contents.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ProfileError::io(
                format!("Failed to read active profile from {:?}", pointer),
                err,
            )),
        }
    }

    /// Generate a key pair for `name`, save its identity and activate it
    ///
    /// An existing profile with the same name has its key material replaced
    /// once the new pair has been generated; on failure the old pair is kept.
    /// Returns the new public key.
    pub fn create(&self, name: &str, identity: &GitIdentity) -> Result<String> {
        validate_name(name)?;
        let profile = self.profile(name);
        let new_profile = !profile.exists();

        ensure_private_dir(profile.root())?;
        set_mode(profile.root(), DIR_MODE)?;

        if let Err(err) = self.generate_keys(&profile, &identity.email) {
            if new_profile {
                if let Err(cleanup) = fs::remove_dir_all(profile.root()) {
                    warn!(profile = name, error = %cleanup, "Failed to remove incomplete profile");
                }
            }
            return Err(err);
        }

        write_file(&profile.identity_file(), &identity.render(), PUBLIC_FILE_MODE)?;

        self.activate(&profile)
            .map_err(|err| ProfileError::switch_failed(name, err))?;

        info!(profile = name, "Created profile");
        read_public_key(&profile)
    }
    /// Install a profile's keys and identity into the live SSH/Git config
    pub fn switch(&self, name: &str) -> Result<()> {
        let profile = self.existing_profile(name)?;
        self.activate(&profile)
            .map_err(|err| ProfileError::switch_failed(name, err))?;

        info!(profile = name, "Switched profile");
        Ok(())
    }

    /// Delete an inactive profile and any SSH config stanza still using its key
    pub fn remove(&self, name: &str) -> Result<()> {
        let profile = self.existing_profile(name)?;

        if self.active()?.as_deref() == Some(name) {
            return Err(ProfileError::CannotRemoveActive(name.to_string()));
        }

        fs::remove_dir_all(profile.root())
            .io_context(|| format!("Failed to remove profile directory {:?}", profile.root()))?;

        match self.strip_ssh_config(&profile) {
            Ok(true) => debug!(profile = name, "Removed stale SSH config stanza"),
            Ok(false) => {}
            Err(err) => warn!(profile = name, error = %err, "Failed to clean up SSH config"),
        }

        info!(profile = name, "Removed profile");
        Ok(())
    }

    /// Delete every profile and all live SSH/Git configuration
    pub fn clear(&self) -> Result<()> {
        let root = self.layout.path(StorePath::ProfileRoot);
        if root.exists() {
            fs::remove_dir_all(&root)
                .io_context(|| format!("Failed to remove profile root {:?}", root))?;
        }
        ensure_private_dir(&root)?;

        for path_type in [
            StorePath::LivePrivateKey,
            StorePath::LivePublicKey,
            StorePath::SshConfig,
            StorePath::GitConfig,
        ] {
            remove_file_if_exists(&self.layout.path(path_type))?;
        }

        info!("Cleared all profiles");
        Ok(())
    }

    /// Contents of a profile's public key file
    pub fn public_key(&self, name: &str) -> Result<String> {
        if validate_name(name).is_err() {
            return Err(ProfileError::KeyNotFound(name.to_string()));
        }
        read_public_key(&self.profile(name))
    }

    fn profile(&self, name: &str) -> Profile {
        Profile::new(name, self.layout.profile_dir(name))
    }

    fn existing_profile(&self, name: &str) -> Result<Profile> {
        let profile = self.profile(name);
        if validate_name(name).is_err() || !profile.exists() {
            return Err(ProfileError::ProfileNotFound(name.to_string()));
        }
        Ok(profile)
    }

    /// Generate into a staging name, then move both halves over the profile's keys
    fn generate_keys(&self, profile: &Profile, comment: &str) -> Result<()> {
        let staged_private = profile.staged_private_key();
        let staged_public = public_key_path(&staged_private);
        remove_file_if_exists(&staged_private)?;
        remove_file_if_exists(&staged_public)?;

        let generated = self.keygen.generate(&staged_private, comment).and_then(|()| {
            if staged_private.is_file() && staged_public.is_file() {
                Ok(())
            } else {
                Err(ProfileError::KeyGenFailed(format!(
                    "key generator did not produce {:?} and {:?}",
                    staged_private, staged_public
                )))
            }
        });
        if let Err(err) = generated {
            for path in [&staged_private, &staged_public] {
                if let Err(cleanup) = remove_file_if_exists(path) {
                    warn!(error = %cleanup, "Failed to remove staged key");
                }
            }
            return Err(err);
        }

        set_mode(&staged_private, PRIVATE_KEY_MODE)?;
        set_mode(&staged_public, PUBLIC_FILE_MODE)?;
        rename_file(&staged_public, &profile.public_key())?;
        rename_file(&staged_private, &profile.private_key())
    }

    /// Mirror a profile into the live locations and point `.active` at it
    fn activate(&self, profile: &Profile) -> Result<()> {
        ensure_private_dir(&self.layout.path(StorePath::SshDir))?;

        replace_file(
            &profile.private_key(),
            &self.layout.path(StorePath::LivePrivateKey),
            PRIVATE_KEY_MODE,
        )?;
        replace_file(
            &profile.public_key(),
            &self.layout.path(StorePath::LivePublicKey),
            PUBLIC_FILE_MODE,
        )?;

        let identity_file = profile.identity_file();
        if identity_file.is_file() {
            self.apply_identity(&identity_file)?;
        } else {
            debug!(
                profile = profile.name(),
                "Profile has no git identity, leaving git config untouched"
            );
        }

        let ssh_config = SshConfig::for_identity(&profile.private_key());
        write_file(
            &self.layout.path(StorePath::SshConfig),
            &ssh_config.to_string(),
            SSH_CONFIG_MODE,
        )?;

        write_file(
            &self.layout.path(StorePath::ActivePointer),
            profile.name(),
            PUBLIC_FILE_MODE,
        )?;

        Ok(())
    }

    /// Copy the identity file over the global git config, then set each
    /// field through git itself
    fn apply_identity(&self, identity_file: &Path) -> Result<()> {
        let git_config = self.layout.path(StorePath::GitConfig);
        replace_file(identity_file, &git_config, PUBLIC_FILE_MODE)?;

        let contents = fs::read_to_string(identity_file)
            .io_context(|| format!("Failed to read git identity {:?}", identity_file))?;
        let parsed = GitIdentity::parse(&contents);

        for (key, value) in [
            (GIT_EMAIL_KEY, parsed.email),
            (GIT_NAME_KEY, parsed.full_name),
            (GIT_USERNAME_KEY, parsed.username),
        ] {
            match value {
                Some(value) => self.git.set(&git_config, key, &value)?,
                None => debug!(key, "Git identity field missing, skipping"),
            }
        }

        Ok(())
    }

    fn strip_ssh_config(&self, profile: &Profile) -> Result<bool> {
        let path = self.layout.path(StorePath::SshConfig);
        if !path.exists() {
            return Ok(false);
        }

        let contents =
            fs::read_to_string(&path).io_context(|| format!("Failed to read {:?}", path))?;
        let mut config = SshConfig::parse(&contents);
        if !config.remove_identity(DEFAULT_HOST, &profile.private_key()) {
            return Ok(false);
        }

        write_file(&path, &config.to_string(), SSH_CONFIG_MODE)?;
        Ok(true)
    }
}

fn read_public_key(profile: &Profile) -> Result<String> {
    let path = profile.public_key();
    match fs::read_to_string(&path) {
        Ok(key) => Ok(key),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ProfileError::KeyNotFound(profile.name().to_string()))
        }
        Err(err) => Err(ProfileError::io(
            format!("Failed to read public key {:?}", path),
            err,
        )),
    }
}

/// Create a directory (and parents) restricted to the owner if missing
fn ensure_private_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).io_context(|| format!("Failed to create directory {:?}", path))?;
    set_mode(path, DIR_MODE)
}

fn write_file(path: &Path, contents: &str, mode: u32) -> Result<()> {
    fs::write(path, contents).io_context(|| format!("Failed to write {:?}", path))?;
    set_mode(path, mode)
}

/// Copy `from` over `to`, replacing read-only targets
fn replace_file(from: &Path, to: &Path, mode: u32) -> Result<()> {
    remove_file_if_exists(to)?;
    fs::copy(from, to).io_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    set_mode(to, mode)
}

fn rename_file(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).io_context(|| format!("Failed to move {:?} to {:?}", from, to))
}

fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ProfileError::io(
            format!("Failed to remove {:?}", path),
            err,
        )),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .io_context(|| format!("Failed to set permissions on {:?}", path))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
