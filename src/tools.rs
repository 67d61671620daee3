use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use tracing::debug;

use crate::config::{GitConfig, KeygenConfig};
use crate::error::{IoContext, ProfileError, Result};

/// Produces an RSA key pair at `private_key` and `private_key.pub`
pub trait KeyGenerator {
    fn generate(&self, private_key: &Path, comment: &str) -> Result<()>;
}

/// Where a key generator writes the public half of `private_key`
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut path = private_key.as_os_str().to_owned();
    path.push(".pub");
    PathBuf::from(path)
}

/// Writes a single value into a git config file
pub trait GitConfigurator {
    fn set(&self, config_file: &Path, key: &str, value: &str) -> Result<()>;
}

/// `ssh-keygen` invoked non-interactively with no passphrase
#[derive(Debug, Clone)]
pub struct SshKeygen {
    program: PathBuf,
    bits: u32,
    timeout: Duration,
}

impl SshKeygen {
    pub fn new(program: impl Into<PathBuf>, bits: u32, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            bits,
            timeout,
        }
    }

    pub fn from_config(config: &KeygenConfig) -> Self {
        Self::new(&config.program, config.bits, config.timeout())
    }

    fn args(&self, private_key: &Path, comment: &str) -> Vec<String> {
        vec![
            "-q".to_string(),
            "-t".to_string(),
            "rsa".to_string(),
            "-b".to_string(),
            self.bits.to_string(),
            "-N".to_string(),
            String::new(),
            "-C".to_string(),
            comment.to_string(),
            "-f".to_string(),
            private_key.display().to_string(),
        ]
    }

    fn launch_error(&self, err: io::Error) -> ProfileError {
        if err.kind() == io::ErrorKind::NotFound {
            ProfileError::KeyGenFailed(format!("'{}' not found", self.program.display()))
        } else {
            ProfileError::KeyGenFailed(format!(
                "failed to start '{}': {}",
                self.program.display(),
                err
            ))
        }
    }
}

impl KeyGenerator for SshKeygen {
    fn generate(&self, private_key: &Path, comment: &str) -> Result<()> {
        debug!(
            program = %self.program.display(),
            key = %private_key.display(),
            bits = self.bits,
            "Generating key pair"
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .io_context(|| "Failed to start key generation runtime")?;

        let output = runtime.block_on(async {
            let child = tokio::process::Command::new(&self.program)
                .args(self.args(private_key, comment))
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|err| self.launch_error(err))?;

            match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
                Ok(output) => output.map_err(|err| {
                    ProfileError::KeyGenFailed(format!("failed to wait for key generator: {err}"))
                }),
                Err(_) => Err(ProfileError::KeyGenTimeout(self.timeout.as_secs())),
            }
        })?;

        if !output.status.success() {
            return Err(ProfileError::KeyGenFailed(failure_message(&output)));
        }

        Ok(())
    }
}

/// The `git` command line, writing with `git config --file`
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(&config.program)
    }
}

impl GitConfigurator for GitCli {
    fn set(&self, config_file: &Path, key: &str, value: &str) -> Result<()> {
        debug!(
            program = %self.program.display(),
            file = %config_file.display(),
            key,
            "Setting git config"
        );

        let output = Command::new(&self.program)
            .arg("config")
            .arg("--file")
            .arg(config_file)
            .args([key, value])
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                ProfileError::GitConfig(format!(
                    "failed to run '{}': {}",
                    self.program.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            return Err(ProfileError::GitConfig(format!(
                "setting {key}: {}",
                failure_message(&output)
            )));
        }

        Ok(())
    }
}

/// Trimmed stderr, or the exit status when stderr is empty
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr
    }
}
