//! API key lookup.
//!
//! The environment wins; otherwise a `.env` file of `KEY=VALUE` lines is
//! scanned for the key.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::application::CredentialSource;
use crate::domain::{AppConfig, AppError, Credential, Result};

/// Credential loader backed by the process environment and a `.env` file.
#[derive(Debug, Clone)]
pub struct DotenvCredentials {
    key: String,
    env_file: PathBuf,
}

impl DotenvCredentials {
    /// Create a loader for `key`, falling back to `env_file`.
    #[must_use]
    pub fn new(key: impl Into<String>, env_file: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            env_file: env_file.into(),
        }
    }

    /// Loader configured from the application settings.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.credential_key.clone(), config.env_file_path())
    }

    /// Resolve with an explicit environment value.
    ///
    /// The file is only read when `env_value` is absent or empty.
    ///
    /// # Errors
    /// Returns `CredentialMissing` if neither source has the key, or an IO
    /// error if the environment value is not valid Unicode or the file
    /// exists but cannot be read.
    pub fn resolve(&self, env_value: Option<OsString>) -> Result<Credential> {
        if let Some(value) = env_value.filter(|v| !v.is_empty()) {
            let value = value.into_string().map_err(|_| {
                AppError::io(
                    format!("{} is not valid Unicode", self.key),
                    io::Error::from(io::ErrorKind::InvalidData),
                )
            })?;
            tracing::debug!(key = %self.key, "Using credential from environment");
            return Ok(Credential::new(value));
        }

        if let Some(value) = read_env_file(&self.env_file, &self.key)? {
            tracing::debug!(key = %self.key, file = %self.env_file.display(), "Using credential from .env file");
            return Ok(Credential::new(value));
        }

        Err(AppError::CredentialMissing {
            key: self.key.clone(),
        })
    }
}

impl CredentialSource for DotenvCredentials {
    fn load(&self) -> Result<Credential> {
        self.resolve(std::env::var_os(&self.key))
    }
}

/// Look `key` up in a `.env` file. A missing file yields `None`.
fn read_env_file(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        tracing::debug!(file = %path.display(), "No .env file");
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?;

    Ok(find_key(&content, key))
}

/// First non-empty value for `key` in `KEY=VALUE` text.
fn find_key(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter(|(k, _)| k.trim() == key)
        .map(|(_, v)| unquote(v.trim()).to_string())
        .find(|v| !v.is_empty())
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
