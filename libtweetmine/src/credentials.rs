//! API credential storage
//!
//! The timeline transport needs four opaque secrets: consumer key/secret and
//! access token/secret. They live in a TOML file under the user's config
//! directory (`TWEETMINE_CREDENTIALS` overrides the path). Loading validates
//! that every field is present and non-empty so a run fails fast before any
//! harvest task starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CredentialError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub token_secret: String,
}

impl Credentials {
    pub fn from_parts(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Load and validate credentials from the default location.
    pub fn load() -> Result<Self, CredentialError> {
        let path = resolve_credentials_path()?;
        Self::load_from_path(&path)
    }

    /// Load and validate credentials from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, CredentialError> {
        if !path.exists() {
            return Err(CredentialError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let credentials: Credentials =
            toml::from_str(&content).map_err(|source| CredentialError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Ensure every secret is present and non-empty.
    pub fn validate(&self) -> Result<(), CredentialError> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("token_secret", &self.token_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CredentialError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Write the credentials to `path`, creating parent directories and
    /// restricting the file to the owner on Unix.
    pub fn save_to_path(&self, path: &Path) -> Result<(), CredentialError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CredentialError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| CredentialError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions).map_err(|source| {
                CredentialError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }

        Ok(())
    }
}

/// Resolve the credential file path.
///
/// `TWEETMINE_CREDENTIALS` wins if set; otherwise the XDG config directory
/// is used.
pub fn resolve_credentials_path() -> Result<PathBuf, CredentialError> {
    if let Ok(path) = std::env::var("TWEETMINE_CREDENTIALS") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir().ok_or(CredentialError::NoConfigDir)?;
    Ok(config_dir.join("tweetmine").join("credentials.toml"))
}
