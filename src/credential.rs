//! Azure OpenAI credentials and the per-model YAML file they fall back to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{CompletionError, Result};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const API_VERSION_VAR: &str = "OPENAI_API_VERSION";

/// Credentials file read when the environment does not supply credentials.
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.yml";

/// Placeholder template documenting the shape of [`DEFAULT_CREDENTIALS_PATH`].
/// Never read by the resolver.
pub const CREDENTIALS_TEMPLATE_PATH: &str = "credentials.example.yml";

/// A resolved set of Azure OpenAI credentials.
#[derive(Clone)]
pub struct Credential {
    api_key: SecretString,
    base_url: String,
    api_version: Option<String>,
}

impl Credential {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        api_version: Option<String>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: base_url.into(),
            api_version,
        }
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The API version, if one was configured.
    ///
    /// When `None`, `AzureBackend` sends its `DEFAULT_API_VERSION` rather
    /// than failing.
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.api_key.expose_secret() == other.api_key.expose_secret()
            && self.base_url == other.base_url
            && self.api_version == other.api_version
    }
}

impl Eq for Credential {}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"****")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// One model's entry in the credentials file.
#[derive(Debug, Deserialize)]
struct CredentialEntry {
    api_key: String,
    base_url: String,
    #[serde(default)]
    api_version: Option<String>,
}

impl From<CredentialEntry> for Credential {
    fn from(entry: CredentialEntry) -> Self {
        Credential::new(entry.api_key, entry.base_url, entry.api_version)
    }
}

/// The parsed credentials file: model name to raw entry.
///
/// Entries stay undecoded until looked up, so one malformed entry does not
/// poison the others.
#[derive(Debug, Default)]
pub struct CredentialsFile {
    entries: HashMap<String, serde_yaml::Value>,
}

impl CredentialsFile {
    /// Reads and parses the file at `path`.
    ///
    /// A missing file is reported as [`CompletionError::ConfigurationMissing`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CompletionError::ConfigurationMissing {
                    path: path.to_path_buf(),
                }
            } else {
                CompletionError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&content).map_err(|source| CompletionError::InvalidConfiguration {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses YAML text. An empty document yields an empty file.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let entries: Option<HashMap<String, serde_yaml::Value>> = serde_yaml::from_str(content)?;
        Ok(Self {
            entries: entries.unwrap_or_default(),
        })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Decodes the entry for `model`.
    pub fn credential(&self, model: &str) -> Result<Credential> {
        let value = self
            .entries
            .get(model)
            .ok_or_else(|| CompletionError::ModelNotFound {
                model: model.to_string(),
            })?;

        let entry: CredentialEntry = serde_yaml::from_value(value.clone()).map_err(|source| {
            CompletionError::MalformedCredential {
                model: model.to_string(),
                source,
            }
        })?;

        Ok(entry.into())
    }
}

pub(crate) fn default_credentials_path() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIALS_PATH)
}
