//! Credential resolution: environment first, credentials file second.

use std::path::{Path, PathBuf};

use tracing::debug;

#[cfg(feature = "backend-azure")]
use crate::backend::azure::AzureBackend;
use crate::credential::{
    API_KEY_VAR, API_VERSION_VAR, BASE_URL_VAR, Credential, CredentialsFile,
    default_credentials_path,
};
use crate::env::{Environment, ProcessEnv};
use crate::error::Result;

/// Resolves credentials for a model name.
///
/// `OPENAI_API_KEY` and `OPENAI_BASE_URL` win when both are set and
/// non-empty; otherwise the entry for the model is read from the
/// credentials file (`credentials.yml` unless overridden).
#[derive(Debug, Clone)]
pub struct Resolver<E = ProcessEnv> {
    env: E,
    credentials_path: PathBuf,
}

impl Resolver<ProcessEnv> {
    pub fn from_process_env() -> Self {
        Self::new(ProcessEnv)
    }
}

impl Default for Resolver<ProcessEnv> {
    fn default() -> Self {
        Self::from_process_env()
    }
}

impl<E: Environment> Resolver<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            credentials_path: default_credentials_path(),
        }
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Credentials from the environment, if both required variables are set.
    fn env_credential(&self) -> Option<Credential> {
        let api_key = self.env.non_empty_var(API_KEY_VAR)?;
        let base_url = self.env.non_empty_var(BASE_URL_VAR)?;
        let api_version = self.env.non_empty_var(API_VERSION_VAR);
        Some(Credential::new(api_key, base_url, api_version))
    }

    pub fn resolve_credential(&self, model_name: &str) -> Result<Credential> {
        if let Some(credential) = self.env_credential() {
            debug!("Using OpenAI credentials from environment variables");
            return Ok(credential);
        }

        debug!(
            model = %model_name,
            path = %self.credentials_path.display(),
            "Loading OpenAI credentials from file"
        );
        CredentialsFile::load(&self.credentials_path)?.credential(model_name)
    }

    /// Resolves credentials for `model_name` and binds a client to them.
    ///
    /// The client routes each request by its own `model`, so one handle
    /// serves every deployment reachable with the same credential.
    #[cfg(feature = "backend-azure")]
    pub fn resolve(&self, model_name: &str) -> Result<AzureBackend> {
        let credential = self.resolve_credential(model_name)?;
        Ok(AzureBackend::new(credential))
    }
}

/// Resolves a client for `model_name` from the process environment or
/// `credentials.yml` in the working directory.
#[cfg(feature = "backend-azure")]
pub fn resolve(model_name: &str) -> Result<AzureBackend> {
    Resolver::from_process_env().resolve(model_name)
}
