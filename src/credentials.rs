//! Locating the API credential and building the advisor from configuration.

use crate::advice::{AdviceSettings, Advisor};
use crate::providers::openai::DEFAULT_BASE_URL;
use crate::{Error, OpenAIProvider};
use secrecy::SecretString;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the credential in both the secrets file and the environment.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Default location of the TOML secrets file.
pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";

/// Where the API credential is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    /// A TOML file holding `OPENAI_API_KEY = "..."`.
    Secrets { path: PathBuf },
    /// A `.env` file loaded into the environment, then `OPENAI_API_KEY`.
    /// With no path, the nearest `.env` upward from the working directory is used.
    DotEnv { path: Option<PathBuf> },
}

impl Default for CredentialSource {
    fn default() -> Self {
        CredentialSource::Secrets {
            path: PathBuf::from(DEFAULT_SECRETS_PATH),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,
}

impl CredentialSource {
    /// Load the credential.
    ///
    /// A missing file, missing key or blank value yields `Ok(None)`. An
    /// unreadable or malformed secrets file is a configuration error.
    pub fn load(&self) -> Result<Option<SecretString>, Error> {
        let key = match self {
            CredentialSource::Secrets { path } => read_secrets_file(path)?,
            CredentialSource::DotEnv { path } => {
                load_dotenv(path.as_deref());
                env::var(API_KEY_VAR).ok()
            }
        };

        let key = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        if key.is_none() {
            tracing::warn!(source = ?self, "{API_KEY_VAR} not found");
        }
        Ok(key.map(SecretString::from))
    }
}

fn read_secrets_file(path: &Path) -> Result<Option<String>, Error> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "secrets file not present");
            return Ok(None);
        }
        Err(e) => {
            return Err(Error::config(format!(
                "cannot read secrets file {}: {e}",
                path.display()
            )))
        }
    };

    let secrets: SecretsFile = toml::from_str(&text).map_err(|e| {
        Error::config(format!("malformed secrets file {}: {e}", path.display()))
    })?;
    Ok(secrets.openai_api_key)
}

fn load_dotenv(path: Option<&Path>) {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env loaded"),
    }
}

/// Everything needed to build an [`Advisor`].
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub settings: AdviceSettings,
    pub base_url: String,
    pub timeout: Duration,
    pub source: CredentialSource,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            settings: AdviceSettings::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            source: CredentialSource::default(),
        }
    }
}

impl AdvisorConfig {
    /// Build the advisor, or `Ok(None)` when no credential is available.
    pub fn advisor(&self) -> Result<Option<Advisor>, Error> {
        let Some(api_key) = self.source.load()? else {
            return Ok(None);
        };

        let provider = OpenAIProvider::new_with_base_url(api_key, self.base_url.clone())?
            .with_timeout(self.timeout)?;
        Ok(Some(Advisor::new(Box::new(provider), self.settings.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn secrets_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn secrets(path: &Path) -> CredentialSource {
        CredentialSource::Secrets {
            path: path.to_path_buf(),
        }
    }

    #[test]
    fn test_secrets_file_with_key() {
        let file = secrets_file("OPENAI_API_KEY = \"sk-test-123\"\nOTHER = 1\n");
        let key = secrets(file.path()).load().unwrap().unwrap();
        assert_eq!(key.expose_secret(), "sk-test-123");
    }

    #[test]
    fn test_secrets_file_missing_or_blank() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("secrets.toml");
        assert!(secrets(&missing).load().unwrap().is_none());

        let file = secrets_file("OTHER_KEY = \"x\"\n");
        assert!(secrets(file.path()).load().unwrap().is_none());

        let file = secrets_file("OPENAI_API_KEY = \"   \"\n");
        assert!(secrets(file.path()).load().unwrap().is_none());
    }

    #[test]
    fn test_malformed_secrets_file() {
        let file = secrets_file("OPENAI_API_KEY = sk-unquoted\n");
        let err = secrets(file.path()).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_advisor_absent_without_credential() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdvisorConfig {
            source: secrets(&dir.path().join("none.toml")),
            ..AdvisorConfig::default()
        };
        assert!(config.advisor().unwrap().is_none());
    }

    #[test]
    fn test_advisor_built_with_credential() {
        let file = secrets_file("OPENAI_API_KEY = \"sk-test\"\n");
        let config = AdvisorConfig {
            source: secrets(file.path()),
            ..AdvisorConfig::default()
        };
        assert!(config.advisor().unwrap().is_some());
    }
}
