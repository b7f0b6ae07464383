//! Environment-driven configuration.
//!
//! Defaults live here as named constants rather than at call sites; the
//! environment overrides them and the CLI overrides the environment for
//! the flags it exposes. `.env` loading happens in the binary before any
//! of this runs.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the warehouse project id.
pub const PROJECT_ID_ENV: &str = "GCP_PROJECT_ID";
/// Project id used when the environment does not supply one.
pub const DEFAULT_PROJECT_ID: &str = "stockpipe-dev";

/// Environment variable overriding the credential file path.
pub const CREDENTIALS_FILE_ENV: &str = "STOCKPIPE_CREDENTIALS_FILE";
/// Service-account credential file looked up when the environment does
/// not supply a path.
pub const DEFAULT_CREDENTIALS_FILE: &str = "service-account.token";

/// Errors from resolving configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Credential file {} not found", .0.display())]
    CredentialsMissing(PathBuf),
    #[error("Failed to read credential file: {0}")]
    CredentialsUnreadable(#[from] std::io::Error),
    #[error("Credential file {} is empty", .0.display())]
    CredentialsEmpty(PathBuf),
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub credentials_file: PathBuf,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup. Blank values
    /// fall back to the defaults, same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = lookup(PROJECT_ID_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());
        let credentials_file = lookup(CREDENTIALS_FILE_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE));
        Self {
            project_id,
            credentials_file,
        }
    }

    /// Read the warehouse bearer token from the credential file.
    ///
    /// A missing or empty file is a fatal startup error; the pipeline
    /// never starts its loop without credentials in hand.
    pub fn load_token(&self) -> Result<String, ConfigError> {
        load_token_from(&self.credentials_file)
    }
}

fn load_token_from(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::CredentialsMissing(path.to_path_buf()));
    }
    let token = std::fs::read_to_string(path)?;
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::CredentialsEmpty(path.to_path_buf()));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_environment_is_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(
            config.credentials_file,
            PathBuf::from(DEFAULT_CREDENTIALS_FILE)
        );
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(|key| match key {
            PROJECT_ID_ENV => Some("acme-analytics".to_string()),
            CREDENTIALS_FILE_ENV => Some("/etc/stockpipe/sa.token".to_string()),
            _ => None,
        });
        assert_eq!(config.project_id, "acme-analytics");
        assert_eq!(
            config.credentials_file,
            PathBuf::from("/etc/stockpipe/sa.token")
        );
    }

    #[test]
    fn blank_environment_values_fall_back_to_defaults() {
        let config = Config::from_lookup(|key| match key {
            PROJECT_ID_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.project_id, DEFAULT_PROJECT_ID);
    }

    #[test]
    fn missing_credential_file_is_fatal() {
        let config = Config {
            project_id: "p".to_string(),
            credentials_file: PathBuf::from("/definitely/not/here.token"),
        };
        let err = config.load_token().unwrap_err();
        assert!(matches!(err, ConfigError::CredentialsMissing(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn token_is_read_and_trimmed() {
        let path = std::env::temp_dir().join("stockpipe-token-read-test");
        std::fs::write(&path, "  ya29.sample-token\n").unwrap();

        let config = Config {
            project_id: "p".to_string(),
            credentials_file: path.clone(),
        };
        let token = config.load_token().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(token, "ya29.sample-token");
    }

    #[test]
    fn empty_credential_file_is_fatal() {
        let path = std::env::temp_dir().join("stockpipe-token-empty-test");
        std::fs::write(&path, "\n").unwrap();

        let config = Config {
            project_id: "p".to_string(),
            credentials_file: path.clone(),
        };
        let err = config.load_token().unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::CredentialsEmpty(_)));
    }
}
