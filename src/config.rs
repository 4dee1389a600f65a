//! Process configuration.
//!
//! Everything the service needs from the environment is read once, at startup,
//! into an immutable [`AppConfig`] that is handed to each component.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

const DEFAULT_PROVIDER: &str = "google";
const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
const DEFAULT_NOTES_FOLDER: &str = "generated_notes";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY is required when using the Google provider")]
    MissingCredential,
    #[error("unsupported LLM provider '{0}' (supported: google)")]
    UnsupportedProvider(String),
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("failed to create folder {path}: {source}")]
    Folder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Hosted generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
}

impl Provider {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Google => "Google Gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub provider: Provider,
    pub google_api_key: String,
    pub gemini_base_url: String,
    pub upload_folder: PathBuf,
    pub notes_folder: PathBuf,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("google_api_key", &self.masked_api_key())
            .field("gemini_base_url", &self.gemini_base_url)
            .field("upload_folder", &self.upload_folder)
            .field("notes_folder", &self.notes_folder)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl AppConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = Provider::parse(
            &lookup("LLM_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
        )?;

        let google_api_key = lookup("GOOGLE_API_KEY")
            .map(|key| key.trim().to_string())
            .unwrap_or_default();
        if provider == Provider::Google && google_api_key.is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            provider,
            google_api_key,
            gemini_base_url: lookup("GEMINI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            upload_folder: PathBuf::from(
                lookup("UPLOAD_FOLDER").unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string()),
            ),
            notes_folder: PathBuf::from(
                lookup("NOTES_FOLDER").unwrap_or_else(|| DEFAULT_NOTES_FOLDER.to_string()),
            ),
            host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// Create the upload and notes folders if they do not exist yet.
    pub fn ensure_folders(&self) -> Result<(), ConfigError> {
        for folder in [&self.upload_folder, &self.notes_folder] {
            create_folder(folder)?;
        }
        Ok(())
    }

    /// First six characters of the API key, for display.
    pub fn masked_api_key(&self) -> String {
        let prefix: String = self.google_api_key.chars().take(6).collect();
        format!("{}...", prefix)
    }
}

fn create_folder(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|source| ConfigError::Folder {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_credential() {
        let config = AppConfig::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "abcdef123456")]))
            .unwrap();

        assert_eq!(config.provider, Provider::Google);
        assert_eq!(config.upload_folder, PathBuf::from("uploads"));
        assert_eq!(config.notes_folder, PathBuf::from("generated_notes"));
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_API_BASE_URL);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingCredential)));

        let blank = AppConfig::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "   ")]));
        assert!(matches!(blank, Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn test_unsupported_provider() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("LLM_PROVIDER", "openai"),
            ("GOOGLE_API_KEY", "key"),
        ]));
        assert!(matches!(result, Err(ConfigError::UnsupportedProvider(p)) if p == "openai"));
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "key"),
            ("SERVER_PORT", "eighty"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "SERVER_PORT", .. })
        ));
    }

    #[test]
    fn test_masked_api_key_and_debug_hide_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "GOOGLE_API_KEY",
            "AIzaSyVerySecretValue",
        )]))
        .unwrap();

        assert_eq!(config.masked_api_key(), "AIzaSy...");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("VerySecretValue"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "key"),
            ("GEMINI_API_BASE_URL", "http://localhost:9999/"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_base_url, "http://localhost:9999");
    }
}
