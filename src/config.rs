//! Runtime configuration, read from the environment.
//!
//! - `AZURE_OPENAI_ENDPOINT` - Required. Base URL of the Azure OpenAI resource.
//! - `AZURE_OPENAI_API_KEY` - Required. Key sent in the `api-key` header.
//! - `AZURE_OPENAI_DEPLOYMENT` - Optional. Chat deployment name. Defaults to `AnalitiChAT`.
//! - `AZURE_OPENAI_API_VERSION` - Optional. Defaults to `2024-06-01`.
//! - `ANALITICHAT_DATA_DIR` - Optional. Directory with the CSV and JSON data. Defaults to `.`.
//! - `ANALITICHAT_REQUEST_TIMEOUT_SECS` - Optional. HTTP timeout. Defaults to `120`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DEPLOYMENT: &str = "AnalitiChAT";
pub const DEFAULT_API_VERSION: &str = "2024-06-01";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing required environment variable: {0} (AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY must be provided)"
    )]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any name -> value source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required =
            |name: &str| get(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()));

        let endpoint = required("AZURE_OPENAI_ENDPOINT")?;
        let api_key = required("AZURE_OPENAI_API_KEY")?;

        let deployment =
            get("AZURE_OPENAI_DEPLOYMENT").unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());
        let api_version =
            get("AZURE_OPENAI_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let data_dir = get("ANALITICHAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let timeout_secs = match get("ANALITICHAT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("ANALITICHAT_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            deployment,
            api_version,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
