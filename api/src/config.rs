use std::fmt;
use std::time::Duration;

use chatrelay_core::prompt::GenerationParams;
use thiserror::Error;

pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/Qwen/Qwen2.5-72B-Instruct";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub model_url: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// `None` leaves the upstream call unbounded.
    pub upstream_timeout: Option<Duration>,
    pub generation: GenerationParams,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"<redacted>")
            .field("model_url", &self.model_url)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("generation", &self.generation)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key =
            get("HUGGING_FACE_API_KEY").ok_or(ConfigError::Missing("HUGGING_FACE_API_KEY"))?;

        let model_url = get("CHATRELAY_MODEL_URL").unwrap_or_else(|| DEFAULT_MODEL_URL.to_string());

        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let cors_origins = parse_origins(
            &get("CHATRELAY_CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let timeout_secs = match get("CHATRELAY_UPSTREAM_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "CHATRELAY_UPSTREAM_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        let upstream_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            api_key,
            model_url,
            port,
            cors_origins,
            upstream_timeout,
            generation: GenerationParams::default(),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
