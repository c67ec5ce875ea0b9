use std::time::Duration;

use thiserror::Error;
use tracing::info;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must start with '/', got {value:?}")]
    InvalidPath { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub login_path: String,
    pub poll_interval: Duration,
    pub notice_ttl: Duration,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            notice_ttl: DEFAULT_NOTICE_TTL,
            request_timeout: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let raw_url = var("CAMPUS_API_URL").unwrap_or_else(|| {
            info!("CAMPUS_API_URL not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let api_base_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            key: "CAMPUS_API_URL",
            source,
        })?;

        let login_path = var("CAMPUS_LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidPath {
                key: "CAMPUS_LOGIN_PATH",
                value: login_path,
            });
        }

        let poll_interval = match var("CAMPUS_POLL_INTERVAL_SECS") {
            Some(value) => Duration::from_secs(parse_positive("CAMPUS_POLL_INTERVAL_SECS", value)?),
            None => DEFAULT_POLL_INTERVAL,
        };
        let notice_ttl = match var("CAMPUS_NOTICE_TTL_MS") {
            Some(value) => Duration::from_millis(parse_positive("CAMPUS_NOTICE_TTL_MS", value)?),
            None => DEFAULT_NOTICE_TTL,
        };
        let request_timeout = var("CAMPUS_REQUEST_TIMEOUT_SECS")
            .map(|value| parse_positive("CAMPUS_REQUEST_TIMEOUT_SECS", value))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            api_base_url,
            login_path,
            poll_interval,
            notice_ttl,
            request_timeout,
        })
    }
}

fn parse_positive(key: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber { key, value }),
    }
}
