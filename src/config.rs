//! mailcow API configuration

use crate::error::{Error, Result};
use std::env;
use url::Url;

/// Connection settings for the mailcow admin API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub api_key: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }

    /// Load API configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `API_HOST` (e.g. `https://mail.example.org`)
    /// - `API_KEY`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("API_HOST").map_err(|_| Error::Config("API_HOST not set".into()))?,
            api_key: env::var("API_KEY").map_err(|_| Error::Config("API_KEY not set".into()))?,
        })
    }

    /// The API base URL, always ending in `/`.
    ///
    /// A host given without a scheme is assumed to be served over HTTPS.
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(Error::Config("API host is empty".into()));
        }

        let mut raw = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let url = Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid API host: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid API host: {host}")));
        }
        Ok(url)
    }
}
