//! Configuration options for the parkly client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Configuration options for the parkly client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Path prefix of the REST resources, e.g. `/api`
    pub api_prefix: String,

    /// Bearer token forwarded on every request, if the caller has one
    pub access_token: Option<String>,

    /// Currency used for new payments
    pub default_currency: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            api_prefix: "/api".to_string(),
            access_token: None,
            default_currency: "PEN".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the resource path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set the bearer token sent with each request
    pub fn with_access_token(mut self, value: &str) -> Self {
        self.access_token = Some(value.to_string());
        self
    }

    /// Set the currency of new payments
    pub fn with_default_currency(mut self, value: &str) -> Self {
        self.default_currency = value.to_string();
        self
    }
}

/// Backend location plus client options.
/// Usually loaded from the environment.
#[derive(Debug, Clone)]
pub struct ParklyConfig {
    pub url: Url,
    pub options: ClientOptions,
}

impl ParklyConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str, options: ClientOptions) -> Result<Self> {
        let url = Url::parse(url_str)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }
        Ok(Self { url, options })
    }

    /// Reads `PARKLY_API_URL` (required), `PARKLY_API_TOKEN` and
    /// `PARKLY_TIMEOUT_SECS` (optional).
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var("PARKLY_API_URL")
            .map_err(|_| Error::config("PARKLY_API_URL environment variable not found"))?;

        let mut options = ClientOptions::default();
        if let Ok(token) = std::env::var("PARKLY_API_TOKEN") {
            if !token.is_empty() {
                options = options.with_access_token(&token);
            }
        }
        if let Ok(secs) = std::env::var("PARKLY_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::config(format!("PARKLY_TIMEOUT_SECS is not a number: {secs}")))?;
            options = options.with_request_timeout(Some(Duration::from_secs(secs)));
        }

        Self::new(&url_str, options)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}
