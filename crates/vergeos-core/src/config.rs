//! Connection configuration for VergeOS clients.
//!
//! [`VergeConfig`] captures everything needed to reach a VergeOS system:
//! host, credentials, TLS behavior, timeout and retry limits. It can be
//! populated programmatically or from `VERGE_*` environment variables.

use crate::client::{ApiClient, ApiClientBuilder, RetryPolicy};
use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// Configuration for connecting to a VergeOS system.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VergeConfig {
    /// Hostname or IP of the VergeOS system. A full URL is also accepted.
    #[validate(length(min = 1))]
    pub host: String,

    /// Username for basic authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[serde(default)]
    pub password: Option<SecretString>,

    /// API token; takes precedence over username/password when both are set.
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Whether to verify TLS certificates.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds.
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of retry attempts for transient failures.
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

impl VergeConfig {
    /// Create a configuration for the given host with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if validation fails.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let config = Self {
            host: host.into(),
            username: None,
            password: None,
            token: None,
            tls_verify: default_tls_verify(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from `VERGE_*` environment variables.
    ///
    /// Reads `VERGE_HOST` (required), `VERGE_USERNAME`, `VERGE_PASSWORD`,
    /// `VERGE_TOKEN`, `VERGE_VERIFY_SSL`, `VERGE_TIMEOUT` and
    /// `VERGE_RETRY_TOTAL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `VERGE_HOST` is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("VERGE_HOST")
            .map_err(|_| Error::Config("VERGE_HOST is not set".into()))?;

        let mut config = Self::new(host)?;
        config.username = std::env::var("VERGE_USERNAME").ok();
        config.password = std::env::var("VERGE_PASSWORD").ok().map(SecretString::from);
        config.token = std::env::var("VERGE_TOKEN").ok().map(SecretString::from);

        if let Ok(verify) = std::env::var("VERGE_VERIFY_SSL") {
            config.tls_verify = !matches!(
                verify.to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Ok(timeout) = std::env::var("VERGE_TIMEOUT") {
            config.timeout_secs = timeout
                .parse()
                .map_err(|_| Error::Config(format!("invalid VERGE_TIMEOUT: {timeout}")))?;
        }
        if let Ok(retries) = std::env::var("VERGE_RETRY_TOTAL") {
            config.max_retries = retries
                .parse()
                .map_err(|_| Error::Config(format!("invalid VERGE_RETRY_TOTAL: {retries}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set an API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Derive the retry policy from this configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new().with_max_retries(self.max_retries)
    }

    /// Returns true when usable credentials are present.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.token.is_some() || (self.username.is_some() && self.password.is_some())
    }

    /// Build an [`ApiClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when validation fails or no credentials are
    /// set.
    pub fn build_client(&self) -> Result<ApiClient> {
        self.validate()?;

        let mut builder = ApiClientBuilder::new(&self.host)
            .with_tls_verify(self.tls_verify)
            .with_retry_policy(self.retry_policy());

        if let Some(token) = &self.token {
            builder = builder.with_token(token.expose_secret());
        } else if let (Some(username), Some(password)) = (&self.username, &self.password) {
            builder = builder.with_basic_auth(username, password.expose_secret());
        }

        builder.build()
    }
}
