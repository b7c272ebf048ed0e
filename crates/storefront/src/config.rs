//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a local development cluster.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `OPENSEARCH_URL` - Catalog index base URL (default: <https://localhost:9200>)
//! - `OPENSEARCH_INDEX` - Catalog index name (default: products)
//! - `OPENSEARCH_USERNAME` - Basic auth user
//! - `OPENSEARCH_PASSWORD` - Basic auth password (required when a username is set)
//! - `OPENSEARCH_ACCEPT_INVALID_CERTS` - Skip TLS verification (default: false)
//! - `OPENSEARCH_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `SEARCH_RESULT_SIZE` - Hits requested per search (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog index configuration
    pub opensearch: OpenSearchConfig,
    /// Number of hits requested per search
    pub search_result_size: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog index (`OpenSearch`) connection settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct OpenSearchConfig {
    /// Base URL of the cluster, without a trailing slash
    pub url: String,
    /// Name of the product index
    pub index: String,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<SecretString>,
    /// Accept self-signed certificates (local clusters only)
    pub accept_invalid_certs: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchConfig")
            .field("url", &self.url)
            .field("index", &self.index)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse or a password is
    /// missing for a configured username.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_env::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = get_parsed_env::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let opensearch = OpenSearchConfig::from_env()?;
        let search_result_size = get_parsed_env::<usize>("SEARCH_RESULT_SIZE", "10")?;

        Ok(Self {
            host,
            port,
            base_url,
            opensearch,
            search_result_size,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl OpenSearchConfig {
    /// Settings for an unauthenticated cluster at `url` using the default index.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: normalize_base_url(&url.into()),
            index: "products".to_string(),
            username: None,
            password: None,
            accept_invalid_certs: false,
            timeout_secs: 10,
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let url = get_env_or_default("OPENSEARCH_URL", "https://localhost:9200");
        let username = get_optional_env("OPENSEARCH_USERNAME");
        let password = match &username {
            Some(_) => Some(get_required_secret("OPENSEARCH_PASSWORD")?),
            None => get_optional_env("OPENSEARCH_PASSWORD").map(SecretString::from),
        };

        Ok(Self {
            url: normalize_base_url(&url),
            index: get_env_or_default("OPENSEARCH_INDEX", "products"),
            username,
            password,
            accept_invalid_certs: parse_bool(
                "OPENSEARCH_ACCEPT_INVALID_CERTS",
                &get_env_or_default("OPENSEARCH_ACCEPT_INVALID_CERTS", "false"),
            )?,
            timeout_secs: get_parsed_env::<u64>("OPENSEARCH_TIMEOUT_SECS", "10")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(key)
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable parsed into `T`, falling back to `default`.
fn get_parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Strip trailing slashes so paths can be appended with `/`.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
