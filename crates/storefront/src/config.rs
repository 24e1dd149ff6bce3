//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SELLER_WHATSAPP` - Seller's WhatsApp number in international format
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory for persisted carts and wishlists (default: data/state)
//! - `STOREFRONT_CURRENCY` - Display currency (default: IDR)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog replacing the built-in categories
//! - `STOREFRONT_PRODUCTS_PATH` - JSON product list used when no backend is configured
//! - `CART_SUMMARY_SECONDS` - Floating cart summary duration (default: 4)
//! - `BACKEND_URL` - Hosted backend project URL
//! - `BACKEND_ANON_KEY` - Hosted backend anonymous key (required with `BACKEND_URL`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use goodstock_core::{CurrencyCode, PhoneNumber};

use crate::summary::DEFAULT_SUMMARY_DURATION;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
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
    /// Where carts and wishlists are persisted
    pub data_dir: PathBuf,
    /// Currency used to display prices
    pub currency: CurrencyCode,
    /// Seller's chat number
    pub seller_whatsapp: PhoneNumber,
    /// Catalog file replacing the built-in categories
    pub catalog_path: Option<PathBuf>,
    /// Product seed file for running without a backend
    pub products_path: Option<PathBuf>,
    /// How long the floating cart summary stays visible
    pub cart_summary: Duration,
    /// Hosted backend, if configured
    pub backend: Option<BackendConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Hosted backend configuration.
///
/// Implements `Debug` manually to redact the key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Anonymous (public, row-level-secured) API key
    pub anon_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Defaults for everything except the two required values.
    #[must_use]
    pub fn new(base_url: impl Into<String>, seller_whatsapp: PhoneNumber) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: base_url.into(),
            data_dir: PathBuf::from("data/state"),
            currency: CurrencyCode::default(),
            seller_whatsapp,
            catalog_path: None,
            products_path: None,
            cart_summary: DEFAULT_SUMMARY_DURATION,
            backend: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the backend key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = env.get_required("STOREFRONT_BASE_URL")?;
        let seller_whatsapp = env
            .get_required("SELLER_WHATSAPP")?
            .parse::<PhoneNumber>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SELLER_WHATSAPP".to_string(), e.to_string())
            })?;
        let currency = env
            .get_or_default("STOREFRONT_CURRENCY", "IDR")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CURRENCY".to_string(), e.to_string())
            })?;
        let cart_summary = env
            .get_or_default("CART_SUMMARY_SECONDS", "4")
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CART_SUMMARY_SECONDS".to_string(),
                    "must be a positive number of seconds".to_string(),
                )
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir: PathBuf::from(env.get_or_default("STOREFRONT_DATA_DIR", "data/state")),
            currency,
            seller_whatsapp,
            catalog_path: env.get_optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            products_path: env.get_optional("STOREFRONT_PRODUCTS_PATH").map(PathBuf::from),
            cart_summary,
            backend: BackendConfig::from_env(&env)?,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    /// Load the backend settings. Both variables or neither must be set.
    ///
    /// # Errors
    ///
    /// Returns an error if only one variable is set, the URL is malformed,
    /// or the key looks like a placeholder.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_env(&Env(lookup))
    }

    fn from_env<F>(env: &Env<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (url, key) = match (
            env.get_optional("BACKEND_URL"),
            env.get_optional("BACKEND_ANON_KEY"),
        ) {
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("BACKEND_ANON_KEY".into())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("BACKEND_URL".into())),
            (Some(url), Some(key)) => (url, key),
        };

        url::Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string()))?;
        validate_secret_strength(&key, "BACKEND_ANON_KEY")?;

        Ok(Some(Self {
            url,
            anon_key: SecretString::from(key),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source with the usual accessors. Empty values count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn get_required(&self, key: &str) -> Result<String, ConfigError> {
        self.get_optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key from the backend dashboard."
            ),
        ));
    }

    Ok(())
}
