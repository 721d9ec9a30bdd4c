//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_STORAGE` - Shopper state backend: `file`, `memory` or
//!   `postgres` (default: file)
//! - `STOREFRONT_DATA_DIR` - Directory for the file backend (default: .seoul-stash)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog document
//!   (default: crates/storefront/data/catalog.json)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string, falls back to
//!   `DATABASE_URL`. Required when `STOREFRONT_STORAGE=postgres`
//! - `STOREFRONT_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL (default: 300)
//! - `STOREFRONT_CATALOG_CACHE_CAPACITY` - Catalog cache entries (default: 1000)
//! - `STOREFRONT_SHIPPING_FLAT_RATE` - Flat shipping charge (default: 5.99)
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal shown as the free shipping goal (default: 50)
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use crate::checkout::ShippingPolicy;

const DEFAULT_DATA_DIR: &str = ".seoul-stash";
const DEFAULT_CATALOG_PATH: &str = "crates/storefront/data/catalog.json";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_CACHE_CAPACITY: &str = "1000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where shopper state (cart, wishlist) is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One JSON document per key in [`StorefrontConfig::data_dir`].
    #[default]
    File,
    /// Process memory only.
    Memory,
    /// `storefront.kv_store` in `PostgreSQL`.
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("expected file, memory or postgres (got '{other}')")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected pretty or json (got '{other}')")),
        }
    }
}

/// Catalog cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCacheConfig {
    /// Entry time-to-live.
    pub ttl: Duration,
    /// Maximum number of entries.
    pub capacity: u64,
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Shopper state backend
    pub storage: StorageBackend,
    /// Directory for the file backend
    pub data_dir: PathBuf,
    /// JSON catalog document
    pub catalog_path: PathBuf,
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Catalog cache settings
    pub catalog_cache: CatalogCacheConfig,
    /// Shipping rules for cart summaries and order drafts
    pub shipping: ShippingPolicy,
    /// Log output format
    pub log_format: LogFormat,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("storage", &self.storage)
            .field("data_dir", &self.data_dir)
            .field("catalog_path", &self.catalog_path)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_cache", &self.catalog_cache)
            .field("shipping", &self.shipping)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            database_url: None,
            catalog_cache: CatalogCacheConfig {
                ttl: Duration::from_secs(300),
                capacity: 1000,
            },
            shipping: ShippingPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if
    /// `STOREFRONT_STORAGE=postgres` and no database URL is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let storage: StorageBackend = env.parse_or_default("STOREFRONT_STORAGE", "file")?;
        let database_url = env.database_url("STOREFRONT_DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "STOREFRONT_DATABASE_URL".to_string(),
            ));
        }

        let ttl_secs: u64 =
            env.parse_or_default("STOREFRONT_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let capacity: u64 =
            env.parse_or_default("STOREFRONT_CATALOG_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;

        let defaults = ShippingPolicy::default();
        let shipping = ShippingPolicy {
            flat_rate: env.decimal_or("STOREFRONT_SHIPPING_FLAT_RATE", defaults.flat_rate)?,
            free_shipping_threshold: env.decimal_or(
                "STOREFRONT_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
        };

        Ok(Self {
            storage,
            data_dir: PathBuf::from(env.get_or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR)),
            catalog_path: PathBuf::from(
                env.get_or_default("STOREFRONT_CATALOG_PATH", DEFAULT_CATALOG_PATH),
            ),
            database_url,
            catalog_cache: CatalogCacheConfig {
                ttl: Duration::from_secs(ttl_secs),
                capacity,
            },
            shipping,
            log_format: env.parse_or_default("STOREFRONT_LOG_FORMAT", "pretty")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional environment variable; blank counts as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to `default`.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a non-negative decimal, falling back to `default`.
    fn decimal_or(&self, key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        let value = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if value.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
        Ok(value)
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Option<SecretString> {
        self.get(primary_key)
            .or_else(|| self.get("DATABASE_URL"))
            .map(SecretString::from)
    }
}
