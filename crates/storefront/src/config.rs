//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `CATALOG_BASE_URL` - Catalog service root (default: `https://dummyjson.com`)
//! - `CATALOG_USER_AGENT` - `User-Agent` header sent with catalog requests
//! - `TINYCART_STORAGE_DIR` - Directory backing the local session storage (default: `.tinycart`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default catalog service root.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://dummyjson.com";

/// Default directory for file-backed session storage.
pub const DEFAULT_STORAGE_DIR: &str = ".tinycart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Directory backing the local session storage
    pub storage_dir: PathBuf,
}

/// Catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Service root; endpoint paths are resolved against it
    pub base_url: Url,
    /// Optional `User-Agent` override
    pub user_agent: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CATALOG_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CATALOG_BASE_URL` is not a valid URL.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base_url = lookup("CATALOG_BASE_URL")
            .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e))?;
        let user_agent = lookup("CATALOG_USER_AGENT").filter(|s| !s.trim().is_empty());
        let storage_dir = lookup("TINYCART_STORAGE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                user_agent,
            },
            storage_dir,
        })
    }
}

impl CatalogConfig {
    /// Configuration pointing at an explicit service root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e))?;
        Ok(Self {
            base_url,
            user_agent: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a service root, normalizing it to end with `/` so relative joins keep
/// any path prefix (e.g., `http://proxy/catalog/`).
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
