//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 8080)
//! - `CATALOG_DATA_PATH` - Snapshot file (default: `example_product.json`)
//! - `CATALOG_KEY_KIND` - `string` or `integer` (default: string)
//! - `CATALOG_VARIANT_SHAPE` - `single` or `many` (default: single)
//! - `CATALOG_UPC_KIND` - `string` or `int` (default: string)
//! - `CATALOG_LOG_FORMAT` - `json` for structured logs (read by the binary)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use catalog_graph_core::{CatalogShape, KeyKind, ScalarKind, VariantShape};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path of the JSON snapshot loaded at startup
    pub data_path: PathBuf,
    /// Registry shape the snapshot must match
    pub shape: CatalogShape,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_env(&lookup, "CATALOG_HOST", "127.0.0.1")?;
        let port = parse_env(&lookup, "CATALOG_PORT", "8080")?;
        let data_path = PathBuf::from(get_env_or_default(
            &lookup,
            "CATALOG_DATA_PATH",
            "example_product.json",
        ));

        let key_kind: KeyKind = parse_env(&lookup, "CATALOG_KEY_KIND", "string")?;
        let variants: VariantShape = parse_env(&lookup, "CATALOG_VARIANT_SHAPE", "single")?;
        let upc: ScalarKind = parse_env(&lookup, "CATALOG_UPC_KIND", "string")?;
        if !matches!(upc, ScalarKind::String | ScalarKind::Int) {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_UPC_KIND".to_string(),
                format!("{upc} is not a valid upc kind (expected string or int)"),
            ));
        }

        Ok(Self {
            host,
            port,
            data_path,
            shape: CatalogShape {
                key_kind,
                variants,
                upc,
            },
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating an empty value as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Get a variable with a default value and parse it.
fn parse_env<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_path, PathBuf::from("example_product.json"));
        assert_eq!(config.shape, CatalogShape::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_shape_overrides() {
        let config = config(&[
            ("CATALOG_KEY_KIND", "integer"),
            ("CATALOG_VARIANT_SHAPE", "many"),
            ("CATALOG_UPC_KIND", "int"),
            ("CATALOG_PORT", "9000"),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();
        assert_eq!(config.shape.key_kind, KeyKind::Integer);
        assert_eq!(config.shape.variants, VariantShape::Many);
        assert_eq!(config.shape.upc, ScalarKind::Int);
        assert_eq!(config.port, 9000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("CATALOG_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_PORT"));

        let err = config(&[("CATALOG_VARIANT_SHAPE", "several")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_VARIANT_SHAPE"));

        let err = config(&[("CATALOG_UPC_KIND", "boolean")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_UPC_KIND"));
    }
}
