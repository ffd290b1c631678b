//! Runtime configuration for the ingest tool.
//!
//! Built once at startup from defaults, an optional TOML file, and
//! `STOREFRONT_*` environment variables, then passed explicitly to the
//! components that need it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use storefront_source::registry;

/// Environment variable overriding [`IngestConfig::database_path`].
pub const DATABASE_PATH_ENV: &str = "STOREFRONT_DATABASE_PATH";

/// Environment variable overriding [`IngestConfig::request_timeout_secs`].
pub const HTTP_TIMEOUT_ENV: &str = "STOREFRONT_HTTP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`IngestConfig`].
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A setting held an unusable value.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Setting or environment variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Ingest tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Catalog `DuckDB` file.
    pub database_path: PathBuf,
    /// Per-request HTTP timeout, in seconds.
    pub request_timeout_secs: u64,
    /// `User-Agent` sent to providers.
    pub user_agent: String,
    /// Replacement endpoints keyed by provider id.
    pub source_urls: BTreeMap<String, String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            database_path: storefront_database::paths::catalog_db_path(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("storefront-ingest/", env!("CARGO_PKG_VERSION")).to_string(),
            source_urls: BTreeMap::new(),
        }
    }
}

impl IngestConfig {
    /// Loads the configuration: defaults, then `path` if given, then the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a TOML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`], or
    /// [`ConfigError::InvalidValue`] if `request_timeout_secs` is zero.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                value: config.request_timeout_secs.to_string(),
            });
        }

        Ok(config)
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    ///
    /// Provider URLs are read from `STOREFRONT_<ID>_URL` for every
    /// registered provider id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the timeout is not a
    /// positive integer.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup(DATABASE_PATH_ENV) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(value) = lookup(HTTP_TIMEOUT_ENV) {
            self.request_timeout_secs = value
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: HTTP_TIMEOUT_ENV.to_string(),
                    value: value.clone(),
                })?;
        }

        for source in registry::all_sources() {
            let key = source_url_env(source.id());
            if let Some(url) = lookup(&key) {
                log::debug!("{key} overrides the {} endpoint", source.id());
                self.source_urls.insert(source.id, url);
            }
        }

        Ok(())
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Environment variable holding the endpoint override for `source_id`.
#[must_use]
pub fn source_url_env(source_id: &str) -> String {
    format!("STOREFRONT_{}_URL", source_id.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.database_path.ends_with("data/catalog.duckdb"));
        assert!(config.user_agent.starts_with("storefront-ingest/"));
        assert!(config.source_urls.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: IngestConfig = toml::from_str(
            r#"
            request_timeout_secs = 5

            [source_urls]
            fakestore = "http://localhost:8080/products"
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(
            config.source_urls.get("fakestore").map(String::as_str),
            Some("http://localhost:8080/products")
        );
        assert_eq!(config.user_agent, IngestConfig::default().user_agent);
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        let result: Result<IngestConfig, _> = toml::from_str("retries = 3");
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let vars = env(&[
            ("STOREFRONT_DATABASE_PATH", "/tmp/catalog.duckdb"),
            ("STOREFRONT_HTTP_TIMEOUT_SECS", " 12 "),
            ("STOREFRONT_DUMMYJSON_URL", "http://localhost:9000/products"),
        ]);
        let mut config = IngestConfig::default();
        config.apply_env(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/catalog.duckdb"));
        assert_eq!(config.request_timeout_secs, 12);
        assert_eq!(
            config.source_urls.get("dummyjson").map(String::as_str),
            Some("http://localhost:9000/products")
        );
        assert!(!config.source_urls.contains_key("fakestore"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let vars = env(&[("STOREFRONT_HTTP_TIMEOUT_SECS", "0")]);
        let err = IngestConfig::default()
            .apply_env(|key| vars.get(key).cloned())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "{err:?}");
    }

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "storefront-{name}-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_config_file() {
        let path = write_config("valid", "request_timeout_secs = 7\n");
        let config = IngestConfig::from_toml_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn rejects_zero_timeout_in_file() {
        let path = write_config("zero-timeout", "request_timeout_secs = 0\n");
        let err = IngestConfig::from_toml_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(
            matches!(&err, ConfigError::InvalidValue { key, .. } if key == "request_timeout_secs"),
            "{err:?}"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = IngestConfig::from_toml_file(Path::new("/nonexistent/storefront.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
    }

    #[test]
    fn source_url_env_uppercases_id() {
        assert_eq!(source_url_env("fakestore"), "STOREFRONT_FAKESTORE_URL");
    }
}
