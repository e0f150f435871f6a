//! Configuration management for Extract Fetcher
//!
//! Settings come from a TOML file, with credentials and the catalog URL
//! overridable through environment variables. When no configuration file can
//! be found a default one is written and the run stops, so the user can fill
//! in their credentials.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{CacheConfig, ClientConfig, Credentials};
use crate::constants::{cache, catalog, env, files, http, placeholders};
use crate::errors::{ConfigError, ConfigResult};

/// Application configuration as stored in TOML
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog endpoint and credentials
    pub api: ApiConfig,
    /// Local mirror settings
    pub storage: StorageConfig,
    /// Listing snapshot cache settings
    pub cache: CacheConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
}

/// Catalog endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Catalog root URL
    pub extract_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: placeholders::API_KEY.to_string(),
            api_secret: placeholders::API_SECRET.to_string(),
            extract_url: catalog::DEFAULT_EXTRACT_URL.to_string(),
        }
    }
}

/// Local mirror settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory files are downloaded into
    pub storage_directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_directory: PathBuf::from(files::STORAGE_DIRECTORY),
        }
    }
}

/// TOML-friendly cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfigToml {
    /// Snapshot file name
    pub cache_filename: PathBuf,
    /// Snapshot lifetime in minutes; zero or negative disables caching
    pub cache_duration_minutes: i64,
}

impl Default for CacheConfigToml {
    fn default() -> Self {
        Self {
            cache_filename: PathBuf::from(files::CACHE_FILE_NAME),
            cache_duration_minutes: cache::DEFAULT_DURATION_MINUTES,
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Whole-request timeout, including download bodies; unset means none
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout: Option<Duration>,
    /// Connection establishment timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: http::CONNECT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Load, override and validate configuration
    ///
    /// Looks at `config_file_override` if given, otherwise the standard
    /// locations. A missing file is replaced by a default one and reported as
    /// `ConfigError::DefaultWritten`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let path = match config_file_override {
            Some(path) => path,
            None => Self::find_config_file()
                .unwrap_or_else(|| PathBuf::from(files::CONFIG_FILE_NAME)),
        };

        if !path.exists() {
            Self::write_default(&path).await?;
            return Err(ConfigError::DefaultWritten { path });
        }

        let mut config = Self::load_from_file(&path).await?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.fill_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::CONFIG_FILE_NAME)];
        if let Some(path) = Self::user_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Per-user config file location
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::APP_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file without validating it
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write a default configuration file, creating parent directories
    pub async fn write_default(path: &Path) -> ConfigResult<()> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let content = Self::generate_default_config_content()?;
        tokio::fs::write(path, content).await.map_err(io_error)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Default configuration document with a short header
    fn generate_default_config_content() -> ConfigResult<String> {
        let body = toml::to_string_pretty(&Self::default())?;
        Ok(format!(
            "# Extract Fetcher configuration\n\
             # Replace api_key and api_secret with your credentials.\n\
             # cache_duration_minutes <= 0 disables the listing cache.\n\n{body}"
        ))
    }

    /// Apply environment overrides for credentials and the catalog URL
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_key) = lookup(env::API_KEY) {
            debug!("Using api key from {}", env::API_KEY);
            self.api.api_key = api_key;
        }
        if let Some(api_secret) = lookup(env::API_SECRET) {
            debug!("Using api secret from {}", env::API_SECRET);
            self.api.api_secret = api_secret;
        }
        if let Some(extract_url) = lookup(env::EXTRACT_URL) {
            debug!("Using extract url from {}", env::EXTRACT_URL);
            self.api.extract_url = extract_url;
        }
    }

    /// Replace empty optional fields with their defaults
    pub fn fill_defaults(&mut self) {
        if self.api.extract_url.trim().is_empty() {
            self.api.extract_url = catalog::DEFAULT_EXTRACT_URL.to_string();
        }
        if self.storage.storage_directory.as_os_str().is_empty() {
            self.storage.storage_directory = PathBuf::from(files::STORAGE_DIRECTORY);
        }
        if self.cache.cache_filename.as_os_str().is_empty() {
            self.cache.cache_filename = PathBuf::from(files::CACHE_FILE_NAME);
        }
    }

    /// Validate credentials and the catalog URL
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api.api_key.is_empty() || self.api.api_secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        if self.api.api_key == placeholders::API_KEY
            || self.api.api_secret == placeholders::API_SECRET
        {
            return Err(ConfigError::DefaultCredentials);
        }

        if let Err(e) = Url::parse(&self.api.extract_url) {
            return Err(ConfigError::InvalidValue {
                field: "extract_url".to_string(),
                value: self.api.extract_url.clone(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    /// Convert to runtime client and cache configuration
    pub fn to_runtime_config(&self) -> (ClientConfig, CacheConfig) {
        let client = ClientConfig {
            request_timeout: self.client.request_timeout,
            connect_timeout: self.client.connect_timeout,
            ..ClientConfig::new(
                self.api.extract_url.clone(),
                Credentials::new(self.api.api_key.clone(), self.api.api_secret.clone()),
            )
        };

        let cache = CacheConfig::with_cache_file(self.cache.cache_filename.clone())
            .with_duration_minutes(self.cache.cache_duration_minutes);

        (client, cache)
    }

    pub fn storage_directory(&self) -> &Path {
        &self.storage.storage_directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const VALID_CONFIG: &str = r#"
[api]
api_key = "real-key"
api_secret = "real-secret"

[storage]
storage_directory = "/data/extracts"

[cache]
cache_duration_minutes = 60

[client]
request_timeout = "10m"
"#;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.extract_url, catalog::DEFAULT_EXTRACT_URL);
        assert_eq!(config.storage.storage_directory, PathBuf::from("."));
        assert_eq!(config.cache.cache_duration_minutes, -1);
        assert_eq!(config.client.request_timeout, None);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DefaultCredentials)
        ));
    }

    #[test]
    fn test_config_file_generation() {
        let content = AppConfig::generate_default_config_content().unwrap();
        let parsed: AppConfig = toml::from_str(&content).unwrap();

        assert_eq!(parsed, AppConfig::default());
        assert!(content.contains("[api]"));
        assert!(content.contains("[cache]"));
        assert!(!content.contains("request_timeout"));
    }

    #[tokio::test]
    async fn test_missing_file_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let result = AppConfig::load(Some(config_path.clone())).await;
        assert!(matches!(result, Err(ConfigError::DefaultWritten { .. })));
        assert!(config_path.exists());

        let written = AppConfig::load_from_file(&config_path).await.unwrap();
        assert!(matches!(
            written.validate(),
            Err(ConfigError::DefaultCredentials)
        ));
    }

    #[tokio::test]
    async fn test_config_loading_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, VALID_CONFIG).await.unwrap();

        let config = AppConfig::load_from_file(&config_path).await.unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.api_key, "real-key");
        assert_eq!(config.client.request_timeout, Some(Duration::from_secs(600)));
        assert_eq!(config.client.connect_timeout, http::CONNECT_TIMEOUT);
        assert_eq!(config.cache.cache_filename, PathBuf::from(files::CACHE_FILE_NAME));

        let (client, cache) = config.to_runtime_config();
        assert_eq!(client.base_url, catalog::DEFAULT_EXTRACT_URL);
        assert_eq!(client.credentials.api_secret, "real-secret");
        assert_eq!(client.request_timeout, Some(Duration::from_secs(600)));
        assert!(cache.is_enabled());
        assert_eq!(config.storage_directory(), Path::new("/data/extracts"));
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "[api\napi_key = ").await.unwrap();

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let overrides = HashMap::from([
            (env::API_KEY, "env-key".to_string()),
            (env::EXTRACT_URL, "https://mirror.example.com/extracts".to_string()),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|key| overrides.get(key).cloned());

        assert_eq!(config.api.api_key, "env-key");
        assert_eq!(config.api.api_secret, placeholders::API_SECRET);
        assert_eq!(config.api.extract_url, "https://mirror.example.com/extracts");
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.api.api_key = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredentials)
        ));

        config.api.api_key = "key".to_string();
        config.api.api_secret = "secret".to_string();
        config.api.extract_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        config.api.extract_url = String::new();
        config.storage.storage_directory = PathBuf::new();
        config.fill_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.storage_directory, PathBuf::from("."));
    }
}
