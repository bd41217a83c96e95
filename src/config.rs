use crate::error::ConfigError;
use campus_store::{Collections, RestConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

const ENV_ENDPOINT: &str = "CAMPUS_ENDPOINT";
const ENV_PROJECT_ID: &str = "CAMPUS_PROJECT_ID";
const ENV_DATABASE_ID: &str = "CAMPUS_DATABASE_ID";
const ENV_API_KEY: &str = "CAMPUS_API_KEY";
const ENV_LOG: &str = "CAMPUS_LOG";
const ENV_LOG_DIR: &str = "CAMPUS_LOG_DIR";

/// Client configuration
///
/// Read from TOML, then overlaid with `CAMPUS_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    /// Collection names in the remote database
    #[serde(default)]
    pub collections: Collections,

    #[serde(default)]
    pub log: LogConfig,
}

/// Remote document store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API root, e.g. `https://cloud.appwrite.io/v1`
    #[serde(default)]
    pub endpoint: Option<Url>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub database_id: Option<String>,

    /// Server API key, if any
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            database_id: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Directory for daily rolling log files; stderr only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: default_filter(), directory: None }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// `<config dir>/campus/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("campus").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&contents, path)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when it
    /// exists, then apply environment overrides and validate.
    ///
    /// An explicit `path` must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("no config file found; using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay settings from `lookup`, keyed by `CAMPUS_*` variable name.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
                field: ENV_ENDPOINT,
                reason: e.to_string(),
            })?;
            self.backend.endpoint = Some(endpoint);
        }
        if let Some(project_id) = get(ENV_PROJECT_ID) {
            self.backend.project_id = Some(project_id);
        }
        if let Some(database_id) = get(ENV_DATABASE_ID) {
            self.backend.database_id = Some(database_id);
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            self.backend.api_key = Some(api_key);
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log.filter = filter;
        }
        if let Some(directory) = get(ENV_LOG_DIR) {
            self.log.directory = Some(PathBuf::from(directory));
        }
        Ok(())
    }

    /// Check settings that are wrong regardless of which backend is used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "backend.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(endpoint) = &self.backend.endpoint {
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    field: "backend.endpoint",
                    reason: format!("unsupported scheme {}", endpoint.scheme()),
                });
            }
        }

        let collections = &self.collections;
        for (field, name) in [
            ("collections.users", &collections.users),
            ("collections.communities", &collections.communities),
            ("collections.community_members", &collections.community_members),
            ("collections.events", &collections.events),
            ("collections.departments", &collections.departments),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Missing { field });
            }
        }
        Ok(())
    }

    /// Connection settings for the REST store. Endpoint, project and database are required.
    pub fn rest_config(&self) -> Result<RestConfig, ConfigError> {
        let backend = &self.backend;
        let endpoint =
            backend.endpoint.clone().ok_or(ConfigError::Missing { field: "backend.endpoint" })?;
        let project_id = backend
            .project_id
            .clone()
            .ok_or(ConfigError::Missing { field: "backend.project_id" })?;
        let database_id = backend
            .database_id
            .clone()
            .ok_or(ConfigError::Missing { field: "backend.database_id" })?;

        let mut config = RestConfig::new(endpoint, project_id, database_id);
        config.api_key = backend.api_key.clone();
        config.timeout = Duration::from_secs(backend.timeout_secs);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = ClientConfig::from_toml("", Path::new("config.toml")).unwrap();

        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.collections.community_members, "community_members");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = ClientConfig::from_toml(
            r#"
            [backend]
            endpoint = "https://file.example/v1"
            project_id = "from-file"
            "#,
            Path::new("config.toml"),
        )
        .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("CAMPUS_PROJECT_ID", "from-env"),
            ("CAMPUS_DATABASE_ID", "campus"),
            ("CAMPUS_API_KEY", "  "),
            ("CAMPUS_LOG", "debug"),
        ]);
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.backend.endpoint.as_ref().unwrap().as_str(), "https://file.example/v1");
        assert_eq!(config.backend.project_id.as_deref(), Some("from-env"));
        assert_eq!(config.backend.database_id.as_deref(), Some("campus"));
        assert_eq!(config.backend.api_key, None);
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn test_bad_endpoint_override() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(|name| (name == "CAMPUS_ENDPOINT").then(|| "not a url".to_string()))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { field: "CAMPUS_ENDPOINT", .. }));
    }

    #[test]
    fn test_rest_config_requires_backend() {
        let err = ClientConfig::default().rest_config().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "backend.endpoint" }));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = ClientConfig::default();
        config.backend.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }
}
