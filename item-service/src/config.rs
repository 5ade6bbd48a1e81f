//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix `ITEM_SERVICE_`, `__` separates nested keys,
//!    e.g. `ITEM_SERVICE_SERVICE__PORT=9000`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/item-service/config.toml
//! 4. System directory: /etc/item-service/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::repository::SortSpec;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ITEM_SERVICE_";

const APP_DIR: &str = "item-service";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Listing defaults
    #[serde(default)]
    pub paging: PagingConfig,

    /// Item store selection
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Public key (RS/ES algorithms) or shared secret (HS algorithms) file
    pub key_path: PathBuf,

    /// JWT algorithm (RS256, ES256, HS256, ...)
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    /// JWT issuer to validate
    #[serde(default)]
    pub issuer: Option<String>,

    /// JWT audience to validate
    #[serde(default)]
    pub audience: Option<String>,

    /// Routes reachable without a token, as `"METHOD /path"` or `"/path"`
    #[serde(default = "default_public_routes")]
    pub public_routes: Vec<String>,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// CORS mode: permissive or restrictive
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

/// Defaults applied to list and paging requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size when `size` is absent
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Sort tokens when `sort` is absent, in either sort encoding
    #[serde(default = "default_sort")]
    pub default_sort: Vec<String>,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            default_sort: default_sort(),
        }
    }
}

impl PagingConfig {
    /// Parsed default sort
    pub fn default_sort_spec(&self) -> Result<SortSpec> {
        SortSpec::parse(&self.default_sort).map_err(|e| {
            Error::Config(Box::new(figment::Error::from(format!(
                "paging.default_sort is invalid: {}",
                e
            ))))
        })
    }
}

/// Which item store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// SurrealDB document store
    Surrealdb,
}

/// Item store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// SurrealDB connection, required when `backend = "surrealdb"`
    #[serde(default)]
    pub surrealdb: Option<SurrealDbConfig>,
}

/// SurrealDB connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrealDbConfig {
    /// Connection URL; the scheme selects the protocol (`ws://`, `http://`, `mem://`)
    pub url: String,

    /// Namespace
    #[serde(default = "default_surreal_namespace")]
    pub namespace: String,

    /// Database
    #[serde(default = "default_surreal_database")]
    pub database: String,

    /// Root username
    #[serde(default)]
    pub username: Option<String>,

    /// Root password
    #[serde(default)]
    pub password: Option<String>,

    /// Maximum retry attempts for the initial connection
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in seconds, doubled per attempt
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_jwt_algorithm() -> String {
    "RS256".to_string()
}

fn default_public_routes() -> Vec<String> {
    let routes = [
        "GET /items",
        "GET /items/paging",
        "GET /items/skip",
        "GET /health",
        "GET /ready",
    ];

    #[cfg(feature = "openapi")]
    let routes = routes
        .into_iter()
        .chain(["GET /v3/api-docs", "GET /swagger-ui", "GET /swagger-ui/**"]);

    routes.into_iter().map(String::from).collect()
}

fn default_body_limit_mb() -> usize {
    10
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_page_size() -> i64 {
    100
}

fn default_sort() -> Vec<String> {
    vec!["name".to_string(), "desc".to_string()]
}

fn default_surreal_namespace() -> String {
    "items".to_string()
}

fn default_surreal_database() -> String {
    "items".to_string()
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    1
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Files are merged lowest priority first so that `./config.toml`
    /// overrides the XDG file, which overrides `/etc`. Environment variables
    /// override all file-based configs.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in Self::find_config_paths().iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path; environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Config file locations in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(Path::new("/etc").join(APP_DIR).join("config.toml"));
        paths
    }

    /// Reject settings that would only fail later at request time
    pub fn validate(&self) -> Result<()> {
        if self.service.name.trim().is_empty() {
            return Err(config_error("service.name cannot be empty"));
        }

        if self.paging.default_page_size <= 0 {
            return Err(config_error(format!(
                "paging.default_page_size must be greater than 0 (got {})",
                self.paging.default_page_size
            )));
        }

        self.paging.default_sort_spec()?;

        if !matches!(self.middleware.cors_mode.as_str(), "permissive" | "restrictive") {
            return Err(config_error(format!(
                "middleware.cors_mode must be 'permissive' or 'restrictive' (got '{}')",
                self.middleware.cors_mode
            )));
        }

        if self.storage.backend == StorageBackend::Surrealdb && self.storage.surrealdb.is_none() {
            return Err(config_error(
                "storage.backend is 'surrealdb' but no [storage.surrealdb] section is configured",
            ));
        }

        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }
}

/// Configuration error carrying a plain message
pub(crate) fn config_error(message: impl Into<String>) -> Error {
    Error::Config(Box::new(figment::Error::from(message.into())))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_DIR.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            jwt: JwtConfig {
                key_path: PathBuf::from("./keys/jwt-public.pem"),
                algorithm: default_jwt_algorithm(),
                issuer: None,
                audience: None,
                public_routes: default_public_routes(),
            },
            middleware: MiddlewareConfig::default(),
            paging: PagingConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
