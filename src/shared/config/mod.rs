//! Application configuration module
//!
//! Provides the process configuration for the server. Values are normally
//! read from the environment (see [`AppConfig::from_env`]); tests build
//! them directly through [`AppConfigBuilder`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "127.0.0.1:4000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://snippetbox.db?mode=rwc";
pub const DEFAULT_STATIC_DIR: &str = "./ui/static";
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_BCRYPT_COST: u32 = 12;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
pub const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address
    pub addr: SocketAddr,
    /// SQLite connection string
    pub database_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Session lifetime, measured from the last write
    pub session_lifetime: Duration,
    /// Whether cookies carry the `Secure` attribute
    pub secure_cookies: bool,
    /// Upper bound on any single store or session call
    pub store_timeout: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    pub max_db_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.parse().expect("default address is valid"),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            session_lifetime: DEFAULT_SESSION_LIFETIME,
            secure_cookies: true,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if self.session_lifetime.is_zero() {
            return Err(ConfigError::OutOfRange {
                name: "SNIPPETBOX_SESSION_LIFETIME_SECS",
                value: "0".to_string(),
            });
        }
        if self.store_timeout.is_zero() {
            return Err(ConfigError::OutOfRange {
                name: "SNIPPETBOX_STORE_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::OutOfRange {
                name: "SNIPPETBOX_BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if self.max_db_connections == 0 {
            return Err(ConfigError::OutOfRange {
                name: "SNIPPETBOX_MAX_DB_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Build the configuration from `SNIPPETBOX_*` and `DATABASE_URL`
    /// environment variables. Unset variables fall back to the defaults,
    /// malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfig::builder();

        if let Some(addr) = lookup("SNIPPETBOX_ADDR") {
            let addr: SocketAddr = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddr(addr.clone()))?;
            builder = builder.addr(addr);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(dir) = lookup("SNIPPETBOX_STATIC_DIR") {
            builder = builder.static_dir(dir);
        }
        if let Some(secs) = lookup("SNIPPETBOX_SESSION_LIFETIME_SECS") {
            let secs = parse_number::<u64>("SNIPPETBOX_SESSION_LIFETIME_SECS", &secs)?;
            builder = builder.session_lifetime(Duration::from_secs(secs));
        }
        if let Some(flag) = lookup("SNIPPETBOX_SECURE_COOKIES") {
            let flag = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::OutOfRange {
                        name: "SNIPPETBOX_SECURE_COOKIES",
                        value: flag,
                    })
                }
            };
            builder = builder.secure_cookies(flag);
        }
        if let Some(ms) = lookup("SNIPPETBOX_STORE_TIMEOUT_MS") {
            let ms = parse_number::<u64>("SNIPPETBOX_STORE_TIMEOUT_MS", &ms)?;
            builder = builder.store_timeout(Duration::from_millis(ms));
        }
        if let Some(cost) = lookup("SNIPPETBOX_BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_number("SNIPPETBOX_BCRYPT_COST", &cost)?);
        }
        if let Some(max) = lookup("SNIPPETBOX_MAX_DB_CONNECTIONS") {
            builder = builder.max_db_connections(parse_number("SNIPPETBOX_MAX_DB_CONNECTIONS", &max)?);
        }

        builder.build()
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::OutOfRange {
        name,
        value: value.to_string(),
    })
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    addr: Option<SocketAddr>,
    database_url: Option<String>,
    static_dir: Option<PathBuf>,
    session_lifetime: Option<Duration>,
    secure_cookies: Option<bool>,
    store_timeout: Option<Duration>,
    bcrypt_cost: Option<u32>,
    max_db_connections: Option<u32>,
}

impl AppConfigBuilder {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = Some(lifetime);
        self
    }

    pub fn secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = Some(secure);
        self
    }

    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn max_db_connections(mut self, max: u32) -> Self {
        self.max_db_connections = Some(max);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            database_url: self.database_url.unwrap_or(defaults.database_url),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            session_lifetime: self.session_lifetime.unwrap_or(defaults.session_lifetime),
            secure_cookies: self.secure_cookies.unwrap_or(defaults.secure_cookies),
            store_timeout: self.store_timeout.unwrap_or(defaults.store_timeout),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
            max_db_connections: self.max_db_connections.unwrap_or(defaults.max_db_connections),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address: {0}")]
    InvalidAddr(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {value}")]
    OutOfRange { name: &'static str, value: String },
}
