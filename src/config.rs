//! Pool and connection configuration

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};

/// Connection parameters handed to the factory on every create.
///
/// The pool treats all three fields as opaque strings; only the factory
/// interprets them.
#[derive(Clone)]
pub struct ConnectOptions {
    url: String,
    username: String,
    password: String,
}

impl ConnectOptions {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read connection parameters from `DB_URL`, `DB_USERNAME` and
    /// `DB_PASSWORD`. A missing variable is an
    /// [`InvalidConfiguration`](PoolError::InvalidConfiguration) error.
    pub fn from_env() -> PoolResult<Self> {
        Ok(Self {
            url: require_env("DB_URL")?,
            username: require_env("DB_USERNAME")?,
            password: require_env("DB_PASSWORD")?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn require_env(name: &str) -> PoolResult<String> {
    env::var(name)
        .map_err(|_| PoolError::InvalidConfiguration(format!("missing environment variable {name}")))
}

/// Sizing for a connection pool
///
/// # Examples
///
/// ```
/// use connpool::PoolConfig;
///
/// let config = PoolConfig::new(2, 16);
/// assert_eq!(config.min_size(), 2);
/// assert_eq!(config.max_size(), 16);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Connections created eagerly when the pool is constructed
    min_size: usize,
    /// Upper bound on connections the pool will ever hold
    max_size: usize,
}

impl PoolConfig {
    /// Create a configuration with the given sizes.
    ///
    /// Sizes are not checked here; [`validate`](Self::validate) runs when
    /// the pool is constructed so a bad combination surfaces as an error
    /// rather than a panic.
    pub fn new(min_size: usize, max_size: usize) -> Self {
        Self { min_size, max_size }
    }

    /// Read pool sizing from `POOL_MIN_SIZE` / `POOL_MAX_SIZE`, keeping the
    /// defaults for unset variables.
    pub fn from_env() -> PoolResult<Self> {
        let defaults = Self::default();
        let config = Self {
            min_size: size_from_env("POOL_MIN_SIZE", defaults.min_size)?,
            max_size: size_from_env("POOL_MAX_SIZE", defaults.max_size)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_min_size(mut self, size: usize) -> Self {
        self.min_size = size;
        self
    }

    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Reject a configuration whose minimum exceeds its maximum.
    pub fn validate(&self) -> PoolResult<()> {
        if self.min_size > self.max_size {
            return Err(PoolError::InvalidConfiguration(format!(
                "min_size ({}) cannot exceed max_size ({})",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

fn size_from_env(name: &str, default: usize) -> PoolResult<usize> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            PoolError::InvalidConfiguration(format!("{name} must be an integer, got {raw:?}"))
        }),
        Err(_) => Ok(default),
    }
}
