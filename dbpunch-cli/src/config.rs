//! Configuration for the punch tool.
//!
//! Configuration is merged from three sources with the following precedence
//! (highest to lowest):
//!
//! 1. Environment variables (prefixed with `DBPUNCH__`)
//! 2. YAML configuration file (specified via `-c` or `--config`)
//! 3. Defaults
//!
//! Command-line flags override individual fields of the merged result on
//! top; see [`Config::apply_overrides`].
//!
//! Environment variables use double underscores (`__`) to denote nested
//! configuration structures, for example:
//!
//! - `DBPUNCH__MYSQL__HOST=db.example.com`
//! - `DBPUNCH__RUN__MAX_CONCURRENT=64`
//!
//! The same configuration in YAML:
//!
//! ```yaml
//! mysql:
//!   host: db.example.com
//!
//! run:
//!   max_concurrent: 64
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::cli::Args;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "DBPUNCH__";

/// Newtype around `String` that protects against accidental logging of the
/// password through the configuration struct's `Debug` output.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigSecret(String);

impl ConfigSecret {
    /// Exposes the secret value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ConfigSecret {
    fn from(str: &str) -> Self {
        ConfigSecret(str.to_string())
    }
}

impl fmt::Debug for ConfigSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[redacted]")
    }
}

/// MySQL connection configuration.
///
/// Used in: [`Config::mysql`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Mysql {
    /// Hostname of the MySQL server.
    pub host: String,

    /// Port of the MySQL server.
    pub port: u16,

    /// Database to punch records into.
    pub database: String,

    /// Username to authenticate as.
    pub user: String,

    /// Password for `user`.
    pub password: ConfigSecret,

    /// Create the database on the server if it does not exist.
    ///
    /// The punch table is always created if it is missing; this switch
    /// additionally creates the database itself.
    pub create_database: bool,
}

impl Default for Mysql {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 3306,
            database: "dbpunch".to_owned(),
            user: String::new(),
            password: ConfigSecret::default(),
            create_database: false,
        }
    }
}

/// Parameters of the punch run itself.
///
/// Used in: [`Config::run`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Run {
    /// Number of records to send.
    pub records: u64,

    /// Maximum number of records in flight at once.
    pub max_concurrent: NonZeroUsize,

    /// Delete all punch records and reset the id counter before the run.
    pub reset: bool,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            records: 0,
            max_concurrent: NonZeroUsize::MIN,
            reset: false,
        }
    }
}

/// Logging configuration.
///
/// Used in: [`Config::logging`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Minimum log level to output.
    ///
    /// The `RUST_LOG` environment variable provides more granular control
    /// per module if needed and takes precedence when set.
    #[serde(with = "display_fromstr")]
    pub level: LevelFilter,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
        }
    }
}

mod display_fromstr {
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: std::fmt::Display,
    {
        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: std::str::FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Display,
    {
        use serde::Deserialize;
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Main configuration for the punch tool.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// MySQL connection configuration.
    pub mysql: Mysql,

    /// Parameters of the punch run itself.
    pub run: Run,

    /// Logging configuration.
    pub logging: Logging,
}

impl Config {
    /// Loads configuration from defaults, an optional YAML file, and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML file cannot be read or parsed, or if
    /// environment variables contain invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Applies command-line overrides on top of the merged configuration.
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(records) = args.records {
            self.run.records = records;
        }
        if let Some(max_concurrent) = args.max_concurrent {
            self.run.max_concurrent = max_concurrent;
        }
        if args.reset {
            self.run.reset = true;
        }
        if args.create_database {
            self.mysql.create_database = true;
        }
    }
}
