//! Configuration management and validation.
//!
//! Provides configuration structures for the candidates source, the search
//! and filter field designations, and the viewport used to page results.
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CANDIDATE_DIRECTORY_*` environment variables, then CLI overrides.

use crate::constants::{
    self, APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CATEGORY_FIELD, DEFAULT_DEBOUNCE_MS,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_SEARCH_FIELDS,
    DEFAULT_SOURCE_LOCATION, DEFAULT_VIEWPORT_HEIGHT, ENV_PREFIX,
};
use crate::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Where the candidates file comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Local path or http(s) URL of the candidates file
    pub location: String,

    /// Timeout for remote fetches in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_SOURCE_LOCATION.to_string(),
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which record fields the directory searches and filters on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Designated searchable fields for the free-text query
    pub fields: Vec<String>,

    /// Field the category filter matches exactly
    pub category_field: String,

    /// Field holding the record identifier
    pub id_field: String,

    /// Quiescence interval before a typed query is applied
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            id_field: constants::columns::ID.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchConfig {
    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Fixed-row-height windowing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Height of a single row
    pub row_height: usize,

    /// Height of the visible area
    pub viewport_height: usize,

    /// Extra rows rendered above and below the visible area
    pub overscan: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

/// Global configuration for the candidate directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub source: SourceConfig,
    pub search: SearchConfig,
    pub view: ViewConfig,
}

impl DirectoryConfig {
    /// Default location of the configuration file, if a config dir exists
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from defaults, an optional TOML file, and the environment
    ///
    /// An explicitly named file must exist. Pass `None` to use only defaults
    /// and environment variables.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Reading config file {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Set the candidates source location
    pub fn with_source(mut self, location: impl Into<String>) -> Self {
        self.source.location = location.into();
        self
    }

    /// Set the remote fetch timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.source.timeout_secs = timeout_secs;
        self
    }

    /// Set the designated searchable fields
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the field used by the category filter
    pub fn with_category_field(mut self, field: impl Into<String>) -> Self {
        self.search.category_field = field.into();
        self
    }

    /// Set the query debounce interval
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.search.debounce_ms = debounce_ms;
        self
    }

    /// Set the number of rows per page
    pub fn with_viewport_height(mut self, viewport_height: usize) -> Self {
        self.view.viewport_height = viewport_height;
        self
    }

    /// Check the configuration for values the directory cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.source.location.trim().is_empty() {
            return Err(Error::configuration("Source location cannot be empty"));
        }

        if self.source.timeout_secs == 0 {
            return Err(Error::configuration("Fetch timeout must be at least 1 second"));
        }

        if self.search.fields.is_empty() || self.search.fields.iter().any(|f| f.trim().is_empty())
        {
            return Err(Error::configuration(
                "Search fields must be a non-empty list of column names",
            ));
        }

        if self.search.category_field.trim().is_empty() {
            return Err(Error::configuration("Category field cannot be empty"));
        }

        if self.search.id_field.trim().is_empty() {
            return Err(Error::configuration("Identifier field cannot be empty"));
        }

        if self.view.row_height == 0 {
            return Err(Error::configuration("Row height must be greater than zero"));
        }

        if self.view.viewport_height == 0 {
            return Err(Error::configuration(
                "Viewport height must be greater than zero",
            ));
        }

        Ok(())
    }
}
