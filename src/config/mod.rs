//! Service configuration
//!
//! Every constant the pipeline needs (page size, identifier field, keyword
//! suffix, separators, metadata level) lives here and is handed explicitly
//! to the planner and serializer. Nothing is global.

mod errors;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use errors::{ConfigError, ConfigErrorCode, ConfigResult};

use crate::planner::{FilterPolicy, PlannerSettings, DEFAULT_TOP};
use crate::serializer::MetadataLevel;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Page size when `$top` is absent (default: 25)
    #[serde(default = "default_top")]
    pub default_top: u64,

    /// Upper bound applied to `$top` (default: unbounded)
    #[serde(default)]
    pub max_top: Option<u64>,

    /// Document identifier field (default: "_id")
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Suffix of the exact-match field variant (default: ".keyword")
    #[serde(default = "default_keyword_suffix")]
    pub keyword_suffix: String,

    /// Joins the select list in context URLs (default: ",")
    #[serde(default = "default_select_separator")]
    pub select_separator: String,

    /// Base of context URLs and entity ids
    #[serde(default = "default_service_root")]
    pub service_root: String,

    /// Metadata level when the request does not ask for one
    #[serde(default)]
    pub metadata: MetadataLevel,

    /// Unsupported filters: drop (lenient) or reject (strict)
    #[serde(default)]
    pub filter_policy: FilterPolicy,

    #[serde(default)]
    pub metadata_etag: Option<String>,
}

fn default_top() -> u64 {
    DEFAULT_TOP
}

fn default_id_field() -> String {
    "_id".to_string()
}

fn default_keyword_suffix() -> String {
    ".keyword".to_string()
}

fn default_select_separator() -> String {
    ",".to_string()
}

fn default_service_root() -> String {
    "http://localhost/odata".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_top: default_top(),
            max_top: None,
            id_field: default_id_field(),
            keyword_suffix: default_keyword_suffix(),
            select_separator: default_select_separator(),
            service_root: default_service_root(),
            metadata: MetadataLevel::default(),
            filter_policy: FilterPolicy::default(),
            metadata_etag: None,
        }
    }
}

impl ServiceConfig {
    /// Loads and validates a JSON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(&display, e))?;
        let config: ServiceConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::parse(&display, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value constraints
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_top == 0 {
            return Err(ConfigError::invalid("default_top must be greater than 0"));
        }
        if self.max_top == Some(0) {
            return Err(ConfigError::invalid("max_top must be greater than 0"));
        }
        if self.id_field.is_empty() {
            return Err(ConfigError::invalid("id_field must not be empty"));
        }
        if !self.keyword_suffix.starts_with('.') {
            return Err(ConfigError::invalid(format!(
                "keyword_suffix '{}' must start with '.'",
                self.keyword_suffix
            )));
        }
        Ok(())
    }

    /// Planner view of this configuration
    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            id_field: self.id_field.clone(),
            keyword_suffix: self.keyword_suffix.clone(),
            default_top: self.default_top,
            max_top: self.max_top,
            filter_policy: self.filter_policy,
        }
    }
}
