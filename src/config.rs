//! apilinks.yaml schema
//!
//! ```yaml
//! ref-regex: '(?P<source>`((?P<prefix>[\w-]+):\s*)?(?P<verb>GET|POST)\s+(?P<command>\S+)`)'
//! output-template: '[{verb} {command}]({url})'
//! offline: false
//! targets: [site]
//! API:
//!   public:
//!     url: https://api.example.com/
//!     default: true
//!   admin:
//!     url: https://admin.example.com/
//!     header-template: '{verb} {command}'
//! ```

use crate::error::SetupError;
use crate::parser::DEFAULT_REF_REGEX;
use crate::template::{DEFAULT_HEADER_TEMPLATE, DEFAULT_OUTPUT_TEMPLATE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root structure of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Pattern that finds references in text
    pub ref_regex: String,
    /// Replacement for a resolved reference; receives `url` and all reference fields
    pub output_template: String,
    /// Registered API documents, in registration order
    #[serde(rename = "API")]
    pub apis: IndexMap<String, ApiConfig>,
    /// Skip anchor harvesting and trust the templates
    pub offline: bool,
    /// Build targets the rewrite applies to (empty = all)
    pub targets: Vec<String>,
    /// Fall back to the first registered API when none is marked default
    pub implicit_default: bool,
}

/// One API entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    pub url: String,
    #[serde(default = "default_header_template")]
    pub header_template: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

fn default_header_template() -> String {
    DEFAULT_HEADER_TEMPLATE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ref_regex: DEFAULT_REF_REGEX.to_string(),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            apis: IndexMap::new(),
            offline: false,
            targets: Vec::new(),
            implicit_default: true,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|e| SetupError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| SetupError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Whether the rewrite should run for `target`
    pub fn applies_to(&self, target: Option<&str>) -> bool {
        if self.targets.is_empty() {
            return true;
        }
        target.is_some_and(|t| self.targets.iter().any(|x| x == t))
    }
}
