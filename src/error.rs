//! Error taxonomy
//!
//! Only `SetupError` aborts a run. `HarvestError` drops a single API,
//! `ResolveError` leaves a single reference untouched.

use thiserror::Error;

/// Errors in header/output templates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unbalanced brace at offset {offset} in template {template:?}")]
    Unbalanced { template: String, offset: usize },

    #[error("invalid placeholder name {name:?} in template {template:?}")]
    InvalidName { template: String, name: String },

    #[error("template {template:?} uses field {field:?} which is not available")]
    MissingField { template: String, field: String },
}

/// Fatal configuration and startup errors
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Incorrect regex {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No APIs are set up. Try using offline mode")]
    EmptyRegistry,

    #[error("API {name:?} is registered twice")]
    DuplicateApi { name: String },

    #[error("API {name:?} has an invalid url {url:?}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to load config {path}: {message}")]
    Config { path: String, message: String },
}

/// Per-document failure while harvesting anchors
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("could not open url {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("url {url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("url {url} answered {content_type:?}, which is not markup")]
    Markup { url: String, content_type: String },
}

/// Per-reference resolution failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("\"{prefix}\" is a wrong prefix. Should be one of: {}.", .known.join(", "))]
    UnknownPrefix { prefix: String, known: Vec<String> },

    #[error("Cannot find method {header}{}.", .api.as_ref().map(|a| format!(" in {a}")).unwrap_or_default())]
    NotFound { header: String, api: Option<String> },

    #[error("{header} is present in several APIs ({}). Please, use prefix.", .apis.join(", "))]
    Ambiguous { header: String, apis: Vec<String> },

    #[error("Default API is not set.")]
    NoDefaultApi,

    #[error(transparent)]
    Template(#[from] TemplateError),
}
