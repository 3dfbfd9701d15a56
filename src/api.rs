//! A registered API reference document

use crate::anchor::slug;
use crate::error::TemplateError;
use crate::template::Template;
use std::collections::{BTreeMap, HashMap};

/// One published API reference and the anchors harvested from it
#[derive(Debug, Clone)]
pub struct Api {
    name: String,
    url: String,
    header_template: Template,
    anchors: HashMap<String, String>,
    default: bool,
}

impl Api {
    /// Trailing slashes of `url` are stripped.
    pub fn new(
        name: impl Into<String>,
        url: &str,
        header_template: Template,
        anchors: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
            header_template,
            anchors,
            default: false,
        }
    }

    /// Mark this API as the fallback for unprefixed references
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn header_template(&self) -> &Template {
        &self.header_template
    }

    /// Harvested anchor id -> heading text
    pub fn anchors(&self) -> &HashMap<String, String> {
        &self.anchors
    }

    pub fn is_default(&self) -> bool {
        self.default
    }

    /// The heading this reference would have in the API document
    pub fn format_header(&self, fields: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        self.header_template.render(fields)
    }

    pub fn format_anchor(&self, fields: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        Ok(slug(&self.format_header(fields)?))
    }

    pub fn has_anchor(&self, fields: &BTreeMap<String, String>) -> Result<bool, TemplateError> {
        Ok(self.anchors.contains_key(&self.format_anchor(fields)?))
    }

    pub fn full_url(&self, fields: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        Ok(format!("{}/#{}", self.url, self.format_anchor(fields)?))
    }
}

impl std::fmt::Display for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API({})", self.name)
    }
}
