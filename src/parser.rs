//! Reference extraction
//!
//! A configurable regex finds API-call references in text. Named groups
//! become reference fields; `source` and `prefix` are reserved.

use crate::error::SetupError;
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;

/// Default pattern: `` `[prefix:] VERB command` ``
pub const DEFAULT_REF_REGEX: &str = r"(?P<source>`((?P<prefix>[\w-]+):\s*)?(?P<verb>POST|GET|PUT|UPDATE|DELETE)\s+(?P<command>\S+)`)";

/// Groups a pattern must define for references to resolve sensibly
pub const REQUIRED_GROUPS: [&str; 2] = ["source", "command"];

const SOURCE_GROUP: &str = "source";
const PREFIX_GROUP: &str = "prefix";

/// A reference found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Byte range of the whole match in the scanned text
    pub span: Range<usize>,
    /// Text left in place when the reference cannot be resolved
    pub source: String,
    /// Explicit API selector
    pub prefix: Option<String>,
    /// Every other named group; groups that did not participate are empty
    pub fields: BTreeMap<String, String>,
}

impl Reference {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// Compiled reference pattern and the field schema it promises
#[derive(Debug, Clone)]
pub struct RefPattern {
    regex: Regex,
    fields: Vec<String>,
    has_source: bool,
    has_prefix: bool,
}

impl RefPattern {
    /// Compile `pattern`. Returns the pattern plus warnings for missing
    /// required groups; bad syntax is fatal.
    pub fn compile(pattern: &str) -> Result<(Self, Vec<String>), SetupError> {
        let regex = Regex::new(pattern).map_err(|source| SetupError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let names: Vec<&str> = regex.capture_names().flatten().collect();
        let warnings = REQUIRED_GROUPS
            .iter()
            .filter(|g| !names.contains(g))
            .map(|g| {
                format!(
                    "regex is missing required group: {g}. References may not resolve correctly, \
                     and templates using {{{g}}} are rejected at setup"
                )
            })
            .collect();

        let fields = names
            .iter()
            .filter(|n| **n != SOURCE_GROUP && **n != PREFIX_GROUP)
            .map(|n| n.to_string())
            .collect();

        let has_source = names.contains(&SOURCE_GROUP);
        let has_prefix = names.contains(&PREFIX_GROUP);

        Ok((
            Self {
                regex,
                fields,
                has_source,
                has_prefix,
            },
            warnings,
        ))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Field names every reference from this pattern carries
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// All references in `text`, left to right, non-overlapping
    pub fn find_all(&self, text: &str) -> Vec<Reference> {
        self.regex
            .captures_iter(text)
            .map(|caps| {
                // group 0 always participates
                let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();

                let source = if self.has_source {
                    caps.name(SOURCE_GROUP).map(|m| m.as_str()).unwrap_or_default()
                } else {
                    &text[whole.clone()]
                };

                let prefix = if self.has_prefix {
                    caps.name(PREFIX_GROUP)
                        .map(|m| m.as_str())
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                } else {
                    None
                };

                let fields = self
                    .fields
                    .iter()
                    .map(|name| {
                        let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
                        (name.clone(), value.to_string())
                    })
                    .collect();

                Reference {
                    span: whole,
                    source: source.to_string(),
                    prefix,
                    fields,
                }
            })
            .collect()
    }
}
