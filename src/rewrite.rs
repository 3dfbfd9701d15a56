//! Text rewriting
//!
//! Every reference in a body is resolved independently against the
//! original text. Resolved references are replaced with the output template;
//! the rest stay exactly as written and produce one warning each.

use crate::error::ResolveError;
use crate::parser::{RefPattern, Reference};
use crate::registry::Registry;
use crate::resolve::{resolve, Mode};
use crate::template::Template;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Field names the output template receives besides the pattern's fields
pub const OUTPUT_EXTRA_FIELDS: [&str; 3] = ["url", "source", "prefix"];

/// A reference that was left unchanged
#[derive(Debug, Clone, Serialize)]
pub struct RewriteWarning {
    pub source: String,
    pub offset: usize,
    pub reason: String,
}

impl std::fmt::Display for RewriteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} Skipping", self.source, self.reason)
    }
}

/// Result of rewriting one body
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub text: String,
    pub replaced: usize,
    pub warnings: Vec<RewriteWarning>,
}

/// Parse, resolve and substitute over text bodies
#[derive(Debug, Clone)]
pub struct Rewriter {
    pattern: RefPattern,
    registry: Registry,
    output: Template,
    mode: Mode,
}

impl Rewriter {
    pub fn new(pattern: RefPattern, registry: Registry, output: Template, mode: Mode) -> Self {
        Self {
            pattern,
            registry,
            output,
            mode,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Rewrite one body of text
    pub fn rewrite(&self, text: &str) -> Rewrite {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut replaced = 0;
        let mut warnings = Vec::new();

        for reference in self.pattern.find_all(text) {
            out.push_str(&text[last..reference.span.start]);
            last = reference.span.end;

            match self.substitute(&reference) {
                Ok(link) => {
                    replaced += 1;
                    out.push_str(&link);
                }
                Err(err) => {
                    let warning = RewriteWarning {
                        source: reference.source.clone(),
                        offset: reference.span.start,
                        reason: err.to_string(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                    out.push_str(&text[reference.span.clone()]);
                }
            }
        }
        out.push_str(&text[last..]);

        Rewrite {
            text: out,
            replaced,
            warnings,
        }
    }

    fn substitute(&self, reference: &Reference) -> Result<String, ResolveError> {
        let url = resolve(reference, &self.registry, self.mode)?;

        let mut fields: BTreeMap<String, String> = reference.fields.clone();
        fields.insert("url".to_string(), url);
        fields.insert("source".to_string(), reference.source.clone());
        fields.insert(
            "prefix".to_string(),
            reference.prefix.clone().unwrap_or_default(),
        );

        Ok(self.output.render(&fields)?)
    }
}
