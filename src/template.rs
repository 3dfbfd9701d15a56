//! Named-placeholder templates
//!
//! Used both for API header templates (`{verb} {command}`) and for the
//! output template that replaces a resolved reference. `{{` and `}}` are
//! literal braces.

use crate::error::TemplateError;
use std::collections::BTreeMap;

/// Default header template for an API
pub const DEFAULT_HEADER_TEMPLATE: &str = "{verb} {command}";

/// Default replacement for a resolved reference
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "[{verb} {command}]({url})";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string, rejecting unbalanced braces and bad names
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unbalanced {
                            template: raw.to_string(),
                            offset,
                        });
                    }
                    if !is_field_name(&name) {
                        return Err(TemplateError::InvalidName {
                            template: raw.to_string(),
                            name,
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => {
                    return Err(TemplateError::Unbalanced {
                        template: raw.to_string(),
                        offset,
                    });
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Check every placeholder against the set of fields that will be supplied
    pub fn validate<S: AsRef<str>>(&self, available: &[S]) -> Result<(), TemplateError> {
        for name in self.placeholders() {
            if !available.iter().any(|a| a.as_ref() == name) {
                return Err(TemplateError::MissingField {
                    template: self.raw.clone(),
                    field: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Substitute every placeholder from `fields`
    pub fn render(&self, fields: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = fields.get(name).ok_or_else(|| TemplateError::MissingField {
                        template: self.raw.clone(),
                        field: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '_' || c.is_alphanumeric())
}
