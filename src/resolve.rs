//! Reference resolution
//!
//! Online mode only links to anchors that exist in a harvested index and
//! refuses to guess between APIs. Offline mode has no index to check, so it
//! trusts the header template and links to the prefixed or default API.

use crate::error::ResolveError;
use crate::parser::Reference;
use crate::registry::Registry;

/// How references are checked against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Anchors were harvested; links must point at an existing anchor
    Online,
    /// No anchors; links are built from templates without verification
    Offline,
}

impl Mode {
    pub fn from_offline(offline: bool) -> Self {
        if offline {
            Mode::Offline
        } else {
            Mode::Online
        }
    }
}

/// Resolve one reference to the full URL of its anchor
pub fn resolve(reference: &Reference, registry: &Registry, mode: Mode) -> Result<String, ResolveError> {
    match mode {
        Mode::Online => resolve_online(reference, registry),
        Mode::Offline => resolve_offline(reference, registry),
    }
}

fn resolve_online(reference: &Reference, registry: &Registry) -> Result<String, ResolveError> {
    let fields = &reference.fields;

    if let Some(prefix) = &reference.prefix {
        let api = registry
            .get(prefix)
            .ok_or_else(|| unknown_prefix(prefix, registry))?;
        if api.has_anchor(fields)? {
            return Ok(api.full_url(fields)?);
        }
        return Err(ResolveError::NotFound {
            header: describe(reference),
            api: Some(api.name().to_string()),
        });
    }

    let mut found = Vec::new();
    for api in registry.apis() {
        if api.has_anchor(fields)? {
            found.push(api);
        }
    }

    match found.as_slice() {
        [] => Err(ResolveError::NotFound {
            header: describe(reference),
            api: None,
        }),
        [api] => Ok(api.full_url(fields)?),
        many => Err(ResolveError::Ambiguous {
            header: describe(reference),
            apis: many.iter().map(|a| a.name().to_string()).collect(),
        }),
    }
}

fn resolve_offline(reference: &Reference, registry: &Registry) -> Result<String, ResolveError> {
    let api = match &reference.prefix {
        Some(prefix) => registry
            .get(prefix)
            .ok_or_else(|| unknown_prefix(prefix, registry))?,
        None => registry.default_api().ok_or(ResolveError::NoDefaultApi)?,
    };
    Ok(api.full_url(&reference.fields)?)
}

fn unknown_prefix(prefix: &str, registry: &Registry) -> ResolveError {
    ResolveError::UnknownPrefix {
        prefix: prefix.to_string(),
        known: registry.names(),
    }
}

/// `VERB command` when the pattern provides them, the raw source otherwise
fn describe(reference: &Reference) -> String {
    let parts: Vec<&str> = ["verb", "command"]
        .iter()
        .map(|f| reference.field(f))
        .filter(|v| !v.is_empty())
        .collect();
    if parts.is_empty() {
        reference.source.clone()
    } else {
        parts.join(" ")
    }
}
