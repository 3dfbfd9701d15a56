//! Registry of API documents
//!
//! Built once at startup. Registration order only matters for choosing the
//! default API; lookups are by name.

use crate::api::Api;
use crate::config::ApiConfig;
use crate::error::{HarvestError, SetupError};
use crate::harvest::{harvest, MarkupSource};
use crate::template::Template;
use futures::future::join_all;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Registered APIs plus the explicitly chosen default
#[derive(Debug, Clone)]
pub struct Registry {
    apis: Vec<Api>,
    default: Option<String>,
}

/// An API that was configured but could not be harvested
#[derive(Debug)]
pub struct SkippedApi {
    pub name: String,
    pub error: HarvestError,
}

impl Registry {
    /// Build from already-constructed APIs.
    ///
    /// The first API marked default wins. Without one, the first registered
    /// API becomes the default when `implicit_default` is set.
    pub fn new(apis: Vec<Api>, implicit_default: bool) -> Result<Self, SetupError> {
        if apis.is_empty() {
            return Err(SetupError::EmptyRegistry);
        }

        for (i, api) in apis.iter().enumerate() {
            if apis[..i].iter().any(|other| other.name() == api.name()) {
                return Err(SetupError::DuplicateApi {
                    name: api.name().to_string(),
                });
            }
        }

        let marked: Vec<&Api> = apis.iter().filter(|a| a.is_default()).collect();
        if marked.len() > 1 {
            warn!(
                "several APIs are marked default, using {}",
                marked[0].name()
            );
        }

        let default = marked
            .first()
            .map(|a| a.name().to_string())
            .or_else(|| implicit_default.then(|| apis[0].name().to_string()));

        Ok(Self { apis, default })
    }

    /// Construct every configured API, harvesting anchors unless offline.
    ///
    /// Pages are fetched concurrently. A failed harvest drops only that API
    /// and is reported in the returned list; an empty registry is fatal.
    pub async fn build<S: MarkupSource>(
        configs: &IndexMap<String, ApiConfig>,
        offline: bool,
        implicit_default: bool,
        source: &S,
    ) -> Result<(Self, Vec<SkippedApi>), SetupError> {
        let mut pending = Vec::with_capacity(configs.len());
        for (name, config) in configs {
            Url::parse(&config.url).map_err(|source| SetupError::InvalidUrl {
                name: name.clone(),
                url: config.url.clone(),
                source,
            })?;
            let template = Template::parse(&config.header_template)?;
            pending.push((name, config, template));
        }

        let harvested: Vec<Result<HashMap<String, String>, HarvestError>> = if offline {
            pending.iter().map(|_| Ok(HashMap::new())).collect()
        } else {
            join_all(pending.iter().map(|(_, config, _)| harvest(source, &config.url))).await
        };

        let mut apis = Vec::with_capacity(pending.len());
        let mut skipped = Vec::new();

        for ((name, config, template), result) in pending.into_iter().zip(harvested) {
            match result {
                Ok(anchors) => {
                    debug!("API {} registered with {} anchors", name, anchors.len());
                    apis.push(
                        Api::new(name.clone(), &config.url, template, anchors)
                            .with_default(config.default),
                    );
                }
                Err(error) => {
                    warn!("{}. Skipping API {}", error, name);
                    skipped.push(SkippedApi {
                        name: name.clone(),
                        error,
                    });
                }
            }
        }

        Ok((Self::new(apis, implicit_default)?, skipped))
    }

    pub fn get(&self, name: &str) -> Option<&Api> {
        self.apis.iter().find(|a| a.name() == name)
    }

    /// APIs in registration order
    pub fn apis(&self) -> &[Api] {
        &self.apis
    }

    pub fn names(&self) -> Vec<String> {
        self.apis.iter().map(|a| a.name().to_string()).collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn default_api(&self) -> Option<&Api> {
        self.default.as_deref().and_then(|name| self.get(name))
    }
}
