//! apilinks: Link inline API references to published API documentation
//!
//! Pipeline:
//! - parser: find `` `[prefix:] VERB /command` `` references in text
//! - registry: API reference pages and their harvested h2 anchors
//! - resolve: pick the API and anchor a reference points at
//! - rewrite: substitute resolved references, keep the rest verbatim

pub mod anchor;
pub mod anchors;
pub mod api;
pub mod config;
pub mod error;
pub mod harvest;
pub mod init;
pub mod link;
pub mod linker;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod rewrite;
pub mod template;

pub use anchor::slug;
pub use api::Api;
pub use config::{ApiConfig, Config};
pub use error::{HarvestError, ResolveError, SetupError, TemplateError};
pub use harvest::{extract_h2_anchors, HttpSource, MarkupSource, StaticSource};
pub use linker::Linker;
pub use parser::{RefPattern, Reference};
pub use registry::Registry;
pub use resolve::{resolve, Mode};
pub use rewrite::{Rewrite, RewriteWarning, Rewriter};
pub use template::Template;
