//! anchors command: Show the h2 anchors harvested from API reference pages
//!
//! Useful for checking what a header template has to produce. Pages are
//! fetched in parallel.

use crate::harvest::{harvest, HttpSource};
use anyhow::{Context, Result};
use clap::Args;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Args)]
pub struct AnchorsArgs {
    /// API reference URLs (multiple allowed)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output format: json (default) or yaml
    #[arg(long, short, default_value = "json")]
    pub format: String,

    /// Timeout per URL in milliseconds
    #[arg(long, default_value = "30000")]
    pub timeout: u64,
}

/// Anchors of one page
#[derive(Debug, Serialize)]
pub struct AnchorPage {
    pub url: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    /// anchor id -> heading text
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub anchors: BTreeMap<String, String>,
}

/// Results wrapper for multiple pages
#[derive(Debug, Serialize)]
pub struct AnchorResults {
    pub pages: Vec<AnchorPage>,
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}

pub async fn run_anchors(args: AnchorsArgs) -> Result<()> {
    let url_count = args.urls.len();
    eprintln!(
        "Harvesting {} URL{}...",
        url_count,
        if url_count == 1 { "" } else { "s" }
    );

    let source = HttpSource::new(args.timeout).context("Failed to build HTTP client")?;

    let pages: Vec<AnchorPage> = join_all(args.urls.iter().map(|url| {
        let source = &source;
        async move {
            match harvest(source, url).await {
                Ok(anchors) => AnchorPage {
                    url: url.clone(),
                    ok: true,
                    err: None,
                    anchors: anchors.into_iter().collect(),
                },
                Err(e) => AnchorPage {
                    url: url.clone(),
                    ok: false,
                    err: Some(e.to_string()),
                    anchors: BTreeMap::new(),
                },
            }
        }
    }))
    .await;

    let ok_count = pages.iter().filter(|p| p.ok).count();
    let failed_count = pages.len() - ok_count;

    let output = if pages.len() == 1 {
        render(&pages[0], &args.format)?
    } else {
        let results = AnchorResults {
            pages,
            total: url_count,
            ok: ok_count,
            failed: failed_count,
        };
        render(&results, &args.format)?
    };

    println!("{}", output);
    eprintln!("Done: {}/{} OK", ok_count, url_count);

    Ok(())
}

fn render<T: Serialize>(value: &T, format: &str) -> Result<String> {
    Ok(match format {
        "yaml" | "yml" => serde_yaml::to_string(value)?,
        _ => serde_json::to_string_pretty(value)?,
    })
}
