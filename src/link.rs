//! link command: Rewrite API references in markdown files
//!
//! Loads apilinks.yaml, harvests anchors, rewrites every markdown file in
//! place. JSON summary on stdout, diagnostics on stderr.

use crate::config::Config;
use crate::harvest::HttpSource;
use crate::linker::Linker;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

#[derive(Args)]
pub struct LinkArgs {
    /// Markdown files, directories or glob patterns
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Configuration file
    #[arg(short, long, default_value = "apilinks.yaml", env = "APILINKS_CONFIG")]
    pub config: PathBuf,

    /// Current build target, checked against `targets` in the config
    #[arg(long)]
    pub target: Option<String>,

    /// Do not fetch API pages; build links from templates only
    #[arg(long)]
    pub offline: bool,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Timeout per API page fetch in milliseconds
    #[arg(long, default_value = "30000")]
    pub timeout: u64,
}

/// Summary of a link run
#[derive(Debug, Serialize)]
pub struct LinkOutput {
    pub files: usize,
    pub changed: usize,
    pub replaced: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_apis: Vec<String>,
    pub dry_run: bool,
    pub timestamp: String,
}

/// Run the link command
pub async fn run_link(args: LinkArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if args.offline {
        config.offline = true;
    }

    if !config.applies_to(args.target.as_deref()) {
        let output = serde_json::json!({
            "skipped": true,
            "target": args.target,
            "targets": config.targets,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let source = HttpSource::new(args.timeout).context("Failed to build HTTP client")?;
    let linker = Linker::from_config(&config, &source).await?;

    let files = expand_files(&args.paths)?;
    eprintln!(
        "Linking {} file{}...",
        files.len(),
        if files.len() == 1 { "" } else { "s" }
    );

    let mut output = LinkOutput {
        files: files.len(),
        changed: 0,
        replaced: 0,
        warnings: 0,
        skipped_apis: linker.skipped.iter().map(|s| s.name.clone()).collect(),
        dry_run: args.dry_run,
        timestamp: Utc::now().to_rfc3339(),
    };

    for file in &files {
        let content = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let result = {
            let _span = info_span!("file", path = %file.display()).entered();
            linker.rewriter.rewrite(&content)
        };

        output.replaced += result.replaced;
        output.warnings += result.warnings.len();

        if result.text.is_empty() || result.text == content {
            continue;
        }
        output.changed += 1;

        if args.dry_run {
            info!("would update {}", file.display());
        } else {
            tokio::fs::write(file, &result.text)
                .await
                .with_context(|| format!("Failed to write {}", file.display()))?;
            info!("updated {}", file.display());
        }
    }

    println!("{}", serde_json::to_string(&output)?);
    eprintln!(
        "Done: {} link{} in {}/{} files, {} warning{}",
        output.replaced,
        if output.replaced == 1 { "" } else { "s" },
        output.changed,
        output.files,
        output.warnings,
        if output.warnings == 1 { "" } else { "s" }
    );

    Ok(())
}

/// Expand paths to markdown files: files as-is, directories recursively, globs
fn expand_files(patterns: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern_str = pattern.to_string_lossy();

        if pattern_str.contains('*') {
            for entry in glob::glob(&pattern_str)? {
                let path = entry?;
                if path.is_file() {
                    files.push(path);
                }
            }
        } else if pattern.is_file() {
            files.push(pattern.clone());
        } else if pattern.is_dir() {
            let nested = pattern.join("**").join("*");
            for entry in glob::glob(&nested.to_string_lossy())? {
                let path = entry?;
                if path.is_file() && is_markdown(&path) {
                    files.push(path);
                }
            }
        } else {
            anyhow::bail!("No such file or directory: {}", pattern.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "md" || ext == "markdown")
}
