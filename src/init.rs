//! init command: Create apilinks.yaml template
//!
//! Writes a configuration with the default pattern, output template and one
//! example API.

use crate::config::{ApiConfig, Config};
use crate::template::DEFAULT_HEADER_TEMPLATE;
use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Output file path (default: apilinks.yaml)
    #[arg(short, long, default_value = "apilinks.yaml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub created: String,
    pub file: String,
}

pub async fn run_init(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        let error = serde_json::json!({
            "error": "file_exists",
            "message": format!("{} already exists. Use --force to overwrite.", args.output.display()),
            "file": args.output.display().to_string()
        });
        println!("{}", serde_json::to_string(&error)?);
        bail!("File exists");
    }

    let yaml = serde_yaml::to_string(&template_config())?;
    tokio::fs::write(&args.output, yaml).await?;

    let output = InitOutput {
        created: Utc::now().to_rfc3339(),
        file: args.output.display().to_string(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

fn template_config() -> Config {
    let mut config = Config::default();
    config.apis.insert(
        "api".to_string(),
        ApiConfig {
            url: "https://api.example.com/reference/".to_string(),
            header_template: DEFAULT_HEADER_TEMPLATE.to_string(),
            default: true,
        },
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_roundtrips() {
        let yaml = serde_yaml::to_string(&template_config()).unwrap();
        assert!(yaml.contains("ref-regex:"));
        assert!(yaml.contains("API:"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.apis.len(), 1);
        assert!(parsed.apis["api"].default);
        assert_eq!(parsed.ref_regex, Config::default().ref_regex);
    }
}
