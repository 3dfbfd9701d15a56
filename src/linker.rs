//! Setup of the whole engine from configuration
//!
//! All structural problems (bad regex, templates referring to fields the
//! pattern never captures, no usable API) surface here, once, before any
//! text is processed.

use crate::config::Config;
use crate::error::SetupError;
use crate::harvest::MarkupSource;
use crate::parser::RefPattern;
use crate::registry::{Registry, SkippedApi};
use crate::resolve::Mode;
use crate::rewrite::{Rewriter, OUTPUT_EXTRA_FIELDS};
use crate::template::Template;
use tracing::{info, warn};

/// A ready-to-use rewriter plus what went wrong while building it
#[derive(Debug)]
pub struct Linker {
    pub rewriter: Rewriter,
    pub skipped: Vec<SkippedApi>,
    pub warnings: Vec<String>,
}

impl Linker {
    /// Compile the pattern, validate templates and build the registry
    pub async fn from_config<S: MarkupSource>(config: &Config, source: &S) -> Result<Self, SetupError> {
        let (pattern, warnings) = RefPattern::compile(&config.ref_regex)?;
        for w in &warnings {
            warn!("{}", w);
        }

        let output = Template::parse(&config.output_template)?;
        let mut output_fields: Vec<&str> = pattern.fields().iter().map(String::as_str).collect();
        output_fields.extend(OUTPUT_EXTRA_FIELDS);
        output.validate(&output_fields)?;

        for api in config.apis.values() {
            Template::parse(&api.header_template)?.validate(pattern.fields())?;
        }

        let mode = Mode::from_offline(config.offline);
        let (registry, skipped) =
            Registry::build(&config.apis, config.offline, config.implicit_default, source).await?;

        info!(
            "{} API{} registered ({:?} mode), default: {}",
            registry.apis().len(),
            if registry.apis().len() == 1 { "" } else { "s" },
            mode,
            registry.default_name().unwrap_or("none")
        );

        Ok(Self {
            rewriter: Rewriter::new(pattern, registry, output, mode),
            skipped,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::error::TemplateError;
    use crate::harvest::StaticSource;
    use crate::template::DEFAULT_HEADER_TEMPLATE;

    fn config(offline: bool) -> Config {
        let mut config = Config {
            offline,
            ..Config::default()
        };
        config.apis.insert(
            "public".to_string(),
            ApiConfig {
                url: "https://public.example.com".to_string(),
                header_template: DEFAULT_HEADER_TEMPLATE.to_string(),
                default: false,
            },
        );
        config
    }

    #[tokio::test]
    async fn test_online_end_to_end() {
        let source = StaticSource::new().with_page(
            "https://public.example.com",
            r#"<h2 id="get-users">GET /users</h2>"#,
        );
        let linker = Linker::from_config(&config(false), &source).await.unwrap();
        assert!(linker.skipped.is_empty());
        assert!(linker.warnings.is_empty());

        let result = linker.rewriter.rewrite("`GET /users` and `GET /nope`");
        assert_eq!(
            result.text,
            "[GET /users](https://public.example.com/#get-users) and `GET /nope`"
        );
        assert_eq!(result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_output_template_validated_at_setup() {
        let mut config = config(true);
        config.output_template = "[{verb} {path}]({url})".to_string();
        let err = Linker::from_config(&config, &StaticSource::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Template(_)));
    }

    #[tokio::test]
    async fn test_header_template_validated_at_setup() {
        let mut config = config(true);
        config.apis["public"].header_template = "{verb} {url}".to_string();
        let err = Linker::from_config(&config, &StaticSource::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Template(_)));
    }

    #[tokio::test]
    async fn test_bad_regex_is_fatal() {
        let mut config = config(true);
        config.ref_regex = "(unclosed".to_string();
        let err = Linker::from_config(&config, &StaticSource::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Pattern { .. }));
    }

    #[tokio::test]
    async fn test_missing_command_group_rejects_default_header() {
        let mut config = config(true);
        config.ref_regex = r"(?P<source>`(?P<verb>GET) (?P<path>\S+)`)".to_string();
        config.output_template = "[{verb} {path}]({url})".to_string();
        let err = Linker::from_config(&config, &StaticSource::new())
            .await
            .unwrap_err();
        match err {
            SetupError::Template(TemplateError::MissingField { field, .. }) => {
                assert_eq!(field, "command")
            }
            other => panic!("expected a template error, got {other:?}"),
        }

        // a header template that only uses captured fields keeps working
        config.apis["public"].header_template = "{verb} {path}".to_string();
        let linker = Linker::from_config(&config, &StaticSource::new())
            .await
            .unwrap();
        assert_eq!(linker.warnings.len(), 1);
        let result = linker.rewriter.rewrite("`GET /users`");
        assert_eq!(result.text, "[GET /users](https://public.example.com/#get-users)");
    }

    #[tokio::test]
    async fn test_degraded_regex_still_runs() {
        let mut config = config(true);
        config.ref_regex = r"`(?P<verb>GET) (?P<command>\S+)`".to_string();
        let linker = Linker::from_config(&config, &StaticSource::new())
            .await
            .unwrap();
        assert_eq!(linker.warnings.len(), 1);
        let result = linker.rewriter.rewrite("`GET /users`");
        assert_eq!(result.text, "[GET /users](https://public.example.com/#get-users)");
    }
}
