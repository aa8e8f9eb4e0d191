//! Implementation of the `prompt analyze` command.

use super::{bindings_from_pairs, resolve_template};
use crate::analyze::AnalysisResult;
use crate::cli::AnalyzeArgs;
use crate::error::{PromptError, Result};
use crate::registry::TemplateRegistry;

/// Execute the `prompt analyze` command.
pub fn cmd_analyze(args: AnalyzeArgs, registry: &TemplateRegistry) -> Result<()> {
    let template = resolve_template(&args.target, registry)?;
    let samples = bindings_from_pairs(&template, &args.samples);
    let models: Vec<&str> = args.models.iter().map(String::as_str).collect();

    let result = template.analyze(&samples, &models);
    println!("{}", render_result(&result, args.json)?);
    Ok(())
}

pub(crate) fn render_result(result: &AnalysisResult, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(result).map_err(|e| {
            PromptError::configuration(format!("failed to serialize analysis: {}", e))
        })
    } else {
        Ok(result.format_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::count_tokens;
    use crate::test_support::write_file;
    use serde_json::Value;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TemplateRegistry) {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "brief.yaml",
            "name: brief\nvariables:\n  - name: topic\ntemplate: \"Write about {{ topic }}\"\n",
        );
        let registry = TemplateRegistry::new(vec![dir.path().to_path_buf()]);
        (dir, registry)
    }

    #[test]
    fn test_models_and_samples_flow_into_the_analysis() {
        let (_dir, registry) = setup();
        let template = resolve_template("brief", &registry).unwrap();
        let samples = bindings_from_pairs(&template, &[("topic".to_string(), "x".repeat(400))]);

        let result = template.analyze(&samples, &["claude-3-opus"]);
        let doc: Value = serde_json::from_str(&render_result(&result, true).unwrap()).unwrap();

        assert_eq!(doc["template_name"], "brief");
        let fits = doc["token_estimate"]["model_fit"].as_array().unwrap();
        assert_eq!(fits.len(), 1);
        assert_eq!(fits[0]["model"], "claude-3-opus");
        assert_eq!(
            doc["variable_analysis"]["topic"]["estimated_tokens"],
            count_tokens(&"x".repeat(400))
        );
    }

    #[test]
    fn test_text_report() {
        let (_dir, registry) = setup();
        let template = resolve_template("brief", &registry).unwrap();
        let result = template.analyze(&Default::default(), &[]);

        let out = render_result(&result, false).unwrap();
        assert!(out.starts_with("Analysis: brief"));
        assert!(out.contains("gpt-4-turbo"));
    }

    #[test]
    fn test_cmd_analyze_accepts_file_paths() {
        let (dir, registry) = setup();
        let path = dir.path().join("brief.yaml");
        let args = AnalyzeArgs {
            target: path.display().to_string(),
            models: vec![],
            samples: vec![],
            json: false,
        };
        assert!(cmd_analyze(args, &registry).is_ok());
    }
}
