//! Implementation of the `prompt score` command.

use super::resolve_template;
use crate::cli::ScoreArgs;
use crate::config::Bindings;
use crate::error::{PromptError, Result};
use crate::quality::QualityReport;
use crate::registry::TemplateRegistry;
use serde::Serialize;

#[derive(Serialize)]
struct ScoreOutput<'a> {
    #[serde(flatten)]
    report: &'a QualityReport,
    is_production_ready: bool,
}

/// Execute the `prompt score` command.
///
/// Fails with a validation error (exit status 2) when `--min-score` is set
/// and the overall score falls short of it.
pub fn cmd_score(args: ScoreArgs, registry: &TemplateRegistry) -> Result<()> {
    let template = resolve_template(&args.target, registry)?;
    let report = template.score(&Bindings::new());

    println!("{}", render_report(&report, args.json)?);
    check_threshold(&report, args.min_score)
}

pub(crate) fn render_report(report: &QualityReport, json: bool) -> Result<String> {
    if !json {
        return Ok(report.format_report());
    }
    serde_json::to_string_pretty(&ScoreOutput {
        report,
        is_production_ready: report.is_production_ready(),
    })
    .map_err(|e| PromptError::configuration(format!("failed to serialize quality report: {}", e)))
}

pub(crate) fn check_threshold(report: &QualityReport, min_score: Option<u32>) -> Result<()> {
    match min_score {
        Some(min) if report.overall_score < min => Err(PromptError::validation(
            format!(
                "Quality score {} is below the minimum of {}",
                report.overall_score, min
            ),
            report.top_suggestions.clone(),
        )
        .with_suggestion("Address the top suggestions and score again")),
        _ => Ok(()),
    }
}
