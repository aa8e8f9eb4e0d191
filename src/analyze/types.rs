//! Analysis result records.

use crate::config::VariableType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Token counts for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenEstimate {
    pub template_tokens: usize,
    pub system_prompt_tokens: Option<usize>,
    pub user_prompt_tokens: Option<usize>,
    /// Variable name to estimated contribution.
    pub estimated_variable_tokens: BTreeMap<String, usize>,
    /// Sum of the section counts.
    pub total_static_tokens: usize,
    /// Static tokens minus two per declared variable plus the variable estimates, floored at 0.
    pub estimated_total: usize,
    /// One entry per checked model, in the order requested.
    pub model_fit: Vec<ModelFit>,
}

impl TokenEstimate {
    /// Fit result for one model, if it was checked.
    pub fn fits(&self, model: &str) -> Option<bool> {
        self.model_fit
            .iter()
            .find(|fit| fit.model == model)
            .map(|fit| fit.fits)
    }
}

/// Whether an estimate fits one model's context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelFit {
    pub model: String,
    pub context_limit: usize,
    pub fits: bool,
}

/// How well a variable is documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionQuality {
    Missing,
    /// Twenty characters or fewer.
    Minimal,
    Good,
}

impl DescriptionQuality {
    pub fn of(description: &str) -> Self {
        match description.chars().count() {
            0 => Self::Missing,
            1..=20 => Self::Minimal,
            _ => Self::Good,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Minimal => "minimal",
            Self::Good => "good",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableAnalysis {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub estimated_tokens: usize,
    /// Occurrences of `{{ name }}` across all content.
    pub usage_count: usize,
    pub in_system_prompt: bool,
    pub in_user_prompt: bool,
    pub description_quality: DescriptionQuality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralAnalysis {
    pub has_system_prompt: bool,
    pub has_user_prompt: bool,
    pub has_template: bool,
    pub uses_conditionals: bool,
    pub uses_loops: bool,
    pub nesting_depth: usize,
    /// Markdown headers, XML-like tags and `===` markers.
    pub section_count: usize,
}

/// Everything [`analyze`](super::analyze) learns about a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub template_name: String,
    pub token_estimate: TokenEstimate,
    /// Keyed by variable name; duplicate declarations collapse to the last one.
    pub variable_analysis: BTreeMap<String, VariableAnalysis>,
    pub structural_analysis: StructuralAnalysis,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Plain-text report for terminal output.
    pub fn format_report(&self) -> String {
        let tokens = &self.token_estimate;
        let structure = &self.structural_analysis;
        let mut lines = vec![
            format!("Analysis: {}", self.template_name),
            "=".repeat(50),
            "Tokens:".to_string(),
        ];

        if let Some(system) = tokens.system_prompt_tokens {
            lines.push(format!("  System prompt: {}", system));
        }
        if let Some(user) = tokens.user_prompt_tokens {
            lines.push(format!("  User prompt: {}", user));
        }
        if structure.has_template {
            lines.push(format!("  Template: {}", tokens.template_tokens));
        }
        lines.push(format!("  Static total: {}", tokens.total_static_tokens));
        lines.push(format!("  Estimated total: {}", tokens.estimated_total));

        if !tokens.model_fit.is_empty() {
            lines.push(String::new());
            lines.push("Model fit:".to_string());
            for fit in &tokens.model_fit {
                let mark = if fit.fits { "fits" } else { "too large" };
                lines.push(format!("  {} ({} tokens): {}", fit.model, fit.context_limit, mark));
            }
        }

        if !self.variable_analysis.is_empty() {
            lines.push(String::new());
            lines.push("Variables:".to_string());
            for var in self.variable_analysis.values() {
                lines.push(format!(
                    "  {} ({}): ~{} tokens, used {}x, description {}",
                    var.name,
                    var.var_type,
                    var.estimated_tokens,
                    var.usage_count,
                    var.description_quality.as_str()
                ));
            }
        }

        lines.push(String::new());
        lines.push("Structure:".to_string());
        lines.push(format!("  Conditionals: {}", yes_no(structure.uses_conditionals)));
        lines.push(format!("  Loops: {}", yes_no(structure.uses_loops)));
        lines.push(format!("  Nesting depth: {}", structure.nesting_depth));
        lines.push(format!("  Sections: {}", structure.section_count));

        if !self.recommendations.is_empty() {
            lines.push(String::new());
            lines.push("Recommendations:".to_string());
            for recommendation in &self.recommendations {
                lines.push(format!("  - {}", recommendation));
            }
        }

        lines.join("\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
