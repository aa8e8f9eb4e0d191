//! The [`Template`] facade: a loaded configuration plus a renderer.
//!
//! Rendering merges declared defaults into the caller's bindings, checks the
//! result against the declarations, and only then evaluates the body. The
//! diagnostic passes (validation, analysis, scoring, semantic checks) are
//! exposed here as thin delegations so callers can hold one value.

#[cfg(test)]
mod tests;

use crate::analyze::{self, AnalysisResult};
use crate::config::{Bindings, TemplateConfig};
use crate::error::{PromptError, Result};
use crate::quality::{self, QualityReport};
use crate::render::Renderer;
use crate::semantic::{self, SemanticValidationResult};
use crate::validate::{self, ValidationResult};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Output of [`Template::render_split`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPrompt {
    /// The primary body: the template, or both prompts joined by a blank line.
    pub rendered: String,
    pub system: Option<String>,
    pub user: Option<String>,
}

/// A prompt template ready to render.
#[derive(Debug, Clone)]
pub struct Template {
    config: TemplateConfig,
    renderer: Renderer,
}

impl Template {
    pub fn new(config: TemplateConfig) -> Self {
        Self::with_renderer(config, Renderer::shared().clone())
    }

    pub fn with_renderer(config: TemplateConfig, renderer: Renderer) -> Self {
        Self { config, renderer }
    }

    /// Load a YAML or JSON template file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        TemplateConfig::load(path).map(Self::new)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        TemplateConfig::from_yaml(yaml).map(Self::new)
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Render the primary body.
    ///
    /// # Errors
    ///
    /// `PromptError::Render` when inputs fail validation (missing must-provide
    /// variables, wrong types, values outside an enum) or the engine fails.
    pub fn render(&self, bindings: &Bindings) -> Result<String> {
        let merged = self.prepare(bindings)?;
        self.render_body(&self.config.primary_body(), &merged)
    }

    /// Render the primary body and each configured prompt separately.
    pub fn render_split(&self, bindings: &Bindings) -> Result<RenderedPrompt> {
        let merged = self.prepare(bindings)?;
        let rendered = self.render_body(&self.config.primary_body(), &merged)?;
        let system = self
            .config
            .system_prompt()
            .map(|body| self.render_body(body, &merged))
            .transpose()?;
        let user = self
            .config
            .user_prompt()
            .map(|body| self.render_body(body, &merged))
            .transpose()?;

        Ok(RenderedPrompt {
            rendered,
            system,
            user,
        })
    }

    /// Best-effort render: defaults are applied and anything still missing
    /// shows as `[name]`. Never fails.
    pub fn preview(&self, partial: &Bindings) -> String {
        let merged = self.with_defaults(partial);
        self.renderer.preview(&self.config.primary_body(), &merged)
    }

    /// Names of variables that must be provided at render time.
    pub fn required_variables(&self) -> Vec<&str> {
        self.config
            .variables()
            .iter()
            .filter(|v| v.is_must_provide())
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Every variable referenced by any configured body.
    pub fn all_variables(&self) -> BTreeSet<String> {
        self.renderer.extract_config_variables(&self.config)
    }

    pub fn validate(&self) -> ValidationResult {
        validate::validate(&self.config)
    }

    pub fn analyze(&self, samples: &Bindings, models: &[&str]) -> AnalysisResult {
        analyze::analyze(&self.config, samples, models)
    }

    pub fn score(&self, samples: &Bindings) -> QualityReport {
        quality::score(&self.config, samples)
    }

    pub fn validate_semantics(&self) -> SemanticValidationResult {
        semantic::validate_semantics(&self.config)
    }

    fn with_defaults(&self, bindings: &Bindings) -> Bindings {
        let mut merged = bindings.clone();
        for var in self.config.variables() {
            let Some(default) = &var.default else {
                continue;
            };
            merged
                .entry(var.name.clone())
                .or_insert_with(|| default.clone());
        }
        merged
    }

    fn prepare(&self, bindings: &Bindings) -> Result<Bindings> {
        let merged = self.with_defaults(bindings);
        let validation = validate::validate_inputs(&self.config, &merged);
        if !validation.is_valid {
            let provided: Vec<&str> = bindings.keys().map(String::as_str).collect();
            return Err(PromptError::render(format!(
                "Invalid input values:\n  {}",
                validation.errors.join("\n  ")
            ))
            .with_context("provided_vars", provided.join(", ")));
        }
        for warning in &validation.warnings {
            debug!("{}: {}", self.name(), warning);
        }
        Ok(merged)
    }

    fn render_body(&self, body: &str, merged: &Bindings) -> Result<String> {
        self.renderer.render(body, merged).map_err(|err| {
            let names: Vec<&str> = merged.keys().map(String::as_str).collect();
            PromptError::render(format!("Failed to render template: {}", err.message()))
                .with_suggestion("Check that all required variables are provided")
                .with_context("variables", names.join(", "))
        })
    }
}
