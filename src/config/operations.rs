//! Config loading, structural validation, and construction.

use super::model::{ModelConfig, TemplateConfig, TemplateConfigFile, VariableDeclaration};
use super::types::default_version;
use crate::error::{ErrorDetails, PromptError, Result};
use log::debug;
use serde_json::Value;
use std::path::Path;

impl TemplateConfig {
    /// Start building a configuration programmatically.
    pub fn builder(name: impl Into<String>) -> TemplateConfigBuilder {
        TemplateConfigBuilder::new(name)
    }

    /// Load a configuration from a YAML (`.yaml`/`.yml`) or JSON (`.json`) file.
    ///
    /// # Returns
    ///
    /// * `Ok(TemplateConfig)` - Successfully loaded and validated config
    /// * `Err(PromptError::NotFound)` - The file does not exist
    /// * `Err(PromptError::Validation)` - The content could not be parsed
    /// * `Err(PromptError::Configuration)` - The content violates a structural invariant
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(
                PromptError::not_found(format!("Template file not found: {}", path.display()))
                    .with_suggestion("Check the file path and ensure the file exists")
                    .with_context("path", path.display().to_string()),
            );
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PromptError::io(
                format!("failed to read template file '{}'", path.display()),
                e,
            )
        })?;

        let source = path.display().to_string();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!("loading template configuration from {}", source);
        if is_json {
            Self::parse_json(&content, &source)
        } else {
            Self::parse_yaml(&content, &source)
        }
    }

    /// Parse a configuration from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse_yaml(yaml, "<string>")
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse_json(json, "<string>")
    }

    /// Build a configuration from an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self> {
        Self::from_document(value, "<value>")
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PromptError::configuration(format!("failed to serialize template to YAML: {}", e))
        })
    }

    /// Serialize config to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PromptError::configuration(format!("failed to serialize template to JSON: {}", e))
        })
    }

    fn parse_yaml(content: &str, source: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(content).map_err(|e| {
            PromptError::validation(format!("Failed to parse YAML: {}", e), vec![e.to_string()])
                .with_suggestion("Check YAML syntax and indentation")
                .with_context("source", source)
        })?;
        Self::from_document(document, source)
    }

    fn parse_json(content: &str, source: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content).map_err(|e| {
            PromptError::validation(format!("Failed to parse JSON: {}", e), vec![e.to_string()])
                .with_suggestion("Check JSON syntax")
                .with_context("source", source)
        })?;
        Self::from_document(document, source)
    }

    fn from_document(document: Value, source: &str) -> Result<Self> {
        if !document.is_object() {
            return Err(PromptError::validation(
                "Template must be a YAML dictionary/object",
                vec![format!("expected a mapping, got {}", document_kind(&document))],
            )
            .with_suggestion("Ensure template starts with key-value pairs, not a list")
            .with_context("source", source)
            .with_context("got_type", document_kind(&document)));
        }

        let file: TemplateConfigFile = serde_json::from_value(document).map_err(|e| {
            PromptError::validation(
                format!("Invalid template configuration:\n  {}", e),
                vec![e.to_string()],
            )
            .with_context("source", source)
        })?;

        Self::from_file(file).map_err(|e| e.with_context("source", source))
    }

    pub(crate) fn from_file(file: TemplateConfigFile) -> Result<Self> {
        let config = TemplateConfig {
            name: file.name,
            description: file.description,
            version: file.version,
            author: file.author,
            tags: file.tags,
            variables: file.variables,
            template: file.template,
            system_prompt: file.system_prompt,
            user_prompt: file.user_prompt,
            model_config: file.model_config,
        };
        config.validate_structure()?;
        Ok(config)
    }

    /// Check the structural invariants every configuration must satisfy.
    ///
    /// Rules:
    /// - `name` is non-blank and contains only letters, digits, spaces, hyphens, underscores
    /// - every variable name is an identifier (letters/digits/underscore, not digit-leading)
    /// - at least one of `template`, `system_prompt`, `user_prompt` is non-blank
    /// - `model_config` values are in range
    ///
    /// Duplicate variable names and default/enum conflicts are reported by the validator,
    /// not here.
    pub fn validate_structure(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name: Template name cannot be empty".to_string());
        } else if !self
            .name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        {
            errors.push(format!(
                "name: Template name '{}' should only contain letters, numbers, hyphens, underscores, and spaces",
                self.name
            ));
        }

        for (index, var) in self.variables.iter().enumerate() {
            if !is_identifier(&var.name) {
                errors.push(format!(
                    "variables.{}.name: Variable name '{}' must be a valid identifier \
                     (letters, digits, underscores, not starting with a digit)",
                    index, var.name
                ));
            }
        }

        let has_content = [&self.template, &self.system_prompt, &self.user_prompt]
            .iter()
            .any(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()));
        if !has_content {
            errors.push(
                "template: Template content cannot be empty (set template, system_prompt or user_prompt)"
                    .to_string(),
            );
        }

        if let Some(model) = &self.model_config {
            errors.extend(model_config_errors(model));
        }

        if errors.is_empty() {
            return Ok(());
        }

        let mut details = ErrorDetails::new(format!(
            "Invalid template configuration:\n  {}",
            errors.join("\n  ")
        ));
        details.context.insert("errors".to_string(), errors.join("; "));
        Err(PromptError::Configuration(details))
    }
}

fn model_config_errors(model: &ModelConfig) -> Vec<String> {
    let mut errors = Vec::new();
    if !(0.0..=2.0).contains(&model.temperature) {
        errors.push(format!(
            "model_config.temperature: must be between 0.0 and 2.0 (got {})",
            model.temperature
        ));
    }
    if !(0.0..=1.0).contains(&model.top_p) {
        errors.push(format!(
            "model_config.top_p: must be between 0.0 and 1.0 (got {})",
            model.top_p
        ));
    }
    if model.max_tokens == Some(0) {
        errors.push("model_config.max_tokens: must be at least 1".to_string());
    }
    errors
}

/// Letters, digits and underscores, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn document_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Programmatic constructor for [`TemplateConfig`].
#[derive(Debug, Clone)]
pub struct TemplateConfigBuilder {
    file: TemplateConfigFile,
}

impl TemplateConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            file: TemplateConfigFile {
                name: name.into(),
                description: String::new(),
                version: default_version(),
                author: String::new(),
                tags: Vec::new(),
                variables: Vec::new(),
                template: None,
                system_prompt: None,
                user_prompt: None,
                model_config: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.file.description = description.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.file.version = version.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.file.author = author.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.file.tags.push(tag.into());
        self
    }

    pub fn variable(mut self, variable: VariableDeclaration) -> Self {
        self.file.variables.push(variable);
        self
    }

    pub fn template(mut self, body: impl Into<String>) -> Self {
        self.file.template = Some(body.into());
        self
    }

    pub fn system_prompt(mut self, body: impl Into<String>) -> Self {
        self.file.system_prompt = Some(body.into());
        self
    }

    pub fn user_prompt(mut self, body: impl Into<String>) -> Self {
        self.file.user_prompt = Some(body.into());
        self
    }

    pub fn model_config(mut self, model_config: ModelConfig) -> Self {
        self.file.model_config = Some(model_config);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<TemplateConfig> {
        TemplateConfig::from_file(self.file)
    }
}
