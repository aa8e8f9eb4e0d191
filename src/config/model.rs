//! Template configuration structs.

use super::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Declaration of one template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// Identifier used in the template body.
    pub name: String,

    /// Declared value type (default: string).
    #[serde(rename = "type", default)]
    pub var_type: VariableType,

    /// Whether the caller must supply a value (default: true).
    #[serde(default = "default_true")]
    pub required: bool,

    /// Fallback value; `null` means no default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default)]
    pub description: String,

    /// Allowed values, when constrained.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
}

impl VariableDeclaration {
    /// A required string variable with no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: VariableType::String,
            required: true,
            default: None,
            description: String::new(),
            allowed: None,
        }
    }

    pub fn with_type(mut self, var_type: VariableType) -> Self {
        self.var_type = var_type;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Required and without a default: omitting it at render time is an error.
    pub fn is_must_provide(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// Optional model settings. Inert metadata, never consumed by rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub model: String,

    /// Sampling temperature in [0, 2].
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum response tokens (at least 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Top-p sampling in [0, 1].
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: default_temperature(),
            max_tokens: None,
            top_p: default_top_p(),
        }
    }
}

/// Which content field of a configuration a body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    SystemPrompt,
    UserPrompt,
    Template,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::SystemPrompt => "system_prompt",
            Section::UserPrompt => "user_prompt",
            Section::Template => "template",
        }
    }
}

/// Serialized form of a template file, before structural checks.
///
/// Unknown fields are ignored for forward compatibility.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TemplateConfigFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variables: Vec<VariableDeclaration>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
    #[serde(default)]
    pub model_config: Option<ModelConfig>,
}

/// A validated, immutable template configuration.
///
/// Construct through [`TemplateConfig::builder`], [`TemplateConfig::from_yaml`],
/// [`TemplateConfig::from_json`] or [`TemplateConfig::load`]; every path enforces
/// the structural invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateConfig {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) version: String,
    pub(super) author: String,
    pub(super) tags: Vec<String>,
    pub(super) variables: Vec<VariableDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) user_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) model_config: Option<ModelConfig>,
}

impl TemplateConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn variables(&self) -> &[VariableDeclaration] {
        &self.variables
    }

    /// The single template body, if configured and non-empty.
    pub fn template(&self) -> Option<&str> {
        non_empty(&self.template)
    }

    /// The system prompt, if configured and non-empty.
    pub fn system_prompt(&self) -> Option<&str> {
        non_empty(&self.system_prompt)
    }

    /// The user prompt, if configured and non-empty.
    pub fn user_prompt(&self) -> Option<&str> {
        non_empty(&self.user_prompt)
    }

    pub fn model_config(&self) -> Option<&ModelConfig> {
        self.model_config.as_ref()
    }

    /// Whether a system or user prompt is configured.
    pub fn has_split_prompts(&self) -> bool {
        self.system_prompt().is_some() || self.user_prompt().is_some()
    }

    /// Look up a declaration by name.
    pub fn variable(&self, name: &str) -> Option<&VariableDeclaration> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Declarations with `required: true`.
    pub fn required_variables(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.variables.iter().filter(|v| v.required)
    }

    /// Declarations with `required: false`.
    pub fn optional_variables(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.variables.iter().filter(|v| !v.required)
    }

    /// Configured bodies in system, user, template order.
    pub fn sections(&self) -> Vec<(Section, &str)> {
        let mut sections = Vec::with_capacity(3);
        if let Some(system) = self.system_prompt() {
            sections.push((Section::SystemPrompt, system));
        }
        if let Some(user) = self.user_prompt() {
            sections.push((Section::UserPrompt, user));
        }
        if let Some(template) = self.template() {
            sections.push((Section::Template, template));
        }
        sections
    }

    /// System prompt, user prompt and template concatenated, as the heuristics see it.
    pub fn combined_content(&self) -> String {
        self.sections().into_iter().map(|(_, body)| body).collect()
    }

    /// The body a plain `render` produces: the template, or the split prompts
    /// joined by a blank line.
    pub fn primary_body(&self) -> Cow<'_, str> {
        if let Some(template) = self.template() {
            return Cow::Borrowed(template);
        }
        match (self.system_prompt(), self.user_prompt()) {
            (Some(system), Some(user)) => Cow::Owned(format!("{}\n\n{}", system, user)),
            (Some(only), None) | (None, Some(only)) => Cow::Borrowed(only),
            (None, None) => Cow::Borrowed(""),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
