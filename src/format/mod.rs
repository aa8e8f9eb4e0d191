//! Output formats for rendered templates.
//!
//! Every format consumes the same five values: the rendered text, the
//! configuration, the bindings used, and the individually rendered system
//! and user prompts when the template is split.


use crate::config::{Bindings, TemplateConfig, display_value};
use crate::error::{PromptError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Longest variable value shown in the markdown table before truncation.
const MARKDOWN_VALUE_CHARS: usize = 50;

/// Provider hint written into chat-api metadata.
const CHAT_PROVIDER_HINT: &str = "openai";

const HEREDOC_MARKER: &str = "PROMPT_EOF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Raw,
    Json,
    Markdown,
    ChatApi,
    Env,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Raw,
        OutputFormat::Json,
        OutputFormat::Markdown,
        OutputFormat::ChatApi,
        OutputFormat::Env,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::ChatApi => "chat-api",
            OutputFormat::Env => "env",
        }
    }

    /// Format `request` stamped with the current time.
    pub fn format(&self, request: &FormatRequest<'_>) -> Result<String> {
        self.format_at(request, Utc::now())
    }

    /// Format `request` stamped with `timestamp`.
    pub fn format_at(&self, request: &FormatRequest<'_>, timestamp: DateTime<Utc>) -> Result<String> {
        let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Micros, false);
        match self {
            OutputFormat::Raw => Ok(request.rendered.to_string()),
            OutputFormat::Json => format_json(request, &timestamp),
            OutputFormat::Markdown => Ok(format_markdown(request, &timestamp)),
            OutputFormat::ChatApi => format_chat(request),
            OutputFormat::Env => Ok(format_env(request, &timestamp)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                PromptError::configuration(format!(
                    "Unknown format '{}'. Valid formats: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// The values every format is built from.
#[derive(Debug, Clone, Copy)]
pub struct FormatRequest<'a> {
    /// The template body, or both prompts joined, after rendering.
    pub rendered: &'a str,
    pub config: &'a TemplateConfig,
    pub bindings: &'a Bindings,
    pub system: Option<&'a str>,
    pub user: Option<&'a str>,
}

impl FormatRequest<'_> {
    fn is_split(&self) -> bool {
        self.system.is_some() || self.user.is_some()
    }
}

/// Format rendered output with the current time.
pub fn format_output(
    format: OutputFormat,
    rendered: &str,
    config: &TemplateConfig,
    bindings: &Bindings,
    system: Option<&str>,
    user: Option<&str>,
) -> Result<String> {
    format.format(&FormatRequest {
        rendered,
        config,
        bindings,
        system,
        user,
    })
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    template: TemplateMeta<'a>,
    rendered: &'a str,
    variables: &'a Bindings,
    metadata: Timestamped<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompts: Option<SplitPrompts<'a>>,
}

#[derive(Serialize)]
struct TemplateMeta<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct Timestamped<'a> {
    timestamp: &'a str,
}

#[derive(Serialize)]
struct SplitPrompts<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

#[derive(Serialize)]
struct ChatOutput<'a> {
    messages: Vec<ChatMessage<'a>>,
    metadata: ChatMetadata<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatMetadata<'a> {
    template: &'a str,
    version: &'a str,
    provider_hint: &'static str,
}

fn to_pretty_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PromptError::render(format!("Failed to format output as JSON: {}", e)))
}

fn format_json(request: &FormatRequest<'_>, timestamp: &str) -> Result<String> {
    let config = request.config;
    let output = JsonOutput {
        template: TemplateMeta {
            name: config.name(),
            version: config.version(),
            description: config.description(),
        },
        rendered: request.rendered,
        variables: request.bindings,
        metadata: Timestamped { timestamp },
        prompts: request.is_split().then_some(SplitPrompts {
            system: request.system,
            user: request.user,
        }),
    };
    to_pretty_json(&output)
}

fn markdown_cell(text: &str) -> String {
    let mut cell: String = if text.chars().count() > MARKDOWN_VALUE_CHARS {
        let mut truncated: String = text.chars().take(MARKDOWN_VALUE_CHARS - 3).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    };
    cell = cell.replace('|', "\\|").replace('\n', " ");
    cell
}

fn format_markdown(request: &FormatRequest<'_>, timestamp: &str) -> String {
    let config = request.config;
    let mut lines = vec![
        format!("# {}", config.name()),
        String::new(),
        format!("**Version:** {}", config.version()),
    ];
    if !config.description().is_empty() {
        lines.push(format!("**Description:** {}", config.description()));
    }
    lines.push(format!("**Generated:** {}", timestamp));
    lines.push(String::new());

    if !request.bindings.is_empty() {
        lines.push("## Variables".to_string());
        lines.push(String::new());
        lines.push("| Variable | Value |".to_string());
        lines.push("|----------|-------|".to_string());
        for (name, value) in request.bindings {
            lines.push(format!("| {} | {} |", name, markdown_cell(&display_value(value))));
        }
        lines.push(String::new());
    }

    if request.is_split() {
        for (title, body) in [("System Prompt", request.system), ("User Prompt", request.user)] {
            let Some(body) = body.filter(|b| !b.is_empty()) else {
                continue;
            };
            lines.push(format!("## {}", title));
            lines.push(String::new());
            lines.push(body.to_string());
            lines.push(String::new());
        }
    } else {
        lines.push("## Rendered Output".to_string());
        lines.push(String::new());
        lines.push(request.rendered.to_string());
    }

    lines.join("\n")
}

fn format_chat(request: &FormatRequest<'_>) -> Result<String> {
    let mut messages = Vec::new();
    if request.is_split() {
        for (role, body) in [("system", request.system), ("user", request.user)] {
            if let Some(content) = body.filter(|b| !b.is_empty()) {
                messages.push(ChatMessage { role, content });
            }
        }
    } else {
        messages.push(ChatMessage {
            role: "user",
            content: request.rendered,
        });
    }

    to_pretty_json(&ChatOutput {
        messages,
        metadata: ChatMetadata {
            template: request.config.name(),
            version: request.config.version(),
            provider_hint: CHAT_PROVIDER_HINT,
        },
    })
}

fn shell_single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

fn heredoc(lines: &mut Vec<String>, variable: &str, body: &str) {
    lines.push(format!("read -r -d '' {} << '{}'", variable, HEREDOC_MARKER));
    lines.push(body.to_string());
    lines.push(HEREDOC_MARKER.to_string());
    lines.push(format!("export {}", variable));
}

fn format_env(request: &FormatRequest<'_>, timestamp: &str) -> String {
    let config = request.config;
    let mut lines = vec![
        "#!/bin/bash".to_string(),
        format!("# Template: {} v{}", config.name(), config.version()),
        format!("# Generated: {}", timestamp),
        String::new(),
        format!("export PROMPT_TEMPLATE_NAME=\"{}\"", config.name()),
        format!("export PROMPT_TEMPLATE_VERSION=\"{}\"", config.version()),
        String::new(),
    ];

    for (name, value) in request.bindings {
        lines.push(format!(
            "export PROMPT_VAR_{}={}",
            name.to_uppercase(),
            shell_single_quote(&display_value(value))
        ));
    }
    lines.push(String::new());

    heredoc(&mut lines, "PROMPT_CONTENT", request.rendered);
    if let Some(system) = request.system {
        lines.push(String::new());
        heredoc(&mut lines, "PROMPT_SYSTEM", system);
    }
    if let Some(user) = request.user {
        lines.push(String::new());
        heredoc(&mut lines, "PROMPT_USER", user);
    }

    lines.join("\n")
}
