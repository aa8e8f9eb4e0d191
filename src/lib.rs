//! Prompt Template: manage, validate, render and score LLM prompt templates.
//!
//! A template is a YAML or JSON [`TemplateConfig`](config::TemplateConfig)
//! holding declared variables and up to three bodies (`template`,
//! `system_prompt`, `user_prompt`) written in a Jinja-style language.
//! [`Template`](template::Template) renders them through a sandboxed engine
//! with strict undefined-variable semantics; the [`validate`], [`analyze`],
//! [`quality`] and [`semantic`] modules are independent read-only passes over
//! the same configuration.

pub mod analyze;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod format;
pub mod fs;
pub mod heuristics;
pub mod quality;
pub mod registry;
pub mod render;
pub mod semantic;
pub mod template;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use config::{Bindings, TemplateConfig, VariableDeclaration, VariableType};
pub use error::{PromptError, Result};
pub use format::OutputFormat;
pub use registry::TemplateRegistry;
pub use template::{RenderedPrompt, Template};
