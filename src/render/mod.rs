//! Template rendering.
//!
//! This module wraps a [`TemplateEngine`] with the operations the rest of the
//! crate needs:
//!
//! - [`Renderer::render`] - strict rendering (unbound names are errors)
//! - [`Renderer::extract_variables`] - static free-variable extraction with a
//!   regex fallback for bodies that do not parse
//! - [`Renderer::validate_syntax`] - parser errors plus brace-balance checks
//! - [`Renderer::preview`] - best-effort rendering with `[name]` placeholders
//!
//! # Error Handling
//!
//! Only `render` fails. Extraction, syntax validation and preview are used by
//! diagnostics and always produce a result.

mod engine;


pub use engine::{EngineError, EngineErrorKind, SandboxedEngine, TemplateEngine};

use crate::config::{Bindings, TemplateConfig};
use crate::error::{PromptError, Result};
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// `{{ name` tokens, used when a body cannot be parsed.
static VARIABLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)").expect("variable token regex is valid")
});

static SHARED: LazyLock<Renderer> = LazyLock::new(Renderer::default);

/// Renders template bodies through a sandboxed engine.
#[derive(Clone)]
pub struct Renderer {
    engine: Arc<dyn TemplateEngine>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::with_engine(SandboxedEngine)
    }
}

impl Renderer {
    /// A renderer backed by the given engine.
    pub fn with_engine(engine: impl TemplateEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Process-wide renderer using the sandboxed engine.
    pub fn shared() -> &'static Renderer {
        &SHARED
    }

    /// Render `body` against `bindings` with strict-undefined semantics.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The rendered text
    /// * `Err(PromptError::Render)` - Syntax error, unbound name, or failed expression
    pub fn render(&self, body: &str, bindings: &Bindings) -> Result<String> {
        self.engine
            .render(body, bindings)
            .map_err(|err| render_error(&err))
    }

    /// Every free variable referenced by `body`, including inside control blocks.
    ///
    /// Falls back to scanning for `{{ name` tokens when the body does not parse.
    /// Engine globals such as `range` are left out.
    pub fn extract_variables(&self, body: &str) -> BTreeSet<String> {
        self.referenced_names(body)
            .into_iter()
            .filter(|name| !self.engine.is_global(name))
            .collect()
    }

    /// Variables referenced by any configured body of `config`.
    ///
    /// A name the config declares is always reported, even when it matches
    /// an engine global, because the binding shadows the global at render time.
    pub fn extract_config_variables(&self, config: &TemplateConfig) -> BTreeSet<String> {
        config
            .sections()
            .into_iter()
            .flat_map(|(_, body)| self.referenced_names(body))
            .filter(|name| !self.engine.is_global(name) || config.variable(name).is_some())
            .collect()
    }

    fn referenced_names(&self, body: &str) -> BTreeSet<String> {
        match self.engine.free_variables(body) {
            Ok(names) => names,
            Err(err) => {
                debug!("variable extraction fell back to regex scan: {}", err);
                extract_variables_regex(body)
            }
        }
    }

    /// Human-readable syntax problems; empty when the body is well formed.
    pub fn validate_syntax(&self, body: &str) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(err) = self.engine.parse(body) {
            errors.push(format!("Syntax error: {}", err.message));
            if let Some(line) = err.line {
                errors.push(format!("  at line {}", line));
            }
        }

        let open_braces = body.matches("{{").count();
        let close_braces = body.matches("}}").count();
        if open_braces != close_braces {
            errors.push(format!(
                "Unbalanced braces: {} opening '{{{{' vs {} closing '}}}}'",
                open_braces, close_braces
            ));
        }

        if body.contains("{%") {
            let open_blocks = body.matches("{%").count();
            let close_blocks = body.matches("%}").count();
            if open_blocks != close_blocks {
                errors.push(format!(
                    "Unbalanced block tags: {} opening '{{% ' vs {} closing ' %}}'",
                    open_blocks, close_blocks
                ));
            }
        }

        errors
    }

    /// Render leniently, showing `[name]` for every variable not in `partial`.
    ///
    /// Never fails: engine errors are returned as a `Preview error ...` line.
    pub fn preview(&self, body: &str, partial: &Bindings) -> String {
        let mut bindings = partial.clone();
        for name in self.extract_variables(body) {
            bindings
                .entry(name)
                .or_insert_with_key(|name| Value::String(format!("[{}]", name)));
        }

        match self.engine.render_lenient(body, &bindings) {
            Ok(text) => text,
            Err(err) => match err.kind {
                EngineErrorKind::Syntax => format!("Preview error (syntax): {}", err.message),
                EngineErrorKind::Undefined => {
                    format!("Preview error (undefined variable): {}", err.message)
                }
                EngineErrorKind::Evaluation => format!("Preview error: {}", err.message),
            },
        }
    }
}

fn extract_variables_regex(body: &str) -> BTreeSet<String> {
    VARIABLE_TOKEN
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn render_error(err: &EngineError) -> PromptError {
    let error = match err.kind {
        EngineErrorKind::Syntax => {
            PromptError::render(format!("Template syntax error: {}", err.message))
        }
        EngineErrorKind::Undefined => {
            PromptError::render(format!("Undefined variable: {}", err.message))
        }
        EngineErrorKind::Evaluation => {
            PromptError::render(format!("Template evaluation failed: {}", err.message))
        }
    };
    match err.line {
        Some(line) => error.with_context("line", line.to_string()),
        None => error,
    }
}
