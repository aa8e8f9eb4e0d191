//! Pluggable template engine and the sandboxed minijinja implementation.
//!
//! minijinja has no access to host capabilities: templates can only look up
//! values from the binding map, call built-in filters/tests, and use the
//! control-flow tags. That makes a plain environment the sandbox; strictness
//! and escaping are configured per call.

use crate::config::Bindings;
use log::debug;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use std::collections::BTreeSet;
use thiserror::Error;

/// Name used for inline templates in engine diagnostics.
const INLINE_TEMPLATE_NAME: &str = "<string>";

/// Names the environment provides itself. Jinja has no `debug` global, so
/// minijinja's is removed and `debug` stays an ordinary user variable.
const ENGINE_GLOBALS: &[&str] = &["range", "dict", "namespace", "loop"];

/// Broad category of an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The body could not be parsed.
    Syntax,
    /// A referenced name was not bound.
    Undefined,
    /// A filter, test or expression failed while evaluating.
    Evaluation,
}

/// Error raised by a [`TemplateEngine`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub message: String,
    /// 1-based line of the failure, when the engine knows it.
    pub line: Option<usize>,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }
}

impl From<minijinja::Error> for EngineError {
    fn from(err: minijinja::Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => EngineErrorKind::Syntax,
            ErrorKind::UndefinedError => EngineErrorKind::Undefined,
            _ => EngineErrorKind::Evaluation,
        };
        let message = match err.detail() {
            Some(detail) => detail.to_string(),
            None => err.kind().to_string(),
        };
        Self {
            kind,
            message,
            line: err.line(),
        }
    }
}

/// The capability the renderer needs from a templating library.
///
/// Implementations must not let a body reach host capabilities (files,
/// processes, arbitrary object introspection).
pub trait TemplateEngine: Send + Sync {
    /// Parse `body`, reporting the first syntax error.
    fn parse(&self, body: &str) -> Result<(), EngineError>;

    /// Render with strict-undefined semantics.
    fn render(&self, body: &str, bindings: &Bindings) -> Result<String, EngineError>;

    /// Render where unbound names evaluate to empty.
    fn render_lenient(&self, body: &str, bindings: &Bindings) -> Result<String, EngineError>;

    /// Top-level names the body reads without assigning them, engine globals included.
    fn free_variables(&self, body: &str) -> Result<BTreeSet<String>, EngineError>;

    /// Whether `name` resolves to something the engine provides when unbound.
    fn is_global(&self, _name: &str) -> bool {
        false
    }
}

/// minijinja-backed engine: strict undefined, no autoescaping, bodies kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxedEngine;

impl SandboxedEngine {
    fn environment<'source>(undefined: UndefinedBehavior) -> Environment<'source> {
        let mut env = Environment::new();
        env.set_undefined_behavior(undefined);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.remove_global("debug");
        env
    }

    fn render_with(
        &self,
        body: &str,
        bindings: &Bindings,
        undefined: UndefinedBehavior,
    ) -> Result<String, EngineError> {
        let env = Self::environment(undefined);
        let template = env.template_from_named_str(INLINE_TEMPLATE_NAME, body)?;
        template.render(bindings).map_err(|err| {
            let mut error = EngineError::from(err);
            if error.kind == EngineErrorKind::Undefined {
                let missing: Vec<String> = filter_globals(template.undeclared_variables(false))
                    .into_iter()
                    .filter(|name| !bindings.contains_key(name))
                    .collect();
                if !missing.is_empty() {
                    error.message = format!("'{}' is undefined", missing.join("', '"));
                }
            }
            error
        })
    }
}

impl TemplateEngine for SandboxedEngine {
    fn parse(&self, body: &str) -> Result<(), EngineError> {
        let env = Self::environment(UndefinedBehavior::Strict);
        env.template_from_named_str(INLINE_TEMPLATE_NAME, body)?;
        Ok(())
    }

    fn render(&self, body: &str, bindings: &Bindings) -> Result<String, EngineError> {
        debug!("rendering template body ({} bytes, {} bindings)", body.len(), bindings.len());
        self.render_with(body, bindings, UndefinedBehavior::Strict)
    }

    fn render_lenient(&self, body: &str, bindings: &Bindings) -> Result<String, EngineError> {
        self.render_with(body, bindings, UndefinedBehavior::Lenient)
    }

    fn free_variables(&self, body: &str) -> Result<BTreeSet<String>, EngineError> {
        let env = Self::environment(UndefinedBehavior::Strict);
        let template = env.template_from_named_str(INLINE_TEMPLATE_NAME, body)?;
        Ok(template.undeclared_variables(false).into_iter().collect())
    }

    fn is_global(&self, name: &str) -> bool {
        ENGINE_GLOBALS.contains(&name)
    }
}

fn filter_globals(names: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    names
        .into_iter()
        .filter(|name| !ENGINE_GLOBALS.contains(&name.as_str()))
        .collect()
}
