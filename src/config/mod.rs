//! Template configuration model.
//!
//! A [`TemplateConfig`] describes one prompt template: metadata, variable
//! declarations, and either a single `template` body or a `system_prompt` /
//! `user_prompt` pair. It is validated once at construction and immutable
//! afterwards; the renderer, validator, analyzer and scorers only read it.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::{ModelConfig, Section, TemplateConfig, VariableDeclaration};
pub use operations::{TemplateConfigBuilder, is_identifier};
pub use types::{Bindings, VariableType, display_enum, display_value, value_kind};
