//! Token and structure analysis.
//!
//! Estimates token usage per section and per variable, checks the estimate
//! against model context windows, measures template structure, and produces
//! free-text recommendations.

mod analyzer;
mod models;
mod tokens;
mod types;


pub use analyzer::TemplateAnalyzer;
pub use models::{
    DEFAULT_CONTEXT_LIMIT, DEFAULT_TARGET_MODELS, MODEL_LIMITS, context_limit, fits_model,
};
pub use tokens::{TokenCounter, estimate_tokens, tokenizer_available};
pub use types::{
    AnalysisResult, DescriptionQuality, ModelFit, StructuralAnalysis, TokenEstimate,
    VariableAnalysis,
};

use crate::config::{Bindings, TemplateConfig};

/// Analyze `config` with the default token counter.
pub fn analyze(config: &TemplateConfig, samples: &Bindings, models: &[&str]) -> AnalysisResult {
    TemplateAnalyzer::default().analyze(config, samples, models)
}

/// Token count of `text` with the default token counter.
pub fn count_tokens(text: &str) -> usize {
    TokenCounter::default().count(text)
}
