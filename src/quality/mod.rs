//! Heuristic quality scoring.
//!
//! Each template gets a 0-100 score in five weighted dimensions, an overall
//! score and letter grade, and a short list of suggestions.

mod rules;
mod scorer;
mod types;

#[cfg(test)]
mod tests;

pub use scorer::QualityScorer;
pub use types::{DimensionScore, Grade, PRODUCTION_READY_SCORE, QualityDimension, QualityReport};

use crate::config::{Bindings, TemplateConfig};

/// Score `config` with the default token counter.
///
/// `samples` is accepted for callers that have example values at hand, but
/// scoring only looks at the static content; pass an empty map when there are none.
pub fn score(config: &TemplateConfig, samples: &Bindings) -> QualityReport {
    QualityScorer::default().score(config, samples)
}
