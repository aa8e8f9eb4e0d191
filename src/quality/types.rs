//! Quality report records.

use serde::Serialize;
use std::fmt;

/// Overall score at or above which a template is considered production ready.
pub const PRODUCTION_READY_SCORE: u32 = 70;

/// One heuristic axis of the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Clarity,
    Consistency,
    Completeness,
    Efficiency,
    Structure,
}

impl QualityDimension {
    /// All dimensions in scoring order.
    pub const ALL: [QualityDimension; 5] = [
        QualityDimension::Clarity,
        QualityDimension::Consistency,
        QualityDimension::Completeness,
        QualityDimension::Efficiency,
        QualityDimension::Structure,
    ];

    /// Weight in percent; the five weights sum to 100.
    pub fn weight_percent(&self) -> u32 {
        match self {
            Self::Clarity => 25,
            Self::Consistency => 20,
            Self::Completeness => 25,
            Self::Efficiency => 15,
            Self::Structure => 15,
        }
    }

    /// Weight as a fraction of 1.0.
    pub fn weight(&self) -> f64 {
        f64::from(self.weight_percent()) / 100.0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::Consistency => "consistency",
            Self::Completeness => "completeness",
            Self::Efficiency => "efficiency",
            Self::Structure => "structure",
        }
    }

    /// Capitalized name for reports.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Clarity => "Clarity",
            Self::Consistency => "Consistency",
            Self::Completeness => "Completeness",
            Self::Efficiency => "Efficiency",
            Self::Structure => "Structure",
        }
    }
}

impl fmt::Display for QualityDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score for a single dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub dimension: QualityDimension,
    /// 0-100.
    pub score: u32,
    pub weight: f64,
    pub details: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Letter grade derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// First matching threshold wins: 90 A, 80 B, 70 C, 60 D, else F.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// One-line verdict for the grade.
    pub fn summary(&self) -> &'static str {
        match self {
            Grade::A => "Excellent quality template, ready for production use.",
            Grade::B => "Good quality template with minor improvements possible.",
            Grade::C => "Acceptable template, but several areas need attention.",
            Grade::D => "Below average quality, significant improvements recommended.",
            Grade::F => "Poor quality template, requires substantial revision.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete quality assessment of one template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub template_name: String,
    /// 0-100.
    pub overall_score: u32,
    pub grade: Grade,
    /// One entry per dimension, in [`QualityDimension::ALL`] order.
    pub dimensions: Vec<DimensionScore>,
    pub summary: String,
    /// Up to five distinct suggestions, in dimension order.
    pub top_suggestions: Vec<String>,
}

impl QualityReport {
    pub fn is_production_ready(&self) -> bool {
        self.overall_score >= PRODUCTION_READY_SCORE
    }

    pub fn dimension(&self, dimension: QualityDimension) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }

    /// Human-readable report.
    ///
    /// ```text
    /// Quality Report: summarizer
    /// ==================================================
    /// Overall Score: 82/100 (Grade: B)
    ///
    /// Dimension Scores:
    ///   Clarity: 75/100
    ///     - Clear role definition found
    ///     - Task instructions could be clearer
    /// ...
    /// Top Suggestions:
    ///   1. Add explicit task instructions
    /// ```
    pub fn format_report(&self) -> String {
        let mut lines = vec![
            format!("Quality Report: {}", self.template_name),
            "=".repeat(50),
            format!(
                "Overall Score: {}/100 (Grade: {})",
                self.overall_score, self.grade
            ),
            String::new(),
            "Dimension Scores:".to_string(),
        ];

        for score in &self.dimensions {
            lines.push(format!("  {}: {}/100", score.dimension.title(), score.score));
            for detail in score.details.iter().take(2) {
                lines.push(format!("    - {}", detail));
            }
        }

        if !self.top_suggestions.is_empty() {
            lines.push(String::new());
            lines.push("Top Suggestions:".to_string());
            for (i, suggestion) in self.top_suggestions.iter().take(5).enumerate() {
                lines.push(format!("  {}. {}", i + 1, suggestion));
            }
        }

        lines.join("\n")
    }
}
