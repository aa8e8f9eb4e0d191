//! Semantic findings and the aggregate result.

use crate::validate::ValidationResult;
use serde::Serialize;
use std::fmt;

/// Category of a semantic finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticIssueType {
    RoleConfusion,
    InstructionClarity,
    ContextCoherence,
    TaskAlignment,
    PlaceholderQuality,
    PromptStructure,
}

impl SemanticIssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleConfusion => "role_confusion",
            Self::InstructionClarity => "instruction_clarity",
            Self::ContextCoherence => "context_coherence",
            Self::TaskAlignment => "task_alignment",
            Self::PlaceholderQuality => "placeholder_quality",
            Self::PromptStructure => "prompt_structure",
        }
    }
}

impl fmt::Display for SemanticIssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of the configuration a finding points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueLocation {
    SystemPrompt,
    UserPrompt,
    Template,
    Description,
    Variables,
}

impl IssueLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemPrompt => "system_prompt",
            Self::UserPrompt => "user_prompt",
            Self::Template => "template",
            Self::Description => "description",
            Self::Variables => "variables",
        }
    }
}

impl fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticIssue {
    #[serde(rename = "type")]
    pub issue_type: SemanticIssueType,
    pub severity: Severity,
    pub message: String,
    pub location: IssueLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SemanticIssue {
    /// An informational finding with a suggestion.
    pub fn info(
        issue_type: SemanticIssueType,
        location: IssueLocation,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity: Severity::Info,
            message: message.into(),
            location,
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Findings of a semantic validation pass plus four 0-100 sub-scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticValidationResult {
    /// False only when an error-severity issue was recorded.
    pub is_valid: bool,
    pub issues: Vec<SemanticIssue>,
    pub role_clarity: u32,
    pub instruction_clarity: u32,
    pub context_coherence: u32,
    pub task_alignment: u32,
}

impl Default for SemanticValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
            role_clarity: 100,
            instruction_clarity: 100,
            context_coherence: 100,
            task_alignment: 100,
        }
    }
}

impl SemanticValidationResult {
    pub fn add_issue(&mut self, issue: SemanticIssue) {
        if issue.severity == Severity::Error {
            self.is_valid = false;
        }
        self.issues.push(issue);
    }

    /// Issues of one category, in the order found.
    pub fn issues_of(&self, issue_type: SemanticIssueType) -> impl Iterator<Item = &SemanticIssue> {
        self.issues.iter().filter(move |i| i.issue_type == issue_type)
    }

    /// Fold into the generic validation shape.
    ///
    /// Messages are prefixed with `[Semantic]` and carry the suggestion in
    /// parentheses. Errors stay errors; warnings and infos become warnings.
    pub fn to_validation_result(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        for issue in &self.issues {
            let mut message = format!("[Semantic] {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                message.push_str(&format!(" (Suggestion: {})", suggestion));
            }
            match issue.severity {
                Severity::Error => result.add_error(message),
                Severity::Warning | Severity::Info => result.add_warning(message),
            }
        }
        result
    }
}
