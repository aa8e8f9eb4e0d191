//! Semantic validation: advisory checks on how a prompt reads.
//!
//! Findings cover role definition, instruction clarity, duplicated context
//! between prompts, description/content alignment, placeholders used without
//! surrounding context, and overall prompt structure. No current check
//! produces an error, so results are always valid.

mod rules;
mod types;
mod validator;


pub use types::{
    IssueLocation, SemanticIssue, SemanticIssueType, SemanticValidationResult, Severity,
};
pub use validator::validate_semantics;
