//! Implementation of the `prompt validate` command.
//!
//! Loads a template file, runs the validator (and optionally the semantic
//! checks), and prints the findings. An invalid template exits with status 2.

use crate::cli::ValidateArgs;
use crate::error::{PromptError, Result};
use crate::template::Template;
use crate::validate::ValidationResult;

/// Execute the `prompt validate` command.
pub fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let template = Template::load(&args.file)?;
    let result = run_checks(&template, args.semantic);

    println!("{}", format_result(&template, &result));

    if result.is_valid {
        Ok(())
    } else {
        Err(PromptError::validation(
            format!("Template '{}' failed validation", template.name()),
            result.errors,
        )
        .with_context("path", args.file.display().to_string()))
    }
}

pub(crate) fn run_checks(template: &Template, semantic: bool) -> ValidationResult {
    let mut result = template.validate();
    if semantic {
        result.merge(template.validate_semantics().to_validation_result());
    }
    result
}

pub(crate) fn format_result(template: &Template, result: &ValidationResult) -> String {
    let mut lines = Vec::new();

    if result.is_valid {
        lines.push(format!("✓ Template '{}' is valid", template.name()));
    } else {
        lines.push(format!("✗ Template '{}' has errors:", template.name()));
        lines.extend(result.errors.iter().map(|e| format!("  • {}", e)));
    }

    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(result.warnings.iter().map(|w| format!("  • {}", w)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Variables defined: {}",
        template.config().variables().len()
    ));
    lines.push(format!(
        "Variables used in template: {}",
        template.all_variables().len()
    ));

    lines.join("\n")
}
