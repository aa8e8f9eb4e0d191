//! Template and input validation rules.

use super::types::ValidationResult;
use crate::config::{
    Bindings, TemplateConfig, VariableType, display_enum, display_value, value_kind,
};
use crate::render::Renderer;
use serde_json::Value;
use std::collections::HashSet;

/// Full validation of a configuration.
///
/// Runs, in order: syntax validation of every configured body, declaration
/// checks, unused-variable detection and undeclared-variable detection.
pub fn validate(config: &TemplateConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    let sections = config.sections();
    let label_sections = sections.len() > 1;
    for (section, body) in sections {
        let syntax = validate_syntax(body);
        if label_sections {
            let mut labelled = ValidationResult::new();
            for error in syntax.errors {
                labelled.add_error(format!("[{}] {}", section.as_str(), error));
            }
            result.merge(labelled);
        } else {
            result.merge(syntax);
        }
    }

    result.merge(validate_variables(config));
    result.merge(check_unused_variables(config));
    result.merge(check_undeclared_variables(config));

    result
}

/// Syntax problems in one template body, as errors.
pub fn validate_syntax(body: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    for error in Renderer::shared().validate_syntax(body) {
        result.add_error(error);
    }
    result
}

/// Declaration checks: duplicate names, default type, default membership in `enum`.
pub fn validate_variables(config: &TemplateConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen = HashSet::new();

    for var in config.variables() {
        if !seen.insert(var.name.as_str()) {
            result.add_error(format!("Duplicate variable name: '{}'", var.name));
        }

        let Some(default) = &var.default else {
            continue;
        };

        if let Some(error) = type_error(&var.name, default, var.var_type) {
            result.add_error(error);
        }

        let allowed = var.allowed.as_deref().unwrap_or_default();
        if !allowed.is_empty() && !enum_contains(allowed, default) {
            result.add_error(format!(
                "Default value '{}' for variable '{}' is not in enum: {}",
                display_value(default),
                var.name,
                display_enum(allowed)
            ));
        }
    }

    result
}

/// Declared variables that no configured body references (warnings).
pub fn check_unused_variables(config: &TemplateConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    let referenced = Renderer::shared().extract_config_variables(config);
    let mut reported = HashSet::new();

    for var in config.variables() {
        if !referenced.contains(&var.name) && reported.insert(var.name.as_str()) {
            result.add_warning(format!(
                "Variable '{}' is defined but not used in template",
                var.name
            ));
        }
    }

    result
}

/// Referenced variables with no declaration (warnings).
pub fn check_undeclared_variables(config: &TemplateConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    let referenced = Renderer::shared().extract_config_variables(config);

    for name in referenced {
        if config.variable(&name).is_none() {
            result.add_warning(format!(
                "Variable '{}' is used in template but not declared",
                name
            ));
        }
    }

    result
}

/// Check caller-supplied values against the declarations.
///
/// Missing must-provide variables, type mismatches and enum violations are
/// errors; keys with no declaration are warnings.
pub fn validate_inputs(config: &TemplateConfig, inputs: &Bindings) -> ValidationResult {
    let mut result = ValidationResult::new();

    for var in config.required_variables() {
        if var.default.is_none() && !inputs.contains_key(&var.name) {
            result.add_error(format!("Missing required variable: '{}'", var.name));
        }
    }

    for (name, value) in inputs {
        let Some(var) = config.variable(name) else {
            result.add_warning(format!("Unknown variable provided: '{}'", name));
            continue;
        };

        if let Some(error) = type_error(name, value, var.var_type) {
            result.add_error(error);
        }

        let Some(allowed) = &var.allowed else {
            continue;
        };
        if !enum_contains(allowed, value) {
            result.add_error(format!(
                "Value '{}' for variable '{}' is not in allowed values: {}",
                display_value(value),
                name,
                display_enum(allowed)
            ));
        }
    }

    result
}

/// Type mismatch message for `value`, or `None` when it fits `expected`.
pub fn type_error(name: &str, value: &Value, expected: VariableType) -> Option<String> {
    if expected.matches(value) {
        return None;
    }
    Some(format!(
        "Variable '{}' has value of type {}, expected {}",
        name,
        value_kind(value),
        expected
    ))
}

/// Membership test where numbers compare by value (`1` equals `1.0`).
pub fn enum_contains(allowed: &[Value], value: &Value) -> bool {
    allowed.iter().any(|candidate| match (candidate, value) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => candidate == value,
    })
}
