//! Tests for the template facade.

use super::*;
use crate::config::{VariableDeclaration, VariableType};
use crate::error::PromptError;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn bindings(pairs: &[(&str, serde_json::Value)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn greeting() -> Template {
    Template::new(
        TemplateConfig::builder("t")
            .variable(VariableDeclaration::new("name"))
            .template("Hello, {{name}}!")
            .build()
            .unwrap(),
    )
}

fn styled() -> Template {
    Template::new(
        TemplateConfig::builder("styled")
            .variable(
                VariableDeclaration::new("style")
                    .optional()
                    .with_default("formal")
                    .with_enum(["formal", "casual"]),
            )
            .template("Style: {{style}}")
            .build()
            .unwrap(),
    )
}

#[test]
fn test_render_substitutes_variables() {
    let rendered = greeting()
        .render(&bindings(&[("name", json!("World"))]))
        .unwrap();
    assert_eq!(rendered, "Hello, World!");
}

#[test]
fn test_render_missing_required_variable() {
    let err = greeting().render(&Bindings::new()).unwrap_err();

    assert!(matches!(err, PromptError::Render(_)));
    assert!(err.message().contains("name"));
    assert_eq!(
        err.message(),
        "Invalid input values:\n  Missing required variable: 'name'"
    );
    assert_eq!(err.exit_code(), crate::exit_codes::RENDER_FAILURE);
}

#[test]
fn test_render_applies_defaults() {
    assert_eq!(styled().render(&Bindings::new()).unwrap(), "Style: formal");
    assert_eq!(
        styled()
            .render(&bindings(&[("style", json!("casual"))]))
            .unwrap(),
        "Style: casual"
    );
}

#[test]
fn test_render_rejects_values_outside_enum() {
    let err = styled()
        .render(&bindings(&[("style", json!("invalid"))]))
        .unwrap_err();

    assert!(matches!(err, PromptError::Render(_)));
    assert!(
        err.message()
            .contains("Value 'invalid' for variable 'style' is not in allowed values: [formal, casual]")
    );
    assert_eq!(
        err.details().unwrap().context.get("provided_vars").map(String::as_str),
        Some("style")
    );
}

#[test]
fn test_render_rejects_wrong_types() {
    let template = Template::new(
        TemplateConfig::builder("count")
            .variable(VariableDeclaration::new("n").with_type(VariableType::Integer))
            .template("{{ n }} items")
            .build()
            .unwrap(),
    );

    let err = template
        .render(&bindings(&[("n", json!("three"))]))
        .unwrap_err();
    assert!(err.message().contains("expected integer"));

    assert_eq!(
        template.render(&bindings(&[("n", json!(3))])).unwrap(),
        "3 items"
    );
}

#[test]
fn test_render_without_variables_is_verbatim() {
    let body = "Plain text, with punctuation: <tags> & \"quotes\".\n";
    let template = Template::new(TemplateConfig::builder("plain").template(body).build().unwrap());
    assert_eq!(template.render(&Bindings::new()).unwrap(), body);
}

#[test]
fn test_engine_failure_is_wrapped() {
    let template = Template::new(
        TemplateConfig::builder("undeclared")
            .template("Hi {{ who }}")
            .build()
            .unwrap(),
    );

    let err = template.render(&Bindings::new()).unwrap_err();
    assert!(err.message().starts_with("Failed to render template: "));
    assert!(err.message().contains("who"));
    assert_eq!(
        err.suggestion(),
        Some("Check that all required variables are provided")
    );
}

#[test]
fn test_unknown_bindings_do_not_fail_render() {
    let rendered = greeting()
        .render(&bindings(&[("name", json!("A")), ("extra", json!(1))]))
        .unwrap();
    assert_eq!(rendered, "Hello, A!");
}

#[test]
fn test_render_split_prompts() {
    let template = Template::new(
        TemplateConfig::builder("chat")
            .variable(VariableDeclaration::new("role"))
            .variable(VariableDeclaration::new("question"))
            .system_prompt("You are a {{ role }}.")
            .user_prompt("{{ question }}")
            .build()
            .unwrap(),
    );

    let values = bindings(&[("role", json!("tutor")), ("question", json!("Why?"))]);
    let prompt = template.render_split(&values).unwrap();

    assert_eq!(prompt.system.as_deref(), Some("You are a tutor."));
    assert_eq!(prompt.user.as_deref(), Some("Why?"));
    assert_eq!(prompt.rendered, "You are a tutor.\n\nWhy?");
    assert_eq!(template.render(&values).unwrap(), prompt.rendered);
}

#[test]
fn test_render_split_without_prompts() {
    let prompt = greeting()
        .render_split(&bindings(&[("name", json!("World"))]))
        .unwrap();
    assert_eq!(prompt.rendered, "Hello, World!");
    assert_eq!(prompt.system, None);
    assert_eq!(prompt.user, None);
}

#[test]
fn test_preview_uses_defaults_and_placeholders() {
    let template = Template::new(
        TemplateConfig::builder("mixed")
            .variable(VariableDeclaration::new("name"))
            .variable(VariableDeclaration::new("tone").optional().with_default("warm"))
            .template("{{ tone }} hello to {{ name }}")
            .build()
            .unwrap(),
    );

    assert_eq!(template.preview(&Bindings::new()), "warm hello to [name]");
    assert_eq!(
        template.preview(&bindings(&[("name", json!("Ada"))])),
        "warm hello to Ada"
    );
}

#[test]
fn test_preview_never_fails_on_bad_syntax() {
    let template = Template::new(
        TemplateConfig::builder("broken")
            .template("{% if x %}unterminated")
            .build()
            .unwrap(),
    );
    assert!(template.preview(&Bindings::new()).starts_with("Preview error"));
}

#[test]
fn test_required_and_all_variables() {
    let template = Template::new(
        TemplateConfig::builder("vars")
            .variable(VariableDeclaration::new("a"))
            .variable(VariableDeclaration::new("b").with_default("x"))
            .variable(VariableDeclaration::new("c").optional())
            .system_prompt("{{ a }}")
            .user_prompt("{% if b %}{{ c }}{% endif %}")
            .build()
            .unwrap(),
    );

    assert_eq!(template.required_variables(), vec!["a"]);
    let all: Vec<String> = template.all_variables().into_iter().collect();
    assert_eq!(all, vec!["a", "b", "c"]);
}

#[test]
fn test_diagnostics_delegate() {
    let template = greeting();
    assert!(template.validate().is_valid);
    assert_eq!(template.analyze(&Bindings::new(), &[]).template_name, "t");
    assert_eq!(template.score(&Bindings::new()).template_name, "t");
    assert!(template.validate_semantics().is_valid);
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("greet.yaml");
    fs::write(
        &path,
        "name: greet\nvariables:\n  - name: who\ntemplate: \"Hi {{ who }}\"\n",
    )
    .unwrap();

    let template = Template::load(&path).unwrap();
    assert_eq!(template.name(), "greet");
    assert_eq!(
        template
            .render(&bindings(&[("who", json!("there"))]))
            .unwrap(),
        "Hi there"
    );
}

#[test]
fn test_from_yaml_rejects_empty_content() {
    let err = Template::from_yaml("name: empty\ntemplate: \"\"\nsystem_prompt: \"\"\n").unwrap_err();
    assert!(matches!(err, PromptError::Configuration(_)));
}
