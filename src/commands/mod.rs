//! Command implementations for `prompt`.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers they share: building the registry from
//! the search path flags, resolving a name-or-file argument, and turning
//! `key=value` strings into typed bindings.

mod analyze;
mod init;
mod list;
mod run;
mod score;
mod show;
mod validate_cmd;

use crate::cli::Command;
use crate::config::{Bindings, VariableType};
use crate::error::{PromptError, Result};
use crate::registry::TemplateRegistry;
use crate::template::Template;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
///
/// `search_paths` are the `--path` flags, searched before the environment
/// and default locations.
pub fn dispatch(command: Command, search_paths: &[PathBuf]) -> Result<()> {
    match command {
        Command::List(args) => list::cmd_list(args, &registry(search_paths)),
        Command::Show(args) => show::cmd_show(args, &registry(search_paths)),
        Command::Run(args) => run::cmd_run(args, &registry(search_paths)),
        Command::Validate(args) => validate_cmd::cmd_validate(args),
        Command::Analyze(args) => analyze::cmd_analyze(args, &registry(search_paths)),
        Command::Score(args) => score::cmd_score(args, &registry(search_paths)),
        Command::Init(args) => init::cmd_init(args),
    }
}

/// Registry over `search_paths` (in order), then the environment and defaults.
pub(crate) fn registry(search_paths: &[PathBuf]) -> TemplateRegistry {
    let mut registry = TemplateRegistry::from_env();
    for path in search_paths.iter().rev() {
        registry.add_search_path(path.clone());
    }
    registry
}

/// Load `target` as a file when it names one, otherwise through the registry.
pub(crate) fn resolve_template(target: &str, registry: &TemplateRegistry) -> Result<Template> {
    let path = Path::new(target);
    if path.is_file() {
        debug!("Loading template file {}", path.display());
        Template::load(path)
    } else {
        registry.load(target)
    }
}

/// Interpret a command-line string as a value of the declared type.
///
/// Values that do not parse stay strings so input validation can report
/// the type mismatch.
pub(crate) fn coerce_value(declared: Option<VariableType>, raw: &str) -> Value {
    let coerced = match declared {
        Some(VariableType::Integer) => raw.trim().parse::<i64>().ok().map(Value::from),
        Some(VariableType::Float) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::from),
        Some(VariableType::Boolean) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        Some(VariableType::List) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_array),
        Some(VariableType::Object) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_object),
        Some(VariableType::String) | None => None,
    };
    coerced.unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Bindings from `key=value` pairs, typed by the template's declarations.
pub(crate) fn bindings_from_pairs(template: &Template, pairs: &[(String, String)]) -> Bindings {
    pairs
        .iter()
        .map(|(key, raw)| {
            let declared = template.config().variable(key).map(|v| v.var_type);
            (key.clone(), coerce_value(declared, raw))
        })
        .collect()
}

/// Bindings from a JSON file holding an object.
pub(crate) fn bindings_from_json_file(path: &Path) -> Result<Bindings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PromptError::io(format!("failed to read JSON input '{}'", path.display()), e)
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        PromptError::configuration(format!("Error parsing JSON: {}", e))
            .with_context("path", path.display().to_string())
    })?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(PromptError::configuration(
            "JSON input must be an object of variable values",
        )
        .with_context("path", path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EnvGuard, write_file, write_template};
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_coerce_value_by_declared_type() {
        assert_eq!(coerce_value(Some(VariableType::Integer), "42"), json!(42));
        assert_eq!(coerce_value(Some(VariableType::Float), "2.5"), json!(2.5));
        assert_eq!(coerce_value(Some(VariableType::Boolean), "Yes"), json!(true));
        assert_eq!(coerce_value(Some(VariableType::Boolean), "0"), json!(false));
        assert_eq!(coerce_value(Some(VariableType::List), "[1, 2]"), json!([1, 2]));
        assert_eq!(
            coerce_value(Some(VariableType::Object), r#"{"a": 1}"#),
            json!({"a": 1})
        );
        assert_eq!(coerce_value(Some(VariableType::String), "42"), json!("42"));
        assert_eq!(coerce_value(None, "true"), json!("true"));
    }

    #[test]
    fn test_coerce_value_keeps_unparseable_strings() {
        assert_eq!(coerce_value(Some(VariableType::Integer), "three"), json!("three"));
        assert_eq!(coerce_value(Some(VariableType::Float), "NaN"), json!("NaN"));
        assert_eq!(coerce_value(Some(VariableType::List), "{}"), json!("{}"));
    }

    #[test]
    fn test_bindings_from_json_file() {
        let dir = TempDir::new().unwrap();
        let good = write_file(dir.path(), "vars.json", r#"{"n": 3, "name": "Ada"}"#);
        let list = write_file(dir.path(), "list.json", "[1, 2]");
        let broken = write_file(dir.path(), "broken.json", "{");

        let bindings = bindings_from_json_file(&good).unwrap();
        assert_eq!(bindings.get("n"), Some(&json!(3)));
        assert_eq!(bindings.get("name"), Some(&json!("Ada")));

        assert!(matches!(
            bindings_from_json_file(&list).unwrap_err(),
            PromptError::Configuration(_)
        ));
        assert!(
            bindings_from_json_file(&broken)
                .unwrap_err()
                .message()
                .starts_with("Error parsing JSON")
        );
        assert!(matches!(
            bindings_from_json_file(&dir.path().join("missing.json")).unwrap_err(),
            PromptError::Io { .. }
        ));
    }

    #[test]
    #[serial]
    fn test_registry_puts_flag_paths_first() {
        let _env = EnvGuard::set(crate::registry::SEARCH_PATH_ENV, "");
        let registry = registry(&[PathBuf::from("a"), PathBuf::from("b")]);

        let paths = registry.search_paths();
        assert_eq!(paths[0], PathBuf::from("a"));
        assert_eq!(paths[1], PathBuf::from("b"));
        assert_eq!(paths[2], PathBuf::from("templates"));
    }

    #[test]
    fn test_resolve_template_by_file_or_name() {
        let dir = TempDir::new().unwrap();
        let path = write_template(dir.path(), "greet.yaml", "greet");
        let registry = TemplateRegistry::new(vec![dir.path().to_path_buf()]);

        let by_file = resolve_template(path.to_str().unwrap(), &registry).unwrap();
        assert_eq!(by_file.name(), "greet");

        let by_name = resolve_template("greet", &registry).unwrap();
        assert_eq!(by_name.name(), "greet");

        assert!(matches!(
            resolve_template("nope", &registry).unwrap_err(),
            PromptError::NotFound(_)
        ));
    }
}
