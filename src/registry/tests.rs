//! Tests for template discovery.

use super::*;
use crate::exit_codes;
use crate::test_support::{EnvGuard, write_file, write_template};
use serial_test::serial;
use tempfile::TempDir;

fn registry(dirs: &[&TempDir]) -> TemplateRegistry {
    TemplateRegistry::new(dirs.iter().map(|d| d.path().to_path_buf()).collect())
}

#[test]
fn test_find_by_file_name() {
    let dir = TempDir::new().unwrap();
    let yaml = write_template(dir.path(), "greet.yaml", "greet");
    let yml = write_template(dir.path(), "other.yml", "other");
    let json = write_file(
        dir.path(),
        "data.json",
        r#"{"name": "data", "template": "{{ x }}"}"#,
    );

    let registry = registry(&[&dir]);
    assert_eq!(registry.find("greet"), Some(yaml));
    assert_eq!(registry.find("other"), Some(yml));
    assert_eq!(registry.find("data"), Some(json));
    assert_eq!(registry.find("missing"), None);
}

#[test]
fn test_find_with_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_template(dir.path(), "greet.yaml", "greet");

    let registry = registry(&[&dir]);
    assert_eq!(registry.find("greet.yaml"), Some(path));
    assert_eq!(registry.find("greet.json"), None);
}

#[test]
fn test_find_in_subdirectory() {
    let dir = TempDir::new().unwrap();
    let path = write_template(dir.path(), "writing/essay.yaml", "essay");

    assert_eq!(registry(&[&dir]).find("essay"), Some(path));
}

#[test]
fn test_find_by_template_name_field() {
    let dir = TempDir::new().unwrap();
    let path = write_template(dir.path(), "deep/nested/file.yaml", "Fancy Name");

    let registry = registry(&[&dir]);
    assert_eq!(registry.find("Fancy Name"), Some(path));
    assert!(registry.exists("Fancy Name"));
    assert!(!registry.exists("file-that-is-not-there"));
}

#[test]
fn test_earlier_search_paths_win() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let winner = write_template(first.path(), "dup.yaml", "dup");
    write_template(second.path(), "dup.yaml", "dup");

    let registry = registry(&[&first, &second]);
    assert_eq!(registry.find("dup"), Some(winner.clone()));

    let listed = registry.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, winner);
}

#[test]
fn test_load_renders() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "greet.yaml", "greet");

    let template = registry(&[&dir]).load("greet").unwrap();
    assert_eq!(template.name(), "greet");
}

#[test]
fn test_load_miss_suggests_similar_names() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "summarizer.yaml", "summarizer");
    write_template(dir.path(), "code-reviewer.yaml", "code-reviewer");

    let err = registry(&[&dir]).load("sumarizer").unwrap_err();

    assert!(matches!(err, PromptError::NotFound(_)));
    assert_eq!(err.message(), "Template 'sumarizer' not found");
    assert_eq!(err.suggestion(), Some("Did you mean: summarizer?"));
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert_eq!(
        err.details().unwrap().context.get("search_paths"),
        Some(&dir.path().display().to_string())
    );
}

#[test]
fn test_load_miss_without_similar_names() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "summarizer.yaml", "summarizer");

    let err = registry(&[&dir]).load("zzz").unwrap_err();
    assert!(matches!(err, PromptError::NotFound(_)));
    assert_eq!(err.suggestion(), None);
}

#[test]
fn test_list_sorts_and_skips_invalid_and_hidden() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "b.yaml", "bravo");
    write_template(dir.path(), "sub/a.yml", "alpha");
    write_template(dir.path(), ".hidden/c.yaml", "charlie");
    write_file(dir.path(), "broken.yaml", "name: [unterminated");
    write_file(dir.path(), "empty.yaml", "name: empty\ntemplate: \"\"\n");
    write_file(dir.path(), "notes.txt", "not a template");

    let names: Vec<String> = registry(&[&dir]).list().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["alpha", "bravo"]);
}

#[cfg(unix)]
#[test]
fn test_list_does_not_follow_symlinked_directories() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "top.yaml", "top");
    write_template(dir.path(), "nested/inner.yaml", "inner");
    std::os::unix::fs::symlink(dir.path(), dir.path().join("nested/loop")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("nested"), dir.path().join("again")).unwrap();

    let registry = registry(&[&dir]);
    let names: Vec<String> = registry.list().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["inner", "top"]);
    assert_eq!(registry.find("missing"), None);
}

#[test]
fn test_list_reports_metadata() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "meta.yaml",
        "name: meta\ndescription: Has metadata\nversion: 2.1.0\ntags: [writing, Email]\ntemplate: x\n",
    );

    let info = &registry(&[&dir]).list()[0];
    assert_eq!(info.description, "Has metadata");
    assert_eq!(info.version, "2.1.0");
    assert_eq!(info.tags, vec!["writing", "Email"]);
}

#[test]
fn test_search_by_query_and_tags() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "email.yaml",
        "name: email-writer\ndescription: Drafts emails\ntags: [writing, Email]\ntemplate: x\n",
    );
    write_file(
        dir.path(),
        "review.yaml",
        "name: reviewer\ndescription: Reviews code\ntags: [code]\ntemplate: x\n",
    );

    let registry = registry(&[&dir]);
    let names = |found: Vec<TemplateInfo>| -> Vec<String> { found.into_iter().map(|t| t.name).collect() };

    assert_eq!(names(registry.search(Some("EMAIL"), &[])), vec!["email-writer"]);
    assert_eq!(names(registry.search(Some("code"), &[])), vec!["reviewer"]);
    assert_eq!(
        names(registry.search(None, &["email".to_string()])),
        vec!["email-writer"]
    );
    assert_eq!(
        names(registry.search(None, &["code".to_string(), "writing".to_string()])),
        vec!["email-writer", "reviewer"]
    );
    assert!(registry.search(Some("email"), &["code".to_string()]).is_empty());
    assert_eq!(registry.search(None, &[]).len(), 2);
}

#[test]
fn test_add_search_path_prepends_once() {
    let mut registry = TemplateRegistry::new(vec![PathBuf::from("a")]);
    registry.add_search_path("b");
    registry.add_search_path("a");

    assert_eq!(
        registry.search_paths(),
        &[PathBuf::from("b"), PathBuf::from("a")]
    );
}

#[test]
fn test_search_path_status() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let registry = TemplateRegistry::new(vec![dir.path().to_path_buf(), missing.clone()]);

    let status = registry.search_path_status();
    assert!(status[0].exists);
    assert_eq!(status[1].path, missing);
    assert!(!status[1].exists);
}

#[test]
fn test_default_search_paths() {
    let paths = TemplateRegistry::default_search_paths();
    assert_eq!(paths[0], PathBuf::from("templates"));
    assert_eq!(paths[1], PathBuf::from("prompts"));
}

#[test]
#[serial]
fn test_from_env_prepends_configured_paths() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let joined =
        std::env::join_paths([first.path(), second.path()]).unwrap();
    let _guard = EnvGuard::set(SEARCH_PATH_ENV, joined);

    let registry = TemplateRegistry::from_env();
    let paths = registry.search_paths();
    assert_eq!(paths[0], first.path());
    assert_eq!(paths[1], second.path());
    assert_eq!(paths[2], PathBuf::from("templates"));
}
