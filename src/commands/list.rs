//! Implementation of the `prompt list` command.

use crate::cli::ListArgs;
use crate::error::{PromptError, Result};
use crate::registry::{SearchPathStatus, TemplateInfo, TemplateRegistry};

/// Descriptions longer than this are cut in the table.
const DESCRIPTION_WIDTH: usize = 50;

/// Execute the `prompt list` command.
pub fn cmd_list(args: ListArgs, registry: &TemplateRegistry) -> Result<()> {
    if args.paths {
        print!("{}", format_search_paths(&registry.search_path_status()));
        return Ok(());
    }

    let templates = if args.search.is_some() || !args.tags.is_empty() {
        registry.search(args.search.as_deref(), &args.tags)
    } else {
        registry.list()
    };

    if templates.is_empty() {
        println!("No templates found.");
        println!();
        println!("Search paths:");
        for status in registry.search_path_status() {
            let state = if status.exists { "exists" } else { "missing" };
            println!("  {} ({})", status.path.display(), state);
        }
        println!();
        println!("Run 'prompt init' to create a templates directory.");
        return Ok(());
    }

    if args.json {
        let json = serde_json::to_string_pretty(&templates).map_err(|e| {
            PromptError::configuration(format!("failed to serialize template list: {}", e))
        })?;
        println!("{}", json);
    } else {
        println!("{}", format_table(&templates));
    }

    Ok(())
}

pub(crate) fn format_search_paths(statuses: &[SearchPathStatus]) -> String {
    let mut out = String::from("Template Search Paths:\n\n");
    for status in statuses {
        if status.exists {
            out.push_str(&format!("  ✓ {}\n", status.path.display()));
        } else {
            out.push_str(&format!("  ✗ {} (not found)\n", status.path.display()));
        }
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Fixed-width table of name, description, version and tags.
pub(crate) fn format_table(templates: &[TemplateInfo]) -> String {
    let rows: Vec<[String; 4]> = templates
        .iter()
        .map(|t| {
            [
                t.name.clone(),
                truncate(&t.description, DESCRIPTION_WIDTH),
                t.version.clone(),
                t.tags.join(", "),
            ]
        })
        .collect();

    let header = ["Name", "Description", "Version", "Tags"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![
        "Available Templates".to_string(),
        line(header),
        line(widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str)),
    ];
    for row in &rows {
        lines.push(line(row.each_ref().map(String::as_str)));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_file;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn info(name: &str, description: &str, tags: &[&str]) -> TemplateInfo {
        TemplateInfo {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.yaml", name)),
            description: description.to_string(),
            version: "1.0.0".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let table = format_table(&[
            info("summarizer", "Summarize text", &["text", "summarization"]),
            info("cr", "Review code", &[]),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Available Templates");
        assert_eq!(lines[1], "Name        Description     Version  Tags");
        assert_eq!(lines[3], "summarizer  Summarize text  1.0.0    text, summarization");
        assert_eq!(lines[4], "cr          Review code     1.0.0");
    }

    #[test]
    fn test_format_table_truncates_descriptions() {
        let long = "d".repeat(60);
        let table = format_table(&[info("t", &long, &[])]);
        assert!(table.contains(&format!("{}...", "d".repeat(50))));
        assert!(!table.contains(&"d".repeat(51)));
    }

    #[test]
    fn test_format_search_paths() {
        let out = format_search_paths(&[
            SearchPathStatus {
                path: PathBuf::from("templates"),
                exists: true,
            },
            SearchPathStatus {
                path: PathBuf::from("prompts"),
                exists: false,
            },
        ]);
        assert!(out.contains("  ✓ templates\n"));
        assert!(out.contains("  ✗ prompts (not found)\n"));
    }

    #[test]
    fn test_cmd_list_variants_succeed() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "t.yaml",
            "name: tagged\ntags: [demo]\ntemplate: x\n",
        );
        let registry = TemplateRegistry::new(vec![dir.path().to_path_buf()]);

        assert!(cmd_list(ListArgs::default(), &registry).is_ok());
        assert!(
            cmd_list(
                ListArgs {
                    json: true,
                    tags: vec!["demo".to_string()],
                    ..ListArgs::default()
                },
                &registry
            )
            .is_ok()
        );
        assert!(
            cmd_list(
                ListArgs {
                    paths: true,
                    ..ListArgs::default()
                },
                &registry
            )
            .is_ok()
        );
        assert!(
            cmd_list(
                ListArgs {
                    search: Some("nothing-matches".to_string()),
                    ..ListArgs::default()
                },
                &registry
            )
            .is_ok()
        );
    }
}
