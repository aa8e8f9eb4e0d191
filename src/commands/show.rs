//! Implementation of the `prompt show` command.
//!
//! Displays the metadata, variables and body of a template.

use crate::cli::ShowArgs;
use crate::config::{Bindings, Section, display_value};
use crate::error::Result;
use crate::registry::TemplateRegistry;
use crate::template::Template;

const RULE: &str =
    "================================================================================";
const DIVIDER: &str =
    "--------------------------------------------------------------------------------";

/// Execute the `prompt show` command.
pub fn cmd_show(args: ShowArgs, registry: &TemplateRegistry) -> Result<()> {
    let template = registry.load(&args.name)?;

    if args.raw {
        print!("{}", template.config().to_yaml()?);
        return Ok(());
    }

    println!("{}", format_details(&template, args.preview));
    Ok(())
}

fn section_title(section: Section) -> &'static str {
    match section {
        Section::SystemPrompt => "System prompt",
        Section::UserPrompt => "User prompt",
        Section::Template => "Template",
    }
}

/// Metadata, the variables table, then either every body or the preview.
pub(crate) fn format_details(template: &Template, preview: bool) -> String {
    let config = template.config();
    let mut lines = vec![
        RULE.to_string(),
        format!("{} (v{})", config.name(), config.version()),
        RULE.to_string(),
    ];

    if !config.description().is_empty() {
        lines.push(format!("Description: {}", config.description()));
    }
    if !config.author().is_empty() {
        lines.push(format!("Author:      {}", config.author()));
    }
    if !config.tags().is_empty() {
        lines.push(format!("Tags:        {}", config.tags().join(", ")));
    }

    if !config.variables().is_empty() {
        lines.push(String::new());
        lines.push("Variables:".to_string());
        for var in config.variables() {
            let default = var
                .default
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "-".to_string());
            let description = if var.description.is_empty() {
                "-"
            } else {
                var.description.as_str()
            };
            lines.push(format!(
                "  {} ({}, {}) default: {}  {}",
                var.name,
                var.var_type,
                if var.required { "required" } else { "optional" },
                default,
                description
            ));
        }
    }

    lines.push(String::new());
    lines.push(DIVIDER.to_string());
    if preview {
        lines.push("Preview:".to_string());
        lines.push(String::new());
        lines.push(template.preview(&Bindings::new()));
    } else {
        for (section, body) in config.sections() {
            lines.push(format!("{}:", section_title(section)));
            lines.push(String::new());
            for (number, line) in body.lines().enumerate() {
                lines.push(format!("{:>4} | {}", number + 1, line));
            }
            lines.push(String::new());
        }
    }
    lines.push(DIVIDER.to_string());

    lines.join("\n")
}
