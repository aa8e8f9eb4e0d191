//! Implementation of the `prompt init` command.
//!
//! Creates a templates directory and, on request, seeds it with two example
//! templates. Running it again never overwrites an existing file.

use crate::cli::InitArgs;
use crate::config::{TemplateConfig, VariableDeclaration, VariableType};
use crate::error::{PromptError, Result};
use crate::fs::write_if_absent;
use std::fs;
use std::path::{Path, PathBuf};

const SUMMARIZER_BODY: &str = "You are an expert summarizer.

Summarize the following text in {{style}} style.
Keep the summary under {{max_length}} words.

TEXT:
{{text}}

SUMMARY:";

const CODE_REVIEWER_BODY: &str = "You are an expert {{language}} code reviewer.
Focus on: {{focus}}

Review the following code and provide:
1. Issues found (bugs, potential problems)
2. Suggestions for improvement
3. What's done well

CODE:
```{{language}}
{{code}}
```

REVIEW:";

/// What happened to one example file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExampleOutcome {
    Created(PathBuf),
    Skipped(PathBuf),
}

/// Execute the `prompt init` command.
pub fn cmd_init(args: InitArgs) -> Result<()> {
    let dir = &args.path;

    if dir.exists() {
        println!("Directory already exists: {}", dir.display());
    } else {
        fs::create_dir_all(dir).map_err(|e| {
            PromptError::io(format!("failed to create directory '{}'", dir.display()), e)
        })?;
        println!("Created directory: {}", dir.display());
    }

    if args.with_examples {
        for outcome in write_examples(dir)? {
            match outcome {
                ExampleOutcome::Created(path) => println!("Created: {}", path.display()),
                ExampleOutcome::Skipped(path) => {
                    println!("Skipped (exists): {}", path.display())
                }
            }
        }
    }

    Ok(())
}

/// The example templates as `(file name, configuration)` pairs.
pub(crate) fn example_templates() -> Result<Vec<(&'static str, TemplateConfig)>> {
    let summarizer = TemplateConfig::builder("summarizer")
        .description("Summarize text in different styles")
        .tag("summarization")
        .tag("text")
        .variable(VariableDeclaration::new("text").with_description("The text to summarize"))
        .variable(
            VariableDeclaration::new("style")
                .optional()
                .with_default("bullet-points")
                .with_enum(["bullet-points", "paragraph", "one-liner"])
                .with_description("Summary style"),
        )
        .variable(
            VariableDeclaration::new("max_length")
                .with_type(VariableType::Integer)
                .optional()
                .with_default(200)
                .with_description("Maximum length in words"),
        )
        .template(SUMMARIZER_BODY)
        .build()?;

    let code_reviewer = TemplateConfig::builder("code-reviewer")
        .description("Review code for issues and improvements")
        .tag("code")
        .tag("review")
        .tag("development")
        .variable(VariableDeclaration::new("code").with_description("The code to review"))
        .variable(VariableDeclaration::new("language").with_description("Programming language"))
        .variable(
            VariableDeclaration::new("focus")
                .optional()
                .with_default("general")
                .with_enum(["general", "security", "performance", "readability"])
                .with_description("Review focus area"),
        )
        .template(CODE_REVIEWER_BODY)
        .build()?;

    Ok(vec![
        ("summarizer.yaml", summarizer),
        ("code-reviewer.yaml", code_reviewer),
    ])
}

pub(crate) fn write_examples(dir: &Path) -> Result<Vec<ExampleOutcome>> {
    let mut outcomes = Vec::new();
    for (file_name, config) in example_templates()? {
        let path = dir.join(file_name);
        if write_if_absent(&path, &config.to_yaml()?)? {
            outcomes.push(ExampleOutcome::Created(path));
        } else {
            outcomes.push(ExampleOutcome::Skipped(path));
        }
    }
    Ok(outcomes)
}
