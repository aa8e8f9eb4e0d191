//! CLI argument parsing for `prompt`.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::format::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Prompt Template: manage, validate and render LLM prompt templates.
///
/// Templates are YAML or JSON files discovered from search paths:
/// - `--path` directories, in the order given
/// - the `PROMPT_TEMPLATE_PATH` environment variable
/// - `./templates`, `./prompts` and `~/.prompt_templates`
#[derive(Parser, Debug)]
#[command(name = "prompt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Extra template directory searched before the defaults (repeatable).
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available templates.
    ///
    /// Shows every template found on the search paths, optionally filtered
    /// by name/description substring or tags.
    List(ListArgs),

    /// Show details of a template.
    ///
    /// Prints metadata, declared variables and the template body.
    Show(ShowArgs),

    /// Render a template with variables.
    Run(RunArgs),

    /// Validate a template file.
    ///
    /// Checks syntax, declarations and variable usage. Exits with status 2
    /// when the template has errors.
    Validate(ValidateArgs),

    /// Estimate token usage and inspect template structure.
    Analyze(AnalyzeArgs),

    /// Score template quality across five dimensions.
    ///
    /// Exits with status 2 when `--min-score` is given and not reached.
    Score(ScoreArgs),

    /// Initialize a templates directory.
    ///
    /// Creates the directory and, with `--with-examples`, two starter
    /// templates. Existing files are never overwritten.
    Init(InitArgs),
}

/// Arguments for the `list` command.
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only templates carrying any of these tags.
    #[arg(short, long = "tags", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Case-insensitive substring of the name or description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Show search paths and whether they exist.
    #[arg(long)]
    pub paths: bool,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Template name (or file name relative to a search path).
    pub name: String,

    /// Print the configuration as YAML.
    #[arg(long)]
    pub raw: bool,

    /// Render a preview with defaults and `[name]` placeholders.
    #[arg(long)]
    pub preview: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Template name (or file name relative to a search path).
    pub name: String,

    /// Variable in key=value format (repeatable). Coerced to the declared type.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// JSON file holding an object of variable values.
    #[arg(short, long, value_name = "FILE")]
    pub json_input: Option<PathBuf>,

    /// Output format: raw, json, markdown, chat-api or env.
    #[arg(short, long, default_value = "raw")]
    pub format: OutputFormat,
}

/// Arguments for the `validate` command.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Template file to validate.
    pub file: PathBuf,

    /// Also run the semantic checks (reported as warnings or errors).
    #[arg(long)]
    pub semantic: bool,
}

/// Arguments for the `analyze` command.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Template name, or path to a template file.
    pub target: String,

    /// Model to check the token estimate against (repeatable).
    #[arg(short, long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Sample value used for token estimates, in key=value format (repeatable).
    #[arg(long = "sample", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub samples: Vec<(String, String)>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `score` command.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Template name, or path to a template file.
    pub target: String,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Fail with status 2 when the overall score is below this value.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub min_score: Option<u32>,
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Directory to create.
    #[arg(short, long, default_value = "templates")]
    pub path: PathBuf,

    /// Write the example templates into the directory.
    #[arg(long)]
    pub with_examples: bool,
}

/// Parse a `key=value` pair; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!(
            "Invalid variable format: {}. Use format: key=value",
            raw
        )),
    }
}
