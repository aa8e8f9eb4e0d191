//! Implementation of the `prompt run` command.

use super::{bindings_from_json_file, bindings_from_pairs};
use crate::cli::RunArgs;
use crate::config::Bindings;
use crate::error::Result;
use crate::format::FormatRequest;
use crate::registry::TemplateRegistry;
use crate::template::Template;
use log::info;

/// Execute the `prompt run` command.
///
/// Variables come from `--json-input` first, then `--var` pairs, which win
/// on conflicts. The rendered prompt is written to stdout in `--format`.
pub fn cmd_run(args: RunArgs, registry: &TemplateRegistry) -> Result<()> {
    let template = registry.load(&args.name)?;
    let bindings = collect_bindings(&template, &args)?;
    println!("{}", render_output(&template, &bindings, &args)?);
    Ok(())
}

pub(crate) fn collect_bindings(template: &Template, args: &RunArgs) -> Result<Bindings> {
    let mut bindings = match &args.json_input {
        Some(path) => bindings_from_json_file(path)?,
        None => Bindings::new(),
    };
    bindings.extend(bindings_from_pairs(template, &args.vars));
    Ok(bindings)
}

pub(crate) fn render_output(
    template: &Template,
    bindings: &Bindings,
    args: &RunArgs,
) -> Result<String> {
    info!("Rendering '{}' as {}", template.name(), args.format);
    let prompt = template.render_split(bindings)?;
    args.format.format(&FormatRequest {
        rendered: &prompt.rendered,
        config: template.config(),
        bindings,
        system: prompt.system.as_deref(),
        user: prompt.user.as_deref(),
    })
}
