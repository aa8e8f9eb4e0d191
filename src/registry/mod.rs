//! Template discovery across search paths.
//!
//! A template is looked up by file name first (`<name>.yaml`, `.yml`, `.json`
//! in each search path and its immediate subdirectories), then by the `name`
//! field of every template found by a recursive scan. Search paths are tried
//! in order and the first match wins.

#[cfg(test)]
mod tests;

use crate::config::TemplateConfig;
use crate::error::{PromptError, Result};
use crate::template::Template;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognised as templates, in lookup order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Environment variable holding extra search paths (platform path-list separated).
pub const SEARCH_PATH_ENV: &str = "PROMPT_TEMPLATE_PATH";

/// Minimum normalized similarity for a "did you mean" suggestion.
const SUGGESTION_CUTOFF: f64 = 0.4;
const MAX_SUGGESTIONS: usize = 3;

/// Summary of a discovered template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub path: PathBuf,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPathStatus {
    pub path: PathBuf,
    pub exists: bool,
}

/// Finds and loads templates from an ordered list of directories.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    search_paths: Vec<PathBuf>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new(Self::default_search_paths())
    }
}

impl TemplateRegistry {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Paths from [`SEARCH_PATH_ENV`] followed by the defaults.
    pub fn from_env() -> Self {
        let mut paths: Vec<PathBuf> = std::env::var_os(SEARCH_PATH_ENV)
            .map(|value| {
                std::env::split_paths(&value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        paths.extend(Self::default_search_paths());
        Self::new(paths)
    }

    /// `./templates`, `./prompts` and `~/.prompt_templates`.
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("templates"), PathBuf::from("prompts")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".prompt_templates"));
        }
        paths
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Put `path` first in the search order unless it is already present.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.search_paths.contains(&path) {
            self.search_paths.insert(0, path);
        }
    }

    /// Path of the template called `name`, if any.
    ///
    /// A name with a supported extension is only resolved relative to each
    /// search path.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        if has_supported_extension(Path::new(name)) {
            return self
                .search_paths
                .iter()
                .map(|base| base.join(name))
                .find(|candidate| candidate.is_file());
        }

        for base in self.existing_paths() {
            let subdirs = subdirectories(base);
            for ext in SUPPORTED_EXTENSIONS {
                let file_name = format!("{}.{}", name, ext);
                let candidate = base.join(&file_name);
                if candidate.is_file() {
                    return Some(candidate);
                }
                if let Some(candidate) = subdirs
                    .iter()
                    .map(|dir| dir.join(&file_name))
                    .find(|candidate| candidate.is_file())
                {
                    return Some(candidate);
                }
            }
        }

        self.discover()
            .into_iter()
            .find(|info| info.name == name)
            .map(|info| info.path)
    }

    /// Load the template called `name`.
    ///
    /// # Errors
    ///
    /// `PromptError::NotFound` when no search path has it, with up to three
    /// similarly named templates as a suggestion.
    pub fn load(&self, name: &str) -> Result<Template> {
        let Some(path) = self.find(name) else {
            return Err(self.not_found(name));
        };
        debug!("Loading template '{}' from {}", name, path.display());
        Template::load(path)
    }

    /// Every discoverable template, first occurrence of each name, sorted by name.
    pub fn list(&self) -> Vec<TemplateInfo> {
        let mut seen = HashSet::new();
        let mut templates: Vec<TemplateInfo> = self
            .discover()
            .into_iter()
            .filter(|info| seen.insert(info.name.clone()))
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }

    /// Templates whose name or description contains `query` (case-insensitive)
    /// and that carry any of `tags`.
    pub fn search(&self, query: Option<&str>, tags: &[String]) -> Vec<TemplateInfo> {
        let mut templates = self.list();

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            templates.retain(|t| {
                t.name.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
            });
        }

        if !tags.is_empty() {
            let wanted: HashSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();
            templates.retain(|t| t.tags.iter().any(|tag| wanted.contains(&tag.to_lowercase())));
        }

        templates
    }

    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn search_path_status(&self) -> Vec<SearchPathStatus> {
        self.search_paths
            .iter()
            .map(|path| SearchPathStatus {
                path: path.clone(),
                exists: path.exists(),
            })
            .collect()
    }

    fn existing_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.search_paths.iter().filter(|p| p.is_dir())
    }

    fn discover(&self) -> Vec<TemplateInfo> {
        let mut found = Vec::new();
        for base in self.existing_paths() {
            scan_directory(base, &mut found);
        }
        found
    }

    fn not_found(&self, name: &str) -> PromptError {
        let available: Vec<String> = self.list().into_iter().map(|t| t.name).collect();
        let matches = close_matches(name, &available);
        let searched: Vec<String> = self
            .existing_paths()
            .map(|p| p.display().to_string())
            .collect();

        let mut err = PromptError::not_found(format!("Template '{}' not found", name))
            .with_context("search_paths", searched.join(", "));
        if !matches.is_empty() {
            err = err.with_suggestion(format!("Did you mean: {}?", matches.join(", ")));
        }
        err
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Directory entries sorted by path; unreadable directories yield nothing.
fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping unreadable directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();
    paths
}

fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    sorted_entries(dir).into_iter().filter(|p| p.is_dir()).collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn scan_directory(dir: &Path, found: &mut Vec<TemplateInfo>) {
    for path in sorted_entries(dir) {
        if path.is_file() && has_supported_extension(&path) {
            match TemplateConfig::load(&path) {
                Ok(config) => found.push(TemplateInfo {
                    name: config.name().to_string(),
                    description: config.description().to_string(),
                    version: config.version().to_string(),
                    tags: config.tags().to_vec(),
                    path,
                }),
                Err(e) => warn!("Skipping invalid template {}: {}", path.display(), e.message()),
            }
        } else if path.is_dir() && !is_hidden(&path) {
            if is_symlink(&path) {
                debug!("Not following symlinked directory {}", path.display());
                continue;
            }
            scan_directory(&path, found);
        }
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

/// Up to three names from `candidates` similar to `name`, best first.
fn close_matches(name: &str, candidates: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = candidates
        .iter()
        .map(|c| (strsim::normalized_levenshtein(name, c), c))
        .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c.clone())
        .collect()
}
