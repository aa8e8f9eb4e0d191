//! Context window limits for known models.

/// Limit used when nothing matches.
pub const DEFAULT_CONTEXT_LIMIT: usize = 8192;

/// Share of the context window a prompt may use, leaving room for the response.
pub const PROMPT_SHARE_OF_CONTEXT: f64 = 0.75;

/// Models checked when the caller names none.
pub const DEFAULT_TARGET_MODELS: &[&str] = &["gpt-4", "gpt-4-turbo", "claude-3-sonnet"];

/// Known models in lookup order. Substring matching walks this order.
pub const MODEL_LIMITS: &[(&str, usize)] = &[
    ("gpt-4", 8192),
    ("gpt-4-32k", 32768),
    ("gpt-4-turbo", 128000),
    ("gpt-4o", 128000),
    ("gpt-4o-mini", 128000),
    ("gpt-3.5-turbo", 16385),
    ("claude-3-opus", 200000),
    ("claude-3-sonnet", 200000),
    ("claude-3-haiku", 200000),
    ("claude-3.5-sonnet", 200000),
    ("claude-2", 100000),
    ("default", DEFAULT_CONTEXT_LIMIT),
];

/// Context window for `model`.
///
/// Exact case-insensitive match first, then the first table entry where one
/// name contains the other, then [`DEFAULT_CONTEXT_LIMIT`].
pub fn context_limit(model: &str) -> usize {
    let model = model.to_lowercase();

    if let Some((_, limit)) = MODEL_LIMITS.iter().find(|(name, _)| *name == model) {
        return *limit;
    }

    MODEL_LIMITS
        .iter()
        .find(|(name, _)| model.contains(name) || name.contains(model.as_str()))
        .map(|(_, limit)| *limit)
        .unwrap_or(DEFAULT_CONTEXT_LIMIT)
}

/// Whether `tokens` leaves a quarter of the model's context free.
pub fn fits_model(tokens: usize, model: &str) -> bool {
    (tokens as f64) < context_limit(model) as f64 * PROMPT_SHARE_OF_CONTEXT
}
