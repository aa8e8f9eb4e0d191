//! Token counting.
//!
//! With the `tiktoken` feature the cl100k encoder gives exact counts; it is
//! loaded once per process and a failed load is remembered. Otherwise a
//! character heuristic is used.

use crate::config::{Bindings, VariableDeclaration, display_value};
use log::debug;
use regex::Regex;
use std::sync::{LazyLock, OnceLock};

/// Average characters per token for the heuristic.
const CHARS_PER_TOKEN: f64 = 4.0;

/// Extra tokens per whitespace run for the heuristic.
const WHITESPACE_RUN_WEIGHT: f64 = 0.25;

/// Description words suggesting a large value.
const LARGE_HINTS: &[&str] = &["long", "large", "full", "complete", "code", "content"];

/// Description words suggesting a small value.
const SMALL_HINTS: &[&str] = &["short", "brief", "single"];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

enum Encoder {
    #[cfg(feature = "tiktoken")]
    Ready(tiktoken_rs::CoreBPE),
    Unavailable,
}

/// Unset until first use, then ready or permanently unavailable.
static ENCODER: OnceLock<Encoder> = OnceLock::new();

fn encoder() -> &'static Encoder {
    ENCODER.get_or_init(load_encoder)
}

#[cfg(feature = "tiktoken")]
fn load_encoder() -> Encoder {
    match tiktoken_rs::cl100k_base() {
        Ok(bpe) => {
            debug!("loaded cl100k_base tokenizer");
            Encoder::Ready(bpe)
        }
        Err(e) => {
            debug!("tokenizer unavailable, using character heuristic: {}", e);
            Encoder::Unavailable
        }
    }
}

#[cfg(not(feature = "tiktoken"))]
fn load_encoder() -> Encoder {
    debug!("built without tiktoken, using character heuristic");
    Encoder::Unavailable
}

/// Whether exact token counting is available in this process.
pub fn tokenizer_available() -> bool {
    !matches!(encoder(), Encoder::Unavailable)
}

/// Character heuristic: `ceil(chars / 4) + 0.25 * whitespace_runs`, truncated.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let chars = text.chars().count() as f64;
    let whitespace_runs = WHITESPACE_RUN.find_iter(text).count() as f64;
    ((chars / CHARS_PER_TOKEN).ceil() + whitespace_runs * WHITESPACE_RUN_WEIGHT) as usize
}

/// Counts tokens, exactly when possible.
#[derive(Debug, Clone, Copy)]
pub struct TokenCounter {
    use_tokenizer: bool,
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self {
            use_tokenizer: true,
        }
    }
}

impl TokenCounter {
    /// A counter that always uses the character heuristic.
    pub fn heuristic() -> Self {
        Self {
            use_tokenizer: false,
        }
    }

    /// Token count of `text`; `0` for empty text.
    pub fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        if self.use_tokenizer {
            match encoder() {
                #[cfg(feature = "tiktoken")]
                Encoder::Ready(bpe) => return bpe.encode_ordinary(text).len(),
                Encoder::Unavailable => {}
            }
        }
        estimate_tokens(text)
    }

    /// Tokens a variable is expected to contribute.
    ///
    /// Uses the sample value when given, else the default, else a per-type
    /// base scaled by size hints in the description.
    pub fn estimate_variable(&self, var: &VariableDeclaration, samples: &Bindings) -> usize {
        if let Some(value) = samples.get(&var.name) {
            return self.count(&display_value(value));
        }
        if let Some(default) = &var.default {
            return self.count(&display_value(default));
        }

        let mut base = var.var_type.base_token_estimate();
        let description = var.description.to_lowercase();
        if LARGE_HINTS.iter().any(|hint| description.contains(hint)) {
            base *= 5;
        } else if SMALL_HINTS.iter().any(|hint| description.contains(hint)) {
            base /= 2;
        }
        base
    }
}
