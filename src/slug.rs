use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

pub const MAX_SLUG_LEN: usize = 100;

/// Lowercase, collapse every run outside `[a-z0-9]` into one hyphen, trim hyphens, cap at 100.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let collapsed = NON_SLUG_RE.replace_all(&lower, "-");
    let trimmed = collapsed.trim_matches('-');
    // Output is ASCII, so byte truncation is char-safe. A cut can land on a hyphen.
    trimmed[..trimmed.len().min(MAX_SLUG_LEN)]
        .trim_end_matches('-')
        .to_string()
}
