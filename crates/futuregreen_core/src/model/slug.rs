//! URL slug derivation for prepopulated `slug` fields.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug filter regex"));
static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]+").expect("valid slug separator regex"));

/// Transliterates to ASCII, lowercases, drops punctuation and joins words
/// with single hyphens.
///
/// Text with no letters or digits (e.g. only punctuation) yields an empty
/// string.
pub fn slugify(value: &str) -> String {
    let lowered = deunicode(value).to_lowercase();
    let filtered = NON_SLUG_RE.replace_all(&lowered, "");
    let joined = SEPARATOR_RE.replace_all(filtered.trim(), "-");
    joined.trim_matches('-').to_string()
}

/// Slug for a record named `name`, falling back to `<prefix>-<id head>`
/// when the name has nothing to slugify.
pub fn slug_or_fallback(name: &str, prefix: &str, id: Uuid) -> String {
    let slug = slugify(name);
    if !slug.is_empty() {
        return slug;
    }
    format!("{prefix}-{:08x}", id.as_fields().0)
}

/// Returns whether `value` is a non-empty, already-normalized slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && slugify(value) == value
}
