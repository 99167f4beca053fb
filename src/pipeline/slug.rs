use regex::Regex;
use std::sync::OnceLock;

const EMPTY_SLUG: &str = "article";

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s-]").expect("valid slug regex"))
}

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s-]+").expect("valid separator regex"))
}

/// Filesystem-safe, lowercase, hyphen-delimited form of a topic.
pub fn slugify(value: &str) -> String {
    let cleaned = disallowed_chars().replace_all(value, "");
    let cleaned = cleaned.trim().to_lowercase();
    let slug = separator_runs().replace_all(&cleaned, "-");

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug.into_owned()
    }
}
