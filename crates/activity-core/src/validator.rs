use std::sync::OnceLock;

use regex::Regex;

use crate::atoms::constants::MAX_IDENTIFIER_LENGTH;

/// True if `id` matches the identifier grammar `^[A-Za-z0-9_]{0,50}$`.
///
/// Applied to every context_id and visitor_id at every entry point; no
/// invalid identifier reaches the backing store.
pub fn is_valid_identifier(id: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(&format!(r"^[A-Za-z0-9_]{{0,{MAX_IDENTIFIER_LENGTH}}}$"))
                .expect("static regex is valid")
        })
        .is_match(id)
}
