//! Common type definitions.
//!
//! Entity identifiers are store-assigned integers wrapped in type aliases so signatures say
//! which table they point at:
//!
//! - [`CityId`]: city identifier
//! - [`TranslationId`]: city translation identifier
//!
//! [`normalize_lang`] is the single place language codes are canonicalized, so writes and
//! filters always agree on what `"en"` means.

pub type CityId = i64;
pub type TranslationId = i64;

/// Canonical form of a language code: trimmed and ASCII upper-cased ("en " -> "EN").
pub fn normalize_lang(lang: &str) -> String {
    lang.trim().to_ascii_uppercase()
}

/// Search form of a display name: Unicode lower-cased ("МОСКВА" -> "москва").
///
/// SQLite's `LOWER()` only folds ASCII, so names are folded here on write and matched against
/// needles folded the same way.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Returns the trimmed value if it is non-blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lang() {
        assert_eq!(normalize_lang("en"), "EN");
        assert_eq!(normalize_lang(" Fr "), "FR");
        assert_eq!(normalize_lang("PT-br"), "PT-BR");
    }

    #[test]
    fn test_fold_name() {
        assert_eq!(fold_name("Москва"), "москва");
        assert_eq!(fold_name("ÉVRY"), "évry");
        assert_eq!(fold_name("Springfield"), "springfield");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Berlin ")), Some("Berlin"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
