// crates/atlasprep-core/src/text.rs

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Côte d'Ivoire` -> `Cote d'Ivoire`)
/// 2\) Normalize to lowercase
/// 3\) Trim surrounding whitespace
///
/// # Examples
///
/// ```rust
/// use atlasprep_core::text::fold_key;
///
/// assert_eq!(fold_key("Türkiye"), "turkiye");
/// assert_eq!(fold_key("  Réunion "), "reunion");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).trim().to_lowercase()
}

/// Compares two strings for equality after Unicode folding and normalization.
///
/// ```rust
/// use atlasprep_core::text::equals_folded;
///
/// assert!(equals_folded("Åland Islands", "aland islands"));
/// assert!(!equals_folded("Niger", "Nigeria"));
/// ```
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Parses a numeric cell into a finite `f64`.
///
/// \- Trims leading and trailing whitespace before parsing.
/// \- Returns `None` if parsing fails or the result is `NaN` / infinite.
pub fn parse_finite_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
