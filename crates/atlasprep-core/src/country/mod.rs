// crates/atlasprep-core/src/country/mod.rs

//! # Country Resolution
//!
//! Maps free-text location names (as statistical agencies spell them) to
//! ISO 3166-1 alpha-3 codes.
//!
//! The merge stage only depends on the [`CountryResolver`] trait, so the
//! built-in table can be swapped for a stub or a closure:
//!
//! ```rust
//! use atlasprep_core::country::CountryResolver;
//!
//! let stub = |name: &str| (name == "Testland").then(|| "TST".to_string());
//! assert_eq!(stub.resolve_iso3("Testland").as_deref(), Some("TST"));
//! assert_eq!(stub.resolve_iso3("Atlantis"), None);
//! ```

mod alias;
mod iso3166;

pub use alias::AliasResolver;
pub use iso3166::{CountryCode, Iso3166Resolver, Iso3166Table};

/// Best-effort lookup of a location name.
///
/// Returns `None` when the name is not recognized; callers decide whether
/// that is worth a warning.
pub trait CountryResolver {
    fn resolve_iso3(&self, name: &str) -> Option<String>;
}

impl<F> CountryResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    #[inline]
    fn resolve_iso3(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Returns the code upper-cased if it is three ASCII letters.
pub(crate) fn normalize_iso3(code: &str) -> Option<String> {
    let code = code.trim();
    (code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}
