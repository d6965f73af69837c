// crates/atlasprep-core/src/country/alias.rs
use super::{normalize_iso3, CountryResolver};
use crate::error::{PrepError, Result};
use crate::text::fold_key;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Alias file for the location spellings used by GBD-style exports.
pub const BUNDLED_ALIASES: &str = include_str!("../../data/location_aliases.json");

/// Wraps a resolver with explicit `name → ISO3` overrides.
///
/// Overrides are consulted first (after folding), so they can both add
/// spellings the inner resolver does not know and redirect ones it gets
/// wrong.
#[derive(Debug, Clone)]
pub struct AliasResolver<R> {
    aliases: HashMap<String, String>,
    inner: R,
}

impl<R: CountryResolver> AliasResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            aliases: HashMap::new(),
            inner,
        }
    }

    /// Adds one alias. The code must be three ASCII letters.
    pub fn with_alias(mut self, name: &str, iso3: &str) -> Result<Self> {
        self.insert(name, iso3)?;
        Ok(self)
    }

    /// Parses a JSON object of `"name": "ISO3"` pairs.
    pub fn extend_from_json(mut self, json: &str) -> Result<Self> {
        let pairs: BTreeMap<String, String> = serde_json::from_str(json)?;
        for (name, code) in &pairs {
            self.insert(name, code)?;
        }
        Ok(self)
    }

    /// Reads aliases from a JSON file (see [`AliasResolver::extend_from_json`]).
    pub fn extend_from_path(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PrepError::NotFound(format!("{}: {}", path.display(), e)))?;
        self.extend_from_json(&json)
    }

    /// Adds the aliases bundled with the crate.
    pub fn with_bundled_aliases(self) -> Result<Self> {
        self.extend_from_json(BUNDLED_ALIASES)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn insert(&mut self, name: &str, iso3: &str) -> Result<()> {
        let key = fold_key(name);
        if key.is_empty() {
            return Err(PrepError::InvalidData("alias with an empty name".into()));
        }
        let code = normalize_iso3(iso3).ok_or_else(|| {
            PrepError::InvalidData(format!("alias {name:?}: {iso3:?} is not an ISO3 code"))
        })?;
        self.aliases.insert(key, code);
        Ok(())
    }
}

impl<R: CountryResolver> CountryResolver for AliasResolver<R> {
    fn resolve_iso3(&self, name: &str) -> Option<String> {
        self.aliases
            .get(&fold_key(name))
            .cloned()
            .or_else(|| self.inner.resolve_iso3(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::Iso3166Resolver;

    fn nothing(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn aliases_take_precedence() {
        let r = AliasResolver::new(|_: &str| Some("AAA".to_string()))
            .with_alias("Testland", "tst")
            .unwrap();
        assert_eq!(r.resolve_iso3("TESTLAND").as_deref(), Some("TST"));
        assert_eq!(r.resolve_iso3("elsewhere").as_deref(), Some("AAA"));
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(AliasResolver::new(nothing).with_alias("X", "XX").is_err());
        assert!(AliasResolver::new(nothing).with_alias("X", "X1Z").is_err());
        assert!(AliasResolver::new(nothing).with_alias(" ", "XYZ").is_err());
        assert!(AliasResolver::new(nothing)
            .extend_from_json(r#"{"Somewhere": "TOOLONG"}"#)
            .is_err());
    }

    #[test]
    fn bundled_aliases_cover_gbd_spellings() {
        let r = AliasResolver::new(Iso3166Resolver::new().unwrap())
            .with_bundled_aliases()
            .unwrap();
        assert_eq!(r.resolve_iso3("Iran (Islamic Republic of)").as_deref(), Some("IRN"));
        assert_eq!(r.resolve_iso3("Democratic Republic of the Congo").as_deref(), Some("COD"));
        assert_eq!(r.resolve_iso3("Taiwan (Province of China)").as_deref(), Some("TWN"));
        // Falls through to the ISO table.
        assert_eq!(r.resolve_iso3("Japan").as_deref(), Some("JPN"));
    }
}
