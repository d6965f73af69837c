// crates/atlasprep-core/src/country/iso3166.rs
use super::CountryResolver;
use crate::error::Result;
use crate::text::fold_key;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// ISO 3166-1 table shipped with the crate.
const EMBEDDED_TABLE: &str = include_str!("../../data/iso3166.json");

// Parsed once per process; the table is immutable afterwards.
static TABLE_CACHE: OnceCell<Iso3166Table> = OnceCell::new();

/// One ISO 3166-1 entry, as stored in `data/iso3166.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCode {
    pub alpha_2: String,
    pub alpha_3: String,
    pub numeric: String,
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
}

impl CountryCode {
    /// Every string a lookup may match against, codes first.
    fn match_keys(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.alpha_2.as_str()),
            Some(self.alpha_3.as_str()),
            Some(self.numeric.as_str()),
            Some(self.name.as_str()),
            self.official_name.as_deref(),
            self.common_name.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Country codes plus a folded-name index over every field.
#[derive(Debug, Clone)]
pub struct Iso3166Table {
    entries: Vec<CountryCode>,
    index: HashMap<String, usize>,
}

impl Iso3166Table {
    /// The embedded table, parsed on first use.
    pub fn embedded() -> Result<&'static Self> {
        TABLE_CACHE.get_or_try_init(|| Self::from_json(EMBEDDED_TABLE))
    }

    /// Builds a table from a JSON array of [`CountryCode`] objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CountryCode> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<CountryCode>) -> Self {
        let mut index = HashMap::with_capacity(entries.len() * 4);
        for (i, entry) in entries.iter().enumerate() {
            for key in entry.match_keys() {
                // Earlier entries win when two countries share a key.
                index.entry(fold_key(key)).or_insert(i);
            }
        }
        Self { entries, index }
    }

    /// Case- and accent-insensitive lookup against codes and names.
    pub fn lookup(&self, query: &str) -> Option<&CountryCode> {
        let key = fold_key(query);
        if key.is_empty() {
            return None;
        }
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    pub fn find_by_alpha3(&self, code: &str) -> Option<&CountryCode> {
        self.entries
            .iter()
            .find(|c| c.alpha_3.eq_ignore_ascii_case(code.trim()))
    }

    pub fn entries(&self) -> &[CountryCode] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The default resolver backed by the embedded ISO 3166-1 table.
#[derive(Debug, Clone, Copy)]
pub struct Iso3166Resolver {
    table: &'static Iso3166Table,
}

impl Iso3166Resolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: Iso3166Table::embedded()?,
        })
    }

    pub fn table(&self) -> &'static Iso3166Table {
        self.table
    }
}

impl CountryResolver for Iso3166Resolver {
    fn resolve_iso3(&self, name: &str) -> Option<String> {
        self.table.lookup(name).map(|c| c.alpha_3.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Iso3166Resolver {
        Iso3166Resolver::new().unwrap()
    }

    #[test]
    fn embedded_table_is_complete_and_unique() {
        let table = Iso3166Table::embedded().unwrap();
        assert_eq!(table.len(), 249);
        let mut codes: Vec<&str> = table.entries().iter().map(|c| c.alpha_3.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 249);
    }

    #[test]
    fn resolves_names_codes_and_official_names() {
        let r = resolver();
        assert_eq!(r.resolve_iso3("Germany").as_deref(), Some("DEU"));
        assert_eq!(r.resolve_iso3("united states of america").as_deref(), Some("USA"));
        assert_eq!(r.resolve_iso3("Russian Federation").as_deref(), Some("RUS"));
        assert_eq!(r.resolve_iso3("FR").as_deref(), Some("FRA"));
        assert_eq!(r.resolve_iso3("chn").as_deref(), Some("CHN"));
        assert_eq!(r.resolve_iso3("Vietnam").as_deref(), Some("VNM"));
        assert_eq!(r.resolve_iso3("United Republic of Tanzania").as_deref(), Some("TZA"));
    }

    #[test]
    fn folding_ignores_accents_case_and_padding() {
        let r = resolver();
        assert_eq!(r.resolve_iso3("Côte d'Ivoire").as_deref(), Some("CIV"));
        assert_eq!(r.resolve_iso3("cote d'ivoire").as_deref(), Some("CIV"));
        assert_eq!(r.resolve_iso3("  TURKIYE ").as_deref(), Some("TUR"));
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let r = resolver();
        assert_eq!(r.resolve_iso3("Atlantis"), None);
        assert_eq!(r.resolve_iso3(""), None);
        assert_eq!(r.resolve_iso3("Iran (Islamic Republic of)"), None);
    }

    #[test]
    fn first_entry_wins_on_shared_keys() {
        let table = Iso3166Table::from_json(
            r#"[
                {"alpha_2":"AA","alpha_3":"AAA","numeric":"001","name":"Shared"},
                {"alpha_2":"BB","alpha_3":"BBB","numeric":"002","name":"Other","common_name":"Shared"}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.lookup("shared").map(|c| c.alpha_3.as_str()), Some("AAA"));
        assert_eq!(table.find_by_alpha3("bbb").map(|c| c.name.as_str()), Some("Other"));
    }
}
