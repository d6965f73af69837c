// crates/atlasprep-core/src/allowlist.rs
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Property keys kept by default: the attributes the globe view reads
/// (names, codes, population, income group, region).
pub const DEFAULT_KEYS: &[&str] = &[
    "formal_en",
    "economy",
    "pop_year",
    "pop_rank",
    "pop_est",
    "income_grp",
    "abbrev",
    "continent",
    "subregion",
    "name_en",
    "iso_a2",
    "iso_a3",
];

/// A validated, ordered list of distinct property keys.
///
/// Construction fails for an empty list, blank or padded keys, keys that
/// contain `,` `'` or `"` (two names glued into one literal never match
/// anything), and duplicates. Order is kept only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PropertyAllowlist {
    keys: Vec<String>,
    index: HashSet<String>,
}

impl PropertyAllowlist {
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(PrepError::InvalidAllowlist("no keys given".into()));
        }

        let mut index = HashSet::with_capacity(keys.len());
        for key in &keys {
            if key.is_empty() || key.trim() != key {
                return Err(PrepError::InvalidAllowlist(format!(
                    "blank or padded key {key:?}"
                )));
            }
            if key.contains([',', '\'', '"']) {
                return Err(PrepError::InvalidAllowlist(format!(
                    "key {key:?} looks like several keys joined together"
                )));
            }
            if !index.insert(key.clone()) {
                return Err(PrepError::InvalidAllowlist(format!(
                    "duplicate key {key:?}"
                )));
            }
        }

        Ok(Self { keys, index })
    }

    /// Parses a comma-separated list such as `name_en,iso_a3`.
    pub fn parse_csv(list: &str) -> Result<Self> {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty()),
        )
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for PropertyAllowlist {
    fn default() -> Self {
        Self {
            keys: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
            index: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for PropertyAllowlist {
    type Error = PrepError;

    fn try_from(keys: Vec<String>) -> Result<Self> {
        Self::new(keys)
    }
}

impl From<PropertyAllowlist> for Vec<String> {
    fn from(list: PropertyAllowlist) -> Self {
        list.keys
    }
}

impl fmt::Display for PropertyAllowlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.keys.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_are_valid_and_distinct() {
        let rebuilt = PropertyAllowlist::new(DEFAULT_KEYS.iter().copied()).unwrap();
        assert_eq!(rebuilt, PropertyAllowlist::default());
        assert!(rebuilt.contains("abbrev"));
        assert!(rebuilt.contains("continent"));
    }

    #[test]
    fn rejects_glued_keys() {
        let err = PropertyAllowlist::new(["name_en", "abbrev,' 'continent"]).unwrap_err();
        assert!(matches!(err, PrepError::InvalidAllowlist(_)));
        assert!(PropertyAllowlist::new(["abbrevcontinent", "x\"y"]).is_err());
    }

    #[test]
    fn rejects_duplicates_blanks_and_empty() {
        assert!(PropertyAllowlist::new(["iso_a3", "iso_a3"]).is_err());
        assert!(PropertyAllowlist::new(["iso_a3", " name_en"]).is_err());
        assert!(PropertyAllowlist::new([""]).is_err());
        assert!(PropertyAllowlist::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn parses_comma_separated_lists() {
        let list = PropertyAllowlist::parse_csv(" name_en , iso_a3,").unwrap();
        assert_eq!(list.keys(), ["name_en", "iso_a3"]);
        assert_eq!(list.to_string(), "[name_en, iso_a3]");
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: PropertyAllowlist = serde_json::from_str(r#"["name_en","iso_a3"]"#).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(serde_json::from_str::<PropertyAllowlist>(r#"["a","a"]"#).is_err());
    }
}
