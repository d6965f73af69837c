// crates/atlasprep-core/src/config.rs

//! Pipeline configuration.
//!
//! Every field has a fixed default, so an empty config (or none at all)
//! reproduces the canonical batch job: `countries.geo.json` →
//! `countries.geo2.json` → `merged_dementia.geo.json`.

use crate::allowlist::PropertyAllowlist;
use crate::error::Result;
use crate::extract::TargetSelection;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_GEOJSON: &str = "countries.geo.json";
pub const DEFAULT_FILTERED_GEOJSON: &str = "countries.geo2.json";
pub const DEFAULT_STATISTICS_CSV: &str = "2021dementia.csv";
pub const DEFAULT_MERGED_GEOJSON: &str = "merged_dementia.geo.json";
pub const DEFAULT_ISO3_PROPERTY: &str = "iso_a3";
pub const DEFAULT_FILTER_INDENT: usize = 4;
pub const DEFAULT_MERGE_INDENT: usize = 2;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub allowlist: PropertyAllowlist,
    pub indent: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_SOURCE_GEOJSON),
            output: PathBuf::from(DEFAULT_FILTERED_GEOJSON),
            allowlist: PropertyAllowlist::default(),
            indent: DEFAULT_FILTER_INDENT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub statistics: PathBuf,
    pub geojson: PathBuf,
    pub output: PathBuf,
    /// Feature property holding the ISO3 code to join on.
    pub iso_property: String,
    pub selection: TargetSelection,
    /// Optional JSON object of extra `"location name": "ISO3"` pairs.
    pub aliases: Option<PathBuf>,
    /// Also apply the alias file shipped with the crate.
    pub bundled_aliases: bool,
    pub indent: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            statistics: PathBuf::from(DEFAULT_STATISTICS_CSV),
            geojson: PathBuf::from(DEFAULT_FILTERED_GEOJSON),
            output: PathBuf::from(DEFAULT_MERGED_GEOJSON),
            iso_property: DEFAULT_ISO3_PROPERTY.to_string(),
            selection: TargetSelection::default(),
            aliases: None,
            bundled_aliases: false,
            indent: DEFAULT_MERGE_INDENT,
        }
    }
}

/// Both stages of the batch job.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub merge: MergeConfig,
}

impl PipelineConfig {
    /// Loads a JSON config file. Missing sections and fields keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let doc = crate::io::read_document(path.as_ref())?;
        Ok(serde_json::from_value(doc)?)
    }
}
