// crates/atlasprep-core/src/lib.rs

//! atlasprep-core
//! ==============
//!
//! Builds the static country layer for the atlas globe view in two stages:
//!
//! ```text
//!  countries.geo.json ──► filter ──► countries.geo2.json ─┐
//!                                                         ├─► merge ──► merged_dementia.geo.json
//!  2021dementia.csv ────► extract (ISO3 lookup table) ────┘
//! ```
//!
//! - [`filter`] prunes every feature's `properties` to a [`PropertyAllowlist`].
//! - [`extract`] selects one measure/metric/age/sex/year slice of the CSV and
//!   keys it by ISO3 code through a [`CountryResolver`].
//! - [`merge`] attaches `val`/`upper`/`lower` to each feature, or explicit
//!   `null`s when there is no data.
//!
//! Geometry is never inspected.

pub mod allowlist;
pub mod config;
pub mod country;
pub mod document;
pub mod error;
pub mod extract;
pub mod filter;
pub mod io;
pub mod merge;
pub mod text;

// Re-exports
pub use crate::allowlist::PropertyAllowlist;
pub use crate::config::{FilterConfig, MergeConfig, PipelineConfig};
pub use crate::document::DocumentStats;
pub use crate::country::{AliasResolver, CountryResolver, Iso3166Resolver};
pub use crate::error::{PrepError, Result};
pub use crate::extract::{
    extract_statistics, ExtractReport, StatisticRecord, StatisticTable, TargetSelection,
};
pub use crate::filter::{filter_properties, run_filter, FilterReport};
pub use crate::merge::{configured_resolver, merge_statistics, run_merge, MergeReport, MergeSummary};
