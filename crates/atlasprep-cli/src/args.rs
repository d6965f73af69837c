use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for atlasprep
#[derive(Debug, Parser)]
#[command(
    name = "atlasprep",
    version,
    about = "Builds the merged country GeoJSON for the atlas globe view"
)]
pub struct CliArgs {
    /// JSON config file; explicit flags override its values
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Without a subcommand, runs `filter` and then `merge` with the defaults
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Keep only allowlisted feature properties
    Filter(FilterArgs),

    /// Join CSV statistics onto features by ISO3 code
    Merge(MergeArgs),

    /// Summarize a GeoJSON file (feature count, property coverage)
    Inspect {
        /// GeoJSON file to inspect (.gz accepted)
        path: PathBuf,
    },

    /// Resolve location names to ISO3 codes the way `merge` would
    Resolve {
        /// Location names, e.g. "Côte d'Ivoire"
        #[arg(required = true)]
        names: Vec<String>,

        /// Also apply the bundled alias file
        #[arg(long = "bundled-aliases")]
        bundled_aliases: bool,
    },
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Source GeoJSON (default: countries.geo.json)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Filtered GeoJSON (default: countries.geo2.json)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Comma-separated property keys to keep (e.g. name_en,iso_a3)
    #[arg(short = 'k', long = "keep")]
    pub keep: Option<String>,

    /// Spaces per indentation level (default: 4)
    #[arg(long = "indent")]
    pub indent: Option<usize>,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Statistics CSV (default: 2021dementia.csv)
    #[arg(long = "csv")]
    pub csv: Option<PathBuf>,

    /// GeoJSON to enrich (default: countries.geo2.json)
    #[arg(short = 'g', long = "geojson")]
    pub geojson: Option<PathBuf>,

    /// Merged GeoJSON (default: merged_dementia.geo.json)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// JSON object of extra "location name": "ISO3" pairs
    #[arg(short = 'a', long = "aliases")]
    pub aliases: Option<PathBuf>,

    /// Also apply the bundled alias file
    #[arg(long = "bundled-aliases")]
    pub bundled_aliases: bool,

    /// Feature property holding the ISO3 code (default: iso_a3)
    #[arg(long = "iso-property")]
    pub iso_property: Option<String>,

    /// Year to select (default: 2021)
    #[arg(long = "year")]
    pub year: Option<String>,

    /// Spaces per indentation level (default: 2)
    #[arg(long = "indent")]
    pub indent: Option<usize>,
}
