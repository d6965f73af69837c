//! atlasprep — Command-line batch job for the atlas country layer
//!
//! Usage examples
//! --------------
//!
//! - Run the whole job with the fixed file names in the working directory
//!   $ atlasprep
//!
//! - Only prune properties
//!   $ atlasprep filter
//!   $ atlasprep filter --keep name_en,iso_a2,iso_a3 -o slim.geo.json
//!
//! - Only join statistics, with extra spellings for the country lookup
//!   $ atlasprep merge --bundled-aliases
//!   $ atlasprep merge --aliases my_aliases.json --year 2019
//!
//! - Check an output file, or how names resolve
//!   $ atlasprep inspect merged_dementia.geo.json
//!   $ atlasprep resolve "Iran (Islamic Republic of)" "Türkiye"
//!
//! Logging goes to stderr through env_logger (`RUST_LOG=debug` shows every
//! matched feature); audit and confirmation lines go to stdout.
mod args;

use crate::args::{CliArgs, Commands, FilterArgs, MergeArgs};
use anyhow::Context;
use atlasprep_core::country::CountryResolver;
use atlasprep_core::io::read_document;
use atlasprep_core::{
    configured_resolver, run_filter, run_merge, DocumentStats, FilterConfig, MergeConfig,
    PipelineConfig, PropertyAllowlist,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match args.command {
        None => {
            filter(&config.filter)?;
            merge(&config.merge)?;
        }

        Some(Commands::Filter(fa)) => {
            let cfg = apply_filter_args(config.filter, fa)?;
            filter(&cfg)?;
        }

        Some(Commands::Merge(ma)) => {
            let cfg = apply_merge_args(config.merge, ma);
            merge(&cfg)?;
        }

        Some(Commands::Inspect { path }) => {
            let doc = read_document(&path).with_context(|| format!("reading {}", path.display()))?;
            let stats = DocumentStats::collect(&doc);
            println!("{}:", path.display());
            println!("  Features: {}", stats.features);
            println!("  Features with null val: {}", stats.null_values);
            println!("  Properties:");
            for (key, count) in &stats.property_counts {
                println!("    {key}: {count}");
            }
        }

        Some(Commands::Resolve {
            names,
            bundled_aliases,
        }) => {
            let cfg = MergeConfig {
                bundled_aliases: bundled_aliases || config.merge.bundled_aliases,
                ..config.merge
            };
            let resolver = configured_resolver(&cfg)?;
            for name in names {
                match resolver.resolve_iso3(&name) {
                    Some(code) => println!("{name} -> {code}"),
                    None => eprintln!("No country found for: {name}"),
                }
            }
        }
    }

    Ok(())
}

fn filter(cfg: &FilterConfig) -> anyhow::Result<()> {
    let report = run_filter(cfg).with_context(|| format!("filtering {}", cfg.input.display()))?;
    println!("Only properties {} retained successfully!", cfg.allowlist);
    if report.repaired > 0 || report.skipped > 0 {
        println!(
            "  ({} features without usable properties, {} non-object entries left as-is)",
            report.repaired, report.skipped
        );
    }
    Ok(())
}

fn merge(cfg: &MergeConfig) -> anyhow::Result<()> {
    let resolver = configured_resolver(cfg).context("building the country resolver")?;
    let summary = run_merge(cfg, &resolver)
        .with_context(|| format!("merging {} into {}", cfg.statistics.display(), cfg.geojson.display()))?;

    let (extract, joined) = (&summary.extract, &summary.merge);
    println!(
        "Merged statistics for {} of {} features into {}",
        joined.matched,
        joined.features,
        cfg.output.display()
    );
    println!(
        "  Rows: {} read, {} selected, {} unmatched countries, {} unparsable",
        extract.rows, extract.selected, extract.unresolved, extract.malformed
    );
    if let Some((lo, hi)) = joined.val_range {
        println!("  val range: {lo} .. {hi}");
    }
    Ok(())
}

fn apply_filter_args(mut cfg: FilterConfig, args: FilterArgs) -> anyhow::Result<FilterConfig> {
    if let Some(input) = args.input {
        cfg.input = input;
    }
    if let Some(output) = args.output {
        cfg.output = output;
    }
    if let Some(keep) = args.keep {
        cfg.allowlist = PropertyAllowlist::parse_csv(&keep).context("parsing --keep")?;
    }
    if let Some(indent) = args.indent {
        cfg.indent = indent;
    }
    Ok(cfg)
}

fn apply_merge_args(mut cfg: MergeConfig, args: MergeArgs) -> MergeConfig {
    if let Some(csv) = args.csv {
        cfg.statistics = csv;
    }
    if let Some(geojson) = args.geojson {
        cfg.geojson = geojson;
    }
    if let Some(output) = args.output {
        cfg.output = output;
    }
    if args.aliases.is_some() {
        cfg.aliases = args.aliases;
    }
    cfg.bundled_aliases |= args.bundled_aliases;
    if let Some(key) = args.iso_property {
        cfg.iso_property = key;
    }
    if let Some(year) = args.year {
        cfg.selection.year = year;
    }
    if let Some(indent) = args.indent {
        cfg.indent = indent;
    }
    cfg
}
