// crates/atlasprep-core/src/filter.rs
use crate::allowlist::PropertyAllowlist;
use crate::config::FilterConfig;
use crate::document::{features_mut, properties_mut};
use crate::error::Result;
use crate::io::{read_document, write_document};
use serde::Serialize;
use serde_json::Value;

/// Counters collected while pruning a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub features: usize,
    /// Entries of `features` that were not JSON objects; left as they were.
    pub skipped: usize,
    /// Features whose `properties` was absent or not an object.
    pub repaired: usize,
    pub dropped_properties: usize,
}

/// Restricts every feature's `properties` to the keys in `allowlist`.
///
/// Only `properties` is touched. Geometry, ids and foreign members are left
/// exactly as they were, and surviving keys keep their input order. A
/// document without a `features` array is returned unchanged with an empty
/// report.
pub fn filter_properties(doc: &mut Value, allowlist: &PropertyAllowlist) -> FilterReport {
    let mut report = FilterReport::default();

    let Some(features) = features_mut(doc) else {
        log::warn!("document has no `features` array; nothing to filter");
        return report;
    };

    for feature in features.iter_mut() {
        let Some(obj) = feature.as_object_mut() else {
            report.skipped += 1;
            continue;
        };
        let Some((props, repaired)) = properties_mut(obj) else {
            report.skipped += 1;
            continue;
        };
        report.features += 1;

        if repaired {
            report.repaired += 1;
        }

        let before = props.len();
        props.retain(|key, _| allowlist.contains(key));
        report.dropped_properties += before - props.len();
    }

    report
}

/// Load → filter → save, as configured.
pub fn run_filter(config: &FilterConfig) -> Result<FilterReport> {
    log::info!("filtering {}", config.input.display());
    let mut doc = read_document(&config.input)?;

    let report = filter_properties(&mut doc, &config.allowlist);

    write_document(&config.output, &doc, config.indent)?;
    log::info!(
        "wrote {} features to {} ({} properties dropped)",
        report.features,
        config.output.display(),
        report.dropped_properties
    );
    Ok(report)
}
