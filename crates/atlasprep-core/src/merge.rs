// crates/atlasprep-core/src/merge.rs
use crate::config::MergeConfig;
use crate::country::{AliasResolver, CountryResolver, Iso3166Resolver};
use crate::document::{features_mut, properties_mut};
use crate::error::Result;
use crate::extract::{extract_statistics, ExtractReport, StatisticRecord, StatisticTable};
use crate::io::{open_stream, read_document, write_document};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Keys every merged feature carries, populated or `null`.
pub const STAT_KEYS: [&str; 3] = ["val", "upper", "lower"];
/// Key receiving the CSV location name on a match.
pub const COUNTRY_KEY: &str = "country";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    pub features: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Entries of `features` that were not JSON objects; left as they were.
    pub skipped: usize,
    /// Table codes no feature asked for, in ascending order.
    pub orphans: Vec<String>,
    /// Smallest and largest `val` written, if anything matched.
    pub val_range: Option<(f64, f64)>,
}

/// Both halves of a merge run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeSummary {
    pub extract: ExtractReport,
    pub merge: MergeReport,
}

/// Joins `table` onto every feature by the ISO3 code in property `iso_key`.
///
/// A match writes `val`, `upper`, `lower` and `country`, overwriting those
/// keys if present. Anything else (missing code, non-string code, unknown
/// code) writes `null` into `val`, `upper` and `lower` and leaves the other
/// properties alone, `country` included.
pub fn merge_statistics(doc: &mut Value, table: &StatisticTable, iso_key: &str) -> MergeReport {
    let mut report = MergeReport::default();
    let mut claimed: BTreeSet<&str> = BTreeSet::new();

    if let Some(features) = features_mut(doc) {
        for feature in features.iter_mut() {
            let Some(obj) = feature.as_object_mut() else {
                report.skipped += 1;
                continue;
            };
            let Some((props, _)) = properties_mut(obj) else {
                report.skipped += 1;
                continue;
            };
            report.features += 1;

            let hit = props
                .get(iso_key)
                .and_then(Value::as_str)
                .and_then(|code| table.get_key_value(code));

            match hit {
                Some((code, stat)) => {
                    log::debug!("matched {code}: {}", stat.country);
                    apply_record(props, stat);
                    claimed.insert(code.as_str());
                    report.matched += 1;
                    report.val_range = Some(match report.val_range {
                        Some((lo, hi)) => (lo.min(stat.val), hi.max(stat.val)),
                        None => (stat.val, stat.val),
                    });
                }
                None => {
                    for key in STAT_KEYS {
                        props.insert(key.to_string(), Value::Null);
                    }
                    report.unmatched += 1;
                }
            }
        }
    } else {
        log::warn!("document has no `features` array; nothing to merge");
    }

    report.orphans = table
        .iter()
        .map(|(code, _)| code.as_str())
        .filter(|code| !claimed.contains(code))
        .map(str::to_string)
        .collect();

    report
}

fn apply_record(props: &mut Map<String, Value>, stat: &StatisticRecord) {
    props.insert("val".to_string(), Value::from(stat.val));
    props.insert("upper".to_string(), Value::from(stat.upper));
    props.insert("lower".to_string(), Value::from(stat.lower));
    props.insert(COUNTRY_KEY.to_string(), Value::from(stat.country.as_str()));
}

/// The resolver a configured merge uses: the ISO 3166 table, wrapped with the
/// bundled and/or user alias files when those are enabled.
pub fn configured_resolver(config: &MergeConfig) -> Result<AliasResolver<Iso3166Resolver>> {
    let mut resolver = AliasResolver::new(Iso3166Resolver::new()?);
    if config.bundled_aliases {
        resolver = resolver.with_bundled_aliases()?;
    }
    if let Some(path) = &config.aliases {
        resolver = resolver.extend_from_path(path)?;
    }
    Ok(resolver)
}

/// Extract → load GeoJSON → merge → save, as configured.
pub fn run_merge<C>(config: &MergeConfig, resolver: &C) -> Result<MergeSummary>
where
    C: CountryResolver + ?Sized,
{
    log::info!("reading statistics from {}", config.statistics.display());
    let reader = open_stream(&config.statistics)?;
    let (table, extract) = extract_statistics(reader, &config.selection, resolver)?;

    let mut doc = read_document(&config.geojson)?;
    let merge = merge_statistics(&mut doc, &table, &config.iso_property);

    write_document(&config.output, &doc, config.indent)?;
    log::info!(
        "wrote {} features to {} ({} matched, {} without data)",
        merge.features,
        config.output.display(),
        merge.matched,
        merge.unmatched
    );
    if !merge.orphans.is_empty() {
        log::info!("statistics without a map feature: {}", merge.orphans.join(", "));
    }

    Ok(MergeSummary { extract, merge })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> StatisticTable {
        let mut t = StatisticTable::new();
        t.insert(
            "TST",
            StatisticRecord {
                val: 1.5,
                upper: 2.0,
                lower: 1.0,
                country: "Testland".into(),
            },
        );
        t.insert(
            "OTH",
            StatisticRecord {
                val: 9.0,
                upper: 10.0,
                lower: 8.0,
                country: "Otherland".into(),
            },
        );
        t
    }

    #[test]
    fn matched_feature_gets_statistics() {
        let mut doc = json!({"features": [
            {"properties": {"name_en": "Testland", "iso_a3": "TST"}, "geometry": null}
        ]});

        let report = merge_statistics(&mut doc, &table(), "iso_a3");

        assert_eq!(
            doc["features"][0]["properties"],
            json!({
                "name_en": "Testland",
                "iso_a3": "TST",
                "val": 1.5,
                "upper": 2.0,
                "lower": 1.0,
                "country": "Testland"
            })
        );
        assert_eq!(report.matched, 1);
        assert_eq!(report.orphans, vec!["OTH".to_string()]);
        assert_eq!(report.val_range, Some((1.5, 1.5)));
    }

    #[test]
    fn unmatched_features_get_explicit_nulls() {
        let mut doc = json!({"features": [
            {"properties": {"iso_a3": "ZZZ", "country": "kept"}},
            {"properties": {"iso_a3": -99}},
            {"properties": {}},
            {}
        ]});

        let report = merge_statistics(&mut doc, &table(), "iso_a3");

        for f in doc["features"].as_array().unwrap() {
            for key in STAT_KEYS {
                assert_eq!(f["properties"][key], Value::Null, "{key} in {f}");
                assert!(f["properties"].get(key).is_some());
            }
        }
        assert_eq!(doc["features"][0]["properties"]["country"], json!("kept"));
        assert_eq!(report.unmatched, 4);
        assert_eq!(report.orphans.len(), 2);
        assert_eq!(report.val_range, None);
    }

    #[test]
    fn colliding_keys_are_overwritten_in_place() {
        let mut doc = json!({"features": [
            {"properties": {"val": "old", "iso_a3": "OTH", "country": "stale"}}
        ]});
        merge_statistics(&mut doc, &table(), "iso_a3");

        let props = doc["features"][0]["properties"].as_object().unwrap();
        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, ["val", "iso_a3", "country", "upper", "lower"]);
        assert_eq!(props["val"], json!(9.0));
        assert_eq!(props["country"], json!("Otherland"));
    }

    #[test]
    fn custom_iso_key_is_honoured() {
        let mut doc = json!({"features": [{"properties": {"ADM0_A3": "TST"}}]});
        let report = merge_statistics(&mut doc, &table(), "ADM0_A3");
        assert_eq!(report.matched, 1);
    }

    #[test]
    fn missing_features_yields_all_orphans() {
        let mut doc = json!({});
        let report = merge_statistics(&mut doc, &table(), "iso_a3");
        assert_eq!(report.features, 0);
        assert_eq!(report.orphans, vec!["OTH".to_string(), "TST".to_string()]);
    }
}
