// crates/atlasprep-core/src/extract.rs

//! # Statistics Extraction
//!
//! Streams the statistics CSV and builds the ISO3 lookup table that the
//! merge stage joins onto the map features.
//!
//! Per row, in this order:
//! 1. keep the row only if `measure`, `metric`, `age`, `sex` and `year`
//!    equal the [`TargetSelection`] exactly;
//! 2. resolve `location` to an ISO3 code (warn and skip on failure);
//! 3. parse `val`, `upper`, `lower` as finite numbers (skip silently on
//!    failure);
//! 4. store the record under its code. **Last write wins.**

use crate::country::CountryResolver;
use crate::error::{PrepError, Result};
use crate::text::parse_finite_f64;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::io::Read;

/// The five categorical columns a row must match to be kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSelection {
    pub measure: String,
    pub metric: String,
    pub age: String,
    pub sex: String,
    pub year: String,
}

impl Default for TargetSelection {
    fn default() -> Self {
        Self {
            measure: "Prevalence".into(),
            metric: "Rate".into(),
            age: "55+ years".into(),
            sex: "Both".into(),
            year: "2021".into(),
        }
    }
}

impl TargetSelection {
    /// Exact, case-sensitive comparison of all five fields.
    pub fn matches(&self, measure: &str, metric: &str, age: &str, sex: &str, year: &str) -> bool {
        self.measure == measure
            && self.metric == metric
            && self.age == age
            && self.sex == sex
            && self.year == year
    }
}

/// One selected row with its three numbers parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticRecord {
    pub val: f64,
    pub upper: f64,
    pub lower: f64,
    /// Location name exactly as it appeared in the CSV.
    pub country: String,
}

/// ISO3 code → statistic, holding at most one record per code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticTable {
    records: BTreeMap<String, StatisticRecord>,
}

impl StatisticTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `iso3`, replacing any earlier record for the
    /// same code. The displaced record is returned.
    pub fn insert(&mut self, iso3: impl Into<String>, record: StatisticRecord) -> Option<StatisticRecord> {
        self.records.insert(iso3.into(), record)
    }

    pub fn get(&self, iso3: &str) -> Option<&StatisticRecord> {
        self.records.get(iso3)
    }

    pub fn get_key_value(&self, iso3: &str) -> Option<(&String, &StatisticRecord)> {
        self.records.get_key_value(iso3)
    }

    pub fn contains(&self, iso3: &str) -> bool {
        self.records.contains_key(iso3)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries in ascending ISO3 order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, StatisticRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a StatisticTable {
    type Item = (&'a String, &'a StatisticRecord);
    type IntoIter = btree_map::Iter<'a, String, StatisticRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Data rows read (header excluded).
    pub rows: usize,
    /// Rows matching the target selection.
    pub selected: usize,
    /// Selected rows whose location did not resolve to an ISO3 code.
    pub unresolved: usize,
    /// Resolved rows with an unparsable or non-finite number.
    pub malformed: usize,
    /// Stored records that replaced an earlier record for the same code.
    pub overwritten: usize,
}

const MEASURE: usize = 0;
const METRIC: usize = 1;
const AGE: usize = 2;
const SEX: usize = 3;
const YEAR: usize = 4;
const LOCATION: usize = 5;
const VAL: usize = 6;
const UPPER: usize = 7;
const LOWER: usize = 8;

/// Header names, indexed by the slot constants above.
const REQUIRED_COLUMNS: [&str; 9] = {
    let mut names = [""; 9];
    names[MEASURE] = "measure";
    names[METRIC] = "metric";
    names[AGE] = "age";
    names[SEX] = "sex";
    names[YEAR] = "year";
    names[LOCATION] = "location";
    names[VAL] = "val";
    names[UPPER] = "upper";
    names[LOWER] = "lower";
    names
};

/// Column positions resolved from the CSV header.
struct Columns([usize; 9]);

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut idx = [0usize; 9];
        for (slot, wanted) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = names
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| PrepError::MissingColumn(wanted.to_string()))?;
        }
        Ok(Self(idx))
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, column: usize) -> &'r str {
        record.get(self.0[column]).unwrap_or("")
    }
}

/// Builds the ISO3 lookup table from CSV data.
///
/// Fails only on I/O or CSV framing errors and on a header missing one of
/// `measure, metric, age, sex, year, location, val, upper, lower`. Bad rows
/// are skipped and counted in the returned [`ExtractReport`].
pub fn extract_statistics<R, C>(
    reader: R,
    selection: &TargetSelection,
    resolver: &C,
) -> Result<(StatisticTable, ExtractReport)>
where
    R: Read,
    C: CountryResolver + ?Sized,
{
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let cols = Columns::from_headers(rdr.headers()?)?;

    let mut table = StatisticTable::new();
    let mut report = ExtractReport::default();
    let mut record = csv::StringRecord::new();

    while rdr.read_record(&mut record)? {
        report.rows += 1;

        if !selection.matches(
            cols.cell(&record, MEASURE),
            cols.cell(&record, METRIC),
            cols.cell(&record, AGE),
            cols.cell(&record, SEX),
            cols.cell(&record, YEAR),
        ) {
            continue;
        }
        report.selected += 1;

        let location = cols.cell(&record, LOCATION);
        let Some(iso3) = resolver.resolve_iso3(location) else {
            log::warn!("unmatched country: {location}");
            report.unresolved += 1;
            continue;
        };

        let parsed = (
            parse_finite_f64(cols.cell(&record, VAL)),
            parse_finite_f64(cols.cell(&record, UPPER)),
            parse_finite_f64(cols.cell(&record, LOWER)),
        );
        let (Some(val), Some(upper), Some(lower)) = parsed else {
            report.malformed += 1;
            continue;
        };

        let stat = StatisticRecord {
            val,
            upper,
            lower,
            country: location.to_string(),
        };
        if let Some(previous) = table.insert(iso3.clone(), stat) {
            log::debug!(
                "{iso3}: '{location}' replaces earlier row for '{}'",
                previous.country
            );
            report.overwritten += 1;
        }
    }

    log::info!(
        "extracted {} countries from {} rows ({} selected, {} unresolved, {} malformed)",
        table.len(),
        report.rows,
        report.selected,
        report.unresolved,
        report.malformed
    );
    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "measure,location,sex,age,metric,year,val,upper,lower\n";

    fn testland(name: &str) -> Option<String> {
        match name {
            "Testland" | "Republic of Testland" => Some("TST".into()),
            "Otherland" => Some("OTH".into()),
            _ => None,
        }
    }

    fn run(body: &str) -> (StatisticTable, ExtractReport) {
        let data = format!("{HEADER}{body}");
        extract_statistics(data.as_bytes(), &TargetSelection::default(), &testland).unwrap()
    }

    #[test]
    fn selected_row_becomes_record() {
        let (table, report) = run("Prevalence,Testland,Both,55+ years,Rate,2021,1.5,2.0,1.0\n");
        assert_eq!(
            table.get("TST"),
            Some(&StatisticRecord {
                val: 1.5,
                upper: 2.0,
                lower: 1.0,
                country: "Testland".into()
            })
        );
        assert_eq!(report.rows, 1);
        assert_eq!(report.selected, 1);
    }

    #[test]
    fn any_mismatched_category_excludes_row() {
        let body = "\
Deaths,Testland,Both,55+ years,Rate,2021,1,1,1
Prevalence,Testland,Both,55+ years,Number,2021,1,1,1
Prevalence,Testland,Both,All ages,Rate,2021,1,1,1
Prevalence,Testland,Male,55+ years,Rate,2021,1,1,1
Prevalence,Testland,Both,55+ years,Rate,2019,1,1,1
prevalence,Testland,Both,55+ years,Rate,2021,1,1,1
";
        let (table, report) = run(body);
        assert!(table.is_empty());
        assert_eq!(report.rows, 6);
        assert_eq!(report.selected, 0);
    }

    #[test]
    fn unresolved_and_malformed_rows_are_skipped() {
        let body = "\
Prevalence,Atlantis,Both,55+ years,Rate,2021,1,2,0.5
Prevalence,Testland,Both,55+ years,Rate,2021,n/a,2,0.5
Prevalence,Otherland,Both,55+ years,Rate,2021,NaN,2,0.5
Prevalence,Otherland,Both,55+ years,Rate,2021,3,,1
";
        let (table, report) = run(body);
        assert!(table.is_empty());
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.malformed, 3);
    }

    #[test]
    fn later_rows_overwrite_earlier_ones() {
        let body = "\
Prevalence,Testland,Both,55+ years,Rate,2021,1,2,0.5
Prevalence,Republic of Testland,Both,55+ years,Rate,2021,7,8,6
";
        let (table, report) = run(body);
        assert_eq!(table.len(), 1);
        let rec = table.get("TST").unwrap();
        assert_eq!(rec.val, 7.0);
        assert_eq!(rec.country, "Republic of Testland");
        assert_eq!(report.overwritten, 1);
    }

    #[test]
    fn short_rows_do_not_abort_the_run() {
        let body = "\
Prevalence,Testland
Prevalence,Otherland,Both,55+ years,Rate,2021,4,5,3
";
        let (table, report) = run(body);
        assert_eq!(report.rows, 2);
        assert!(table.contains("OTH"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let data = "measure,metric,age,sex,year,location,val,upper\n";
        let err = extract_statistics(data.as_bytes(), &TargetSelection::default(), &testland)
            .unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(c) if c == "lower"));
    }

    #[test]
    fn columns_are_read_by_header_name() {
        let data = "lower,upper,val,location,year,sex,age,metric,measure\n\
                    0.5,2.5,1.5,Testland,2021,Both,55+ years,Rate,Prevalence\n";
        let (table, _) =
            extract_statistics(data.as_bytes(), &TargetSelection::default(), &testland).unwrap();
        let rec = table.get("TST").unwrap();
        assert_eq!((rec.val, rec.upper, rec.lower), (1.5, 2.5, 0.5));
        assert_eq!(rec.country, "Testland");
    }

    #[test]
    fn every_slot_names_a_distinct_column() {
        for (i, name) in REQUIRED_COLUMNS.iter().enumerate() {
            assert!(!name.is_empty());
            assert!(!REQUIRED_COLUMNS[i + 1..].contains(name), "{name} listed twice");
        }
        assert_eq!(REQUIRED_COLUMNS[LOCATION], "location");
        assert_eq!(REQUIRED_COLUMNS[VAL], "val");
    }

    #[test]
    fn header_byte_order_mark_is_ignored() {
        let data = "\u{feff}measure,metric,age,sex,year,location,val,upper,lower\n\
                    Prevalence,Rate,55+ years,Both,2021,Testland,1,2,0\n";
        let (table, _) =
            extract_statistics(data.as_bytes(), &TargetSelection::default(), &testland).unwrap();
        assert!(table.contains("TST"));
    }
}
