//! Per-city aggregation of coverage records.

use csv::ReaderBuilder;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use super::table::open;
use super::{CoverageError, TableError};
use crate::models::{CoveragePayload, CoverageRecord};

/// Build the payload for `city` (exact, case-sensitive match).
///
/// The first record seen for a provider wins; later records for the same
/// provider are ignored even when their flags differ.
pub fn coverage_for_city<'a, I>(records: I, city: &str) -> Result<CoveragePayload, CoverageError>
where
    I: IntoIterator<Item = &'a CoverageRecord>,
{
    let mut payload = CoveragePayload::new();
    let mut matched = 0usize;

    for record in records.into_iter().filter(|r| r.city == city) {
        matched += 1;
        payload
            .entry(record.provider)
            .or_insert_with(|| record.support());
    }

    if matched == 0 {
        return Err(CoverageError::CityNotFound(city.to_string()));
    }

    debug!(
        "{} records for {}, {} providers",
        matched,
        city,
        payload.len()
    );
    Ok(payload)
}

/// Scan the table file at `path` for `city` without keeping other rows.
pub fn lookup_file(path: &Path, city: &str) -> Result<CoveragePayload, CoverageError> {
    let file = open(path)?;
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let mut matches = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(TableError::from)?;
        // Cheap column check before deserializing the whole row
        if row.get(6) != Some(city) {
            continue;
        }
        let record: CoverageRecord = row.deserialize(None).map_err(TableError::from)?;
        matches.push(record);
    }

    coverage_for_city(&matches, city)
}
