//! Reduce the reverse geocoder's CSV to Coverage Records.

use csv::ReaderBuilder;

use super::BuildError;
use crate::geocoding::CITY_COLUMN;
use crate::models::flag::is_supported;
use crate::models::{CoverageRecord, Provider};

/// Keep provider, position, flags and city; drop every other column.
pub fn reconcile(response: &str) -> Result<Vec<CoverageRecord>, BuildError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(response.as_bytes());

    let city_idx = csv_reader
        .headers()?
        .iter()
        .position(|h| h == "result_city")
        .unwrap_or(CITY_COLUMN);

    let mut records = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let row = row?;
        let line = i + 1;
        let malformed = |reason: String| BuildError::MalformedResponse { row: line, reason };

        if row.len() <= city_idx {
            return Err(malformed(format!(
                "expected at least {} columns, found {}",
                city_idx + 1,
                row.len()
            )));
        }

        let provider = row[0]
            .parse::<Provider>()
            .map_err(|e| malformed(e.to_string()))?;
        let lon: f64 = row[1]
            .trim()
            .parse()
            .map_err(|_| malformed(format!("invalid longitude '{}'", &row[1])))?;
        let lat: f64 = row[2]
            .trim()
            .parse()
            .map_err(|_| malformed(format!("invalid latitude '{}'", &row[2])))?;

        records.push(CoverageRecord {
            provider,
            lon,
            lat,
            two_g: is_supported(&row[3]),
            three_g: is_supported(&row[4]),
            four_g: is_supported(&row[5]),
            city: row[city_idx].to_string(),
        });
    }

    Ok(records)
}
