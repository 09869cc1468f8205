//! Offline Coverage Table builder.
//!
//! Raw ARCEP antenna rows are mapped to providers, reprojected from
//! Lambert-93 to WGS84, uploaded in one batch to the reverse geocoder and
//! reconciled into Coverage Records.

mod antennas;
mod reconcile;

pub use antennas::{encode_sites, project_antennas, read_antennas, read_antennas_from};
pub use reconcile::reconcile;

use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::coverage::{CoverageTable, TableError};
use crate::geocoding::{GeocodeError, GeocodingClient};
use crate::models::AntennaRecord;
use crate::projection::Reprojector;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown operator code '{code}' on data row {row}")]
    UnknownOperator { code: String, row: usize },
    #[error("upload of {size} bytes exceeds the geocoder limit of {limit} bytes, split the input")]
    PayloadTooLarge { size: usize, limit: usize },
    #[error("malformed geocoder response on row {row}: {reason}")]
    MalformedResponse { row: usize, reason: String },
    #[error("reverse geocoding failed: {0}")]
    ReverseGeocode(#[from] GeocodeError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Runs the build stages against one reverse geocoder
pub struct CoverageBuilder<R> {
    client: GeocodingClient,
    reprojector: R,
    max_upload_bytes: usize,
}

impl<R: Reprojector> CoverageBuilder<R> {
    pub fn new(client: GeocodingClient, reprojector: R, max_upload_bytes: usize) -> Self {
        Self {
            client,
            reprojector,
            max_upload_bytes,
        }
    }

    /// Map operators and reproject, producing the upload payload.
    pub fn project(&self, antennas: &[AntennaRecord]) -> Result<Vec<u8>, BuildError> {
        let sites = project_antennas(antennas, &self.reprojector)?;
        info!("Projected {} antenna sites", sites.len());
        encode_sites(&sites)
    }

    /// Reverse geocode an encoded site payload into a Coverage Table.
    pub async fn resolve(&self, payload: Vec<u8>) -> Result<CoverageTable, BuildError> {
        if payload.len() > self.max_upload_bytes {
            return Err(BuildError::PayloadTooLarge {
                size: payload.len(),
                limit: self.max_upload_bytes,
            });
        }

        let response = self.client.reverse_csv(payload).await?;
        let records = reconcile(&response)?;

        let unresolved = records.iter().filter(|r| r.city.is_empty()).count();
        if unresolved > 0 {
            warn!(
                "{} of {} sites have no city and will never match a lookup",
                unresolved,
                records.len()
            );
        }

        Ok(CoverageTable::new(records))
    }

    pub async fn build(&self, antennas: &[AntennaRecord]) -> Result<CoverageTable, BuildError> {
        let payload = self.project(antennas)?;
        self.resolve(payload).await
    }
}
