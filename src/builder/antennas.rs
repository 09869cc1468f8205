//! Reading raw antenna rows and turning them into uploadable sites.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use flate2::read::GzDecoder;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

use super::BuildError;
use crate::models::{AntennaRecord, ProjectedSite, Provider};
use crate::projection::Reprojector;

/// Load the ARCEP antenna file (`Operateur;x;y;2G;3G;4G`), optionally gzipped.
pub fn read_antennas(path: &Path) -> Result<Vec<AntennaRecord>, BuildError> {
    info!("Loading antenna sites from {}", path.display());

    let file = File::open(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let antennas = read_antennas_from(reader)?;
    info!("Loaded {} antenna sites", antennas.len());
    Ok(antennas)
}

pub fn read_antennas_from<R: Read>(reader: R) -> Result<Vec<AntennaRecord>, BuildError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .trim(Trim::All)
        .from_reader(reader);

    let mut antennas = Vec::new();
    for row in csv_reader.records() {
        antennas.push(row?.deserialize(None)?);
    }
    Ok(antennas)
}

/// Resolve providers and reproject every antenna, keeping input order.
///
/// Any operator code outside the known four aborts the whole run.
pub fn project_antennas<R>(
    antennas: &[AntennaRecord],
    reprojector: &R,
) -> Result<Vec<ProjectedSite>, BuildError>
where
    R: Reprojector + ?Sized,
{
    antennas
        .par_iter()
        .enumerate()
        .map(|(i, antenna)| {
            let provider = Provider::from_operator_code(&antenna.operator_code).ok_or_else(|| {
                BuildError::UnknownOperator {
                    code: antenna.operator_code.clone(),
                    row: i + 1,
                }
            })?;
            let position = reprojector.to_geographic(antenna.projected());
            Ok(ProjectedSite::new(provider, position, antenna))
        })
        .collect()
}

/// Encode sites as the comma-separated upload (`provider,lon,lat,2G,3G,4G`)
pub fn encode_sites(sites: &[ProjectedSite]) -> Result<Vec<u8>, BuildError> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for site in sites {
        csv_writer.serialize(site)?;
    }
    let bytes = csv_writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(bytes)
}
