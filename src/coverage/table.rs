//! Coverage Table persistence (`provider,lon,lat,2G,3G,4G,city`).

use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use super::{coverage_for_city, CoverageError};
use crate::models::{CoveragePayload, CoverageRecord};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to access coverage table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid coverage table row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to replace coverage table: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Ordered Coverage Records, as built offline and served online
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageTable {
    records: Vec<CoverageRecord>,
}

impl CoverageTable {
    pub fn new(records: Vec<CoverageRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} coverage records from {}", table.len(), path.display());
        Ok(table)
    }

    /// Read a table with a header row. Columns are matched by position.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.records() {
            records.push(row?.deserialize(None)?);
        }
        Ok(Self { records })
    }

    /// Write to `path`, replacing any previous table in a single rename.
    pub fn write(&self, path: &Path) -> Result<(), TableError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| TableError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        self.write_to(&mut tmp)?;
        tmp.persist(path)?;

        info!("Wrote {} coverage records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn lookup(&self, city: &str) -> Result<CoveragePayload, CoverageError> {
        coverage_for_city(&self.records, city)
    }

    pub fn records(&self) -> &[CoverageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub(super) fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}
