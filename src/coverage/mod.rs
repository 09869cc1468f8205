//! City-keyed coverage data: the persisted table and lookups against it.

mod lookup;
mod table;

pub use lookup::{coverage_for_city, lookup_file};
pub use table::{CoverageTable, TableError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("city '{0}' is not in the coverage table")]
    CityNotFound(String),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("coverage lookup task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
