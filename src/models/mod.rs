//! Core data models for the coverage system.

pub mod antenna;
pub mod coverage;
pub mod flag;
pub mod provider;

pub use antenna::{AntennaRecord, ProjectedSite};
pub use coverage::{CoveragePayload, CoverageRecord, GenerationSupport};
pub use provider::{Provider, UnknownProvider};
