//! Netcoverage - mobile network coverage by French postal address
//!
//! This library provides shared types and modules for the ingest and query binaries.

pub mod builder;
pub mod config;
pub mod coverage;
pub mod geocoding;
pub mod models;
pub mod projection;
pub mod service;

pub use models::{CoveragePayload, CoverageRecord, GenerationSupport, Provider};
