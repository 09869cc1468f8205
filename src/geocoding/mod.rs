//! Client for the api-adresse.data.gouv.fr geocoding service.
//!
//! Forward search resolves a free-text address to exactly one city.
//! Reverse batch geocoding resolves a CSV of lon/lat rows to cities.

mod client;
mod error;
mod reverse;
mod search;

pub use client::GeocodingClient;
pub use error::GeocodeError;
pub use reverse::CITY_COLUMN;
pub use search::GeocodeResult;
