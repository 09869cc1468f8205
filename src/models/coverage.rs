//! Coverage Table rows and the per-city payload served to clients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Provider;

/// One row of the Coverage Table (`provider,lon,lat,2G,3G,4G,city`).
///
/// Field order matters: the table is read positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub provider: Provider,
    pub lon: f64,
    pub lat: f64,
    #[serde(rename = "2G", with = "crate::models::flag")]
    pub two_g: bool,
    #[serde(rename = "3G", with = "crate::models::flag")]
    pub three_g: bool,
    #[serde(rename = "4G", with = "crate::models::flag")]
    pub four_g: bool,
    /// Empty when the reverse geocoder could not resolve the site
    pub city: String,
}

impl CoverageRecord {
    pub fn support(&self) -> GenerationSupport {
        GenerationSupport {
            two_g: self.two_g,
            three_g: self.three_g,
            four_g: self.four_g,
        }
    }
}

/// 2G/3G/4G availability for one provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSupport {
    #[serde(rename = "2G")]
    pub two_g: bool,
    #[serde(rename = "3G")]
    pub three_g: bool,
    #[serde(rename = "4G")]
    pub four_g: bool,
}

impl GenerationSupport {
    pub fn new(two_g: bool, three_g: bool, four_g: bool) -> Self {
        Self {
            two_g,
            three_g,
            four_g,
        }
    }
}

/// Provider → generation support for a single city.
///
/// Only providers present in the table for that city appear as keys.
pub type CoveragePayload = BTreeMap<Provider, GenerationSupport>;
