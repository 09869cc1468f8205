//! Raw antenna sites and their reprojected form.

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use super::Provider;

/// One row of the ARCEP antenna dataset (`Operateur;x;y;2G;3G;4G`).
///
/// Coordinates are Lambert-93 metres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AntennaRecord {
    pub operator_code: String,
    pub x: f64,
    pub y: f64,
    #[serde(with = "crate::models::flag")]
    pub two_g: bool,
    #[serde(with = "crate::models::flag")]
    pub three_g: bool,
    #[serde(with = "crate::models::flag")]
    pub four_g: bool,
}

impl AntennaRecord {
    pub fn projected(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// Antenna site with a resolved provider and WGS84 position.
///
/// This is the row format uploaded to the reverse geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSite {
    pub provider: Provider,
    pub lon: f64,
    pub lat: f64,
    #[serde(rename = "2G", with = "crate::models::flag")]
    pub two_g: bool,
    #[serde(rename = "3G", with = "crate::models::flag")]
    pub three_g: bool,
    #[serde(rename = "4G", with = "crate::models::flag")]
    pub four_g: bool,
}

impl ProjectedSite {
    pub fn new(provider: Provider, position: Point<f64>, antenna: &AntennaRecord) -> Self {
        Self {
            provider,
            lon: position.x(),
            lat: position.y(),
            two_g: antenna.two_g,
            three_g: antenna.three_g,
            four_g: antenna.four_g,
        }
    }
}
