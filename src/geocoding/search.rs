//! Forward geocoding: free-text address to a single city.

use geo::{Coord, Point};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::client::check_status;
use super::{GeocodeError, GeocodingClient};
use crate::projection::{LambertConformalConic, Reprojector};

/// The single address matched by a search
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Lambert-93 position as reported by the geocoder
    pub projected: Coord<f64>,
    /// WGS84 lon/lat
    pub position: Point<f64>,
    pub city: String,
}

impl GeocodeResult {
    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    x: Option<f64>,
    y: Option<f64>,
    city: Option<String>,
    label: Option<String>,
}

impl GeocodingClient {
    /// Resolve an address, insisting on exactly one match with a city.
    #[instrument(skip(self))]
    pub async fn search(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("type", "housenumber")
            .append_pair("autocomplete", "1");

        let response = self.http.get(url).timeout(self.timeout).send().await?;
        let body: SearchResponse = check_status(response)?.json().await?;

        debug!("Geocoder returned {} features", body.features.len());

        single_match(body)
    }
}

fn single_match(body: SearchResponse) -> Result<GeocodeResult, GeocodeError> {
    let mut features = body.features;
    let feature = match features.len() {
        0 => return Err(GeocodeError::NoAddressFound),
        1 => features.remove(0),
        n => return Err(GeocodeError::AmbiguousAddress(n)),
    };
    let properties = feature.properties;

    let city = properties
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or(GeocodeError::CityMissing)?;

    let projected = match (properties.x, properties.y) {
        (Some(x), Some(y)) => Coord { x, y },
        _ => {
            return Err(GeocodeError::Server(
                "matched address has no coordinates".to_string(),
            ))
        }
    };

    debug!(
        "Matched '{}' in {}",
        properties.label.as_deref().unwrap_or_default(),
        city
    );

    Ok(GeocodeResult {
        projected,
        position: LambertConformalConic::lambert93().to_geographic(projected),
        city,
    })
}
