//! Address to coverage resolution, shared by the query server.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::coverage::{lookup_file, CoverageError};
use crate::geocoding::{GeocodeError, GeocodingClient};
use crate::models::CoveragePayload;

/// Everything that can stop a query from producing a payload
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no address provided")]
    MissingAddress,
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Coverage(#[from] CoverageError),
}

impl QueryError {
    /// Static message returned to the caller. Never includes error details.
    pub fn message(&self) -> &'static str {
        match self {
            QueryError::MissingAddress => {
                "No address provided. Please include 'q' parameter in the query."
            }
            QueryError::Geocode(err) => match err {
                GeocodeError::Client(_) => "Client Error.",
                GeocodeError::Server(_) => "Server Error.",
                GeocodeError::Connection(_) => "Unable to connect to data.gouv.fr API.",
                GeocodeError::NoAddressFound => {
                    "data.gouv.fr API can't find any address. Refine your query."
                }
                GeocodeError::AmbiguousAddress(_) => {
                    "data.gouv.fr API found more than one address. Refine your query."
                }
                GeocodeError::CityMissing => {
                    "data.gouv.fr API can't find the city name. Refine your query."
                }
            },
            QueryError::Coverage(err) => match err {
                CoverageError::CityNotFound(_) => {
                    "The city can't be found in the network coverage database."
                }
                CoverageError::Table(_) | CoverageError::Worker(_) => {
                    "The network coverage database is unavailable."
                }
            },
        }
    }
}

/// Geocoder plus Coverage Table location
#[derive(Clone)]
pub struct CoverageService {
    geocoder: GeocodingClient,
    table_path: PathBuf,
}

impl CoverageService {
    pub fn new(geocoder: GeocodingClient, table_path: PathBuf) -> Self {
        Self {
            geocoder,
            table_path,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let geocoder = GeocodingClient::new(&config.geocoder)?;
        Ok(Self::new(geocoder, config.coverage.table_path.clone()))
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Resolve `address` to a city and return that city's coverage.
    ///
    /// The table file is scanned on every call.
    pub async fn network_coverage(&self, address: &str) -> Result<CoveragePayload, QueryError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(QueryError::MissingAddress);
        }

        let location = self.geocoder.search(address).await?;
        info!(
            "Resolved '{}' to {} ({:.5}, {:.5})",
            address,
            location.city,
            location.longitude(),
            location.latitude()
        );

        let path = self.table_path.clone();
        let city = location.city;
        let payload = tokio::task::spawn_blocking(move || lookup_file(&path, &city))
            .await
            .map_err(CoverageError::from)??;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeocoderConfig;
    use crate::models::{GenerationSupport, Provider};
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "provider,lon,lat,2G,3G,4G,city\n\
        Orange,2.3431,48.8512,0,0,0,Paris\n\
        SFR,2.3522,48.8566,1,1,0,Paris\n\
        Free,2.3300,48.8400,0,1,0,Paris\n\
        Bouygue,2.3400,48.8700,1,1,1,Paris\n\
        Orange,2.2379,48.8888,1,1,1,Puteaux\n";

    fn table_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        file
    }

    fn service(url: String, table_path: PathBuf) -> CoverageService {
        let geocoder = GeocodingClient::new(&GeocoderConfig {
            base_url: url,
            timeout_secs: 2,
            ..GeocoderConfig::default()
        })
        .unwrap();
        CoverageService::new(geocoder, table_path)
    }

    fn feature(label: &str, city: &str) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": {"label": label, "x": 648952.58, "y": 6860956.35, "city": city}
        })
    }

    #[tokio::test]
    async fn resolves_paris_address_to_coverage() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "20 avenue de Segur Paris".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"features": [feature("20 Avenue de Ségur 75007 Paris", "Paris")]})
                    .to_string(),
            )
            .create_async()
            .await;

        let table = table_file();
        let payload = service(server.url(), table.path().to_path_buf())
            .network_coverage("20 avenue de Segur Paris")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            payload,
            CoveragePayload::from([
                (Provider::Orange, GenerationSupport::new(false, false, false)),
                (Provider::Sfr, GenerationSupport::new(true, true, false)),
                (Provider::Free, GenerationSupport::new(false, true, false)),
                (Provider::Bouygue, GenerationSupport::new(true, true, true)),
            ])
        );
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "Orange": {"2G": false, "3G": false, "4G": false},
                "SFR": {"2G": true, "3G": true, "4G": false},
                "Free": {"2G": false, "3G": true, "4G": false},
                "Bouygue": {"2G": true, "3G": true, "4G": true}
            })
        );
    }

    #[tokio::test]
    async fn ambiguous_address_yields_ambiguous_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"features": [
                    feature("29 Jardins Boieldieu 92800 Puteaux", "Puteaux"),
                    feature("29 Rue des Jardins 59000 Lille", "Lille"),
                    feature("29 Les Jardins 01000 Bourg-en-Bresse", "Bourg-en-Bresse")
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let table = table_file();
        let err = service(server.url(), table.path().to_path_buf())
            .network_coverage("29 Jardins")
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Geocode(GeocodeError::AmbiguousAddress(3))));
        assert_eq!(
            err.message(),
            "data.gouv.fr API found more than one address. Refine your query."
        );
    }

    #[tokio::test]
    async fn empty_address_skips_the_geocoder() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let table = table_file();
        let service = service(server.url(), table.path().to_path_buf());

        for address in ["", "   "] {
            let err = service.network_coverage(address).await.unwrap_err();
            assert!(matches!(err, QueryError::MissingAddress));
            assert_eq!(
                err.message(),
                "No address provided. Please include 'q' parameter in the query."
            );
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn city_absent_from_table() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"features": [feature("1 Place Bellecour 69002 Lyon", "Lyon")]}).to_string())
            .create_async()
            .await;

        let table = table_file();
        let err = service(server.url(), table.path().to_path_buf())
            .network_coverage("1 place Bellecour Lyon")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QueryError::Coverage(CoverageError::CityNotFound(_))
        ));
        assert_eq!(
            err.message(),
            "The city can't be found in the network coverage database."
        );
    }

    #[tokio::test]
    async fn unreadable_table_is_reported_without_details() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"features": [feature("20 Avenue de Ségur 75007 Paris", "Paris")]}).to_string())
            .create_async()
            .await;

        let err = service(server.url(), PathBuf::from("/nonexistent/coverage.csv"))
            .network_coverage("20 avenue de Segur Paris")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "The network coverage database is unavailable.");
    }

    #[test]
    fn every_geocode_outcome_has_its_own_message() {
        let errors = vec![
            QueryError::MissingAddress,
            QueryError::Geocode(GeocodeError::Client(reqwest::StatusCode::NOT_FOUND)),
            QueryError::Geocode(GeocodeError::Server("status 500".into())),
            QueryError::Geocode(GeocodeError::Connection("refused".into())),
            QueryError::Geocode(GeocodeError::NoAddressFound),
            QueryError::Geocode(GeocodeError::AmbiguousAddress(2)),
            QueryError::Geocode(GeocodeError::CityMissing),
            QueryError::Coverage(CoverageError::CityNotFound("Paris".into())),
        ];

        let mut messages: Vec<&str> = errors.iter().map(QueryError::message).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }
}
