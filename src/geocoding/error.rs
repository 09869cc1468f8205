use reqwest::StatusCode;
use thiserror::Error;

/// Every way a geocoding call can fail to produce a single city
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder rejected the request: {0}")]
    Client(StatusCode),
    #[error("geocoder failed: {0}")]
    Server(String),
    #[error("could not reach the geocoder: {0}")]
    Connection(String),
    #[error("no address matched the query")]
    NoAddressFound,
    #[error("{0} addresses matched the query")]
    AmbiguousAddress(usize),
    #[error("the matched address has no city")]
    CityMissing,
}

impl GeocodeError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        if status.is_client_error() {
            GeocodeError::Client(status)
        } else if status.is_server_error() {
            GeocodeError::Server(format!("status {}", status))
        } else {
            GeocodeError::Connection(format!("unexpected status {}", status))
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            GeocodeError::from_status(status)
        } else if err.is_decode() {
            GeocodeError::Server(format!("undecodable response: {}", err))
        } else {
            GeocodeError::Connection(err.to_string())
        }
    }
}
