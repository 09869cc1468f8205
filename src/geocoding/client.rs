use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

use super::GeocodeError;
use crate::config::{ConfigError, GeocoderConfig};

/// HTTP client bound to one geocoder deployment
#[derive(Clone)]
pub struct GeocodingClient {
    pub(super) http: Client,
    pub(super) search_url: Url,
    pub(super) reverse_url: Url,
    pub(super) timeout: Duration,
    pub(super) batch_timeout: Duration,
}

impl GeocodingClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self, ConfigError> {
        let base = parse_base_url(&config.base_url)?;

        let http = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            http,
            search_url: join(&base, "search/")?,
            reverse_url: join(&base, "reverse/csv/")?,
            timeout: config.timeout(),
            batch_timeout: config.batch_timeout(),
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    pub fn reverse_url(&self) -> &Url {
        &self.reverse_url
    }
}

/// Turn non-2xx responses into the matching error
pub(super) fn check_status(response: Response) -> Result<Response, GeocodeError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GeocodeError::from_status(status))
    }
}

/// Parse the base URL, making sure relative joins keep its path
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn join(base: &Url, path: &str) -> Result<Url, ConfigError> {
    base.join(path).map_err(|source| ConfigError::InvalidUrl {
        url: format!("{}{}", base, path),
        source,
    })
}
