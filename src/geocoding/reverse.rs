//! Reverse batch geocoding through the CSV upload endpoint.
//!
//! The service echoes every uploaded column and appends its own
//! `result_*` columns. With our six-column upload the city lands at
//! [`CITY_COLUMN`].

use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

use super::client::check_status;
use super::{GeocodeError, GeocodingClient};

/// Position of `result_city` in the response for a six-column upload
pub const CITY_COLUMN: usize = 16;

impl GeocodingClient {
    /// Upload a CSV with `lon`/`lat` columns and return the augmented CSV.
    #[instrument(skip(self, csv), fields(bytes = csv.len()))]
    pub async fn reverse_csv(&self, csv: Vec<u8>) -> Result<String, GeocodeError> {
        let size = csv.len();
        let part = Part::bytes(csv)
            .file_name("sites.csv")
            .mime_str("text/csv")?;
        let form = Form::new().part("data", part);

        info!("Uploading {} bytes to {}", size, self.reverse_url);

        let response = self
            .http
            .post(self.reverse_url.clone())
            .multipart(form)
            .timeout(self.batch_timeout)
            .send()
            .await?;

        let body = check_status(response)?.text().await?;
        info!("Reverse geocoder answered with {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeocoderConfig;
    use mockito::{Matcher, Server};

    fn client_for(url: String) -> GeocodingClient {
        GeocodingClient::new(&GeocoderConfig {
            base_url: url,
            ..GeocoderConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn reverse_csv_uploads_the_data_field() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/reverse/csv/")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="data""#.to_string()),
                Matcher::Regex("provider,lon,lat,2G,3G,4G".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("provider,lon,lat,2G,3G,4G,result_city\n")
            .create_async()
            .await;

        let body = client_for(server.url())
            .reverse_csv(b"provider,lon,lat,2G,3G,4G\nOrange,2.35,48.85,1,1,1\n".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, "provider,lon,lat,2G,3G,4G,result_city\n");
    }

    #[tokio::test]
    async fn reverse_csv_rejects_oversized_upload_as_client_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/reverse/csv/")
            .with_status(413)
            .create_async()
            .await;

        let result = client_for(server.url()).reverse_csv(vec![b'x'; 16]).await;
        assert!(matches!(result, Err(GeocodeError::Client(_))));
    }
}
