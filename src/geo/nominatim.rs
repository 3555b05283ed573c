use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tokio::{sync::Mutex, time::{self, Instant}};
use tracing::{debug, warn};

use crate::config::Config;

use super::{GeoResult, Geocoder};


/// Geocoder backed by a Nominatim (OpenStreetMap) search endpoint.
///
/// Requests go out one at a time, at least `interval` apart.
pub(crate) struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    interval: Duration,
    /// When the previous request finished.
    last_request: Mutex<Option<Instant>>
}


impl NominatimGeocoder {
    pub(crate) fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(&config.geocoder_user_agent)
            .timeout(config.geocoder_timeout())
            .build()
            .context("Failed to create geocoding HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.geocoder_url.clone(),
            interval: config.geocoder_interval(),
            last_request: Mutex::new(None)
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&format=json&addressdetails=1&limit=1",
            self.endpoint,
            urlencoding::encode(query)
        )
    }

    async fn search(&self, query: &str) -> Result<Vec<GeoResult>, reqwest::Error> {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            time::sleep_until(last + self.interval).await;
        }
        let results = self.request(query).await;
        *last_request = Some(Instant::now());
        results
    }

    async fn request(&self, query: &str) -> Result<Vec<GeoResult>, reqwest::Error> {
        self.client
            .get(self.search_url(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}


#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Option<GeoResult> {
        if query.trim().is_empty() {
            return None;
        }
        match self.search(query).await {
            Ok(results) => {
                if results.is_empty() {
                    debug!(query, "No geocoding match");
                }
                results.into_iter().next()
            }
            Err(e) => {
                if e.is_timeout() {
                    warn!(query, error = %e, "Geocoding timed out");
                } else {
                    warn!(query, error = %e, "Geocoding service error");
                }
                None
            }
        }
    }
}
