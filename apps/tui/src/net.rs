//! reqwest transports for the provider traits.

use parkmap_core::error::{ParkError, ServiceError};
use parkmap_core::lot::OccupancySample;
use parkmap_core::providers::{
    decode_geocode, decode_history, decode_listing, decode_route, geocode_request,
    history_request, listing_request, route_request, HttpRequest,
};
use parkmap_core::services::{Directions, Geocoder, Geolocator, LotSource};
use parkmap_core::{Coord, ParkingLot, RouteResult, Settings};
use std::time::Duration;

const USER_AGENT: &str = concat!("parkmap/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const HISTORY_PAGE_SIZE: u32 = 1440;
const MAX_HISTORY_PAGES: u32 = 50;

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, ServiceError> {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Sends a GET and hands back status and body for the core decoders.
    async fn send(&self, request: &HttpRequest) -> Result<(u16, String), ServiceError> {
        log::debug!("GET {} {:?}", request.url, request.query);
        let response = self
            .inner
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Ok((status, body))
    }
}

#[derive(Debug, Clone)]
pub struct HttpLotSource {
    client: HttpClient,
    lots_url: String,
    history_url: String,
}

impl HttpLotSource {
    pub fn new(client: HttpClient, settings: &Settings) -> Self {
        Self {
            client,
            lots_url: settings.lots_url.clone(),
            history_url: settings.history_url.clone(),
        }
    }

    /// Every recorded sample of one lot, following the endpoint's pages.
    pub async fn fetch_history(&self, park_no: &str) -> Result<Vec<OccupancySample>, ServiceError> {
        let mut samples = Vec::new();
        for page in 1..=MAX_HISTORY_PAGES {
            let request = history_request(&self.history_url, park_no, page, HISTORY_PAGE_SIZE);
            let (status, body) = self.client.send(&request).await?;
            let history = decode_history(status, &body)?;
            samples.extend(history.data);
            if history.meta.is_last() {
                return Ok(samples);
            }
        }
        log::warn!("history for {park_no} truncated at {MAX_HISTORY_PAGES} pages");
        Ok(samples)
    }
}

impl LotSource for HttpLotSource {
    async fn fetch_listing(&self, per_page: Option<u32>) -> Result<Vec<ParkingLot>, ServiceError> {
        let (status, body) = self.client.send(&listing_request(&self.lots_url, per_page)).await?;
        decode_listing(status, &body)
    }

    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: HttpClient,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: HttpClient, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.geocoder_url.clone(),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coord>, ServiceError> {
        let (status, body) = self.client.send(&geocode_request(&self.base_url, query)).await?;
        decode_geocode(status, &body)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDirections {
    client: HttpClient,
    base_url: String,
}

impl OsrmDirections {
    pub fn new(client: HttpClient, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.router_url.clone(),
        }
    }
}

impl Directions for OsrmDirections {
    async fn driving_route(
        &self,
        origin: Coord,
        destination: Coord,
    ) -> Result<RouteResult, ServiceError> {
        let request = route_request(&self.base_url, origin, destination);
        let (status, body) = self.client.send(&request).await?;
        decode_route(status, &body, destination)
    }
}

/// A terminal has no positioning hardware to ask; the origin comes from
/// `PARKMAP_ORIGIN` / `--origin`.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredLocation {
    origin: Option<Coord>,
}

impl ConfiguredLocation {
    pub const fn new(origin: Option<Coord>) -> Self {
        Self { origin }
    }
}

impl Geolocator for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coord, ParkError> {
        self.origin.ok_or_else(|| {
            ParkError::GeolocationUnavailable("no origin configured (set PARKMAP_ORIGIN or --origin)".to_string())
        })
    }
}

/// The provider set shared by the event loop and headless mode.
#[derive(Debug, Clone)]
pub struct Services {
    pub lots: HttpLotSource,
    pub geocoder: NominatimGeocoder,
    pub directions: OsrmDirections,
    pub location: ConfiguredLocation,
    pub settings: Settings,
}

impl Services {
    pub fn new(settings: Settings) -> Result<Self, ServiceError> {
        let client = HttpClient::new()?;
        Ok(Self {
            lots: HttpLotSource::new(client.clone(), &settings),
            geocoder: NominatimGeocoder::new(client.clone(), &settings),
            directions: OsrmDirections::new(client, &settings),
            location: ConfiguredLocation::new(settings.origin),
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_origin_is_the_position() {
        let origin = Coord::new(24.8, 120.97);
        let location = ConfiguredLocation::new(Some(origin));
        assert_eq!(location.current_position().await, Ok(origin));
    }

    #[tokio::test]
    async fn missing_origin_is_unavailable() {
        let location = ConfiguredLocation::new(None);
        assert!(matches!(
            location.current_position().await,
            Err(ParkError::GeolocationUnavailable(_))
        ));
    }
}
