//! Wire formats of the HTTP providers: the lot listing and history
//! endpoints, Nominatim search, and the OSRM route service. Transports only
//! send the [`HttpRequest`] and hand the body back to a parser here.

use crate::error::ServiceError;
use crate::geo::Coord;
use crate::lot::{parse_history_page, parse_listing, HistoryPage, ParkingLot};
use crate::route::RouteResult;
use serde::Deserialize;

/// A GET request: base URL plus unencoded query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Full URL with the query encoded by `encode`, for transports that
    /// take a single string.
    pub fn to_url_with<F>(&self, encode: F) -> String
    where
        F: Fn(&str) -> String,
    {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.url)
    }
}

pub fn listing_request(lots_url: &str, per_page: Option<u32>) -> HttpRequest {
    let request = HttpRequest::get(lots_url);
    match per_page {
        Some(size) => request.param("per_page", size),
        None => request,
    }
}

pub fn decode_listing(status: u16, body: &str) -> Result<Vec<ParkingLot>, ServiceError> {
    check_status(status)?;
    parse_listing(body)
}

pub fn history_request(history_url: &str, park_no: &str, page: u32, per_page: u32) -> HttpRequest {
    HttpRequest::get(history_url)
        .param("page", page)
        .param("park_no", park_no)
        .param("per_page", per_page)
}

pub fn decode_history(status: u16, body: &str) -> Result<HistoryPage, ServiceError> {
    check_status(status)?;
    parse_history_page(body)
}

pub fn geocode_request(geocoder_url: &str, query: &str) -> HttpRequest {
    HttpRequest::get(format!("{}/search", geocoder_url.trim_end_matches('/')))
        .param("q", query)
        .param("format", "json")
        .param("limit", 1)
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// First Nominatim match, `None` for an empty result list.
pub fn decode_geocode(status: u16, body: &str) -> Result<Option<Coord>, ServiceError> {
    check_status(status)?;
    let places: Vec<NominatimPlace> = serde_json::from_str(body)?;
    let Some(place) = places.first() else {
        return Ok(None);
    };

    let lat = place
        .lat
        .parse()
        .map_err(|_| ServiceError::Decode(format!("invalid latitude \"{}\"", place.lat)))?;
    let lng = place
        .lon
        .parse()
        .map_err(|_| ServiceError::Decode(format!("invalid longitude \"{}\"", place.lon)))?;

    Ok(Some(Coord { lat, lng }))
}

pub fn route_request(router_url: &str, origin: Coord, destination: Coord) -> HttpRequest {
    HttpRequest::get(format!(
        "{}/route/v1/driving/{:.6},{:.6};{:.6},{:.6}",
        router_url.trim_end_matches('/'),
        origin.lng,
        origin.lat,
        destination.lng,
        destination.lat
    ))
    .param("overview", "full")
    .param("geometries", "geojson")
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Decodes an OSRM route response. Anything but `"Ok"` with at least one
/// route is a failure; OSRM reports `NoRoute` and friends with a 400.
pub fn decode_route(status: u16, body: &str, destination: Coord) -> Result<RouteResult, ServiceError> {
    let response: OsrmResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(error) => {
            check_status(status)?;
            return Err(error.into());
        }
    };

    if response.code != "Ok" {
        return Err(ServiceError::Decode(format!("route status {}", response.code)));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Decode("route list is empty".to_string()))?;

    Ok(RouteResult {
        path: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coord { lat, lng })
            .collect(),
        destination,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

fn check_status(status: u16) -> Result<(), ServiceError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ServiceError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(value: &str) -> String {
        value.replace(' ', "+")
    }

    #[test]
    fn listing_request_adds_page_size_only_when_set() {
        let url = "https://wellpark.dd-long.fun/api/latest-parks";
        assert_eq!(listing_request(url, None).to_url_with(plain), url);
        assert_eq!(
            listing_request(url, Some(200)).to_url_with(plain),
            format!("{url}?per_page=200")
        );
    }

    #[test]
    fn non_success_listing_is_a_status_error() {
        let result = decode_listing(503, r#"{"data": []}"#);
        assert_eq!(result, Err(ServiceError::Status(503)));
    }

    #[test]
    fn history_request_carries_page_parameters() {
        let request = history_request("https://example.test/api/parks", "004", 3, 1440);
        assert_eq!(
            request.to_url_with(plain),
            "https://example.test/api/parks?page=3&park_no=004&per_page=1440"
        );
    }

    #[test]
    fn geocode_takes_first_match() {
        let request = geocode_request("https://nominatim.example/", "Hsinchu Station");
        assert_eq!(
            request.to_url_with(plain),
            "https://nominatim.example/search?q=Hsinchu+Station&format=json&limit=1"
        );

        let body = r#"[{"lat": "24.8016", "lon": "120.9716", "display_name": "Hsinchu"}]"#;
        assert_eq!(
            decode_geocode(200, body),
            Ok(Some(Coord::new(24.8016, 120.9716)))
        );
        assert_eq!(decode_geocode(200, "[]"), Ok(None));
        assert_eq!(decode_geocode(429, "[]"), Err(ServiceError::Status(429)));
    }

    #[test]
    fn route_request_orders_lng_lat() {
        let request = route_request(
            "https://router.example",
            Coord::new(24.8, 120.96),
            Coord::new(24.81, 120.97),
        );
        assert_eq!(
            request.url,
            "https://router.example/route/v1/driving/120.960000,24.800000;120.970000,24.810000"
        );
    }

    #[test]
    fn decodes_osrm_route() {
        let destination = Coord::new(24.81, 120.97);
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 1523.4,
                "duration": 301.2,
                "geometry": {"type": "LineString", "coordinates": [[120.96, 24.80], [120.965, 24.805], [120.97, 24.81]]}
            }]
        }"#;

        let route = decode_route(200, body, destination).unwrap();

        assert_eq!(route.path.len(), 3);
        assert_eq!(route.path[0], Coord::new(24.80, 120.96));
        assert_eq!(route.destination, destination);
        assert!((route.distance_m - 1523.4).abs() < 1e-9);
    }

    #[test]
    fn osrm_error_codes_fail() {
        let destination = Coord::new(24.81, 120.97);
        let result = decode_route(400, r#"{"code": "NoRoute", "message": "Impossible route"}"#, destination);
        assert_eq!(
            result,
            Err(ServiceError::Decode("route status NoRoute".to_string()))
        );

        let result = decode_route(502, "Bad Gateway", destination);
        assert_eq!(result, Err(ServiceError::Status(502)));
    }
}
