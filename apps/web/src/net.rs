//! `fetch` and geolocation transports for the provider traits.

use js_sys::{Function, Promise, Reflect};
use parkmap_core::error::{ParkError, ServiceError};
use parkmap_core::providers::{
    decode_geocode, decode_listing, decode_route, geocode_request, listing_request, route_request,
    HttpRequest,
};
use parkmap_core::services::{Directions, Geocoder, Geolocator, LotSource};
use parkmap_core::{Coord, ParkingLot, RouteResult, Settings};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn js_error(value: JsValue) -> ServiceError {
    ServiceError::Http(describe(&value))
}

/// Best-effort text for a thrown JS value.
fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Sends a GET and hands back status and body for the core decoders.
async fn send(request: &HttpRequest) -> Result<(u16, String), ServiceError> {
    let url = request.to_url_with(|part| String::from(js_sys::encode_uri_component(part)));
    log::debug!("GET {url}");

    let window = web_sys::window().ok_or_else(|| ServiceError::Http("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into::<Response>()
        .map_err(js_error)?;

    let status = response.status();
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    let body = text
        .as_string()
        .ok_or_else(|| ServiceError::Decode("response body is not text".to_string()))?;
    Ok((status, body))
}

/// Resolves after `delay`, using the window timer.
async fn sleep(delay: Duration) {
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let scheduled = web_sys::window().is_some_and(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                .is_ok()
        });
        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[derive(Debug, Clone)]
pub struct WebLotSource {
    lots_url: String,
}

impl LotSource for WebLotSource {
    async fn fetch_listing(&self, per_page: Option<u32>) -> Result<Vec<ParkingLot>, ServiceError> {
        let (status, body) = send(&listing_request(&self.lots_url, per_page)).await?;
        decode_listing(status, &body)
    }

    async fn pause(&self, delay: Duration) {
        sleep(delay).await;
    }
}

#[derive(Debug, Clone)]
pub struct WebGeocoder {
    base_url: String,
}

impl Geocoder for WebGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coord>, ServiceError> {
        let (status, body) = send(&geocode_request(&self.base_url, query)).await?;
        decode_geocode(status, &body)
    }
}

#[derive(Debug, Clone)]
pub struct WebDirections {
    base_url: String,
}

impl Directions for WebDirections {
    async fn driving_route(
        &self,
        origin: Coord,
        destination: Coord,
    ) -> Result<RouteResult, ServiceError> {
        let (status, body) = send(&route_request(&self.base_url, origin, destination)).await?;
        decode_route(status, &body, destination)
    }
}

/// `navigator.geolocation`, asked once per page load.
#[derive(Debug, Clone, Copy)]
pub struct BrowserLocation;

fn read_number(object: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
}

impl Geolocator for BrowserLocation {
    async fn current_position(&self) -> Result<Coord, ParkError> {
        let unavailable = |reason: String| ParkError::GeolocationUnavailable(reason);

        let geolocation = web_sys::window()
            .ok_or_else(|| unavailable("no window".to_string()))?
            .navigator()
            .geolocation()
            .map_err(|_| unavailable("geolocation is not supported".to_string()))?;

        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            if let Err(error) =
                geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
            {
                let _ = reject.call1(&JsValue::NULL, &error);
            }
        });

        let position = JsFuture::from(promise)
            .await
            .map_err(|error| unavailable(describe(&error)))?;
        let coords = Reflect::get(&position, &JsValue::from_str("coords"))
            .map_err(|error| unavailable(describe(&error)))?;

        match (read_number(&coords, "latitude"), read_number(&coords, "longitude")) {
            (Some(lat), Some(lng)) => Ok(Coord::new(lat, lng)),
            _ => Err(unavailable("position has no coordinates".to_string())),
        }
    }
}

/// The provider set used by the effect runner.
#[derive(Debug, Clone)]
pub struct WebServices {
    pub lots: WebLotSource,
    pub geocoder: WebGeocoder,
    pub directions: WebDirections,
    pub location: BrowserLocation,
    pub settings: Settings,
}

impl WebServices {
    pub fn new(settings: Settings) -> Self {
        Self {
            lots: WebLotSource {
                lots_url: settings.lots_url.clone(),
            },
            geocoder: WebGeocoder {
                base_url: settings.geocoder_url.clone(),
            },
            directions: WebDirections {
                base_url: settings.router_url.clone(),
            },
            location: BrowserLocation,
            settings,
        }
    }
}
