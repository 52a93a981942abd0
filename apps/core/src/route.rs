use crate::error::ParkError;
use crate::geo::Coord;
use crate::services::Directions;
use serde::Serialize;

/// A driving route as drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub path: Vec<Coord>,
    pub destination: Coord,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl RouteResult {
    /// `"3.4 km · 9 min"`.
    pub fn summary(&self) -> String {
        let minutes = (self.duration_s / 60.0).round().max(1.0);
        format!("{:.1} km · {minutes:.0} min", self.distance_m / 1000.0)
    }
}

/// Requests a driving route. Without an origin (location not known yet)
/// nothing is requested and `Ok(None)` comes back.
pub async fn route<D: Directions>(
    directions: &D,
    origin: Option<Coord>,
    destination: Coord,
) -> Result<Option<RouteResult>, ParkError> {
    let Some(origin) = origin else {
        log::debug!("route to {destination} skipped: origin unknown");
        return Ok(None);
    };

    match directions.driving_route(origin, destination).await {
        Ok(result) => {
            log::info!("route {origin} -> {destination}: {}", result.summary());
            Ok(Some(result))
        }
        Err(error) => {
            log::error!("directions request failed: {error}");
            Err(ParkError::RouteUnavailable(error.to_string()))
        }
    }
}
