use crate::error::ParkError;
use crate::geo::Coord;
use crate::services::Geocoder;

/// Resolves a free-text destination. Blank input, an empty answer and a
/// provider error all come back as `GeocodeNotFound`.
pub async fn resolve<G: Geocoder>(geocoder: &G, text: &str) -> Result<Coord, ParkError> {
    let query = text.trim();
    if query.is_empty() {
        return Err(ParkError::GeocodeNotFound(String::new()));
    }

    match geocoder.geocode(query).await {
        Ok(Some(coord)) => {
            log::info!("resolved \"{query}\" to {coord}");
            Ok(coord)
        }
        Ok(None) => {
            log::info!("no geocoding match for \"{query}\"");
            Err(ParkError::GeocodeNotFound(query.to_string()))
        }
        Err(error) => {
            log::warn!("geocoding \"{query}\" failed: {error}");
            Err(ParkError::GeocodeNotFound(query.to_string()))
        }
    }
}
