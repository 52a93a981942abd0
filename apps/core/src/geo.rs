use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude, used for local planar offsets.
const KM_PER_DEGREE: f64 = 111.32;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl FromStr for Coord {
    type Err = String;

    /// Parses `"lat,lng"`, as accepted by `--origin` and `--near`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = value
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got \"{value}\""))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude \"{}\"", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude \"{}\"", lng.trim()))?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinate out of range: {lat},{lng}"));
        }

        Ok(Self { lat, lng })
    }
}

/// Great-circle distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (lat1_rad.cos() * lat2_rad.cos())
        .mul_add(
            (delta_lng / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        )
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn distance_km(a: Coord, b: Coord) -> f64 {
    haversine_km(a.lat, a.lng, b.lat, b.lng)
}

/// Polygon approximating a circle of `radius_km` around `center`, closed
/// (the first point is repeated at the end). Good enough for the few hundred
/// metres the highlight overlay covers.
pub fn circle_outline(center: Coord, radius_km: f64, segments: usize) -> Vec<Coord> {
    let segments = segments.max(3);
    let lat_radius = radius_km / KM_PER_DEGREE;
    let lng_radius = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos().max(1e-6));

    let mut outline: Vec<Coord> = (0..segments)
        .map(|step| {
            let angle = std::f64::consts::TAU * step as f64 / segments as f64;
            Coord {
                lat: angle.sin().mul_add(lat_radius, center.lat),
                lng: angle.cos().mul_add(lng_radius, center.lng),
            }
        })
        .collect();
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < tolerance,
            "expected {expected}, got {actual}, diff {diff}"
        );
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let points = [
            Coord::new(24.807_26, 120.969_783),
            Coord::new(0.0, 0.0),
            Coord::new(-89.999_999, 179.999_999),
            Coord::new(51.5, -0.12),
        ];

        for point in points {
            let distance = distance_km(point, point);
            assert!(!distance.is_nan());
            assert_close(distance, 0.0, 1e-9);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coord::new(24.807_26, 120.969_783);
        let b = Coord::new(24.801_5, 120.971_6);

        assert_close(distance_km(a, b), distance_km(b, a), 1e-12);
    }

    #[test]
    fn known_city_pair() {
        // Taipei Main Station to Hsinchu Station, roughly 65 km apart.
        let taipei = Coord::new(25.0478, 121.5170);
        let hsinchu = Coord::new(24.8016, 120.9716);

        let distance = distance_km(taipei, hsinchu);
        assert!(distance > 55.0 && distance < 70.0, "got {distance}");
    }

    #[test]
    fn antipodal_points_do_not_overflow() {
        let distance = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert_close(distance, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6);
    }

    #[test]
    fn parses_lat_lng_pairs() {
        let coord: Coord = " 24.8, 120.97 ".parse().unwrap();
        assert_close(coord.lat, 24.8, 1e-12);
        assert_close(coord.lng, 120.97, 1e-12);

        assert!("24.8".parse::<Coord>().is_err());
        assert!("north,120".parse::<Coord>().is_err());
        assert!("95.0,120.0".parse::<Coord>().is_err());
    }

    #[test]
    fn circle_outline_stays_on_radius() {
        let center = Coord::new(24.807_26, 120.969_783);
        let outline = circle_outline(center, 0.6, 36);

        assert_eq!(outline.len(), 37);
        assert_eq!(outline.first(), outline.last());
        for point in outline {
            assert_close(distance_km(center, point), 0.6, 0.01);
        }
    }
}
