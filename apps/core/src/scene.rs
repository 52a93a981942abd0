//! Render projection of [`MapState`]. Front ends draw a [`Scene`] and never
//! read the registry or selection directly.

use crate::geo::{distance_km, Coord};
use crate::lot::LotId;
use crate::occupancy::OccupancyStatus;
use crate::state::{MapState, Phase};
use serde::Serialize;

const MIN_ZOOM: u8 = 3;
const MAX_ZOOM: u8 = 19;
const HIGHLIGHT_SEGMENTS: usize = 48;

/// Map center and zoom level. One zoom step halves the visible span; at
/// zoom 15 the view is about 4.9 km across at the equator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coord,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: Coord, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Longitude span in degrees.
    pub fn lng_span(&self) -> f64 {
        1440.0 / f64::from(1_u32 << self.zoom)
    }

    /// Geographic bounds for a surface of `width` x `height` in square
    /// units (terminal front ends count a cell as 1 wide, 2 tall).
    pub fn bounds(&self, width: f64, height: f64) -> Bounds {
        let lng_span = self.lng_span();
        let aspect = if width > 0.0 { height / width } else { 1.0 };
        let lat_span = lng_span * self.center.lat.to_radians().cos() * aspect;

        Bounds {
            west: self.center.lng - lng_span / 2.0,
            east: self.center.lng + lng_span / 2.0,
            south: self.center.lat - lat_span / 2.0,
            north: self.center.lat + lat_span / 2.0,
        }
    }

    pub fn zoom_by(&mut self, steps: i8) {
        let zoom = i16::from(self.zoom) + i16::from(steps);
        self.zoom = u8::try_from(zoom.clamp(i16::from(MIN_ZOOM), i16::from(MAX_ZOOM)))
            .unwrap_or(self.zoom);
    }

    /// Moves the center by a fraction of the visible span (positive east /
    /// north).
    pub fn pan(&mut self, east_fraction: f64, north_fraction: f64) {
        let lng_span = self.lng_span();
        let lat_span = lng_span * self.center.lat.to_radians().cos();
        self.center.lng = (self.center.lng + east_fraction * lng_span).clamp(-180.0, 180.0);
        self.center.lat = (self.center.lat + north_fraction * lat_span).clamp(-85.0, 85.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Bounds {
    pub fn contains(&self, point: Coord) -> bool {
        (self.west..=self.east).contains(&point.lng) && (self.south..=self.north).contains(&point.lat)
    }

    /// Coordinate at fractional position (`0,0` = north-west corner,
    /// `1,1` = south-east), as produced by a click on the surface.
    pub fn unproject(&self, x_fraction: f64, y_fraction: f64) -> Coord {
        Coord {
            lat: (self.north - self.south).mul_add(-y_fraction, self.north),
            lng: (self.east - self.west).mul_add(x_fraction, self.west),
        }
    }

    /// Kilometres covered by one unit of a surface `width` units wide.
    pub fn km_per_unit(&self, width: f64) -> f64 {
        if width <= 0.0 {
            return 0.0;
        }
        let mid_lat = (self.north + self.south) / 2.0;
        distance_km(
            Coord::new(mid_lat, self.west),
            Coord::new(mid_lat, self.east),
        ) / width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneMarker {
    pub id: LotId,
    pub position: Coord,
    pub status: OccupancyStatus,
    pub selected: bool,
    pub label: String,
}

/// What the bottom-sheet panel shows for the selected lot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotDetail {
    pub id: LotId,
    pub name: String,
    pub address: String,
    pub business_hours: String,
    pub weekdays: String,
    pub holiday: String,
    pub occupancy: String,
    pub percentage: Option<f64>,
    pub status: OccupancyStatus,
    pub distance_km: Option<f64>,
    pub update_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub markers: Vec<SceneMarker>,
    pub highlight: Option<Vec<Coord>>,
    pub route: Option<Vec<Coord>>,
    pub destination: Option<Coord>,
    pub search_pin: Option<Coord>,
    pub user: Option<Coord>,
    pub detail: Option<LotDetail>,
    pub confirm_open: bool,
}

impl Scene {
    pub fn project(state: &MapState) -> Self {
        let selection = &state.selection;
        let selected = selection.selected.as_ref();

        let markers = state
            .registry
            .visible()
            .map(|marker| SceneMarker {
                id: marker.id.clone(),
                position: marker.position,
                status: marker.status,
                selected: Some(&marker.id) == selected,
                label: marker.lot.parking_name.clone(),
            })
            .collect();

        let detail = selected
            .and_then(|id| state.registry.get(id))
            .map(|marker| LotDetail {
                id: marker.id.clone(),
                name: marker.lot.parking_name.clone(),
                address: marker.lot.address.clone(),
                business_hours: marker.lot.business_hours.clone(),
                weekdays: marker.lot.weekdays.clone(),
                holiday: marker.lot.holiday.clone(),
                occupancy: marker.lot.occupancy_text(),
                percentage: marker.lot.percentage_free(),
                status: marker.status,
                distance_km: selection
                    .user_location
                    .map(|user| distance_km(user, marker.position)),
                update_time: marker.lot.update_time.clone(),
            });

        Self {
            viewport: state.viewport,
            markers,
            highlight: selection
                .highlight
                .map(|highlight| highlight.outline(HIGHLIGHT_SEGMENTS)),
            route: state.route.as_ref().map(|route| route.path.clone()),
            destination: state.route.as_ref().map(|route| route.destination),
            search_pin: selection.destination,
            user: selection.user_location,
            detail,
            confirm_open: selection.phase == Phase::LotSelected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_centered_and_scale_with_zoom() {
        let center = Coord::new(24.8, 120.97);
        let near = Viewport::new(center, 15).bounds(100.0, 100.0);
        let far = Viewport::new(center, 14).bounds(100.0, 100.0);

        assert!(((near.west + near.east) / 2.0 - center.lng).abs() < 1e-12);
        assert!(((near.south + near.north) / 2.0 - center.lat).abs() < 1e-12);
        let near_span = near.east - near.west;
        let far_span = far.east - far.west;
        assert!((far_span / near_span - 2.0).abs() < 1e-12);
        assert!(near.contains(center));
    }

    #[test]
    fn unproject_corners_and_center() {
        let bounds = Viewport::new(Coord::new(24.8, 120.97), 15).bounds(80.0, 40.0);

        let north_west = bounds.unproject(0.0, 0.0);
        assert!((north_west.lat - bounds.north).abs() < 1e-12);
        assert!((north_west.lng - bounds.west).abs() < 1e-12);

        let middle = bounds.unproject(0.5, 0.5);
        assert!((middle.lat - 24.8).abs() < 1e-9);
        assert!((middle.lng - 120.97).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = Viewport::new(Coord::new(24.8, 120.97), 15);
        viewport.zoom_by(10);
        assert_eq!(viewport.zoom, MAX_ZOOM);
        viewport.zoom_by(-30);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn pan_moves_by_span_fraction() {
        let mut viewport = Viewport::new(Coord::new(24.8, 120.97), 15);
        let span = viewport.lng_span();
        viewport.pan(0.25, 0.0);
        assert!((viewport.center.lng - (120.97 + span / 4.0)).abs() < 1e-12);
        assert!((viewport.center.lat - 24.8).abs() < 1e-12);
    }
}
