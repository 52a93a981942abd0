use crate::geo::{circle_outline, distance_km, Coord};
use crate::registry::MarkerRegistry;
use serde::Serialize;

/// Default radius of the "nearby" highlight.
pub const DEFAULT_RADIUS_KM: f64 = 0.6;

/// The circular overlay drawn around the focal point. At most one exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Highlight {
    pub center: Coord,
    pub radius_m: f64,
}

impl Highlight {
    pub fn radius_km(&self) -> f64 {
        self.radius_m / 1000.0
    }

    pub fn outline(&self, segments: usize) -> Vec<Coord> {
        circle_outline(self.center, self.radius_km(), segments)
    }
}

/// Shows markers within `radius_km` of `center`, hides the rest, and
/// returns the overlay that replaces any previous one.
pub fn apply(center: Coord, radius_km: f64, registry: &mut MarkerRegistry) -> Highlight {
    registry.set_visibility(|marker| distance_km(center, marker.position) <= radius_km);

    let highlight = Highlight {
        center,
        radius_m: radius_km * 1000.0,
    };
    log::debug!(
        "highlight at {center} r={radius_km}km: {} of {} markers visible",
        registry.visible().count(),
        registry.len()
    );
    highlight
}

/// Restores every marker; the caller drops its overlay.
pub fn clear(registry: &mut MarkerRegistry) {
    registry.set_visibility(|_| true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lot::sample_lot;
    use crate::occupancy::Thresholds;

    fn registry_around(center: Coord) -> MarkerRegistry {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();
        // Roughly 0.11 km per 0.001 degree of latitude.
        let offsets = [0.0, 0.002, 0.005, 0.0053, 0.0055, 0.006, 0.02];
        for (index, offset) in offsets.iter().enumerate() {
            registry.upsert(
                sample_lot(
                    &format!("{index:03}"),
                    center.lat + offset,
                    center.lng,
                    10,
                    100,
                ),
                &thresholds,
            );
        }
        registry
    }

    #[test]
    fn visibility_matches_distance_predicate() {
        let center = Coord::new(24.807_26, 120.969_783);
        let mut registry = registry_around(center);

        let highlight = apply(center, 0.6, &mut registry);

        assert!((highlight.radius_m - 600.0).abs() < 1e-9);
        assert_eq!(highlight.center, center);
        for marker in registry.all() {
            let expected = distance_km(center, marker.position) <= 0.6;
            assert_eq!(marker.visible, expected, "marker {}", marker.id);
        }
        assert!(registry.visible().count() > 0);
        assert!(registry.visible().count() < registry.len());
    }

    #[test]
    fn reapplying_moves_the_focus() {
        let center = Coord::new(24.807_26, 120.969_783);
        let mut registry = registry_around(center);

        apply(center, 0.6, &mut registry);
        let far = Coord::new(center.lat + 0.02, center.lng);
        let highlight = apply(far, 0.6, &mut registry);

        let visible: Vec<&str> = registry.visible().map(|m| m.id.as_str()).collect();
        assert_eq!(visible, ["006"]);
        assert_eq!(highlight.center, far);
    }

    #[test]
    fn clear_restores_every_marker() {
        let center = Coord::new(24.807_26, 120.969_783);
        let mut registry = registry_around(center);

        apply(center, 0.1, &mut registry);
        clear(&mut registry);

        assert_eq!(registry.visible().count(), registry.len());
    }
}
