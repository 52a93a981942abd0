use crate::geo::{distance_km, Coord};
use crate::lot::{LotId, ParkingLot};
use crate::occupancy::{OccupancyStatus, Thresholds};
use std::collections::HashSet;

/// Map proxy for one parking lot.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: LotId,
    pub position: Coord,
    pub visible: bool,
    pub status: OccupancyStatus,
    pub lot: ParkingLot,
}

impl Marker {
    fn new(lot: ParkingLot, thresholds: &Thresholds) -> Self {
        Self {
            id: lot.id(),
            position: lot.position(),
            visible: true,
            status: lot.status(thresholds),
            lot,
        }
    }
}

/// Outcome of reconciling the registry with a fresh lot snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Owns every marker, in the order lots first appeared.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
}

impl MarkerRegistry {
    pub const fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Updates the marker bound to the lot's id in place, or appends a new
    /// visible marker when the lot is unknown.
    pub fn upsert(&mut self, lot: ParkingLot, thresholds: &Thresholds) -> &Marker {
        let id = lot.id();
        let index = if let Some(index) = self.markers.iter().position(|marker| marker.id == id) {
            let marker = &mut self.markers[index];
            marker.position = lot.position();
            marker.status = lot.status(thresholds);
            marker.lot = lot;
            index
        } else {
            self.markers.push(Marker::new(lot, thresholds));
            self.markers.len() - 1
        };

        &self.markers[index]
    }

    /// Makes the registry mirror `lots`: markers missing from the snapshot
    /// are dropped, everything else is upserted.
    pub fn sync(&mut self, lots: Vec<ParkingLot>, thresholds: &Thresholds) -> SyncReport {
        let incoming: HashSet<LotId> = lots.iter().map(ParkingLot::id).collect();

        let before = self.markers.len();
        self.markers.retain(|marker| incoming.contains(&marker.id));
        let removed = before - self.markers.len();

        let mut report = SyncReport {
            removed,
            ..SyncReport::default()
        };
        for lot in lots {
            let known = self.get(&lot.id()).is_some();
            self.upsert(lot, thresholds);
            if known {
                report.updated += 1;
            } else {
                report.created += 1;
            }
        }

        report
    }

    pub fn set_visibility<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Marker) -> bool,
    {
        for marker in &mut self.markers {
            marker.visible = predicate(marker);
        }
    }

    pub fn all(&self) -> &[Marker] {
        &self.markers
    }

    pub fn visible(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|marker| marker.visible)
    }

    pub fn get(&self, id: &LotId) -> Option<&Marker> {
        self.markers.iter().find(|marker| &marker.id == id)
    }

    /// Nearest visible marker within `tolerance_km` of `coord`; this is how a
    /// click on the map surface becomes a marker click.
    pub fn hit_test(&self, coord: Coord, tolerance_km: f64) -> Option<&Marker> {
        self.visible()
            .map(|marker| (marker, distance_km(coord, marker.position)))
            .filter(|(_, distance)| *distance <= tolerance_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(marker, _)| marker)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lot::sample_lot;

    #[test]
    fn upsert_same_id_updates_in_place() {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();

        registry.upsert(sample_lot("004", 24.8, 120.97, 22, 292), &thresholds);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.all()[0].status, OccupancyStatus::Low);

        let marker = registry.upsert(sample_lot("004", 24.8, 120.97, 200, 292), &thresholds);
        assert_eq!(marker.status, OccupancyStatus::High);
        assert_eq!(marker.lot.free_quantity, 200);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn upsert_new_id_appends_in_order() {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();

        registry.upsert(sample_lot("004", 24.8, 120.97, 22, 292), &thresholds);
        registry.upsert(sample_lot("011", 24.81, 120.96, 0, 40), &thresholds);

        let ids: Vec<&str> = registry.all().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["004", "011"]);
        assert_eq!(registry.all()[1].status, OccupancyStatus::Zero);
    }

    #[test]
    fn moved_lot_keeps_its_marker() {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();

        registry.upsert(sample_lot("004", 24.8, 120.97, 22, 292), &thresholds);
        registry.upsert(sample_lot("004", 24.8001, 120.9701, 22, 292), &thresholds);

        assert_eq!(registry.len(), 1);
        assert!((registry.all()[0].position.lat - 24.8001).abs() < 1e-12);
    }

    #[test]
    fn sync_removes_stale_markers() {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();
        registry.sync(
            vec![
                sample_lot("001", 24.80, 120.96, 10, 100),
                sample_lot("002", 24.81, 120.97, 50, 100),
            ],
            &thresholds,
        );

        let report = registry.sync(
            vec![
                sample_lot("002", 24.81, 120.97, 45, 100),
                sample_lot("003", 24.82, 120.98, 0, 100),
            ],
            &thresholds,
        );

        assert_eq!(
            report,
            SyncReport {
                created: 1,
                updated: 1,
                removed: 1
            }
        );
        let ids: Vec<&str> = registry.all().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["002", "003"]);
    }

    #[test]
    fn set_visibility_applies_predicate() {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();
        registry.upsert(sample_lot("001", 24.80, 120.96, 0, 100), &thresholds);
        registry.upsert(sample_lot("002", 24.81, 120.97, 50, 100), &thresholds);

        registry.set_visibility(|marker| marker.status == OccupancyStatus::High);

        let visible: Vec<&str> = registry.visible().map(|m| m.id.as_str()).collect();
        assert_eq!(visible, ["002"]);
    }

    #[test]
    fn hit_test_picks_nearest_visible_marker() {
        let thresholds = Thresholds::default();
        let mut registry = MarkerRegistry::new();
        registry.upsert(sample_lot("near", 24.8000, 120.9700, 10, 100), &thresholds);
        registry.upsert(sample_lot("nearer", 24.8002, 120.9702, 10, 100), &thresholds);

        let click = Coord::new(24.8003, 120.9703);
        assert_eq!(
            registry.hit_test(click, 0.1).map(|m| m.id.as_str()),
            Some("nearer")
        );

        registry.set_visibility(|marker| marker.id.as_str() == "near");
        assert_eq!(
            registry.hit_test(click, 0.1).map(|m| m.id.as_str()),
            Some("near")
        );
        assert!(registry.hit_test(Coord::new(25.0, 121.0), 0.1).is_none());
    }
}
