use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use parkmap_core::Marker;

/// Markers matching `query` against name, address and lot number, best
/// match first. An empty query keeps every marker in registry order.
pub fn filter_markers<'a>(markers: &'a [Marker], query: &str) -> Vec<&'a Marker> {
    let query = query.trim();
    if query.is_empty() {
        return markers.iter().collect();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(i64, &Marker)> = markers
        .iter()
        .filter_map(|marker| {
            let haystack = format!(
                "{} {} {}",
                marker.lot.parking_name, marker.lot.address, marker.lot.park_no
            );
            matcher
                .fuzzy_match(&haystack, query)
                .map(|score| (score, marker))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, marker)| marker).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkmap_core::{MarkerRegistry, ParkingLot, Thresholds};

    fn lot(park_no: &str, name: &str, address: &str, lat: f64, lng: f64) -> ParkingLot {
        ParkingLot {
            park_no: park_no.to_string(),
            parking_name: name.to_string(),
            address: address.to_string(),
            business_hours: "24H".to_string(),
            weekdays: String::new(),
            holiday: String::new(),
            free_quantity: 10,
            total_quantity: 100,
            latitude: lat,
            longitude: lng,
            update_time: String::new(),
        }
    }

    fn registry() -> MarkerRegistry {
        let mut registry = MarkerRegistry::new();
        registry.sync(
            vec![
                lot("004", "East Gate Garage", "Zhongzheng Rd", 24.8040, 120.9710),
                lot("011", "Station Front", "Zhonghua Rd", 24.8017, 120.9715),
                lot("023", "City Hall", "Zhongzheng Rd", 24.8066, 120.9686),
            ],
            &Thresholds::default(),
        );
        registry
    }

    fn ids(markers: &[&Marker]) -> Vec<String> {
        markers.iter().map(|m| m.lot.park_no.clone()).collect()
    }

    #[test]
    fn empty_query_keeps_everything() {
        let registry = registry();
        assert_eq!(filter_markers(registry.all(), "  ").len(), 3);
    }

    #[test]
    fn matches_names_case_insensitively() {
        let registry = registry();
        assert_eq!(ids(&filter_markers(registry.all(), "station")), vec!["011"]);
    }

    #[test]
    fn matches_addresses_and_lot_numbers() {
        let registry = registry();
        let by_street = ids(&filter_markers(registry.all(), "zhongzheng"));
        assert_eq!(by_street.len(), 2);
        assert!(by_street.contains(&"004".to_string()));
        assert!(by_street.contains(&"023".to_string()));

        assert_eq!(ids(&filter_markers(registry.all(), "023")), vec!["023"]);
    }

    #[test]
    fn no_match_is_empty() {
        let registry = registry();
        assert!(filter_markers(registry.all(), "qqqq").is_empty());
    }
}
