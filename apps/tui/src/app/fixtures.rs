use crate::app::state::App;
use parkmap_core::{Effect, Event, ParkingLot, Settings};

pub fn lot(park_no: &str, name: &str, lat: f64, lng: f64, free: i64, total: i64) -> ParkingLot {
    ParkingLot {
        park_no: park_no.to_string(),
        parking_name: name.to_string(),
        address: "Zhongzheng Rd".to_string(),
        business_hours: "24H".to_string(),
        weekdays: "Car: 20/H".to_string(),
        holiday: "Car: 30/H".to_string(),
        free_quantity: free,
        total_quantity: total,
        latitude: lat,
        longitude: lng,
        update_time: "2024-10-16 10:00:00".to_string(),
    }
}

pub fn settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "PARKMAP_REFRESH_SECS" => Some("60".to_string()),
        "PARKMAP_ORIGIN" => Some("24.8010,120.9700".to_string()),
        _ => None,
    })
}

/// An app whose first fetch returned three lots around Hsinchu station;
/// lot `031` lies about 2 km from the other two.
pub fn app_with_lots() -> App {
    let mut app = App::new(&settings(), true);
    let effects = app.map.start();
    let Some(Effect::FetchLots { ticket }) = effects.first().cloned() else {
        panic!("expected a fetch, got {effects:?}");
    };
    let lots = vec![
        lot("004", "East Gate Garage", 24.8040, 120.9710, 20, 100),
        lot("011", "Station Front", 24.8017, 120.9715, 0, 50),
        lot("031", "Science Park", 24.7850, 120.9850, 45, 60),
    ];
    app.apply(Event::LotsFetched { ticket, lots });
    app
}
