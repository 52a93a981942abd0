use crate::error::ServiceError;
use crate::geo::Coord;
use crate::occupancy::{classify, percentage_free, OccupancyStatus, Thresholds};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Join key between a lot record and its marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LotId(pub String);

impl LotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LotId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One parking facility as published by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    #[serde(default)]
    pub park_no: String,
    #[serde(default)]
    pub parking_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub business_hours: String,
    #[serde(default)]
    pub weekdays: String,
    #[serde(default)]
    pub holiday: String,
    #[serde(deserialize_with = "flexible_int")]
    pub free_quantity: i64,
    #[serde(deserialize_with = "flexible_int")]
    pub total_quantity: i64,
    #[serde(deserialize_with = "flexible_degrees")]
    pub latitude: f64,
    #[serde(deserialize_with = "flexible_degrees")]
    pub longitude: f64,
    #[serde(default)]
    pub update_time: String,
}

impl ParkingLot {
    /// The lot's `park_no`, or its position at the source's six-decimal
    /// precision when the record carries no number.
    pub fn id(&self) -> LotId {
        let park_no = self.park_no.trim();
        if park_no.is_empty() {
            LotId(self.position().to_string())
        } else {
            LotId(park_no.to_string())
        }
    }

    pub const fn position(&self) -> Coord {
        Coord {
            lat: self.latitude,
            lng: self.longitude,
        }
    }

    pub fn percentage_free(&self) -> Option<f64> {
        percentage_free(self.free_quantity, self.total_quantity)
    }

    pub fn status(&self, thresholds: &Thresholds) -> OccupancyStatus {
        classify(self.free_quantity, self.total_quantity, thresholds)
    }

    /// `"22 / 292"` style occupancy text for the detail panel.
    pub fn occupancy_text(&self) -> String {
        format!("{} / {}", self.free_quantity, self.total_quantity)
    }
}

#[derive(Debug, Deserialize)]
struct LotListing {
    data: Vec<ParkingLot>,
}

/// Parses the source's local `update_time` (`2024-10-16 10:02:59.663`).
pub fn parse_update_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), UPDATE_TIME_FORMAT).ok()
}

pub fn parse_listing(body: &str) -> Result<Vec<ParkingLot>, ServiceError> {
    let listing: LotListing = serde_json::from_str(body)?;
    Ok(listing.data)
}

/// One historical reading of a lot, as returned by the paginated history
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySample {
    #[serde(default)]
    pub park_no: String,
    #[serde(deserialize_with = "flexible_int")]
    pub free_quantity: i64,
    #[serde(deserialize_with = "flexible_int")]
    pub total_quantity: i64,
    #[serde(default)]
    pub update_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
}

impl PageMeta {
    pub const fn is_last(&self) -> bool {
        self.current_page >= self.last_page
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryPage {
    pub data: Vec<OccupancySample>,
    pub meta: PageMeta,
}

pub fn parse_history_page(body: &str) -> Result<HistoryPage, ServiceError> {
    Ok(serde_json::from_str(body)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn flexible_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate \"{text}\""))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn flexible_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value.round() as i64),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid count \"{text}\""))),
    }
}

#[cfg(test)]
pub(crate) fn sample_lot(park_no: &str, lat: f64, lng: f64, free: i64, total: i64) -> ParkingLot {
    ParkingLot {
        park_no: park_no.to_string(),
        parking_name: format!("Lot {park_no}"),
        address: String::new(),
        business_hours: "24H".to_string(),
        weekdays: String::new(),
        holiday: String::new(),
        free_quantity: free,
        total_quantity: total,
        latitude: lat,
        longitude: lng,
        update_time: "2024-10-16 10:02:59.663".to_string(),
    }
}
