//! Shared logic for the parkmap front ends: lot records, occupancy
//! classification, the marker registry, proximity filtering, destination
//! and route requests, and the interaction reducer that ties them together.
//!
//! Nothing in this crate performs I/O directly. Network access goes through
//! the provider traits in [`services`], so the terminal and web front ends
//! can plug in their own transports.

pub mod error;
pub mod fetch;
pub mod geo;
pub mod lot;
pub mod occupancy;
pub mod providers;
pub mod proximity;
pub mod registry;
pub mod request;
pub mod resolve;
pub mod route;
pub mod scene;
pub mod services;
pub mod settings;
pub mod state;

pub use error::{ParkError, ServiceError};
pub use geo::{distance_km, Coord};
pub use lot::{LotId, ParkingLot};
pub use occupancy::{classify, OccupancyStatus, Thresholds};
pub use proximity::Highlight;
pub use registry::{Marker, MarkerRegistry};
pub use route::RouteResult;
pub use settings::Settings;
pub use state::{Effect, Event, MapState, Phase};
