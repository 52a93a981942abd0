//! Capabilities the core needs from the outside world. Each front end
//! implements these over its own transport (reqwest in the terminal,
//! `fetch` in the browser).

use crate::error::{ParkError, ServiceError};
use crate::geo::Coord;
use crate::lot::ParkingLot;
use crate::route::RouteResult;
use std::time::Duration;

/// Source of the current lot listing.
#[allow(async_fn_in_trait)]
pub trait LotSource {
    async fn fetch_listing(&self, per_page: Option<u32>) -> Result<Vec<ParkingLot>, ServiceError>;

    /// Waits between retries. Implementations use their runtime's timer.
    async fn pause(&self, delay: Duration);
}

/// Free text to coordinate. `Ok(None)` means the provider answered but had
/// no match.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coord>, ServiceError>;
}

/// Driving directions between two points.
#[allow(async_fn_in_trait)]
pub trait Directions {
    async fn driving_route(
        &self,
        origin: Coord,
        destination: Coord,
    ) -> Result<RouteResult, ServiceError>;
}

/// The user's current position.
#[allow(async_fn_in_trait)]
pub trait Geolocator {
    async fn current_position(&self) -> Result<Coord, ParkError>;
}

/// Bounded exponential backoff for the lot fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32) -> Self {
        Self {
            attempts,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }

    /// Delay before retry number `retry` (0 for the first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(10), Duration::from_secs(8));
        assert_eq!(policy.delay_for(40), Duration::from_secs(8));
    }
}
