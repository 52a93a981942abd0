use crate::error::ParkError;
use crate::lot::ParkingLot;
use crate::services::{LotSource, RetryPolicy};

/// Fetches the current lot listing. Failures are retried per `retry` and
/// then logged; the caller always gets a (possibly empty) list.
pub async fn fetch_all<S: LotSource>(
    source: &S,
    per_page: Option<u32>,
    retry: &RetryPolicy,
) -> Vec<ParkingLot> {
    let attempts = retry.attempts.max(1);

    for attempt in 1..=attempts {
        match source.fetch_listing(per_page).await {
            Ok(lots) => {
                log::info!("fetched {} parking lots (attempt {attempt})", lots.len());
                return lots;
            }
            Err(error) => {
                let error = ParkError::FetchFailure(error);
                if attempt == attempts {
                    log::error!("{error}; giving up after {attempts} attempt(s)");
                    break;
                }
                let delay = retry.delay_for(attempt - 1);
                log::warn!("{error}; retrying in {delay:?} ({attempt}/{attempts})");
                source.pause(delay).await;
            }
        }
    }

    Vec::new()
}
