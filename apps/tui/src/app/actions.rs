use parkmap_core::fetch::fetch_all;
use parkmap_core::request::RequestKind;
use parkmap_core::resolve::resolve;
use parkmap_core::route::route;
use parkmap_core::services::Geolocator;
use parkmap_core::{Effect, Event, LotId, ParkingLot};
use parkmap_tui::db::{recent_free_counts, record_snapshot};
use parkmap_tui::net::Services;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Readings shown in the detail sparkline.
const HISTORY_POINTS: i64 = 60;

/// Results posted back to the event loop by background tasks.
#[derive(Debug)]
pub enum AppMessage {
    Map(Event),
    History { id: LotId, free_counts: Vec<u64> },
}

/// Runs reducer effects as tokio tasks. At most one task per request kind
/// is alive; a newer one aborts its predecessor.
#[derive(Debug)]
pub struct Dispatcher {
    services: Arc<Services>,
    pool: Option<SqlitePool>,
    tx: UnboundedSender<AppMessage>,
    in_flight: HashMap<RequestKind, JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(
        services: Arc<Services>,
        pool: Option<SqlitePool>,
        tx: UnboundedSender<AppMessage>,
    ) -> Self {
        Self {
            services,
            pool,
            tx,
            in_flight: HashMap::new(),
        }
    }

    pub fn run_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    pub fn run(&mut self, effect: Effect) {
        let services = Arc::clone(&self.services);
        let tx = self.tx.clone();

        match effect {
            Effect::FetchLots { ticket } => {
                let pool = self.pool.clone();
                self.spawn(RequestKind::Fetch, async move {
                    let settings = &services.settings;
                    let lots = fetch_all(&services.lots, settings.page_size, &settings.retry).await;
                    if let Some(pool) = pool {
                        store_snapshot(&pool, &lots).await;
                    }
                    let _ = tx.send(AppMessage::Map(Event::LotsFetched { ticket, lots }));
                });
            }
            Effect::LocateUser => {
                tokio::spawn(async move {
                    let event = match services.location.current_position().await {
                        Ok(coord) => Event::LocationFound(coord),
                        Err(error) => Event::LocationUnavailable(error.to_string()),
                    };
                    let _ = tx.send(AppMessage::Map(event));
                });
            }
            Effect::Geocode { ticket, query } => {
                self.spawn(RequestKind::Geocode, async move {
                    let result = resolve(&services.geocoder, &query).await;
                    let _ = tx.send(AppMessage::Map(Event::GeocodeFinished { ticket, result }));
                });
            }
            Effect::Route {
                ticket,
                origin,
                destination,
            } => {
                self.spawn(RequestKind::Route, async move {
                    let result = route(&services.directions, Some(origin), destination).await;
                    let _ = tx.send(AppMessage::Map(Event::RouteFinished { ticket, result }));
                });
            }
            Effect::Cancel(kind) => {
                if let Some(handle) = self.in_flight.remove(&kind) {
                    log::debug!("aborting {} request", kind.as_str());
                    handle.abort();
                }
            }
        }
    }

    /// Loads the sparkline readings of one lot from the history database.
    pub fn load_history(&self, id: LotId) {
        let Some(pool) = self.pool.clone() else {
            return;
        };
        let tx = self.tx.clone();

        tokio::spawn(async move {
            match recent_free_counts(&pool, id.as_str(), HISTORY_POINTS).await {
                Ok(free_counts) => {
                    let _ = tx.send(AppMessage::History { id, free_counts });
                }
                Err(e) => log::warn!("history for {id} unavailable: {e}"),
            }
        });
    }

    fn spawn<F>(&mut self, kind: RequestKind, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.in_flight.insert(kind, tokio::spawn(task)) {
            previous.abort();
        }
    }
}

async fn store_snapshot(pool: &SqlitePool, lots: &[ParkingLot]) {
    if lots.is_empty() {
        return;
    }
    let recorded_at = chrono::Utc::now().to_rfc3339();
    match record_snapshot(pool, lots, &recorded_at).await {
        Ok(inserted) => log::debug!("recorded {inserted} new occupancy readings"),
        Err(e) => log::warn!("failed to record occupancy snapshot: {e}"),
    }
}
