//! Runs reducer effects as `spawn_local` tasks that feed their results back
//! through [`dispatch`].

use crate::app::WebApp;
use crate::net::WebServices;
use parkmap_core::fetch::fetch_all;
use parkmap_core::resolve::resolve;
use parkmap_core::route::route;
use parkmap_core::services::Geolocator;
use parkmap_core::{Effect, Event};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

pub type SharedApp = Rc<RefCell<WebApp>>;

/// Applies `event` and starts whatever work it asks for.
pub fn dispatch(app: &SharedApp, services: &Rc<WebServices>, event: Event) {
    let effects = app.borrow_mut().apply(event);
    run_all(app, services, effects);
}

pub fn run_all(app: &SharedApp, services: &Rc<WebServices>, effects: Vec<Effect>) {
    for effect in effects {
        run(app, services, effect);
    }
}

fn run(app: &SharedApp, services: &Rc<WebServices>, effect: Effect) {
    let app = Rc::clone(app);
    let services = Rc::clone(services);

    match effect {
        Effect::FetchLots { ticket } => spawn_local(async move {
            let settings = &services.settings;
            let lots = fetch_all(&services.lots, settings.page_size, &settings.retry).await;
            dispatch(&app, &services, Event::LotsFetched { ticket, lots });
        }),
        Effect::LocateUser => spawn_local(async move {
            let event = match services.location.current_position().await {
                Ok(coord) => Event::LocationFound(coord),
                Err(error) => Event::LocationUnavailable(error.to_string()),
            };
            dispatch(&app, &services, event);
        }),
        Effect::Geocode { ticket, query } => spawn_local(async move {
            let result = resolve(&services.geocoder, &query).await;
            dispatch(&app, &services, Event::GeocodeFinished { ticket, result });
        }),
        Effect::Route {
            ticket,
            origin,
            destination,
        } => spawn_local(async move {
            let result = route(&services.directions, Some(origin), destination).await;
            dispatch(&app, &services, Event::RouteFinished { ticket, result });
        }),
        // A browser fetch can't be aborted from here; the stale result is
        // dropped by its ticket when it lands.
        Effect::Cancel(kind) => log::debug!("superseded {} request left to finish", kind.as_str()),
    }
}
