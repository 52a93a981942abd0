//! Interaction reducer. Front ends feed [`Event`]s into [`MapState::apply`],
//! run the returned [`Effect`]s, and post the results back as events.

use crate::error::ParkError;
use crate::geo::Coord;
use crate::lot::{LotId, ParkingLot};
use crate::occupancy::Thresholds;
use crate::proximity::{self, Highlight};
use crate::registry::MarkerRegistry;
use crate::request::{RequestKind, RequestTracker, Ticket};
use crate::route::RouteResult;
use crate::scene::Viewport;
use crate::settings::Settings;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Detail panel open for the selected lot.
    LotSelected,
    /// Waiting on a driving route to the selected lot.
    Routing,
    /// A searched destination is centered and highlighted.
    DestinationResolved,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LotSelected => "lot selected",
            Self::Routing => "routing",
            Self::DestinationResolved => "destination",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub phase: Phase,
    pub selected: Option<LotId>,
    /// Coordinate of the last resolved search.
    pub destination: Option<Coord>,
    pub user_location: Option<Coord>,
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Warning(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RefreshRequested,
    LotsFetched {
        ticket: Ticket,
        lots: Vec<ParkingLot>,
    },
    LocationFound(Coord),
    LocationUnavailable(String),
    /// A click on the map surface; becomes a marker click when a visible
    /// marker lies within `tolerance_km`.
    MapClicked {
        at: Coord,
        tolerance_km: f64,
    },
    MarkerClicked(LotId),
    /// Marker selection from a list; also recenters the map on the lot.
    FocusLot(LotId),
    BackgroundClicked,
    ConfirmNavigation,
    CancelNavigation,
    SearchSubmitted(String),
    GeocodeFinished {
        ticket: Ticket,
        result: Result<Coord, ParkError>,
    },
    RouteFinished {
        ticket: Ticket,
        result: Result<Option<RouteResult>, ParkError>,
    },
    Pan {
        east: f64,
        north: f64,
    },
    Zoom(i8),
    DismissNotice,
}

/// Async work requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchLots {
        ticket: Ticket,
    },
    LocateUser,
    Geocode {
        ticket: Ticket,
        query: String,
    },
    Route {
        ticket: Ticket,
        origin: Coord,
        destination: Coord,
    },
    /// Drop whatever is in flight for this kind.
    Cancel(RequestKind),
}

#[derive(Debug, Clone)]
pub struct MapState {
    pub registry: MarkerRegistry,
    pub selection: Selection,
    pub route: Option<RouteResult>,
    pub viewport: Viewport,
    pub notice: Option<Notice>,
    pub thresholds: Thresholds,
    pub radius_km: f64,
    zoom: u8,
    tracker: RequestTracker,
    pending: HashSet<RequestKind>,
}

impl MapState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            registry: MarkerRegistry::new(),
            selection: Selection::default(),
            route: None,
            viewport: Viewport::new(settings.initial_center, settings.zoom),
            notice: None,
            thresholds: settings.thresholds,
            radius_km: settings.radius_km,
            zoom: settings.zoom,
            tracker: RequestTracker::new(),
            pending: HashSet::new(),
        }
    }

    /// First effects of a view: the lot listing and a single location
    /// request.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = self.apply(Event::RefreshRequested);
        effects.push(Effect::LocateUser);
        effects
    }

    pub fn phase(&self) -> Phase {
        self.selection.phase
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending.contains(&kind)
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The visible marker after (or before) the selected one, wrapping
    /// around. With nothing selected, the first (or last) visible marker.
    pub fn cycle_target(&self, forward: bool) -> Option<LotId> {
        let ids: Vec<&LotId> = self.registry.visible().map(|marker| &marker.id).collect();
        if ids.is_empty() {
            return None;
        }

        let len = ids.len();
        let current = self
            .selection
            .selected
            .as_ref()
            .and_then(|selected| ids.iter().position(|id| *id == selected));
        let next = match (current, forward) {
            (Some(index), true) => (index + 1) % len,
            (Some(index), false) => (index + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        Some(ids[next].clone())
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::RefreshRequested => vec![Effect::FetchLots {
                ticket: self.issue(RequestKind::Fetch),
            }],
            Event::LotsFetched { ticket, lots } => {
                if self.settle(ticket) {
                    self.lots_fetched(lots);
                }
                Vec::new()
            }
            Event::LocationFound(coord) => {
                log::info!("user location {coord}");
                self.selection.user_location = Some(coord);
                if self.selection.phase == Phase::Idle && self.selection.highlight.is_none() {
                    self.viewport.center = coord;
                }
                Vec::new()
            }
            Event::LocationUnavailable(reason) => {
                log::warn!("geolocation unavailable: {reason}");
                self.notice = Some(Notice::Info(
                    "Location unavailable; navigation is disabled".to_string(),
                ));
                Vec::new()
            }
            Event::MapClicked { at, tolerance_km } => {
                let hit = self
                    .registry
                    .hit_test(at, tolerance_km)
                    .map(|marker| marker.id.clone());
                match hit {
                    Some(id) => self.select(id, false),
                    None => self.clear_selection(),
                }
            }
            Event::MarkerClicked(id) => self.select(id, false),
            Event::FocusLot(id) => self.select(id, true),
            Event::BackgroundClicked => self.clear_selection(),
            Event::ConfirmNavigation => self.confirm_navigation(),
            Event::CancelNavigation => {
                if self.selection.phase == Phase::LotSelected {
                    self.selection.phase = Phase::Idle;
                }
                Vec::new()
            }
            Event::SearchSubmitted(text) => {
                let query = text.trim();
                if query.is_empty() {
                    self.notice = Some(Notice::Warning("Enter a destination to search".to_string()));
                    return Vec::new();
                }
                vec![Effect::Geocode {
                    ticket: self.issue(RequestKind::Geocode),
                    query: query.to_string(),
                }]
            }
            Event::GeocodeFinished { ticket, result } => {
                if self.settle(ticket) {
                    self.geocode_finished(result);
                }
                Vec::new()
            }
            Event::RouteFinished { ticket, result } => {
                if self.settle(ticket) {
                    self.route_finished(result);
                }
                Vec::new()
            }
            Event::Pan { east, north } => {
                self.viewport.pan(east, north);
                Vec::new()
            }
            Event::Zoom(steps) => {
                self.viewport.zoom_by(steps);
                Vec::new()
            }
            Event::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
        }
    }

    fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.pending.insert(kind);
        self.tracker.issue(kind)
    }

    fn cancel(&mut self, kind: RequestKind, effects: &mut Vec<Effect>) {
        if self.pending.remove(&kind) {
            self.tracker.cancel(kind);
            effects.push(Effect::Cancel(kind));
        }
    }

    /// True when `ticket` is still the one to honour; stale results are
    /// dropped here.
    fn settle(&mut self, ticket: Ticket) -> bool {
        if !self.tracker.is_current(ticket) {
            log::debug!("discarding stale result {ticket}");
            return false;
        }
        self.pending.remove(&ticket.kind);
        true
    }

    fn lots_fetched(&mut self, lots: Vec<ParkingLot>) {
        // An empty answer is what a failed fetch looks like; keep what is on
        // the map rather than wiping it.
        if lots.is_empty() && !self.registry.is_empty() {
            log::warn!("lot refresh returned nothing; keeping {} markers", self.registry.len());
            self.notice = Some(Notice::Warning("Parking data unavailable".to_string()));
            return;
        }

        let report = self.registry.sync(lots, &self.thresholds);
        log::info!(
            "lots synced: {} new, {} updated, {} removed",
            report.created,
            report.updated,
            report.removed
        );

        if let Some(id) = &self.selection.selected {
            if self.registry.get(id).is_none() {
                log::info!("selected lot {id} is gone from the listing");
                self.selection.selected = None;
                if self.selection.phase == Phase::LotSelected {
                    self.selection.phase = Phase::Idle;
                }
            }
        }

        if let Some(highlight) = self.selection.highlight {
            self.selection.highlight = Some(proximity::apply(
                highlight.center,
                highlight.radius_km(),
                &mut self.registry,
            ));
        }
    }

    fn select(&mut self, id: LotId, recenter: bool) -> Vec<Effect> {
        let Some(position) = self.registry.get(&id).map(|marker| marker.position) else {
            log::debug!("ignoring click on unknown lot {id}");
            return Vec::new();
        };

        let mut effects = Vec::new();
        self.cancel(RequestKind::Geocode, &mut effects);
        self.cancel(RequestKind::Route, &mut effects);

        self.selection.highlight = Some(proximity::apply(position, self.radius_km, &mut self.registry));
        self.selection.selected = Some(id);
        self.selection.destination = None;
        self.selection.phase = Phase::LotSelected;
        if recenter {
            self.viewport.center = position;
        }

        effects
    }

    fn clear_selection(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.cancel(RequestKind::Geocode, &mut effects);
        self.cancel(RequestKind::Route, &mut effects);

        if self.selection.phase == Phase::Idle && self.selection.highlight.is_none() {
            return effects;
        }

        proximity::clear(&mut self.registry);
        self.selection.highlight = None;
        self.selection.selected = None;
        self.selection.destination = None;
        self.selection.phase = Phase::Idle;

        effects
    }

    fn confirm_navigation(&mut self) -> Vec<Effect> {
        if self.selection.phase != Phase::LotSelected {
            return Vec::new();
        }
        let Some(destination) = self
            .selection
            .selected
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .map(|marker| marker.position)
        else {
            self.selection.phase = Phase::Idle;
            return Vec::new();
        };

        let Some(origin) = self.selection.user_location else {
            log::info!("navigation to {destination} skipped: location unknown");
            self.notice = Some(Notice::Warning(
                "Current location unknown; cannot plan a route".to_string(),
            ));
            self.selection.phase = Phase::Idle;
            return Vec::new();
        };

        self.selection.phase = Phase::Routing;
        vec![Effect::Route {
            ticket: self.issue(RequestKind::Route),
            origin,
            destination,
        }]
    }

    fn geocode_finished(&mut self, result: Result<Coord, ParkError>) {
        match result {
            Ok(coord) => {
                self.viewport = Viewport::new(coord, self.zoom);
                self.selection.highlight = Some(proximity::apply(coord, self.radius_km, &mut self.registry));
                self.selection.selected = None;
                self.selection.destination = Some(coord);
                if self.selection.phase != Phase::Routing {
                    self.selection.phase = Phase::DestinationResolved;
                }
                let nearby = self.registry.visible().count();
                self.notice = Some(Notice::Info(format!("{nearby} lots nearby")));
            }
            Err(error) => {
                self.notice = Some(Notice::Warning(error.to_string()));
            }
        }
    }

    fn route_finished(&mut self, result: Result<Option<RouteResult>, ParkError>) {
        match result {
            Ok(Some(route)) => {
                self.notice = Some(Notice::Info(route.summary()));
                self.route = Some(route);
            }
            Ok(None) => {
                self.notice = Some(Notice::Warning(
                    "Current location unknown; cannot plan a route".to_string(),
                ));
            }
            Err(error) => {
                self.notice = Some(Notice::Warning(error.to_string()));
            }
        }
        if self.selection.phase == Phase::Routing {
            self.selection.phase = Phase::Idle;
        }
    }
}
