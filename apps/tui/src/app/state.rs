use parkmap_core::scene::Scene;
use parkmap_core::{Effect, Event, LotId, MapState, Settings};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Map,
    Lots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a destination for the geocoder.
    Search,
    /// Typing a fuzzy filter on the lot list.
    Filter,
}

/// Recorded free counts of one lot, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotHistory {
    pub id: LotId,
    pub free_counts: Vec<u64>,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub map: MapState,
    pub screen: AppScreen,
    pub input_mode: InputMode,
    pub search_input: String,
    pub lot_filter: String,
    pub selected_lot_index: usize,
    pub show_help: bool,
    pub history: Option<LotHistory>,
    pub history_enabled: bool,
    history_requested: Option<LotId>,
    pub throbber_state: ThrobberState,
    pub animation_counter: f64,
    pub last_frame: Instant,
    /// Size of the last drawn frame; mouse clicks are mapped through it.
    pub frame_area: Rect,
    refresh_interval: Option<Duration>,
    last_refresh: Instant,
}

impl App {
    pub fn new(settings: &Settings, history_enabled: bool) -> Self {
        Self {
            running: true,
            map: MapState::new(settings),
            screen: AppScreen::Map,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            lot_filter: String::new(),
            selected_lot_index: 0,
            show_help: false,
            history: None,
            history_enabled,
            history_requested: None,
            throbber_state: ThrobberState::default(),
            animation_counter: 0.0,
            last_frame: Instant::now(),
            frame_area: Rect::default(),
            refresh_interval: settings.refresh_interval,
            last_refresh: Instant::now(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Pulse of the selected marker, cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 4.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.map.is_busy() {
            self.throbber_state.calc_next();
        }
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        self.map.apply(event)
    }

    pub fn scene(&self) -> Scene {
        Scene::project(&self.map)
    }

    /// True once per refresh interval; the caller issues the refresh.
    pub fn take_refresh(&mut self, now: Instant) -> bool {
        let Some(interval) = self.refresh_interval else {
            return false;
        };
        if now.duration_since(self.last_refresh) < interval {
            return false;
        }
        self.last_refresh = now;
        true
    }

    /// The lot whose history should be loaded next, if the selection moved
    /// to a lot that hasn't been asked for yet.
    pub fn take_history_request(&mut self) -> Option<LotId> {
        let selected = self.map.selection.selected.clone();
        if selected.is_none() {
            self.history_requested = None;
            self.history = None;
            return None;
        }
        if !self.history_enabled || selected == self.history_requested {
            return None;
        }
        self.history_requested.clone_from(&selected);
        self.history = None;
        selected
    }

    pub fn set_history(&mut self, id: LotId, free_counts: Vec<u64>) {
        if self.map.selection.selected.as_ref() == Some(&id) {
            self.history = Some(LotHistory { id, free_counts });
        }
    }

    pub fn selected_history(&self) -> Option<&[u64]> {
        let history = self.history.as_ref()?;
        (self.map.selection.selected.as_ref() == Some(&history.id))
            .then_some(history.free_counts.as_slice())
    }
}
