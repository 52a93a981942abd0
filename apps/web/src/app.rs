use crate::animation::{advance_pulse, pulse_level, PulseMode};
use parkmap_core::scene::Scene;
use parkmap_core::{Effect, Event, MapState, Phase, Settings};
use ratzilla::event::KeyCode;

/// Fraction of the visible span moved per arrow key.
const PAN_STEP: f64 = 0.1;

pub struct WebApp {
    pub map: MapState,
    /// Text typed so far while the search prompt is open.
    pub search: Option<String>,
    pub pulse_phase: f64,
    pub pulse_mode: PulseMode,
    last_tick: Option<f64>,
    refresh_interval_ms: Option<f64>,
    last_refresh_ms: f64,
}

impl WebApp {
    pub fn new(settings: &Settings, now_ms: f64) -> Self {
        Self {
            map: MapState::new(settings),
            search: None,
            pulse_phase: 0.0,
            pulse_mode: PulseMode::Running,
            last_tick: None,
            refresh_interval_ms: settings
                .refresh_interval
                .map(|interval| interval.as_secs_f64() * 1000.0),
            last_refresh_ms: now_ms,
        }
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        self.map.apply(event)
    }

    pub fn scene(&self) -> Scene {
        Scene::project(&self.map)
    }

    /// Per-frame clock update.
    pub fn tick(&mut self, now_ms: f64) {
        let (phase, last_tick) =
            advance_pulse(self.pulse_phase, self.last_tick, now_ms / 1000.0, self.pulse_mode);
        self.pulse_phase = phase;
        self.last_tick = last_tick;
    }

    pub fn pulse(&self) -> f64 {
        pulse_level(self.pulse_phase)
    }

    /// True once per refresh interval.
    pub fn take_refresh(&mut self, now_ms: f64) -> bool {
        let Some(interval) = self.refresh_interval_ms else {
            return false;
        };
        if now_ms - self.last_refresh_ms < interval {
            return false;
        }
        self.last_refresh_ms = now_ms;
        true
    }
}

/// Translates a key press into reducer events. The page has no mouse
/// picking; lots are selected with Tab.
pub fn handle_key(app: &mut WebApp, key: KeyCode) -> Vec<Event> {
    if let Some(text) = app.search.as_mut() {
        match key {
            KeyCode::Esc => app.search = None,
            KeyCode::Enter => {
                let query = std::mem::take(text);
                app.search = None;
                return vec![Event::SearchSubmitted(query)];
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(ch) => text.push(ch),
            _ => {}
        }
        return Vec::new();
    }

    match key {
        KeyCode::Char('/' | 's') => {
            app.search = Some(String::new());
            Vec::new()
        }
        KeyCode::Enter => vec![Event::ConfirmNavigation],
        KeyCode::Esc => {
            if app.map.phase() == Phase::LotSelected {
                vec![Event::CancelNavigation]
            } else if app.map.notice.is_some() {
                vec![Event::DismissNotice]
            } else {
                vec![Event::BackgroundClicked]
            }
        }
        KeyCode::Char('c') => vec![Event::BackgroundClicked],
        KeyCode::Char('r') => vec![Event::RefreshRequested],
        KeyCode::Char(' ') => {
            app.pulse_mode = app.pulse_mode.toggled();
            Vec::new()
        }
        KeyCode::Left | KeyCode::Char('h') => vec![Event::Pan { east: -PAN_STEP, north: 0.0 }],
        KeyCode::Right | KeyCode::Char('l') => vec![Event::Pan { east: PAN_STEP, north: 0.0 }],
        KeyCode::Up | KeyCode::Char('k') => vec![Event::Pan { east: 0.0, north: PAN_STEP }],
        KeyCode::Down | KeyCode::Char('j') => vec![Event::Pan { east: 0.0, north: -PAN_STEP }],
        KeyCode::Char('+' | '=') => vec![Event::Zoom(1)],
        KeyCode::Char('-') => vec![Event::Zoom(-1)],
        KeyCode::Tab | KeyCode::Char('n') => cycle(app, true),
        KeyCode::Char('p') => cycle(app, false),
        _ => Vec::new(),
    }
}

fn cycle(app: &WebApp, forward: bool) -> Vec<Event> {
    app.map
        .cycle_target(forward)
        .map(Event::FocusLot)
        .into_iter()
        .collect()
}
