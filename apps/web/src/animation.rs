//! Clock for the ring that pulses around the selected marker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseMode {
    Running,
    Paused,
}

impl PulseMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }
}

/// Radians per second.
const PULSE_SPEED: f64 = 3.0;
/// A hidden tab can stall frames for seconds; cap the step so the ring
/// doesn't jump.
const MAX_FRAME_DELTA: f64 = 0.25;
const FULL_CYCLE: f64 = 2.0 * std::f64::consts::PI;

/// Advances the pulse phase to `now_seconds`. Returns the new phase and the
/// tick to pass in next frame.
pub fn advance_pulse(
    phase: f64,
    last_tick: Option<f64>,
    now_seconds: f64,
    mode: PulseMode,
) -> (f64, Option<f64>) {
    let delta = last_tick.map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA));

    let next = match mode {
        PulseMode::Running => delta.mul_add(PULSE_SPEED, phase).rem_euclid(FULL_CYCLE),
        PulseMode::Paused => phase.rem_euclid(FULL_CYCLE),
    };

    (next, Some(now_seconds))
}

/// Ring size factor in `0..=1` for a phase.
pub fn pulse_level(phase: f64) -> f64 {
    (phase.sin() + 1.0) / 2.0
}
