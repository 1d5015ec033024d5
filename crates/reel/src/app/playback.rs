use super::App;
use reel_core::Intent;

const SPEED_STEP: f64 = 0.02;
const MIN_SPEED: f64 = 0.01;
const MAX_SPEED: f64 = 2.0;

/// Bring a speed from config or the command line into the supported range.
/// Negative and non-finite values are replaced by `fallback`.
pub(crate) fn clamp_speed(speed: f64, fallback: f64) -> f64 {
    if !speed.is_finite() || speed < 0.0 {
        log::warn!("invalid speed {}, using {}", speed, fallback);
        return fallback;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

impl App {
    pub fn toggle_pause(&mut self) {
        self.dispatch(Intent::TogglePause);
        if self.engine.auto_scroll() {
            self.set_hint("Playing");
        } else {
            self.set_hint("Paused");
        }
    }

    pub fn increase_speed(&mut self) {
        let speed = (self.engine.config().base_speed + SPEED_STEP).min(MAX_SPEED);
        self.set_speed(speed);
    }

    pub fn decrease_speed(&mut self) {
        let speed = (self.engine.config().base_speed - SPEED_STEP).max(MIN_SPEED);
        self.set_speed(speed);
    }

    fn set_speed(&mut self, speed: f64) {
        // Keep a tick well inside one period so the loop never skips
        let half = self.engine.half_track_height();
        let speed = if half > 0.0 { speed.min(half / 2.0) } else { speed };
        self.engine.set_base_speed(speed);
        self.set_hint(format!("Speed {:.2}", speed));
    }

    pub fn toggle_hover_pause(&mut self) {
        let enabled = !self.arbiter.config().hover_pause;
        self.arbiter.set_hover_pause(enabled);
        if enabled {
            self.set_hint("Pause on hover");
        } else {
            self.set_hint("Click to pause");
        }
    }
}
