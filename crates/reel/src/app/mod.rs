//! Application state and logic

use reel_core::{
    ArbiterConfig, Deck, EngineBuilder, EngineConfig, EngineError, InputArbiter, Intent,
    LastPosition, ManualScheduler, PositionEngine, TimerSlot,
};
use std::time::{Duration, Instant};

mod navigation;
mod playback;
mod search;
mod track;
mod utils;


pub(crate) use playback::clamp_speed;
pub(crate) use track::TrackLayout;
pub(crate) use utils::{row_for_percent, wrap_text};

/// Minimum time between two engine ticks
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub type TimelineEngine = PositionEngine<TrackLayout, LastPosition, ManualScheduler>;

/// Startup options resolved from config and CLI
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub engine: EngineConfig,
    pub arbiter: ArbiterConfig,
    /// Without key release events: how long a fresh hold waits for the
    /// terminal's first key repeat
    pub hold_delay: Duration,
    /// Without key release events: synthesized release after the last repeat
    pub hold_release: Duration,
    /// How long transient hints stay on screen
    pub hint_duration: Duration,
    /// Rows between cards
    pub gap: u16,
    pub slider_visible: bool,
    pub zen: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            arbiter: ArbiterConfig::default(),
            hold_delay: Duration::from_millis(600),
            hold_release: Duration::from_millis(180),
            hint_duration: Duration::from_millis(1500),
            gap: 1,
            slider_visible: true,
            zen: false,
        }
    }
}

/// Which control a mouse press landed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressTarget {
    /// Pressed on the track; `dragged` once the pointer moved
    Track { row: u16, dragged: bool },
    /// Pressed on the slider; last percent sent
    Slider { percent: f64 },
    /// Pressed on an arrow button
    Arrow,
}

/// Screen rectangle (x, y, width, height)
pub type Area = (u16, u16, u16, u16);

pub(crate) fn area_contains(area: Option<Area>, column: u16, row: u16) -> bool {
    match area {
        Some((x, y, w, h)) => column >= x && column < x + w && row >= y && row < y + h,
        None => false,
    }
}

/// The main application state
pub struct App {
    /// Parsed card deck
    pub deck: Deck,
    /// Position engine for the timeline
    pub engine: TimelineEngine,
    /// Input arbitration (pause/resume, drag, hold, slider, jumps)
    pub arbiter: InputArbiter,
    /// Whether to quit
    pub should_quit: bool,
    /// Whether the help popover is visible
    pub show_help: bool,
    /// Zen mode - hide the status bar
    pub zen_mode: bool,
    /// Show the slider column
    pub slider_visible: bool,
    /// Track view area, recorded while drawing
    pub track_area: Option<Area>,
    /// Slider rail area (between the arrow buttons), recorded while drawing
    pub slider_area: Option<Area>,
    /// Back arrow button cell
    pub arrow_back_area: Option<Area>,
    /// Forward arrow button cell
    pub arrow_forward_area: Option<Area>,
    /// Active mouse press
    pub press: Option<PressTarget>,
    /// Year/id search prompt active
    pub search_active: bool,
    /// Year/id search input
    pub search_query: String,
    /// Terminal reports key release events
    pub key_release_events: bool,
    /// Transient message shown in the status bar
    hint: Option<String>,
    hint_timer: TimerSlot,
    hint_duration: Duration,
    /// Ends a keyboard hold when no release event will arrive
    hold_watchdog: TimerSlot,
    hold_delay: Duration,
    hold_release: Duration,
    last_frame: Instant,
}

impl App {
    pub fn new(deck: Deck, settings: AppSettings) -> Result<Self, EngineError> {
        let track = TrackLayout::new(&deck, settings.gap);
        let engine = EngineBuilder::new()
            .track(track)
            .sink(LastPosition::default())
            .scheduler(ManualScheduler::default())
            .config(settings.engine)
            .build()?;

        Ok(Self {
            deck,
            engine,
            arbiter: InputArbiter::new(settings.arbiter),
            should_quit: false,
            show_help: false,
            zen_mode: settings.zen,
            slider_visible: settings.slider_visible,
            track_area: None,
            slider_area: None,
            arrow_back_area: None,
            arrow_forward_area: None,
            press: None,
            search_active: false,
            search_query: String::new(),
            key_release_events: false,
            hint: None,
            hint_timer: TimerSlot::new(),
            hint_duration: settings.hint_duration,
            hold_watchdog: TimerSlot::new(),
            hold_delay: settings.hold_delay,
            hold_release: settings.hold_release,
            last_frame: Instant::now(),
        })
    }

    /// Start the tick loop
    pub fn start(&mut self) {
        self.engine.start();
    }

    /// Lay the track out for `width` columns, re-measuring offsets on change
    pub fn ensure_layout(&mut self, width: u16) {
        if width == 0 || self.engine.track().width() == width {
            return;
        }
        let deck = &self.deck;
        self.engine.track_mut().relayout(deck, width);
        self.engine.compute_offsets_now();
        self.engine.apply();
    }

    /// Force re-measurement, e.g. after the deck was edited
    pub fn recompute(&mut self) {
        let width = self.engine.track().width();
        if width > 0 {
            let deck = &self.deck;
            self.engine.track_mut().relayout(deck, width);
        }
        self.engine.recompute();
        self.engine.apply();
        self.set_hint("Offsets recomputed");
    }

    /// Route an intent through the arbiter
    pub fn dispatch(&mut self, intent: Intent) {
        self.dispatch_at(intent, Instant::now());
    }

    pub(crate) fn dispatch_at(&mut self, intent: Intent, now: Instant) {
        self.arbiter.handle(&mut self.engine, intent, now);
    }

    /// Per-loop housekeeping: timers, then at most one engine tick per frame
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub(crate) fn tick_at(&mut self, now: Instant) {
        if self.hold_watchdog.fire_if_due(now) {
            self.dispatch_at(Intent::HoldEnd, now);
        }
        if self.arbiter.poll(&mut self.engine, now) {
            self.set_hint_at("Resumed", now);
        }
        if self.hint_timer.fire_if_due(now) {
            self.hint = None;
        }

        if now.duration_since(self.last_frame) < FRAME_INTERVAL {
            return;
        }
        self.last_frame = now;
        if self.engine.scheduler_mut().take() {
            self.engine.tick();
        }
    }

    /// Position last applied to the screen
    pub fn rendered_position(&self) -> f64 {
        self.engine.sink().position.unwrap_or(0.0)
    }

    /// Deck card nearest to the live position
    pub fn current_card_index(&self) -> usize {
        self.engine.nearest_card_index()
    }

    pub fn card_count(&self) -> usize {
        self.deck.cards.len()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn set_hint(&mut self, text: impl Into<String>) {
        self.set_hint_at(text, Instant::now());
    }

    fn set_hint_at(&mut self, text: impl Into<String>, now: Instant) {
        self.hint = Some(text.into());
        self.hint_timer.schedule(now, self.hint_duration);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_zen(&mut self) {
        self.zen_mode = !self.zen_mode;
    }

    pub fn toggle_slider(&mut self) {
        self.slider_visible = !self.slider_visible;
    }

    /// Seconds until auto-scroll resumes, for the status bar
    pub fn resume_countdown(&self) -> Option<u64> {
        self.arbiter
            .resume_in(Instant::now())
            .map(|d| d.as_secs() + u64::from(d.subsec_millis() > 0))
    }
}
