//! Position engine: the single owner of the timeline's scroll position

use crate::card;
use crate::index;
use crate::layout::{wrap_position, OffsetTable};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("No card track was provided")]
    MissingTrack,
    #[error("No render sink was provided")]
    MissingSink,
    #[error("No frame scheduler was provided")]
    MissingScheduler,
}

// ==================== Host ports ====================

/// The container holding the card track, in document order
pub trait CardTrack {
    /// Identifiers of every card currently on the track
    fn card_ids(&self) -> Vec<String>;
    /// Measured top of the card at `index`, or `None` before layout
    fn card_top(&self, index: usize) -> Option<f64>;
    /// Total scrollable height of the track
    fn scroll_height(&self) -> f64;
    /// Append structural clones of the first `count` cards, keeping their ids
    fn append_clones(&mut self, count: usize);
}

/// Receives the translation to apply to the track
pub trait RenderSink {
    fn apply_position(&mut self, position: f64);
}

/// Host frame loop
pub trait FrameScheduler {
    fn request_tick(&mut self);
    fn cancel_tick(&mut self);
}

/// Render sink that remembers the last applied translation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastPosition {
    pub position: Option<f64>,
    pub writes: usize,
}

impl RenderSink for LastPosition {
    fn apply_position(&mut self, position: f64) {
        self.position = Some(position);
        self.writes += 1;
    }
}

/// Scheduler for hosts that poll: a pending flag the host takes each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    pending: bool,
}

impl ManualScheduler {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request; true if a tick should run this frame
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_tick(&mut self) {
        self.pending = true;
    }

    fn cancel_tick(&mut self) {
        self.pending = false;
    }
}

// ==================== Engine ====================

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Distance advanced per tick while auto-scrolling.
    ///
    /// Must stay below the half-track height, as must any arrow speed,
    /// or a whole period can be skipped in one tick.
    pub base_speed: f64,
    /// Whether auto-scroll starts enabled
    pub autoplay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.75,
            autoplay: true,
        }
    }
}

/// Lifecycle of the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

/// Builder that refuses to produce an engine with a missing port
pub struct EngineBuilder<T, R, S> {
    track: Option<T>,
    sink: Option<R>,
    scheduler: Option<S>,
    config: EngineConfig,
}

impl<T: CardTrack, R: RenderSink, S: FrameScheduler> Default for EngineBuilder<T, R, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CardTrack, R: RenderSink, S: FrameScheduler> EngineBuilder<T, R, S> {
    pub fn new() -> Self {
        Self {
            track: None,
            sink: None,
            scheduler: None,
            config: EngineConfig::default(),
        }
    }

    pub fn track(mut self, track: T) -> Self {
        self.track = Some(track);
        self
    }

    pub fn sink(mut self, sink: R) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn scheduler(mut self, scheduler: S) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine, mirroring the track and measuring it once
    pub fn build(self) -> Result<PositionEngine<T, R, S>, EngineError> {
        let track = self.track.ok_or(EngineError::MissingTrack).map_err(refused)?;
        let sink = self.sink.ok_or(EngineError::MissingSink).map_err(refused)?;
        let scheduler = self
            .scheduler
            .ok_or(EngineError::MissingScheduler)
            .map_err(refused)?;

        let mut config = self.config;
        if !valid_base_speed(config.base_speed) {
            log::warn!("ignoring base speed {}, using default", config.base_speed);
            config.base_speed = EngineConfig::default().base_speed;
        }

        let mut engine = PositionEngine {
            track,
            sink,
            scheduler,
            config,
            state: EngineState::Stopped,
            table: OffsetTable::default(),
            original_count: 0,
            position: 0.0,
            auto_scroll: self.config.autoplay,
            arrow_speed: 0.0,
        };
        engine.recompute();
        Ok(engine)
    }
}

fn valid_base_speed(speed: f64) -> bool {
    speed.is_finite() && speed >= 0.0
}

fn refused(err: EngineError) -> EngineError {
    log::warn!("timeline engine not initialized: {}", err);
    err
}

/// Owns the scroll position of one timeline and advances it each tick.
///
/// Position is negative while the track is advanced forward and is kept in
/// `(-half_track_height, 0]` whenever the half-track height is positive.
pub struct PositionEngine<T, R, S> {
    track: T,
    sink: R,
    scheduler: S,
    config: EngineConfig,
    state: EngineState,
    table: OffsetTable,
    original_count: usize,
    position: f64,
    auto_scroll: bool,
    /// Press-and-hold speed; nonzero overrides auto-scroll
    arrow_speed: f64,
}

impl<T: CardTrack, R: RenderSink, S: FrameScheduler> PositionEngine<T, R, S> {
    /// Start the tick loop. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.state == EngineState::Running {
            return false;
        }
        self.state = EngineState::Running;
        self.compute_offsets_now();
        self.apply();
        self.scheduler.request_tick();
        log::info!(
            "timeline started: {} cards, period {}",
            self.original_count,
            self.table.half_track_height()
        );
        true
    }

    /// Stop the tick loop. Returns false if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if self.state == EngineState::Stopped {
            return false;
        }
        self.state = EngineState::Stopped;
        self.scheduler.cancel_tick();
        log::info!("timeline stopped at {}", self.position);
        true
    }

    /// One animation step: advance, wrap, apply, then ask for the next frame
    pub fn tick(&mut self) {
        if self.state != EngineState::Running {
            return;
        }

        if self.arrow_speed != 0.0 {
            self.auto_scroll = false;
            self.position += self.arrow_speed;
        } else if self.auto_scroll {
            self.position -= self.config.base_speed;
        }

        self.position = wrap_position(self.position, self.table.half_track_height());
        self.apply();
        self.scheduler.request_tick();
    }

    /// Snap card `index` (clamped) to the reference edge and apply immediately
    pub fn jump_to_index(&mut self, index: usize) {
        self.position = self.pos_y_for_index(index);
        self.apply();
    }

    /// Write a free-form position (wrapped) and apply immediately.
    /// Non-finite positions are ignored.
    pub fn set_position(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        self.position = wrap_position(position, self.table.half_track_height());
        self.apply();
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    /// Set the press-and-hold speed. Any nonzero speed turns auto-scroll off.
    /// Non-finite speeds are ignored.
    pub fn set_arrow_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            log::debug!("ignoring arrow speed {}", speed);
            return;
        }
        self.arrow_speed = speed;
        if speed != 0.0 {
            self.auto_scroll = false;
        }
    }

    /// Set the auto-scroll speed. Negative or non-finite speeds are ignored.
    pub fn set_base_speed(&mut self, speed: f64) {
        if !valid_base_speed(speed) {
            log::debug!("ignoring base speed {}", speed);
            return;
        }
        self.config.base_speed = speed;
    }

    /// Position that would show card `index`, without moving the timeline
    pub fn pos_y_for_index(&self, index: usize) -> f64 {
        let desired = index::index_to_position(index, self.table.offsets());
        wrap_position(desired, self.table.half_track_height())
    }

    /// Card closest to the live position
    pub fn nearest_card_index(&self) -> usize {
        index::nearest_index(self.position, self.table.offsets())
    }

    /// Live position as a continuous card index
    pub fn current_fraction(&self) -> f64 {
        index::position_to_fraction(self.position, self.table.offsets())
    }

    /// Re-measure the track. Keeps the previous table if layout is not ready.
    pub fn compute_offsets_now(&mut self) {
        let ids = self.track.card_ids();
        self.original_count = card::original_count(&ids);
        match OffsetTable::compute(&self.track, self.original_count) {
            Some(table) => {
                log::debug!(
                    "offsets recomputed: {} cards, period {}",
                    table.len(),
                    table.half_track_height()
                );
                self.table = table;
            }
            None => log::debug!("layout not ready, keeping last offsets"),
        }
        self.position = wrap_position(self.position, self.table.half_track_height());
    }

    /// Mirror the track if needed, then re-measure it.
    /// Returns true if the track was doubled.
    pub fn recompute(&mut self) -> bool {
        let doubled = card::duplicate(&mut self.track);
        self.compute_offsets_now();
        doubled
    }

    /// Push the current position to the render sink
    pub fn apply(&mut self) {
        self.sink.apply_position(self.position);
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn arrow_speed(&self) -> f64 {
        self.arrow_speed
    }

    pub fn offsets(&self) -> &[f64] {
        self.table.offsets()
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn half_track_height(&self) -> f64 {
        self.table.half_track_height()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn track(&self) -> &T {
        &self.track
    }

    /// Mutable track access. Call [`Self::recompute`] after changing cards.
    pub fn track_mut(&mut self) -> &mut T {
        &mut self.track
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardSequence};

    type TestEngine = PositionEngine<CardSequence, LastPosition, ManualScheduler>;

    fn engine_for(track: CardSequence) -> TestEngine {
        EngineBuilder::new()
            .track(track)
            .sink(LastPosition::default())
            .scheduler(ManualScheduler::default())
            .build()
            .expect("engine")
    }

    /// Four cards at tops [0, 100, 250, 420], 840 tall once doubled
    fn four_cards() -> TestEngine {
        engine_for(CardSequence::from_tops(
            &["a", "b", "c", "d"],
            &[0.0, 100.0, 250.0, 420.0],
            420.0,
        ))
    }

    /// Drive the engine the way a host frame loop would
    fn run_frames(engine: &mut TestEngine, frames: usize) {
        for _ in 0..frames {
            if engine.scheduler_mut().take() {
                engine.tick();
            }
        }
    }

    #[test]
    fn test_build_requires_every_port() {
        let err = EngineBuilder::<CardSequence, LastPosition, ManualScheduler>::new()
            .sink(LastPosition::default())
            .scheduler(ManualScheduler::default())
            .build()
            .err();
        assert_eq!(err, Some(EngineError::MissingTrack));

        let err = EngineBuilder::<CardSequence, LastPosition, ManualScheduler>::new()
            .track(CardSequence::default())
            .scheduler(ManualScheduler::default())
            .build()
            .err();
        assert_eq!(err, Some(EngineError::MissingSink));

        let err = EngineBuilder::<CardSequence, LastPosition, ManualScheduler>::new()
            .track(CardSequence::default())
            .sink(LastPosition::default())
            .build()
            .err();
        assert_eq!(err, Some(EngineError::MissingScheduler));
    }

    #[test]
    fn test_build_duplicates_and_measures() {
        let engine = four_cards();
        assert_eq!(engine.track().len(), 8);
        assert_eq!(engine.original_count(), 4);
        assert_eq!(engine.offsets(), &[0.0, 100.0, 250.0, 420.0]);
        assert_eq!(engine.half_track_height(), 420.0);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn test_start_stop_idempotent() {
        let mut engine = four_cards();
        assert!(engine.start());
        assert!(!engine.start());
        assert!(engine.scheduler().is_pending());
        assert_eq!(engine.sink().position, Some(0.0));

        assert!(engine.stop());
        assert!(!engine.stop());
        assert!(!engine.scheduler().is_pending());
    }

    #[test]
    fn test_tick_ignored_while_stopped() {
        let mut engine = four_cards();
        engine.tick();
        assert_eq!(engine.position(), 0.0);
        assert_eq!(engine.sink().writes, 0);
    }

    #[test]
    fn test_tick_advances_and_reschedules() {
        let mut engine = four_cards();
        engine.start();
        run_frames(&mut engine, 4);
        assert_eq!(engine.position(), -3.0);
        assert_eq!(engine.sink().position, Some(-3.0));
        assert!(engine.scheduler().is_pending());
    }

    #[test]
    fn test_stop_halts_frame_loop() {
        let mut engine = four_cards();
        engine.start();
        run_frames(&mut engine, 2);
        engine.stop();
        run_frames(&mut engine, 10);
        assert_eq!(engine.position(), -1.5);
    }

    #[test]
    fn test_wrap_boundary_after_560_ticks() {
        let mut engine = four_cards();
        engine.start();
        run_frames(&mut engine, 559);
        assert_eq!(engine.position(), -419.25);
        run_frames(&mut engine, 1);
        // -420 is on the boundary and folds back to 0
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_wrap_invariant_holds_over_many_ticks() {
        let mut engine = four_cards();
        engine.set_base_speed(3.7);
        engine.start();
        for frame in 0..2000 {
            if frame == 700 {
                engine.set_arrow_speed(5.3);
            }
            if frame == 1400 {
                engine.set_arrow_speed(0.0);
                engine.set_auto_scroll(true);
            }
            run_frames(&mut engine, 1);
            let pos = engine.position();
            assert!(pos <= 0.0 && pos > -420.0, "frame {}: {}", frame, pos);
        }
    }

    #[test]
    fn test_arrow_speed_overrides_auto_scroll() {
        let mut engine = four_cards();
        engine.start();
        engine.jump_to_index(2);
        engine.set_arrow_speed(2.0);
        assert!(!engine.auto_scroll());
        run_frames(&mut engine, 3);
        assert_eq!(engine.position(), -244.0);
    }

    #[test]
    fn test_paused_engine_holds_position() {
        let mut engine = four_cards();
        engine.set_auto_scroll(false);
        engine.start();
        run_frames(&mut engine, 50);
        assert_eq!(engine.position(), 0.0);
        assert!(engine.sink().writes > 1);
    }

    #[test]
    fn test_jump_exactness() {
        let mut engine = four_cards();
        for idx in 0..4 {
            engine.jump_to_index(idx);
            let expected = wrap_position(
                index::index_to_position(idx, engine.offsets()),
                engine.half_track_height(),
            );
            assert_eq!(engine.position(), expected);
            assert_eq!(engine.sink().position, Some(expected));
        }
        // Last card sits exactly one period in and folds to the top
        engine.jump_to_index(3);
        assert_eq!(engine.position(), 0.0);
        engine.jump_to_index(2);
        assert_eq!(engine.position(), -250.0);
    }

    #[test]
    fn test_jump_clamps_stale_index() {
        let mut engine = four_cards();
        engine.jump_to_index(99);
        assert_eq!(engine.position(), engine.pos_y_for_index(3));
    }

    #[test]
    fn test_jump_applies_without_running() {
        let mut engine = four_cards();
        engine.jump_to_index(1);
        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(engine.sink().position, Some(-100.0));
    }

    #[test]
    fn test_pos_y_for_index_does_not_move() {
        let mut engine = four_cards();
        engine.jump_to_index(1);
        assert_eq!(engine.pos_y_for_index(2), -250.0);
        assert_eq!(engine.position(), -100.0);
    }

    #[test]
    fn test_nearest_card_index_fixture() {
        let mut engine = engine_for(CardSequence::from_tops(
            &["a", "b", "c", "d"],
            &[0.0, 50.0, 140.0, 300.0],
            400.0,
        ));
        engine.set_position(-145.0);
        assert_eq!(engine.nearest_card_index(), 2);
    }

    #[test]
    fn test_jump_wins_over_same_frame_tick() {
        let mut engine = four_cards();
        engine.start();
        run_frames(&mut engine, 1);
        engine.jump_to_index(2);
        assert_eq!(engine.sink().position, Some(-250.0));
        assert_eq!(engine.position(), -250.0);
    }

    #[test]
    fn test_empty_track_is_neutral() {
        let mut engine = engine_for(CardSequence::default());
        assert!(engine.offsets().is_empty());
        assert_eq!(engine.original_count(), 0);
        engine.start();
        engine.jump_to_index(5);
        assert_eq!(engine.position(), 0.0);
        assert_eq!(engine.nearest_card_index(), 0);
        assert_eq!(engine.pos_y_for_index(3), 0.0);
        assert_eq!(engine.current_fraction(), 0.0);
        engine.compute_offsets_now();
        assert!(engine.offsets().is_empty());
    }

    #[test]
    fn test_singleton_track() {
        let mut engine = engine_for(CardSequence::new(vec![Card::new("solo", 10.0)]));
        assert_eq!(engine.track().len(), 2);
        assert_eq!(engine.original_count(), 1);
        assert_eq!(engine.offsets(), &[0.0]);
        engine.jump_to_index(3);
        assert_eq!(engine.position(), 0.0);
        assert!(!engine.recompute());
    }

    #[test]
    fn test_recompute_after_insertion() {
        let mut engine = engine_for(CardSequence::new(vec![
            Card::new("a", 10.0),
            Card::new("b", 10.0),
        ]));
        engine.track_mut().truncate_to_original();
        engine.track_mut().push(Card::new("c", 20.0));
        assert!(engine.recompute());
        assert_eq!(engine.original_count(), 3);
        assert_eq!(engine.offsets(), &[0.0, 10.0, 20.0]);
        assert_eq!(engine.half_track_height(), 40.0);
    }

    #[test]
    fn test_shrinking_period_rewraps_position() {
        let mut engine = four_cards();
        engine.jump_to_index(2);
        engine.track_mut().set_height("c", 10.0);
        engine.compute_offsets_now();
        assert_eq!(engine.half_track_height(), 260.0);
        assert!(engine.position() > -260.0 && engine.position() <= 0.0);
    }

    /// Track whose cards can only be measured while `ready` is set
    struct FlakyLayout {
        cards: CardSequence,
        ready: bool,
    }

    impl CardTrack for FlakyLayout {
        fn card_ids(&self) -> Vec<String> {
            self.cards.card_ids()
        }

        fn card_top(&self, index: usize) -> Option<f64> {
            if self.ready {
                self.cards.card_top(index)
            } else {
                None
            }
        }

        fn scroll_height(&self) -> f64 {
            if self.ready {
                self.cards.scroll_height()
            } else {
                0.0
            }
        }

        fn append_clones(&mut self, count: usize) {
            self.cards.append_clones(count);
        }
    }

    #[test]
    fn test_unready_layout_keeps_last_offsets() {
        let track = FlakyLayout {
            cards: CardSequence::from_tops(
                &["a", "b", "c", "d"],
                &[0.0, 100.0, 250.0, 420.0],
                420.0,
            ),
            ready: true,
        };
        let mut engine = EngineBuilder::new()
            .track(track)
            .sink(LastPosition::default())
            .scheduler(ManualScheduler::default())
            .build()
            .expect("engine");
        assert_eq!(engine.half_track_height(), 420.0);

        engine.track_mut().ready = false;
        engine.compute_offsets_now();
        assert_eq!(engine.offsets(), &[0.0, 100.0, 250.0, 420.0]);
        assert_eq!(engine.half_track_height(), 420.0);

        engine.set_position(-419.5);
        engine.start();
        assert_eq!(engine.offsets(), &[0.0, 100.0, 250.0, 420.0]);
        if engine.scheduler_mut().take() {
            engine.tick();
        }
        // Still folded by the last known period
        assert_eq!(engine.position(), -0.25);
    }

    #[test]
    fn test_invalid_speeds_are_ignored() {
        let mut engine = EngineBuilder::new()
            .track(CardSequence::new(vec![Card::new("a", 10.0)]))
            .sink(LastPosition::default())
            .scheduler(ManualScheduler::default())
            .config(EngineConfig {
                base_speed: f64::NAN,
                autoplay: true,
            })
            .build()
            .expect("engine");
        assert_eq!(engine.config().base_speed, 0.75);

        engine.set_base_speed(f64::INFINITY);
        engine.set_base_speed(-1.0);
        assert_eq!(engine.config().base_speed, 0.75);
        engine.set_arrow_speed(f64::NAN);
        assert_eq!(engine.arrow_speed(), 0.0);
        engine.set_position(f64::NAN);
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn test_huge_speed_still_wraps() {
        let mut engine = four_cards();
        engine.set_base_speed(1e17);
        engine.start();
        run_frames(&mut engine, 3);
        let pos = engine.position();
        assert!(pos <= 0.0 && pos > -420.0, "{}", pos);
    }
}
