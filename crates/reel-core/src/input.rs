//! Arbitration between auto-scroll and user input
//!
//! Every handler overwrites the shared engine state rather than merging with
//! it, so whichever input ran last decides the position and auto-scroll flag.

use crate::engine::{CardTrack, FrameScheduler, PositionEngine, RenderSink};
use crate::index;
use crate::timer::TimerSlot;
use std::time::{Duration, Instant};

/// Direction of a press-and-hold arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward earlier cards
    Back,
    /// Toward later cards
    Forward,
}

/// A user or host intent that wants to move the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Click on the track: pause with timed resume, or resume now
    TogglePause,
    /// Pointer pressed on the track at `pointer` (scroll-axis coordinate)
    DragStart { pointer: f64 },
    /// Pointer moved while pressed
    DragMove { pointer: f64 },
    /// Arrow button or key pressed and held
    HoldStart(Direction),
    /// Held key released: ends the hold only
    HoldEnd,
    /// Pointer/touch released anywhere: ends any hold and any drag
    PointerRelease,
    /// Slider being dragged (0–100)
    SliderInput { percent: f64 },
    /// Slider released (0–100)
    SliderCommit { percent: f64 },
    /// Programmatic jump, e.g. from a link or a search hit
    JumpTo(usize),
    /// Pointer entered the timeline
    HoverEnter,
    /// Pointer left the timeline
    HoverLeave,
}

/// Arbiter tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbiterConfig {
    /// Speed applied while an arrow is held
    pub arrow_speed: f64,
    /// Delay before auto-scroll resumes after an interaction
    pub resume_delay: Duration,
    /// Pause while the pointer hovers the timeline
    pub hover_pause: bool,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            arrow_speed: 4.0,
            resume_delay: Duration::from_millis(3000),
            hover_pause: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer: f64,
    position: f64,
}

/// Resolves concurrent intents into writes on one [`PositionEngine`]
#[derive(Debug, Clone, Default)]
pub struct InputArbiter {
    config: ArbiterConfig,
    resume: TimerSlot,
    hold: Option<Direction>,
    drag: Option<DragAnchor>,
    hovering: bool,
}

impl InputArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn set_hover_pause(&mut self, enabled: bool) {
        self.config.hover_pause = enabled;
    }

    pub fn set_arrow_speed(&mut self, speed: f64) {
        self.config.arrow_speed = speed;
    }

    pub fn holding(&self) -> Option<Direction> {
        self.hold
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Time left before auto-scroll resumes, if a resume is pending
    pub fn resume_in(&self, now: Instant) -> Option<Duration> {
        self.resume.remaining(now)
    }

    /// Apply one intent to the engine
    pub fn handle<T, R, S>(
        &mut self,
        engine: &mut PositionEngine<T, R, S>,
        intent: Intent,
        now: Instant,
    ) where
        T: CardTrack,
        R: RenderSink,
        S: FrameScheduler,
    {
        match intent {
            Intent::TogglePause => {
                if engine.auto_scroll() {
                    engine.set_auto_scroll(false);
                    self.schedule_resume(now);
                } else {
                    engine.set_auto_scroll(true);
                    self.resume.cancel();
                }
            }
            Intent::DragStart { pointer } => {
                engine.set_auto_scroll(false);
                self.resume.cancel();
                self.drag = Some(DragAnchor {
                    pointer,
                    position: engine.position(),
                });
            }
            Intent::DragMove { pointer } => {
                if let Some(anchor) = self.drag {
                    engine.set_auto_scroll(false);
                    engine.set_position(anchor.position + (pointer - anchor.pointer));
                }
            }
            Intent::HoldStart(direction) => {
                let speed = match direction {
                    Direction::Back => self.config.arrow_speed,
                    Direction::Forward => -self.config.arrow_speed,
                };
                self.hold = Some(direction);
                self.resume.cancel();
                engine.set_arrow_speed(speed);
            }
            Intent::HoldEnd => {
                if self.hold.take().is_some() {
                    engine.set_arrow_speed(0.0);
                    self.schedule_resume(now);
                }
            }
            Intent::PointerRelease => {
                let mut released = false;
                if self.hold.take().is_some() {
                    engine.set_arrow_speed(0.0);
                    released = true;
                }
                if self.drag.take().is_some() {
                    let nearest = engine.nearest_card_index();
                    engine.jump_to_index(nearest);
                    released = true;
                }
                if released {
                    self.schedule_resume(now);
                }
            }
            Intent::SliderInput { percent } => {
                engine.set_auto_scroll(false);
                self.resume.cancel();
                let offsets = engine.offsets();
                let fraction = index::percent_to_fraction(percent, offsets.len());
                let position = index::fraction_to_position(fraction, offsets);
                engine.set_position(position);
            }
            Intent::SliderCommit { percent } => {
                engine.set_auto_scroll(false);
                let fraction = index::percent_to_fraction(percent, engine.offsets().len());
                engine.jump_to_index(fraction.round() as usize);
                self.schedule_resume(now);
            }
            Intent::JumpTo(idx) => {
                engine.set_auto_scroll(false);
                engine.jump_to_index(idx);
                self.schedule_resume(now);
            }
            Intent::HoverEnter => {
                self.hovering = true;
                if self.config.hover_pause {
                    engine.set_auto_scroll(false);
                    self.resume.cancel();
                }
            }
            Intent::HoverLeave => {
                self.hovering = false;
                if self.config.hover_pause && self.hold.is_none() && self.drag.is_none() {
                    engine.set_auto_scroll(true);
                    self.resume.cancel();
                }
            }
        }
    }

    /// Fire the resume timer if it is due. Returns true if auto-scroll resumed.
    pub fn poll<T, R, S>(&mut self, engine: &mut PositionEngine<T, R, S>, now: Instant) -> bool
    where
        T: CardTrack,
        R: RenderSink,
        S: FrameScheduler,
    {
        if self.hold.is_some() || self.drag.is_some() {
            return false;
        }
        if self.config.hover_pause && self.hovering {
            return false;
        }
        if self.resume.fire_if_due(now) {
            engine.set_auto_scroll(true);
            log::debug!("auto-scroll resumed");
            return true;
        }
        false
    }

    /// Slider value (0–100) for the live position
    pub fn slider_percent<T, R, S>(&self, engine: &PositionEngine<T, R, S>) -> f64
    where
        T: CardTrack,
        R: RenderSink,
        S: FrameScheduler,
    {
        index::fraction_to_percent(engine.current_fraction(), engine.offsets().len())
    }

    fn schedule_resume(&mut self, now: Instant) {
        self.resume.schedule(now, self.config.resume_delay);
    }
}
