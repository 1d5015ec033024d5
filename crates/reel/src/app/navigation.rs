use super::utils::percent_for_row;
use super::{area_contains, App, PressTarget};
use reel_core::{Direction, Intent};
use std::time::Instant;

impl App {
    // ==================== Card jumps ====================

    /// Snap to deck card `idx` and pause with timed resume
    pub fn jump_to_card(&mut self, idx: usize) {
        let count = self.card_count();
        if count == 0 {
            return;
        }
        let idx = idx.min(count - 1);
        self.dispatch(Intent::JumpTo(idx));
        if let Some(card) = self.deck.cards.get(idx) {
            let label = format!("{} · {}", card.year, card.title);
            self.set_hint(label);
        }
    }

    /// Jump to the card after the nearest one, wrapping at the end
    pub fn next_card(&mut self) {
        let count = self.card_count();
        if count == 0 {
            return;
        }
        let idx = (self.current_card_index() + 1) % count;
        self.jump_to_card(idx);
    }

    /// Jump to the card before the nearest one, wrapping at the start
    pub fn prev_card(&mut self) {
        let count = self.card_count();
        if count == 0 {
            return;
        }
        let idx = (self.current_card_index() + count - 1) % count;
        self.jump_to_card(idx);
    }

    pub fn first_card(&mut self) {
        self.jump_to_card(0);
    }

    pub fn last_card(&mut self) {
        self.jump_to_card(self.card_count().saturating_sub(1));
    }

    // ==================== Press and hold ====================

    /// Arrow key pressed or repeated
    pub fn hold_key(&mut self, direction: Direction) {
        self.hold_key_at(direction, Instant::now());
    }

    pub(crate) fn hold_key_at(&mut self, direction: Direction, now: Instant) {
        let fresh = self.arbiter.holding() != Some(direction);
        if fresh {
            self.dispatch_at(Intent::HoldStart(direction), now);
        }
        if !self.key_release_events {
            // Terminals pause before the first repeat, then repeat quickly
            let delay = if fresh {
                self.hold_delay
            } else {
                self.hold_release
            };
            self.hold_watchdog.schedule(now, delay);
        }
    }

    /// Arrow key released. Ends the hold but not a mouse drag.
    pub fn release_key(&mut self) {
        self.hold_watchdog.cancel();
        self.dispatch(Intent::HoldEnd);
    }

    // ==================== Mouse ====================

    pub fn mouse_down(&mut self, column: u16, row: u16) {
        if area_contains(self.arrow_back_area, column, row) {
            self.press = Some(PressTarget::Arrow);
            self.dispatch(Intent::HoldStart(Direction::Back));
        } else if area_contains(self.arrow_forward_area, column, row) {
            self.press = Some(PressTarget::Arrow);
            self.dispatch(Intent::HoldStart(Direction::Forward));
        } else if let Some(percent) = self.slider_percent_at(column, row, false) {
            self.press = Some(PressTarget::Slider { percent });
            self.dispatch(Intent::SliderInput { percent });
        } else if area_contains(self.track_area, column, row) {
            self.press = Some(PressTarget::Track {
                row,
                dragged: false,
            });
        }
    }

    pub fn mouse_drag(&mut self, column: u16, row: u16) {
        match self.press {
            Some(PressTarget::Track { row: start, dragged }) => {
                if !dragged {
                    self.dispatch(Intent::DragStart {
                        pointer: start as f64,
                    });
                    self.press = Some(PressTarget::Track {
                        row: start,
                        dragged: true,
                    });
                }
                self.dispatch(Intent::DragMove {
                    pointer: row as f64,
                });
            }
            Some(PressTarget::Slider { .. }) => {
                if let Some(percent) = self.slider_percent_at(column, row, true) {
                    self.press = Some(PressTarget::Slider { percent });
                    self.dispatch(Intent::SliderInput { percent });
                }
            }
            Some(PressTarget::Arrow) | None => {}
        }
    }

    /// Pointer released anywhere: always ends holds and drags
    pub fn mouse_up(&mut self) {
        let press = self.press.take();
        if let Some(PressTarget::Slider { percent }) = press {
            self.dispatch(Intent::SliderCommit { percent });
        }
        self.dispatch(Intent::PointerRelease);
        if let Some(PressTarget::Track { dragged: false, .. }) = press {
            self.toggle_pause();
        }
    }

    pub fn mouse_moved(&mut self, column: u16, row: u16) {
        let inside = area_contains(self.track_area, column, row);
        if inside && !self.arbiter.is_hovering() {
            self.dispatch(Intent::HoverEnter);
        } else if !inside && self.arbiter.is_hovering() {
            self.dispatch(Intent::HoverLeave);
        }
    }

    /// Slider percent under the pointer. With `clamp`, rows above or below
    /// the rail map to its ends (the pointer may leave it while dragging).
    fn slider_percent_at(&self, column: u16, row: u16, clamp: bool) -> Option<f64> {
        let (_, y, _, h) = self.slider_area?;
        if !clamp && !area_contains(self.slider_area, column, row) {
            return None;
        }
        let rel = row.saturating_sub(y).min(h.saturating_sub(1));
        Some(percent_for_row(rel, h))
    }
}
