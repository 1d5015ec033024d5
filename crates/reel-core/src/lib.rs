//! Core engine for reel - a looping, auto-scrolling card timeline
//!
//! The track holds two back-to-back copies of the cards. The engine moves a
//! single position through one copy and folds it back by the half-track
//! height, so the track appears to scroll forever. Rendering and frame
//! scheduling are host ports; the engine itself never touches a clock or a
//! screen.

pub mod card;
pub mod deck;
pub mod engine;
pub mod index;
pub mod input;
pub mod layout;
pub mod timer;

pub use card::{duplicate, is_duplicated, original_count, Card, CardSequence};
pub use deck::{Deck, DeckCard, DeckError};
pub use engine::{
    CardTrack, EngineBuilder, EngineConfig, EngineError, EngineState, FrameScheduler,
    LastPosition, ManualScheduler, PositionEngine, RenderSink,
};
pub use index::{
    fraction_to_percent, fraction_to_position, index_to_position, nearest_index,
    percent_to_fraction, position_to_fraction,
};
pub use input::{ArbiterConfig, Direction, InputArbiter, Intent};
pub use layout::{wrap_position, OffsetTable};
pub use timer::TimerSlot;
