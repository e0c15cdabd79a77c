//! State model for the "turn down the tap" exercise.
//!
//! The user picks an emotion, rates how strongly they feel it, pictures it as
//! water pouring from a tap, then slowly turns the tap down. Everything here is
//! local view state: nothing is persisted and no transition can fail.

pub mod emotion;
pub mod session;

pub use emotion::Emotion;
pub use session::{ExerciseSession, FlowClass, Step};

/// Highest intensity the slider allows.
pub const MAX_INTENSITY: u8 = 10;

/// Starting intensity for both sliders on a fresh or restarted session.
pub const DEFAULT_INTENSITY: u8 = 8;

/// Degrees of tap rotation per intensity unit.
pub const DEGREES_PER_UNIT: i32 = 18;
