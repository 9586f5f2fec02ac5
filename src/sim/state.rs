//! Session phases, events and snapshots
//!
//! Everything the presentation layer reads from the simulation lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::catalog::TypeId;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title overlay, waiting for the first pointer press
    StartOverlay,
    /// Active gameplay
    Running,
    /// Time frozen, lasso disabled
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Per-frame HUD values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub health: f32,
    pub score: u64,
    pub elapsed_sec: f32,
    pub level: u32,
    pub combo: u32,
    pub muted: bool,
    pub paused: bool,
}

/// Final numbers shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub elapsed_sec: f32,
    pub best_score: u64,
    pub best_time_sec: f32,
}

/// Transient floating message
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    /// CSS colour
    pub color: &'static str,
    pub pos: Vec2,
}

/// How a lasso release was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionOutcome {
    /// Gesture too small to count
    TooShort,
    /// Well-formed gesture with nothing active inside
    NothingActive,
    /// Every enclosed item shared one type
    Matched { count: usize, combo: u32, heal: f32 },
    /// Mixed types enclosed
    Mismatched {
        selected: usize,
        wrong: usize,
        damage: f32,
    },
}

/// Side effects for the presentation layer, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Sound cue (already forwarded to the audio sink)
    Cue(Cue),
    Feedback(Feedback),
    ShowStartOverlay,
    HideStartOverlay,
    ShowGameOver(GameOverSummary),
    HideGameOver,
    /// Full-screen tint that fades out over `fade_ms`
    ScreenFlash { color: u32, fade_ms: f32 },
    /// Confirmed lasso outline that fades out over `duration_ms`
    LassoFlash { points: Vec<Vec2>, duration_ms: f32 },
    /// Preview item appeared
    ItemSpawned { id: u32, type_id: TypeId, pos: Vec2 },
    /// Matched item collected (sparkle burst)
    ItemCollected { id: u32, type_id: TypeId, pos: Vec2 },
}
