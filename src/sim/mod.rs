//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `Session::update`
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod geometry;
pub mod item;
pub mod lasso;
pub mod session;
pub mod spawner;
pub mod state;

pub use autoplay::{Autopilot, circle_path};
pub use geometry::{Bounds, distance, point_in_polygon, polyline_length};
pub use item::{Item, ItemState};
pub use lasso::{LassoOutcome, LassoPhase, LassoSelection, Selection};
pub use session::Session;
pub use spawner::{Spawner, SpawnerEvent, spawn_interval_sec, unlocked_type_count};
pub use state::{
    Feedback, GameOverSummary, HudSnapshot, SelectionOutcome, SessionEvent, SessionPhase,
};
