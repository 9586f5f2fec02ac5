//! Lasso Panic - A frantic lasso-the-matching-items arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawner, items, lasso, session)
//! - `renderer`: Sprite transforms and overlay geometry
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Best-effort numeric storage
//! - `records`: Best score and best time
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound cue sinks
//! - `ui`: HUD text and overlays

pub mod audio;
pub mod catalog;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use audio::{AudioSink, Cue};
pub use catalog::{TextureCatalog, TypeId};
pub use error::{CatalogError, SetupError, TuningError};
pub use persistence::NumberStore;
pub use records::BestRecords;
pub use sim::{Session, SessionEvent, SessionPhase};
pub use tuning::Tuning;
