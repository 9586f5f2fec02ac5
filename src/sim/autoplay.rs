//! Demo autopilot
//!
//! Plays a session through the same pointer calls a player would make.
//! Every `cadence_sec` it circles the active item with the most same-type
//! active neighbours nearby.

use std::f32::consts::TAU;

use glam::Vec2;

use super::geometry::distance;
use super::item::Item;
use super::session::Session;
use super::state::{SelectionOutcome, SessionPhase};

/// Closed circular pointer path (first point not repeated)
pub fn circle_path(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Active item with the most same-type active items within `reach`
fn pick_target(items: &[Item], reach: f32) -> Option<&Item> {
    items
        .iter()
        .filter(|item| item.is_active())
        .map(|item| {
            let neighbours = items
                .iter()
                .filter(|other| {
                    other.id != item.id
                        && other.is_active()
                        && other.type_id == item.type_id
                        && distance(other.center(), item.center()) <= reach
                })
                .count();
            (item, neighbours)
        })
        // Ties go to the oldest item
        .fold(None, |best: Option<(&Item, usize)>, (item, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((item, n)),
        })
        .map(|(item, _)| item)
}

/// Scripted player for demos and soak tests
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Seconds between gestures
    pub cadence_sec: f32,
    /// Neighbour search radius
    pub reach_px: f32,
    /// Radius of the drawn circle
    pub radius_px: f32,
    pub segments: usize,
    cooldown: f32,
    gestures: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            cadence_sec: 0.5,
            reach_px: 160.0,
            radius_px: 20.0,
            segments: 16,
            cooldown: 0.0,
            gestures: 0,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gestures drawn so far
    pub fn gestures(&self) -> u32 {
        self.gestures
    }

    /// Advance by `dt` and act on the session if it is time to.
    ///
    /// Leaves the start overlay on its own; never pauses or restarts.
    pub fn step(&mut self, session: &mut Session, dt: f32) -> Option<SelectionOutcome> {
        match session.phase() {
            SessionPhase::StartOverlay => {
                let tuning = session.tuning();
                let center = Vec2::new(tuning.game_width, tuning.game_height) / 2.0;
                session.pointer_down(center);
                self.cooldown = self.cadence_sec;
                return None;
            }
            SessionPhase::Running => {}
            _ => return None,
        }

        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return None;
        }
        self.cooldown = self.cadence_sec;

        let center = pick_target(session.spawner().items(), self.reach_px)?.center();
        let path = circle_path(center, self.radius_px, self.segments);
        let (first, rest) = path.split_first()?;

        session.pointer_down(*first);
        for point in rest {
            session.pointer_move(*point, true);
        }
        self.gestures += 1;
        let outcome = session.pointer_up();
        log::debug!(
            "Autopilot gesture {} at ({:.0}, {:.0}): {:?}",
            self.gestures,
            center.x,
            center.y,
            outcome
        );
        outcome
    }
}
