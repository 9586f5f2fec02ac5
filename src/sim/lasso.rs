//! Freehand lasso capture and selection
//!
//! The player's drag builds a decimated point path. On release the path is
//! closed into a polygon and every active item whose center falls inside is
//! selected. Whether the selection is a match is left to the caller.

use std::collections::BTreeMap;

use glam::Vec2;

use super::geometry::{Bounds, distance, point_in_polygon, polyline_length};
use super::item::Item;
use crate::catalog::TypeId;
use crate::tuning::Tuning;

/// Input state of the lasso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LassoPhase {
    /// Input ignored
    Disabled,
    /// Waiting for a gesture
    Idle,
    /// Gesture in progress
    Drawing,
}

/// Items enclosed by a well-formed gesture
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Enclosed items, in the order they were offered
    pub selected: Vec<Item>,
    /// Distinct type ids present, in first-seen order
    pub unique_type_ids: Vec<TypeId>,
    /// Largest per-type count
    pub majority_count: usize,
}

/// Result of releasing the lasso
#[derive(Debug, Clone, PartialEq)]
pub enum LassoOutcome {
    /// Too few points or too short (taps, jitter), or no gesture in progress
    Invalid,
    /// Well-formed gesture that enclosed nothing
    Empty,
    /// Well-formed gesture with at least one enclosed item
    Evaluated(Selection),
}

/// Freehand lasso state
#[derive(Debug, Clone)]
pub struct LassoSelection {
    points: Vec<Vec2>,
    enabled: bool,
    drawing: bool,
    point_spacing: f32,
    min_points: usize,
    min_path_length: f32,
    /// Last confirmed path, waiting to be shown as a flash
    pending_flash: Option<Vec<Vec2>>,
}

impl LassoSelection {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            points: Vec::new(),
            enabled: true,
            drawing: false,
            point_spacing: tuning.lasso_point_spacing_px,
            min_points: tuning.lasso_min_points,
            min_path_length: tuning.lasso_min_path_length_px,
            pending_flash: None,
        }
    }

    pub fn phase(&self) -> LassoPhase {
        if !self.enabled {
            LassoPhase::Disabled
        } else if self.drawing {
            LassoPhase::Drawing
        } else {
            LassoPhase::Idle
        }
    }

    /// Enable or disable input. Disabling cancels any gesture in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Points captured so far in the current gesture
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Start a new gesture (restarts one already in progress)
    pub fn begin(&mut self, pos: Vec2) {
        if !self.enabled {
            return;
        }
        self.drawing = true;
        self.points.clear();
        self.points.push(pos);
    }

    /// Extend the gesture, dropping points closer than the minimum spacing
    pub fn append_point(&mut self, pos: Vec2) {
        if !self.enabled || !self.drawing {
            return;
        }
        let too_close = self
            .points
            .last()
            .is_some_and(|&last| distance(last, pos) < self.point_spacing);
        if !too_close {
            self.points.push(pos);
        }
    }

    /// Finish the gesture and select the enclosed active items
    pub fn end_and_evaluate(&mut self, active_items: &[Item]) -> LassoOutcome {
        if !self.enabled || !self.drawing {
            self.cancel();
            return LassoOutcome::Invalid;
        }

        self.drawing = false;
        let path = std::mem::take(&mut self.points);

        if path.len() < self.min_points || polyline_length(&path) < self.min_path_length {
            log::debug!("Lasso rejected: {} points", path.len());
            return LassoOutcome::Invalid;
        }

        let selected = enclosed_items(&path, active_items);
        self.pending_flash = Some(path);

        if selected.is_empty() {
            return LassoOutcome::Empty;
        }

        let mut counts: BTreeMap<TypeId, usize> = BTreeMap::new();
        let mut unique_type_ids = Vec::new();
        for item in &selected {
            let count = counts.entry(item.type_id).or_insert(0);
            if *count == 0 {
                unique_type_ids.push(item.type_id);
            }
            *count += 1;
        }
        let majority_count = counts.values().copied().max().unwrap_or(0);

        LassoOutcome::Evaluated(Selection {
            selected,
            unique_type_ids,
            majority_count,
        })
    }

    /// Abort the gesture without evaluating it
    pub fn cancel(&mut self) {
        self.drawing = false;
        self.points.clear();
    }

    /// Take the last confirmed path for the flash overlay
    pub fn take_flash(&mut self) -> Option<Vec<Vec2>> {
        self.pending_flash.take()
    }
}

/// Active items whose centers lie inside the implicitly closed path
fn enclosed_items(path: &[Vec2], items: &[Item]) -> Vec<Item> {
    let Some(bounds) = Bounds::from_points(path) else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| {
            let center = item.center();
            bounds.contains(center) && point_in_polygon(path, center)
        })
        .copied()
        .collect()
}
