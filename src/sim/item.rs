//! Collectible item entity
//!
//! An item is spawned in `Preview` (visible, not selectable) and flips to
//! `Active` once its preview timer runs out. The transition is one-way.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::TypeId;

/// Item lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    /// Freshly spawned, counting down to activation
    Preview,
    /// Eligible for lasso selection
    Active,
}

/// A spawned item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub type_id: TypeId,
    /// Logical center, fixed at spawn
    anchor: Vec2,
    state: ItemState,
    /// Base size multiplier
    scale: f32,
    /// Seconds left in preview (0 once active)
    preview_remaining: f32,
    /// Cosmetic clock driving frame cycling and pulses
    anim_clock: f32,
}

impl Item {
    pub fn new(id: u32, type_id: TypeId, anchor: Vec2, scale: f32, preview_duration: f32) -> Self {
        Self {
            id,
            type_id,
            anchor,
            state: ItemState::Preview,
            scale,
            preview_remaining: preview_duration,
            anim_clock: 0.0,
        }
    }

    /// Advance one frame. Returns true only on the frame the item activates.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.anim_clock += dt;

        if self.state == ItemState::Preview {
            self.preview_remaining -= dt;
            if self.preview_remaining <= 0.0 {
                self.activate();
                return true;
            }
        }
        false
    }

    /// Force the item active. Returns false if it already was.
    pub fn activate(&mut self) -> bool {
        if self.state == ItemState::Active {
            return false;
        }
        self.state = ItemState::Active;
        self.preview_remaining = 0.0;
        true
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Logical center used for selection and spacing
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.anchor
    }

    #[inline]
    pub fn state(&self) -> ItemState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == ItemState::Active
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn preview_remaining(&self) -> f32 {
        self.preview_remaining
    }

    pub fn anim_clock(&self) -> f32 {
        self.anim_clock
    }
}
