//! Data-driven game balance
//!
//! Every gameplay rule reads its numbers from [`Tuning`]. The defaults are the
//! shipped balance; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Smallest accepted `spawn_interval_min_sec`
pub const MIN_SPAWN_INTERVAL_SEC: f32 = 1e-3;

/// Immutable tuning constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub game_width: f32,
    pub game_height: f32,

    // === Health ===
    /// Starting health, also the health ceiling
    pub health_start: f32,
    pub health_drain_per_sec: f32,
    pub heal_per_item: f32,
    pub combo_heal_bonus_per_step: f32,
    pub damage_base: f32,
    pub damage_per_wrong: f32,

    // === Items ===
    pub preview_duration_sec: f32,
    pub item_scale_start: f32,
    pub item_scale_min: f32,
    pub item_scale_shrink_per_sec: f32,
    /// Half the on-screen size of an item at scale 1.0 (sprites are 8 px)
    pub item_half_size_per_scale: f32,
    /// Scale-driven separation between spawned items at scale 1.0
    pub item_separation_per_scale: f32,
    /// Display multiplier applied while an item is in preview
    pub preview_scale_multiplier: f32,

    // === Spawning ===
    pub spawn_interval_start_sec: f32,
    pub spawn_interval_min_sec: f32,
    pub spawn_acceleration_per_sec: f32,
    /// Fraction of the start interval used for the first cooldown of a run
    pub startup_cooldown_factor: f32,
    pub start_types: usize,
    pub max_types: usize,
    pub types_increase_every_sec: f32,
    pub max_items_soft_cap: usize,
    pub spawn_padding_px: f32,
    pub spawn_placement_attempts: u32,
    pub spawn_min_distance_px: f32,

    // === Lasso ===
    pub lasso_point_spacing_px: f32,
    pub lasso_min_points: usize,
    pub lasso_min_path_length_px: f32,
    pub lasso_flash_duration_ms: f32,

    // === Feedback ===
    pub flash_fade_out_ms: f32,
    pub success_flash_color: u32,
    pub error_flash_color: u32,

    // === Scoring & storage ===
    pub score_per_item: u64,
    pub storage_best_score_key: String,
    pub storage_best_time_key: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_width: 960.0,
            game_height: 540.0,

            health_start: 100.0,
            health_drain_per_sec: 6.2,
            heal_per_item: 3.8,
            combo_heal_bonus_per_step: 0.35,
            damage_base: 9.0,
            damage_per_wrong: 4.5,

            preview_duration_sec: 0.75,
            item_scale_start: 9.0,
            item_scale_min: 6.0,
            item_scale_shrink_per_sec: 0.03,
            item_half_size_per_scale: 4.0,
            item_separation_per_scale: 8.0 * 0.85,
            preview_scale_multiplier: 0.9,

            spawn_interval_start_sec: 1.45,
            spawn_interval_min_sec: 0.42,
            spawn_acceleration_per_sec: 0.024,
            startup_cooldown_factor: 0.55,
            start_types: 2,
            max_types: 6,
            types_increase_every_sec: 18.0,
            max_items_soft_cap: 38,
            spawn_padding_px: 52.0,
            spawn_placement_attempts: 24,
            spawn_min_distance_px: 72.0,

            lasso_point_spacing_px: 5.0,
            lasso_min_points: 3,
            lasso_min_path_length_px: 34.0,
            lasso_flash_duration_ms: 100.0,

            flash_fade_out_ms: 160.0,
            success_flash_color: 0x95d67f,
            error_flash_color: 0xff667a,

            score_per_item: 1,
            storage_best_score_key: "lassoPanic.bestScore".to_string(),
            storage_best_time_key: "lassoPanic.bestTimeSec".to_string(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::NotPositive { field, value })
            }
        }

        positive("game_width", self.game_width)?;
        positive("game_height", self.game_height)?;
        positive("health_start", self.health_start)?;
        positive("spawn_interval_min_sec", self.spawn_interval_min_sec)?;
        // Smaller steps vanish against the spawn cooldown in f32
        if self.spawn_interval_min_sec < MIN_SPAWN_INTERVAL_SEC {
            return Err(TuningError::BelowMinimum {
                field: "spawn_interval_min_sec",
                value: self.spawn_interval_min_sec,
                min: MIN_SPAWN_INTERVAL_SEC,
            });
        }
        positive("types_increase_every_sec", self.types_increase_every_sec)?;
        positive("item_scale_min", self.item_scale_min)?;

        if self.spawn_interval_min_sec > self.spawn_interval_start_sec {
            return Err(TuningError::InvertedRange {
                min_field: "spawn_interval_min_sec",
                max_field: "spawn_interval_start_sec",
            });
        }
        if self.item_scale_min > self.item_scale_start {
            return Err(TuningError::InvertedRange {
                min_field: "item_scale_min",
                max_field: "item_scale_start",
            });
        }
        if self.start_types == 0 {
            return Err(TuningError::Zero { field: "start_types" });
        }
        if self.start_types > self.max_types {
            return Err(TuningError::InvertedRange {
                min_field: "start_types",
                max_field: "max_types",
            });
        }
        if self.spawn_placement_attempts == 0 {
            return Err(TuningError::Zero {
                field: "spawn_placement_attempts",
            });
        }
        if self.lasso_min_points == 0 {
            return Err(TuningError::Zero {
                field: "lasso_min_points",
            });
        }
        Ok(())
    }

    /// Item size multiplier at the given run time (shrinks to a floor)
    pub fn item_scale_at(&self, elapsed_sec: f32) -> f32 {
        (self.item_scale_start - elapsed_sec * self.item_scale_shrink_per_sec)
            .max(self.item_scale_min)
            .min(self.item_scale_start)
    }

    /// Difficulty level shown on the HUD (mirrors the type unlock cadence)
    pub fn level_at(&self, elapsed_sec: f32) -> u32 {
        1 + (elapsed_sec / self.types_increase_every_sec).floor() as u32
    }
}
