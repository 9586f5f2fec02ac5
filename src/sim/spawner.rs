//! Item spawner
//!
//! Owns the live item set. Runs the spawn cooldown, unlocks item types as the
//! run goes on, and places new items away from existing ones.

use std::collections::HashSet;
use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{Bounds, distance};
use super::item::Item;
use crate::catalog::{TextureCatalog, TypeId};
use crate::tuning::Tuning;

/// Side effects produced while updating the live set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnerEvent {
    /// A new item appeared in preview
    PreviewSpawned { id: u32, type_id: TypeId, pos: Vec2 },
    /// An item's preview ran out this frame
    Activated { id: u32 },
    /// An item was collected by a matching lasso
    Collected { id: u32, type_id: TypeId, pos: Vec2 },
}

/// Seconds between spawns at the given run time
pub fn spawn_interval_sec(tuning: &Tuning, elapsed_sec: f32) -> f32 {
    (tuning.spawn_interval_start_sec - elapsed_sec * tuning.spawn_acceleration_per_sec)
        .max(tuning.spawn_interval_min_sec)
        .min(tuning.spawn_interval_start_sec)
}

/// Number of catalog types available at the given run time.
///
/// Grows by one every `types_increase_every_sec`, never above
/// `min(max_types, catalog_len)`.
pub fn unlocked_type_count(tuning: &Tuning, elapsed_sec: f32, catalog_len: usize) -> usize {
    let steps = (elapsed_sec.max(0.0) / tuning.types_increase_every_sec).floor() as usize;
    let ceiling = tuning.max_types.min(catalog_len);
    tuning
        .start_types
        .saturating_add(steps)
        .max(tuning.start_types)
        .min(ceiling)
}

/// Uniform point inside a non-degenerate rectangle
fn random_point(rng: &mut Pcg32, area: &Bounds) -> Vec2 {
    Vec2::new(
        rng.random_range(area.min.x..area.max.x),
        rng.random_range(area.min.y..area.max.y),
    )
}

/// Spawns, ticks and removes items
#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: Arc<Tuning>,
    catalog: Arc<TextureCatalog>,
    /// Live items in spawn order
    items: Vec<Item>,
    next_id: u32,
    /// Seconds until the next spawn attempt
    spawn_cooldown: f32,
    rng: Pcg32,
    events: Vec<SpawnerEvent>,
}

impl Spawner {
    /// Create a spawner. `tuning` is expected to have passed [`Tuning::validate`].
    pub fn new(tuning: Arc<Tuning>, catalog: Arc<TextureCatalog>, seed: u64) -> Self {
        debug_assert!(tuning.validate().is_ok(), "spawner given invalid tuning");
        let spawn_cooldown = tuning.spawn_interval_start_sec;
        Self {
            tuning,
            catalog,
            items: Vec::new(),
            next_id: 1,
            spawn_cooldown,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Clear the field and arm a shortened first cooldown
    pub fn reset(&mut self) {
        self.clear();
        self.spawn_cooldown = self.tuning.spawn_interval_start_sec * self.tuning.startup_cooldown_factor;
    }

    /// Restart the placement/type RNG
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Advance every item, then fire as many spawns as the cooldown allows
    pub fn update(&mut self, dt: f32, elapsed_sec: f32, item_scale: f32) {
        for item in &mut self.items {
            if item.tick(dt) {
                self.events.push(SpawnerEvent::Activated { id: item.id });
            }
            item.set_scale(item_scale);
        }

        self.spawn_cooldown -= dt;
        let mut attempts = 0;
        while self.spawn_cooldown <= 0.0 {
            // Past the soft cap every further attempt is skipped, and a huge
            // backlog may not shrink at all in f32
            if attempts > self.tuning.max_items_soft_cap {
                log::debug!("Spawn backlog dropped after {} attempts", attempts);
                self.spawn_cooldown = spawn_interval_sec(&self.tuning, elapsed_sec);
                break;
            }
            self.spawn_one(elapsed_sec, item_scale);
            attempts += 1;
            self.spawn_cooldown += spawn_interval_sec(&self.tuning, elapsed_sec);
        }
    }

    /// All live items in spawn order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Snapshot of the selectable items
    pub fn active_items(&self) -> Vec<Item> {
        self.items.iter().filter(|i| i.is_active()).copied().collect()
    }

    /// Remove the given items (matched by id). Returns how many were removed.
    pub fn remove_items(&mut self, items: &[Item]) -> usize {
        if items.is_empty() {
            return 0;
        }

        let ids: HashSet<u32> = items.iter().map(|i| i.id).collect();
        let before = self.items.len();
        let events = &mut self.events;
        self.items.retain(|item| {
            if ids.contains(&item.id) {
                events.push(SpawnerEvent::Collected {
                    id: item.id,
                    type_id: item.type_id,
                    pos: item.center(),
                });
                false
            } else {
                true
            }
        });
        before - self.items.len()
    }

    /// Drop every item without collection effects
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Force an item out of preview. Returns false if unknown or already active.
    pub fn force_activate(&mut self, id: u32) -> bool {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .is_some_and(|i| i.activate())
    }

    /// Place an item directly, bypassing the cap, type unlocks and placement
    pub fn spawn_at(&mut self, type_id: TypeId, pos: Vec2, item_scale: f32) -> u32 {
        let id = self.next_item_id();
        self.items.push(Item::new(
            id,
            type_id,
            pos,
            item_scale,
            self.tuning.preview_duration_sec,
        ));
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn spawn_cooldown(&self) -> f32 {
        self.spawn_cooldown
    }

    pub fn catalog(&self) -> &TextureCatalog {
        &self.catalog
    }

    /// Take pending side effects in the order they happened
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SpawnerEvent> {
        self.events.drain(..)
    }

    fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Attempt a single spawn. Returns the new item id, or `None` if skipped.
    fn spawn_one(&mut self, elapsed_sec: f32, item_scale: f32) -> Option<u32> {
        if self.items.len() >= self.tuning.max_items_soft_cap {
            log::trace!("Spawn skipped: soft cap {} reached", self.tuning.max_items_soft_cap);
            return None;
        }

        let unlocked = unlocked_type_count(&self.tuning, elapsed_sec, self.catalog.len());
        if unlocked == 0 {
            return None;
        }
        let type_id = TypeId(self.rng.random_range(0..unlocked) as u16);
        if !self.catalog.frames(type_id).is_some_and(|f| !f.is_empty()) {
            log::debug!("Spawn skipped: type {:?} has no frames", type_id);
            return None;
        }

        let Some(pos) = self.find_spawn_position(item_scale) else {
            log::debug!("Spawn skipped: no room for items at scale {item_scale:.2}");
            return None;
        };

        let id = self.next_item_id();
        self.items.push(Item::new(
            id,
            type_id,
            pos,
            item_scale,
            self.tuning.preview_duration_sec,
        ));
        self.events.push(SpawnerEvent::PreviewSpawned { id, type_id, pos });
        log::trace!("Spawned item {id} ({:?}) at ({:.0}, {:.0})", type_id, pos.x, pos.y);
        Some(id)
    }

    /// Rejection-sample a point clear of existing items.
    ///
    /// Falls back to an unchecked point once the attempt budget is spent.
    fn find_spawn_position(&mut self, item_scale: f32) -> Option<Vec2> {
        let tuning = &self.tuning;
        let half_size = item_scale * tuning.item_half_size_per_scale;
        let field = Bounds::new(Vec2::ZERO, Vec2::new(tuning.game_width, tuning.game_height));
        let interior = field.inset(tuning.spawn_padding_px + half_size);
        if interior.is_degenerate() {
            return None;
        }

        let min_distance = tuning
            .spawn_min_distance_px
            .max(item_scale * tuning.item_separation_per_scale);

        for _ in 0..tuning.spawn_placement_attempts {
            let candidate = random_point(&mut self.rng, &interior);
            let clear = self
                .items
                .iter()
                .all(|existing| distance(existing.center(), candidate) >= min_distance);
            if clear {
                return Some(candidate);
            }
        }

        Some(random_point(&mut self.rng, &interior))
    }
}
