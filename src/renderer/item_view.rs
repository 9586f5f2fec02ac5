//! Item sprite presentation
//!
//! Derived from logical item state each frame; nothing here feeds back into
//! the simulation.

use std::f32::consts::PI;

use glam::Vec2;
use serde::Serialize;

use crate::catalog::TextureCatalog;
use crate::sim::Item;
use crate::tuning::Tuning;

const PREVIEW_ALPHA_MIN: f32 = 0.26;
const PREVIEW_ALPHA_MAX: f32 = 0.48;
/// One leg of the preview pulse (it yoyos)
const PREVIEW_PULSE_SEC: f32 = 0.42;

/// Where and how to draw one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteTransform<'a> {
    pub item_id: u32,
    pub frame_key: &'a str,
    pub position: Vec2,
    pub alpha: f32,
    pub scale: f32,
}

/// Seconds per animation frame, staggered by id
pub fn frame_step_sec(id: u32) -> f32 {
    0.24 + (id % 5) as f32 * 0.03
}

/// Animation frame shown after `clock_sec` of the item's life
pub fn frame_index(id: u32, clock_sec: f32, frame_count: usize) -> usize {
    if frame_count < 2 {
        return 0;
    }
    let steps = (clock_sec.max(0.0) / frame_step_sec(id)).floor() as usize;
    steps % frame_count
}

/// Preview alpha: sine in-out yoyo between the pulse bounds
pub fn preview_alpha(clock_sec: f32) -> f32 {
    let leg = (clock_sec.max(0.0) / PREVIEW_PULSE_SEC) % 2.0;
    let t = if leg > 1.0 { 2.0 - leg } else { leg };
    let eased = 0.5 - 0.5 * (PI * t).cos();
    PREVIEW_ALPHA_MIN + (PREVIEW_ALPHA_MAX - PREVIEW_ALPHA_MIN) * eased
}

/// Sprite for one item, or `None` if its type has no frames
pub fn sprite_transform<'a>(
    item: &Item,
    catalog: &'a TextureCatalog,
    tuning: &Tuning,
) -> Option<SpriteTransform<'a>> {
    let frames = catalog.frames(item.type_id)?;
    let frame_key = frames
        .get(frame_index(item.id, item.anim_clock(), frames.len()))?
        .as_str();

    let (alpha, scale) = if item.is_active() {
        (1.0, item.scale())
    } else {
        (
            preview_alpha(item.anim_clock()),
            item.scale() * tuning.preview_scale_multiplier,
        )
    };

    Some(SpriteTransform {
        item_id: item.id,
        frame_key,
        position: item.center(),
        alpha,
        scale,
    })
}

/// Sprites for every drawable item, in spawn order
pub fn sprite_transforms<'a>(
    items: &[Item],
    catalog: &'a TextureCatalog,
    tuning: &Tuning,
) -> Vec<SpriteTransform<'a>> {
    items
        .iter()
        .filter_map(|item| sprite_transform(item, catalog, tuning))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeId;

    #[test]
    fn test_frame_step_staggered_by_id() {
        assert!((frame_step_sec(0) - 0.24).abs() < 1e-6);
        assert!((frame_step_sec(3) - 0.33).abs() < 1e-6);
        assert!((frame_step_sec(5) - 0.24).abs() < 1e-6);
    }

    #[test]
    fn test_frame_index_cycles() {
        // id 0 steps every 0.24 s
        assert_eq!(frame_index(0, 0.1, 2), 0);
        assert_eq!(frame_index(0, 0.3, 2), 1);
        assert_eq!(frame_index(0, 0.5, 2), 0);
        assert_eq!(frame_index(0, 10.0, 1), 0);
    }

    #[test]
    fn test_preview_alpha_pulses_within_bounds() {
        assert!((preview_alpha(0.0) - PREVIEW_ALPHA_MIN).abs() < 1e-5);
        assert!((preview_alpha(0.42) - PREVIEW_ALPHA_MAX).abs() < 1e-5);
        assert!((preview_alpha(0.84) - PREVIEW_ALPHA_MIN).abs() < 1e-4);
        for i in 0..100 {
            let a = preview_alpha(i as f32 * 0.037);
            assert!((PREVIEW_ALPHA_MIN - 1e-5..=PREVIEW_ALPHA_MAX + 1e-5).contains(&a));
        }
    }

    #[test]
    fn test_preview_and_active_sprites() {
        let catalog = TextureCatalog::builtin();
        let tuning = Tuning::default();
        let mut item = Item::new(7, TypeId(2), Vec2::new(100.0, 120.0), 8.0, 0.75);

        let preview = sprite_transform(&item, &catalog, &tuning).expect("sprite");
        assert_eq!(preview.frame_key, "item-bell-0");
        assert!((preview.scale - 7.2).abs() < 1e-5);
        assert!(preview.alpha < 0.5);

        item.activate();
        let active = sprite_transform(&item, &catalog, &tuning).expect("sprite");
        assert_eq!(active.alpha, 1.0);
        assert_eq!(active.scale, 8.0);
        assert_eq!(active.position, Vec2::new(100.0, 120.0));
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let catalog = TextureCatalog::builtin();
        let items = [
            Item::new(1, TypeId(0), Vec2::ZERO, 9.0, 0.75),
            Item::new(2, TypeId(99), Vec2::ZERO, 9.0, 0.75),
        ];
        let sprites = sprite_transforms(&items, &catalog, &Tuning::default());
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].item_id, 1);
    }
}
