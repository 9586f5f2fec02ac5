//! Presentation adapter
//!
//! Pure functions and timers that turn logical state and session events into
//! drawable data. No GPU context lives here; hosts upload the vertices.

pub mod item_view;
pub mod lasso_view;
pub mod vertex;

pub use item_view::{SpriteTransform, sprite_transform, sprite_transforms};
pub use lasso_view::{drawing_overlay, flash_outline};
pub use vertex::Vertex;

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Feedback, SessionEvent};

/// Peak opacity of the full-screen tint
const SCREEN_FLASH_ALPHA: f32 = 0.3;
/// Peak opacity of the confirmed-path layer
const LASSO_FLASH_ALPHA: f32 = 0.95;
const FEEDBACK_MS: f32 = 350.0;
const FEEDBACK_RISE_PX: f32 = 24.0;
const SPARKLE_COUNT: usize = 8;
const SPARKLE_MS: f32 = 260.0;
const SPARKLE_TRAVEL_PX: f32 = 30.0;
const SPARKLE_RADIUS: f32 = 2.0;

/// Linear progress through a fixed duration
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    age_ms: f32,
    duration_ms: f32,
}

impl Fade {
    fn new(duration_ms: f32) -> Self {
        Self {
            age_ms: 0.0,
            duration_ms,
        }
    }

    fn advance(&mut self, dt_ms: f32) {
        self.age_ms += dt_ms.max(0.0);
    }

    /// 0 at start, 1 once finished
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.age_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

fn sine_out(t: f32) -> f32 {
    (t * FRAC_PI_2).sin()
}

fn quad_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Floating feedback message as it should be drawn now
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedbackView<'a> {
    pub text: &'a str,
    pub color: &'static str,
    pub position: Vec2,
    pub alpha: f32,
}

/// Short-lived visual effects driven by session events
#[derive(Debug, Default)]
pub struct Effects {
    screen_flash: Option<(u32, Fade)>,
    lasso_flash: Option<(Vec<Vec2>, Fade)>,
    /// Only the latest message is shown
    feedback: Option<(Feedback, Fade)>,
    sparkles: Vec<(Vec2, Fade)>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ScreenFlash { color, fade_ms } => {
                self.screen_flash = Some((*color, Fade::new(*fade_ms)));
            }
            SessionEvent::LassoFlash {
                points,
                duration_ms,
            } => {
                self.lasso_flash = Some((points.clone(), Fade::new(*duration_ms)));
            }
            SessionEvent::Feedback(feedback) => {
                self.feedback = Some((feedback.clone(), Fade::new(FEEDBACK_MS)));
            }
            SessionEvent::ItemCollected { pos, .. } => {
                self.sparkles.push((*pos, Fade::new(SPARKLE_MS)));
            }
            SessionEvent::ShowStartOverlay => *self = Self::default(),
            _ => {}
        }
    }

    /// Age every effect and drop the finished ones
    pub fn advance(&mut self, dt_ms: f32) {
        if let Some((_, fade)) = &mut self.screen_flash {
            fade.advance(dt_ms);
        }
        if let Some((_, fade)) = &mut self.lasso_flash {
            fade.advance(dt_ms);
        }
        if let Some((_, fade)) = &mut self.feedback {
            fade.advance(dt_ms);
        }
        for (_, fade) in &mut self.sparkles {
            fade.advance(dt_ms);
        }

        if self.screen_flash.is_some_and(|(_, f)| f.is_done()) {
            self.screen_flash = None;
        }
        if self.lasso_flash.as_ref().is_some_and(|(_, f)| f.is_done()) {
            self.lasso_flash = None;
        }
        if self.feedback.as_ref().is_some_and(|(_, f)| f.is_done()) {
            self.feedback = None;
        }
        self.sparkles.retain(|(_, f)| !f.is_done());
    }

    /// Tint colour and opacity, if a flash is showing
    pub fn screen_flash(&self) -> Option<(u32, f32)> {
        self.screen_flash
            .map(|(color, fade)| (color, SCREEN_FLASH_ALPHA * (1.0 - sine_out(fade.progress()))))
    }

    pub fn feedback(&self) -> Option<FeedbackView<'_>> {
        self.feedback.as_ref().map(|(feedback, fade)| {
            let eased = quad_out(fade.progress());
            FeedbackView {
                text: &feedback.text,
                color: feedback.color,
                position: feedback.pos - Vec2::new(0.0, FEEDBACK_RISE_PX * eased),
                alpha: 1.0 - eased,
            }
        })
    }

    /// Opacity of the confirmed-path layer (0 when none is showing)
    pub fn lasso_flash_alpha(&self) -> f32 {
        self.lasso_flash
            .as_ref()
            .map_or(0.0, |(_, fade)| LASSO_FLASH_ALPHA * (1.0 - fade.progress()))
    }

    /// Lasso flash outline plus collection sparkles
    pub fn overlay_vertices(&self) -> Vec<Vertex> {
        let mut vertices = match &self.lasso_flash {
            Some((points, _)) => flash_outline(points, self.lasso_flash_alpha()),
            None => Vec::new(),
        };

        for (origin, fade) in &self.sparkles {
            let eased = sine_out(fade.progress());
            let color = vertex::rgba(vertex::colors::SPARKLE, LASSO_FLASH_ALPHA * (1.0 - eased));
            for i in 0..SPARKLE_COUNT {
                let angle = i as f32 / SPARKLE_COUNT as f32 * TAU;
                let offset = Vec2::new(angle.cos(), angle.sin()) * SPARKLE_TRAVEL_PX * eased;
                vertices.extend(lasso_view::circle(*origin + offset, SPARKLE_RADIUS, color, 6));
            }
        }

        vertices
    }

    /// Nothing left to draw
    pub fn is_idle(&self) -> bool {
        self.screen_flash.is_none()
            && self.lasso_flash.is_none()
            && self.feedback.is_none()
            && self.sparkles.is_empty()
    }
}
