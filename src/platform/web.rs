//! Browser entry object
//!
//! The page owns the canvas, DOM listeners and the animation frame loop and
//! forwards them here. Drawable state comes back as JSON plus a flat vertex
//! buffer.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::{default_audio, default_store, random_seed};
use crate::catalog::TextureCatalog;
use crate::renderer::{
    Effects, FeedbackView, SpriteTransform, Vertex, drawing_overlay, sprite_transforms,
};
use crate::sim::{HudSnapshot, Session, SessionEvent, SessionPhase};
use crate::tuning::Tuning;
use crate::ui::{HealthBar, HudLines, game_over_text};

/// Longest frame the page may report (tab stalls)
const MAX_FRAME_SEC: f32 = 0.1;

#[derive(Serialize)]
struct HudView<'a> {
    snapshot: HudSnapshot,
    health: &'a str,
    score: &'a str,
    time: &'a str,
    level: &'a str,
    combo: &'a str,
    mute: &'a str,
    pause: &'a str,
    health_ratio: f32,
    health_color: u32,
}

#[derive(Serialize)]
struct OverlayView<'a> {
    start_visible: bool,
    game_over: Option<&'a str>,
    screen_flash: Option<(u32, f32)>,
    feedback: Option<FeedbackView<'a>>,
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One game running in a browser page
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    effects: Effects,
    start_visible: bool,
    game_over_text: Option<String>,
}

#[wasm_bindgen]
impl WebGame {
    /// Boot with the shipped balance, or a partial tuning JSON document
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        // Already initialised when the page creates a second game
        let _ = console_log::init_with_level(log::Level::Info);

        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let seed = random_seed();
        let session = Session::new(
            tuning,
            TextureCatalog::builtin(),
            seed,
            default_audio(),
            default_store(),
        )
        .map_err(js_error)?;
        log::info!("Lasso Panic initialized with seed: {}", seed);

        let mut game = Self {
            session,
            effects: Effects::new(),
            start_visible: false,
            game_over_text: None,
        };
        game.pump_events();
        Ok(game)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.pointer_down(Vec2::new(x, y));
        self.pump_events();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, pressed: bool) {
        self.session.pointer_move(Vec2::new(x, y), pressed);
    }

    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
        self.pump_events();
    }

    /// Release outside the canvas
    pub fn pointer_cancel(&mut self) {
        self.session.pointer_cancel();
        self.pump_events();
    }

    /// M mutes, P pauses, R restarts. Returns true if the key was used.
    pub fn key_down(&mut self, key: &str) -> bool {
        let handled = match key {
            "m" | "M" => {
                let muted = self.session.toggle_mute();
                log::info!("Sound {}", if muted { "off" } else { "on" });
                true
            }
            "p" | "P" => self.session.toggle_pause(),
            "r" | "R" => self.session.restart(),
            _ => false,
        };
        self.pump_events();
        handled
    }

    /// Window blur or hidden tab
    pub fn blur(&mut self) {
        if self.session.phase() == SessionPhase::Running {
            self.session.toggle_pause();
            log::info!("Auto-paused (window blur)");
        }
    }

    /// Advance one animation frame
    pub fn frame(&mut self, dt_ms: f32) {
        let dt = (dt_ms / 1000.0).min(MAX_FRAME_SEC);
        self.session.update(dt);
        self.pump_events();
        self.effects.advance(dt_ms);
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    pub fn hud_json(&self) -> String {
        let snapshot = self.session.snapshot();
        let lines = HudLines::from_snapshot(&snapshot);
        let bar = HealthBar::new(snapshot.health, self.session.tuning().health_start);
        let view = HudView {
            snapshot,
            health: &lines.health,
            score: &lines.score,
            time: &lines.time,
            level: &lines.level,
            combo: &lines.combo,
            mute: &lines.mute,
            pause: &lines.pause,
            health_ratio: bar.ratio,
            health_color: bar.color,
        };
        serde_json::to_string(&view).unwrap_or_else(|_| "null".to_string())
    }

    /// Item sprites in draw order
    pub fn sprites_json(&self) -> String {
        let sprites: Vec<SpriteTransform<'_>> = sprite_transforms(
            self.session.spawner().items(),
            self.session.spawner().catalog(),
            self.session.tuning(),
        );
        serde_json::to_string(&sprites).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn overlay_json(&self) -> String {
        let view = OverlayView {
            start_visible: self.start_visible,
            game_over: self.game_over_text.as_deref(),
            screen_flash: self.effects.screen_flash(),
            feedback: self.effects.feedback(),
        };
        serde_json::to_string(&view).unwrap_or_else(|_| "null".to_string())
    }

    /// Lasso and effect triangles as `[x, y, r, g, b, a]` per vertex
    pub fn overlay_vertices(&self) -> Vec<f32> {
        let mut vertices: Vec<Vertex> = drawing_overlay(self.session.lasso());
        vertices.extend(self.effects.overlay_vertices());
        bytemuck::cast_slice::<Vertex, f32>(&vertices).to_vec()
    }
}

impl WebGame {
    fn pump_events(&mut self) {
        let events: Vec<SessionEvent> = self.session.drain_events().collect();
        for event in &events {
            match event {
                SessionEvent::ShowStartOverlay => self.start_visible = true,
                SessionEvent::HideStartOverlay => self.start_visible = false,
                SessionEvent::ShowGameOver(summary) => {
                    self.game_over_text = Some(game_over_text(summary));
                }
                SessionEvent::HideGameOver => self.game_over_text = None,
                _ => {}
            }
            self.effects.apply(event);
        }
    }
}
