//! HUD text and overlays
//!
//! Turns snapshots and session events into the strings and colours a HUD
//! shows. Drawing them is up to the host.

use crate::sim::{GameOverSummary, HudSnapshot, SessionEvent};

pub const START_TITLE: &str = "LASSO PANIC";
pub const START_PROMPT: &str = "Click to Start\nLMB draw, M mute, P pause";
pub const GAME_OVER_TITLE: &str = "GAME OVER";
pub const GAME_OVER_HINT: &str = "Press R or click to restart";

/// Health bar fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    /// Fill fraction in [0, 1]
    pub ratio: f32,
    pub color: u32,
}

impl HealthBar {
    pub fn new(health: f32, health_max: f32) -> Self {
        let health = health.clamp(0.0, health_max);
        let color = if health > 50.0 {
            0x95d67f
        } else if health > 25.0 {
            0xffc95f
        } else {
            0xff6f6f
        };
        Self {
            ratio: health / health_max,
            color,
        }
    }
}

/// Formatted HUD readouts
#[derive(Debug, Clone, PartialEq)]
pub struct HudLines {
    pub health: String,
    pub score: String,
    pub time: String,
    pub level: String,
    pub combo: String,
    pub mute: String,
    pub pause: String,
}

impl HudLines {
    pub fn from_snapshot(snapshot: &HudSnapshot) -> Self {
        Self {
            health: format!("HP {:.1}", snapshot.health.max(0.0)),
            score: format!("Score {}", snapshot.score),
            time: format!("Time {:.1}s", snapshot.elapsed_sec),
            level: format!("Level {}", snapshot.level),
            combo: format!("Combo x{}", snapshot.combo),
            mute: if snapshot.muted { "M: sound off" } else { "M: sound on" }.to_string(),
            pause: if snapshot.paused { "P: paused" } else { "P: running" }.to_string(),
        }
    }
}

/// Body text of the game-over overlay
pub fn game_over_text(summary: &GameOverSummary) -> String {
    format!(
        "Score: {}\nTime: {:.1}s\nBest score: {}\nBest time: {:.1}s",
        summary.score, summary.elapsed_sec, summary.best_score, summary.best_time_sec
    )
}

/// Consumer of HUD state
pub trait HudSink {
    /// Called once per frame with the latest values
    fn update(&mut self, snapshot: &HudSnapshot);

    /// Called for every drained session event
    fn on_event(&mut self, event: &SessionEvent);
}

/// HUD that writes to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogHud {
    last: Option<HudLines>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently formatted readouts
    pub fn lines(&self) -> Option<&HudLines> {
        self.last.as_ref()
    }
}

impl HudSink for LogHud {
    fn update(&mut self, snapshot: &HudSnapshot) {
        let lines = HudLines::from_snapshot(snapshot);
        // Score and combo changes only; the timer ticks every frame
        let changed = self
            .last
            .as_ref()
            .is_none_or(|last| last.score != lines.score || last.combo != lines.combo);
        if changed {
            log::debug!(
                "{} | {} | {} | {}",
                lines.health,
                lines.score,
                lines.level,
                lines.combo
            );
        }
        self.last = Some(lines);
    }

    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ShowStartOverlay => {
                log::info!("{START_TITLE}: {}", START_PROMPT.replace('\n', " / "));
            }
            SessionEvent::ShowGameOver(summary) => {
                log::info!("{GAME_OVER_TITLE}: {}", game_over_text(summary).replace('\n', ", "));
            }
            SessionEvent::Feedback(feedback) => log::debug!("Feedback: {}", feedback.text),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> HudSnapshot {
        HudSnapshot {
            health: 87.46,
            score: 3,
            elapsed_sec: 12.34,
            level: 1,
            combo: 2,
            muted: false,
            paused: true,
        }
    }

    #[test]
    fn test_hud_lines_format() {
        let lines = HudLines::from_snapshot(&snapshot());
        assert_eq!(lines.health, "HP 87.5");
        assert_eq!(lines.score, "Score 3");
        assert_eq!(lines.time, "Time 12.3s");
        assert_eq!(lines.level, "Level 1");
        assert_eq!(lines.combo, "Combo x2");
        assert_eq!(lines.mute, "M: sound on");
        assert_eq!(lines.pause, "P: paused");
    }

    #[test]
    fn test_health_bar_colours() {
        assert_eq!(HealthBar::new(80.0, 100.0).color, 0x95d67f);
        assert_eq!(HealthBar::new(50.0, 100.0).color, 0xffc95f);
        assert_eq!(HealthBar::new(10.0, 100.0).color, 0xff6f6f);
        assert_eq!(HealthBar::new(150.0, 100.0).ratio, 1.0);
        assert_eq!(HealthBar::new(-5.0, 100.0).ratio, 0.0);
    }

    #[test]
    fn test_game_over_text() {
        let summary = GameOverSummary {
            score: 14,
            elapsed_sec: 41.26,
            best_score: 20,
            best_time_sec: 60.0,
        };
        assert_eq!(
            game_over_text(&summary),
            "Score: 14\nTime: 41.3s\nBest score: 20\nBest time: 60.0s"
        );
    }

    #[test]
    fn test_log_hud_keeps_latest_lines() {
        let mut hud = LogHud::new();
        assert!(hud.lines().is_none());
        hud.update(&snapshot());
        hud.on_event(&SessionEvent::HideStartOverlay);
        assert_eq!(hud.lines().map(|l| l.combo.as_str()), Some("Combo x2"));
    }
}
