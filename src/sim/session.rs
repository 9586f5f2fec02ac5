//! Session controller
//!
//! Top-level state machine: StartOverlay → Running ⇄ Paused → GameOver.
//! Drives run time, health drain and difficulty, resolves lasso releases into
//! score/health/combo, and finalizes best records when a run ends.

use std::sync::Arc;

use glam::Vec2;

use super::item::Item;
use super::lasso::{LassoOutcome, LassoSelection};
use super::spawner::{Spawner, SpawnerEvent};
use super::state::{
    Feedback, GameOverSummary, HudSnapshot, SelectionOutcome, SessionEvent, SessionPhase,
};
use crate::audio::{AudioSink, Cue};
use crate::catalog::TextureCatalog;
use crate::error::{CatalogError, SetupError};
use crate::persistence::NumberStore;
use crate::records::BestRecords;
use crate::tuning::Tuning;

const TOO_SHORT_COLOR: &str = "#f4e8af";
const EMPTY_COLOR: &str = "#d1dcff";
const SUCCESS_COLOR: &str = "#c5ffbd";
const DAMAGE_COLOR: &str = "#ffb0be";

/// Golden-ratio increment so each run gets a distinct RNG stream
const RUN_SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// One player's game session
pub struct Session {
    tuning: Arc<Tuning>,
    spawner: Spawner,
    lasso: LassoSelection,
    phase: SessionPhase,
    health: f32,
    score: u64,
    elapsed_sec: f32,
    level: u32,
    combo: u32,
    records: BestRecords,
    summary: Option<GameOverSummary>,
    /// Base seed; run `n` uses `seed + n * RUN_SEED_STEP`
    seed: u64,
    runs: u64,
    audio: Box<dyn AudioSink>,
    store: Box<dyn NumberStore>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Boot a session on the start overlay
    pub fn new(
        tuning: Tuning,
        catalog: TextureCatalog,
        seed: u64,
        audio: Box<dyn AudioSink>,
        store: Box<dyn NumberStore>,
    ) -> Result<Self, SetupError> {
        tuning.validate()?;
        // Deserialized catalogs skip the constructor checks
        if catalog.is_empty() {
            return Err(CatalogError::Empty.into());
        }

        let tuning = Arc::new(tuning);
        let mut session = Self {
            spawner: Spawner::new(tuning.clone(), Arc::new(catalog), seed),
            lasso: LassoSelection::new(&tuning),
            tuning,
            phase: SessionPhase::StartOverlay,
            health: 0.0,
            score: 0,
            elapsed_sec: 0.0,
            level: 1,
            combo: 0,
            records: BestRecords::default(),
            summary: None,
            seed,
            runs: 0,
            audio,
            store,
            events: Vec::new(),
        };
        session.reinitialize();
        Ok(session)
    }

    /// Reset every run scalar and the field, back to the start overlay
    fn reinitialize(&mut self) {
        self.phase = SessionPhase::StartOverlay;
        self.health = self.tuning.health_start;
        self.score = 0;
        self.elapsed_sec = 0.0;
        self.level = 1;
        self.combo = 0;
        self.summary = None;
        self.records = BestRecords::load(self.store.as_ref(), &self.tuning);

        let run_seed = self.seed.wrapping_add(self.runs.wrapping_mul(RUN_SEED_STEP));
        self.spawner.reseed(run_seed);
        self.spawner.reset();
        self.spawner.drain_events().for_each(drop);
        self.lasso.set_enabled(false);

        self.events.push(SessionEvent::ShowStartOverlay);
    }

    /// Leave the start overlay and begin the run
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::StartOverlay {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.lasso.set_enabled(true);
        self.events.push(SessionEvent::HideStartOverlay);
        self.events.push(SessionEvent::HideGameOver);
        log::info!("Run {} started", self.runs + 1);
        true
    }

    /// Advance one frame. Only a running session changes.
    pub fn update(&mut self, dt: f32) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.elapsed_sec += dt;
        self.level = self.tuning.level_at(self.elapsed_sec);
        self.health = (self.health - self.tuning.health_drain_per_sec * dt)
            .clamp(0.0, self.tuning.health_start);

        let item_scale = self.tuning.item_scale_at(self.elapsed_sec);
        self.spawner.update(dt, self.elapsed_sec, item_scale);
        self.forward_spawner_events();

        if self.health <= 0.0 {
            self.finish_run();
        }
    }

    /// Pointer pressed: starts the run, restarts after game over, or begins a lasso
    pub fn pointer_down(&mut self, pos: Vec2) {
        self.audio.unlock();
        match self.phase {
            SessionPhase::StartOverlay => {
                self.start();
            }
            SessionPhase::GameOver => {
                self.restart();
            }
            SessionPhase::Running => self.lasso.begin(pos),
            SessionPhase::Paused => {}
        }
    }

    /// Pointer moved; extends the lasso while the button is held
    pub fn pointer_move(&mut self, pos: Vec2, pressed: bool) {
        if self.phase == SessionPhase::Running && pressed {
            self.lasso.append_point(pos);
        }
    }

    /// Pointer released: evaluate the lasso against the active items
    pub fn pointer_up(&mut self) -> Option<SelectionOutcome> {
        if self.phase != SessionPhase::Running {
            self.lasso.cancel();
            return None;
        }
        if !self.lasso.is_drawing() {
            return None;
        }

        let active = self.spawner.active_items();
        let outcome = self.lasso.end_and_evaluate(&active);
        if let Some(points) = self.lasso.take_flash() {
            self.events.push(SessionEvent::LassoFlash {
                points,
                duration_ms: self.tuning.lasso_flash_duration_ms,
            });
        }

        let outcome = match outcome {
            LassoOutcome::Invalid => {
                self.feedback("Too short".to_string(), self.banner_pos(0.26), TOO_SHORT_COLOR);
                SelectionOutcome::TooShort
            }
            LassoOutcome::Empty => {
                self.feedback(
                    "No active items".to_string(),
                    self.banner_pos(0.26),
                    EMPTY_COLOR,
                );
                SelectionOutcome::NothingActive
            }
            LassoOutcome::Evaluated(selection) if selection.unique_type_ids.len() == 1 => {
                self.apply_match(&selection.selected)
            }
            LassoOutcome::Evaluated(selection) => {
                self.apply_mismatch(selection.selected.len(), selection.majority_count)
            }
        };
        Some(outcome)
    }

    /// Pointer left the play area or was interrupted
    pub fn pointer_cancel(&mut self) {
        self.lasso.cancel();
    }

    /// Toggle Running ⇄ Paused. Returns false in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            SessionPhase::Running => {
                self.phase = SessionPhase::Paused;
                self.lasso.set_enabled(false);
                log::info!("Paused at {:.1}s", self.elapsed_sec);
                true
            }
            SessionPhase::Paused => {
                self.phase = SessionPhase::Running;
                self.lasso.set_enabled(true);
                log::info!("Resumed");
                true
            }
            _ => false,
        }
    }

    /// Flip audio mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.audio.toggle_mute()
    }

    /// Start over after a game over (back to the start overlay)
    pub fn restart(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.runs += 1;
        self.events.push(SessionEvent::HideGameOver);
        self.reinitialize();
        log::info!("Session restarted");
        true
    }

    fn apply_match(&mut self, selected: &[Item]) -> SelectionOutcome {
        let count = selected.len();
        let pos = selected
            .first()
            .map(Item::center)
            .unwrap_or_else(|| self.banner_pos(0.5));

        self.spawner.remove_items(selected);
        self.forward_spawner_events();

        let tuning = &self.tuning;
        self.score += count as u64 * tuning.score_per_item;
        self.combo += 1;
        let heal = count as f32 * tuning.heal_per_item
            + self.combo as f32 * tuning.combo_heal_bonus_per_step;
        self.health = (self.health + heal).clamp(0.0, tuning.health_start);

        let (color, fade_ms) = (tuning.success_flash_color, tuning.flash_fade_out_ms);
        self.play(Cue::Success {
            count,
            combo: self.combo,
        });
        self.events.push(SessionEvent::ScreenFlash { color, fade_ms });
        self.feedback(format!("+{count}"), pos, SUCCESS_COLOR);

        SelectionOutcome::Matched {
            count,
            combo: self.combo,
            heal,
        }
    }

    fn apply_mismatch(&mut self, selected: usize, majority_count: usize) -> SelectionOutcome {
        let tuning = &self.tuning;
        let wrong = selected.saturating_sub(majority_count).max(1);
        let damage = tuning.damage_base + tuning.damage_per_wrong * wrong as f32;
        self.health = (self.health - damage).clamp(0.0, tuning.health_start);
        self.combo = 0;

        let (color, fade_ms) = (tuning.error_flash_color, tuning.flash_fade_out_ms);
        self.play(Cue::Error);
        self.events.push(SessionEvent::ScreenFlash { color, fade_ms });
        self.feedback(
            format!("-{:.0}", damage.round()),
            self.banner_pos(0.3),
            DAMAGE_COLOR,
        );

        if self.health <= 0.0 {
            self.finish_run();
        }

        SelectionOutcome::Mismatched {
            selected,
            wrong,
            damage,
        }
    }

    /// Running → GameOver: lock input, persist records, publish the summary
    fn finish_run(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.lasso.set_enabled(false);
        self.play(Cue::GameOver);

        self.records.submit(
            self.score,
            self.elapsed_sec,
            self.store.as_mut(),
            &self.tuning,
        );
        let summary = GameOverSummary {
            score: self.score,
            elapsed_sec: self.elapsed_sec,
            best_score: self.records.best_score,
            best_time_sec: self.records.best_time_sec,
        };
        self.summary = Some(summary);
        self.events.push(SessionEvent::ShowGameOver(summary));
        log::info!(
            "Game over: score {} in {:.1}s (best {} / {:.1}s)",
            summary.score,
            summary.elapsed_sec,
            summary.best_score,
            summary.best_time_sec
        );
    }

    fn forward_spawner_events(&mut self) {
        let pending: Vec<SpawnerEvent> = self.spawner.drain_events().collect();
        for event in pending {
            match event {
                SpawnerEvent::PreviewSpawned { id, type_id, pos } => {
                    self.play(Cue::SpawnPreview);
                    self.events
                        .push(SessionEvent::ItemSpawned { id, type_id, pos });
                }
                SpawnerEvent::Activated { .. } => self.play(Cue::Activate),
                SpawnerEvent::Collected { id, type_id, pos } => {
                    self.events
                        .push(SessionEvent::ItemCollected { id, type_id, pos });
                }
            }
        }
    }

    fn play(&mut self, cue: Cue) {
        self.audio.play(cue);
        self.events.push(SessionEvent::Cue(cue));
    }

    fn feedback(&mut self, text: String, pos: Vec2, color: &'static str) {
        self.events
            .push(SessionEvent::Feedback(Feedback { text, color, pos }));
    }

    /// Horizontally centered point at a fraction of the field height
    fn banner_pos(&self, height_fraction: f32) -> Vec2 {
        Vec2::new(
            self.tuning.game_width / 2.0,
            self.tuning.game_height * height_fraction,
        )
    }

    // === Read access ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn elapsed_sec(&self) -> f32 {
        self.elapsed_sec
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn records(&self) -> BestRecords {
        self.records
    }

    /// Final numbers of the last finished run (`None` until game over)
    pub fn game_over_summary(&self) -> Option<GameOverSummary> {
        self.summary
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Direct access for scripted setups and tests
    pub fn spawner_mut(&mut self) -> &mut Spawner {
        &mut self.spawner
    }

    pub fn lasso(&self) -> &LassoSelection {
        &self.lasso
    }

    pub fn store(&self) -> &dyn NumberStore {
        self.store.as_ref()
    }

    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            health: self.health,
            score: self.score,
            elapsed_sec: self.elapsed_sec,
            level: self.level,
            combo: self.combo,
            muted: self.audio.is_muted(),
            paused: self.phase == SessionPhase::Paused,
        }
    }

    /// Take pending presentation events in emission order
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::catalog::TypeId;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    const A: u16 = 0;
    const B: u16 = 1;

    fn session_with_store(store: MemoryStore) -> (Session, RecordingAudio) {
        let audio = RecordingAudio::new();
        let session = Session::new(
            Tuning::default(),
            TextureCatalog::builtin(),
            42,
            Box::new(audio.clone()),
            Box::new(store),
        )
        .expect("valid setup");
        (session, audio)
    }

    fn running_session() -> (Session, RecordingAudio) {
        let (mut session, audio) = session_with_store(MemoryStore::new());
        session.pointer_down(Vec2::new(480.0, 270.0));
        assert_eq!(session.phase(), SessionPhase::Running);
        (session, audio)
    }

    /// Place an already-active item in the top-left corner, outside the spawn area
    fn place_active(session: &mut Session, type_id: u16, x: f32, y: f32) -> u32 {
        let spawner = session.spawner_mut();
        let id = spawner.spawn_at(TypeId(type_id), Vec2::new(x, y), 9.0);
        spawner.force_activate(id);
        id
    }

    /// Drag a rectangular lasso around the top-left corner
    fn lasso_corner(session: &mut Session) -> Option<SelectionOutcome> {
        session.pointer_down(Vec2::new(4.0, 4.0));
        session.pointer_move(Vec2::new(84.0, 4.0), true);
        session.pointer_move(Vec2::new(84.0, 84.0), true);
        session.pointer_move(Vec2::new(4.0, 84.0), true);
        session.pointer_up()
    }

    fn feedback_texts(session: &mut Session) -> Vec<String> {
        session
            .drain_events()
            .filter_map(|e| match e {
                SessionEvent::Feedback(f) => Some(f.text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_boots_on_start_overlay() {
        let (mut session, audio) = session_with_store(MemoryStore::new());
        assert_eq!(session.phase(), SessionPhase::StartOverlay);
        assert_eq!(session.health(), 100.0);
        assert!(!session.lasso().is_enabled());
        assert!(session
            .drain_events()
            .any(|e| e == SessionEvent::ShowStartOverlay));

        session.update(1.0);
        assert_eq!(session.elapsed_sec(), 0.0);

        session.pointer_down(Vec2::ZERO);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.lasso().is_enabled());
        // Starting press does not begin a gesture
        assert!(!session.lasso().is_drawing());
        assert_eq!(audio.unlock_count(), 1);
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            spawn_interval_min_sec: 0.0,
            ..Default::default()
        };
        let result = Session::new(
            tuning,
            TextureCatalog::builtin(),
            1,
            Box::new(RecordingAudio::new()),
            Box::new(MemoryStore::new()),
        );
        assert!(matches!(result, Err(SetupError::Tuning(_))));
    }

    #[test]
    fn test_running_frame_drains_health_and_tracks_level() {
        let (mut session, _) = running_session();
        session.update(1.0);
        assert!((session.health() - 93.8).abs() < 1e-4);
        assert_eq!(session.elapsed_sec(), 1.0);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_level_rises_with_time() {
        let tuning = Tuning {
            health_drain_per_sec: 0.0,
            ..Default::default()
        };
        let mut session = Session::new(
            tuning,
            TextureCatalog::builtin(),
            3,
            Box::new(RecordingAudio::new()),
            Box::new(MemoryStore::new()),
        )
        .expect("valid setup");
        session.start();
        session.update(17.5);
        assert_eq!(session.level(), 1);
        session.update(0.5);
        assert_eq!(session.level(), 2);
        session.update(18.0);
        assert_eq!(session.level(), 3);
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let (mut session, _) = running_session();
        session.update(f32::NAN);
        session.update(-1.0);
        session.update(f32::INFINITY);
        assert_eq!(session.elapsed_sec(), 0.0);
        assert_eq!(session.health(), 100.0);
    }

    #[test]
    fn test_huge_frame_completes() {
        let tuning = Tuning {
            health_drain_per_sec: 0.0,
            ..Default::default()
        };
        let mut session = Session::new(
            tuning,
            TextureCatalog::builtin(),
            9,
            Box::new(RecordingAudio::new()),
            Box::new(MemoryStore::new()),
        )
        .expect("valid setup");
        session.start();
        session.update(1.0e7);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.elapsed_sec(), 1.0e7);
        assert_eq!(session.spawner().len(), session.tuning().max_items_soft_cap);
    }

    #[test]
    fn test_pause_freezes_time() {
        let (mut session, _) = running_session();
        session.update(0.5);
        assert!(session.toggle_pause());
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert!(session.snapshot().paused);
        session.update(3.0);
        assert_eq!(session.elapsed_sec(), 0.5);
        assert!(session.toggle_pause());
        session.update(0.25);
        assert_eq!(session.elapsed_sec(), 0.75);
    }

    #[test]
    fn test_pause_only_from_running() {
        let (mut session, _) = session_with_store(MemoryStore::new());
        assert!(!session.toggle_pause());
        assert_eq!(session.phase(), SessionPhase::StartOverlay);
    }

    #[test]
    fn test_pointer_cancel_drops_gesture_quietly() {
        let (mut session, _) = running_session();
        session.drain_events().for_each(drop);
        session.pointer_down(Vec2::new(10.0, 10.0));
        session.pointer_move(Vec2::new(60.0, 10.0), true);
        session.pointer_cancel();
        assert!(!session.lasso().is_drawing());
        assert_eq!(session.drain_events().count(), 0);
        assert_eq!(session.pointer_up(), None);
    }

    #[test]
    fn test_pause_cancels_gesture() {
        let (mut session, _) = running_session();
        place_active(&mut session, A, 20.0, 20.0);
        session.pointer_down(Vec2::new(4.0, 4.0));
        session.pointer_move(Vec2::new(84.0, 4.0), true);
        session.toggle_pause();
        assert!(!session.lasso().is_drawing());
        assert_eq!(session.pointer_up(), None);
        session.toggle_pause();
        // No gesture survives the pause
        assert_eq!(session.pointer_up(), None);
        assert_eq!(session.spawner().len(), 1);
    }

    #[test]
    fn test_uniform_selection_scores_and_heals() {
        let (mut session, audio) = running_session();
        session.update(5.0); // health 69
        let a1 = place_active(&mut session, A, 20.0, 20.0);
        let a2 = place_active(&mut session, A, 60.0, 50.0);
        let before = session.spawner().len();

        let outcome = lasso_corner(&mut session);
        let Some(SelectionOutcome::Matched { count, combo, heal }) = outcome else {
            panic!("expected a match, got {outcome:?}");
        };
        assert_eq!(count, 2);
        assert_eq!(combo, 1);
        assert!((heal - (2.0 * 3.8 + 0.35)).abs() < 1e-5);
        assert_eq!(session.score(), 2);
        assert_eq!(session.combo(), 1);
        assert!((session.health() - (69.0 + 7.95)).abs() < 1e-3);
        assert_eq!(session.spawner().len(), before - 2);
        assert!(session.spawner().items().iter().all(|i| i.id != a1 && i.id != a2));
        assert_eq!(audio.count(|c| *c == Cue::Success { count: 2, combo: 1 }), 1);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SessionEvent::ItemCollected { .. }))
                .count(),
            2
        );
        assert!(events.iter().any(|e| matches!(e, SessionEvent::LassoFlash { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::Feedback(f) if f.text == "+2" && f.pos == Vec2::new(20.0, 20.0)
        )));
    }

    #[test]
    fn test_combo_grows_and_heal_clamps() {
        let (mut session, _) = running_session();
        place_active(&mut session, A, 20.0, 20.0);
        lasso_corner(&mut session);
        place_active(&mut session, B, 30.0, 30.0);
        lasso_corner(&mut session);
        assert_eq!(session.combo(), 2);
        assert_eq!(session.score(), 2);
        assert_eq!(session.health(), 100.0);
    }

    #[test]
    fn test_mixed_selection_damages_and_keeps_items() {
        let (mut session, audio) = running_session();
        place_active(&mut session, A, 20.0, 20.0);
        lasso_corner(&mut session);
        assert_eq!(session.combo(), 1);

        place_active(&mut session, A, 20.0, 20.0);
        place_active(&mut session, B, 60.0, 60.0);
        let health = session.health();
        let outcome = lasso_corner(&mut session);
        assert_eq!(
            outcome,
            Some(SelectionOutcome::Mismatched {
                selected: 2,
                wrong: 1,
                damage: 13.5
            })
        );
        assert!((session.health() - (health - 13.5)).abs() < 1e-4);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.score(), 1);
        assert_eq!(session.spawner().len(), 2);
        assert_eq!(audio.count(|c| *c == Cue::Error), 1);
        assert!(feedback_texts(&mut session).contains(&"-14".to_string()));
    }

    #[test]
    fn test_wrong_count_is_selection_minus_majority() {
        let (mut session, _) = running_session();
        place_active(&mut session, A, 15.0, 15.0);
        place_active(&mut session, A, 30.0, 60.0);
        place_active(&mut session, B, 60.0, 15.0);
        place_active(&mut session, B, 70.0, 70.0);
        let outcome = lasso_corner(&mut session);
        assert_eq!(
            outcome,
            Some(SelectionOutcome::Mismatched {
                selected: 4,
                wrong: 2,
                damage: 18.0
            })
        );
    }

    #[test]
    fn test_tap_is_too_short() {
        let (mut session, _) = running_session();
        place_active(&mut session, A, 20.0, 20.0);
        session.drain_events().for_each(drop);

        session.pointer_down(Vec2::new(20.0, 20.0));
        session.pointer_move(Vec2::new(22.0, 21.0), true);
        assert_eq!(session.pointer_up(), Some(SelectionOutcome::TooShort));
        assert_eq!(session.score(), 0);
        assert_eq!(session.health(), 100.0);
        assert_eq!(session.spawner().len(), 1);
        assert_eq!(feedback_texts(&mut session), vec!["Too short".to_string()]);
    }

    #[test]
    fn test_empty_lasso_reports_nothing_active() {
        let (mut session, _) = running_session();
        // Preview items are not selectable
        session
            .spawner_mut()
            .spawn_at(TypeId(A), Vec2::new(20.0, 20.0), 9.0);
        session.drain_events().for_each(drop);
        assert_eq!(lasso_corner(&mut session), Some(SelectionOutcome::NothingActive));
        assert_eq!(session.combo(), 0);
        assert_eq!(feedback_texts(&mut session), vec!["No active items".to_string()]);
    }

    #[test]
    fn test_release_without_gesture_is_ignored() {
        let (mut session, _) = running_session();
        assert_eq!(session.pointer_up(), None);
    }

    #[test]
    fn test_move_without_press_does_not_draw() {
        let (mut session, _) = running_session();
        session.pointer_down(Vec2::new(4.0, 4.0));
        session.pointer_move(Vec2::new(84.0, 4.0), false);
        assert_eq!(session.lasso().points().len(), 1);
    }

    #[test]
    fn test_game_over_exactly_once() {
        let (mut session, audio) = running_session();
        session.update(10.0);
        assert_eq!(session.phase(), SessionPhase::Running);
        session.update(10.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(session.health(), 0.0);
        assert!(!session.lasso().is_enabled());

        let elapsed = session.elapsed_sec();
        session.update(1.0);
        session.update(1.0);
        assert_eq!(session.elapsed_sec(), elapsed);

        assert_eq!(audio.count(|c| *c == Cue::GameOver), 1);
        let shown = session
            .drain_events()
            .filter(|e| matches!(e, SessionEvent::ShowGameOver(_)))
            .count();
        assert_eq!(shown, 1);
    }

    #[test]
    fn test_killing_blow_ends_run_immediately() {
        let (mut session, _) = running_session();
        session.update(15.0); // health 7
        place_active(&mut session, A, 20.0, 20.0);
        place_active(&mut session, B, 60.0, 60.0);
        lasso_corner(&mut session);
        assert_eq!(session.health(), 0.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);
    }

    #[test]
    fn test_best_records_written_when_beaten() {
        let (mut session, _) = running_session();
        place_active(&mut session, A, 20.0, 20.0);
        place_active(&mut session, A, 40.0, 40.0);
        lasso_corner(&mut session);
        session.update(30.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        let summary = session.game_over_summary().expect("summary after game over");
        assert_eq!(summary.score, 2);
        assert_eq!(summary.best_score, 2);
        assert_eq!(summary.best_time_sec, 30.0);
        assert_eq!(session.store().get_number("lassoPanic.bestScore", 0.0), 2.0);
        assert_eq!(session.store().get_number("lassoPanic.bestTimeSec", 0.0), 30.0);
    }

    #[test]
    fn test_best_records_kept_when_not_beaten() {
        let store = MemoryStore::with_values([
            ("lassoPanic.bestScore", 50.0),
            ("lassoPanic.bestTimeSec", 30.0),
        ]);
        let (mut session, _) = session_with_store(store);
        session.start();
        // Exactly ties the stored time
        session.update(30.0);
        let summary = session.game_over_summary().expect("summary after game over");
        assert_eq!(summary.best_score, 50);
        assert_eq!(summary.best_time_sec, 30.0);
        assert_eq!(session.store().get_number("lassoPanic.bestScore", 0.0), 50.0);
    }

    #[test]
    fn test_restart_reinitializes() {
        let (mut session, _) = running_session();
        place_active(&mut session, A, 20.0, 20.0);
        lasso_corner(&mut session);
        assert!(!session.restart());
        session.update(40.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        session.pointer_down(Vec2::ZERO);
        assert_eq!(session.phase(), SessionPhase::StartOverlay);
        assert_eq!(session.score(), 0);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.elapsed_sec(), 0.0);
        assert_eq!(session.health(), 100.0);
        assert!(session.spawner().is_empty());
        assert!(session.game_over_summary().is_none());
        assert_eq!(session.records().best_score, 1);

        session.pointer_down(Vec2::ZERO);
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_mute_shows_in_snapshot() {
        let (mut session, _) = running_session();
        assert!(!session.snapshot().muted);
        assert!(session.toggle_mute());
        assert!(session.snapshot().muted);
    }

    #[test]
    fn test_spawns_forward_cues() {
        let (mut session, audio) = running_session();
        session.update(1.0);
        assert_eq!(audio.count(|c| *c == Cue::SpawnPreview), 1);
        session.update(1.0);
        assert!(audio.count(|c| *c == Cue::Activate) >= 1);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Frame(f32),
        Pause,
        Press,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            6 => (0.0f32..0.5).prop_map(Action::Frame),
            1 => Just(Action::Pause),
            1 => Just(Action::Press),
        ]
    }

    proptest! {
        #[test]
        fn prop_time_only_advances_while_running(actions in proptest::collection::vec(action(), 1..120)) {
            let (mut session, _) = session_with_store(MemoryStore::new());
            let mut game_overs = 0;
            let mut shown = 0;
            for action in actions {
                let phase = session.phase();
                let before = session.elapsed_sec();
                match action {
                    Action::Frame(dt) => {
                        session.update(dt);
                        if phase == SessionPhase::Running {
                            prop_assert!(session.elapsed_sec() >= before);
                        } else {
                            prop_assert_eq!(session.elapsed_sec(), before);
                        }
                    }
                    Action::Pause => { session.toggle_pause(); }
                    Action::Press => session.pointer_down(Vec2::new(480.0, 270.0)),
                }
                prop_assert!(session.health() >= 0.0 && session.health() <= 100.0);
                if phase == SessionPhase::Running && session.phase() == SessionPhase::GameOver {
                    game_overs += 1;
                }
                shown += session
                    .drain_events()
                    .filter(|e| matches!(e, SessionEvent::ShowGameOver(_)))
                    .count();
            }
            prop_assert_eq!(shown, game_overs);
        }
    }
}
