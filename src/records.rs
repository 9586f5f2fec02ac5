//! Best-run records
//!
//! Two numbers survive between runs: the best score and the longest survival
//! time. Each is only replaced by a strictly greater value.

use serde::{Deserialize, Serialize};

use crate::persistence::NumberStore;
use crate::tuning::Tuning;

/// Best score and best survival time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BestRecords {
    pub best_score: u64,
    pub best_time_sec: f32,
}

/// Which records a finished run beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordUpdate {
    pub new_best_score: bool,
    pub new_best_time: bool,
}

impl BestRecords {
    /// Read records from the store (missing or garbage values read as 0)
    pub fn load(store: &dyn NumberStore, tuning: &Tuning) -> Self {
        let score = store.get_number(&tuning.storage_best_score_key, 0.0);
        let time = store.get_number(&tuning.storage_best_time_key, 0.0);
        Self {
            best_score: if score > 0.0 { score.floor() as u64 } else { 0 },
            best_time_sec: if time > 0.0 { time as f32 } else { 0.0 },
        }
    }

    /// Fold a finished run in, persisting each record it strictly beats
    pub fn submit(
        &mut self,
        score: u64,
        time_sec: f32,
        store: &mut dyn NumberStore,
        tuning: &Tuning,
    ) -> RecordUpdate {
        let mut update = RecordUpdate::default();

        if score > self.best_score {
            self.best_score = score;
            store.set_number(&tuning.storage_best_score_key, score as f64);
            update.new_best_score = true;
            log::info!("New best score: {}", score);
        }

        if time_sec > self.best_time_sec {
            self.best_time_sec = time_sec;
            store.set_number(&tuning.storage_best_time_key, f64::from(time_sec));
            update.new_best_time = true;
            log::info!("New best time: {:.1}s", time_sec);
        }

        update
    }
}
