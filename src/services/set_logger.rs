use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::log::{ExerciseLogEntry, LogKey, SetRecord, WorkoutLog};
use crate::storage::StoreError;
use crate::storage::stores::WorkoutLogStore;

/// Tracks which set of one exercise instance is up next. The pointer lives
/// in memory; the sets themselves are written through to the log store on
/// every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SetLogger {
    key: LogKey,
    exercise_name: String,
    target_sets: u32,
    current_set: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggerStatus {
    pub key: LogKey,
    pub exercise_name: String,
    pub target_sets: u32,
    pub current_set: u32,
    pub completed_sets: u32,
    pub done: bool,
}

impl SetLogger {
    /// Picks up where an existing entry left off. An entry recorded for a
    /// different exercise (an older plan) counts as nothing logged.
    pub fn resume(log: &WorkoutLog, key: LogKey, exercise_name: &str, target_sets: u32) -> Self {
        let target_sets = target_sets.max(1);
        let completed = log
            .get(&key)
            .filter(|entry| entry.exercise_name == exercise_name.trim())
            .map_or(0, ExerciseLogEntry::completed_count);

        Self {
            key,
            exercise_name: exercise_name.trim().to_string(),
            target_sets,
            current_set: (completed + 1).min(target_sets),
        }
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn log_set(&mut self, store: &WorkoutLogStore, reps: u32, weight: f64) -> Result<(), StoreError> {
        self.log_set_at(store, reps, weight, Utc::now())
    }

    pub fn log_set_at(
        &mut self,
        store: &WorkoutLogStore,
        reps: u32,
        weight: f64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut log = store.load();

        let stale = log
            .get(&self.key)
            .is_some_and(|entry| entry.exercise_name != self.exercise_name);
        if stale || log.get(&self.key).is_none() {
            log.insert(ExerciseLogEntry::new(
                self.key.clone(),
                &self.exercise_name,
                now.date_naive(),
            ));
        }

        if let Some(entry) = log.get_mut(&self.key) {
            entry.sets.insert(
                self.current_set,
                SetRecord {
                    reps,
                    weight: if weight.is_finite() { weight } else { 0.0 },
                    completed: true,
                    timestamp: now,
                },
            );
        }
        store.save(&log)?;

        tracing::debug!(
            exercise = %self.exercise_name,
            set = self.current_set,
            reps,
            weight,
            "set.logged"
        );

        if self.current_set < self.target_sets {
            self.current_set += 1;
        }
        Ok(())
    }

    /// Marks the highest completed set as not completed and points back at
    /// it. Nothing completed means nothing changes, and an entry left by a
    /// different exercise is never touched.
    pub fn undo_last_set(&mut self, store: &WorkoutLogStore) -> Result<(), StoreError> {
        let mut log = store.load();
        let Some(entry) = log
            .get_mut(&self.key)
            .filter(|entry| entry.exercise_name == self.exercise_name)
        else {
            return Ok(());
        };
        let Some((&set_number, set)) = entry.sets.iter_mut().rev().find(|(_, set)| set.completed)
        else {
            return Ok(());
        };

        set.completed = false;
        store.save(&log)?;

        self.current_set = set_number.clamp(1, self.target_sets);
        tracing::debug!(exercise = %self.exercise_name, set = set_number, "set.undone");
        Ok(())
    }

    /// Removes this exercise's entry and resets the pointer. An entry left by
    /// a different exercise is kept.
    pub fn clear_log(&mut self, store: &WorkoutLogStore) -> Result<(), StoreError> {
        let mut log = store.load();
        let owned = log
            .get(&self.key)
            .is_some_and(|entry| entry.exercise_name == self.exercise_name);
        if owned {
            log.remove(&self.key);
            store.save(&log)?;
        }
        self.current_set = 1;
        tracing::debug!(exercise = %self.exercise_name, "set.log_cleared");
        Ok(())
    }

    pub fn status(&self, log: &WorkoutLog) -> LoggerStatus {
        let completed_sets = log
            .get(&self.key)
            .filter(|entry| entry.exercise_name == self.exercise_name)
            .map_or(0, ExerciseLogEntry::completed_count);

        LoggerStatus {
            key: self.key.clone(),
            exercise_name: self.exercise_name.clone(),
            target_sets: self.target_sets,
            current_set: self.current_set(),
            completed_sets,
            done: completed_sets == self.target_sets,
        }
    }
}
