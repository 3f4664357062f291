use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::lenient;

/// Identity of a log entry. Plan exercises are logged by position, ad-hoc
/// workouts by exercise name and calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogKey {
    Instance {
        day_index: usize,
        exercise_index: usize,
    },
    Dated {
        exercise_name: String,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub reps: u32,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub weight: f64,
    #[serde(default)]
    pub completed: bool,
    pub timestamp: DateTime<Utc>,
}

impl SetRecord {
    pub fn volume(&self) -> f64 {
        let weight = if self.weight.is_finite() { self.weight } else { 0.0 };
        f64::from(self.reps) * weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogEntry {
    pub key: LogKey,
    pub exercise_name: String,
    pub date: NaiveDate,
    /// Set number (from 1) to record. Undone sets stay here with
    /// `completed == false`.
    #[serde(default)]
    pub sets: BTreeMap<u32, SetRecord>,
}

impl ExerciseLogEntry {
    pub fn new(key: LogKey, exercise_name: &str, date: NaiveDate) -> Self {
        Self {
            key,
            exercise_name: exercise_name.trim().to_string(),
            date,
            sets: BTreeMap::new(),
        }
    }

    pub fn completed_sets(&self) -> impl Iterator<Item = &SetRecord> {
        self.sets.values().filter(|set| set.completed)
    }

    pub fn completed_count(&self) -> u32 {
        self.completed_sets().count() as u32
    }

    pub fn volume(&self) -> f64 {
        self.completed_sets().map(SetRecord::volume).sum()
    }
}

/// Every log entry, keyed by [`LogKey`]. Persisted as a JSON array since
/// composite keys have no natural JSON object-key form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ExerciseLogEntry>", into = "Vec<ExerciseLogEntry>")]
pub struct WorkoutLog {
    entries: BTreeMap<LogKey, ExerciseLogEntry>,
}

impl WorkoutLog {
    pub fn get(&self, key: &LogKey) -> Option<&ExerciseLogEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &LogKey) -> Option<&mut ExerciseLogEntry> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, entry: ExerciseLogEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn remove(&mut self, key: &LogKey) -> Option<ExerciseLogEntry> {
        self.entries.remove(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ExerciseLogEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ExerciseLogEntry>> for WorkoutLog {
    fn from(entries: Vec<ExerciseLogEntry>) -> Self {
        let mut log = WorkoutLog::default();
        for entry in entries {
            log.insert(entry);
        }
        log
    }
}

impl From<WorkoutLog> for Vec<ExerciseLogEntry> {
    fn from(log: WorkoutLog) -> Self {
        log.entries.into_values().collect()
    }
}
