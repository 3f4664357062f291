use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::log::{ExerciseLogEntry, WorkoutLog};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub total_workouts: usize,
    pub total_volume: f64,
    pub exercise_count: usize,
    pub last_workout: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub volume: f64,
    pub sets: u32,
    pub avg_weight: f64,
    pub avg_reps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSummary {
    pub exercise_name: String,
    pub best_volume: f64,
    pub data_points: usize,
    /// `None` with fewer than two points or a zero starting volume.
    pub progress_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub stats: AggregateStats,
    pub exercises: Vec<ExerciseSummary>,
}

/// Entries with at least one completed set. Fully undone entries count as
/// never logged.
fn logged_entries(log: &WorkoutLog) -> impl Iterator<Item = &ExerciseLogEntry> {
    log.entries().filter(|entry| entry.completed_count() > 0)
}

pub fn aggregate(log: &WorkoutLog) -> AggregateStats {
    let mut workouts = HashSet::new();
    let mut names = HashSet::new();
    let mut total_volume = 0.0;
    let mut last_workout: Option<NaiveDate> = None;

    for entry in logged_entries(log) {
        workouts.insert((entry.exercise_name.as_str(), entry.date));
        names.insert(entry.exercise_name.as_str());
        total_volume += entry.volume();
        last_workout = last_workout.max(Some(entry.date));
    }

    AggregateStats {
        total_workouts: workouts.len(),
        total_volume,
        exercise_count: names.len(),
        last_workout,
    }
}

/// Distinct exercise names in the order they first appear.
pub fn exercise_names(log: &WorkoutLog) -> Vec<String> {
    let mut seen = HashSet::new();
    logged_entries(log)
        .filter(|entry| seen.insert(entry.exercise_name.as_str()))
        .map(|entry| entry.exercise_name.clone())
        .collect()
}

/// One point per date for `exercise_name`, oldest first. Entries sharing a
/// date are merged; only completed sets count.
pub fn exercise_series(log: &WorkoutLog, exercise_name: &str) -> Vec<DataPoint> {
    #[derive(Default)]
    struct Totals {
        volume: f64,
        sets: u32,
        weight: f64,
        reps: f64,
    }

    let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for entry in log.entries().filter(|e| e.exercise_name == exercise_name) {
        for set in entry.completed_sets() {
            let totals = by_date.entry(entry.date).or_default();
            totals.volume += set.volume();
            totals.sets += 1;
            totals.weight += if set.weight.is_finite() { set.weight } else { 0.0 };
            totals.reps += f64::from(set.reps);
        }
    }

    by_date
        .into_iter()
        .map(|(date, totals)| {
            let count = f64::from(totals.sets);
            DataPoint {
                date,
                volume: totals.volume,
                sets: totals.sets,
                avg_weight: totals.weight / count,
                avg_reps: totals.reps / count,
            }
        })
        .collect()
}

pub fn progress_percent(series: &[DataPoint]) -> Option<f64> {
    let (first, last) = match series {
        [first, .., last] => (first, last),
        _ => return None,
    };
    if first.volume == 0.0 {
        return None;
    }
    let percent = (last.volume - first.volume) / first.volume * 100.0;
    percent.is_finite().then_some(percent)
}

pub fn exercise_summary(exercise_name: &str, series: &[DataPoint]) -> ExerciseSummary {
    ExerciseSummary {
        exercise_name: exercise_name.to_string(),
        best_volume: series.iter().map(|p| p.volume).fold(0.0, f64::max),
        data_points: series.len(),
        progress_percent: progress_percent(series),
    }
}

pub fn progress_report(log: &WorkoutLog) -> ProgressReport {
    let exercises = exercise_names(log)
        .into_iter()
        .filter_map(|name| {
            let series = exercise_series(log, &name);
            (!series.is_empty()).then(|| exercise_summary(&name, &series))
        })
        .collect();

    ProgressReport {
        stats: aggregate(log),
        exercises,
    }
}
