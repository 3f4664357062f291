//! Best-effort conversion of free-text plans into [`PlanDay`] records.
//!
//! Model output is loosely formatted, so this never fails: lines that match
//! a known "sets and reps" shape become prescriptions, other plausible lines
//! become default 3x10 prescriptions, and the rest is dropped.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::plan::{ExercisePrescription, PlanDay};

const SINGLE_DAY_TITLE: &str = "Workout Plan";

static DAY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:day[ \t]*\d+|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("day header pattern")
});

static LEADING_DECORATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[\s:>#*_•\-–—]+|\d+[.)]\s+)+").expect("leading decoration pattern")
});

static TRAILING_DECORATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s:*_]+$").expect("trailing decoration pattern"));

// <name> - <sets> sets[,] <reps> reps
static DASH_SETS_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*[-–—]\s*(\d+)\s*sets?\s*,?\s*(\d+)\s*reps?").expect("dash pattern")
});

// <name> : <sets> x <reps>
static COLON_SETS_X_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*:\s*(\d+)\s*[x×]\s*(\d+)").expect("colon pattern")
});

// <name> (<sets> sets, <reps> reps)
static PAREN_SETS_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*\(\s*(\d+)\s*sets?\s*,\s*(\d+)\s*reps?\s*\)").expect("paren pattern")
});

// <name> <sets> sets <reps> reps
static SPACED_SETS_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(\d+)\s*sets?\s+(\d+)\s*reps?").expect("spaced pattern")
});

type Matcher = fn(&str) -> Option<ExercisePrescription>;

/// Tried in order; the first match wins.
const MATCHERS: [Matcher; 4] = [
    dash_sets_reps,
    colon_sets_x_reps,
    paren_sets_reps,
    spaced_sets_reps,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Segmented,
    SingleDay,
}

/// Parses plan text into days. Absent or blank text yields no days; text
/// without any day header yields exactly one day.
pub fn parse_plan_text(text: Option<&str>) -> Vec<PlanDay> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    let headers: Vec<_> = DAY_HEADER.find_iter(text).collect();
    if headers.is_empty() {
        return vec![parse_single_day(text)];
    }

    // Text before the first header belongs to no day, so it is dropped even
    // when it reads like an exercise.
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let end = headers.get(i + 1).map_or(text.len(), |next| next.start());
            parse_day_segment(header.as_str(), &text[header.end()..end])
        })
        .collect()
}

fn parse_single_day(text: &str) -> PlanDay {
    let mut day = PlanDay::new(SINGLE_DAY_TITLE);
    day.exercises = text
        .lines()
        .filter_map(|line| exercise_from_line(&clean_line(line), Mode::SingleDay))
        .collect();
    day
}

fn parse_day_segment(header: &str, body: &str) -> PlanDay {
    let mut day = PlanDay::new(header.trim());
    let mut lines = body.lines();

    // The rest of the header line is either an exercise or the day's focus.
    let header_rest = lines.next().map(clean_line).unwrap_or_default();
    if !header_rest.is_empty() {
        match match_exercise(&header_rest) {
            Some(exercise) => day.exercises.push(exercise),
            None => day.focus = Some(header_rest),
        }
    }

    day.exercises.extend(
        lines.filter_map(|line| exercise_from_line(&clean_line(line), Mode::Segmented)),
    );
    day
}

fn exercise_from_line(line: &str, mode: Mode) -> Option<ExercisePrescription> {
    if line.is_empty() {
        return None;
    }
    if let Some(exercise) = match_exercise(line) {
        return Some(exercise);
    }

    let plausible = !line.contains("Day") && !line.contains("Rest");
    let long_enough = mode == Mode::Segmented || line.chars().count() > 3;
    if plausible && long_enough {
        Some(ExercisePrescription::with_defaults(line))
    } else {
        None
    }
}

pub fn match_exercise(line: &str) -> Option<ExercisePrescription> {
    MATCHERS.iter().find_map(|matcher| matcher(line))
}

fn dash_sets_reps(line: &str) -> Option<ExercisePrescription> {
    DASH_SETS_REPS.captures(line).and_then(from_captures)
}

fn colon_sets_x_reps(line: &str) -> Option<ExercisePrescription> {
    COLON_SETS_X_REPS.captures(line).and_then(from_captures)
}

fn paren_sets_reps(line: &str) -> Option<ExercisePrescription> {
    PAREN_SETS_REPS.captures(line).and_then(from_captures)
}

fn spaced_sets_reps(line: &str) -> Option<ExercisePrescription> {
    SPACED_SETS_REPS.captures(line).and_then(from_captures)
}

fn from_captures(captures: Captures<'_>) -> Option<ExercisePrescription> {
    let name = captures.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    let count = |idx| {
        captures
            .get(idx)
            .and_then(|m| m.as_str().parse::<u32>().ok())
    };
    Some(ExercisePrescription::new(name, count(2), count(3)))
}

/// Strips list bullets, numbering and markdown emphasis.
fn clean_line(line: &str) -> String {
    let line = line.replace("**", "").replace("__", "");
    let line = LEADING_DECORATION.replace(line.trim(), "");
    TRAILING_DECORATION.replace(&line, "").trim().to_string()
}
