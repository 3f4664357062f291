use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REPS: u32 = 10;
pub const DEFAULT_REST: &str = "60s";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrescription {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub rest: String,
}

impl ExercisePrescription {
    /// Missing or zero counts fall back to 3 sets of 10.
    pub fn new(name: &str, sets: Option<u32>, reps: Option<u32>) -> Self {
        Self {
            name: name.trim().to_string(),
            sets: sets.filter(|n| *n > 0).unwrap_or(DEFAULT_SETS),
            reps: reps.filter(|n| *n > 0).unwrap_or(DEFAULT_REPS),
            rest: DEFAULT_REST.to_string(),
        }
    }

    pub fn with_defaults(name: &str) -> Self {
        Self::new(name, None, None)
    }

    pub fn with_rest(mut self, rest: Option<String>) -> Self {
        if let Some(rest) = rest.filter(|r| !r.trim().is_empty()) {
            self.rest = rest.trim().to_string();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    pub exercises: Vec<ExercisePrescription>,
}

impl PlanDay {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            focus: None,
            exercises: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub snacks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionDay {
    pub title: String,
    pub daily_calories: Option<u32>,
    pub meals: Meals,
}

/// A plan as the coaching service hands it to the rest of the app. Raw text
/// is kept alongside the parsed days so nothing the model said is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub workout_days: Vec<PlanDay>,
    pub nutrition_days: Vec<NutritionDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_text: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedPlan {
    pub fn exercise(&self, day_index: usize, exercise_index: usize) -> Option<&ExercisePrescription> {
        self.workout_days
            .get(day_index)
            .and_then(|day| day.exercises.get(exercise_index))
    }
}
