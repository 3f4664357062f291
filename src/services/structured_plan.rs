use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::lenient::{value_as_f64, value_as_text};
use crate::models::plan::{ExercisePrescription, Meals, NutritionDay, PlanDay};

static LEADING_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("leading count pattern"));

/// Day-keyed (`{"monday": {...}}`) or array-shaped workout plan. Key order
/// is presentation order.
pub fn workout_days_from_json(plan: &Value) -> Vec<PlanDay> {
    day_entries(plan)
        .into_iter()
        .enumerate()
        .map(|(index, (key, day))| {
            let mut plan_day = PlanDay::new(day_title(day, key, index));
            plan_day.focus = day.get("focus").and_then(value_as_text);
            plan_day.exercises = day
                .get("exercises")
                .and_then(Value::as_array)
                .map(|exercises| exercises.iter().filter_map(exercise_from_json).collect())
                .unwrap_or_default();
            plan_day
        })
        .collect()
}

pub fn nutrition_days_from_json(plan: &Value) -> Vec<NutritionDay> {
    day_entries(plan)
        .into_iter()
        .enumerate()
        .map(|(index, (key, day))| {
            let meals = day.get("meals");
            let meal = |name: &str| meals.and_then(|m| m.get(name)).and_then(value_as_text);

            NutritionDay {
                title: day_title(day, key, index),
                daily_calories: day
                    .get("daily_calories")
                    .and_then(value_as_f64)
                    .filter(|kcal| *kcal >= 0.0)
                    .map(|kcal| kcal.round() as u32),
                meals: Meals {
                    breakfast: meal("breakfast"),
                    lunch: meal("lunch"),
                    dinner: meal("dinner"),
                    snacks: meal("snacks"),
                },
            }
        })
        .collect()
}

fn day_entries(plan: &Value) -> Vec<(Option<&str>, &Value)> {
    match plan {
        Value::Object(days) => days
            .iter()
            .filter(|(_, day)| day.is_object())
            .map(|(key, day)| (Some(key.as_str()), day))
            .collect(),
        Value::Array(days) => days
            .iter()
            .filter(|day| day.is_object())
            .map(|day| (None, day))
            .collect(),
        _ => Vec::new(),
    }
}

fn day_title(day: &Value, key: Option<&str>, index: usize) -> String {
    day.get("day_of_week")
        .and_then(value_as_text)
        .or_else(|| key.map(str::to_string))
        .unwrap_or_else(|| format!("Day {}", index + 1))
}

fn exercise_from_json(exercise: &Value) -> Option<ExercisePrescription> {
    let name = exercise.get("name").and_then(value_as_text)?;
    let sets = exercise.get("sets").and_then(leading_count);
    let reps = exercise.get("reps").and_then(leading_count);
    let rest = exercise.get("rest").and_then(value_as_text);

    Some(ExercisePrescription::new(&name, sets, reps).with_rest(rest))
}

/// "3", 3, "8-12", "10 each side" all count by their leading integer.
fn leading_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => LEADING_COUNT
            .captures(s)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workout_days_keep_key_order_and_coerce_counts() {
        let plan = json!({
            "wednesday": {
                "day_of_week": "Wednesday",
                "focus": "Legs",
                "exercises": [
                    {"name": "Squat", "sets": "4", "reps": "8-12", "rest": "90s"},
                    {"name": "Calf Raise", "sets": 3, "reps": "to failure"}
                ]
            },
            "monday": {
                "focus": "Rest",
                "exercises": []
            }
        });

        let days = workout_days_from_json(&plan);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].title, "Wednesday");
        assert_eq!(days[0].focus.as_deref(), Some("Legs"));
        assert_eq!(days[1].title, "monday");
        assert!(days[1].exercises.is_empty());

        let squat = &days[0].exercises[0];
        assert_eq!((squat.sets, squat.reps, squat.rest.as_str()), (4, 8, "90s"));

        let calf = &days[0].exercises[1];
        assert_eq!((calf.sets, calf.reps, calf.rest.as_str()), (3, 10, "60s"));
    }

    #[test]
    fn test_array_days_get_positional_titles_and_nameless_exercises_drop() {
        let plan = json!([
            {"exercises": [{"sets": "3", "reps": "10"}, {"name": "Row"}]},
            "not a day"
        ]);

        let days = workout_days_from_json(&plan);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].title, "Day 1");
        assert_eq!(days[0].exercises.len(), 1);
        assert_eq!(days[0].exercises[0].name, "Row");
    }

    #[test]
    fn test_malformed_plan_degrades_to_empty() {
        assert!(workout_days_from_json(&json!("free text")).is_empty());
        assert!(nutrition_days_from_json(&Value::Null).is_empty());
    }

    #[test]
    fn test_nutrition_days() {
        let plan = json!({
            "day_1": {
                "day_of_week": "Monday",
                "daily_calories": "2150.4",
                "meals": {"breakfast": "Oatmeal", "dinner": "Salmon"}
            }
        });

        let days = nutrition_days_from_json(&plan);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].title, "Monday");
        assert_eq!(days[0].daily_calories, Some(2150));
        assert_eq!(days[0].meals.breakfast.as_deref(), Some("Oatmeal"));
        assert_eq!(days[0].meals.lunch, None);
    }
}
