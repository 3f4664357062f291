use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    BuildMuscle,
    ImproveFitness,
    MaintainWeight,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::BuildMuscle => "build_muscle",
            Self::ImproveFitness => "improve_fitness",
            Self::MaintainWeight => "maintain_weight",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// The onboarding record. Every field is optional because the form can be
/// saved half-filled and older records may predate a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_enum")]
    pub gender: Option<Gender>,
    #[serde(default, alias = "weight", deserialize_with = "lenient::opt_f64")]
    pub weight_kg: Option<f64>,
    #[serde(default, alias = "height", deserialize_with = "lenient::opt_f64")]
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_enum")]
    pub goal: Option<Goal>,
    #[serde(default, deserialize_with = "lenient::opt_enum")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, deserialize_with = "lenient::opt_days_per_week")]
    pub workout_days_per_week: Option<u8>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub dietary_preferences: Option<String>,
}

impl Profile {
    /// Splits the free-text preferences on commas, dropping blanks.
    pub fn dietary_preference_list(&self) -> Vec<String> {
        self.dietary_preferences
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The logged-in user. Login is a mock, so this is all a session knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_accepts_form_strings_and_aliases() {
        let profile: Profile = serde_json::from_value(json!({
            "age": "31",
            "gender": "female",
            "weight": "64.5",
            "height": 170,
            "goal": "build_muscle",
            "experience_level": "intermediate",
            "workout_days_per_week": "4",
            "dietary_preferences": "vegetarian, no nuts"
        }))
        .unwrap();

        assert_eq!(profile.age, Some(31));
        assert_eq!(profile.gender, Some(Gender::Female));
        assert_eq!(profile.weight_kg, Some(64.5));
        assert_eq!(profile.height_cm, Some(170.0));
        assert_eq!(profile.goal, Some(Goal::BuildMuscle));
        assert_eq!(profile.experience_level, Some(ExperienceLevel::Intermediate));
        assert_eq!(profile.workout_days_per_week, Some(4));
    }

    #[test]
    fn test_profile_coerces_garbage_to_absent() {
        let profile: Profile = serde_json::from_value(json!({
            "age": "",
            "gender": "robot",
            "weight": "heavy",
            "goal": "get_famous",
            "workout_days_per_week": 9
        }))
        .unwrap();

        assert_eq!(profile.age, None);
        assert_eq!(profile.gender, None);
        assert_eq!(profile.weight_kg, None);
        assert_eq!(profile.goal, None);
        assert_eq!(profile.workout_days_per_week, None);
    }

    #[test]
    fn test_dietary_preference_list() {
        let profile = Profile {
            dietary_preferences: Some(" vegan ,, gluten free,".to_string()),
            ..Profile::default()
        };
        assert_eq!(
            profile.dietary_preference_list(),
            vec!["vegan".to_string(), "gluten free".to_string()]
        );
        assert!(Profile::default().dietary_preference_list().is_empty());
    }

    #[test]
    fn test_goal_display() {
        assert_eq!(Goal::LoseWeight.to_string(), "lose_weight");
        assert_eq!(Goal::MaintainWeight.as_str(), "maintain_weight");
    }
}
