use serde::Serialize;

use crate::models::feedback::WeeklyFeedback;
use crate::models::profile::{Goal, Profile};

const FALLBACK_AGE: u32 = 25;
const FALLBACK_WEIGHT_KG: f64 = 70.0;
const FALLBACK_HEIGHT_CM: f64 = 170.0;

/// Body of `POST /plan` on the plan service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub fitness_goal: String,
    pub dietary_preferences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<WeeklyFeedback>,
}

impl PlanRequest {
    /// Missing profile fields are filled with fallbacks rather than
    /// rejected; the service always gets a complete payload.
    pub fn from_profile(
        profile: &Profile,
        email: Option<&str>,
        feedback: Option<&WeeklyFeedback>,
    ) -> Self {
        Self {
            email: email
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
            age: profile.age.filter(|a| *a > 0).unwrap_or(FALLBACK_AGE),
            weight_kg: profile
                .weight_kg
                .filter(|w| *w > 0.0)
                .unwrap_or(FALLBACK_WEIGHT_KG),
            height_cm: profile
                .height_cm
                .filter(|h| *h > 0.0)
                .unwrap_or(FALLBACK_HEIGHT_CM),
            fitness_goal: profile
                .goal
                .unwrap_or(Goal::MaintainWeight)
                .as_str()
                .to_string(),
            dietary_preferences: profile.dietary_preference_list(),
            feedback: feedback.cloned(),
        }
    }
}
