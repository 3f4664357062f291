use chrono::Utc;
use tracing::debug;

use crate::clients::models::requests::PlanRequest;
use crate::clients::models::responses::PlanResponse;
use crate::clients::plan_service::{PlanClient, PlanClientError};
use crate::models::plan::GeneratedPlan;
use crate::services::{plan_parser, structured_plan};

#[derive(Clone)]
pub struct CoachingService {
    plan_client: PlanClient,
}

impl CoachingService {
    pub fn new(plan_client: PlanClient) -> Self {
        Self { plan_client }
    }

    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<GeneratedPlan, PlanClientError> {
        let response = self.plan_client.request_plan(request).await?;
        let plan = plan_from_response(response);

        debug!(
            workout_days = plan.workout_days.len(),
            nutrition_days = plan.nutrition_days.len(),
            has_text = plan.workout_text.is_some(),
            "coaching.plan_built"
        );
        Ok(plan)
    }
}

/// Turns any accepted response shape into a plan. Free text goes through
/// the heuristic parser; structured days are mapped directly.
pub fn plan_from_response(response: PlanResponse) -> GeneratedPlan {
    let generated_at = Utc::now();
    match response {
        PlanResponse::Structured {
            workout_plan,
            nutrition_plan,
        } => GeneratedPlan {
            workout_days: structured_plan::workout_days_from_json(&workout_plan),
            nutrition_days: structured_plan::nutrition_days_from_json(&nutrition_plan),
            workout_text: None,
            nutrition_text: None,
            generated_at,
        },
        PlanResponse::Sectioned {
            workout_text,
            nutrition_text,
        } => GeneratedPlan {
            workout_days: plan_parser::parse_plan_text(workout_text.as_deref()),
            nutrition_days: Vec::new(),
            workout_text,
            nutrition_text,
            generated_at,
        },
        PlanResponse::Flat { plan_text } => GeneratedPlan {
            workout_days: plan_parser::parse_plan_text(Some(&plan_text)),
            nutrition_days: Vec::new(),
            workout_text: Some(plan_text),
            nutrition_text: None,
            generated_at,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sectioned_text_is_parsed_and_kept() {
        let plan = plan_from_response(PlanResponse::Sectioned {
            workout_text: Some("Monday\nBench Press - 3 sets, 10 reps\nTuesday\nRest".to_string()),
            nutrition_text: Some("Eat well".to_string()),
        });

        assert_eq!(plan.workout_days.len(), 2);
        assert_eq!(plan.workout_days[0].exercises[0].name, "Bench Press");
        assert_eq!(plan.nutrition_text.as_deref(), Some("Eat well"));
        assert!(plan.workout_text.is_some());
    }

    #[test]
    fn test_sectioned_without_workout_text_has_no_days() {
        let plan = plan_from_response(PlanResponse::Sectioned {
            workout_text: None,
            nutrition_text: Some("Eat well".to_string()),
        });
        assert!(plan.workout_days.is_empty());
    }

    #[test]
    fn test_structured_plan_maps_days() {
        let plan = plan_from_response(PlanResponse::Structured {
            workout_plan: json!({
                "monday": {"day_of_week": "Monday", "exercises": [{"name": "Squat", "sets": "5", "reps": "5"}]}
            }),
            nutrition_plan: json!({
                "monday": {"day_of_week": "Monday", "daily_calories": 2400}
            }),
        });

        assert_eq!(plan.workout_days[0].title, "Monday");
        assert_eq!(plan.workout_days[0].exercises[0].sets, 5);
        assert_eq!(plan.nutrition_days[0].daily_calories, Some(2400));
        assert_eq!(plan.workout_text, None);
    }

    #[test]
    fn test_flat_text_without_headers_is_one_day() {
        let plan = plan_from_response(PlanResponse::Flat {
            plan_text: "Squats : 4 x 8".to_string(),
        });
        assert_eq!(plan.workout_days.len(), 1);
        assert_eq!(plan.workout_days[0].title, "Workout Plan");
    }
}
