use serde_json::Value;

/// The answer shapes the plan service is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanResponse {
    // { "workout_plan": {...}, "nutrition_plan": {...} }
    Structured {
        workout_plan: Value,
        nutrition_plan: Value,
    },
    // { "workout": { "plan_text": "..." }, "nutrition": { "plan_text": "..." } }
    Sectioned {
        workout_text: Option<String>,
        nutrition_text: Option<String>,
    },
    // { "plan_text": "..." }
    Flat { plan_text: String },
}

impl PlanResponse {
    /// Checks the shapes in order, structured first. `None` when the body
    /// matches none of them.
    pub fn from_value(mut value: Value) -> Option<Self> {
        let is_plan = |v: &Value| v.is_object() || v.is_array();
        if value.get("workout_plan").is_some_and(is_plan) {
            return Some(Self::Structured {
                workout_plan: value
                    .get_mut("workout_plan")
                    .map(Value::take)
                    .unwrap_or_default(),
                nutrition_plan: value
                    .get_mut("nutrition_plan")
                    .map(Value::take)
                    .unwrap_or_default(),
            });
        }

        let section_text = |section: &str| {
            value
                .get(section)
                .and_then(|s| s.get("plan_text"))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let workout_text = section_text("workout");
        let nutrition_text = section_text("nutrition");
        if workout_text.is_some() || nutrition_text.is_some() {
            return Some(Self::Sectioned {
                workout_text,
                nutrition_text,
            });
        }

        value
            .get("plan_text")
            .and_then(Value::as_str)
            .map(|text| Self::Flat {
                plan_text: text.to_string(),
            })
    }
}
