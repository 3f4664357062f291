use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    TooEasy,
    JustRight,
    TooHard,
}

/// The weekly check-in that steers the next plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyFeedback {
    pub workout_difficulty: Difficulty,
    pub enjoyment_rating: u8,
    #[serde(default)]
    pub progress_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    #[serde(default = "today")]
    pub week_ending_date: NaiveDate,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl WeeklyFeedback {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.enjoyment_rating) {
            return Err(format!(
                "enjoyment_rating must be between 1 and 5, got {}",
                self.enjoyment_rating
            ));
        }
        if let Some(weight) = self.current_weight
            && !(weight.is_finite() && weight > 0.0)
        {
            return Err(format!("current_weight must be positive, got {}", weight));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feedback_defaults_week_ending_to_today() {
        let feedback: WeeklyFeedback = serde_json::from_value(json!({
            "workout_difficulty": "too_hard",
            "enjoyment_rating": 4
        }))
        .unwrap();

        assert_eq!(feedback.workout_difficulty, Difficulty::TooHard);
        assert_eq!(feedback.week_ending_date, Utc::now().date_naive());
        assert!(feedback.progress_notes.is_empty());
        assert!(feedback.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating_and_weight() {
        let mut feedback = WeeklyFeedback {
            workout_difficulty: Difficulty::JustRight,
            enjoyment_rating: 6,
            progress_notes: String::new(),
            current_weight: None,
            week_ending_date: Utc::now().date_naive(),
        };
        assert!(feedback.validate().is_err());

        feedback.enjoyment_rating = 3;
        feedback.current_weight = Some(-2.0);
        assert!(feedback.validate().is_err());
    }
}
