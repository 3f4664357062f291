use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::error::ApiError;
use crate::clients::models::requests::PlanRequest;
use crate::models::feedback::WeeklyFeedback;
use crate::models::log::{ExerciseLogEntry, LogKey, SetRecord};
use crate::models::plan::GeneratedPlan;
use crate::models::profile::{Profile, User};
use crate::services::coaching::CoachingService;
use crate::services::progress::{self, DataPoint, ExerciseSummary, ProgressReport};
use crate::services::set_logger::{LoggerStatus, SetLogger};
use crate::storage::StoreError;
use crate::storage::stores::{Stores, WorkoutLogStore};

/// What the app knows about the person using it right now.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
    profile: Option<Profile>,
    plan: Option<GeneratedPlan>,
    loggers: HashMap<LogKey, SetLogger>,
}

impl Session {
    fn require_user(&self) -> Result<&User, ApiError> {
        self.user.as_ref().ok_or(ApiError::NotLoggedIn)
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ExerciseProgress {
    pub summary: ExerciseSummary,
    pub series: Vec<DataPoint>,
}

/// Shared by every handler. Built once at startup from persisted storage;
/// login, logout and saves are the only ways the session changes.
#[derive(Clone)]
pub struct AppState {
    pub coaching_service: CoachingService,
    pub stores: Stores,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn restore(coaching_service: CoachingService, stores: Stores) -> Self {
        let user = stores.session.load();
        let profile = user.as_ref().and_then(|_| stores.profile.load());

        tracing::info!(
            logged_in = user.is_some(),
            has_profile = profile.is_some(),
            "session.restored"
        );

        Self {
            coaching_service,
            stores,
            session: Arc::new(Mutex::new(Session {
                user,
                profile,
                ..Session::default()
            })),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn login(&self, email: &str, name: Option<&str>) -> Result<User, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::InvalidInput("email is required".to_string()));
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(email);
        let user = User {
            email: email.to_string(),
            name: name.to_string(),
        };

        self.stores.session.save(&Some(user.clone()))?;
        let profile = self.stores.profile.load();

        let mut session = self.session();
        *session = Session {
            user: Some(user.clone()),
            profile,
            ..Session::default()
        };

        tracing::info!(email = %user.email, "session.login");
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.stores.session.clear()?;
        let mut session = self.session();
        let email = session.user.take().map(|u| u.email);
        *session = Session::default();

        tracing::info!(email = ?email, "session.logout");
        Ok(())
    }

    pub fn current_user(&self) -> Result<User, ApiError> {
        self.session().require_user().cloned()
    }

    pub fn profile(&self) -> Result<Profile, ApiError> {
        let session = self.session();
        session.require_user()?;
        session.profile.clone().ok_or(ApiError::ProfileMissing)
    }

    /// Name and email default to the logged-in user's.
    pub fn save_profile(&self, mut profile: Profile) -> Result<Profile, ApiError> {
        let mut session = self.session();
        let user = session.require_user()?;
        profile.email.get_or_insert_with(|| user.email.clone());
        profile.name.get_or_insert_with(|| user.name.clone());

        self.stores.profile.save(&Some(profile.clone()))?;
        session.profile = Some(profile.clone());

        tracing::info!(goal = ?profile.goal, "profile.saved");
        Ok(profile)
    }

    /// Replaces the current plan wholesale; nothing from the old one is
    /// merged in.
    pub async fn generate_plan(
        &self,
        feedback: Option<&WeeklyFeedback>,
    ) -> Result<GeneratedPlan, ApiError> {
        let (requested_by, request) = {
            let session = self.session();
            let user = session.require_user()?;
            let profile = session.profile.as_ref().ok_or(ApiError::ProfileMissing)?;
            let request = PlanRequest::from_profile(profile, Some(&user.email), feedback);
            (user.clone(), request)
        };

        tracing::info!(
            goal = %request.fitness_goal,
            with_feedback = feedback.is_some(),
            "plan.requested"
        );
        let plan = self.coaching_service.generate_plan(&request).await?;

        tracing::info!(
            workout_days = plan.workout_days.len(),
            nutrition_days = plan.nutrition_days.len(),
            "plan.generated"
        );

        self.install_plan(&requested_by, plan)
    }

    /// Makes `plan` current unless the session changed hands while it was
    /// being generated.
    fn install_plan(&self, requested_by: &User, plan: GeneratedPlan) -> Result<GeneratedPlan, ApiError> {
        let mut session = self.session();
        if session.user.as_ref() != Some(requested_by) {
            tracing::warn!(email = %requested_by.email, "plan.discarded");
            return Err(ApiError::NotLoggedIn);
        }
        session.plan = Some(plan.clone());
        session.loggers.clear();
        Ok(plan)
    }

    pub fn current_plan(&self) -> Result<GeneratedPlan, ApiError> {
        let session = self.session();
        session.require_user()?;
        session.plan.clone().ok_or(ApiError::PlanMissing)
    }

    /// Records the check-in, carries a reported weight into the profile and
    /// asks for a fresh plan that takes the feedback into account.
    pub async fn submit_feedback(&self, feedback: WeeklyFeedback) -> Result<GeneratedPlan, ApiError> {
        feedback.validate().map_err(ApiError::InvalidInput)?;

        {
            let mut session = self.session();
            session.require_user()?;
            let profile = session.profile.as_mut().ok_or(ApiError::ProfileMissing)?;
            if let Some(weight) = feedback.current_weight {
                profile.weight_kg = Some(weight);
                let updated = profile.clone();
                self.stores.profile.save(&Some(updated))?;
            }

            let mut history = self.stores.feedback.load();
            history.push(feedback.clone());
            self.stores.feedback.save(&history)?;
        }

        tracing::info!(
            difficulty = ?feedback.workout_difficulty,
            enjoyment = feedback.enjoyment_rating,
            "feedback.recorded"
        );
        self.generate_plan(Some(&feedback)).await
    }

    pub fn feedback_history(&self) -> Result<Vec<WeeklyFeedback>, ApiError> {
        self.session().require_user()?;
        Ok(self.stores.feedback.load())
    }

    fn with_logger<F>(&self, day: usize, exercise: usize, op: F) -> Result<LoggerStatus, ApiError>
    where
        F: FnOnce(&mut SetLogger, &WorkoutLogStore) -> Result<(), StoreError>,
    {
        let mut session = self.session();
        session.require_user()?;
        let plan = session.plan.as_ref().ok_or(ApiError::PlanMissing)?;
        let prescription = plan
            .exercise(day, exercise)
            .ok_or(ApiError::ExerciseNotFound { day, exercise })?;
        let (name, target_sets) = (prescription.name.clone(), prescription.sets);

        let store = &self.stores.workout_log;
        let key = LogKey::Instance {
            day_index: day,
            exercise_index: exercise,
        };
        let logger = session
            .loggers
            .entry(key.clone())
            .or_insert_with(|| SetLogger::resume(&store.load(), key, &name, target_sets));

        op(logger, store)?;
        Ok(logger.status(&store.load()))
    }

    pub fn log_set(
        &self,
        day: usize,
        exercise: usize,
        reps: u32,
        weight: f64,
    ) -> Result<LoggerStatus, ApiError> {
        self.with_logger(day, exercise, |logger, store| logger.log_set(store, reps, weight))
    }

    pub fn undo_set(&self, day: usize, exercise: usize) -> Result<LoggerStatus, ApiError> {
        self.with_logger(day, exercise, |logger, store| logger.undo_last_set(store))
    }

    pub fn clear_exercise_log(&self, day: usize, exercise: usize) -> Result<LoggerStatus, ApiError> {
        self.with_logger(day, exercise, |logger, store| logger.clear_log(store))
    }

    /// Logs a whole ad-hoc workout for one exercise on one date. A second
    /// log for the same exercise and date replaces the first.
    pub fn log_workout(
        &self,
        exercise_name: &str,
        date: Option<NaiveDate>,
        sets: &[(u32, f64)],
    ) -> Result<ExerciseLogEntry, ApiError> {
        self.session().require_user()?;

        let exercise_name = exercise_name.trim();
        if exercise_name.is_empty() {
            return Err(ApiError::InvalidInput("exercise_name is required".to_string()));
        }
        if sets.is_empty() {
            return Err(ApiError::InvalidInput("at least one set is required".to_string()));
        }

        let now = Utc::now();
        let date = date.unwrap_or_else(|| now.date_naive());
        let mut entry = ExerciseLogEntry::new(
            LogKey::Dated {
                exercise_name: exercise_name.to_string(),
                date,
            },
            exercise_name,
            date,
        );
        for (number, &(reps, weight)) in (1u32..).zip(sets) {
            entry.sets.insert(
                number,
                SetRecord {
                    reps,
                    weight: if weight.is_finite() { weight } else { 0.0 },
                    completed: true,
                    timestamp: now,
                },
            );
        }

        let mut log = self.stores.workout_log.load();
        log.insert(entry.clone());
        self.stores.workout_log.save(&log)?;

        tracing::info!(
            exercise = %exercise_name,
            %date,
            sets = sets.len(),
            volume = entry.volume(),
            "workout.logged"
        );
        Ok(entry)
    }

    pub fn progress(&self) -> Result<ProgressReport, ApiError> {
        self.session().require_user()?;
        Ok(progress::progress_report(&self.stores.workout_log.load()))
    }

    pub fn exercise_progress(&self, exercise_name: &str) -> Result<ExerciseProgress, ApiError> {
        self.session().require_user()?;
        let series = progress::exercise_series(&self.stores.workout_log.load(), exercise_name);
        Ok(ExerciseProgress {
            summary: progress::exercise_summary(exercise_name, &series),
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::plan_service::PlanClient;
    use crate::config::Config;
    use crate::models::feedback::Difficulty;
    use crate::models::profile::Goal;
    use crate::storage::MemoryStore;
    use std::path::PathBuf;
    use std::time::Duration;

    const PLAN_TEXT: &str = r#"{"workout": {"plan_text": "Day 1\nBench Press - 3 sets, 10 reps\nSquats : 2 x 5\nDay 2\nRest Day"}, "nutrition": {"plan_text": "Eat"}}"#;

    fn state_for(url: &str, backend: Arc<MemoryStore>) -> AppState {
        let config = Config {
            port: "0".to_string(),
            plan_service_url: url.to_string(),
            plan_service_timeout: Duration::from_secs(5),
            data_dir: PathBuf::from("unused"),
            ephemeral_storage: true,
        };
        let service = CoachingService::new(PlanClient::new(&config).unwrap());
        AppState::restore(service, Stores::new(backend))
    }

    fn profile() -> Profile {
        Profile {
            age: Some(30),
            weight_kg: Some(80.0),
            goal: Some(Goal::BuildMuscle),
            ..Profile::default()
        }
    }

    async fn plan_server() -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/plan")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PLAN_TEXT)
            .create_async()
            .await;
        server
    }

    #[test]
    fn test_everything_requires_login() {
        let state = state_for("http://localhost:1", Arc::new(MemoryStore::new()));
        assert!(matches!(state.profile(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(state.current_plan(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(state.progress(), Err(ApiError::NotLoggedIn)));
        assert!(matches!(state.log_set(0, 0, 10, 20.0), Err(ApiError::NotLoggedIn)));
    }

    #[test]
    fn test_login_rejects_blank_email_and_persists_user() {
        let backend = Arc::new(MemoryStore::new());
        let state = state_for("http://localhost:1", Arc::clone(&backend));
        assert!(matches!(state.login("  ", None), Err(ApiError::InvalidInput(_))));

        let user = state.login("kim@example.com", None).unwrap();
        assert_eq!(user.name, "kim@example.com");

        // a restart picks the session back up
        let restored = state_for("http://localhost:1", backend);
        assert_eq!(restored.current_user().unwrap(), user);
    }

    #[test]
    fn test_save_profile_fills_identity_from_user() {
        let state = state_for("http://localhost:1", Arc::new(MemoryStore::new()));
        state.login("kim@example.com", Some("Kim")).unwrap();

        let saved = state.save_profile(profile()).unwrap();
        assert_eq!(saved.email.as_deref(), Some("kim@example.com"));
        assert_eq!(saved.name.as_deref(), Some("Kim"));
        assert_eq!(state.profile().unwrap(), saved);
    }

    #[test]
    fn test_plan_is_not_installed_for_a_different_user() {
        let state = state_for("http://localhost:1", Arc::new(MemoryStore::new()));
        let kim = state.login("kim@example.com", Some("Kim")).unwrap();
        state.logout().unwrap();
        state.login("lee@example.com", Some("Lee")).unwrap();

        let plan = GeneratedPlan {
            workout_days: Vec::new(),
            nutrition_days: Vec::new(),
            workout_text: None,
            nutrition_text: None,
            generated_at: Utc::now(),
        };
        assert!(matches!(
            state.install_plan(&kim, plan.clone()),
            Err(ApiError::NotLoggedIn)
        ));
        assert!(matches!(state.current_plan(), Err(ApiError::PlanMissing)));

        let lee = state.current_user().unwrap();
        state.install_plan(&lee, plan).unwrap();
        assert!(state.current_plan().is_ok());
    }

    #[tokio::test]
    async fn test_generate_plan_then_log_and_undo() {
        let server = plan_server().await;
        let state = state_for(&server.url(), Arc::new(MemoryStore::new()));
        state.login("kim@example.com", Some("Kim")).unwrap();

        assert!(matches!(
            state.generate_plan(None).await,
            Err(ApiError::ProfileMissing)
        ));
        state.save_profile(profile()).unwrap();

        let plan = state.generate_plan(None).await.unwrap();
        assert_eq!(plan.workout_days.len(), 2);
        assert_eq!(plan.nutrition_text.as_deref(), Some("Eat"));

        let status = state.log_set(0, 1, 5, 100.0).unwrap();
        assert_eq!(status.exercise_name, "Squats");
        assert_eq!(status.current_set, 2);
        assert_eq!(status.completed_sets, 1);

        let status = state.log_set(0, 1, 5, 100.0).unwrap();
        assert!(status.done);

        let status = state.undo_set(0, 1).unwrap();
        assert_eq!(status.completed_sets, 1);
        assert!(!status.done);

        let report = state.progress().unwrap();
        assert_eq!(report.stats.total_volume, 500.0);

        let status = state.clear_exercise_log(0, 1).unwrap();
        assert_eq!(status.current_set, 1);
        assert_eq!(status.completed_sets, 0);

        assert!(matches!(
            state.log_set(1, 0, 5, 100.0),
            Err(ApiError::ExerciseNotFound { day: 1, exercise: 0 })
        ));
    }

    #[tokio::test]
    async fn test_plan_service_failure_surfaces_as_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/plan")
            .with_status(503)
            .create_async()
            .await;

        let state = state_for(&server.url(), Arc::new(MemoryStore::new()));
        state.login("kim@example.com", None).unwrap();
        state.save_profile(profile()).unwrap();

        let err = state.generate_plan(None).await.unwrap_err();
        assert!(matches!(err, ApiError::PlanService(_)));
        assert!(matches!(state.current_plan(), Err(ApiError::PlanMissing)));
    }

    #[tokio::test]
    async fn test_feedback_updates_weight_and_history() {
        let server = plan_server().await;
        let state = state_for(&server.url(), Arc::new(MemoryStore::new()));
        state.login("kim@example.com", None).unwrap();
        state.save_profile(profile()).unwrap();

        let feedback = WeeklyFeedback {
            workout_difficulty: Difficulty::TooEasy,
            enjoyment_rating: 5,
            progress_notes: "more squats".to_string(),
            current_weight: Some(78.5),
            week_ending_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
        };
        let plan = state.submit_feedback(feedback.clone()).await.unwrap();

        assert!(!plan.workout_days.is_empty());
        assert_eq!(state.profile().unwrap().weight_kg, Some(78.5));
        assert_eq!(state.stores.profile.load().unwrap().weight_kg, Some(78.5));
        assert_eq!(state.feedback_history().unwrap(), vec![feedback]);
    }

    #[tokio::test]
    async fn test_invalid_feedback_is_rejected_before_any_write() {
        let state = state_for("http://localhost:1", Arc::new(MemoryStore::new()));
        state.login("kim@example.com", None).unwrap();
        state.save_profile(profile()).unwrap();

        let feedback = WeeklyFeedback {
            workout_difficulty: Difficulty::JustRight,
            enjoyment_rating: 0,
            progress_notes: String::new(),
            current_weight: None,
            week_ending_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
        };
        assert!(matches!(
            state.submit_feedback(feedback).await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(state.feedback_history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_drops_plan_and_user() {
        let server = plan_server().await;
        let state = state_for(&server.url(), Arc::new(MemoryStore::new()));
        state.login("kim@example.com", None).unwrap();
        state.save_profile(profile()).unwrap();
        state.generate_plan(None).await.unwrap();

        state.logout().unwrap();
        assert!(matches!(state.current_user(), Err(ApiError::NotLoggedIn)));
        assert_eq!(state.stores.session.load(), None);

        state.login("kim@example.com", None).unwrap();
        assert!(matches!(state.current_plan(), Err(ApiError::PlanMissing)));
        // the profile outlives the session
        assert!(state.profile().is_ok());
    }

    #[test]
    fn test_log_workout_and_exercise_progress() {
        let state = state_for("http://localhost:1", Arc::new(MemoryStore::new()));
        state.login("kim@example.com", None).unwrap();

        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        state
            .log_workout("Bench Press", Some(first), &[(10, 50.0)])
            .unwrap();
        state
            .log_workout("Bench Press", Some(second), &[(10, 50.0), (10, 50.0)])
            .unwrap();

        assert!(matches!(
            state.log_workout(" ", Some(first), &[(1, 1.0)]),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            state.log_workout("Row", Some(first), &[]),
            Err(ApiError::InvalidInput(_))
        ));

        let progress = state.exercise_progress("Bench Press").unwrap();
        assert_eq!(progress.series.len(), 2);
        assert_eq!(progress.summary.progress_percent, Some(100.0));
        assert_eq!(progress.summary.best_volume, 1000.0);

        let report = state.progress().unwrap();
        assert_eq!(report.stats.total_workouts, 2);
        assert_eq!(report.stats.last_workout, Some(second));
    }
}
