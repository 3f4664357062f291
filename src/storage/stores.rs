use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::models::feedback::WeeklyFeedback;
use crate::models::log::WorkoutLog;
use crate::models::profile::{Profile, User};
use crate::storage::{KeyValueStore, StoreError};

const PROFILE_KEY: &str = "userProfileData";
const USER_KEY: &str = "user";
const WORKOUT_LOGS_KEY: &str = "workoutLogs";
const FEEDBACK_KEY: &str = "weeklyFeedback";

/// A typed value living under one key. Reads never fail: absent, unreadable
/// or corrupt content comes back as `T::default()`.
pub struct JsonSlot<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonSlot<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _value: PhantomData,
        }
    }
}

impl<T> JsonSlot<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _value: PhantomData,
        }
    }

    pub fn load(&self) -> T {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "storage.read_failed");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "storage.corrupt_value");
                T::default()
            }
        }
    }

    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: self.key.to_string(),
            source,
        })?;
        self.store.set(self.key, &json)?;
        tracing::debug!(key = self.key, bytes = json.len(), "storage.saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(self.key)
    }
}

pub type ProfileStore = JsonSlot<Option<Profile>>;
pub type SessionStore = JsonSlot<Option<User>>;
pub type WorkoutLogStore = JsonSlot<WorkoutLog>;
pub type FeedbackStore = JsonSlot<Vec<WeeklyFeedback>>;

/// Every typed store the app uses, sharing one backend.
#[derive(Clone)]
pub struct Stores {
    pub profile: ProfileStore,
    pub session: SessionStore,
    pub workout_log: WorkoutLogStore,
    pub feedback: FeedbackStore,
}

impl Stores {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            profile: JsonSlot::new(Arc::clone(&backend), PROFILE_KEY),
            session: JsonSlot::new(Arc::clone(&backend), USER_KEY),
            workout_log: JsonSlot::new(Arc::clone(&backend), WORKOUT_LOGS_KEY),
            feedback: JsonSlot::new(backend, FEEDBACK_KEY),
        }
    }
}
