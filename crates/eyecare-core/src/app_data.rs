//! Application facade.
//!
//! Wires the storage gateway and the three services together and exposes the
//! operations a front end needs. Construction either yields a fully ready
//! facade or a single [`Error::Initialization`].

use eyecare_common::{
    keys,
    types::{
        DailyGoal, DailyGoalProgress, Exercise, ExerciseSession, GoalsUpdate,
        MonthlyProgressData, ScreenTimeCategory, SettingsUpdate, UserProfile, UserSettings,
        WeeklyActivityData,
    },
    Error, Result,
};
use eyecare_db::StorageService;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    analytics_service::AnalyticsService,
    clock::SharedClock,
    config::AppConfig,
    exercise_service::{ExerciseService, SessionCompletion},
    health_score::HealthScoreBreakdown,
    user_service::UserService,
};

/// Everything a front end renders on its main screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub user: Option<UserProfile>,
    pub exercises: Vec<Exercise>,
    pub weekly_activity: Option<WeeklyActivityData>,
    pub health_score: u32,
}

#[derive(Clone)]
pub struct AppData {
    storage: StorageService,
    exercises: ExerciseService,
    users: UserService,
    analytics: AnalyticsService,
}

impl AppData {
    /// Open storage as configured and initialize on top of it.
    pub async fn open(config: &AppConfig, clock: SharedClock) -> Result<Self> {
        let storage = StorageService::open(&config.storage).await;
        Self::initialize(storage, clock).await
    }

    /// Like [`AppData::open`], but fails instead of falling back to memory-only storage.
    pub async fn connect(config: &AppConfig, clock: SharedClock) -> Result<Self> {
        let storage = StorageService::connect(&config.storage).await.map_err(|e| {
            error!("Durable storage unavailable: {}", e);
            Error::Initialization(Error::from(e).to_string())
        })?;
        Self::initialize(storage, clock).await
    }

    pub async fn initialize(storage: StorageService, clock: SharedClock) -> Result<Self> {
        info!("Initializing app data (durable storage: {})", storage.is_durable());

        let exercises = ExerciseService::new(storage.clone(), clock.clone()).await;
        let users = UserService::new(storage.clone(), clock.clone()).await;
        let analytics = AnalyticsService::new(storage.clone(), clock, users.clone()).await;

        let app = Self { storage, exercises, users, analytics };
        if let Err(e) = app.check_ready().await {
            error!("App data initialization failed: {}", e);
            return Err(Error::Initialization(e.to_string()));
        }

        if app.users.has_user().await {
            app.users.record_login().await;
        }

        info!("App data ready");
        Ok(app)
    }

    async fn check_ready(&self) -> Result<()> {
        if self.exercises.list_exercises().await.is_empty() {
            return Err(Error::Storage("exercise catalog is empty".to_string()));
        }

        let has_user = self.users.has_user().await;
        if self.analytics.start_new_week().await != has_user {
            return Err(Error::Storage("progress data does not match the user profile".to_string()));
        }

        Ok(())
    }

    pub fn exercise_service(&self) -> &ExerciseService {
        &self.exercises
    }

    pub fn user_service(&self) -> &UserService {
        &self.users
    }

    pub fn analytics_service(&self) -> &AnalyticsService {
        &self.analytics
    }

    pub fn is_durable(&self) -> bool {
        self.storage.is_durable()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let user = self.users.current_user().await;
        let health_score = user.as_ref().map(|u| u.stats.health_score).unwrap_or(0);

        AppSnapshot {
            user,
            exercises: self.exercises.list_exercises().await,
            weekly_activity: self.analytics.weekly_activity().await,
            health_score,
        }
    }

    /// Roll the week forward if needed and return a fresh snapshot.
    pub async fn refresh(&self) -> AppSnapshot {
        self.analytics.start_new_week().await;
        self.snapshot().await
    }

    pub async fn create_user(&self, name: &str, email: Option<String>) -> Result<UserProfile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("user name must not be empty".to_string()));
        }

        let user = self.users.create_user(name, email).await;
        // The aggregator's record belongs to the previous user, if any.
        self.analytics.reset().await;
        Ok(user)
    }

    pub async fn update_user_settings(&self, update: SettingsUpdate) -> Result<UserSettings> {
        self.users.update_settings(update).await.ok_or(Error::NoUser)
    }

    pub async fn update_daily_goals(&self, update: GoalsUpdate) -> Result<DailyGoal> {
        self.users.update_goals(update).await.ok_or(Error::NoUser)
    }

    pub async fn daily_goal_progress(&self) -> Result<DailyGoalProgress> {
        self.users.daily_goal_progress().await.ok_or(Error::NoUser)
    }

    pub async fn exercises(&self) -> Vec<Exercise> {
        self.exercises.list_exercises().await
    }

    pub async fn get_exercise(&self, id: &str) -> Option<Exercise> {
        self.exercises.get_exercise(id).await
    }

    pub async fn start_exercise_session(&self, exercise_id: &str) -> Result<ExerciseSession> {
        self.exercises.start_session(exercise_id).await
    }

    /// Complete a session, feed it into the aggregator and rescore the day.
    ///
    /// `completed` is false when the user stopped before the end; the session is still
    /// closed but the log entry is marked partial. A session that was already completed
    /// is returned unchanged and recorded nowhere.
    pub async fn complete_exercise_session(
        &self,
        session_id: &str,
        completed: bool,
    ) -> Result<ExerciseSession> {
        let completion = self
            .exercises
            .complete_session(session_id)
            .await
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let session = match completion {
            SessionCompletion::Completed(session) => session,
            SessionCompletion::AlreadyCompleted(session) => return Ok(session),
        };

        self.analytics.record_exercise(&session.exercise_id, session.duration, completed).await;
        self.analytics.calculate_health_score().await;
        Ok(session)
    }

    pub async fn record_exercise(
        &self,
        exercise_id: &str,
        duration_seconds: u64,
        completed: bool,
    ) -> bool {
        self.analytics.record_exercise(exercise_id, duration_seconds, completed).await
    }

    pub async fn record_screen_time(&self, minutes: f64, category: ScreenTimeCategory) -> bool {
        self.analytics.record_screen_time(minutes, category).await
    }

    pub async fn record_blink_rate(&self, rate: f64, duration_seconds: u64) -> bool {
        self.analytics.record_blink_rate(rate, duration_seconds).await
    }

    pub async fn calculate_health_score(&self) -> u32 {
        self.analytics.calculate_health_score().await
    }

    /// Like [`AppData::calculate_health_score`], returning the stored components.
    pub async fn score_today(&self) -> Option<HealthScoreBreakdown> {
        self.analytics.score_today().await
    }

    pub async fn preview_health_score(&self) -> Option<HealthScoreBreakdown> {
        self.analytics.compute_health_score().await
    }

    pub async fn weekly_activity(&self) -> Option<WeeklyActivityData> {
        self.analytics.weekly_activity().await
    }

    pub async fn monthly_data(&self, month: u32, year: i32) -> Option<MonthlyProgressData> {
        self.analytics.monthly_data(month, year).await
    }

    pub async fn recent_sessions(&self, limit: usize) -> Vec<ExerciseSession> {
        self.exercises.recent_sessions(limit).await
    }

    /// Wipe activity, sessions and stats. The user's identity, settings and goals stay.
    pub async fn reset_all_data(&self) {
        let mut cleared = keys::all();
        cleared.retain(|k| k != keys::USER && k != keys::SETTINGS);
        self.storage.clear_all(&cleared).await;

        self.users.reset_stats().await;
        self.exercises.reset().await;
        self.analytics.reset().await;

        info!("All activity data reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, NaiveDate};
    use eyecare_common::types::ExerciseType;
    use std::sync::Arc;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::at_local(
            NaiveDate::from_ymd_opt(2026, 10, 14).unwrap().and_hms_opt(12, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_initialize_without_user() {
        let app = AppData::initialize(StorageService::in_memory(), clock()).await.unwrap();

        let snapshot = app.snapshot().await;
        assert!(snapshot.user.is_none());
        assert_eq!(snapshot.exercises.len(), 11);
        assert!(snapshot.weekly_activity.is_none());
        assert_eq!(snapshot.health_score, 0);
    }

    #[tokio::test]
    async fn test_create_user_validates_name() {
        let app = AppData::initialize(StorageService::in_memory(), clock()).await.unwrap();

        assert!(matches!(app.create_user("  ", None).await, Err(Error::InvalidInput(_))));

        let user = app.create_user(" Ada ", None).await.unwrap();
        assert_eq!(user.name, "Ada");
        assert!(app.weekly_activity().await.is_some());
    }

    #[tokio::test]
    async fn test_settings_require_user() {
        let app = AppData::initialize(StorageService::in_memory(), clock()).await.unwrap();

        let result = app.update_user_settings(SettingsUpdate::default()).await;
        assert!(matches!(result, Err(Error::NoUser)));
    }

    #[tokio::test]
    async fn test_complete_session_flows_into_profile_and_score() {
        let clock = clock();
        let app = AppData::initialize(StorageService::in_memory(), clock.clone()).await.unwrap();
        app.create_user("Ada", None).await.unwrap();

        let quick = app.exercise_service().get_exercise_by_type(ExerciseType::Quick).await.unwrap();
        let session = app.start_exercise_session(&quick.id).await.unwrap();
        clock.advance(Duration::seconds(60));

        let completed = app.complete_exercise_session(&session.id, true).await.unwrap();
        assert_eq!(completed.duration, 60);

        let user = app.user_service().current_user().await.unwrap();
        assert_eq!(user.stats.exercises_completed, 1);
        // 10 exercise + 30 screen time + 10 blink rate + 2 streak
        assert_eq!(user.stats.health_score, 52);

        let again = app.complete_exercise_session(&session.id, true).await.unwrap();
        assert_eq!(again, completed);
        let user = app.user_service().current_user().await.unwrap();
        assert_eq!(user.stats.exercises_completed, 1);
    }

    #[tokio::test]
    async fn test_partial_exercises_are_logged_as_incomplete() {
        let clock = clock();
        let app = AppData::initialize(StorageService::in_memory(), clock.clone()).await.unwrap();
        app.create_user("Ada", None).await.unwrap();

        assert!(app.record_exercise("quick", 30, false).await);

        let yoga =
            app.exercise_service().get_exercise_by_type(ExerciseType::EyeYoga).await.unwrap();
        let session = app.start_exercise_session(&yoga.id).await.unwrap();
        clock.advance(Duration::seconds(20));
        let stopped = app.complete_exercise_session(&session.id, false).await.unwrap();
        assert!(stopped.completed);

        let entries = app.analytics_service().progress_data().await.unwrap().daily_exercises;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.completed));
        assert_eq!(entries[1].exercise_id, yoga.id);
        assert_eq!(entries[1].duration_seconds, 20);
    }

    #[tokio::test]
    async fn test_daily_goal_progress_requires_user() {
        let app = AppData::initialize(StorageService::in_memory(), clock()).await.unwrap();
        assert!(matches!(app.daily_goal_progress().await, Err(Error::NoUser)));

        app.create_user("Ada", None).await.unwrap();
        app.record_exercise("quick", 600, true).await;

        let progress = app.daily_goal_progress().await.unwrap();
        assert_eq!(progress.exercise_time, 100.0);
        assert_eq!(progress.screen_time, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_session_and_exercise() {
        let app = AppData::initialize(StorageService::in_memory(), clock()).await.unwrap();

        assert!(matches!(app.start_exercise_session("x").await, Err(Error::ExerciseNotFound(_))));
        assert!(matches!(
            app.complete_exercise_session("x", true).await,
            Err(Error::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_all_data_keeps_identity() {
        let app = AppData::initialize(StorageService::in_memory(), clock()).await.unwrap();
        let user = app.create_user("Ada", None).await.unwrap();
        app.record_exercise("quick", 120, true).await;
        app.calculate_health_score().await;

        app.reset_all_data().await;

        let after = app.user_service().current_user().await.unwrap();
        assert_eq!(after.id, user.id);
        assert_eq!(after.stats.exercises_completed, 0);
        assert!(after.achievements.iter().any(|a| a.title == "First Exercise" && a.is_unlocked));
        assert!(app.analytics_service().progress_data().await.unwrap().daily_exercises.is_empty());
        assert!(app.recent_sessions(10).await.is_empty());
    }
}
