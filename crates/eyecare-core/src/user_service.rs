use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use eyecare_common::{
    keys,
    types::{
        clamp_health_score, Achievement, DailyGoal, DailyGoalProgress, DailyProgress,
        GoalsUpdate, SettingsUpdate, UserProfile, UserSettings, UserStats, UserUpdate,
    },
};
use eyecare_db::StorageService;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{calendar, clock::SharedClock};

/// Weight kept from the previous smoothed value.
const PREVIOUS_WEIGHT: f64 = 0.7;
/// Weight given to a new sample.
const SAMPLE_WEIGHT: f64 = 0.3;

/// Exponential moving average used for blink rate and screen time.
pub fn smooth(previous: f64, sample: f64) -> f64 {
    previous * PREVIOUS_WEIGHT + sample * SAMPLE_WEIGHT
}

/// Single-user profile store.
#[derive(Clone)]
pub struct UserService {
    storage: StorageService,
    clock: SharedClock,
    current: Arc<RwLock<Option<UserProfile>>>,
}

impl UserService {
    pub async fn new(storage: StorageService, clock: SharedClock) -> Self {
        let current = storage.load::<UserProfile>(keys::USER).await;
        match &current {
            Some(user) => info!("Loaded user profile {}", user.id),
            None => debug!("No user profile stored yet"),
        }

        Self { storage, clock, current: Arc::new(RwLock::new(current)) }
    }

    async fn persist(&self, user: &UserProfile) {
        self.storage.save(keys::USER, user).await;
    }

    /// Apply `f` to the stored user and persist the result.
    async fn mutate<R>(&self, f: impl FnOnce(&mut UserProfile, DateTime<Utc>) -> R) -> Option<R> {
        let now = self.clock.now_utc();
        let mut current = self.current.write().await;
        let user = current.as_mut()?;
        let result = f(user, now);
        self.persist(user).await;
        Some(result)
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.current.read().await.clone()
    }

    pub async fn has_user(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Create the installation's user, replacing any previous one.
    pub async fn create_user(&self, name: &str, email: Option<String>) -> UserProfile {
        let user = UserProfile::new(name.to_string(), email, self.clock.now_utc());

        let mut current = self.current.write().await;
        self.persist(&user).await;
        *current = Some(user.clone());

        info!("Created user profile {} for {}", user.id, user.name);
        user
    }

    pub async fn update_user(&self, update: UserUpdate) -> Option<UserProfile> {
        self.mutate(|user, _| {
            if let Some(name) = update.name {
                user.name = name;
            }
            if let Some(email) = update.email {
                user.email = Some(email);
            }
            user.clone()
        })
        .await
    }

    pub async fn record_login(&self) -> Option<DateTime<Utc>> {
        self.mutate(|user, now| {
            user.last_login = now;
            now
        })
        .await
    }

    /// Merge a partial settings change. The merged settings are mirrored under their own key.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Option<UserSettings> {
        let settings = self
            .mutate(|user, _| {
                update.apply(&mut user.settings);
                user.settings.clone()
            })
            .await?;

        self.storage.save(keys::SETTINGS, &settings).await;
        Some(settings)
    }

    pub async fn update_goals(&self, update: GoalsUpdate) -> Option<DailyGoal> {
        self.mutate(|user, _| {
            update.apply(&mut user.daily_goals);
            user.daily_goals.clone()
        })
        .await
    }

    /// Count a finished exercise toward lifetime stats and today's progress.
    pub async fn log_exercise(&self, duration_seconds: u64) -> bool {
        let today = self.clock.today();
        let minutes = duration_seconds as f64 / 60.0;

        self.mutate(|user, now| {
            roll_daily_progress(&mut user.daily_goals, today, now);
            mark_active_day(&mut user.stats, today);

            user.stats.exercises_completed += 1;
            user.stats.total_exercise_time += minutes;

            let progress = &mut user.daily_goals.current_progress;
            progress.exercises_completed += 1;
            progress.exercise_time += minutes;
            user.daily_goals.last_updated = now;

            unlock_achievements(user, now);
        })
        .await
        .is_some()
    }

    pub async fn log_screen_time(&self, minutes: f64) -> bool {
        let today = self.clock.today();
        let minutes = minutes.max(0.0);

        self.mutate(|user, now| {
            roll_daily_progress(&mut user.daily_goals, today, now);

            user.daily_goals.current_progress.screen_time += minutes;
            user.daily_goals.last_updated = now;
            user.stats.screen_time = smooth(user.stats.screen_time, minutes);

            unlock_achievements(user, now);
        })
        .await
        .is_some()
    }

    /// Fold a blink-rate sample into the smoothed rate and return the new value.
    pub async fn update_blink_rate(&self, rate: f64) -> Option<f64> {
        let rate = rate.max(0.0);

        self.mutate(|user, _| {
            user.stats.blink_rate = smooth(user.stats.blink_rate, rate);
            user.stats.blink_rate
        })
        .await
    }

    /// Store a clamped health score and stamp the last calculation time.
    pub async fn update_health_score(&self, score: i64) -> Option<u32> {
        let clamped = clamp_health_score(score);

        let stamped = self
            .mutate(|user, now| {
                user.stats.health_score = clamped;
                user.stats.last_update_date = now;
                now
            })
            .await?;

        self.storage.save(keys::LAST_HEALTH_CALCULATION, &stamped).await;
        Some(clamped)
    }

    pub async fn last_health_calculation(&self) -> Option<DateTime<Utc>> {
        self.storage.load(keys::LAST_HEALTH_CALCULATION).await
    }

    pub async fn increment_streak(&self) -> Option<u32> {
        self.mutate(|user, now| {
            user.stats.streak += 1;
            unlock_achievements(user, now);
            user.stats.streak
        })
        .await
    }

    pub async fn reset_streak(&self) -> bool {
        self.mutate(|user, _| user.stats.streak = 0).await.is_some()
    }

    /// Today's goal percentages. Totals left over from an earlier day count as zero.
    pub async fn daily_goal_progress(&self) -> Option<DailyGoalProgress> {
        let mut goals = self.current_user().await?.daily_goals;
        if calendar::local_date(goals.last_updated) != self.clock.today() {
            goals.current_progress = DailyProgress::default();
        }
        Some(goals.progress())
    }

    pub async fn reset_daily_progress(&self) -> bool {
        self.mutate(|user, now| {
            user.daily_goals.current_progress = DailyProgress::default();
            user.daily_goals.last_updated = now;
        })
        .await
        .is_some()
    }

    /// Evaluate locked achievements and return the ones unlocked by this call.
    pub async fn check_achievements(&self) -> Vec<Achievement> {
        self.mutate(unlock_achievements).await.unwrap_or_default()
    }

    /// Back to default stats and an empty day. Identity, goals and unlocked achievements stay.
    pub async fn reset_stats(&self) -> bool {
        let reset = self
            .mutate(|user, now| {
                user.stats = UserStats::new(now);
                user.daily_goals.current_progress = DailyProgress::default();
                user.daily_goals.last_updated = now;
            })
            .await
            .is_some();

        if reset {
            self.storage.remove(keys::LAST_HEALTH_CALCULATION).await;
            info!("User stats reset");
        }
        reset
    }
}

/// Start a fresh `current_progress` when the last update fell on an earlier local day.
fn roll_daily_progress(goals: &mut DailyGoal, today: NaiveDate, now: DateTime<Utc>) {
    if calendar::local_date(goals.last_updated) != today {
        debug!("New day {}, resetting daily progress", today);
        goals.current_progress = DailyProgress::default();
        goals.last_updated = now;
    }
}

/// Track active days and the consecutive-day streak.
fn mark_active_day(stats: &mut UserStats, today: NaiveDate) {
    match stats.last_active_date {
        Some(last) if last == today => return,
        Some(last) if last + Duration::days(1) == today => stats.streak += 1,
        Some(_) => stats.streak = 1,
        None => stats.streak = stats.streak.max(1),
    }

    stats.days_active += 1;
    stats.last_active_date = Some(today);
}

fn unlock_achievements(user: &mut UserProfile, now: DateTime<Utc>) -> Vec<Achievement> {
    let stats = &user.stats;
    let unlocked: Vec<Achievement> = user
        .achievements
        .iter_mut()
        .filter_map(|a| a.try_unlock(stats, now).then(|| a.clone()))
        .collect();

    for achievement in &unlocked {
        info!("Achievement unlocked: {}", achievement.title);
    }
    unlocked
}
