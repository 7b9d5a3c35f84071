use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use eyecare_common::{
    keys,
    types::{
        clamp_health_score, BlinkRateEntry, ExerciseEntry, MonthlyProgressData, ProgressData,
        ScreenTimeCategory, ScreenTimeEntry, WeeklyActivityData, DEFAULT_HEALTH_SCORE,
        HISTORY_LIMIT,
    },
};
use eyecare_db::StorageService;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    calendar::{self, WeekBounds},
    clock::SharedClock,
    health_score::{self, HealthScoreBreakdown, HealthScoreInputs},
    user_service::UserService,
};

/// Activity logs, the weekly bucket and monthly rollups.
#[derive(Clone)]
pub struct AnalyticsService {
    storage: StorageService,
    clock: SharedClock,
    users: UserService,
    progress: Arc<RwLock<Option<ProgressData>>>,
}

impl AnalyticsService {
    pub async fn new(storage: StorageService, clock: SharedClock, users: UserService) -> Self {
        let progress = storage.load::<ProgressData>(keys::PROGRESS_DATA).await;
        if progress.is_none() {
            debug!("No stored progress data");
        }

        let service = Self { storage, clock, users, progress: Arc::new(RwLock::new(progress)) };
        service.ensure_progress().await;
        service
    }

    /// Create the progress record once a user exists. Returns whether one is present.
    async fn ensure_progress(&self) -> bool {
        let mut progress = self.progress.write().await;
        if progress.is_some() {
            return true;
        }

        let Some(user) = self.users.current_user().await else {
            return false;
        };

        let now = self.clock.now();
        let bounds = calendar::week_of(now);
        let score = user.stats.health_score;
        let week = WeeklyActivityData::new(bounds.start, bounds.end, bounds.first_day, score);
        let created = ProgressData::new(user.id.clone(), self.clock.now_utc(), score, week);

        self.storage.save(keys::PROGRESS_DATA, &created).await;
        info!("Initialized progress data for user {}", user.id);
        *progress = Some(created);
        true
    }

    async fn persist(&self) {
        if let Some(progress) = self.progress.read().await.as_ref() {
            self.storage.save(keys::PROGRESS_DATA, progress).await;
        }
    }

    /// Install the current week's bucket if the stored one no longer covers it.
    ///
    /// When the outgoing bucket started in a different month than the new week,
    /// it is folded into that month's summary first.
    pub async fn start_new_week(&self) -> bool {
        if !self.ensure_progress().await {
            return false;
        }

        let bounds = calendar::week_of(self.clock.now());

        let mut guard = self.progress.write().await;
        let Some(progress) = guard.as_mut() else {
            return false;
        };

        if progress.weekly_activity.covers(bounds.start, bounds.end) {
            return true;
        }

        let outgoing = calendar::month_year(progress.weekly_activity.start_date);
        if outgoing != calendar::month_year(bounds.start) {
            self.finalize_month(progress).await;
        }

        self.install_week(progress, bounds);
        self.storage.save(keys::PROGRESS_DATA, &*progress).await;
        true
    }

    fn install_week(&self, progress: &mut ProgressData, bounds: WeekBounds) {
        let seed =
            if progress.health_score > 0 { progress.health_score } else { DEFAULT_HEALTH_SCORE };
        progress.weekly_activity =
            WeeklyActivityData::new(bounds.start, bounds.end, bounds.first_day, seed);
        progress.trim_logs(HISTORY_LIMIT);

        info!("Started new week beginning {}", bounds.first_day);
    }

    /// Merge the outgoing week into its month's summary, creating the summary if needed.
    async fn finalize_month(&self, progress: &ProgressData) {
        let (month, year) = calendar::month_year(progress.weekly_activity.start_date);
        let key = keys::monthly_progress();
        let mut months: Vec<MonthlyProgressData> =
            self.storage.load(&key).await.unwrap_or_default();

        let week = progress.weekly_activity.clone();
        let mut summary = match months.iter().position(|m| m.month == month && m.year == year) {
            Some(index) => {
                let mut existing = months.remove(index);
                existing.absorb_week(week);
                existing
            }
            None => MonthlyProgressData::new(month, year, week),
        };

        if let Some(user) = self.users.current_user().await {
            summary.record_streak(user.stats.streak);
        }
        if let Some(top) = most_performed_exercise(&progress.daily_exercises, month, year) {
            summary.most_performed_exercise = Some(top);
        }

        info!(
            "Finalized {}/{}: {} weeks, {:.1} minutes of exercise",
            month,
            year,
            summary.weekly_data.len(),
            summary.total_exercise_time
        );

        months.push(summary);
        self.storage.save(&key, &months).await;
    }

    /// Append an exercise to the log and today's bucket entry, then update the profile.
    pub async fn record_exercise(
        &self,
        exercise_id: &str,
        duration_seconds: u64,
        completed: bool,
    ) -> bool {
        if !self.start_new_week().await {
            warn!("Cannot record exercise without a user profile");
            return false;
        }

        let now = self.clock.now_utc();
        let minutes = duration_seconds as f64 / 60.0;
        let index = calendar::weekday_index(self.clock.today());

        {
            let mut guard = self.progress.write().await;
            let Some(progress) = guard.as_mut() else {
                return false;
            };

            progress.daily_exercises.push(ExerciseEntry {
                exercise_id: exercise_id.to_string(),
                duration_seconds,
                completed,
                time_of_day: now,
            });

            let day = &mut progress.weekly_activity.daily_data[index];
            day.exercise_time += minutes;
            day.exercises_completed += 1;
            progress.weekly_activity.total_exercise_time += minutes;
        }

        self.users.log_exercise(duration_seconds).await;
        self.persist().await;

        debug!("Recorded exercise {} ({}s)", exercise_id, duration_seconds);
        true
    }

    /// Log a block of screen time ending now. Durations that cannot be placed on the
    /// calendar are rejected.
    pub async fn record_screen_time(&self, minutes: f64, category: ScreenTimeCategory) -> bool {
        if !minutes.is_finite() {
            warn!("Ignoring screen time of {} minutes", minutes);
            return false;
        }

        let minutes = minutes.max(0.0);
        let end_time = self.clock.now_utc();
        let Some(start_time) = Duration::try_milliseconds((minutes * 60_000.0).round() as i64)
            .and_then(|span| end_time.checked_sub_signed(span))
        else {
            warn!("Ignoring screen time of {} minutes", minutes);
            return false;
        };

        if !self.start_new_week().await {
            warn!("Cannot record screen time without a user profile");
            return false;
        }

        {
            let mut guard = self.progress.write().await;
            let Some(progress) = guard.as_mut() else {
                return false;
            };
            progress.screen_time.push(ScreenTimeEntry {
                start_time,
                end_time,
                duration_minutes: minutes,
                category: Some(category),
            });
        }

        self.users.log_screen_time(minutes).await;
        self.persist().await;

        debug!("Recorded {:.1} minutes of screen time", minutes);
        true
    }

    pub async fn record_blink_rate(&self, rate: f64, duration_seconds: u64) -> bool {
        if !rate.is_finite() {
            warn!("Ignoring blink rate {}", rate);
            return false;
        }

        if !self.start_new_week().await {
            warn!("Cannot record blink rate without a user profile");
            return false;
        }

        let rate = rate.max(0.0);

        {
            let mut guard = self.progress.write().await;
            let Some(progress) = guard.as_mut() else {
                return false;
            };
            progress.blink_rate.push(BlinkRateEntry {
                time_recorded: self.clock.now_utc(),
                rate,
                duration_seconds,
            });
        }

        self.users.update_blink_rate(rate).await;
        self.persist().await;

        debug!("Recorded blink rate {:.1}/min", rate);
        true
    }

    /// Score today's activity without storing anything.
    pub async fn compute_health_score(&self) -> Option<HealthScoreBreakdown> {
        let user = self.users.current_user().await?;
        let guard = self.progress.read().await;
        let progress = guard.as_ref()?;
        let today = self.clock.today();

        let exercises_today = progress
            .daily_exercises
            .iter()
            .filter(|e| calendar::local_date(e.time_of_day) == today)
            .count() as u32;

        let screen_time_today: f64 = progress
            .screen_time
            .iter()
            .filter(|e| calendar::local_date(e.start_time) == today)
            .map(|e| e.duration_minutes)
            .sum();

        let inputs = HealthScoreInputs {
            exercises_today,
            exercise_goal: user.daily_goals.exercises,
            screen_time_today,
            screen_time_limit: user.daily_goals.screen_time_limit,
            blink_rates: progress.blink_rate.iter().map(|b| b.rate).collect(),
            streak: user.stats.streak,
        };

        Some(health_score::compute(&inputs))
    }

    /// Store a score on the progress record, today's bucket entry and the user profile.
    pub async fn commit_health_score(&self, score: i64) -> bool {
        let score = clamp_health_score(score);
        let today = self.clock.today();

        {
            let mut guard = self.progress.write().await;
            let Some(progress) = guard.as_mut() else {
                return false;
            };

            progress.health_score = score;

            let day = &mut progress.weekly_activity.daily_data[calendar::weekday_index(today)];
            if day.date == today {
                day.health_score = score;
            } else {
                warn!("Weekly bucket does not cover {}, skipping daily score", today);
            }
            progress.weekly_activity.recompute_average();
        }

        self.users.update_health_score(score as i64).await;
        self.persist().await;

        info!("Health score updated to {}", score);
        true
    }

    /// Compute today's score, commit it and return the breakdown that was stored.
    pub async fn score_today(&self) -> Option<HealthScoreBreakdown> {
        if !self.start_new_week().await {
            return None;
        }

        let breakdown = self.compute_health_score().await?;
        self.commit_health_score(breakdown.total() as i64).await;
        Some(breakdown)
    }

    /// Compute today's score and commit it. Returns 0 when there is no user.
    pub async fn calculate_health_score(&self) -> u32 {
        self.score_today().await.map(|b| b.total()).unwrap_or(0)
    }

    pub async fn progress_data(&self) -> Option<ProgressData> {
        self.progress.read().await.clone()
    }

    pub async fn weekly_activity(&self) -> Option<WeeklyActivityData> {
        self.progress.read().await.as_ref().map(|p| p.weekly_activity.clone())
    }

    pub async fn all_monthly_data(&self) -> Vec<MonthlyProgressData> {
        self.storage.load(&keys::monthly_progress()).await.unwrap_or_default()
    }

    /// Summary for a calendar month (1-12).
    pub async fn monthly_data(&self, month: u32, year: i32) -> Option<MonthlyProgressData> {
        self.all_monthly_data().await.into_iter().find(|m| m.month == month && m.year == year)
    }

    /// Drop all progress and monthly data, then start over from the current user.
    pub async fn reset(&self) {
        {
            let mut progress = self.progress.write().await;
            *progress = None;
        }
        self.storage.remove(keys::PROGRESS_DATA).await;
        self.storage.remove(&keys::monthly_progress()).await;

        self.ensure_progress().await;
        info!("Progress data reset");
    }
}

/// Most frequently logged exercise id within a month. Ties go to the smallest id.
pub fn most_performed_exercise(
    entries: &[ExerciseEntry],
    month: u32,
    year: i32,
) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries.iter().filter(|e| calendar::month_year(e.time_of_day) == (month, year)) {
        *counts.entry(entry.exercise_id.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(id, _)| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{NaiveDate, NaiveDateTime};
    use eyecare_common::types::DAYS_PER_WEEK;

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    async fn setup(clock: Arc<ManualClock>) -> (AnalyticsService, UserService, StorageService) {
        let storage = StorageService::in_memory();
        let users = UserService::new(storage.clone(), clock.clone()).await;
        users.create_user("Ada", None).await;
        let analytics = AnalyticsService::new(storage.clone(), clock, users.clone()).await;
        (analytics, users, storage)
    }

    #[tokio::test]
    async fn test_no_user_means_no_progress() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let storage = StorageService::in_memory();
        let users = UserService::new(storage.clone(), clock.clone()).await;
        let analytics = AnalyticsService::new(storage, clock, users).await;

        assert!(!analytics.start_new_week().await);
        assert!(!analytics.record_exercise("x", 60, true).await);
        assert!(analytics.compute_health_score().await.is_none());
        assert_eq!(analytics.calculate_health_score().await, 0);
    }

    #[tokio::test]
    async fn test_weekly_bucket_has_seven_consecutive_days() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock).await;

        let week = analytics.weekly_activity().await.unwrap();
        assert_eq!(week.daily_data.len(), DAYS_PER_WEEK);

        let first = NaiveDate::from_ymd_opt(2026, 10, 11).unwrap();
        for (i, day) in week.daily_data.iter().enumerate() {
            assert_eq!(day.date, first + Duration::days(i as i64));
        }
        assert_eq!(week.daily_data[0].health_score, DEFAULT_HEALTH_SCORE);
        assert!(week.daily_data[1..].iter().all(|d| d.health_score == 0));
    }

    #[tokio::test]
    async fn test_start_new_week_is_idempotent() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock).await;

        assert!(analytics.start_new_week().await);
        let first = analytics.progress_data().await;
        assert!(analytics.start_new_week().await);

        assert_eq!(analytics.progress_data().await, first);
    }

    #[tokio::test]
    async fn test_record_exercise_updates_today() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, users, _) = setup(clock).await;

        assert!(analytics.record_exercise("quick", 120, true).await);

        let progress = analytics.progress_data().await.unwrap();
        assert_eq!(progress.daily_exercises.len(), 1);

        let wednesday = &progress.weekly_activity.daily_data[3];
        assert_eq!(wednesday.exercises_completed, 1);
        assert!((wednesday.exercise_time - 2.0).abs() < 1e-9);
        assert!((progress.weekly_activity.total_exercise_time - 2.0).abs() < 1e-9);

        assert_eq!(users.current_user().await.unwrap().stats.exercises_completed, 1);
    }

    #[tokio::test]
    async fn test_screen_time_entry_spans_duration() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock).await;

        analytics.record_screen_time(30.0, ScreenTimeCategory::Work).await;

        let entry = analytics.progress_data().await.unwrap().screen_time[0].clone();
        assert_eq!(entry.end_time - entry.start_time, Duration::minutes(30));
        assert_eq!(entry.category, Some(ScreenTimeCategory::Work));
    }

    #[tokio::test]
    async fn test_out_of_range_readings_are_rejected() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, users, _) = setup(clock).await;

        assert!(!analytics.record_screen_time(1e12, ScreenTimeCategory::Work).await);
        assert!(!analytics.record_screen_time(f64::INFINITY, ScreenTimeCategory::Other).await);
        assert!(!analytics.record_screen_time(f64::NAN, ScreenTimeCategory::Other).await);
        assert!(!analytics.record_blink_rate(f64::NAN, 60).await);

        let progress = analytics.progress_data().await.unwrap();
        assert!(progress.screen_time.is_empty());
        assert!(progress.blink_rate.is_empty());
        let stats = users.current_user().await.unwrap().stats;
        assert!((stats.screen_time - 120.0).abs() < 1e-9);
        assert!((stats.blink_rate - 15.0).abs() < 1e-9);

        // A long but representable block is still logged
        assert!(analytics.record_screen_time(600.0, ScreenTimeCategory::Work).await);
    }

    #[tokio::test]
    async fn test_week_rollover_resets_bucket_and_keeps_logs() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock.clone()).await;

        analytics.record_exercise("quick", 60, true).await;
        clock.advance(Duration::days(7));
        analytics.record_exercise("quick", 60, true).await;

        let progress = analytics.progress_data().await.unwrap();
        assert_eq!(progress.daily_exercises.len(), 2);
        assert_eq!(
            progress.weekly_activity.daily_data[0].date,
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert!((progress.weekly_activity.total_exercise_time - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rollover_trims_logs() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock.clone()).await;

        for _ in 0..(HISTORY_LIMIT + 10) {
            analytics.record_blink_rate(16.0, 60).await;
        }
        clock.advance(Duration::days(7));
        analytics.start_new_week().await;

        assert_eq!(analytics.progress_data().await.unwrap().blink_rate.len(), HISTORY_LIMIT);
    }

    #[tokio::test]
    async fn test_month_change_creates_one_summary() {
        // Wednesday 2026-10-28; the next week opens on Sunday 2026-11-01
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 28)));
        let (analytics, _, _) = setup(clock.clone()).await;

        analytics.record_exercise("palming", 120, true).await;
        analytics.record_exercise("quick", 60, true).await;
        analytics.record_exercise("palming", 60, true).await;

        clock.set_local(noon(2026, 11, 2));
        assert!(analytics.start_new_week().await);
        assert!(analytics.start_new_week().await);

        let months = analytics.all_monthly_data().await;
        assert_eq!(months.len(), 1);

        let october = analytics.monthly_data(10, 2026).await.unwrap();
        assert_eq!(october.weekly_data.len(), 1);
        assert!((october.total_exercise_time - 4.0).abs() < 1e-9);
        assert_eq!(october.most_performed_exercise.as_deref(), Some("palming"));
        assert_eq!(october.longest_streak, 1);
        assert!(analytics.monthly_data(11, 2026).await.is_none());
    }

    #[tokio::test]
    async fn test_commit_health_score_updates_everything() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, users, storage) = setup(clock).await;

        assert!(analytics.commit_health_score(130).await);

        let progress = analytics.progress_data().await.unwrap();
        assert_eq!(progress.health_score, 100);
        assert_eq!(progress.weekly_activity.daily_data[3].health_score, 100);
        // Sunday seed 70 and Wednesday 100
        assert!((progress.weekly_activity.average_health_score - 85.0).abs() < 1e-9);
        assert_eq!(users.current_user().await.unwrap().stats.health_score, 100);
        assert_eq!(storage.load::<ProgressData>(keys::PROGRESS_DATA).await, Some(progress));
    }

    #[tokio::test]
    async fn test_calculate_health_score_for_a_good_day() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, users, _) = setup(clock).await;

        for _ in 0..3 {
            analytics.record_exercise("quick", 60, true).await;
        }
        analytics.record_blink_rate(17.0, 60).await;
        for _ in 0..14 {
            users.increment_streak().await;
        }

        // 30 exercise + 30 screen time + 20 blink rate + 20 streak
        assert_eq!(analytics.calculate_health_score().await, 100);
        assert_eq!(users.current_user().await.unwrap().stats.health_score, 100);
    }

    #[tokio::test]
    async fn test_score_today_reports_the_committed_breakdown() {
        // Saturday; the stored bucket goes stale once the clock reaches Sunday
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 17)));
        let (analytics, users, _) = setup(clock.clone()).await;
        analytics.record_exercise("quick", 60, true).await;

        clock.advance(Duration::days(1));
        let breakdown = analytics.score_today().await.unwrap();

        // Yesterday's exercise no longer counts toward today
        assert_eq!(breakdown.exercise, 0);
        let stored = users.current_user().await.unwrap().stats.health_score;
        assert_eq!(stored, breakdown.total());
        let week = analytics.weekly_activity().await.unwrap();
        assert_eq!(week.daily_data[0].health_score, breakdown.total());
    }

    #[tokio::test]
    async fn test_compute_health_score_is_pure() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock).await;
        let before = analytics.progress_data().await;

        let breakdown = analytics.compute_health_score().await.unwrap();
        assert_eq!(breakdown.blink_rate, 10);

        assert_eq!(analytics.progress_data().await, before);
    }

    #[tokio::test]
    async fn test_reset_starts_over() {
        let clock = Arc::new(ManualClock::at_local(noon(2026, 10, 14)));
        let (analytics, _, _) = setup(clock).await;
        analytics.record_exercise("quick", 60, true).await;
        let old_id = analytics.progress_data().await.unwrap().id;

        analytics.reset().await;

        let progress = analytics.progress_data().await.unwrap();
        assert_ne!(progress.id, old_id);
        assert!(progress.daily_exercises.is_empty());
        assert!(analytics.all_monthly_data().await.is_empty());
    }

    #[test]
    fn test_most_performed_exercise_ties_and_months() {
        let at = |d: u32| calendar_noon_utc(2026, 10, d);
        let entry = |id: &str, d: u32| ExerciseEntry {
            exercise_id: id.to_string(),
            duration_seconds: 60,
            completed: true,
            time_of_day: at(d),
        };

        let entries = vec![entry("b", 1), entry("a", 2), entry("b", 3), entry("a", 4)];
        assert_eq!(most_performed_exercise(&entries, 10, 2026).as_deref(), Some("a"));
        assert_eq!(most_performed_exercise(&entries, 11, 2026), None);
    }

    fn calendar_noon_utc(y: i32, m: u32, d: u32) -> chrono::DateTime<chrono::Utc> {
        use crate::clock::Clock;
        ManualClock::at_local(noon(y, m, d)).now_utc()
    }
}
