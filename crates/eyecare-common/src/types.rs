use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

pub const MAX_HEALTH_SCORE: u32 = 100;
pub const DEFAULT_HEALTH_SCORE: u32 = 70;
pub const DEFAULT_BLINK_RATE: f64 = 15.0;
pub const DEFAULT_SCREEN_TIME_MINUTES: f64 = 120.0;

/// Number of entries each append-only progress log keeps across a week rollover.
pub const HISTORY_LIMIT: usize = 50;

pub const DAYS_PER_WEEK: usize = 7;

/// Clamp an arbitrary score into the valid health score range.
pub fn clamp_health_score(score: i64) -> u32 {
    score.clamp(0, MAX_HEALTH_SCORE as i64) as u32
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// User profile
// ============================================================================

/// The single user record of an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque identifier, assigned once at creation
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub settings: UserSettings,
    pub stats: UserStats,
    pub achievements: Vec<Achievement>,
    pub daily_goals: DailyGoal,
}

impl UserProfile {
    pub fn new(name: String, email: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name,
            email,
            created_at: now,
            last_login: now,
            settings: UserSettings::default(),
            stats: UserStats::new(now),
            achievements: default_achievements(),
            daily_goals: DailyGoal::new(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub notifications_enabled: bool,
    pub dark_mode_enabled: bool,
    pub reminders_enabled: bool,
    /// Reminder times in `HH:MM` format
    pub reminder_times: Vec<String>,
    pub preferred_exercise_types: Vec<ExerciseType>,
    pub work_duration_minutes: u32,
    pub break_duration_minutes: u32,
    pub language: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            dark_mode_enabled: false,
            reminders_enabled: true,
            reminder_times: ["09:00", "12:00", "15:00", "18:00"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            preferred_exercise_types: vec![
                ExerciseType::Quick,
                ExerciseType::Focusing,
                ExerciseType::EyeRolling,
            ],
            work_duration_minutes: 25,
            break_duration_minutes: 5,
            language: "en".to_string(),
        }
    }
}

/// Partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub notifications_enabled: Option<bool>,
    pub dark_mode_enabled: Option<bool>,
    pub reminders_enabled: Option<bool>,
    pub reminder_times: Option<Vec<String>>,
    pub preferred_exercise_types: Option<Vec<ExerciseType>>,
    pub work_duration_minutes: Option<u32>,
    pub break_duration_minutes: Option<u32>,
    pub language: Option<String>,
}

impl SettingsUpdate {
    pub fn apply(self, settings: &mut UserSettings) {
        if let Some(v) = self.notifications_enabled {
            settings.notifications_enabled = v;
        }
        if let Some(v) = self.dark_mode_enabled {
            settings.dark_mode_enabled = v;
        }
        if let Some(v) = self.reminders_enabled {
            settings.reminders_enabled = v;
        }
        if let Some(v) = self.reminder_times {
            settings.reminder_times = v;
        }
        if let Some(v) = self.preferred_exercise_types {
            settings.preferred_exercise_types = v;
        }
        if let Some(v) = self.work_duration_minutes {
            settings.work_duration_minutes = v;
        }
        if let Some(v) = self.break_duration_minutes {
            settings.break_duration_minutes = v;
        }
        if let Some(v) = self.language {
            settings.language = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Composite score, always within 0..=100
    pub health_score: u32,
    pub days_active: u32,
    /// Minutes of completed exercise
    pub total_exercise_time: f64,
    pub streak: u32,
    /// Smoothed blinks per minute
    pub blink_rate: f64,
    /// Smoothed daily screen time in minutes
    pub screen_time: f64,
    pub exercises_completed: u32,
    pub last_update_date: DateTime<Utc>,
    /// Local date of the last logged exercise
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
}

impl UserStats {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            health_score: DEFAULT_HEALTH_SCORE,
            days_active: 0,
            total_exercise_time: 0.0,
            streak: 0,
            blink_rate: DEFAULT_BLINK_RATE,
            screen_time: DEFAULT_SCREEN_TIME_MINUTES,
            exercises_completed: 0,
            last_update_date: now,
            last_active_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementKind {
    Streak,
    ExerciseCount,
    /// Satisfied when the smoothed screen time is at or below the threshold
    ScreenTime,
    TotalTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AchievementRequirement {
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub value: f64,
}

impl AchievementRequirement {
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match self.kind {
            AchievementKind::Streak => stats.streak as f64 >= self.value,
            AchievementKind::ExerciseCount => stats.exercises_completed as f64 >= self.value,
            AchievementKind::ScreenTime => stats.screen_time <= self.value,
            AchievementKind::TotalTime => stats.total_exercise_time >= self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// One-way flag: never reverts to false once set
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub requirement: AchievementRequirement,
}

impl Achievement {
    pub fn new(title: &str, description: &str, icon: &str, kind: AchievementKind, value: f64) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            is_unlocked: false,
            unlocked_at: None,
            requirement: AchievementRequirement { kind, value },
        }
    }

    /// Unlock if still locked and the requirement holds. Returns true when newly unlocked.
    pub fn try_unlock(&mut self, stats: &UserStats, now: DateTime<Utc>) -> bool {
        if self.is_unlocked || !self.requirement.is_met(stats) {
            return false;
        }
        self.is_unlocked = true;
        self.unlocked_at = Some(now);
        true
    }
}

pub fn default_achievements() -> Vec<Achievement> {
    use AchievementKind::*;

    vec![
        Achievement::new("3 Day Streak", "Use the app for 3 consecutive days", "🔥", Streak, 3.0),
        Achievement::new(
            "First Exercise",
            "Complete your first eye exercise",
            "⭐",
            ExerciseCount,
            1.0,
        ),
        Achievement::new(
            "1 Hour Total",
            "Complete 60 minutes of eye exercises",
            "🏆",
            TotalTime,
            60.0,
        ),
        Achievement::new(
            "Perfect Week",
            "Complete all daily goals for 7 consecutive days",
            "🥇",
            Streak,
            7.0,
        ),
        Achievement::new("Exercise Master", "Complete 50 eye exercises", "👁️", ExerciseCount, 50.0),
        Achievement::new(
            "Screen Time Hero",
            "Reduce average screen time below 2 hours",
            "📱",
            ScreenTime,
            120.0,
        ),
        Achievement::new(
            "Eye Care Pro",
            "Complete 5 hours of total eye exercises",
            "👑",
            TotalTime,
            300.0,
        ),
    ]
}

/// Running totals for the current day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub exercises_completed: u32,
    /// Minutes
    pub screen_time: f64,
    /// Minutes
    pub exercise_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoal {
    /// Exercises to complete per day
    pub exercises: u32,
    /// Screen time ceiling in minutes
    pub screen_time_limit: f64,
    /// Exercise minutes per day
    pub exercise_time: f64,
    pub current_progress: DailyProgress,
    pub last_updated: DateTime<Utc>,
}

impl DailyGoal {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            exercises: 3,
            screen_time_limit: 120.0,
            exercise_time: 10.0,
            current_progress: DailyProgress::default(),
            last_updated: now,
        }
    }

    /// Percentages of today's goals reached. A zero exercise goal counts as met; a zero
    /// screen time limit counts as unused.
    pub fn progress(&self) -> DailyGoalProgress {
        let done = &self.current_progress;

        let exercises = percent_of(done.exercises_completed as f64, self.exercises as f64);
        let exercise_time = percent_of(done.exercise_time, self.exercise_time);
        let screen_time = if self.screen_time_limit > 0.0 {
            percent_of(done.screen_time, self.screen_time_limit)
        } else {
            0.0
        };

        DailyGoalProgress {
            exercises,
            screen_time,
            exercise_time,
            overall: (exercises + (100.0 - screen_time) + exercise_time) / 3.0,
        }
    }
}

fn percent_of(done: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 100.0;
    }
    (done / goal * 100.0).clamp(0.0, 100.0)
}

/// How far today's totals are toward each daily goal, as percentages in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoalProgress {
    pub exercises: f64,
    /// Share of the screen time limit used; lower is better
    pub screen_time: f64,
    pub exercise_time: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsUpdate {
    pub exercises: Option<u32>,
    pub screen_time_limit: Option<f64>,
    pub exercise_time: Option<f64>,
}

impl GoalsUpdate {
    pub fn apply(self, goals: &mut DailyGoal) {
        if let Some(v) = self.exercises {
            goals.exercises = v;
        }
        if let Some(v) = self.screen_time_limit {
            goals.screen_time_limit = v.max(0.0);
        }
        if let Some(v) = self.exercise_time {
            goals.exercise_time = v.max(0.0);
        }
    }
}

// ============================================================================
// Exercise catalog and sessions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseType {
    Quick,
    Relaxation,
    Strength,
    EyeRolling,
    EyeMovement,
    Focusing,
    FigureEight,
    BlinkPractice,
    EyeYoga,
    PencilPushups,
    DarkAdaptation,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 11] = [
        ExerciseType::Quick,
        ExerciseType::Relaxation,
        ExerciseType::Strength,
        ExerciseType::EyeRolling,
        ExerciseType::EyeMovement,
        ExerciseType::Focusing,
        ExerciseType::FigureEight,
        ExerciseType::BlinkPractice,
        ExerciseType::EyeYoga,
        ExerciseType::PencilPushups,
        ExerciseType::DarkAdaptation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Quick => "quick",
            ExerciseType::Relaxation => "relaxation",
            ExerciseType::Strength => "strength",
            ExerciseType::EyeRolling => "eyeRolling",
            ExerciseType::EyeMovement => "eyeMovement",
            ExerciseType::Focusing => "focusing",
            ExerciseType::FigureEight => "figureEight",
            ExerciseType::BlinkPractice => "blinkPractice",
            ExerciseType::EyeYoga => "eyeYoga",
            ExerciseType::PencilPushups => "pencilPushups",
            ExerciseType::DarkAdaptation => "darkAdaptation",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = Error;

    /// Accepts `eyeRolling`, `eye-rolling` and `eye_rolling` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.chars().filter(|c| *c != '-' && *c != '_').collect::<String>().to_lowercase();

        ExerciseType::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown exercise type: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStep {
    pub id: u32,
    pub instruction: String,
    pub duration_seconds: u32,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Human-readable duration label, e.g. "2 min"
    pub duration: String,
    pub difficulty: Difficulty,
    pub color: String,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub steps: Option<Vec<ExerciseStep>>,
    pub benefits: Vec<String>,
    pub completion_count: u32,
    pub last_completed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub color: String,
    pub exercise_type: ExerciseType,
    pub steps: Option<Vec<ExerciseStep>>,
    pub benefits: Vec<String>,
}

impl NewExercise {
    pub fn into_exercise(self) -> Exercise {
        Exercise {
            id: new_id(),
            title: self.title,
            description: self.description,
            duration: self.duration,
            difficulty: self.difficulty,
            color: self.color,
            exercise_type: self.exercise_type,
            steps: self.steps,
            benefits: self.benefits,
            completion_count: 0,
            last_completed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub color: Option<String>,
    pub steps: Option<Vec<ExerciseStep>>,
    pub benefits: Option<Vec<String>>,
}

impl ExerciseUpdate {
    pub fn apply(self, exercise: &mut Exercise) {
        if let Some(v) = self.title {
            exercise.title = v;
        }
        if let Some(v) = self.description {
            exercise.description = v;
        }
        if let Some(v) = self.duration {
            exercise.duration = v;
        }
        if let Some(v) = self.difficulty {
            exercise.difficulty = v;
        }
        if let Some(v) = self.color {
            exercise.color = v;
        }
        if let Some(v) = self.steps {
            exercise.steps = Some(v);
        }
        if let Some(v) = self.benefits {
            exercise.benefits = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStep {
    pub step_id: u32,
    pub completed: bool,
    pub actual_duration_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub id: String,
    pub exercise_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds between start and end, zero until completed
    pub duration: u64,
    pub completed: bool,
    pub steps: Option<Vec<SessionStep>>,
}

impl ExerciseSession {
    pub fn start(exercise_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            exercise_id,
            start_time: now,
            end_time: None,
            duration: 0,
            completed: false,
            steps: None,
        }
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.end_time = Some(now);
        self.duration = (now - self.start_time).num_seconds().max(0) as u64;
        self.completed = true;
    }

    pub fn record_step(&mut self, step_id: u32, actual_duration_seconds: u32) {
        let steps = self.steps.get_or_insert_with(Vec::new);
        match steps.iter_mut().find(|s| s.step_id == step_id) {
            Some(step) => {
                step.completed = true;
                step.actual_duration_seconds = actual_duration_seconds;
            }
            None => steps.push(SessionStep { step_id, completed: true, actual_duration_seconds }),
        }
    }
}

// ============================================================================
// Progress and analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub exercise_id: String,
    pub duration_seconds: u64,
    pub completed: bool,
    pub time_of_day: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenTimeCategory {
    Work,
    Entertainment,
    Social,
    #[default]
    Other,
}

impl FromStr for ScreenTimeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(ScreenTimeCategory::Work),
            "entertainment" => Ok(ScreenTimeCategory::Entertainment),
            "social" => Ok(ScreenTimeCategory::Social),
            "other" => Ok(ScreenTimeCategory::Other),
            _ => Err(Error::InvalidInput(format!("Unknown screen time category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenTimeEntry {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub category: Option<ScreenTimeCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkRateEntry {
    pub time_recorded: DateTime<Utc>,
    /// Blinks per minute
    pub rate: f64,
    /// Length of the measurement window
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    /// Minutes
    pub exercise_time: f64,
    pub health_score: u32,
    pub exercises_completed: u32,
}

/// The current week's bucket. `daily_data[0]` is Sunday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyActivityData {
    /// Sunday 00:00:00.000 local time
    pub start_date: DateTime<Utc>,
    /// Saturday 23:59:59.999 local time
    pub end_date: DateTime<Utc>,
    /// Minutes
    pub total_exercise_time: f64,
    pub average_health_score: f64,
    pub daily_data: [DailyActivity; DAYS_PER_WEEK],
}

impl WeeklyActivityData {
    /// Fresh bucket; only the first day carries `seed_score`.
    pub fn new(
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        first_day: NaiveDate,
        seed_score: u32,
    ) -> Self {
        let daily_data = std::array::from_fn(|i| DailyActivity {
            date: first_day + Duration::days(i as i64),
            exercise_time: 0.0,
            health_score: if i == 0 { seed_score } else { 0 },
            exercises_completed: 0,
        });

        Self {
            start_date,
            end_date,
            total_exercise_time: 0.0,
            average_health_score: seed_score as f64,
            daily_data,
        }
    }

    /// Whether this bucket's bounds fully cover `[start, end]`.
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date <= start && self.end_date >= end
    }

    /// Mean of the non-zero daily scores; unchanged when every day is zero.
    pub fn recompute_average(&mut self) {
        let scores: Vec<u32> =
            self.daily_data.iter().map(|d| d.health_score).filter(|s| *s > 0).collect();

        if !scores.is_empty() {
            let sum: u32 = scores.iter().sum();
            self.average_health_score = sum as f64 / scores.len() as f64;
        }
    }
}

/// The aggregator's root record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub id: String,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub health_score: u32,
    pub daily_exercises: Vec<ExerciseEntry>,
    pub screen_time: Vec<ScreenTimeEntry>,
    pub blink_rate: Vec<BlinkRateEntry>,
    pub weekly_activity: WeeklyActivityData,
}

impl ProgressData {
    pub fn new(
        user_id: String,
        now: DateTime<Utc>,
        health_score: u32,
        weekly_activity: WeeklyActivityData,
    ) -> Self {
        Self {
            id: new_id(),
            user_id,
            date: now,
            health_score,
            daily_exercises: Vec::new(),
            screen_time: Vec::new(),
            blink_rate: Vec::new(),
            weekly_activity,
        }
    }

    /// Keep only the most recent `limit` entries of each log.
    pub fn trim_logs(&mut self, limit: usize) {
        keep_last(&mut self.daily_exercises, limit);
        keep_last(&mut self.screen_time, limit);
        keep_last(&mut self.blink_rate, limit);
    }
}

fn keep_last<T>(entries: &mut Vec<T>, limit: usize) {
    if entries.len() > limit {
        let excess = entries.len() - limit;
        entries.drain(..excess);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProgressData {
    /// Calendar month, 1-12
    pub month: u32,
    pub year: i32,
    pub average_health_score: f64,
    /// Minutes
    pub total_exercise_time: f64,
    /// Only ever increases
    pub longest_streak: u32,
    pub most_performed_exercise: Option<String>,
    pub weekly_data: Vec<WeeklyActivityData>,
}

impl MonthlyProgressData {
    pub fn new(month: u32, year: i32, week: WeeklyActivityData) -> Self {
        let mut data = Self {
            month,
            year,
            average_health_score: week.average_health_score,
            total_exercise_time: week.total_exercise_time,
            longest_streak: 0,
            most_performed_exercise: None,
            weekly_data: vec![week],
        };
        data.recompute();
        data
    }

    pub fn absorb_week(&mut self, week: WeeklyActivityData) {
        self.weekly_data.push(week);
        self.recompute();
    }

    /// Average over weeks with a non-zero score, total as a straight sum.
    pub fn recompute(&mut self) {
        let scored: Vec<f64> = self
            .weekly_data
            .iter()
            .map(|w| w.average_health_score)
            .filter(|s| *s > 0.0)
            .collect();

        if !scored.is_empty() {
            self.average_health_score = scored.iter().sum::<f64>() / scored.len() as f64;
        }

        self.total_exercise_time = self.weekly_data.iter().map(|w| w.total_exercise_time).sum();
    }

    pub fn record_streak(&mut self, streak: u32) {
        self.longest_streak = self.longest_streak.max(streak);
    }
}
