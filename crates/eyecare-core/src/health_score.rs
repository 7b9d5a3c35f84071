//! Composite eye-health score.
//!
//! Four components add up to at most 100: exercise (30), screen time (30),
//! blink rate (20) and streak (20). Everything here is pure; persisting the
//! result is the aggregator's job.

use serde::Serialize;

pub const EXERCISE_MAX: u32 = 30;
pub const SCREEN_TIME_MAX: u32 = 30;
pub const BLINK_RATE_MAX: u32 = 20;
pub const STREAK_MAX: u32 = 20;

/// Number of most recent blink-rate samples averaged for the score.
pub const BLINK_SAMPLE_WINDOW: usize = 5;

/// Blink component when no samples exist.
const BLINK_RATE_NEUTRAL: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthScoreInputs {
    pub exercises_today: u32,
    pub exercise_goal: u32,
    /// Minutes logged today
    pub screen_time_today: f64,
    /// Minutes
    pub screen_time_limit: f64,
    /// Oldest first; only the last [`BLINK_SAMPLE_WINDOW`] are used
    pub blink_rates: Vec<f64>,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthScoreBreakdown {
    pub exercise: u32,
    pub screen_time: u32,
    pub blink_rate: u32,
    pub streak: u32,
}

impl HealthScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.exercise + self.screen_time + self.blink_rate + self.streak
    }
}

pub fn compute(inputs: &HealthScoreInputs) -> HealthScoreBreakdown {
    let start = inputs.blink_rates.len().saturating_sub(BLINK_SAMPLE_WINDOW);

    HealthScoreBreakdown {
        exercise: exercise_component(inputs.exercises_today, inputs.exercise_goal),
        screen_time: screen_time_component(inputs.screen_time_today, inputs.screen_time_limit),
        blink_rate: blink_rate_component(&inputs.blink_rates[start..]),
        streak: streak_component(inputs.streak),
    }
}

/// Full marks once the daily goal is met, proportional below it.
pub fn exercise_component(completed: u32, goal: u32) -> u32 {
    if completed >= goal {
        return EXERCISE_MAX;
    }
    (completed as f64 / goal as f64 * EXERCISE_MAX as f64).round() as u32
}

/// Full marks at or under the limit; decays linearly to zero at twice the limit.
pub fn screen_time_component(actual: f64, limit: f64) -> u32 {
    if actual <= limit {
        return SCREEN_TIME_MAX;
    }

    let overage = if limit > 0.0 { ((actual - limit) / limit).min(1.0) } else { 1.0 };
    (SCREEN_TIME_MAX as f64 * (1.0 - overage)).round() as u32
}

/// Scores the mean of the given samples against the healthy 15-20 blinks/min band.
pub fn blink_rate_component(samples: &[f64]) -> u32 {
    if samples.is_empty() {
        return BLINK_RATE_NEUTRAL;
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    if (15.0..=20.0).contains(&mean) {
        BLINK_RATE_MAX
    } else if (10.0..=25.0).contains(&mean) {
        15
    } else if (5.0..=30.0).contains(&mean) {
        10
    } else {
        5
    }
}

pub fn streak_component(streak: u32) -> u32 {
    streak.saturating_mul(2).min(STREAK_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_day_scores_100() {
        let inputs = HealthScoreInputs {
            exercises_today: 3,
            exercise_goal: 3,
            screen_time_today: 120.0,
            screen_time_limit: 120.0,
            blink_rates: vec![17.0],
            streak: 15,
        };

        let breakdown = compute(&inputs);
        assert_eq!(
            breakdown,
            HealthScoreBreakdown { exercise: 30, screen_time: 30, blink_rate: 20, streak: 20 }
        );
        assert_eq!(breakdown.total(), 100);
    }

    #[test]
    fn test_exercise_component_is_proportional() {
        assert_eq!(exercise_component(0, 3), 0);
        assert_eq!(exercise_component(1, 3), 10);
        assert_eq!(exercise_component(2, 3), 20);
        assert_eq!(exercise_component(5, 3), 30);
        assert_eq!(exercise_component(0, 0), 30);
    }

    #[test]
    fn test_screen_time_component_decays() {
        assert_eq!(screen_time_component(60.0, 120.0), 30);
        assert_eq!(screen_time_component(180.0, 120.0), 15);
        assert_eq!(screen_time_component(240.0, 120.0), 0);
        assert_eq!(screen_time_component(600.0, 120.0), 0);
    }

    #[test]
    fn test_zero_screen_time_limit() {
        assert_eq!(screen_time_component(0.0, 0.0), 30);
        assert_eq!(screen_time_component(1.0, 0.0), 0);
    }

    #[test]
    fn test_blink_rate_bands() {
        assert_eq!(blink_rate_component(&[]), 10);
        assert_eq!(blink_rate_component(&[15.0, 20.0]), 20);
        assert_eq!(blink_rate_component(&[12.0]), 15);
        assert_eq!(blink_rate_component(&[28.0]), 10);
        assert_eq!(blink_rate_component(&[2.0]), 5);
        assert_eq!(blink_rate_component(&[40.0]), 5);
    }

    #[test]
    fn test_only_recent_blink_samples_count() {
        let inputs = HealthScoreInputs {
            exercise_goal: 3,
            screen_time_limit: 120.0,
            blink_rates: vec![1.0, 1.0, 17.0, 17.0, 17.0, 17.0, 17.0],
            ..Default::default()
        };

        assert_eq!(compute(&inputs).blink_rate, 20);
    }

    #[test]
    fn test_streak_component_caps() {
        assert_eq!(streak_component(0), 0);
        assert_eq!(streak_component(4), 8);
        assert_eq!(streak_component(10), 20);
        assert_eq!(streak_component(u32::MAX), 20);
    }
}
