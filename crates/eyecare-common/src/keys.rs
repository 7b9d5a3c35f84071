//! Fixed key namespace used by the storage gateway.

pub const USER: &str = "eyecare_user";
pub const EXERCISES: &str = "eyecare_exercises";
pub const EXERCISE_SESSIONS: &str = "eyecare_exercise_sessions";
pub const PROGRESS_DATA: &str = "eyecare_progress";
pub const SETTINGS: &str = "eyecare_settings";
pub const LAST_HEALTH_CALCULATION: &str = "eyecare_last_health_calc";

const MONTHLY_SUFFIX: &str = "_monthly";

/// Key holding the array of monthly summaries, derived from the progress key.
pub fn monthly_progress() -> String {
    format!("{}{}", PROGRESS_DATA, MONTHLY_SUFFIX)
}

/// Every key the application writes.
pub fn all() -> Vec<String> {
    vec![
        USER.to_string(),
        EXERCISES.to_string(),
        EXERCISE_SESSIONS.to_string(),
        PROGRESS_DATA.to_string(),
        monthly_progress(),
        SETTINGS.to_string(),
        LAST_HEALTH_CALCULATION.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_key_is_derived_from_progress_key() {
        assert_eq!(monthly_progress(), "eyecare_progress_monthly");
    }

    #[test]
    fn test_all_keys_are_unique() {
        let mut keys = all();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
