pub mod analytics_service;
pub mod app_data;
pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod exercise_service;
pub mod health_score;
pub mod user_service;

pub use analytics_service::AnalyticsService;
pub use app_data::{AppData, AppSnapshot};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::AppConfig;
pub use exercise_service::{ExerciseService, SessionCompletion};
pub use health_score::{HealthScoreBreakdown, HealthScoreInputs};
pub use user_service::UserService;
