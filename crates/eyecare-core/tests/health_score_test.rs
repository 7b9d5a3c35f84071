use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use eyecare_common::types::{GoalsUpdate, ScreenTimeCategory};
use eyecare_core::{AppData, HealthScoreBreakdown, ManualClock};
use eyecare_db::StorageService;

async fn app_with_user() -> (AppData, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_local(
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap().and_hms_opt(12, 0, 0).unwrap(),
    ));
    let app = AppData::initialize(StorageService::in_memory(), clock.clone()).await.unwrap();
    app.create_user("Ada", None).await.unwrap();
    (app, clock)
}

#[tokio::test]
async fn test_fresh_user_preview() {
    let (app, _) = app_with_user().await;

    let breakdown = app.preview_health_score().await.unwrap();
    assert_eq!(
        breakdown,
        HealthScoreBreakdown { exercise: 0, screen_time: 30, blink_rate: 10, streak: 0 }
    );

    let user = app.user_service().current_user().await.unwrap();
    assert_eq!(user.stats.health_score, 70, "Preview must not store anything");
}

#[tokio::test]
async fn test_heavy_screen_day() {
    let (app, _) = app_with_user().await;

    app.update_daily_goals(GoalsUpdate { screen_time_limit: Some(100.0), ..Default::default() })
        .await
        .unwrap();
    app.record_screen_time(150.0, ScreenTimeCategory::Entertainment).await;
    app.record_blink_rate(8.0, 60).await;

    let breakdown = app.preview_health_score().await.unwrap();
    assert_eq!(breakdown.screen_time, 15);
    assert_eq!(breakdown.blink_rate, 10);

    let total = app.calculate_health_score().await;
    assert_eq!(total, breakdown.total());
    assert_eq!(app.snapshot().await.health_score, total);
}

#[tokio::test]
async fn test_only_todays_activity_counts() {
    let (app, clock) = app_with_user().await;

    for _ in 0..3 {
        app.record_exercise("quick", 60, true).await;
    }
    app.record_screen_time(500.0, ScreenTimeCategory::Work).await;
    assert_eq!(app.preview_health_score().await.unwrap().exercise, 30);

    clock.advance(Duration::days(1));

    let breakdown = app.preview_health_score().await.unwrap();
    assert_eq!(breakdown.exercise, 0);
    assert_eq!(breakdown.screen_time, 30);
}

#[tokio::test]
async fn test_score_is_written_to_todays_slot() {
    let (app, _) = app_with_user().await;

    app.record_exercise("quick", 60, true).await;
    let total = app.calculate_health_score().await;

    let week = app.weekly_activity().await.unwrap();
    // Wednesday
    assert_eq!(week.daily_data[3].health_score, total);
    assert!(app.user_service().last_health_calculation().await.is_some());
}
