use anyhow::{bail, Result};
use eyecare_common::types::ScreenTimeCategory;
use eyecare_core::AppData;

use super::resolve_exercise;

pub async fn screen_time(app: &AppData, minutes: f64, category: &str) -> Result<()> {
    let category: ScreenTimeCategory = category.parse()?;

    if !app.record_screen_time(minutes, category).await {
        bail!("Create a user profile before tracking activity");
    }

    println!("Recorded {:.0} minutes of screen time", minutes);
    Ok(())
}

pub async fn blink_rate(app: &AppData, rate: f64, duration_seconds: u64) -> Result<()> {
    if !app.record_blink_rate(rate, duration_seconds).await {
        bail!("Create a user profile before tracking activity");
    }

    let smoothed = app.user_service().current_user().await.map(|u| u.stats.blink_rate);
    println!("Recorded blink rate {:.1}/min", rate);
    if let Some(smoothed) = smoothed {
        println!("Average blink rate: {:.1}/min", smoothed);
    }
    Ok(())
}

pub async fn exercise(app: &AppData, id_or_type: &str, seconds: u64, partial: bool) -> Result<()> {
    let exercise = resolve_exercise(app, id_or_type).await?;

    if !app.record_exercise(&exercise.id, seconds, !partial).await {
        bail!("Create a user profile before tracking activity");
    }

    println!(
        "Recorded {} for {}s{}",
        exercise.title,
        seconds,
        if partial { " (partial)" } else { "" }
    );
    Ok(())
}
