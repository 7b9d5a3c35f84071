use anyhow::Result;
use chrono::Datelike;
use eyecare_core::AppData;

use super::print_json;

pub async fn score(app: &AppData, preview: bool, json: bool) -> Result<()> {
    let breakdown =
        if preview { app.preview_health_score().await } else { app.score_today().await };
    let Some(breakdown) = breakdown else {
        println!("No user profile yet");
        return Ok(());
    };
    let total = breakdown.total();

    if json {
        return print_json(serde_json::json!({ "breakdown": breakdown, "total": total }));
    }

    println!("Health score: {}{}", total, if preview { " (preview)" } else { "" });
    println!("  Exercise:    {:>2}/30", breakdown.exercise);
    println!("  Screen time: {:>2}/30", breakdown.screen_time);
    println!("  Blink rate:  {:>2}/20", breakdown.blink_rate);
    println!("  Streak:      {:>2}/20", breakdown.streak);
    Ok(())
}

pub async fn week(app: &AppData, json: bool) -> Result<()> {
    let Some(week) = app.refresh().await.weekly_activity else {
        println!("No user profile yet");
        return Ok(());
    };

    if json {
        return print_json(serde_json::to_value(&week)?);
    }

    println!("Week of {}", week.daily_data[0].date);
    for day in &week.daily_data {
        println!(
            "  {} {}  {:>2} exercises  {:>5.1} min  score {:>3}",
            day.date.weekday(),
            day.date,
            day.exercises_completed,
            day.exercise_time,
            day.health_score
        );
    }
    println!(
        "Total: {:.1} min, average score {:.0}",
        week.total_exercise_time, week.average_health_score
    );
    Ok(())
}

pub async fn month(app: &AppData, month: u32, year: i32, json: bool) -> Result<()> {
    let Some(summary) = app.monthly_data(month, year).await else {
        println!("No summary for {}/{}", month, year);
        return Ok(());
    };

    if json {
        return print_json(serde_json::to_value(&summary)?);
    }

    println!("{}/{}", summary.month, summary.year);
    println!("  Weeks recorded:   {}", summary.weekly_data.len());
    println!("  Exercise time:    {:.1} min", summary.total_exercise_time);
    println!("  Average score:    {:.0}", summary.average_health_score);
    println!("  Longest streak:   {} days", summary.longest_streak);
    if let Some(id) = &summary.most_performed_exercise {
        let title = app.get_exercise(id).await.map(|e| e.title).unwrap_or_else(|| id.clone());
        println!("  Most performed:   {}", title);
    }
    Ok(())
}

pub async fn reset(app: &AppData, confirmed: bool) -> Result<()> {
    if !confirmed {
        println!("This removes all activity, sessions and stats. Re-run with --yes to confirm.");
        return Ok(());
    }

    app.reset_all_data().await;
    println!("All activity data has been reset");
    Ok(())
}
