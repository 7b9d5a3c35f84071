use anyhow::{Context, Result};
use clap::Args;
use eyecare_common::types::{ExerciseType, GoalsUpdate, SettingsUpdate};
use eyecare_core::AppData;

use super::print_json;

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[arg(long)]
    pub notifications: Option<bool>,
    #[arg(long)]
    pub dark_mode: Option<bool>,
    #[arg(long)]
    pub reminders: Option<bool>,
    #[arg(long, value_delimiter = ',', help = "Reminder times as HH:MM, comma separated")]
    pub reminder_times: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',', help = "Preferred exercise types, comma separated")]
    pub preferred: Option<Vec<String>>,
    #[arg(long)]
    pub work_minutes: Option<u32>,
    #[arg(long)]
    pub break_minutes: Option<u32>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long, help = "Daily exercise goal")]
    pub goal_exercises: Option<u32>,
    #[arg(long, help = "Daily screen time limit in minutes")]
    pub goal_screen_time: Option<f64>,
    #[arg(long, help = "Daily exercise time goal in minutes")]
    pub goal_exercise_time: Option<f64>,
}

pub async fn create(app: &AppData, name: &str, email: Option<String>) -> Result<()> {
    let user = app.create_user(name, email).await.context("Failed to create user")?;
    println!("Created user '{}' with ID: {}", user.name, user.id);
    Ok(())
}

pub async fn show(app: &AppData, json: bool) -> Result<()> {
    let Some(user) = app.user_service().current_user().await else {
        println!("No user profile yet. Create one with: eyecare-ctl user create <name>");
        return Ok(());
    };

    if json {
        return print_json(serde_json::to_value(&user)?);
    }

    let stats = &user.stats;
    let progress = &user.daily_goals.current_progress;

    println!("{} ({})", user.name, user.email.as_deref().unwrap_or("no email"));
    println!("  Health score:     {}", stats.health_score);
    println!("  Streak:           {} days ({} active days)", stats.streak, stats.days_active);
    println!(
        "  Exercises:        {} ({:.1} min total)",
        stats.exercises_completed, stats.total_exercise_time
    );
    println!("  Blink rate:       {:.1}/min", stats.blink_rate);
    println!("  Screen time:      {:.0} min/day", stats.screen_time);

    let goals = app.daily_goal_progress().await?;

    println!("\nToday ({:.0}% of daily goals):", goals.overall);
    println!(
        "  Exercises:   {}/{} ({:.0}%)",
        progress.exercises_completed, user.daily_goals.exercises, goals.exercises
    );
    println!(
        "  Exercise:    {:.1}/{:.0} min ({:.0}%)",
        progress.exercise_time, user.daily_goals.exercise_time, goals.exercise_time
    );
    println!(
        "  Screen time: {:.0}/{:.0} min ({:.0}% used)",
        progress.screen_time, user.daily_goals.screen_time_limit, goals.screen_time
    );

    println!("\nAchievements:");
    for achievement in &user.achievements {
        let marker = if achievement.is_unlocked { achievement.icon.as_str() } else { "  " };
        println!("  {} {} - {}", marker, achievement.title, achievement.description);
    }

    Ok(())
}

pub async fn settings(app: &AppData, args: SettingsArgs) -> Result<()> {
    let preferred_exercise_types = args
        .preferred
        .map(|types| types.iter().map(|t| t.parse::<ExerciseType>()).collect::<Result<Vec<_>, _>>())
        .transpose()?;

    let settings = app
        .update_user_settings(SettingsUpdate {
            notifications_enabled: args.notifications,
            dark_mode_enabled: args.dark_mode,
            reminders_enabled: args.reminders,
            reminder_times: args.reminder_times,
            preferred_exercise_types,
            work_duration_minutes: args.work_minutes,
            break_duration_minutes: args.break_minutes,
            language: args.language,
        })
        .await
        .context("Failed to update settings")?;

    let goals = app
        .update_daily_goals(GoalsUpdate {
            exercises: args.goal_exercises,
            screen_time_limit: args.goal_screen_time,
            exercise_time: args.goal_exercise_time,
        })
        .await
        .context("Failed to update daily goals")?;

    print_json(serde_json::json!({ "settings": settings, "daily_goals": goals }))
}
