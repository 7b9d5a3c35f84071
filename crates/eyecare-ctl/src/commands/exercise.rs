use anyhow::{Context, Result};
use eyecare_core::AppData;

use super::{print_json, resolve_exercise};

pub async fn list(app: &AppData, json: bool) -> Result<()> {
    let exercises = app.exercises().await;

    if json {
        return print_json(serde_json::to_value(&exercises)?);
    }

    println!("Available exercises:");
    for exercise in exercises {
        println!(
            "  - {} [{}] {} ({}, done {}x)",
            exercise.title,
            exercise.exercise_type,
            exercise.duration,
            exercise.difficulty,
            exercise.completion_count
        );
    }

    Ok(())
}

pub async fn show(app: &AppData, id_or_type: &str, json: bool) -> Result<()> {
    let exercise = resolve_exercise(app, id_or_type).await?;

    if json {
        return print_json(serde_json::to_value(&exercise)?);
    }

    println!("{} ({})", exercise.title, exercise.id);
    println!("  {}", exercise.description);
    println!("  Duration: {}, difficulty: {}", exercise.duration, exercise.difficulty);

    if let Some(steps) = &exercise.steps {
        println!("\nSteps:");
        for step in steps {
            println!("  {}. {} ({}s)", step.id, step.instruction, step.duration_seconds);
        }
    }

    println!("\nBenefits:");
    for benefit in &exercise.benefits {
        println!("  - {}", benefit);
    }

    Ok(())
}

pub async fn start(app: &AppData, id_or_type: &str) -> Result<()> {
    let exercise = resolve_exercise(app, id_or_type).await?;
    let session = app.start_exercise_session(&exercise.id).await?;

    println!("Started {} session: {}", exercise.title, session.id);
    println!("Finish it with: eyecare-ctl exercise complete {}", session.id);
    Ok(())
}

pub async fn complete(app: &AppData, session_id: &str, partial: bool) -> Result<()> {
    let session = app
        .complete_exercise_session(session_id, !partial)
        .await
        .with_context(|| format!("Failed to complete session {}", session_id))?;

    let score = app.snapshot().await.health_score;
    println!("Completed session {} in {}s", session.id, session.duration);
    println!("Health score: {}", score);
    Ok(())
}

pub async fn history(app: &AppData, limit: usize, json: bool) -> Result<()> {
    let sessions = app.recent_sessions(limit).await;

    if json {
        return print_json(serde_json::to_value(&sessions)?);
    }

    if sessions.is_empty() {
        println!("No exercise sessions yet");
        return Ok(());
    }

    println!("Recent sessions:");
    for session in sessions {
        let title = app
            .get_exercise(&session.exercise_id)
            .await
            .map(|e| e.title)
            .unwrap_or_else(|| "Unknown".to_string());
        let status = if session.completed {
            format!("{}s", session.duration)
        } else {
            "in progress".to_string()
        };

        println!(
            "  {} {} ({}) {}",
            session.start_time.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            title,
            status,
            session.id
        );
    }

    Ok(())
}
