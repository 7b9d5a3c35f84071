use anyhow::{bail, Result};
use eyecare_common::types::{Exercise, ExerciseType};
use eyecare_core::AppData;
use serde_json::Value;

pub mod exercise;
pub mod report;
pub mod track;
pub mod user;

/// Look an exercise up by ID first, then by type name.
pub async fn resolve_exercise(app: &AppData, id_or_type: &str) -> Result<Exercise> {
    if let Some(exercise) = app.get_exercise(id_or_type).await {
        return Ok(exercise);
    }

    if let Ok(exercise_type) = id_or_type.parse::<ExerciseType>() {
        if let Some(exercise) = app.exercise_service().get_exercise_by_type(exercise_type).await {
            return Ok(exercise);
        }
    }

    bail!("No exercise matches '{}'", id_or_type)
}

pub fn print_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
