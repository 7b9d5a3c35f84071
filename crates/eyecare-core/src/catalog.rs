//! Built-in exercise catalog seeded on first run.

use eyecare_common::types::{Difficulty, Exercise, ExerciseStep, ExerciseType, NewExercise};

pub const DEFAULT_COLOR: &str = "#E8ECC5";

fn step(id: u32, instruction: &str, duration_seconds: u32) -> ExerciseStep {
    ExerciseStep { id, instruction: instruction.to_string(), duration_seconds }
}

fn exercise(
    title: &str,
    description: &str,
    duration: &str,
    difficulty: Difficulty,
    exercise_type: ExerciseType,
    benefits: [&str; 3],
) -> NewExercise {
    NewExercise {
        title: title.to_string(),
        description: description.to_string(),
        duration: duration.to_string(),
        difficulty,
        color: DEFAULT_COLOR.to_string(),
        exercise_type,
        steps: None,
        benefits: benefits.iter().map(|b| b.to_string()).collect(),
    }
}

/// One exercise per [`ExerciseType`], with fresh ids and zeroed counters.
pub fn default_exercises() -> Vec<Exercise> {
    use Difficulty::*;
    use ExerciseType::*;

    let mut quick = exercise(
        "Quick",
        "A quick exercise routine for busy days",
        "1 min",
        Easy,
        Quick,
        ["Reduces eye strain", "Improves focus", "Quick relief"],
    );
    quick.steps = Some(vec![
        step(1, "Focus on a distant object for 20 seconds", 20),
        step(2, "Blink rapidly for 5 seconds", 5),
        step(3, "Roll your eyes clockwise 5 times", 10),
        step(4, "Roll your eyes counterclockwise 5 times", 10),
        step(5, "Look up and down 5 times", 10),
        step(6, "Look left and right 5 times", 10),
    ]);

    vec![
        quick,
        exercise(
            "Eye Rolling",
            "Roll your eyes in circular motions to exercise eye muscles",
            "1 min",
            Easy,
            EyeRolling,
            ["Strengthens eye muscles", "Improves blood circulation", "Relieves strain"],
        ),
        exercise(
            "Focusing",
            "Shift focus between near and far objects to exercise eye focusing muscles",
            "1 min",
            Easy,
            Focusing,
            ["Improves focusing ability", "Reduces eye fatigue", "Helps with eye coordination"],
        ),
        exercise(
            "Blink Practice",
            "Practice conscious blinking to keep your eyes lubricated",
            "1 min",
            Easy,
            BlinkPractice,
            ["Prevents dry eyes", "Improves tear production", "Reduces eye strain"],
        ),
        exercise(
            "Eye Yoga",
            "Comprehensive yoga routine for your eyes",
            "3 min",
            Hard,
            EyeYoga,
            ["Complete eye relaxation", "Strengthens all eye muscles", "Improves vision clarity"],
        ),
        exercise(
            "Relaxation",
            "Gentle exercises to relax your eyes",
            "2 min",
            Medium,
            Relaxation,
            ["Reduces eye tension", "Relieves stress", "Refreshes tired eyes"],
        ),
        exercise(
            "Strength",
            "Strengthen your eye muscles with these exercises",
            "3 min",
            Medium,
            Strength,
            ["Builds eye muscle strength", "Improves focus control", "Enhances eye movement"],
        ),
        exercise(
            "Eye Movement",
            "Practice controlled eye movements in different directions",
            "2 min",
            Medium,
            EyeMovement,
            [
                "Improves eye coordination",
                "Enhances eye tracking",
                "Strengthens directional muscles",
            ],
        ),
        exercise(
            "Figure Eight",
            "Trace a figure eight pattern with your eyes",
            "2 min",
            Medium,
            FigureEight,
            ["Improves eye movement control", "Enhances coordination", "Strengthens muscles"],
        ),
        exercise(
            "Pencil Pushups",
            "Focus exercises using a pencil to train convergence",
            "2 min",
            Medium,
            PencilPushups,
            ["Improves convergence", "Helps with focus", "Strengthens eye teaming"],
        ),
        exercise(
            "Dark Adaptation",
            "Help your eyes adjust between light and dark environments",
            "1 min",
            Easy,
            DarkAdaptation,
            ["Improves light sensitivity", "Reduces eye fatigue", "Enhances night vision"],
        ),
    ]
    .into_iter()
    .map(NewExercise::into_exercise)
    .collect()
}
