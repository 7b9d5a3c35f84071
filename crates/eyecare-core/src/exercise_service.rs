use std::sync::Arc;

use eyecare_common::{
    keys,
    types::{Exercise, ExerciseSession, ExerciseType, ExerciseUpdate, NewExercise},
    Error, Result,
};
use eyecare_db::StorageService;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{catalog, clock::SharedClock};

/// Outcome of asking to complete a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCompletion {
    Completed(ExerciseSession),
    /// The session had been completed earlier; nothing changed.
    AlreadyCompleted(ExerciseSession),
}

impl SessionCompletion {
    pub fn session(&self) -> &ExerciseSession {
        match self {
            SessionCompletion::Completed(s) | SessionCompletion::AlreadyCompleted(s) => s,
        }
    }

    pub fn into_session(self) -> ExerciseSession {
        match self {
            SessionCompletion::Completed(s) | SessionCompletion::AlreadyCompleted(s) => s,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, SessionCompletion::Completed(_))
    }
}

/// Exercise catalog and session log.
#[derive(Clone)]
pub struct ExerciseService {
    storage: StorageService,
    clock: SharedClock,
    exercises: Arc<RwLock<Vec<Exercise>>>,
    sessions: Arc<RwLock<Vec<ExerciseSession>>>,
}

impl ExerciseService {
    pub async fn new(storage: StorageService, clock: SharedClock) -> Self {
        let exercises = match storage.load::<Vec<Exercise>>(keys::EXERCISES).await {
            Some(exercises) => {
                debug!("Loaded {} exercises from storage", exercises.len());
                exercises
            }
            None => {
                info!("No stored exercise catalog, seeding defaults");
                let defaults = catalog::default_exercises();
                storage.save(keys::EXERCISES, &defaults).await;
                defaults
            }
        };

        let sessions =
            storage.load::<Vec<ExerciseSession>>(keys::EXERCISE_SESSIONS).await.unwrap_or_default();

        Self {
            storage,
            clock,
            exercises: Arc::new(RwLock::new(exercises)),
            sessions: Arc::new(RwLock::new(sessions)),
        }
    }

    pub async fn list_exercises(&self) -> Vec<Exercise> {
        self.exercises.read().await.clone()
    }

    pub async fn get_exercise(&self, id: &str) -> Option<Exercise> {
        self.exercises.read().await.iter().find(|e| e.id == id).cloned()
    }

    pub async fn get_exercise_by_type(&self, exercise_type: ExerciseType) -> Option<Exercise> {
        self.exercises.read().await.iter().find(|e| e.exercise_type == exercise_type).cloned()
    }

    pub async fn add_exercise(&self, new_exercise: NewExercise) -> Exercise {
        let exercise = new_exercise.into_exercise();

        let mut exercises = self.exercises.write().await;
        exercises.push(exercise.clone());
        self.storage.save(keys::EXERCISES, &*exercises).await;

        info!("Added exercise {} ({})", exercise.title, exercise.id);
        exercise
    }

    pub async fn update_exercise(&self, id: &str, update: ExerciseUpdate) -> Option<Exercise> {
        let mut exercises = self.exercises.write().await;
        let exercise = exercises.iter_mut().find(|e| e.id == id)?;
        update.apply(exercise);
        let updated = exercise.clone();

        self.storage.save(keys::EXERCISES, &*exercises).await;
        Some(updated)
    }

    pub async fn delete_exercise(&self, id: &str) -> bool {
        let mut exercises = self.exercises.write().await;
        let before = exercises.len();
        exercises.retain(|e| e.id != id);

        if exercises.len() == before {
            return false;
        }

        self.storage.save(keys::EXERCISES, &*exercises).await;
        info!("Deleted exercise {}", id);
        true
    }

    /// Open a session for a catalog exercise.
    pub async fn start_session(&self, exercise_id: &str) -> Result<ExerciseSession> {
        if self.get_exercise(exercise_id).await.is_none() {
            return Err(Error::ExerciseNotFound(exercise_id.to_string()));
        }

        let session = ExerciseSession::start(exercise_id.to_string(), self.clock.now_utc());

        let mut sessions = self.sessions.write().await;
        sessions.push(session.clone());
        self.storage.save(keys::EXERCISE_SESSIONS, &*sessions).await;

        info!("Started session {} for exercise {}", session.id, exercise_id);
        Ok(session)
    }

    /// Close a session and bump its exercise's completion counter.
    ///
    /// Completing an already completed session changes nothing. The session log is
    /// persisted before the catalog.
    pub async fn complete_session(&self, session_id: &str) -> Option<SessionCompletion> {
        let now = self.clock.now_utc();

        let session = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.iter_mut().find(|s| s.id == session_id)?;
            if session.completed {
                debug!("Session {} was already completed", session_id);
                return Some(SessionCompletion::AlreadyCompleted(session.clone()));
            }
            session.finish(now);
            let finished = session.clone();

            self.storage.save(keys::EXERCISE_SESSIONS, &*sessions).await;
            finished
        };

        let mut exercises = self.exercises.write().await;
        match exercises.iter_mut().find(|e| e.id == session.exercise_id) {
            Some(exercise) => {
                exercise.completion_count += 1;
                exercise.last_completed = Some(now);
                self.storage.save(keys::EXERCISES, &*exercises).await;
            }
            None => warn!(
                "Session {} refers to exercise {} which is no longer in the catalog",
                session.id, session.exercise_id
            ),
        }

        info!("Completed session {} after {}s", session.id, session.duration);
        Some(SessionCompletion::Completed(session))
    }

    /// Record a finished step on an open session.
    pub async fn complete_step(
        &self,
        session_id: &str,
        step_id: u32,
        actual_duration_seconds: u32,
    ) -> Option<ExerciseSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.iter_mut().find(|s| s.id == session_id && !s.completed)?;
        session.record_step(step_id, actual_duration_seconds);
        let updated = session.clone();

        self.storage.save(keys::EXERCISE_SESSIONS, &*sessions).await;
        Some(updated)
    }

    pub async fn get_session(&self, session_id: &str) -> Option<ExerciseSession> {
        self.sessions.read().await.iter().find(|s| s.id == session_id).cloned()
    }

    pub async fn sessions_for_exercise(&self, exercise_id: &str) -> Vec<ExerciseSession> {
        let sessions = self.sessions.read().await;
        sessions.iter().filter(|s| s.exercise_id == exercise_id).cloned().collect()
    }

    /// Most recently started sessions first.
    pub async fn recent_sessions(&self, limit: usize) -> Vec<ExerciseSession> {
        let mut sessions = self.sessions.read().await.clone();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions.truncate(limit);
        sessions
    }

    pub async fn most_completed_exercises(&self, limit: usize) -> Vec<Exercise> {
        let mut exercises = self.exercises.read().await.clone();
        exercises.sort_by(|a, b| b.completion_count.cmp(&a.completion_count));
        exercises.truncate(limit);
        exercises
    }

    /// Reseed the catalog and drop every session.
    pub async fn reset(&self) {
        let defaults = catalog::default_exercises();

        {
            let mut exercises = self.exercises.write().await;
            *exercises = defaults;
            self.storage.save(keys::EXERCISES, &*exercises).await;
        }

        let mut sessions = self.sessions.write().await;
        sessions.clear();
        self.storage.save(keys::EXERCISE_SESSIONS, &*sessions).await;

        info!("Exercise catalog and session log reset");
    }
}
