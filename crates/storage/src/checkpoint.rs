use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use exam_core::model::{AttemptId, SessionCheckpoint};

/// Errors surfaced by checkpoint stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckpointError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable storage for in-progress attempt snapshots.
///
/// Keyed by attempt id; a store holds at most one checkpoint per attempt and
/// `save` overwrites the previous one.
pub trait CheckpointStore: Send + Sync {
    /// Persist a snapshot, replacing any earlier one for the same attempt.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError` for storage failures.
    fn save(&self, checkpoint: &SessionCheckpoint) -> Result<(), CheckpointError>;

    /// Load the snapshot for an attempt, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError` for storage failures; a missing checkpoint
    /// is `Ok(None)`, not an error.
    fn load(&self, attempt_id: AttemptId) -> Result<Option<SessionCheckpoint>, CheckpointError>;

    /// Drop the snapshot for an attempt. Removing a missing one is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError` for storage failures.
    fn remove(&self, attempt_id: AttemptId) -> Result<(), CheckpointError>;
}

/// Checkpoint store held entirely in memory. Useful for tests and for
/// embedders that do not want durable resume state.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    entries: Mutex<HashMap<AttemptId, SessionCheckpoint>>,
}

impl InMemoryCheckpointStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<AttemptId, SessionCheckpoint>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    fn save(&self, checkpoint: &SessionCheckpoint) -> Result<(), CheckpointError> {
        self.entries()
            .insert(checkpoint.attempt_id, checkpoint.clone());
        Ok(())
    }

    fn load(&self, attempt_id: AttemptId) -> Result<Option<SessionCheckpoint>, CheckpointError> {
        Ok(self.entries().get(&attempt_id).cloned())
    }

    fn remove(&self, attempt_id: AttemptId) -> Result<(), CheckpointError> {
        self.entries().remove(&attempt_id);
        Ok(())
    }
}

/// Checkpoint store writing one JSON file per attempt under a directory.
#[derive(Debug, Clone)]
pub struct JsonDirCheckpointStore {
    dir: PathBuf,
}

impl JsonDirCheckpointStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, attempt_id: AttemptId) -> PathBuf {
        self.dir.join(format!("attempt-{attempt_id}.json"))
    }
}

impl CheckpointStore for JsonDirCheckpointStore {
    fn save(&self, checkpoint: &SessionCheckpoint) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec_pretty(checkpoint)?;
        fs::write(self.path_for(checkpoint.attempt_id), body)?;
        Ok(())
    }

    fn load(&self, attempt_id: AttemptId) -> Result<Option<SessionCheckpoint>, CheckpointError> {
        let body = match fs::read(self.path_for(attempt_id)) {
            Ok(body) => body,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&body)?))
    }

    fn remove(&self, attempt_id: AttemptId) -> Result<(), CheckpointError> {
        match fs::remove_file(self.path_for(attempt_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{AnswerEntry, ExamId, QuestionId};
    use exam_core::time::fixed_now;

    fn checkpoint(attempt: u64) -> SessionCheckpoint {
        SessionCheckpoint {
            attempt_id: AttemptId::new(attempt),
            exam_id: ExamId::new(1),
            end_time: fixed_now(),
            current_index: 1,
            answers: vec![AnswerEntry {
                question_id: QuestionId::new(5),
                answer: "C".to_string(),
            }],
            captured_at: fixed_now(),
        }
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemoryCheckpointStore::new();
        let cp = checkpoint(42);

        store.save(&cp).unwrap();
        assert_eq!(store.load(AttemptId::new(42)).unwrap(), Some(cp));

        store.remove(AttemptId::new(42)).unwrap();
        assert_eq!(store.load(AttemptId::new(42)).unwrap(), None);
    }

    #[test]
    fn in_memory_save_overwrites() {
        let store = InMemoryCheckpointStore::new();
        let mut cp = checkpoint(42);
        store.save(&cp).unwrap();

        cp.current_index = 3;
        store.save(&cp).unwrap();

        let loaded = store.load(AttemptId::new(42)).unwrap().unwrap();
        assert_eq!(loaded.current_index, 3);
    }

    #[test]
    fn json_dir_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirCheckpointStore::new(dir.path());
        let cp = checkpoint(7);

        store.save(&cp).unwrap();
        assert_eq!(store.load(AttemptId::new(7)).unwrap(), Some(cp));

        store.remove(AttemptId::new(7)).unwrap();
        assert_eq!(store.load(AttemptId::new(7)).unwrap(), None);
    }

    #[test]
    fn json_dir_store_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirCheckpointStore::new(dir.path());

        assert_eq!(store.load(AttemptId::new(999)).unwrap(), None);
        // removing a checkpoint that never existed is fine
        store.remove(AttemptId::new(999)).unwrap();
    }

    #[test]
    fn json_dir_store_keeps_attempts_separate() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirCheckpointStore::new(dir.path());

        store.save(&checkpoint(1)).unwrap();
        store.save(&checkpoint(2)).unwrap();
        store.remove(AttemptId::new(1)).unwrap();

        assert_eq!(store.load(AttemptId::new(1)).unwrap(), None);
        assert!(store.load(AttemptId::new(2)).unwrap().is_some());
    }
}
