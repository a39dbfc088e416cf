use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::models::domain::QuizSession;

type SessionSlot = Arc<Mutex<Option<QuizSession>>>;

/// Exclusive access to one learner's session slot. `None` means no active quiz.
pub type SessionGuard = OwnedMutexGuard<Option<QuizSession>>;

/// Process-wide table of active quiz sessions, at most one per learner.
///
/// Every learner gets a slot behind its own mutex. The outer map lock is only
/// held while a slot is looked up, inserted or dropped, so requests for
/// different learners never wait on each other's quiz work.
#[derive(Default)]
pub struct SessionRegistry {
    slots: RwLock<HashMap<String, SessionSlot>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, subject_id: &str) -> SessionSlot {
        {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(subject_id) {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(subject_id.to_string()).or_default())
    }

    /// Locks the learner's slot for a read-modify-write. Hold the guard for
    /// the whole operation, then drop it and call `release`.
    pub async fn lock(&self, subject_id: &str) -> SessionGuard {
        self.slot(subject_id).await.lock_owned().await
    }

    /// Drops the learner's slot if it is empty and nobody else holds it.
    pub async fn release(&self, subject_id: &str) {
        let mut slots = self.slots.write().await;

        let idle = slots.get(subject_id).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot.try_lock().map(|session| session.is_none()).unwrap_or(false)
        });

        if idle {
            slots.remove(subject_id);
        }
    }

    /// Copy of the learner's current session, if any.
    pub async fn get(&self, subject_id: &str) -> Option<QuizSession> {
        let slot = {
            let slots = self.slots.read().await;
            slots.get(subject_id).map(Arc::clone)
        }?;

        let session = slot.lock().await;
        session.clone()
    }

    /// Stores `session`, returning whatever session it displaced.
    pub async fn put(&self, session: QuizSession) -> Option<QuizSession> {
        let mut guard = self.lock(session.subject_id()).await;
        guard.replace(session)
    }

    /// Removes the learner's session. Removing a missing session is a no-op.
    pub async fn remove(&self, subject_id: &str) -> bool {
        let removed = {
            let mut guard = self.lock(subject_id).await;
            guard.take().is_some()
        };
        self.release(subject_id).await;
        removed
    }

    /// Number of live sessions, without waiting on any slot. A slot that is
    /// locked by an in-flight request counts as active.
    pub async fn active_count(&self) -> usize {
        let slots = self.slots.read().await;
        slots
            .values()
            .filter(|slot| slot.try_lock().map(|session| session.is_some()).unwrap_or(true))
            .count()
    }
}
