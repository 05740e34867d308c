//! Per-session turn serialization.
//!
//! Context merge is not commutative, so turns of one session must
//! apply in arrival order: at most one in-flight turn per session.
//! Turns of different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Registry of per-session turn locks.
#[derive(Clone, Default)]
pub struct TurnLocks {
    locks: Arc<Mutex<HashMap<SessionId, Arc<Mutex<()>>>>>,
}

impl TurnLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the session's turn lock, waiting behind any in-flight
    /// turn of the same session.
    pub async fn acquire(&self, session_id: SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(session_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_session_turns_serialize() {
        let locks = TurnLocks::new();
        let session_id = SessionId::new();

        let guard = locks.acquire(session_id).await;

        let locks2 = locks.clone();
        let contender = tokio::spawn(async move {
            let _guard = locks2.acquire(session_id).await;
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_sessions_do_not_block_each_other() {
        let locks = TurnLocks::new();
        let _a = locks.acquire(SessionId::new()).await;
        // Acquiring another session's lock must not deadlock.
        let _b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(SessionId::new()),
        )
        .await
        .unwrap();
    }
}
