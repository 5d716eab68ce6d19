use std::sync::{Mutex, PoisonError};

use bookmarks_logging::bm_debug;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    BookmarkDraft, BookmarkRow, BookmarkStore, ChangeCallback, ChangeHub, FailureKind,
    StoreError, SubscriptionId,
};

/// Process-local store with the same contract as the hosted table.
///
/// Every mutation that changes a row notifies the change feed, mirroring the
/// service's row-level change events.
#[derive(Default)]
pub struct InMemoryBookmarkStore {
    rows: Mutex<Rows>,
    fail_next: Mutex<Option<FailureKind>>,
    changes: ChangeHub,
}

#[derive(Default)]
struct Rows {
    next_seq: u64,
    // (insertion sequence, row); the sequence breaks created_at ties.
    entries: Vec<(u64, BookmarkRow)>,
}

impl InMemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `rows`, e.g. for a demo backend.
    pub fn with_rows(rows: Vec<BookmarkRow>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.rows.lock().unwrap_or_else(PoisonError::into_inner);
            for row in rows {
                guard.next_seq += 1;
                let seq = guard.next_seq;
                guard.entries.push((seq, row));
            }
        }
        store
    }

    /// Makes the next store call fail with `kind`.
    pub fn fail_next_call(&self, kind: FailureKind) {
        *self.fail_next.lock().unwrap_or_else(PoisonError::into_inner) = Some(kind);
    }

    /// Simulates a change made by another client.
    pub fn notify_remote_change(&self) -> usize {
        self.changes.notify()
    }

    pub fn len(&self) -> usize {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_injected_failure(&self) -> Result<(), StoreError> {
        let injected = self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match injected {
            Some(kind) => Err(StoreError::new(kind, "injected failure")),
            None => Ok(()),
        }
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Rows> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl BookmarkStore for InMemoryBookmarkStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRow>, StoreError> {
        self.take_injected_failure()?;
        let rows = self.rows();
        let mut owned: Vec<&(u64, BookmarkRow)> = rows
            .entries
            .iter()
            .filter(|(_, row)| row.user_id == user_id)
            .collect();
        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        Ok(owned.into_iter().map(|(_, row)| row.clone()).collect())
    }

    async fn insert(&self, user_id: &str, draft: &BookmarkDraft) -> Result<(), StoreError> {
        self.take_injected_failure()?;
        {
            let mut rows = self.rows();
            rows.next_seq += 1;
            let seq = rows.next_seq;
            let row = BookmarkRow {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                title: draft.title.clone(),
                url: draft.url.clone(),
                created_at: Utc::now(),
            };
            bm_debug!("Memory insert id={}", row.id);
            rows.entries.push((seq, row));
        }
        self.changes.notify();
        Ok(())
    }

    async fn update(&self, id: &str, draft: &BookmarkDraft) -> Result<(), StoreError> {
        self.take_injected_failure()?;
        let matched = {
            let mut rows = self.rows();
            match rows.entries.iter_mut().find(|(_, row)| row.id == id) {
                Some((_, row)) => {
                    row.title = draft.title.clone();
                    row.url = draft.url.clone();
                    true
                }
                None => false,
            }
        };
        // Like the service, an update that matches nothing still succeeds.
        if matched {
            self.changes.notify();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.take_injected_failure()?;
        let removed = {
            let mut rows = self.rows();
            let before = rows.entries.len();
            rows.entries.retain(|(_, row)| row.id != id);
            before != rows.entries.len()
        };
        if removed {
            self.changes.notify();
        }
        Ok(())
    }

    fn subscribe_to_changes(&self, on_change: ChangeCallback) -> SubscriptionId {
        self.changes.subscribe(on_change)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        self.changes.unsubscribe(subscription)
    }
}
