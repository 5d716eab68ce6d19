use crate::{BookmarkDraft, BookmarkRow, ChangeCallback, StoreError, SubscriptionId};

/// Access to the `bookmarks` relation plus its change feed.
///
/// Every call resolves to an explicit outcome; callers decide how to surface
/// failures.
#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    /// All rows owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRow>, StoreError>;

    /// Persists a new row. The generated identifier is not returned.
    async fn insert(&self, user_id: &str, draft: &BookmarkDraft) -> Result<(), StoreError>;

    /// Changes title and url of row `id`; owner and identifier never change.
    async fn update(&self, id: &str, draft: &BookmarkDraft) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Registers interest in any change to the table, for every user.
    fn subscribe_to_changes(&self, on_change: ChangeCallback) -> SubscriptionId;

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool;
}
