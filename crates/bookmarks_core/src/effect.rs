use crate::{BookmarkId, SubscriptionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResolveSession,
    RedirectToLogin,
    /// `seq` increases with every fetch issued; results echo it back.
    FetchBookmarks { user_id: UserId, seq: u64 },
    Subscribe,
    Unsubscribe { subscription: SubscriptionId },
    InsertBookmark {
        user_id: UserId,
        title: String,
        url: String,
    },
    UpdateBookmark {
        id: BookmarkId,
        title: String,
        url: String,
    },
    DeleteBookmark { id: BookmarkId },
    SignIn { provider: String },
    SignOut,
}
