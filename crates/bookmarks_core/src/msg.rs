use crate::{Bookmark, BookmarkId, Session, SubscriptionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The page came up; ask the session gate who is signed in.
    Mounted,
    /// Session gate answer. Resolution failures arrive as `None`.
    SessionResolved(Option<Session>),
    /// The change subscription is live.
    SubscriptionOpened(SubscriptionId),
    /// Some row in the bookmarks table changed (no payload).
    RemoteChanged,
    /// A full list fetch for `user_id` succeeded.
    BookmarksLoaded {
        user_id: UserId,
        seq: u64,
        bookmarks: Vec<Bookmark>,
    },
    /// A full list fetch for `user_id` failed; the current list is kept.
    BookmarksLoadFailed {
        user_id: UserId,
        seq: u64,
        message: String,
    },
    /// User typed in the search box.
    SearchChanged(String),
    /// User clicked "New".
    ComposeOpened,
    /// User clicked "Cancel" on the new-bookmark form.
    ComposeCancelled,
    ComposeTitleChanged(String),
    ComposeUrlChanged(String),
    /// User clicked "Save bookmark".
    ComposeSubmitted,
    /// Store answer for the insert issued by `ComposeSubmitted`.
    AddCompleted { result: Result<(), String> },
    /// User clicked the edit control of a row.
    EditStarted { id: BookmarkId },
    EditTitleChanged { id: BookmarkId, title: String },
    EditUrlChanged { id: BookmarkId, url: String },
    /// User clicked "Discard" on an editing row.
    EditDiscarded { id: BookmarkId },
    /// User clicked "Save changes" on an editing row.
    EditSubmitted { id: BookmarkId },
    /// Store answer for the update issued by `EditSubmitted`.
    EditCompleted {
        id: BookmarkId,
        result: Result<(), String>,
    },
    /// User clicked the delete control of a row.
    DeleteClicked { id: BookmarkId },
    /// Store answer for the delete issued by `DeleteClicked`.
    DeleteCompleted {
        id: BookmarkId,
        result: Result<(), String>,
    },
    /// User acknowledged the blocking prompt.
    PromptDismissed,
    /// User closed the error banner.
    BannerDismissed,
    /// User picked an OAuth provider on the sign-in screen.
    SignInClicked { provider: String },
    /// The provider handshake was handed off; carries the authorize URL.
    SignInStarted { result: Result<String, String> },
    /// User clicked "Sign out".
    SignOutClicked,
    SignOutCompleted { result: Result<(), String> },
    /// The page is going away; release the subscription.
    Teardown,
    /// Fallback for placeholder wiring.
    NoOp,
}
