//! Bookmarks core: URL validation, the list controller state machine and
//! view-model projection. No IO happens here; store calls are returned as
//! [`Effect`]s and their outcomes come back as [`Msg`]s.
mod effect;
mod msg;
mod search;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use search::filter_bookmarks;
pub use state::{
    AppState, Bookmark, BookmarkId, DeletePhase, EditBuffer, Session, SessionPhase,
    SubscriptionId, UserId,
};
pub use update::update;
pub use validate::{
    domain_of, favicon_url_of, is_valid_url, validate_draft, DraftError, ValidDraft,
    FAVICON_SERVICE,
};
pub use view_model::{
    AppViewModel, BookmarkRowView, ComposerView, EmptyStateView, RowMode, SignInView,
};
