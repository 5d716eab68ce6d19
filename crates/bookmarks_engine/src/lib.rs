//! Bookmarks engine: store client, session gate and effect execution.
mod auth;
mod changes;
mod engine;
mod http;
mod memory;
mod rest;
mod settings;
mod store;
mod types;

pub use auth::{AuthGateway, RestAuthGateway, StaticAuthGateway};
pub use changes::{ChangeCallback, ChangeHub};
pub use engine::{EngineCommand, EngineEvents, EngineHandle};
pub use memory::InMemoryBookmarkStore;
pub use rest::RestBookmarkStore;
pub use settings::ServiceSettings;
pub use store::BookmarkStore;
pub use types::{
    BookmarkDraft, BookmarkRow, EngineEvent, FailureKind, StoreError, SubscriptionId,
    UserIdentity,
};
