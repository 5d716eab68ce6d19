use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type SubscriptionId = u64;

/// One row of the `bookmarks` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Mutable columns of a bookmark, used for both insert and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
}

impl BookmarkDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct StoreError {
    pub kind: FailureKind,
    pub message: String,
}

impl StoreError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Unauthorized,
    NotFound,
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
        }
    }
}

/// Outcomes reported back to the message loop, one per executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Auth check finished. Failures are folded into `None`.
    SessionResolved(Option<UserIdentity>),
    Fetched {
        user_id: String,
        seq: u64,
        result: Result<Vec<BookmarkRow>, StoreError>,
    },
    Inserted {
        result: Result<(), StoreError>,
    },
    Updated {
        id: String,
        result: Result<(), StoreError>,
    },
    Deleted {
        id: String,
        result: Result<(), StoreError>,
    },
    Subscribed(SubscriptionId),
    /// A change notification arrived on a live subscription.
    RemoteChange,
    SignInStarted {
        result: Result<String, StoreError>,
    },
    SignedOut {
        result: Result<(), StoreError>,
    },
}
