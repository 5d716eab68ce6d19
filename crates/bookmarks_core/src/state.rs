use std::collections::BTreeMap;
use std::fmt;

use crate::validate::DraftError;
use crate::view_model::AppViewModel;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookmarkId(pub String);

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type SubscriptionId = u64;

/// A bookmark as fetched from the store. `created_at` is kept opaque; the
/// store already returns rows newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub user_id: UserId,
    pub title: String,
    pub url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Waiting for the session gate.
    #[default]
    Resolving,
    /// Signed in; bookmark operations are reachable.
    Active,
    /// No session; the user is on the sign-in entry point.
    Redirected,
    /// Torn down; every further message is ignored.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBuffer {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    InFlight,
    /// Delete succeeded; the control stays disabled until the next reload.
    AwaitingReload,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Composer {
    pub(crate) open: bool,
    pub(crate) buffer: EditBuffer,
    pub(crate) error: Option<DraftError>,
    pub(crate) saving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditSlot {
    pub(crate) buffer: EditBuffer,
    pub(crate) saving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SignIn {
    Pending { provider: String },
    Started { provider: String, authorize_url: String },
}

/// List controller state. Owned by the message loop; the presentation layer
/// only ever sees [`AppViewModel`] snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) phase: SessionPhase,
    pub(crate) resolve_requested: bool,
    pub(crate) session: Option<Session>,
    pub(crate) bookmarks: Vec<Bookmark>,
    pub(crate) loaded: bool,
    /// Sequence number of the last fetch issued.
    pub(crate) fetch_seq: u64,
    /// Sequence number of the fetch whose rows are on screen.
    pub(crate) applied_seq: u64,
    pub(crate) query: String,
    pub(crate) composer: Composer,
    pub(crate) editing: BTreeMap<BookmarkId, EditSlot>,
    pub(crate) deleting: BTreeMap<BookmarkId, DeletePhase>,
    pub(crate) subscription: Option<SubscriptionId>,
    pub(crate) prompt: Option<String>,
    pub(crate) banner: Option<String>,
    pub(crate) sign_in: Option<SignIn>,
    pub(crate) signing_out: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self, self.dirty)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn is_editing(&self, id: &BookmarkId) -> bool {
        self.editing.contains_key(id)
    }

    pub fn delete_phase(&self, id: &BookmarkId) -> Option<DeletePhase> {
        self.deleting.get(id).copied()
    }

    /// Returns whether the state changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn active_user(&self) -> Option<UserId> {
        match (self.phase, &self.session) {
            (SessionPhase::Active, Some(session)) => Some(session.user_id.clone()),
            _ => None,
        }
    }

    pub(crate) fn find(&self, id: &BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| &b.id == id)
    }

    /// Replaces the list wholesale after a successful fetch.
    pub(crate) fn replace_bookmarks(&mut self, bookmarks: Vec<Bookmark>) {
        self.bookmarks = bookmarks;
        self.loaded = true;
        self.settle_deletes();
        let present: Vec<BookmarkId> = self.bookmarks.iter().map(|b| b.id.clone()).collect();
        self.editing.retain(|id, slot| slot.saving || present.contains(id));
        self.mark_dirty();
    }

    /// Releases delete controls whose delete already completed.
    pub(crate) fn settle_deletes(&mut self) {
        self.deleting.retain(|_, phase| *phase == DeletePhase::InFlight);
    }

    /// Drops everything tied to the signed-in user.
    pub(crate) fn clear_session(&mut self) {
        self.session = None;
        self.bookmarks.clear();
        self.loaded = false;
        self.query.clear();
        self.composer = Composer::default();
        self.editing.clear();
        self.deleting.clear();
        self.prompt = None;
        self.signing_out = false;
    }
}
