use std::sync::mpsc;
use std::thread;

use bookmarks_core::{Bookmark, BookmarkId, Effect, Msg, Session, UserId};
use bookmarks_engine::{
    BookmarkDraft, BookmarkRow, EngineCommand, EngineEvent, EngineEvents, EngineHandle,
};
use bookmarks_logging::{bm_debug, bm_info};

use super::app::AppEvent;

/// Turns core effects into engine commands and engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: EngineEvents, tx: mpsc::Sender<AppEvent>) -> Self {
        spawn_event_loop(events, tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match to_command(effect) {
                Some(command) => self.engine.submit(command),
                None => bm_info!("Redirecting to sign-in"),
            }
        }
    }
}

/// `None` for effects the front-end handles itself.
fn to_command(effect: Effect) -> Option<EngineCommand> {
    let command = match effect {
        Effect::ResolveSession => EngineCommand::ResolveSession,
        Effect::RedirectToLogin => return None,
        Effect::FetchBookmarks { user_id, seq } => EngineCommand::Fetch {
            user_id: user_id.0,
            seq,
        },
        Effect::Subscribe => EngineCommand::Subscribe,
        Effect::Unsubscribe { subscription } => EngineCommand::Unsubscribe { subscription },
        Effect::InsertBookmark {
            user_id,
            title,
            url,
        } => {
            bm_debug!("InsertBookmark url_len={}", url.len());
            EngineCommand::Insert {
                user_id: user_id.0,
                draft: BookmarkDraft::new(title, url),
            }
        }
        Effect::UpdateBookmark { id, title, url } => EngineCommand::Update {
            id: id.0,
            draft: BookmarkDraft::new(title, url),
        },
        Effect::DeleteBookmark { id } => EngineCommand::Delete { id: id.0 },
        Effect::SignIn { provider } => EngineCommand::SignIn { provider },
        Effect::SignOut => EngineCommand::SignOut,
    };
    Some(command)
}

fn spawn_event_loop(events: EngineEvents, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            bm_debug!("Engine event {:?}", event);
            if tx.send(AppEvent::Core(to_msg(event))).is_err() {
                break;
            }
        }
    });
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SessionResolved(user) => Msg::SessionResolved(user.map(|user| Session {
            user_id: UserId(user.id),
            email: user.email,
        })),
        EngineEvent::Fetched {
            user_id,
            seq,
            result,
        } => match result {
            Ok(rows) => Msg::BookmarksLoaded {
                user_id: UserId(user_id),
                seq,
                bookmarks: rows.into_iter().map(to_bookmark).collect(),
            },
            Err(err) => Msg::BookmarksLoadFailed {
                user_id: UserId(user_id),
                seq,
                message: err.to_string(),
            },
        },
        EngineEvent::Inserted { result } => Msg::AddCompleted {
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::Updated { id, result } => Msg::EditCompleted {
            id: BookmarkId(id),
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::Deleted { id, result } => Msg::DeleteCompleted {
            id: BookmarkId(id),
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::Subscribed(subscription) => Msg::SubscriptionOpened(subscription),
        EngineEvent::RemoteChange => Msg::RemoteChanged,
        EngineEvent::SignInStarted { result } => Msg::SignInStarted {
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::SignedOut { result } => Msg::SignOutCompleted {
            result: result.map_err(|err| err.to_string()),
        },
    }
}

fn to_bookmark(row: BookmarkRow) -> Bookmark {
    Bookmark {
        id: BookmarkId(row.id),
        user_id: UserId(row.user_id),
        title: row.title,
        url: row.url,
        created_at: row.created_at.to_rfc3339(),
    }
}
