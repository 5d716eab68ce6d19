use crate::state::{EditSlot, SignIn};
use crate::{
    validate_draft, AppState, BookmarkId, DeletePhase, EditBuffer, Effect, Msg, SessionPhase,
    UserId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.phase == SessionPhase::Closed {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.phase == SessionPhase::Resolving && !state.resolve_requested {
                state.resolve_requested = true;
                vec![Effect::ResolveSession]
            } else {
                Vec::new()
            }
        }
        Msg::SessionResolved(session) => {
            if state.phase != SessionPhase::Resolving {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match session {
                Some(session) => {
                    let user_id = session.user_id.clone();
                    state.session = Some(session);
                    state.phase = SessionPhase::Active;
                    vec![fetch_for(&mut state, user_id), Effect::Subscribe]
                }
                None => {
                    state.phase = SessionPhase::Redirected;
                    vec![Effect::RedirectToLogin]
                }
            }
        }
        Msg::SubscriptionOpened(subscription) => {
            // A subscription that lands after sign-out, or a second one, is released.
            if state.phase == SessionPhase::Active && state.subscription.is_none() {
                state.subscription = Some(subscription);
                Vec::new()
            } else {
                vec![Effect::Unsubscribe { subscription }]
            }
        }
        Msg::RemoteChanged => refetch(&mut state),
        Msg::BookmarksLoaded {
            user_id,
            seq,
            bookmarks,
        } => {
            // Fetches run concurrently; a result older than the one on screen is stale.
            if state.active_user().as_ref() == Some(&user_id) && seq > state.applied_seq {
                state.applied_seq = seq;
                state.replace_bookmarks(bookmarks);
            }
            Vec::new()
        }
        Msg::BookmarksLoadFailed {
            user_id,
            seq,
            message,
        } => {
            if state.active_user().as_ref() == Some(&user_id) && seq > state.applied_seq {
                state.settle_deletes();
                state.banner = Some(format!("Could not load bookmarks: {message}"));
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SearchChanged(query) => {
            if state.phase == SessionPhase::Active && state.query != query {
                state.query = query;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ComposeOpened => {
            if state.phase == SessionPhase::Active && !state.composer.saving {
                state.composer.open = true;
                state.composer.buffer = EditBuffer::default();
                state.composer.error = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ComposeCancelled => {
            if state.composer.open && !state.composer.saving {
                state.composer.open = false;
                state.composer.buffer = EditBuffer::default();
                state.composer.error = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ComposeTitleChanged(title) => {
            if state.composer.open && !state.composer.saving {
                state.composer.buffer.title = title;
                if state.composer.error.is_some_and(|e| !e.is_url_error()) {
                    state.composer.error = None;
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ComposeUrlChanged(url) => {
            if state.composer.open && !state.composer.saving {
                state.composer.buffer.url = url;
                if state.composer.error.is_some_and(|e| e.is_url_error()) {
                    state.composer.error = None;
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ComposeSubmitted => submit_composer(&mut state),
        Msg::AddCompleted { result } => {
            if !state.composer.saving || state.phase != SessionPhase::Active {
                return (state, Vec::new());
            }
            state.composer.saving = false;
            state.mark_dirty();
            match result {
                Ok(()) => {
                    state.composer.open = false;
                    state.composer.buffer = EditBuffer::default();
                    refetch(&mut state)
                }
                Err(message) => {
                    state.banner = Some(format!("Could not save bookmark: {message}"));
                    Vec::new()
                }
            }
        }
        Msg::EditStarted { id } => {
            if state.phase != SessionPhase::Active || state.editing.contains_key(&id) {
                return (state, Vec::new());
            }
            let Some(bookmark) = state.find(&id) else {
                return (state, Vec::new());
            };
            let slot = EditSlot {
                buffer: EditBuffer {
                    title: bookmark.title.clone(),
                    url: bookmark.url.clone(),
                },
                saving: false,
            };
            state.editing.insert(id, slot);
            state.mark_dirty();
            Vec::new()
        }
        Msg::EditTitleChanged { id, title } => {
            if let Some(slot) = editable_slot(&mut state, &id) {
                slot.buffer.title = title;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EditUrlChanged { id, url } => {
            if let Some(slot) = editable_slot(&mut state, &id) {
                slot.buffer.url = url;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EditDiscarded { id } => {
            if editable_slot(&mut state, &id).is_some() {
                state.editing.remove(&id);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EditSubmitted { id } => submit_edit(&mut state, id),
        Msg::EditCompleted { id, result } => {
            if state.phase != SessionPhase::Active {
                return (state, Vec::new());
            }
            if !state.editing.get(&id).is_some_and(|slot| slot.saving) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(()) => {
                    state.editing.remove(&id);
                    refetch(&mut state)
                }
                Err(message) => {
                    if let Some(slot) = state.editing.get_mut(&id) {
                        slot.saving = false;
                    }
                    state.banner = Some(format!("Could not update bookmark: {message}"));
                    Vec::new()
                }
            }
        }
        Msg::DeleteClicked { id } => {
            if state.phase != SessionPhase::Active
                || state.deleting.contains_key(&id)
                || state.find(&id).is_none()
            {
                return (state, Vec::new());
            }
            state.deleting.insert(id.clone(), DeletePhase::InFlight);
            state.mark_dirty();
            vec![Effect::DeleteBookmark { id }]
        }
        Msg::DeleteCompleted { id, result } => {
            if state.phase != SessionPhase::Active
                || state.deleting.get(&id) != Some(&DeletePhase::InFlight)
            {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(()) => {
                    state.deleting.insert(id, DeletePhase::AwaitingReload);
                    refetch(&mut state)
                }
                Err(message) => {
                    state.deleting.remove(&id);
                    state.banner = Some(format!("Could not delete bookmark: {message}"));
                    Vec::new()
                }
            }
        }
        Msg::PromptDismissed => {
            if state.prompt.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BannerDismissed => {
            if state.banner.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SignInClicked { provider } => {
            let pending = matches!(state.sign_in, Some(SignIn::Pending { .. }));
            if state.phase != SessionPhase::Redirected || pending {
                return (state, Vec::new());
            }
            state.sign_in = Some(SignIn::Pending {
                provider: provider.clone(),
            });
            state.mark_dirty();
            vec![Effect::SignIn { provider }]
        }
        Msg::SignInStarted { result } => {
            if !matches!(state.sign_in, Some(SignIn::Pending { .. })) {
                return (state, Vec::new());
            }
            let Some(SignIn::Pending { provider }) = state.sign_in.take() else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            match result {
                Ok(authorize_url) => {
                    state.sign_in = Some(SignIn::Started {
                        provider,
                        authorize_url,
                    });
                }
                Err(message) => {
                    state.banner = Some(format!("Could not start sign-in: {message}"));
                }
            }
            Vec::new()
        }
        Msg::SignOutClicked => {
            if state.phase != SessionPhase::Active || state.signing_out {
                return (state, Vec::new());
            }
            state.signing_out = true;
            state.mark_dirty();
            vec![Effect::SignOut]
        }
        Msg::SignOutCompleted { result } => {
            if state.phase != SessionPhase::Active || !state.signing_out {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(()) => {
                    state.clear_session();
                    state.phase = SessionPhase::Redirected;
                    let mut effects = Vec::with_capacity(2);
                    if let Some(subscription) = state.subscription.take() {
                        effects.push(Effect::Unsubscribe { subscription });
                    }
                    effects.push(Effect::RedirectToLogin);
                    effects
                }
                Err(message) => {
                    state.signing_out = false;
                    state.banner = Some(format!("Could not sign out: {message}"));
                    Vec::new()
                }
            }
        }
        Msg::Teardown => {
            state.phase = SessionPhase::Closed;
            state.mark_dirty();
            match state.subscription.take() {
                Some(subscription) => vec![Effect::Unsubscribe { subscription }],
                None => Vec::new(),
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn refetch(state: &mut AppState) -> Vec<Effect> {
    match state.active_user() {
        Some(user_id) => vec![fetch_for(state, user_id)],
        None => Vec::new(),
    }
}

fn fetch_for(state: &mut AppState, user_id: UserId) -> Effect {
    state.fetch_seq += 1;
    Effect::FetchBookmarks {
        user_id,
        seq: state.fetch_seq,
    }
}

fn editable_slot<'a>(state: &'a mut AppState, id: &BookmarkId) -> Option<&'a mut EditSlot> {
    if state.phase != SessionPhase::Active {
        return None;
    }
    state.editing.get_mut(id).filter(|slot| !slot.saving)
}

fn submit_composer(state: &mut AppState) -> Vec<Effect> {
    let Some(user_id) = state.active_user() else {
        return Vec::new();
    };
    if !state.composer.open || state.composer.saving {
        return Vec::new();
    }
    state.mark_dirty();
    let buffer = &state.composer.buffer;
    match validate_draft(&buffer.title, &buffer.url) {
        Ok(draft) => {
            state.composer.error = None;
            state.composer.saving = true;
            vec![Effect::InsertBookmark {
                user_id,
                title: draft.title,
                url: draft.url,
            }]
        }
        Err(error) => {
            state.composer.error = Some(error);
            Vec::new()
        }
    }
}

fn submit_edit(state: &mut AppState, id: BookmarkId) -> Vec<Effect> {
    let Some(slot) = editable_slot(state, &id) else {
        return Vec::new();
    };
    match validate_draft(&slot.buffer.title, &slot.buffer.url) {
        Ok(draft) => {
            slot.saving = true;
            state.mark_dirty();
            vec![Effect::UpdateBookmark {
                id,
                title: draft.title,
                url: draft.url,
            }]
        }
        Err(error) => {
            state.prompt = Some(error.to_string());
            state.mark_dirty();
            Vec::new()
        }
    }
}
