use std::sync::Once;

use bookmarks_core::{
    update, AppState, Bookmark, BookmarkId, DeletePhase, Effect, Msg, RowMode, Session, UserId,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bookmarks_logging::initialize_for_tests);
}

fn user() -> UserId {
    UserId("alice".to_string())
}

fn id(raw: &str) -> BookmarkId {
    BookmarkId(raw.to_string())
}

fn bookmark(raw: &str, title: &str, url: &str) -> Bookmark {
    Bookmark {
        id: id(raw),
        user_id: user(),
        title: title.to_string(),
        url: url.to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

fn loaded(bookmarks: Vec<Bookmark>) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::SessionResolved(Some(Session {
            user_id: user(),
            email: None,
        })),
    );
    let (mut state, _) = update(
        state,
        Msg::BookmarksLoaded {
            user_id: user(),
            seq: 1,
            bookmarks,
        },
    );
    state.consume_dirty();
    state
}

fn compose(state: AppState, title: &str, url: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::ComposeOpened);
    let (state, _) = update(state, Msg::ComposeTitleChanged(title.to_string()));
    let (state, _) = update(state, Msg::ComposeUrlChanged(url.to_string()));
    update(state, Msg::ComposeSubmitted)
}

fn fetch(seq: u64) -> Effect {
    Effect::FetchBookmarks { user_id: user(), seq }
}

#[test]
fn valid_compose_inserts_then_reloads_on_success() {
    init_logging();
    let (state, effects) = compose(loaded(Vec::new()), "T", "https://t.com");
    assert_eq!(
        effects,
        vec![Effect::InsertBookmark {
            user_id: user(),
            title: "T".to_string(),
            url: "https://t.com".to_string(),
        }]
    );
    let composer = state.view().composer.expect("composer open");
    assert!(composer.saving);
    assert!(!composer.can_save);

    // Save is disabled while the insert is in flight.
    let (state, effects) = update(state, Msg::ComposeSubmitted);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::AddCompleted { result: Ok(()) });
    assert_eq!(effects, vec![fetch(2)]);
    assert_eq!(state.view().composer, None);

    // Reopening starts from an empty buffer.
    let (state, _) = update(state, Msg::ComposeOpened);
    let composer = state.view().composer.expect("composer open");
    assert_eq!(composer.title, "");
    assert_eq!(composer.url, "");
}

#[test]
fn invalid_url_stays_composing_with_field_error() {
    init_logging();
    let (state, effects) = compose(loaded(Vec::new()), "T", "ftp://x.com");
    assert!(effects.is_empty());
    let composer = state.view().composer.expect("composer open");
    assert_eq!(
        composer.url_error.as_deref(),
        Some("Please enter a valid URL (e.g., https://example.com)")
    );
    assert_eq!(composer.title_error, None);
    assert!(!composer.saving);

    // Editing the url clears its error.
    let (state, _) = update(state, Msg::ComposeUrlChanged("https://x.com".to_string()));
    assert_eq!(state.view().composer.unwrap().url_error, None);
}

#[test]
fn empty_fields_are_rejected_without_store_call() {
    init_logging();
    let (state, effects) = compose(loaded(Vec::new()), "   ", "https://t.com");
    assert!(effects.is_empty());
    assert_eq!(
        state.view().composer.unwrap().title_error.as_deref(),
        Some("Please enter a title")
    );

    let (state, effects) = compose(loaded(Vec::new()), "T", "");
    assert!(effects.is_empty());
    assert_eq!(
        state.view().composer.unwrap().url_error.as_deref(),
        Some("Please enter a URL")
    );
}

#[test]
fn cancel_discards_buffer() {
    init_logging();
    let (state, _) = update(loaded(Vec::new()), Msg::ComposeOpened);
    let (state, _) = update(state, Msg::ComposeTitleChanged("draft".to_string()));
    let (state, effects) = update(state, Msg::ComposeCancelled);
    assert!(effects.is_empty());
    assert_eq!(state.view().composer, None);
}

#[test]
fn failed_insert_keeps_form_and_clears_loading() {
    init_logging();
    let (state, _) = compose(loaded(Vec::new()), "T", "https://t.com");
    let (state, effects) = update(
        state,
        Msg::AddCompleted {
            result: Err("http status 500".to_string()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    let composer = view.composer.expect("composer still open");
    assert!(!composer.saving);
    assert_eq!(composer.title, "T");
    assert_eq!(
        view.banner.as_deref(),
        Some("Could not save bookmark: http status 500")
    );
}

#[test]
fn edit_prefills_and_saves_valid_buffer() {
    init_logging();
    let state = loaded(vec![bookmark("a", "Rust", "https://rust-lang.org")]);
    let (state, _) = update(state, Msg::EditStarted { id: id("a") });
    assert!(state.is_editing(&id("a")));
    assert_eq!(
        state.view().rows[0].mode,
        RowMode::Editing {
            title: "Rust".to_string(),
            url: "https://rust-lang.org".to_string(),
            saving: false,
            can_save: true,
        }
    );

    let (state, _) = update(
        state,
        Msg::EditTitleChanged {
            id: id("a"),
            title: "Rust Lang".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::EditSubmitted { id: id("a") });
    assert_eq!(
        effects,
        vec![Effect::UpdateBookmark {
            id: id("a"),
            title: "Rust Lang".to_string(),
            url: "https://rust-lang.org".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::EditCompleted {
            id: id("a"),
            result: Ok(()),
        },
    );
    assert_eq!(effects, vec![fetch(2)]);
    assert!(!state.is_editing(&id("a")));
}

#[test]
fn invalid_edit_stays_editing_with_prompt() {
    init_logging();
    let state = loaded(vec![bookmark("a", "Rust", "https://rust-lang.org")]);
    let (state, _) = update(state, Msg::EditStarted { id: id("a") });
    let (state, _) = update(
        state,
        Msg::EditUrlChanged {
            id: id("a"),
            url: "not a url".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::EditSubmitted { id: id("a") });

    assert!(effects.is_empty());
    assert!(state.is_editing(&id("a")));
    assert_eq!(
        state.view().prompt.as_deref(),
        Some("Please enter a valid URL (e.g., https://example.com)")
    );
    // The stored row is untouched.
    assert_eq!(state.bookmarks()[0].url, "https://rust-lang.org");

    let (state, _) = update(state, Msg::PromptDismissed);
    assert_eq!(state.view().prompt, None);
    assert!(state.is_editing(&id("a")));
}

#[test]
fn discard_returns_to_viewing_without_store_call() {
    init_logging();
    let state = loaded(vec![bookmark("a", "Rust", "https://rust-lang.org")]);
    let (state, _) = update(state, Msg::EditStarted { id: id("a") });
    let (state, effects) = update(state, Msg::EditDiscarded { id: id("a") });
    assert!(effects.is_empty());
    assert_eq!(state.view().rows[0].mode, RowMode::Viewing);
}

#[test]
fn rows_edit_independently() {
    init_logging();
    let state = loaded(vec![
        bookmark("a", "A", "https://a.com"),
        bookmark("b", "B", "https://b.com"),
    ]);
    let (state, _) = update(state, Msg::EditStarted { id: id("a") });
    let (state, _) = update(state, Msg::EditStarted { id: id("b") });
    let (state, effects_a) = update(state, Msg::EditSubmitted { id: id("a") });
    let (state, effects_b) = update(state, Msg::EditSubmitted { id: id("b") });
    assert_eq!(effects_a.len(), 1);
    assert_eq!(effects_b.len(), 1);

    let (state, _) = update(
        state,
        Msg::EditCompleted {
            id: id("b"),
            result: Err("timeout".to_string()),
        },
    );
    assert!(state.is_editing(&id("a")));
    assert!(state.is_editing(&id("b")));
    let modes: Vec<_> = state.view().rows.into_iter().map(|r| r.mode).collect();
    assert!(matches!(modes[0], RowMode::Editing { saving: true, .. }));
    assert!(matches!(modes[1], RowMode::Editing { saving: false, .. }));
}

#[test]
fn edit_buffer_dropped_when_row_disappears_remotely() {
    init_logging();
    let state = loaded(vec![bookmark("a", "A", "https://a.com")]);
    let (state, _) = update(state, Msg::EditStarted { id: id("a") });
    let (state, _) = update(
        state,
        Msg::BookmarksLoaded {
            user_id: user(),
            seq: 2,
            bookmarks: Vec::new(),
        },
    );
    assert!(!state.is_editing(&id("a")));
}

#[test]
fn delete_disables_control_until_reload() {
    init_logging();
    let state = loaded(vec![bookmark("a", "A", "https://a.com")]);
    let (state, effects) = update(state, Msg::DeleteClicked { id: id("a") });
    assert_eq!(effects, vec![Effect::DeleteBookmark { id: id("a") }]);
    assert!(!state.view().rows[0].delete_enabled);

    // Duplicate submissions for the same id are dropped.
    let (state, effects) = update(state, Msg::DeleteClicked { id: id("a") });
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: id("a"),
            result: Ok(()),
        },
    );
    assert_eq!(effects, vec![fetch(2)]);
    assert_eq!(state.delete_phase(&id("a")), Some(DeletePhase::AwaitingReload));

    let (state, _) = update(
        state,
        Msg::BookmarksLoaded {
            user_id: user(),
            seq: 2,
            bookmarks: Vec::new(),
        },
    );
    assert_eq!(state.delete_phase(&id("a")), None);
    assert!(state.bookmarks().is_empty());
}

#[test]
fn failed_delete_reenables_control() {
    init_logging();
    let state = loaded(vec![bookmark("a", "A", "https://a.com")]);
    let (state, _) = update(state, Msg::DeleteClicked { id: id("a") });
    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: id("a"),
            result: Err("permission denied".to_string()),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.rows[0].delete_enabled);
    assert_eq!(
        view.banner.as_deref(),
        Some("Could not delete bookmark: permission denied")
    );
}

#[test]
fn two_rows_can_be_deleted_concurrently() {
    init_logging();
    let state = loaded(vec![
        bookmark("a", "A", "https://a.com"),
        bookmark("b", "B", "https://b.com"),
    ]);
    let (state, first) = update(state, Msg::DeleteClicked { id: id("a") });
    let (state, second) = update(state, Msg::DeleteClicked { id: id("b") });
    assert_eq!(first, vec![Effect::DeleteBookmark { id: id("a") }]);
    assert_eq!(second, vec![Effect::DeleteBookmark { id: id("b") }]);
    assert!(state.view().rows.iter().all(|row| !row.delete_enabled));
}

#[test]
fn search_filters_view_without_refetch() {
    init_logging();
    let state = loaded(vec![
        bookmark("a", "Rust Book", "https://doc.rust-lang.org/book"),
        bookmark("b", "News", "https://news.ycombinator.com"),
        bookmark("c", "Crates", "https://crates.io/RUST"),
    ]);
    let (state, effects) = update(state, Msg::SearchChanged("rust".to_string()));
    assert!(effects.is_empty());

    let view = state.view();
    let ids: Vec<_> = view.rows.iter().map(|r| r.id.0.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(view.summary, "2 of 3 bookmarks");

    let (state, _) = update(state, Msg::SearchChanged("zzz".to_string()));
    let empty = state.view().empty.expect("empty state");
    assert_eq!(empty.headline, "No results found");
}

#[test]
fn rows_carry_display_fields() {
    init_logging();
    let state = loaded(vec![bookmark("a", "Example", "https://www.example.com/a")]);
    let view = state.view();
    assert_eq!(view.summary, "1 bookmark");
    assert_eq!(view.rows[0].domain, "example.com");
    assert_eq!(
        view.rows[0].favicon_url.as_deref(),
        Some("https://www.google.com/s2/favicons?sz=32&domain_url=https://www.example.com")
    );
}

#[test]
fn empty_list_shows_first_run_hint() {
    init_logging();
    let view = loaded(Vec::new()).view();
    assert_eq!(view.summary, "0 bookmarks");
    assert_eq!(view.empty.expect("empty state").headline, "No bookmarks yet");
}

#[test]
fn older_fetch_arriving_late_cannot_restore_deleted_row() {
    init_logging();
    let state = loaded(vec![bookmark("a", "A", "https://a.com")]);
    let (state, effects) = update(state, Msg::RemoteChanged);
    assert_eq!(effects, vec![fetch(2)]);

    let (state, _) = update(state, Msg::DeleteClicked { id: id("a") });
    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: id("a"),
            result: Ok(()),
        },
    );
    assert_eq!(effects, vec![fetch(3)]);

    let (mut state, _) = update(
        state,
        Msg::BookmarksLoaded {
            user_id: user(),
            seq: 3,
            bookmarks: Vec::new(),
        },
    );
    state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::BookmarksLoaded {
            user_id: user(),
            seq: 2,
            bookmarks: vec![bookmark("a", "A", "https://a.com")],
        },
    );
    assert!(!state.consume_dirty());
    assert!(state.bookmarks().is_empty());
    assert_eq!(state.delete_phase(&id("a")), None);

    let (state, _) = update(
        state,
        Msg::BookmarksLoadFailed {
            user_id: user(),
            seq: 2,
            message: "timeout".to_string(),
        },
    );
    assert_eq!(state.view().banner, None);
}
