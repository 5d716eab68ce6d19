use crate::state::SignIn;
use crate::{domain_of, favicon_url_of, filter_bookmarks, AppState, BookmarkId, SessionPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: SessionPhase,
    pub email: Option<String>,
    pub query: String,
    /// False until the first fetch for the session completes.
    pub loaded: bool,
    pub total: usize,
    pub rows: Vec<BookmarkRowView>,
    /// Counts line, e.g. `3 bookmarks` or `1 of 3 bookmarks`.
    pub summary: String,
    pub empty: Option<EmptyStateView>,
    pub composer: Option<ComposerView>,
    /// Blocking message from the edit form; must be dismissed.
    pub prompt: Option<String>,
    /// Remote failure surfaced to the user.
    pub banner: Option<String>,
    pub sign_in: Option<SignInView>,
    pub signing_out: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRowView {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub favicon_url: Option<String>,
    /// Server timestamp as received, RFC 3339.
    pub created_at: String,
    pub mode: RowMode,
    pub delete_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMode {
    Viewing,
    Editing {
        title: String,
        url: String,
        saving: bool,
        can_save: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerView {
    pub title: String,
    pub url: String,
    pub title_error: Option<String>,
    pub url_error: Option<String>,
    pub saving: bool,
    pub can_save: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyStateView {
    pub headline: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInView {
    pub provider: String,
    pub authorize_url: Option<String>,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState, dirty: bool) -> Self {
        let visible = filter_bookmarks(&state.bookmarks, &state.query);
        let rows: Vec<BookmarkRowView> = visible
            .into_iter()
            .map(|bookmark| {
                let mode = match state.editing.get(&bookmark.id) {
                    Some(slot) => RowMode::Editing {
                        title: slot.buffer.title.clone(),
                        url: slot.buffer.url.clone(),
                        saving: slot.saving,
                        can_save: !slot.saving
                            && !slot.buffer.title.is_empty()
                            && !slot.buffer.url.is_empty(),
                    },
                    None => RowMode::Viewing,
                };
                BookmarkRowView {
                    id: bookmark.id.clone(),
                    title: bookmark.title.clone(),
                    url: bookmark.url.clone(),
                    domain: domain_of(&bookmark.url),
                    favicon_url: favicon_url_of(&bookmark.url),
                    created_at: bookmark.created_at.clone(),
                    mode,
                    delete_enabled: !state.deleting.contains_key(&bookmark.id),
                }
            })
            .collect();

        let total = state.bookmarks.len();
        let searching = !state.query.is_empty();
        let summary = if searching {
            format!("{} of {} bookmarks", rows.len(), total)
        } else if total == 1 {
            "1 bookmark".to_string()
        } else {
            format!("{total} bookmarks")
        };

        let empty = if rows.is_empty() && state.loaded {
            Some(if searching {
                EmptyStateView {
                    headline: "No results found",
                    hint: "Try a different search term",
                }
            } else {
                EmptyStateView {
                    headline: "No bookmarks yet",
                    hint: "Hit \"+ New\" to save your first bookmark",
                }
            })
        } else {
            None
        };

        let composer = state.composer.open.then(|| {
            let composer = &state.composer;
            let (title_error, url_error) = match composer.error {
                Some(error) if error.is_url_error() => (None, Some(error.to_string())),
                Some(error) => (Some(error.to_string()), None),
                None => (None, None),
            };
            ComposerView {
                title: composer.buffer.title.clone(),
                url: composer.buffer.url.clone(),
                title_error,
                url_error,
                saving: composer.saving,
                can_save: !composer.saving
                    && !composer.buffer.title.is_empty()
                    && !composer.buffer.url.is_empty(),
            }
        });

        let sign_in = match (&state.phase, &state.sign_in) {
            (SessionPhase::Redirected, Some(SignIn::Pending { provider })) => Some(SignInView {
                provider: provider.clone(),
                authorize_url: None,
            }),
            (
                SessionPhase::Redirected,
                Some(SignIn::Started {
                    provider,
                    authorize_url,
                }),
            ) => Some(SignInView {
                provider: provider.clone(),
                authorize_url: Some(authorize_url.clone()),
            }),
            _ => None,
        };

        Self {
            phase: state.phase,
            email: state.session.as_ref().and_then(|s| s.email.clone()),
            query: state.query.clone(),
            loaded: state.loaded,
            total,
            rows,
            summary,
            empty,
            composer,
            prompt: state.prompt.clone(),
            banner: state.banner.clone(),
            sign_in,
            signing_out: state.signing_out,
            dirty,
        }
    }
}
