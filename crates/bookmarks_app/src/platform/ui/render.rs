use std::fmt::Write as _;

use bookmarks_core::{AppViewModel, BookmarkRowView, RowMode, SessionPhase};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

const RULE: &str = "----------------------------------------";
const NO_FAVICON: &str = "[*]";

/// Row layout. `Cards` shows the favicon and saved date on extra lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    #[default]
    Cards,
    Compact,
}

pub fn render(view: &AppViewModel, variant: Variant) -> String {
    let mut out = String::new();
    match view.phase {
        SessionPhase::Resolving => out.push_str("Checking session...\n"),
        SessionPhase::Redirected => render_sign_in(&mut out, view),
        SessionPhase::Closed => out.push_str("Goodbye.\n"),
        SessionPhase::Active => render_list(&mut out, view, variant),
    }
    if let Some(banner) = &view.banner {
        let _ = writeln!(out, "! {banner}  (`ok` to dismiss)");
    }
    out
}

fn render_sign_in(out: &mut String, view: &AppViewModel) {
    out.push_str("Smart Bookmarks\n");
    match &view.sign_in {
        None => out.push_str("Sign in to see your bookmarks: `login [provider]`\n"),
        Some(sign_in) => match &sign_in.authorize_url {
            None => {
                let _ = writeln!(out, "Contacting {}...", sign_in.provider);
            }
            Some(url) => {
                let _ = writeln!(out, "Continue with {} at:\n  {url}", sign_in.provider);
            }
        },
    }
}

fn render_list(out: &mut String, view: &AppViewModel, variant: Variant) {
    let who = view.email.as_deref().unwrap_or("signed in");
    let sign_out = if view.signing_out {
        "signing out..."
    } else {
        "`logout`"
    };
    let _ = writeln!(out, "Smart Bookmarks | {who} | {sign_out}");
    out.push_str(RULE);
    out.push('\n');

    if let Some(prompt) = &view.prompt {
        let _ = writeln!(out, ">> {prompt}  (`ok`)");
    }

    if let Some(composer) = &view.composer {
        out.push_str("New bookmark\n");
        let _ = writeln!(out, "  title: {}", composer.title);
        if let Some(error) = &composer.title_error {
            let _ = writeln!(out, "         ^ {error}");
        }
        let _ = writeln!(out, "  url:   {}", composer.url);
        if let Some(error) = &composer.url_error {
            let _ = writeln!(out, "         ^ {error}");
        }
        if composer.saving {
            out.push_str("  saving...\n");
        } else if composer.can_save {
            out.push_str("  `save` or `cancel`\n");
        } else {
            out.push_str("  `cancel`\n");
        }
        out.push_str(RULE);
        out.push('\n');
    }

    if !view.query.is_empty() {
        let _ = writeln!(out, "search: {}", view.query);
    }

    if !view.loaded {
        out.push_str("Loading bookmarks...\n");
        return;
    }

    let _ = writeln!(out, "{}", view.summary);
    for (index, row) in view.rows.iter().enumerate() {
        render_row(out, index + 1, row, variant);
    }
    if let Some(empty) = &view.empty {
        let _ = writeln!(out, "\n  {}\n  {}", empty.headline, empty.hint);
    }
}

fn render_row(out: &mut String, number: usize, row: &BookmarkRowView, variant: Variant) {
    let deleting = if row.delete_enabled { "" } else { " (deleting)" };
    match &row.mode {
        RowMode::Editing {
            title,
            url,
            saving,
            can_save,
        } => {
            let _ = writeln!(out, "{number:>3}. [editing]{deleting}");
            let _ = writeln!(out, "     title: {title}");
            let _ = writeln!(out, "     url:   {url}");
            let hint = if *saving {
                "saving..."
            } else if *can_save {
                "`commit` or `discard`"
            } else {
                "`discard`"
            };
            let _ = writeln!(out, "     {hint}");
        }
        RowMode::Viewing => match variant {
            Variant::Compact => {
                let _ = writeln!(out, "{number:>3}. {} ({}){deleting}", row.title, row.domain);
            }
            Variant::Cards => {
                let _ = writeln!(out, "{number:>3}. {}{deleting}", row.title);
                let _ = writeln!(out, "     {} {}", favicon(row), row.domain);
                let _ = writeln!(out, "     {}", row.url);
                if let Some(date) = saved_on(&row.created_at) {
                    let _ = writeln!(out, "     saved {date}");
                }
            }
        },
    }
}

fn favicon(row: &BookmarkRowView) -> &str {
    row.favicon_url.as_deref().unwrap_or(NO_FAVICON)
}

fn saved_on(created_at: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(created_at)
        .ok()
        .map(|at| at.format("%Y-%m-%d").to_string())
}
