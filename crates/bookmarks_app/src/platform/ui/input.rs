use bookmarks_core::{AppViewModel, Msg, SessionPhase};

pub const HELP: &str = "\
Commands:
  new | title <text> | url <text> | save | cancel
  search [text]
  edit <n> | set <n> title|url <text> | commit <n> | discard <n>
  delete <n>
  ok              dismiss the current prompt or error
  login [provider] | logout
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

/// Parses one input line against the rows currently on screen; `<n>` is the
/// 1-based row number.
pub fn parse_command(
    line: &str,
    view: &AppViewModel,
    default_provider: &str,
) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word {
        "" => return Err("type `help` for commands".to_string()),
        "help" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "login" => Msg::SignInClicked {
            provider: if rest.is_empty() {
                default_provider.to_string()
            } else {
                rest.to_string()
            },
        },
        "logout" => Msg::SignOutClicked,
        "ok" => {
            if view.prompt.is_some() {
                Msg::PromptDismissed
            } else {
                Msg::BannerDismissed
            }
        }
        _ if view.phase != SessionPhase::Active => {
            return Err("sign in first (`login`)".to_string());
        }
        "new" => Msg::ComposeOpened,
        "title" => Msg::ComposeTitleChanged(rest.to_string()),
        "url" => Msg::ComposeUrlChanged(rest.to_string()),
        "save" => Msg::ComposeSubmitted,
        "cancel" => Msg::ComposeCancelled,
        "search" => Msg::SearchChanged(rest.to_string()),
        "edit" => Msg::EditStarted {
            id: row_id(view, rest)?,
        },
        "commit" => Msg::EditSubmitted {
            id: row_id(view, rest)?,
        },
        "discard" => Msg::EditDiscarded {
            id: row_id(view, rest)?,
        },
        "delete" => Msg::DeleteClicked {
            id: row_id(view, rest)?,
        },
        "set" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let id = row_id(view, parts.next().unwrap_or(""))?;
            let field = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("").trim().to_string();
            match field {
                "title" => Msg::EditTitleChanged { id, title: value },
                "url" => Msg::EditUrlChanged { id, url: value },
                _ => return Err("usage: set <n> title|url <text>".to_string()),
            }
        }
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Command::Dispatch(msg))
}

fn row_id(view: &AppViewModel, raw: &str) -> Result<bookmarks_core::BookmarkId, String> {
    let index: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected a row number, got `{raw}`"))?;
    index
        .checked_sub(1)
        .and_then(|i| view.rows.get(i))
        .map(|row| row.id.clone())
        .ok_or_else(|| format!("no row {index}"))
}

#[cfg(test)]
mod tests {
    use bookmarks_core::{BookmarkId, BookmarkRowView, RowMode};

    use super::*;

    fn active_view() -> AppViewModel {
        let row = |id: &str| BookmarkRowView {
            id: BookmarkId(id.to_string()),
            title: id.to_string(),
            url: format!("https://{id}.com"),
            domain: format!("{id}.com"),
            favicon_url: None,
            created_at: String::new(),
            mode: RowMode::Viewing,
            delete_enabled: true,
        };
        AppViewModel {
            phase: SessionPhase::Active,
            rows: vec![row("a"), row("b")],
            ..AppViewModel::default()
        }
    }

    fn parse(line: &str, view: &AppViewModel) -> Result<Command, String> {
        parse_command(line, view, "google")
    }

    #[test]
    fn row_numbers_map_to_visible_ids() {
        let view = active_view();
        assert_eq!(
            parse("delete 2", &view),
            Ok(Command::Dispatch(Msg::DeleteClicked {
                id: BookmarkId("b".to_string())
            }))
        );
        assert!(parse("delete 0", &view).is_err());
        assert!(parse("delete 3", &view).is_err());
        assert!(parse("edit x", &view).is_err());
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        let view = active_view();
        assert_eq!(
            parse("set 1 title  My  Title ", &view),
            Ok(Command::Dispatch(Msg::EditTitleChanged {
                id: BookmarkId("a".to_string()),
                title: "My  Title".to_string(),
            }))
        );
        assert!(parse("set 1 colour red", &view).is_err());
    }

    #[test]
    fn login_defaults_provider() {
        let view = AppViewModel {
            phase: SessionPhase::Redirected,
            ..AppViewModel::default()
        };
        assert_eq!(
            parse("login", &view),
            Ok(Command::Dispatch(Msg::SignInClicked {
                provider: "google".to_string()
            }))
        );
        assert_eq!(
            parse("login github", &view),
            Ok(Command::Dispatch(Msg::SignInClicked {
                provider: "github".to_string()
            }))
        );
        assert!(parse("new", &view).is_err());
    }

    #[test]
    fn ok_prefers_prompt_over_banner() {
        let mut view = active_view();
        view.banner = Some("x".to_string());
        assert_eq!(parse("ok", &view), Ok(Command::Dispatch(Msg::BannerDismissed)));
        view.prompt = Some("y".to_string());
        assert_eq!(parse("ok", &view), Ok(Command::Dispatch(Msg::PromptDismissed)));
    }

    #[test]
    fn search_without_text_clears() {
        assert_eq!(
            parse("search", &active_view()),
            Ok(Command::Dispatch(Msg::SearchChanged(String::new())))
        );
        assert_eq!(parse("quit", &active_view()), Ok(Command::Quit));
    }
}
