use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use bookmarks_core::{update, AppState, Msg};
use bookmarks_engine::{
    AuthGateway, BookmarkStore, EngineHandle, InMemoryBookmarkStore, RestAuthGateway,
    RestBookmarkStore, StaticAuthGateway, UserIdentity,
};
use bookmarks_logging::{bm_info, bm_warn};

use super::config::{AppConfig, Backend};
use super::effects::EffectRunner;
use super::ui;
use super::ui::input::Command;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Core(Msg),
    Line(String),
    Eof,
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let (store, auth) = build_backend(&config)?;
    let (engine, events) = EngineHandle::spawn(store, auth);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(engine, events, tx.clone());
    spawn_stdin_reader(tx);

    let mut app = App {
        state: AppState::new(),
        runner,
        config,
    };
    app.dispatch(Msg::Mounted);

    while let Ok(event) = rx.recv() {
        let line = match event {
            AppEvent::Core(msg) => {
                app.dispatch(msg);
                continue;
            }
            AppEvent::Line(line) => line,
            AppEvent::Eof => break,
        };
        let view = app.state.view();
        match ui::input::parse_command(&line, &view, &app.config.sign_in.provider) {
            Ok(Command::Dispatch(msg)) => app.dispatch(msg),
            Ok(Command::Help) => println!("{}", ui::input::HELP),
            Ok(Command::Quit) => break,
            Err(message) => println!("{message}"),
        }
    }

    app.dispatch(Msg::Teardown);
    bookmarks_logging::clear_scope();
    bm_info!("Shut down");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    config: AppConfig,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);

        match state.session() {
            Some(session) => bookmarks_logging::set_scope(session.user_id.to_string()),
            None => bookmarks_logging::clear_scope(),
        }

        if state.consume_dirty() {
            let view = state.view();
            print!("{}", ui::render::render(&view, self.config.variant));
            let _ = io::stdout().flush();
        }
        self.state = state;
    }
}

fn build_backend(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn BookmarkStore>, Arc<dyn AuthGateway>)> {
    match config.backend {
        Backend::Memory => {
            bm_info!("Using in-memory store for {}", config.demo.user_id);
            let user = UserIdentity {
                id: config.demo.user_id.clone(),
                email: config.demo.email.clone(),
            };
            Ok((
                Arc::new(InMemoryBookmarkStore::new()),
                Arc::new(StaticAuthGateway::signed_in(user)),
            ))
        }
        Backend::Rest => {
            let settings = config.service.to_settings();
            bm_info!("Using hosted store at {}", settings.base_url);
            if settings.access_token.is_none() {
                bm_warn!("No access token configured; the session will resolve as signed out");
            }
            let store = RestBookmarkStore::new(settings.clone())
                .context("failed to build bookmark store client")?;
            let auth = RestAuthGateway::new(settings, config.sign_in.redirect_to.clone())
                .context("failed to build auth client")?;
            Ok((Arc::new(store), Arc::new(auth)))
        }
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::Eof);
    });
}
