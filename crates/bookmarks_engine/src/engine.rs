use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use bookmarks_logging::{bm_debug, bm_warn};

use crate::{AuthGateway, BookmarkDraft, BookmarkStore, EngineEvent, SubscriptionId};

/// Work the message loop asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    ResolveSession,
    /// `seq` is echoed back in [`EngineEvent::Fetched`].
    Fetch { user_id: String, seq: u64 },
    Insert { user_id: String, draft: BookmarkDraft },
    Update { id: String, draft: BookmarkDraft },
    Delete { id: String },
    Subscribe,
    Unsubscribe { subscription: SubscriptionId },
    SignIn { provider: String },
    SignOut,
}

/// Sending half: cheap to clone, submits commands to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half: every command except `Unsubscribe` yields exactly one
/// event, plus one `RemoteChange` per notification on a live subscription.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    /// Starts the engine thread with its own tokio runtime.
    pub fn spawn(
        store: Arc<dyn BookmarkStore>,
        auth: Arc<dyn AuthGateway>,
    ) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                bm_debug!("Engine command {:?}", command);
                match command {
                    // Subscription bookkeeping is synchronous.
                    EngineCommand::Subscribe => {
                        let tx = event_tx.clone();
                        let id = store.subscribe_to_changes(Box::new(move || {
                            let _ = tx.send(EngineEvent::RemoteChange);
                        }));
                        let _ = event_tx.send(EngineEvent::Subscribed(id));
                    }
                    EngineCommand::Unsubscribe { subscription } => {
                        if !store.unsubscribe(subscription) {
                            bm_warn!("Unsubscribe for unknown subscription {}", subscription);
                        }
                    }
                    command => {
                        let store = store.clone();
                        let auth = auth.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            if let Some(event) =
                                handle_command(store.as_ref(), auth.as_ref(), command).await
                            {
                                let _ = event_tx.send(event);
                            }
                        });
                    }
                }
            }
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn submit(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Blocks until the next event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    store: &dyn BookmarkStore,
    auth: &dyn AuthGateway,
    command: EngineCommand,
) -> Option<EngineEvent> {
    let event = match command {
        EngineCommand::ResolveSession => match auth.current_user().await {
            Ok(user) => EngineEvent::SessionResolved(user),
            Err(err) => {
                bm_warn!("Session check failed, treating as signed out: {}", err);
                EngineEvent::SessionResolved(None)
            }
        },
        EngineCommand::Fetch { user_id, seq } => {
            let result = store.list_for_user(&user_id).await;
            if let Err(err) = &result {
                bm_warn!("Fetch #{} failed: {}", seq, err);
            }
            EngineEvent::Fetched {
                user_id,
                seq,
                result,
            }
        }
        EngineCommand::Insert { user_id, draft } => {
            let result = store.insert(&user_id, &draft).await;
            if let Err(err) = &result {
                bm_warn!("Insert failed: {}", err);
            }
            EngineEvent::Inserted { result }
        }
        EngineCommand::Update { id, draft } => {
            let result = store.update(&id, &draft).await;
            if let Err(err) = &result {
                bm_warn!("Update of {} failed: {}", id, err);
            }
            EngineEvent::Updated { id, result }
        }
        EngineCommand::Delete { id } => {
            let result = store.delete(&id).await;
            if let Err(err) = &result {
                bm_warn!("Delete of {} failed: {}", id, err);
            }
            EngineEvent::Deleted { id, result }
        }
        EngineCommand::SignIn { provider } => EngineEvent::SignInStarted {
            result: auth.sign_in_with_provider(&provider).await,
        },
        EngineCommand::SignOut => EngineEvent::SignedOut {
            result: auth.sign_out().await,
        },
        // Handled on the engine thread before reaching the runtime.
        EngineCommand::Subscribe | EngineCommand::Unsubscribe { .. } => return None,
    };
    Some(event)
}
