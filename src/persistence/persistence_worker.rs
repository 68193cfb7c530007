//! Background worker for session file operations
//!
//! The UI never touches the filesystem itself. It sends a [`SessionAction`]
//! with a oneshot response channel and polls the response on later frames.

use color_eyre::Result;
use tokio::sync::mpsc::{channel, Sender};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use super::{JoystickSession, SessionStore};

const ACTION_BUFFER_CAPACITY: usize = 32;

macro_rules! handle_action {
    ($action:expr, $response_tx:expr) => {
        if $response_tx.send($action.await).is_err() {
            error!("Failed to send response, requester is gone");
        }
    };
}

#[derive(Debug)]
pub enum SessionAction {
    Save {
        name: String,
        session: JoystickSession,
        response_tx: oneshot::Sender<Result<()>>,
    },
    Load {
        name: String,
        response_tx: oneshot::Sender<Result<JoystickSession>>,
    },
    Delete {
        name: String,
        response_tx: oneshot::Sender<Result<()>>,
    },
    List {
        response_tx: oneshot::Sender<Result<Vec<String>>>,
    },
}

pub struct PersistenceManager {
    tx: Sender<SessionAction>,
    worker_handle: tokio::task::JoinHandle<()>,
}

impl PersistenceManager {
    pub fn spawn(store: SessionStore) -> Self {
        info!(
            "Starting persistence worker for {}",
            store.base_path().display()
        );
        let (tx, mut rx) = channel::<SessionAction>(ACTION_BUFFER_CAPACITY);

        let worker_handle = tokio::spawn(async move {
            while let Some(action) = rx.recv().await {
                debug!("Persistence action: {:?}", action);
                match action {
                    SessionAction::Save {
                        name,
                        session,
                        response_tx,
                    } => {
                        handle_action!(store.save(&name, &session), response_tx);
                    }
                    SessionAction::Load { name, response_tx } => {
                        handle_action!(store.load(&name), response_tx);
                    }
                    SessionAction::Delete { name, response_tx } => {
                        handle_action!(store.delete(&name), response_tx);
                    }
                    SessionAction::List { response_tx } => {
                        handle_action!(store.list(), response_tx);
                    }
                }
            }
            info!("Persistence worker finished, all senders dropped");
        });

        Self { tx, worker_handle }
    }

    pub fn get_sender(&self) -> Sender<SessionAction> {
        self.tx.clone()
    }

    /// Drops the manager's sender and waits for queued actions to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!("Persistence worker failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SavedPosition;

    fn temp_store(tag: &str) -> SessionStore {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "virtual-joystick-worker-{}-{}",
            tag,
            std::process::id()
        ));
        SessionStore::new(path)
    }

    #[tokio::test]
    async fn actions_are_answered_in_order() {
        let store = temp_store("order");
        let base = store.base_path().to_path_buf();
        let manager = PersistenceManager::spawn(store);
        let sender = manager.get_sender();

        let session = JoystickSession {
            position: Some(SavedPosition { x: 3.0, y: 4.0 }),
            ..Default::default()
        };

        let (save_tx, save_rx) = oneshot::channel();
        sender
            .send(SessionAction::Save {
                name: "demo".to_string(),
                session: session.clone(),
                response_tx: save_tx,
            })
            .await
            .unwrap();

        let (load_tx, load_rx) = oneshot::channel();
        sender
            .send(SessionAction::Load {
                name: "demo".to_string(),
                response_tx: load_tx,
            })
            .await
            .unwrap();

        let (list_tx, list_rx) = oneshot::channel();
        sender
            .send(SessionAction::List { response_tx: list_tx })
            .await
            .unwrap();

        save_rx.await.unwrap().unwrap();
        assert_eq!(load_rx.await.unwrap().unwrap(), session);
        assert_eq!(list_rx.await.unwrap().unwrap(), vec!["demo".to_string()]);

        drop(sender);
        manager.shutdown().await;
        let _ = tokio::fs::remove_dir_all(base).await;
    }

    #[tokio::test]
    async fn failures_are_returned_to_the_requester() {
        let manager = PersistenceManager::spawn(temp_store("failures"));
        let (tx, rx) = oneshot::channel();
        manager
            .get_sender()
            .send(SessionAction::Delete {
                name: "missing".to_string(),
                response_tx: tx,
            })
            .await
            .unwrap();

        assert!(rx.await.unwrap().is_err());
        manager.shutdown().await;
    }
}
