//! Background loop that talks to the assistant server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use operai_client::{execute_with_timeout, CommandExecutor};

use crate::event::{BackendCommand, ServerStatus, UiEvent};

/// How often the server is checked while the TUI is open.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Run the backend loop.
///
/// Runs on a separate thread with its own tokio runtime. Commands and health
/// checks each run on their own task, so the loop keeps reading `Quit` while
/// either is outstanding. The UI never submits a second command before the
/// first one settles.
pub async fn run_backend<E>(
    executor: Arc<E>,
    timeout: Duration,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<BackendCommand>,
) where
    E: CommandExecutor + 'static,
{
    info!(timeout_secs = timeout.as_secs(), "Backend started");

    let mut interval = tokio::time::interval(HEALTH_CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                spawn_health_check(executor.clone(), ui_tx.clone());
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    debug!("Command channel closed");
                    break;
                };
                match cmd {
                    BackendCommand::Execute(request) => {
                        let executor = executor.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = execute_with_timeout(executor.as_ref(), &request, timeout)
                                .await
                                .map_err(|e| e.to_string());
                            if ui_tx.send(UiEvent::ReplyReceived(outcome)).await.is_err() {
                                debug!("UI gone before the reply arrived");
                            }
                        });
                    }
                    BackendCommand::CheckServer => {
                        spawn_health_check(executor.clone(), ui_tx.clone());
                    }
                    BackendCommand::Quit => {
                        info!("Received quit command, shutting down backend");
                        break;
                    }
                }
            }
        }
    }

    info!("Backend shutdown complete");
}

fn spawn_health_check<E>(executor: Arc<E>, ui_tx: mpsc::Sender<UiEvent>)
where
    E: CommandExecutor + 'static,
{
    tokio::spawn(async move {
        let status = check_server(executor.as_ref()).await;
        if ui_tx.send(UiEvent::ServerStatusChanged(status)).await.is_err() {
            debug!("UI gone before the health check finished");
        }
    });
}

async fn check_server<E: CommandExecutor + ?Sized>(executor: &E) -> ServerStatus {
    let status = match executor.ping().await {
        Ok(true) => ServerStatus::Reachable,
        Ok(false) => ServerStatus::Unreachable("server returned an error".to_string()),
        Err(e) => {
            warn!(error = %e, "Server health check failed");
            ServerStatus::Unreachable(e.to_string())
        }
    };
    debug!(status = ?status, "Server checked");
    status
}
