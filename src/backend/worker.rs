use super::client::{self, BackendConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Commands that can be sent to the backend worker
#[derive(Debug)]
pub enum AskCommand {
    /// Send one message to the backend
    Ask { message: String, request_id: Uuid },

    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the backend worker
#[derive(Clone, Debug)]
pub enum AskEvent {
    /// The backend answered
    Reply { text: String, request_id: Uuid },

    /// Transport failure, timeout, or non-success status
    Failed { error: String, request_id: Uuid },

    /// Worker has shut down
    Shutdown,
}

/// Worker that talks to the answer backend on its own thread.
///
/// One command produces exactly one event carrying the same request id;
/// the id lets the UI drop responses that arrive after they stopped
/// being relevant.
pub struct AskWorker {
    config: BackendConfig,
    command_tx: Sender<AskCommand>,
    command_rx: Receiver<AskCommand>,
    event_tx: Sender<AskEvent>,
    event_rx: Receiver<AskEvent>,
}

impl AskWorker {
    pub fn new(config: BackendConfig) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<AskCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<AskEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread
    pub fn start_worker(self) -> std::thread::JoinHandle<()> {
        let config = self.config;
        let command_rx = self.command_rx;
        let event_tx = self.event_tx;

        std::thread::spawn(move || {
            info!("Backend worker started ({})", config.base_url);

            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to build backend runtime: {}", e);
                    let _ = event_tx.send(AskEvent::Shutdown);
                    return;
                }
            };

            let client = match reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
            {
                Ok(client) => client,
                Err(e) => {
                    error!("Failed to build HTTP client: {}", e);
                    let _ = event_tx.send(AskEvent::Shutdown);
                    return;
                }
            };

            loop {
                match command_rx.recv() {
                    Ok(AskCommand::Ask {
                        message,
                        request_id,
                    }) => {
                        debug!("Processing ask request {}", request_id);

                        let event = match runtime.block_on(client::ask(&client, &config, message))
                        {
                            Ok(text) => AskEvent::Reply { text, request_id },
                            Err(e) => {
                                warn!("Backend request {} failed: {}", request_id, e);
                                AskEvent::Failed {
                                    error: e.to_string(),
                                    request_id,
                                }
                            }
                        };

                        if event_tx.send(event).is_err() {
                            // UI side is gone; nothing left to report to.
                            break;
                        }
                    }
                    Ok(AskCommand::Shutdown) => {
                        info!("Backend worker shutting down");
                        let _ = event_tx.send(AskEvent::Shutdown);
                        break;
                    }
                    Err(e) => {
                        debug!("Command channel closed: {}", e);
                        break;
                    }
                }
            }

            info!("Backend worker stopped");
        })
    }
}
