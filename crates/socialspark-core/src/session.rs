//! Drives a [`SessionState`] against the remote collaborators.
//!
//! Calls run on spawned tasks; their results come back as [`SessionEvent`]s
//! on the receiver returned by [`ChatSession::new`]. The owner's event loop
//! feeds each event to [`ChatSession::apply`], so every state change happens
//! on that loop and never halfway through a render.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{AccountIngestor, Reply, ResponseGenerator, Summary};
use crate::error::{GenerationError, ProcessingError};
use crate::state::{Outcome, SessionState, TurnId};

/// How long the connection error banner stays up.
pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub error_display: Duration,
    /// `None` lets a call run for as long as the collaborator takes.
    pub request_timeout: Option<Duration>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            error_display: DEFAULT_ERROR_DISPLAY,
            request_timeout: None,
        }
    }
}

/// Completion of a background call or timer.
#[derive(Debug)]
pub enum SessionEvent {
    Connected(Result<Summary, ProcessingError>),
    Replied {
        id: TurnId,
        result: Result<Reply, GenerationError>,
    },
    ErrorExpired {
        generation: u64,
    },
}

pub struct ChatSession {
    state: SessionState,
    ingestor: Arc<dyn AccountIngestor>,
    generator: Arc<dyn ResponseGenerator>,
    settings: SessionSettings,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    connect_task: Option<JoinHandle<()>>,
    turn_task: Option<JoinHandle<()>>,
    error_timer: Option<JoinHandle<()>>,
    error_generation: u64,
}

impl ChatSession {
    pub fn new(
        ingestor: Arc<dyn AccountIngestor>,
        generator: Arc<dyn ResponseGenerator>,
        settings: SessionSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = Self {
            state: SessionState::new(),
            ingestor,
            generator,
            settings,
            events_tx,
            connect_task: None,
            turn_task: None,
            error_timer: None,
            error_generation: 0,
        };
        (session, events_rx)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.set_draft(text);
    }

    pub fn apply_suggestion(&mut self, text: &str) {
        self.state.apply_suggestion(text);
    }

    pub fn skip_connection(&mut self) {
        info!("continuing without a connected account");
        self.state.skip_connection();
    }

    /// Start ingesting `handle`. Returns false when the attempt was rejected
    /// (blank handle or a connection already in flight).
    pub fn connect_account(&mut self, handle: &str) -> bool {
        let Some(handle) = self.state.begin_connect(handle) else {
            debug!("connect rejected: blank handle or already connecting");
            return false;
        };
        info!(%handle, "connecting account");

        let ingestor = Arc::clone(&self.ingestor);
        let tx = self.events_tx.clone();
        let limit = self.settings.request_timeout;

        self.connect_task = Some(tokio::spawn(async move {
            let result = with_timeout(limit, ingestor.connect_account(&handle), |elapsed| {
                ProcessingError::new(format!("no response after {:?}", elapsed))
            })
            .await;
            let _ = tx.send(SessionEvent::Connected(result));
        }));
        true
    }

    /// Start a chat turn for `text`. Returns false when the text is blank or
    /// a turn is already in flight.
    pub fn send_message(&mut self, text: &str) -> bool {
        let Some(request) = self.state.begin_turn(text) else {
            debug!("send rejected: blank message or already sending");
            return false;
        };
        info!(turn = ?request.id, "sending chat message");

        let generator = Arc::clone(&self.generator);
        let tx = self.events_tx.clone();
        let limit = self.settings.request_timeout;

        self.turn_task = Some(tokio::spawn(async move {
            let result = with_timeout(limit, generator.send_message(&request.text), |elapsed| {
                GenerationError::new(format!("no response after {:?}", elapsed))
            })
            .await;
            let _ = tx.send(SessionEvent::Replied {
                id: request.id,
                result,
            });
        }));
        true
    }

    /// Submit whatever is in the draft.
    pub fn submit_draft(&mut self) -> bool {
        let draft = self.state.draft_input().to_string();
        self.send_message(&draft)
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected(result) => {
                self.connect_task = None;
                if let Err(err) = &result {
                    warn!(error = %err, "account connection failed");
                }
                match self.state.settle_connect(result) {
                    Outcome::Succeeded => {
                        info!("account connected");
                        self.cancel_error_timer();
                    }
                    Outcome::Failed => self.schedule_error_clear(),
                    Outcome::Ignored => debug!("connection result with no attempt in flight"),
                }
            }
            SessionEvent::Replied { id, result } => {
                self.turn_task = None;
                if let Err(err) = &result {
                    warn!(turn = ?id, error = %err, "reply generation failed");
                }
                match self.state.settle_turn(id, result) {
                    Outcome::Succeeded => {
                        debug!(turn = ?id, "reply received");
                        self.cancel_error_timer();
                    }
                    Outcome::Failed => {}
                    Outcome::Ignored => debug!(turn = ?id, "reply for a turn that is not pending"),
                }
            }
            SessionEvent::ErrorExpired { generation } => {
                if generation == self.error_generation {
                    self.error_timer = None;
                    self.state.clear_transient_error();
                } else {
                    debug!(generation, "stale error expiry ignored");
                }
            }
        }
    }

    fn schedule_error_clear(&mut self) {
        self.cancel_error_timer();

        let generation = self.error_generation;
        let delay = self.settings.error_display;
        let tx = self.events_tx.clone();

        self.error_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionEvent::ErrorExpired { generation });
        }));
    }

    fn cancel_error_timer(&mut self) {
        if let Some(timer) = self.error_timer.take() {
            timer.abort();
        }
        // An expiry already sitting in the channel must not clear a newer error.
        self.error_generation += 1;
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        for task in [
            self.connect_task.take(),
            self.turn_task.take(),
            self.error_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

async fn with_timeout<T, E>(
    limit: Option<Duration>,
    call: impl Future<Output = Result<T, E>>,
    on_elapsed: impl FnOnce(Duration) -> E,
) -> Result<T, E> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(on_elapsed(limit))),
        None => call.await,
    }
}
