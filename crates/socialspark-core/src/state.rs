//! UI-agnostic chat session state
//!
//! `SessionState` is the single state object behind the chat view. It is
//! mutated only through the transition methods below, each of which takes
//! `&mut self`, so whoever owns the state is its only writer. Remote calls are
//! not made here: a `begin_*` transition returns the request to issue and the
//! matching `settle_*` transition reconciles its result.

use serde::{Deserialize, Serialize};

use crate::backend::{Reply, Summary};
use crate::error::{GenerationError, ProcessingError};

/// Appended to the ingestion summary once an account is connected.
pub const INVITATION_SUFFIX: &str = " You can now ask specific questions about your content!";

/// Assistant message appended when account ingestion fails.
pub const CONNECT_APOLOGY: &str = "Sorry, there was an error processing your Instagram data.";

/// Banner text shown after a failed connection attempt.
pub const CONNECT_ERROR_BANNER: &str = "Failed to process Instagram data. Please try again.";

/// Assistant message appended when a chat turn fails.
pub const REPLY_APOLOGY: &str = "Sorry, I encountered an error processing your request.";

/// A chat message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Identifies one chat turn within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStatus {
    Pending,
    Settled(String),
    Failed(GenerationError),
}

/// A user message and the state of its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub id: TurnId,
    pub prompt: String,
    pub status: TurnStatus,
}

impl Turn {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, TurnStatus::Pending)
    }
}

/// The call a `begin_turn` transition asks the caller to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub id: TurnId,
    pub text: String,
}

/// How a `settle_*` transition was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was waiting for this result.
    Ignored,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
pub struct SessionState {
    transcript: Vec<ChatMessage>,
    turns: Vec<Turn>,
    draft_input: String,
    connecting: Option<String>,
    is_connected: bool,
    transient_error: Option<String>,
    next_turn_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    /// True while the latest chat turn is waiting for its reply.
    pub fn is_sending(&self) -> bool {
        self.turns.last().is_some_and(Turn::is_pending)
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.is_some()
    }

    /// Handle of the in-flight connection attempt, if any.
    pub fn connecting_handle(&self) -> Option<&str> {
        self.connecting.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn transient_error(&self) -> Option<&str> {
        self.transient_error.as_deref()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_input = text.into();
    }

    /// Overwrite the draft with a suggestion. Never submits.
    pub fn apply_suggestion(&mut self, text: &str) {
        self.draft_input = text.to_string();
    }

    /// Start a chat turn: append the user message optimistically and record a
    /// pending turn. Returns `None` when the text is blank or a turn is
    /// already in flight, leaving the state untouched.
    pub fn begin_turn(&mut self, text: &str) -> Option<TurnRequest> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        let id = TurnId(self.next_turn_id);
        self.next_turn_id += 1;

        self.transcript.push(ChatMessage::user(text));
        self.turns.push(Turn {
            id,
            prompt: text.to_string(),
            status: TurnStatus::Pending,
        });
        self.draft_input.clear();

        Some(TurnRequest {
            id,
            text: text.to_string(),
        })
    }

    /// Reconcile the reply for a pending turn.
    pub fn settle_turn(&mut self, id: TurnId, result: Result<Reply, GenerationError>) -> Outcome {
        let Some(turn) = self.turns.iter_mut().find(|t| t.id == id) else {
            return Outcome::Ignored;
        };
        if !turn.is_pending() {
            return Outcome::Ignored;
        }

        match result {
            Ok(reply) => {
                self.transcript.push(ChatMessage::assistant(reply.response.clone()));
                turn.status = TurnStatus::Settled(reply.response);
                self.transient_error = None;
                Outcome::Succeeded
            }
            Err(err) => {
                self.transcript.push(ChatMessage::assistant(REPLY_APOLOGY));
                turn.status = TurnStatus::Failed(err);
                Outcome::Failed
            }
        }
    }

    /// Start connecting an account. Returns the trimmed handle to ingest, or
    /// `None` when the handle is blank or a connection is already in flight.
    pub fn begin_connect(&mut self, handle: &str) -> Option<String> {
        let handle = handle.trim();
        if handle.is_empty() || self.is_connecting() {
            return None;
        }

        self.connecting = Some(handle.to_string());
        Some(handle.to_string())
    }

    /// Reconcile the result of the in-flight connection attempt.
    pub fn settle_connect(&mut self, result: Result<Summary, ProcessingError>) -> Outcome {
        if self.connecting.take().is_none() {
            return Outcome::Ignored;
        }

        match result {
            Ok(summary) => {
                self.transcript.push(ChatMessage::assistant(format!(
                    "{}{}",
                    summary.message, INVITATION_SUFFIX
                )));
                self.is_connected = true;
                self.transient_error = None;
                Outcome::Succeeded
            }
            Err(_) => {
                self.transcript.push(ChatMessage::assistant(CONNECT_APOLOGY));
                self.transient_error = Some(CONNECT_ERROR_BANNER.to_string());
                Outcome::Failed
            }
        }
    }

    /// Continue without connecting an account.
    pub fn skip_connection(&mut self) {
        self.is_connected = true;
    }

    pub fn clear_transient_error(&mut self) {
        self.transient_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> Result<Reply, GenerationError> {
        Ok(Reply {
            response: text.to_string(),
        })
    }

    fn summary(text: &str) -> Result<Summary, ProcessingError> {
        Ok(Summary {
            message: text.to_string(),
        })
    }

    #[test]
    fn test_successful_turns_alternate_roles() {
        for n in 0..8 {
            let mut state = SessionState::new();
            for i in 0..n {
                let request = state.begin_turn(&format!("question {}", i)).unwrap();
                assert_eq!(state.settle_turn(request.id, reply("answer")), Outcome::Succeeded);
            }

            assert_eq!(state.transcript().len(), 2 * n);
            for (i, msg) in state.transcript().iter().enumerate() {
                let expected = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
                assert_eq!(msg.role, expected);
            }
            assert!(!state.is_sending());
        }
    }

    #[test]
    fn test_blank_message_is_noop() {
        let mut state = SessionState::new();
        state.set_draft("   ");

        assert!(state.begin_turn("").is_none());
        assert!(state.begin_turn("  \t\n ").is_none());
        assert!(state.transcript().is_empty());
        assert!(state.turns().is_empty());
        assert!(!state.is_sending());
        assert_eq!(state.draft_input(), "   ");
    }

    #[test]
    fn test_second_send_rejected_while_sending() {
        let mut state = SessionState::new();
        let first = state.begin_turn("first").unwrap();
        assert!(state.is_sending());

        assert!(state.begin_turn("second").is_none());
        assert_eq!(state.transcript(), &[ChatMessage::user("first")]);

        state.settle_turn(first.id, reply("ok"));
        assert!(!state.is_sending());
        assert!(state.begin_turn("second").is_some());
    }

    #[test]
    fn test_user_message_appended_before_reply() {
        let mut state = SessionState::new();
        state.set_draft("  Analyze my recent posts ");
        let draft = state.draft_input().to_string();
        let request = state.begin_turn(&draft).unwrap();

        assert_eq!(request.text, "Analyze my recent posts");
        assert_eq!(state.draft_input(), "");
        assert_eq!(state.transcript(), &[ChatMessage::user("Analyze my recent posts")]);
        assert!(state.turns()[0].is_pending());

        state.settle_turn(request.id, reply("Here are your insights..."));
        assert_eq!(
            state.transcript(),
            &[
                ChatMessage::user("Analyze my recent posts"),
                ChatMessage::assistant("Here are your insights..."),
            ]
        );
        assert_eq!(
            state.turns()[0].status,
            TurnStatus::Settled("Here are your insights...".to_string())
        );
    }

    #[test]
    fn test_failed_turn_appends_apology() {
        let mut state = SessionState::new();
        let request = state.begin_turn("hello").unwrap();

        let outcome = state.settle_turn(request.id, Err(GenerationError::new("timeout")));
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(state.transcript()[1], ChatMessage::assistant(REPLY_APOLOGY));
        assert!(matches!(state.turns()[0].status, TurnStatus::Failed(_)));
        assert!(!state.is_sending());
        assert!(state.transient_error().is_none());
    }

    #[test]
    fn test_settle_unknown_or_settled_turn_ignored() {
        let mut state = SessionState::new();
        let request = state.begin_turn("hello").unwrap();
        state.settle_turn(request.id, reply("hi"));

        assert_eq!(state.settle_turn(request.id, reply("again")), Outcome::Ignored);
        assert_eq!(state.settle_turn(TurnId(42), reply("stray")), Outcome::Ignored);
        assert_eq!(state.transcript().len(), 2);
    }

    #[test]
    fn test_connect_success_appends_summary_with_invitation() {
        let mut state = SessionState::new();
        assert_eq!(state.begin_connect(" @spark "), Some("@spark".to_string()));
        assert!(state.is_connecting());

        let outcome = state.settle_connect(summary("Processed 42 posts."));
        assert_eq!(outcome, Outcome::Succeeded);
        assert!(state.is_connected());
        assert!(!state.is_connecting());
        assert_eq!(
            state.transcript(),
            &[ChatMessage::assistant(
                "Processed 42 posts. You can now ask specific questions about your content!"
            )]
        );
    }

    #[test]
    fn test_connect_failure_sets_banner() {
        let mut state = SessionState::new();
        state.begin_connect("@spark").unwrap();

        let outcome = state.settle_connect(Err(ProcessingError::new("404")));
        assert_eq!(outcome, Outcome::Failed);
        assert!(!state.is_connected());
        assert!(!state.is_connecting());
        assert_eq!(state.transcript(), &[ChatMessage::assistant(CONNECT_APOLOGY)]);
        assert_eq!(state.transient_error(), Some(CONNECT_ERROR_BANNER));
    }

    #[test]
    fn test_connect_guards() {
        let mut state = SessionState::new();
        assert!(state.begin_connect("").is_none());
        assert!(state.begin_connect("   ").is_none());
        assert!(!state.is_connecting());

        state.begin_connect("@one").unwrap();
        assert!(state.begin_connect("@two").is_none());
        assert_eq!(state.connecting_handle(), Some("@one"));
    }

    #[test]
    fn test_settle_connect_without_attempt_ignored() {
        let mut state = SessionState::new();
        assert_eq!(state.settle_connect(summary("late")), Outcome::Ignored);
        assert!(state.transcript().is_empty());
        assert!(!state.is_connected());
    }

    #[test]
    fn test_successful_action_clears_error() {
        let mut state = SessionState::new();
        state.begin_connect("@spark").unwrap();
        state.settle_connect(Err(ProcessingError::new("boom")));
        assert!(state.transient_error().is_some());

        state.begin_connect("@spark").unwrap();
        state.settle_connect(summary("done."));
        assert!(state.transient_error().is_none());
    }

    #[test]
    fn test_skip_connection_appends_nothing() {
        let mut state = SessionState::new();
        state.skip_connection();
        assert!(state.is_connected());
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn test_apply_suggestion_overwrites_draft() {
        let mut state = SessionState::new();
        state.set_draft("half typed");
        state.apply_suggestion("Suggest hashtags for my niche");

        assert_eq!(state.draft_input(), "Suggest hashtags for my niche");
        assert!(state.transcript().is_empty());
        assert!(!state.is_sending());
    }
}
