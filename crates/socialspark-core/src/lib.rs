pub mod backend;
pub mod config;
pub mod content;
pub mod error;
pub mod markup;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use backend::{AccountIngestor, HttpBackend, Reply, ResponseGenerator, Summary};
pub use config::Config;
pub use error::{GenerationError, ProcessingError};
pub use session::{ChatSession, SessionEvent, SessionSettings};
pub use state::{ChatMessage, ChatRole, SessionState, Turn, TurnId, TurnStatus};
