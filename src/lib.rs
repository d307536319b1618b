//! BrainAI - browse a sandboxed directory tree and ask a vision-language model about it
//!
//! This library provides the context-assembly pipeline (scanning, classifying and
//! summarizing the files of the current directory), the session that navigates the
//! sandbox, and the model boundary used to answer questions.

pub mod answer;
pub mod config;
pub mod context;
pub mod llm;
pub mod session;
pub mod ui;
pub mod utils;
pub mod vfs;

// Re-export commonly used types and traits
pub use answer::{Answer, QuestionAnswerer};
pub use config::{Config, ConfigManager};
pub use context::{ContextEntry, ContextStats, EntryKind, FileKind};
pub use llm::{ChatMessage, ContentPart, ModelError, ModelFactory, VisionModel};
pub use session::Session;
pub use ui::Shell;
pub use utils::errors::{BrainError, ConfigError};
pub use vfs::{FileTree, LocalTree, MemoryTree};

/// The main result type used throughout the application
pub type Result<T> = std::result::Result<T, BrainError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "BrainAI";
