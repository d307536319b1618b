//! Error types used throughout the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for BrainAI
#[derive(Error, Debug)]
pub enum BrainError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] crate::llm::ModelError),

    #[error("File system error: {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot access directory outside of {root}")]
    SandboxViolation { root: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Failed to extract {path}: {message}")]
    Extraction { path: String, message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization/deserialization error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read configuration: {source}")]
    ReadError {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write configuration: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {source}")]
    SerializeError {
        #[source]
        source: toml::ser::Error,
    },
}

impl BrainError {
    /// Add context to an existing error
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        match &mut self {
            Self::Unknown { message }
            | Self::Extraction { message, .. }
            | Self::Validation { message, .. } => {
                *message = format!("{}: {}", context.into(), message);
            }
            Self::NotFound { resource } => {
                *resource = format!("{}: {}", context.into(), resource);
            }
            _ => {
                // Errors without a free-form message get wrapped
                let original = format!("{}", self);
                return Self::unknown(format!("{}: {}", context.into(), original));
            }
        }
        self
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Create a new sandbox violation error
    pub fn sandbox_violation<S: Into<String>>(root: S) -> Self {
        Self::SandboxViolation { root: root.into() }
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a new not-a-directory error
    pub fn not_a_directory<S: Into<String>>(path: S) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Create a new extraction error
    pub fn extraction<S1: Into<String>, S2: Into<String>>(path: S1, message: S2) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown error
    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Whether the shell should report this at warning level rather than error level.
    ///
    /// Rejected navigation and missing files are expected user mistakes; everything
    /// else is a genuine failure.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::SandboxViolation { .. }
                | Self::NotFound { .. }
                | Self::NotADirectory { .. }
                | Self::Regex(_)
                | Self::Validation { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Model(_) => "model",
            Self::FileSystem { .. } => "filesystem",
            Self::SandboxViolation { .. } => "sandbox",
            Self::NotFound { .. } => "notfound",
            Self::NotADirectory { .. } => "notdir",
            Self::Extraction { .. } => "extraction",
            Self::Validation { .. } => "validation",
            Self::Image(_) => "image",
            Self::Regex(_) => "regex",
            Self::Json(_) => "json",
            Self::Toml(_) => "toml",
            Self::Io(_) => "io",
            Self::Unknown { .. } => "unknown",
        }
    }
}

impl From<inquire::InquireError> for BrainError {
    fn from(error: inquire::InquireError) -> Self {
        BrainError::unknown(format!("User input error: {}", error))
    }
}
