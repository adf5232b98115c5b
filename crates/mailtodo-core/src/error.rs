//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a conversion.
///
/// Everything else degrades to a [`Diagnostic`](crate::Diagnostic).
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system random source could not be read.
    #[error("Random source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    /// The source message could not be read.
    #[error("Cannot read email file {}: {source}", .path.display())]
    ReadMessage {
        /// Path of the message.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The generated task could not be written.
    #[error("Cannot create todo file {}: {source}", .path.display())]
    WriteTodo {
        /// Path of the `.ics` file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A string is not a task identifier.
    #[error("Invalid task identifier: {0}")]
    InvalidUid(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
