//! Error types for the Dialogue Observe core library.

/// Errors that can occur while running a dialogue.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// LLM provider transport error (connection refused, reset, etc.)
    #[error("LLM error: {message}")]
    Llm {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model server answered 2xx with a reply that cannot be used.
    #[error("Protocol error: {message}")]
    Protocol {
        /// What was wrong with the reply
        message: String,
        /// Parse error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model server answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message extracted from the response body
        message: String,
    },

    /// Input validation error
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// I/O error (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timeout
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A dialogue turn failed and the run was aborted.
    #[error("Turn failed in round {round} ({speaker}): {source}")]
    TurnFailed {
        /// Round in which the failure happened (0 for the final commentary
        /// of a zero-round dialogue)
        round: u32,
        /// Speaker whose turn failed
        speaker: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Convenience `Result` type alias for Dialogue Observe operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Transport failures, timeouts, rate limits and 5xx responses are
    /// retryable. Client errors and malformed input are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Llm { .. } => true,
            Error::Http { status, .. } => {
                matches!(*status, 408 | 429) || (500..=599).contains(status)
            }
            Error::Io(_) => true,
            Error::Timeout { .. } => true,
            Error::Protocol { .. } => false,
            Error::Validation { .. } => false,
            Error::Serialization(_) => false,
            Error::Config { .. } => false,
            Error::TurnFailed { source, .. } => source.is_retryable(),
        }
    }

    /// Creates a new LLM error with a message.
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Error::Llm {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new LLM error with a message and source error.
    pub fn llm_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Llm {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new protocol error with a message.
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Error::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new protocol error with a message and source error.
    pub fn protocol_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Protocol {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new HTTP status error.
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        Error::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an error with the round and speaker of the turn that produced it.
    pub fn turn_failed<S: Into<String>>(round: u32, speaker: S, source: Error) -> Self {
        Error::TurnFailed {
            round,
            speaker: speaker.into(),
            source: Box::new(source),
        }
    }
}
