//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP round trip itself failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The agent answered with a non-2xx HTTP status.
    #[error("HTTP status {status} from agent")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response body was not a valid Jolokia envelope.
    #[error("Failed to decode Jolokia response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode Jolokia request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The envelope carried a status other than 200.
    #[error("Jolokia error ({status}): {message}")]
    Protocol {
        /// Status embedded in the envelope.
        status: u16,
        /// Error message reported by the agent.
        message: String,
        /// Java exception class reported by the agent, if any.
        error_type: Option<String>,
    },

    /// A LIST tree lacked a sub-key the call depends on.
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A facade call failed; `source` is the stage that failed.
    #[error("{operation} failed for {subject}: {source}")]
    Operation {
        /// Facade method name.
        operation: &'static str,
        /// Domain/bean/attribute the call was about.
        subject: String,
        /// Underlying error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The underlying stage error, with any `Operation` context removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if the round trip itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(self.root(), Error::Transport(_) | Error::HttpStatus { .. })
    }

    /// Check if the agent reported an error inside a well-formed envelope.
    pub fn is_protocol(&self) -> bool {
        matches!(self.root(), Error::Protocol { .. })
    }

    /// Check if the response could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self.root(), Error::Decode(_))
    }

    /// Check if a LIST tree was missing an expected sub-key.
    pub fn is_malformed(&self) -> bool {
        matches!(self.root(), Error::MalformedResponse(_))
    }

    /// Check if the agent reported a missing bean or attribute.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            Error::Protocol { status: 404, .. } | Error::HttpStatus { status: 404 }
        )
    }

    /// The agent's error message, when this is a protocol error.
    pub fn protocol_message(&self) -> Option<&str> {
        match self.root() {
            Error::Protocol { message, .. } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn in_operation(self, operation: &'static str, subject: impl Into<String>) -> Self {
        Error::Operation {
            operation,
            subject: subject.into(),
            source: Box::new(self),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
