//! Error types for node client operations.
//!
//! This module defines [`TransportError`], the failure of a single HTTP round
//! trip, and [`NodeError`], the error every [`NodeClient`](super::NodeClient)
//! method returns. Each [`NodeError`] names the command and the node endpoint
//! involved.

use thiserror::Error;

use super::response::ViewError;

/// Errors raised while moving bytes to and from the node.
///
/// # Example
///
/// ```rust,no_run
/// use tangle_rpc::http::TransportError;
///
/// fn describe(err: &TransportError) {
///     match err {
///         TransportError::ServerError { status, body } => {
///             eprintln!("Node returned {}: {}", status, body);
///         }
///         TransportError::RequestFailed(e) => {
///             eprintln!("Network error: {}", e);
///         }
///         TransportError::Other(message) => eprintln!("Transport error: {}", message),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request failed due to a network or connection error.
    ///
    /// This typically indicates connectivity issues such as:
    /// - Connection refused (node not running)
    /// - Connection timeout
    /// - DNS resolution failure
    /// - TLS handshake errors
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The node returned a non-success HTTP status code.
    ///
    /// Contains both the status code and the response body for debugging.
    #[error("Server error {status}: {body}")]
    ServerError {
        /// The HTTP status code returned by the node.
        status: reqwest::StatusCode,
        /// The response body, which may contain error details.
        body: String,
    },

    /// A failure reported by a caller-supplied [`Transport`](super::Transport).
    #[error("Transport failure: {0}")]
    Other(String),
}

/// Errors returned by [`NodeClient`](super::NodeClient) methods.
///
/// Every variant carries the wire name of the command and the endpoint it was
/// sent to. A caller either receives a fully populated response or exactly one
/// of these.
///
/// # Error Categories
///
/// - **Network errors**: [`Transport`](NodeError::Transport)
/// - **Malformed responses**: [`Decode`](NodeError::Decode)
/// - **Node-reported failures**: [`RemoteCommand`](NodeError::RemoteCommand)
/// - **Protocol mismatches**: [`MissingField`](NodeError::MissingField),
///   [`UnexpectedFieldType`](NodeError::UnexpectedFieldType)
#[derive(Debug, Error)]
pub enum NodeError {
    /// The request could not be delivered or the node answered with a
    /// non-success status and no node-level error message.
    #[error("{command} at {endpoint}: {source}")]
    Transport {
        command: &'static str,
        endpoint: String,
        #[source]
        source: TransportError,
    },

    /// The request body could not be serialized.
    #[error("{command} at {endpoint}: could not encode request: {source}")]
    Encode {
        command: &'static str,
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response body is not a JSON object.
    #[error("{command} at {endpoint}: malformed response: {source}")]
    Decode {
        command: &'static str,
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The node answered with an `error` or `exception` field.
    #[error("{command} at {endpoint}: node reported an error: {message}")]
    RemoteCommand {
        command: &'static str,
        endpoint: String,
        message: String,
    },

    /// A success-shaped response lacks a field the command guarantees.
    ///
    /// This usually means the node speaks a different protocol version.
    #[error("{command} at {endpoint}: response is missing field `{field}`")]
    MissingField {
        command: &'static str,
        endpoint: String,
        field: &'static str,
    },

    /// A guaranteed field is present but holds a value of the wrong type.
    #[error("{command} at {endpoint}: field `{field}` has an unexpected type: {reason}")]
    UnexpectedFieldType {
        command: &'static str,
        endpoint: String,
        field: &'static str,
        reason: String,
    },
}

impl NodeError {
    pub(crate) fn from_view(command: &'static str, endpoint: String, err: ViewError) -> Self {
        match err {
            ViewError::Remote(message) => NodeError::RemoteCommand {
                command,
                endpoint,
                message,
            },
            ViewError::MissingField(field) => NodeError::MissingField {
                command,
                endpoint,
                field,
            },
            ViewError::UnexpectedFieldType { field, reason } => NodeError::UnexpectedFieldType {
                command,
                endpoint,
                field,
                reason,
            },
        }
    }

    /// Wire name of the command that failed.
    pub fn command(&self) -> &'static str {
        match self {
            NodeError::Transport { command, .. }
            | NodeError::Encode { command, .. }
            | NodeError::Decode { command, .. }
            | NodeError::RemoteCommand { command, .. }
            | NodeError::MissingField { command, .. }
            | NodeError::UnexpectedFieldType { command, .. } => *command,
        }
    }

    /// Endpoint the failing command was sent to.
    pub fn endpoint(&self) -> &str {
        match self {
            NodeError::Transport { endpoint, .. }
            | NodeError::Encode { endpoint, .. }
            | NodeError::Decode { endpoint, .. }
            | NodeError::RemoteCommand { endpoint, .. }
            | NodeError::MissingField { endpoint, .. }
            | NodeError::UnexpectedFieldType { endpoint, .. } => endpoint,
        }
    }
}
