//! Error types for API client operations.
//!
//! Provides [`ClientError`], the error taxonomy surfaced to callers:
//! configuration problems detected before dispatch, HTTP-status-mapped
//! failures, and transport errors. Messages on the status-mapped variants
//! are user-facing and stable -- UI layers display them verbatim in
//! notifications.
//!
//! Form validation failures are deliberately *not* part of this enum; they
//! are reported per field via [`FieldError`](crate::types::FieldError) so
//! the UI can render them inline instead of as a transient notification.

use thiserror::Error;

/// Generic failure message shown for non-specific API errors outside of
/// development mode, so server internals never leak to end users.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An error occurred while processing your request. Please try again.";

/// Errors raised by [`TaskClient`](crate::client::TaskClient) operations.
///
/// HTTP outcomes map to variants as follows: 401 becomes
/// [`SessionExpired`](ClientError::SessionExpired) (no automatic redirect --
/// the caller decides), 403 becomes [`AccessDenied`](ClientError::AccessDenied),
/// 404 becomes [`NotFound`](ClientError::NotFound), 5xx becomes
/// [`Server`](ClientError::Server) with internal details suppressed, and any
/// other non-2xx status becomes [`Api`](ClientError::Api) with a best-effort
/// message from the response body (genericized outside development mode).
///
/// # Examples
///
/// ```
/// use taskdeck::ClientError;
///
/// let err = ClientError::SessionExpired;
/// assert_eq!(err.to_string(), "Session expired. Please log in again.");
///
/// let err = ClientError::Server { status: 503 };
/// assert_eq!(err.to_string(), "Server error. Please try again later.");
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client is misconfigured: missing API base URL, an unparseable
    /// base URL, or a request target whose host does not match the
    /// configured API host. Raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The server returned 401. The stored session token is no longer
    /// valid; the caller should prompt for re-login.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// The server returned 403.
    #[error("Access denied. You do not have permission to perform this action.")]
    AccessDenied,

    /// The server returned 404.
    #[error("Resource not found.")]
    NotFound,

    /// The server returned a 5xx status. Internal details are suppressed.
    #[error("Server error. Please try again later.")]
    Server {
        /// The HTTP status code that was returned.
        status: u16,
    },

    /// Any other non-2xx status. `message` carries the server's
    /// `detail`/`message` body field in development mode, or
    /// [`GENERIC_FAILURE_MESSAGE`] otherwise.
    #[error("{message}")]
    Api {
        /// The HTTP status code that was returned.
        status: u16,
        /// User-facing description of the failure.
        message: String,
    },

    /// The request never completed: connection failure, timeout, or an
    /// unreadable response body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Returns the HTTP status code associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::AccessDenied => Some(403),
            Self::NotFound => Some(404),
            Self::Server { status } | Self::Api { status, .. } => Some(*status),
            Self::Config(_) | Self::Network(_) => None,
        }
    }
}
