use thiserror::Error;

/// Errors from [`crate::RouteClient`] and [`crate::IsochroneProvider`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A network-level failure occurred (connection refused, DNS failure).
    #[error("network error requesting {url}: {message}")]
    NetworkError { url: String, message: String },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The backend answered with an HTTP error status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        url: String,
        status: u16,
        message: String,
    },

    /// The response did not match the backend's documented schema.
    #[error("failed to parse routing response: {message}")]
    ParseError { message: String },

    /// The backend reported a failure other than a missing route.
    #[error("routing service error ({code}): {message}")]
    ServiceError { code: String, message: String },

    /// The backend has no profile for the requested travel mode.
    #[error("{backend} does not support travel mode \"{mode}\"")]
    UnsupportedMode { backend: &'static str, mode: String },

    /// An isochrone was requested without a time or distance budget.
    #[error("an isochrone needs a maximum time or a maximum distance")]
    MissingIsochroneLimit,
}

/// Broad category of a [`RouteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Issuing the request failed.
    Transport,
    /// The response could not be decoded.
    Decoding,
    /// The backend reported a failure in a well-formed response.
    Service,
    /// The request itself was invalid for this backend.
    Request,
}

impl RouteError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpError { .. } => {
                ErrorKind::Transport
            }
            Self::ParseError { .. } => ErrorKind::Decoding,
            Self::ServiceError { .. } => ErrorKind::Service,
            Self::UnsupportedMode { .. } | Self::MissingIsochroneLimit => ErrorKind::Request,
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// Network failures, timeouts and 5xx statuses are transient; everything
    /// else fails the same way every time.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::Timeout { .. } => true,
            Self::HttpError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
