use thiserror::Error;

/// Failures while constructing an adapter.
///
/// These surface immediately from the constructor, never at call time.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Neither an API key nor a client ID and signing secret were supplied.
    #[error("Google Maps needs an API key or a client ID with a signing secret")]
    MissingCredentials,
    /// The client signing secret is not URL-safe base64.
    #[error("client signing secret is not valid URL-safe base64: {0}")]
    InvalidSigningSecret(#[source] base64::DecodeError),
    /// The decoded signing secret cannot key an HMAC.
    #[error("client signing secret cannot key HMAC-SHA1: {0}")]
    InvalidSigningKey(#[source] hmac::digest::InvalidLength),
    /// The rate limit allows no requests at all.
    #[error("rate limit must allow at least one request per window")]
    InvalidRateLimit,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
