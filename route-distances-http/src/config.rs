//! Construction-time configuration shared by the HTTP adapters.

use std::num::NonZeroU32;
use std::time::Duration;

use route_distances_core::ErrorPolicy;
use route_distances_core::policy::DEFAULT_MAX_ATTEMPTS;

/// Default user agent for backend requests.
pub const DEFAULT_USER_AGENT: &str = "route-distances/0.1";

/// Default entrypoint for the self-hosted backends.
pub const DEFAULT_ENTRYPOINT: &str = "http://localhost:8000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the OTP, OSRM and Valhalla adapters.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use route_distances_http::BackendConfig;
///
/// let config = BackendConfig::new("http://osrm.internal:5000")
///     .with_timeout(Duration::from_secs(10))
///     .with_fail_fast(false)
///     .with_verbose(true);
/// assert!(!config.error_policy().is_fail_fast());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the service, including the scheme.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Propagate failures instead of reporting no route.
    pub fail_fast: bool,
    /// Log timestamped request and response lines at `info` level.
    pub verbose: bool,
    /// Attempts made for transient transport failures.
    pub max_attempts: NonZeroU32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENTRYPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            fail_fast: true,
            verbose: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl BackendConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Choose between propagating failures and reporting no route.
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Toggle verbose request logging.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the number of attempts for transient failures.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Error policy implied by this configuration.
    #[must_use]
    pub const fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy::new(self.fail_fast, self.max_attempts)
    }

    /// Join `path` onto the base URL without doubling slashes.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
