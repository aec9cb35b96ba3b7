//! [`RouteClient`] for the Google Maps Distance Matrix API.
//!
//! Each adapter owns a [`RateLimiter`] that every outbound request passes
//! through, so one adapter shared across threads respects one quota. Requests
//! carry either an API key or a premium-plan client ID with a signed URL.
//!
//! When a departure time is supplied Google returns `duration_in_traffic`,
//! which replaces the typical `duration` in the result.

mod schema;
mod signing;

use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

use geo::Coord;
use serde::Deserialize;
use url::form_urlencoded;

use route_distances_core::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
use route_distances_core::{
    ErrorPolicy, RateLimiter, RawResponse, RouteClient, RouteError, RouteOutcome, RouteRequest,
    RouteResult, TravelMode,
};

use crate::config::BackendConfig;
use crate::error::ProviderBuildError;
use crate::transport::{HttpTransport, Outbound};

use self::schema::{DistanceMatrixResponse, Element};
use self::signing::Credentials;

const SERVICE: &str = "Google";

/// Default Google Maps Platform endpoint.
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://maps.googleapis.com";

/// Default spacing between consecutive requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

const MATRIX_PATH: &str = "/maps/api/distancematrix/json";

const fn travel_mode(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "walking",
        TravelMode::Drive => "driving",
        TravelMode::Bike => "bicycling",
        TravelMode::Transit => "transit",
    }
}

fn location(coord: &Coord) -> String {
    format!("{},{}", coord.y, coord.x)
}

/// Configuration for [`GoogleMapsAdapter`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use route_distances_http::GoogleMapsConfig;
///
/// let config = GoogleMapsConfig::api_key("AIza...")
///     .with_rate_limit(2_500, Duration::from_secs(60 * 60 * 24))
///     .with_request_delay(Duration::ZERO)
///     .with_fail_fast(false);
/// assert_eq!(config.max_requests, 2_500);
/// ```
#[derive(Clone)]
pub struct GoogleMapsConfig {
    /// Endpoint, timeout, user agent, error policy and logging settings.
    pub backend: BackendConfig,
    /// Standard API key.
    pub api_key: Option<String>,
    /// Premium-plan client ID, used with `client_secret` when no key is set.
    pub client_id: Option<String>,
    /// URL-safe base64 signing secret for `client_id`.
    pub client_secret: Option<String>,
    /// Requests admitted per `window`.
    pub max_requests: usize,
    /// Length of the rolling quota window.
    pub window: Duration,
    /// Minimum spacing between consecutive requests.
    pub request_delay: Duration,
}

impl fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("GoogleMapsConfig")
            .field("backend", &self.backend)
            .field("api_key", &redact(&self.api_key))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("request_delay", &self.request_delay)
            .finish()
    }
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::new(DEFAULT_GOOGLE_ENDPOINT),
            api_key: None,
            client_id: None,
            client_secret: None,
            max_requests: DEFAULT_MAX_REQUESTS.get(),
            window: DEFAULT_WINDOW,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl GoogleMapsConfig {
    /// Authenticate with an API key.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Authenticate with a client ID and URL signing secret.
    #[must_use]
    pub fn client(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(id.into()),
            client_secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Send requests somewhere other than Google's public endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.backend.base_url = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.backend.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.backend.user_agent = user_agent.into();
        self
    }

    /// Choose between propagating failures and reporting no route.
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.backend.fail_fast = fail_fast;
        self
    }

    /// Toggle verbose request logging.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.backend.verbose = verbose;
        self
    }

    /// Set the number of attempts for transient failures.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: std::num::NonZeroU32) -> Self {
        self.backend.max_attempts = max_attempts;
        self
    }

    /// Allow `max_requests` requests in any rolling `window`.
    #[must_use]
    pub const fn with_rate_limit(mut self, max_requests: usize, window: Duration) -> Self {
        self.max_requests = max_requests;
        self.window = window;
        self
    }

    /// Space consecutive requests by at least `delay`.
    #[must_use]
    pub const fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

/// Routing adapter for the Google Maps Distance Matrix API.
#[derive(Debug)]
pub struct GoogleMapsAdapter {
    config: BackendConfig,
    credentials: Credentials,
    limiter: RateLimiter,
    transport: HttpTransport,
}

impl GoogleMapsAdapter {
    /// Create an adapter with an API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(GoogleMapsConfig::api_key(api_key))
    }

    /// Create an adapter with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, the signing secret is not
    /// base64, the quota is zero, or the HTTP client or Tokio runtime fails
    /// to build.
    pub fn with_config(config: GoogleMapsConfig) -> Result<Self, ProviderBuildError> {
        let credentials = Credentials::resolve(
            config.api_key.as_deref(),
            config.client_id.as_deref(),
            config.client_secret.as_deref(),
        )?;
        let max_requests =
            NonZeroUsize::new(config.max_requests).ok_or(ProviderBuildError::InvalidRateLimit)?;
        let limiter = RateLimiter::new(max_requests, config.window)
            .with_min_interval(config.request_delay);
        let transport = HttpTransport::new(SERVICE, &config.backend)?;
        Ok(Self {
            config: config.backend,
            credentials,
            limiter,
            transport,
        })
    }

    /// Distances from `origin` to each of `destinations` in one request.
    ///
    /// Outcomes are returned in destination order. Failures follow the
    /// adapter's error policy; when suppressed, every destination reports
    /// [`RouteOutcome::NoRoute`].
    ///
    /// # Errors
    ///
    /// Returns the final failure when the policy is fail-fast.
    pub fn distances_to(
        &self,
        origin: Coord,
        destinations: &[Coord],
        mode: TravelMode,
    ) -> Result<Vec<RouteOutcome>, RouteError> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }
        self.error_policy().execute(
            || {
                let url = self.build_matrix_url(&origin, destinations, mode, None);
                let raw = self.send(&url, false)?;
                Self::convert_row(&raw, destinations.len(), false)
            },
            || vec![RouteOutcome::NoRoute; destinations.len()],
        )
    }

    /// Build a signed or keyed Distance Matrix URL.
    fn build_matrix_url(
        &self,
        origin: &Coord,
        destinations: &[Coord],
        mode: TravelMode,
        departure_time: Option<i64>,
    ) -> String {
        let destinations = destinations
            .iter()
            .map(location)
            .collect::<Vec<_>>()
            .join("|");
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("origins", &location(origin))
            .append_pair("destinations", &destinations)
            .append_pair("mode", travel_mode(mode))
            .append_pair("units", "metric");
        if let Some(departure) = departure_time {
            query.append_pair("departure_time", &departure.to_string());
        }
        let path = format!("{MATRIX_PATH}?{}", query.finish());
        self.config.endpoint(&self.credentials.authorise(&path))
    }

    /// Wait for the quota, then send.
    fn send(&self, url: &str, traffic_adjusted: bool) -> Result<RawResponse, RouteError> {
        self.transport.send_gated(
            &Outbound::get(url).traffic_adjusted(traffic_adjusted),
            || self.limiter.acquire(),
        )
    }

    fn decode(raw: &RawResponse) -> Result<DistanceMatrixResponse, RouteError> {
        let response =
            DistanceMatrixResponse::deserialize(raw).map_err(|err| RouteError::ParseError {
                message: err.to_string(),
            })?;
        if !response.is_ok() {
            return Err(RouteError::ServiceError {
                code: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
        Ok(response)
    }

    /// Convert the first row into one outcome per expected destination.
    fn convert_row(
        raw: &RawResponse,
        expected: usize,
        traffic_adjusted: bool,
    ) -> Result<Vec<RouteOutcome>, RouteError> {
        let response = Self::decode(raw)?;
        let elements = response.first_row().unwrap_or_default();
        if elements.len() != expected {
            return Err(RouteError::ParseError {
                message: format!(
                    "expected {expected} distance matrix elements, found {}",
                    elements.len()
                ),
            });
        }
        elements
            .iter()
            .map(|element| Self::convert_element(element, traffic_adjusted))
            .collect()
    }

    fn convert_element(element: &Element, traffic_adjusted: bool) -> Result<RouteOutcome, RouteError> {
        if !element.is_ok() {
            return Ok(RouteOutcome::NoRoute);
        }
        let duration = if traffic_adjusted {
            element
                .duration_in_traffic
                .as_ref()
                .or(element.duration.as_ref())
        } else {
            element.duration.as_ref()
        };
        match (&element.distance, duration) {
            (Some(distance), Some(duration)) => {
                Ok(RouteResult::new(distance.value, duration.value).into())
            }
            _ => Err(RouteError::ParseError {
                message: "distance matrix element lacks distance or duration".to_owned(),
            }),
        }
    }
}

impl RouteClient for GoogleMapsAdapter {
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError> {
        let departure = request.departure_time.map(|time| time.timestamp());
        let url = self.build_matrix_url(
            &request.origin,
            std::slice::from_ref(&request.destination),
            request.mode,
            departure,
        );
        self.send(&url, request.is_traffic_adjusted())
    }

    fn interpret(
        &self,
        request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError> {
        let outcomes = Self::convert_row(raw, 1, request.is_traffic_adjusted())?;
        Ok(outcomes.first().copied().unwrap_or(RouteOutcome::NoRoute))
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.config.error_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn adapter() -> GoogleMapsAdapter {
        GoogleMapsAdapter::with_config(
            GoogleMapsConfig::api_key("test-key").with_endpoint("https://maps.example.com/"),
        )
        .expect("adapter should build")
    }

    #[fixture]
    fn request() -> RouteRequest {
        RouteRequest::new(
            Coord {
                x: -71.091_365_7,
                y: 42.339_818_6,
            },
            Coord {
                x: -71.096_354,
                y: 42.360_094_9,
            },
        )
        .with_mode(TravelMode::Drive)
    }

    fn matrix(element: RawResponse) -> RawResponse {
        json!({ "status": "OK", "rows": [{ "elements": [element] }] })
    }

    #[rstest]
    fn builds_keyed_matrix_url(adapter: GoogleMapsAdapter, request: RouteRequest) {
        let url = adapter.build_matrix_url(
            &request.origin,
            std::slice::from_ref(&request.destination),
            request.mode,
            Some(1_700_000_000),
        );

        assert_eq!(
            url,
            "https://maps.example.com/maps/api/distancematrix/json?\
             origins=42.3398186%2C-71.0913657&destinations=42.3600949%2C-71.096354\
             &mode=driving&units=metric&departure_time=1700000000&key=test-key"
        );
    }

    #[rstest]
    fn separates_destinations_with_pipes(adapter: GoogleMapsAdapter) {
        let url = adapter.build_matrix_url(
            &Coord { x: 1.0, y: 2.0 },
            &[Coord { x: 3.0, y: 4.0 }, Coord { x: 5.0, y: 6.0 }],
            TravelMode::Walk,
            None,
        );

        assert!(url.contains("destinations=4%2C3%7C6%2C5&mode=walking"));
    }

    #[rstest]
    fn signs_client_urls() {
        let adapter = GoogleMapsAdapter::with_config(GoogleMapsConfig::client("gme-test", "a2V5"))
            .expect("adapter should build");

        let url = adapter.build_matrix_url(
            &Coord { x: 1.0, y: 2.0 },
            &[Coord { x: 3.0, y: 4.0 }],
            TravelMode::Transit,
            None,
        );

        assert!(url.starts_with("https://maps.googleapis.com/maps/api/distancematrix/json?"));
        assert!(url.contains("&mode=transit&units=metric&client=gme-test&signature="));
        assert!(!url.contains("&key="));
    }

    #[rstest]
    fn rejects_zero_quota() {
        let err = GoogleMapsAdapter::with_config(
            GoogleMapsConfig::api_key("test-key").with_rate_limit(0, Duration::from_secs(1)),
        )
        .expect_err("zero quota is invalid");

        assert!(matches!(err, ProviderBuildError::InvalidRateLimit));
    }

    #[rstest]
    fn rejects_missing_credentials() {
        let err = GoogleMapsAdapter::new("").expect_err("empty key is invalid");
        assert!(matches!(err, ProviderBuildError::MissingCredentials));
    }

    #[rstest]
    fn interprets_typical_duration(adapter: GoogleMapsAdapter, request: RouteRequest) {
        let raw = matrix(json!({
            "status": "OK",
            "distance": { "value": 2883 },
            "duration": { "value": 736 },
            "duration_in_traffic": { "value": 803 }
        }));

        let outcome = adapter.interpret(&request, &raw).expect("should parse");

        assert_eq!(outcome, RouteOutcome::Found(RouteResult::new(2883, 736)));
    }

    #[rstest]
    fn interprets_traffic_duration_with_departure_time(
        adapter: GoogleMapsAdapter,
        request: RouteRequest,
    ) {
        let departure = DateTime::<chrono::Utc>::from_timestamp(1_700_000_000, 0)
            .expect("valid timestamp");
        let request = request.with_departure_time(departure);
        let raw = matrix(json!({
            "status": "OK",
            "distance": { "value": 2883 },
            "duration": { "value": 736 },
            "duration_in_traffic": { "value": 803 }
        }));

        let outcome = adapter.interpret(&request, &raw).expect("should parse");

        assert_eq!(outcome, RouteOutcome::Found(RouteResult::new(2883, 803)));
    }

    #[rstest]
    #[case("ZERO_RESULTS")]
    #[case("NOT_FOUND")]
    fn element_failure_is_no_route(
        adapter: GoogleMapsAdapter,
        request: RouteRequest,
        #[case] status: &str,
    ) {
        let raw = matrix(json!({ "status": status }));
        assert_eq!(adapter.interpret(&request, &raw), Ok(RouteOutcome::NoRoute));
    }

    #[rstest]
    fn top_level_failure_is_service_error(adapter: GoogleMapsAdapter, request: RouteRequest) {
        let raw = json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your rate-limit for this API.",
            "rows": []
        });

        let err = adapter.interpret(&request, &raw).expect_err("should fail");

        assert_eq!(
            err,
            RouteError::ServiceError {
                code: "OVER_QUERY_LIMIT".to_owned(),
                message: "You have exceeded your rate-limit for this API.".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(json!({ "status": "OK", "rows": [] }))]
    #[case(matrix(json!({ "status": "OK", "distance": { "value": 1 } })))]
    #[case(json!({ "rows": "nope" }))]
    fn malformed_matrix_is_parse_error(
        adapter: GoogleMapsAdapter,
        request: RouteRequest,
        #[case] raw: RawResponse,
    ) {
        let err = adapter.interpret(&request, &raw).expect_err("should fail");
        assert!(matches!(err, RouteError::ParseError { .. }));
    }

    #[rstest]
    fn distances_to_without_destinations_sends_nothing(adapter: GoogleMapsAdapter) {
        let outcomes = adapter
            .distances_to(Coord { x: 0.0, y: 0.0 }, &[], TravelMode::Walk)
            .expect("nothing to fetch");
        assert!(outcomes.is_empty());
    }

    #[rstest]
    fn debug_redacts_api_key() {
        let config = GoogleMapsConfig::api_key("very-secret");
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
