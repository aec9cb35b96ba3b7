//! [`RouteClient`] for the OSRM Route API.
//!
//! The adapter issues `GET {base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}`
//! and reads the first route's distance and duration. OSRM signals missing
//! routes with the `NoRoute` and `NoSegment` codes, usually on an HTTP 400
//! reply; both map to [`RouteOutcome::NoRoute`].
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use route_distances_core::{RouteClient, RouteRequest, TravelMode};
//! use route_distances_http::OsrmAdapter;
//!
//! let osrm = OsrmAdapter::new("http://localhost:5000")?;
//! let request = RouteRequest::new(
//!     Coord { x: -71.091_365_7, y: 42.339_818_6 },
//!     Coord { x: -71.096_354, y: 42.360_094_9 },
//! )
//! .with_mode(TravelMode::Drive);
//! let outcome = osrm.distance(&request)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod schema;

use serde::Deserialize;

use route_distances_core::{
    ErrorPolicy, RawResponse, RouteClient, RouteError, RouteOutcome, RouteRequest, RouteResult,
    TravelMode,
};

use crate::config::BackendConfig;
use crate::error::ProviderBuildError;
use crate::transport::{HttpTransport, Outbound};

use self::schema::{RouteResponse, signals_no_route};

const SERVICE: &str = "OSRM";

/// OSRM profile for a travel mode. OSRM has no transit profile.
const fn profile(mode: TravelMode) -> Option<&'static str> {
    match mode {
        TravelMode::Walk => Some("foot"),
        TravelMode::Drive => Some("car"),
        TravelMode::Bike => Some("bike"),
        TravelMode::Transit => None,
    }
}

/// Routing adapter for an OSRM server.
#[derive(Debug)]
pub struct OsrmAdapter {
    config: BackendConfig,
    transport: HttpTransport,
}

impl OsrmAdapter {
    /// Create an adapter with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(BackendConfig::new(base_url))
    }

    /// Create an adapter with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: BackendConfig) -> Result<Self, ProviderBuildError> {
        let transport = HttpTransport::new(SERVICE, &config)?;
        Ok(Self { config, transport })
    }

    /// Build the Route API URL for `request`.
    fn build_route_url(&self, request: &RouteRequest) -> Result<String, RouteError> {
        let profile = profile(request.mode).ok_or_else(|| RouteError::UnsupportedMode {
            backend: SERVICE,
            mode: request.mode.to_string(),
        })?;
        Ok(self.config.endpoint(&format!(
            "route/v1/{profile}/{},{};{},{}?overview=false",
            request.origin.x, request.origin.y, request.destination.x, request.destination.y
        )))
    }

    /// Convert an OSRM response to a route outcome.
    fn convert_response(response: RouteResponse) -> Result<RouteOutcome, RouteError> {
        if response.is_no_route() {
            return Ok(RouteOutcome::NoRoute);
        }
        if !response.is_ok() {
            return Err(RouteError::ServiceError {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }
        match response.routes.first() {
            Some(route) => Ok(RouteResult::from_measurements(route.distance, route.duration)?.into()),
            None => Ok(RouteOutcome::NoRoute),
        }
    }
}

impl RouteClient for OsrmAdapter {
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError> {
        let url = self.build_route_url(request)?;
        self.transport
            .send(&Outbound::get(&url).no_route_signal(signals_no_route))
    }

    fn interpret(
        &self,
        _request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError> {
        let response = RouteResponse::deserialize(raw).map_err(|err| RouteError::ParseError {
            message: err.to_string(),
        })?;
        Self::convert_response(response)
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.config.error_policy()
    }
}
