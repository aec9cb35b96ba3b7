//! [`RouteClient`] for Valhalla's `/route` action.
//!
//! Requests are `POST`ed as JSON with lengths in kilometres; the adapter
//! converts the first leg's summary to metres and seconds. Valhalla reports
//! unreachable destinations with error codes 171, 442 and 443, which map to
//! [`RouteOutcome::NoRoute`].

mod schema;

use serde::Deserialize;

use route_distances_core::{
    ErrorPolicy, RawResponse, RouteClient, RouteError, RouteOutcome, RouteRequest, RouteResult,
    TravelMode,
};

use crate::config::BackendConfig;
use crate::error::ProviderBuildError;
use crate::transport::{HttpTransport, Outbound};

use self::schema::{DirectionsOptions, Location, RouteBody, RouteResponse, signals_no_route};

const SERVICE: &str = "Valhalla";

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Valhalla costing model for a travel mode.
const fn costing(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "pedestrian",
        TravelMode::Drive => "auto",
        TravelMode::Bike => "bicycle",
        TravelMode::Transit => "multimodal",
    }
}

const fn location(coord: geo::Coord) -> Location {
    Location {
        lat: coord.y,
        lon: coord.x,
    }
}

/// Routing adapter for a Valhalla server.
///
/// Honours [`RouteRequest::avoid`] through Valhalla's `avoid_locations`.
#[derive(Debug)]
pub struct ValhallaAdapter {
    config: BackendConfig,
    transport: HttpTransport,
}

impl ValhallaAdapter {
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

    /// Build the JSON body for `request`.
    fn build_body(request: &RouteRequest) -> Result<RawResponse, RouteError> {
        let body = RouteBody {
            locations: [location(request.origin), location(request.destination)],
            costing: costing(request.mode),
            directions_options: DirectionsOptions { units: "kilometers" },
            avoid_locations: request.avoid.iter().copied().map(location).collect(),
        };
        serde_json::to_value(&body).map_err(|err| RouteError::ParseError {
            message: format!("failed to encode Valhalla request: {err}"),
        })
    }

    /// Convert a Valhalla response to a route outcome.
    fn convert_response(response: RouteResponse) -> Result<RouteOutcome, RouteError> {
        if response.is_no_route() {
            return Ok(RouteOutcome::NoRoute);
        }
        if let Some(code) = response.error_code {
            return Err(RouteError::ServiceError {
                code: code.to_string(),
                message: response.error.unwrap_or_default(),
            });
        }
        let summary = response
            .trip
            .and_then(|trip| trip.legs.into_iter().next())
            .map(|leg| leg.summary)
            .ok_or_else(|| RouteError::ParseError {
                message: "Valhalla response missing trip legs".to_owned(),
            })?;
        Ok(RouteResult::from_measurements(kilometres_to_metres(summary.length), summary.time)?.into())
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "Valhalla reports lengths as fractional kilometres"
)]
fn kilometres_to_metres(kilometres: f64) -> f64 {
    kilometres * METRES_PER_KILOMETRE
}

impl RouteClient for ValhallaAdapter {
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError> {
        let url = self.config.endpoint("route");
        let body = Self::build_body(request)?;
        self.transport
            .send(&Outbound::post(&url, &body).no_route_signal(signals_no_route))
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
