//! [`RouteClient`] and [`IsochroneProvider`] for OpenTripPlanner.
//!
//! Trips are planned with `GET {base_url}/otp/routers/default/plan`; the
//! adapter takes the first itinerary's duration and the sum of its leg
//! distances. Isochrones come from `/otp/routers/default/isochrone` as GeoJSON.
//!
//! OTP accepts `maxWalkDistance` on isochrone requests but does not bound the
//! shape by it. The value is still forwarded so callers keep working if OTP
//! starts honouring it.

mod schema;

use serde::Deserialize;
use url::form_urlencoded::Serializer;

use route_distances_core::{
    ErrorPolicy, IsochroneProvider, IsochroneRequest, IsochroneResult, RawResponse, RouteClient,
    RouteError, RouteOutcome, RouteRequest, RouteResult, TravelMode,
};

use crate::config::BackendConfig;
use crate::error::ProviderBuildError;
use crate::staticmap::{BASE_COLOUR, INACCESSIBLE_COLOUR, Shape, StaticMap};
use crate::transport::{HttpTransport, Outbound};

use self::schema::{IsochroneResponse, PlanResponse};

const SERVICE: &str = "OTP";

/// Size of the verbose-mode preview image.
const PREVIEW_SIZE: &str = "400x400";

/// OTP mode list for a travel mode.
const fn modes(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "WALK",
        TravelMode::Drive => "WALK,CAR",
        TravelMode::Bike => "WALK,BICYCLE",
        TravelMode::Transit => "WALK,TRANSIT",
    }
}

fn place(coord: geo::Coord) -> String {
    format!("{},{}", coord.y, coord.x)
}

fn parse_error(err: &serde_json::Error) -> RouteError {
    RouteError::ParseError {
        message: err.to_string(),
    }
}

/// Routing adapter for an OpenTripPlanner server.
#[derive(Debug)]
pub struct OtpAdapter {
    config: BackendConfig,
    transport: HttpTransport,
}

impl OtpAdapter {
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

    /// Build the plan URL for `request`.
    fn build_plan_url(&self, request: &RouteRequest) -> String {
        let mut query = Serializer::new(String::new());
        query
            .append_pair("fromPlace", &place(request.origin))
            .append_pair("toPlace", &place(request.destination))
            .append_pair("mode", modes(request.mode));
        if let Some(departure) = request.departure_time {
            query
                .append_pair("date", &departure.format("%Y-%m-%d").to_string())
                .append_pair("time", &departure.format("%H:%M").to_string());
        }
        format!(
            "{}?{}",
            self.config.endpoint("otp/routers/default/plan"),
            query.finish()
        )
    }

    /// Build the isochrone URL for `request`.
    fn build_isochrone_url(&self, request: &IsochroneRequest) -> String {
        let mut query = Serializer::new(String::new());
        query.append_pair("fromPlace", &place(request.origin));
        if let Some(max_distance) = request.max_distance {
            query.append_pair("maxWalkDistance", &max_distance.to_string());
        }
        if let Some(max_time) = request.max_time {
            query.append_pair("cutoffSec", &max_time.as_secs().to_string());
        }
        query.append_pair("mode", modes(request.mode));
        format!(
            "{}?{}",
            self.config.endpoint("otp/routers/default/isochrone"),
            query.finish()
        )
    }

    /// Convert a plan response to a route outcome.
    fn convert_plan(response: PlanResponse) -> Result<RouteOutcome, RouteError> {
        if let Some(error) = response.error {
            if error.is_no_route() {
                return Ok(RouteOutcome::NoRoute);
            }
            return Err(RouteError::ServiceError {
                code: error.msg.unwrap_or_else(|| error.id.to_string()),
                message: error.message.unwrap_or_default(),
            });
        }
        let plan = response.plan.ok_or_else(|| RouteError::ParseError {
            message: "OTP response has neither plan nor error".to_owned(),
        })?;
        match plan.itineraries.first() {
            Some(itinerary) => {
                Ok(RouteResult::from_measurements(itinerary.distance(), itinerary.duration)?.into())
            }
            None => Ok(RouteOutcome::NoRoute),
        }
    }

    /// Decode an isochrone body; `None` when OTP produced no polygon.
    fn convert_isochrone(raw: &RawResponse) -> Result<Option<IsochroneResult>, RouteError> {
        let response = IsochroneResponse::deserialize(raw).map_err(|err| parse_error(&err))?;
        let Some(feature) = response.features.into_iter().next() else {
            return Ok(None);
        };
        let result = IsochroneResult::new(feature.geometry.into_multipolygon()?);
        Ok((!result.is_empty()).then_some(result))
    }

    fn fetch_isochrone(
        &self,
        request: &IsochroneRequest,
    ) -> Result<Option<IsochroneResult>, RouteError> {
        let url = self.build_isochrone_url(request);
        let raw = self.transport.send(&Outbound::get(&url))?;
        Self::convert_isochrone(&raw)
    }

    fn log_preview(&self, isochrone: &IsochroneResult) {
        let mut map = StaticMap::default();
        for ring in isochrone.base_rings() {
            map.add(ring, Shape::Polygon, BASE_COLOUR);
        }
        for ring in isochrone.inaccessible_rings() {
            map.add(ring, Shape::Polygon, INACCESSIBLE_COLOUR);
        }
        self.transport.log(format_args!(
            "Preview with Google Static Maps API: {}",
            map.url(PREVIEW_SIZE)
        ));
    }
}

impl RouteClient for OtpAdapter {
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError> {
        let url = self.build_plan_url(request);
        self.transport.send(&Outbound::get(&url))
    }

    fn interpret(
        &self,
        _request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError> {
        let response = PlanResponse::deserialize(raw).map_err(|err| parse_error(&err))?;
        Self::convert_plan(response)
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.config.error_policy()
    }
}

impl IsochroneProvider for OtpAdapter {
    fn isochrone(
        &self,
        request: &IsochroneRequest,
    ) -> Result<Option<IsochroneResult>, RouteError> {
        request.validate()?;
        let isochrone = self
            .error_policy()
            .execute(|| self.fetch_isochrone(request), || None)?;
        if let Some(shape) = &isochrone
            && self.transport.is_verbose()
        {
            self.log_preview(shape);
        }
        Ok(isochrone)
    }
}
