//! OSRM API response types for the Route service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

use route_distances_core::RawResponse;

/// OSRM Route API response.
///
/// The `code` field indicates the response status; `routes` is empty or
/// absent on failure.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route found between the coordinates
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One routed alternative.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// Codes OSRM uses when the two points cannot be connected.
const NO_ROUTE_CODES: [&str; 2] = ["NoRoute", "NoSegment"];

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if the response reports that no route exists.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        NO_ROUTE_CODES.contains(&self.code.as_str())
    }
}

/// Whether a raw error body carries one of OSRM's "no route" codes.
pub(crate) fn signals_no_route(raw: &RawResponse) -> bool {
    raw.get("code")
        .and_then(RawResponse::as_str)
        .is_some_and(|code| NO_ROUTE_CODES.contains(&code))
}
