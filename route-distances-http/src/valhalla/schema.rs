//! Valhalla `/route` request and response types.
//!
//! See: <https://valhalla.github.io/valhalla/api/turn-by-turn/api-reference/>

use serde::{Deserialize, Serialize};

use route_distances_core::RawResponse;

/// Body of a `POST /route` request.
#[derive(Debug, Serialize)]
pub struct RouteBody<'a> {
    /// Origin then destination.
    pub locations: [Location; 2],
    /// Costing model, e.g. `"auto"`.
    pub costing: &'a str,
    /// Output options; lengths are requested in kilometres.
    pub directions_options: DirectionsOptions,
    /// Points the route must avoid.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub avoid_locations: Vec<Location>,
}

/// A longitude/latitude pair in Valhalla's JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Output options for the route response.
#[derive(Debug, Serialize)]
pub struct DirectionsOptions {
    /// Unit for reported lengths.
    pub units: &'static str,
}

/// Response of the `/route` action.
///
/// Successful replies carry `trip`; failures carry `error_code` and `error`.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// The routed trip.
    pub trip: Option<Trip>,
    /// Valhalla error code.
    pub error_code: Option<i64>,
    /// Human-readable error.
    pub error: Option<String>,
}

/// A routed trip.
#[derive(Debug, Deserialize)]
pub struct Trip {
    /// One leg per consecutive pair of locations.
    pub legs: Vec<Leg>,
}

/// A single leg of a trip.
#[derive(Debug, Deserialize)]
pub struct Leg {
    /// Totals for the leg.
    pub summary: Summary,
}

/// Leg totals.
#[derive(Debug, Deserialize)]
pub struct Summary {
    /// Length in the requested unit (kilometres).
    pub length: f64,
    /// Time in seconds.
    pub time: f64,
}

/// Error codes meaning the locations cannot be connected.
///
/// 170: locations are in unconnected regions; 171: no suitable edges near a
/// location; 441: location is unreachable; 442: no path could be found;
/// 443: exact route match failed to find a path.
const NO_ROUTE_CODES: [i64; 5] = [170, 171, 441, 442, 443];

impl RouteResponse {
    /// Check if the response reports that no route exists.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.error_code.is_some_and(|code| NO_ROUTE_CODES.contains(&code))
    }
}

/// Whether a raw error body carries one of Valhalla's "no route" codes.
pub(crate) fn signals_no_route(raw: &RawResponse) -> bool {
    raw.get("error_code")
        .and_then(RawResponse::as_i64)
        .is_some_and(|code| NO_ROUTE_CODES.contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialise_body_omits_empty_avoid_list() {
        let body = RouteBody {
            locations: [
                Location { lat: 42.34, lon: -71.09 },
                Location { lat: 42.36, lon: -71.10 },
            ],
            costing: "auto",
            directions_options: DirectionsOptions { units: "kilometers" },
            avoid_locations: Vec::new(),
        };

        let value = serde_json::to_value(&body).expect("should serialise");

        assert_eq!(
            value,
            json!({
                "locations": [
                    { "lat": 42.34, "lon": -71.09 },
                    { "lat": 42.36, "lon": -71.10 }
                ],
                "costing": "auto",
                "directions_options": { "units": "kilometers" }
            })
        );
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{
            "error_code": 442,
            "error": "No path could be found for input",
            "status_code": 400,
            "status": "Bad Request"
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.trip.is_none());
        assert!(response.is_no_route());
        assert!(signals_no_route(&serde_json::from_str(json).expect("valid JSON")));
    }
}
