//! OpenTripPlanner plan and isochrone response types.
//!
//! See: <http://dev.opentripplanner.org/apidoc/1.5.0/resource_PlannerResource.html>

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;

use route_distances_core::RouteError;

/// Response of `/otp/routers/{router}/plan`.
///
/// OTP answers with HTTP 200 in both cases; failures populate `error`.
#[derive(Debug, Deserialize)]
pub struct PlanResponse {
    /// The trip plan.
    pub plan: Option<Plan>,
    /// Planner failure.
    pub error: Option<PlannerError>,
}

/// Candidate itineraries for a trip.
#[derive(Debug, Deserialize)]
pub struct Plan {
    /// Itineraries, best first.
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

/// One way of making the trip.
#[derive(Debug, Deserialize)]
pub struct Itinerary {
    /// Total duration in seconds, including waiting.
    pub duration: f64,
    /// Legs making up the itinerary.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// One leg of an itinerary.
#[derive(Debug, Deserialize)]
pub struct Leg {
    /// Distance in metres.
    pub distance: f64,
}

/// Planner error document.
#[derive(Debug, Deserialize)]
pub struct PlannerError {
    /// Numeric error id.
    pub id: i64,
    /// Symbolic error name, e.g. `PATH_NOT_FOUND`.
    pub msg: Option<String>,
    /// Human-readable description.
    pub message: Option<String>,
    /// Set by OTP when the error means no trip exists.
    #[serde(rename = "noPath", default)]
    pub no_path: bool,
}

/// Planner error ids meaning the trip cannot be made.
///
/// 400: `OUTSIDE_BOUNDS`; 404: `PATH_NOT_FOUND`; 406: `NO_TRANSIT_TIMES`;
/// 409: `TOO_CLOSE`; 440: `GEOCODE_FROM_NOT_FOUND`; 450:
/// `GEOCODE_TO_NOT_FOUND`; 460: `GEOCODE_FROM_TO_NOT_FOUND`;
/// 470: `LOCATION_NOT_ACCESSIBLE`.
const NO_ROUTE_IDS: [i64; 8] = [400, 404, 406, 409, 440, 450, 460, 470];

impl PlannerError {
    /// Whether the error reports an impossible trip.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.no_path || NO_ROUTE_IDS.contains(&self.id)
    }
}

impl Itinerary {
    /// Sum of leg distances in metres.
    #[expect(
        clippy::float_arithmetic,
        reason = "OTP reports leg distances as fractional metres"
    )]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance).sum()
    }
}

/// GeoJSON feature collection returned by `/otp/routers/{router}/isochrone`.
#[derive(Debug, Deserialize)]
pub struct IsochroneResponse {
    /// One feature per cutoff.
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A single isochrone feature.
#[derive(Debug, Deserialize)]
pub struct Feature {
    /// The isochrone shape.
    pub geometry: Geometry,
}

/// GeoJSON position: longitude, latitude and optional extra values.
pub type Position = Vec<f64>;

/// Polygonal GeoJSON geometry.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Rings of a single polygon, exterior first.
    Polygon(Vec<Vec<Position>>),
    /// Polygons, each given as rings with the exterior first.
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Convert to a `geo` multipolygon, closing every ring.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::ParseError`] for positions without two values and
    /// for rings with fewer than three vertices.
    pub fn into_multipolygon(self) -> Result<MultiPolygon<f64>, RouteError> {
        let polygons = match self {
            Self::Polygon(rings) => vec![rings],
            Self::MultiPolygon(polygons) => polygons,
        };
        polygons
            .into_iter()
            .map(polygon)
            .collect::<Result<Vec<_>, _>>()
            .map(MultiPolygon::new)
    }
}

fn polygon(rings: Vec<Vec<Position>>) -> Result<Polygon<f64>, RouteError> {
    let mut converted = rings.into_iter().map(ring);
    let exterior = converted.next().ok_or_else(|| RouteError::ParseError {
        message: "isochrone polygon has no rings".to_owned(),
    })??;
    let interiors = converted.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring(positions: Vec<Position>) -> Result<LineString<f64>, RouteError> {
    let coords = positions
        .iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(RouteError::ParseError {
                message: format!("isochrone position {position:?} needs longitude and latitude"),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let open_len = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => coords.len() - 1,
        _ => coords.len(),
    };
    if open_len < 3 {
        return Err(RouteError::ParseError {
            message: format!("isochrone ring has {open_len} vertices; at least 3 are needed"),
        });
    }
    Ok(LineString::new(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialise_plan_error() {
        let json = r#"{
            "requestParameters": {},
            "error": { "id": 404, "msg": "PATH_NOT_FOUND", "message": "No trip found.", "noPath": true }
        }"#;

        let response: PlanResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.plan.is_none());
        assert!(response.error.expect("should have an error").is_no_route());
    }

    #[test]
    fn itinerary_distance_sums_legs() {
        let itinerary: Itinerary = serde_json::from_value(json!({
            "duration": 736,
            "legs": [{ "distance": 1000.25 }, { "distance": 1882.5 }]
        }))
        .expect("should deserialise");

        assert_eq!(itinerary.distance(), 2882.75);
    }

    #[test]
    fn multipolygon_rings_are_closed() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "MultiPolygon",
            "coordinates": [[
                [[-71.1, 42.3], [-71.0, 42.3], [-71.0, 42.4]],
                [[-71.06, 42.33], [-71.05, 42.33], [-71.05, 42.34], [-71.06, 42.33]]
            ]]
        }))
        .expect("should deserialise");

        let multipolygon = geometry.into_multipolygon().expect("should convert");

        let polygon = multipolygon.0.first().expect("one polygon");
        assert!(polygon.exterior().is_closed());
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [[[-71.1, 42.3], [-71.0, 42.3], [-71.1, 42.3]]]
        }))
        .expect("should deserialise");

        let err = geometry.into_multipolygon().expect_err("should fail");

        assert!(matches!(err, RouteError::ParseError { .. }));
    }
}
