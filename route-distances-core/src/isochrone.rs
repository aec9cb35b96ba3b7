//! Isochrone queries and the polygons they produce.

use std::time::Duration;

use geo::{Coord, LineString, MultiPolygon};

use crate::TravelMode;
use crate::client::RouteError;

/// Query for the area reachable from an origin.
///
/// At least one of `max_time` and `max_distance` must be set. Backends may
/// ignore `max_distance`; OpenTripPlanner does, but it is still forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    /// Centre of the isochrone.
    pub origin: Coord,
    /// Travel-time budget.
    pub max_time: Option<Duration>,
    /// Travel-distance budget in metres.
    pub max_distance: Option<u32>,
    /// How the traveller moves.
    pub mode: TravelMode,
}

impl IsochroneRequest {
    /// Create a walking request with no budget set yet.
    #[must_use]
    pub const fn new(origin: Coord) -> Self {
        Self {
            origin,
            max_time: None,
            max_distance: None,
            mode: TravelMode::Walk,
        }
    }

    /// Set the travel-time budget.
    #[must_use]
    pub const fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Set the travel-distance budget in metres.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Set the travel mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check that a budget was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MissingIsochroneLimit`] when neither budget is set.
    pub const fn validate(&self) -> Result<(), RouteError> {
        if self.max_time.is_none() && self.max_distance.is_none() {
            return Err(RouteError::MissingIsochroneLimit);
        }
        Ok(())
    }
}

/// Area reachable within an isochrone budget.
///
/// Each polygon's exterior ring bounds a reachable (base) area; its interior
/// rings cut out inaccessible pockets. All rings are closed.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneResult {
    polygons: MultiPolygon<f64>,
}

impl IsochroneResult {
    /// Wrap a multipolygon. `geo` closes every ring on construction.
    #[must_use]
    pub const fn new(polygons: MultiPolygon<f64>) -> Self {
        Self { polygons }
    }

    /// The full geometry.
    #[must_use]
    pub const fn multipolygon(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Consume the result, returning the geometry.
    #[must_use]
    pub fn into_multipolygon(self) -> MultiPolygon<f64> {
        self.polygons
    }

    /// Exterior rings bounding reachable areas.
    pub fn base_rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons.iter().map(geo::Polygon::exterior)
    }

    /// Interior rings bounding unreachable pockets.
    pub fn inaccessible_rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons.iter().flat_map(geo::Polygon::interiors)
    }

    /// Whether the geometry holds no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Polygon, line_string};
    use rstest::rstest;

    fn square_with_hole() -> Polygon<f64> {
        Polygon::new(
            line_string![
                (x: 0.0, y: 0.0),
                (x: 4.0, y: 0.0),
                (x: 4.0, y: 4.0),
                (x: 0.0, y: 4.0),
            ],
            vec![line_string![
                (x: 1.0, y: 1.0),
                (x: 2.0, y: 1.0),
                (x: 2.0, y: 2.0),
            ]],
        )
    }

    #[rstest]
    fn classifies_exterior_and_interior_rings() {
        let result = IsochroneResult::new(MultiPolygon::new(vec![square_with_hole()]));

        assert_eq!(result.base_rings().count(), 1);
        assert_eq!(result.inaccessible_rings().count(), 1);
        assert!(result.base_rings().all(LineString::is_closed));
        assert!(result.inaccessible_rings().all(LineString::is_closed));
        assert!(!result.is_empty());
    }

    #[rstest]
    fn request_requires_a_budget() {
        let request = IsochroneRequest::new(Coord { x: -71.088_85, y: 42.340_37 });
        assert_eq!(request.validate(), Err(RouteError::MissingIsochroneLimit));
        assert!(request.with_max_distance(500).validate().is_ok());
    }
}
