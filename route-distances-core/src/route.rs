//! Route requests and their outcomes.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use geo::Coord;

use crate::TravelMode;
use crate::client::RouteError;

/// A single origin-to-destination query.
///
/// Coordinates use `x` for longitude and `y` for latitude, in degrees.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use route_distances_core::{RouteRequest, TravelMode};
///
/// let request = RouteRequest::new(
///     Coord { x: -71.091_365_7, y: 42.339_818_6 },
///     Coord { x: -71.096_354, y: 42.360_094_9 },
/// )
/// .with_mode(TravelMode::Drive);
/// assert_eq!(request.mode, TravelMode::Drive);
/// assert!(request.departure_time.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Start of the route.
    pub origin: Coord,
    /// End of the route.
    pub destination: Coord,
    /// How the traveller moves.
    pub mode: TravelMode,
    /// Desired departure time.
    ///
    /// Google uses it for traffic-adjusted durations; OTP schedules transit
    /// around its wall-clock date and time in the given offset. Other backends
    /// ignore it.
    pub departure_time: Option<DateTime<FixedOffset>>,
    /// Locations the route should keep clear of. Only Valhalla honours these.
    pub avoid: Vec<Coord>,
}

impl RouteRequest {
    /// Create a walking request between two points.
    #[must_use]
    pub const fn new(origin: Coord, destination: Coord) -> Self {
        Self {
            origin,
            destination,
            mode: TravelMode::Walk,
            departure_time: None,
            avoid: Vec::new(),
        }
    }

    /// Set the travel mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the departure time.
    #[must_use]
    pub fn with_departure_time<Tz: TimeZone>(mut self, departure_time: DateTime<Tz>) -> Self {
        self.departure_time = Some(departure_time.fixed_offset());
        self
    }

    /// Set the locations to avoid.
    #[must_use]
    pub fn with_avoid(mut self, avoid: impl IntoIterator<Item = Coord>) -> Self {
        self.avoid = avoid.into_iter().collect();
        self
    }

    /// Whether the request asks for traffic-adjusted routing.
    #[must_use]
    pub const fn is_traffic_adjusted(&self) -> bool {
        self.departure_time.is_some()
    }
}

/// Distance and duration of a successfully routed trip.
///
/// Both values are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    distance: u64,
    duration: u64,
}

impl RouteResult {
    /// Build a result from whole metres and whole seconds.
    #[must_use]
    pub const fn new(distance_metres: u64, duration_secs: u64) -> Self {
        Self {
            distance: distance_metres,
            duration: duration_secs,
        }
    }

    /// Build a result from fractional backend measurements.
    ///
    /// Values are rounded to the nearest metre and second.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::ParseError`] when either value is negative, NaN or
    /// infinite.
    pub fn from_measurements(distance_metres: f64, duration_secs: f64) -> Result<Self, RouteError> {
        Ok(Self::new(
            whole_units(distance_metres, "distance")?,
            whole_units(duration_secs, "duration")?,
        ))
    }

    /// Route length in metres.
    #[must_use]
    pub const fn distance_metres(&self) -> u64 {
        self.distance
    }

    /// Travel time in whole seconds.
    #[must_use]
    pub const fn duration_secs(&self) -> u64 {
        self.duration
    }

    /// Travel time as a [`Duration`].
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.duration)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked finite and non-negative before rounding"
)]
fn whole_units(value: f64, field: &str) -> Result<u64, RouteError> {
    if !value.is_finite() || value < 0.0 {
        return Err(RouteError::ParseError {
            message: format!("{field} must be a finite non-negative number, got {value}"),
        });
    }
    Ok(value.round() as u64)
}

/// What a backend concluded about a route.
///
/// `NoRoute` is a value, not an error: the backend determined that no path
/// exists. Under a lenient error policy, failed requests also collapse into
/// `NoRoute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteOutcome {
    /// A path was found.
    Found(RouteResult),
    /// No path exists, or the request failed under a lenient policy.
    NoRoute,
}

impl RouteOutcome {
    /// The routed result, if any.
    #[must_use]
    pub const fn result(self) -> Option<RouteResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::NoRoute => None,
        }
    }

    /// Whether this outcome is [`RouteOutcome::NoRoute`].
    #[must_use]
    pub const fn is_no_route(self) -> bool {
        matches!(self, Self::NoRoute)
    }
}

impl From<RouteResult> for RouteOutcome {
    fn from(result: RouteResult) -> Self {
        Self::Found(result)
    }
}
