//! Travel modes understood by every routing backend.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How the traveller moves between origin and destination.
///
/// Each backend maps these onto its own profile names; a backend may reject a
/// mode it cannot route (OSRM has no transit profile).
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use route_distances_core::TravelMode;
///
/// let mode = TravelMode::from_str("drive")?;
/// assert_eq!(mode, TravelMode::Drive);
/// assert_eq!(mode.to_string(), "drive");
/// assert_eq!(TravelMode::default(), TravelMode::Walk);
/// # Ok::<(), route_distances_core::ParseTravelModeError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    /// On foot.
    #[default]
    Walk,
    /// By car.
    Drive,
    /// By bicycle.
    Bike,
    /// By public transport, walking to and from stops.
    Transit,
}

impl TravelMode {
    /// All modes, in declaration order.
    pub const ALL: [Self; 4] = [Self::Walk, Self::Drive, Self::Bike, Self::Transit];

    /// Lowercase name used in configuration and log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Drive => "drive",
            Self::Bike => "bike",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`TravelMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid travel mode \"{0}\"")]
pub struct ParseTravelModeError(pub String);

impl FromStr for TravelMode {
    type Err = ParseTravelModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTravelModeError(s.to_owned()))
    }
}
