//! Google Static Maps preview URLs for isochrone geometry.
//!
//! Only used for verbose logging; nothing here issues a request.

use geo::LineString;

/// Base URL of the Static Maps API.
const STATIC_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Fill colour for reachable (base) rings.
pub const BASE_COLOUR: &str = "0x00ff0066";

/// Fill colour for inaccessible rings.
pub const INACCESSIBLE_COLOUR: &str = "0xff000066";

/// How a set of coordinates is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Tiny markers at each vertex.
    Markers,
    /// An open path.
    Path,
    /// A filled polygon with no outline.
    Polygon,
}

/// Accumulates shapes and renders a Static Maps URL.
///
/// # Example
///
/// ```
/// use geo::line_string;
/// use route_distances_http::staticmap::{BASE_COLOUR, Shape, StaticMap};
///
/// let mut map = StaticMap::default();
/// map.add(&line_string![(x: -71.0, y: 42.0), (x: -71.1, y: 42.1)], Shape::Path, BASE_COLOUR);
/// assert_eq!(
///     map.url("400x400"),
///     "https://maps.googleapis.com/maps/api/staticmap?size=400x400\
///      &path=color:0x00ff0066|weight:5|42.000000,-71.000000|42.100000,-71.100000"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMap {
    parameters: Vec<String>,
}

impl StaticMap {
    /// Draw `coords` as `shape` in `colour` (24- or 32-bit hex, `0xRRGGBB[AA]`).
    pub fn add(&mut self, coords: &LineString<f64>, shape: Shape, colour: &str) {
        let mut parameter = match shape {
            Shape::Markers => format!("markers=color:{colour}|size:tiny"),
            Shape::Path => format!("path=color:{colour}|weight:5"),
            Shape::Polygon => format!("path=color:0x00000000|fillcolor:{colour}|weight:5"),
        };
        for coord in coords.coords() {
            parameter.push_str(&format!("|{:.6},{:.6}", coord.y, coord.x));
        }
        self.parameters.push(parameter);
    }

    /// Render the URL for an image of `size` (e.g. `"400x400"`).
    #[must_use]
    pub fn url(&self, size: &str) -> String {
        std::iter::once(format!("{STATIC_MAP_URL}?size={size}"))
            .chain(self.parameters.iter().cloned())
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Whether no shapes have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
