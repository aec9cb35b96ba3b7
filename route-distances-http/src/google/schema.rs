//! Google Distance Matrix API response types.
//!
//! See: <https://developers.google.com/maps/documentation/distance-matrix/distance-matrix>

use serde::Deserialize;

/// Distance Matrix response: one row per origin, one element per destination.
#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Top-level status; anything but `"OK"` means the request failed.
    pub status: String,
    /// Explanation accompanying a failed status.
    pub error_message: Option<String>,
    /// Rows in origin order.
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// Elements for a single origin.
#[derive(Debug, Deserialize)]
pub struct Row {
    /// Elements in destination order.
    pub elements: Vec<Element>,
}

/// Result for one origin/destination pair.
#[derive(Debug, Deserialize)]
pub struct Element {
    /// Per-pair status such as `"OK"`, `"ZERO_RESULTS"` or `"NOT_FOUND"`.
    pub status: String,
    /// Route length in metres.
    pub distance: Option<Measure>,
    /// Typical travel time in seconds.
    pub duration: Option<Measure>,
    /// Travel time in current traffic, present when a departure time was sent.
    pub duration_in_traffic: Option<Measure>,
}

/// A measured quantity with its display text.
#[derive(Debug, Deserialize)]
pub struct Measure {
    /// Metres or seconds.
    pub value: u64,
    /// Localised rendering, e.g. `"2.9 km"`.
    pub text: Option<String>,
}

impl DistanceMatrixResponse {
    /// Check if the request as a whole succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }

    /// Elements of the first row, i.e. for the single origin sent.
    #[must_use]
    pub fn first_row(&self) -> Option<&[Element]> {
        self.rows.first().map(|row| row.elements.as_slice())
    }
}

impl Element {
    /// Check if this pair was routed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_traffic_response() {
        let json = r#"{
            "destination_addresses": ["Boston, MA"],
            "origin_addresses": ["Boston, MA"],
            "rows": [{
                "elements": [{
                    "distance": { "text": "2.9 km", "value": 2883 },
                    "duration": { "text": "12 mins", "value": 736 },
                    "duration_in_traffic": { "text": "13 mins", "value": 803 },
                    "status": "OK"
                }]
            }],
            "status": "OK"
        }"#;

        let response: DistanceMatrixResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let element = response
            .first_row()
            .and_then(<[Element]>::first)
            .expect("one element");
        assert!(element.is_ok());
        assert_eq!(element.duration_in_traffic.as_ref().map(|m| m.value), Some(803));
    }

    #[test]
    fn deserialise_denied_response() {
        let json = r#"{
            "destination_addresses": [],
            "origin_addresses": [],
            "rows": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let response: DistanceMatrixResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.first_row().is_none());
    }
}
