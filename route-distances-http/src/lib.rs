//! HTTP routing backends for route-distances.
//!
//! Responsibilities:
//! - Translate [`RouteRequest`](route_distances_core::RouteRequest)s into each
//!   backend's native request shape and decode its response schema.
//! - Map every backend's "no path" signal to
//!   [`RouteOutcome::NoRoute`](route_distances_core::RouteOutcome::NoRoute).
//! - Gate Google Maps requests through a per-adapter rate limiter.
//!
//! Boundaries:
//! - The error policy and outcome types live in `route-distances-core`.
//! - Adapters are blocking; async callers on a multi-threaded runtime are
//!   bridged with `block_in_place`.
//!
//! Invariants:
//! - Adapters are `Send + Sync` and hold no global state.
//! - Construction failures surface immediately as [`ProviderBuildError`].

mod config;
mod error;
mod google;
mod osrm;
mod otp;
pub mod staticmap;
mod transport;
mod valhalla;

pub use config::{BackendConfig, DEFAULT_ENTRYPOINT, DEFAULT_USER_AGENT};
pub use error::ProviderBuildError;
pub use google::{
    DEFAULT_GOOGLE_ENDPOINT, DEFAULT_REQUEST_DELAY, GoogleMapsAdapter, GoogleMapsConfig,
};
pub use osrm::OsrmAdapter;
pub use otp::OtpAdapter;
pub use valhalla::ValhallaAdapter;
