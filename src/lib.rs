//! Facade crate for route-distances.
//!
//! This crate re-exports the routing contract, outcome types, error policy and
//! rate limiter, and exposes the HTTP backend adapters behind the `http`
//! feature.

#![forbid(unsafe_code)]

pub use route_distances_core::{
    ErrorKind, ErrorPolicy, IsochroneProvider, IsochroneRequest, IsochroneResult,
    ParseTravelModeError, RateLimiter, RawResponse, RouteClient, RouteError, RouteOutcome,
    RouteRequest, RouteResult, TravelMode,
};

#[cfg(feature = "http")]
pub use route_distances_http::{
    BackendConfig, GoogleMapsAdapter, GoogleMapsConfig, OsrmAdapter, OtpAdapter,
    ProviderBuildError, ValhallaAdapter, staticmap,
};
