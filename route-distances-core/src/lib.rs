//! Core types for querying routing backends.
//!
//! A caller builds a [`RouteRequest`], hands it to one backend adapter through
//! the [`RouteClient`] contract and receives a [`RouteOutcome`]: either a
//! [`RouteResult`] or [`RouteOutcome::NoRoute`]. Failures travel on a
//! separate [`RouteError`] channel whose use is decided by each adapter's
//! [`ErrorPolicy`]. The [`RateLimiter`] guards backends with a billed quota.

pub mod client;
mod isochrone;
mod mode;
pub mod policy;
pub mod rate_limit;
mod route;

#[doc(hidden)]
pub mod test_support;

pub use client::{ErrorKind, IsochroneProvider, RawResponse, RouteClient, RouteError};
pub use isochrone::{IsochroneRequest, IsochroneResult};
pub use mode::{ParseTravelModeError, TravelMode};
pub use policy::ErrorPolicy;
pub use rate_limit::RateLimiter;
pub use route::{RouteOutcome, RouteRequest, RouteResult};
