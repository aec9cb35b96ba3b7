//! The contract every routing backend adapter implements.
//!
//! [`RouteClient`] splits a query into an uninterpreted [`RouteClient::route`]
//! call and a backend-specific [`RouteClient::interpret`] step. The provided
//! [`RouteClient::distance`] joins the two under the adapter's
//! [`ErrorPolicy`](crate::ErrorPolicy), so failure handling is identical for
//! every backend.

mod error;
mod provider;

pub use error::{ErrorKind, RouteError};
pub use provider::{IsochroneProvider, RawResponse, RouteClient};
