//! Route and isochrone traits shared by all backend adapters.

use serde_json::Value;

use crate::{ErrorPolicy, IsochroneRequest, IsochroneResult, RouteOutcome, RouteRequest};

use super::error::RouteError;

/// A backend's parsed, uninterpreted response body.
pub type RawResponse = Value;

/// Query a routing backend for the distance and duration of a trip.
///
/// Implementers supply [`route`](Self::route), which performs exactly one
/// outbound request, and [`interpret`](Self::interpret), which reads the
/// backend's schema. Callers normally use [`distance`](Self::distance).
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use route_distances_core::{
///     ErrorPolicy, RawResponse, RouteClient, RouteError, RouteOutcome, RouteRequest,
///     RouteResult,
/// };
/// use serde_json::json;
///
/// struct FixedBackend;
///
/// impl RouteClient for FixedBackend {
///     fn route(&self, _request: &RouteRequest) -> Result<RawResponse, RouteError> {
///         Ok(json!({ "metres": 2883, "seconds": 736 }))
///     }
///
///     fn interpret(
///         &self,
///         _request: &RouteRequest,
///         raw: &RawResponse,
///     ) -> Result<RouteOutcome, RouteError> {
///         let metres = raw["metres"].as_u64();
///         let seconds = raw["seconds"].as_u64();
///         match (metres, seconds) {
///             (Some(m), Some(s)) => Ok(RouteResult::new(m, s).into()),
///             _ => Err(RouteError::ParseError { message: "missing fields".into() }),
///         }
///     }
///
///     fn error_policy(&self) -> ErrorPolicy {
///         ErrorPolicy::fail_fast()
///     }
/// }
///
/// let request = RouteRequest::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
/// let outcome = FixedBackend.distance(&request)?;
/// assert_eq!(outcome, RouteOutcome::Found(RouteResult::new(2883, 736)));
/// # Ok::<(), RouteError>(())
/// ```
pub trait RouteClient {
    /// Issue the backend request and return its body without interpreting it.
    ///
    /// Transport and HTTP failures are returned unmodified; this method never
    /// swallows errors.
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError>;

    /// Extract distance and duration from a body returned by
    /// [`route`](Self::route).
    ///
    /// The backend's native "no path" signal maps to
    /// [`RouteOutcome::NoRoute`]; a body that does not match the schema is a
    /// [`RouteError::ParseError`].
    fn interpret(
        &self,
        request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError>;

    /// Failure handling configured for this adapter.
    fn error_policy(&self) -> ErrorPolicy;

    /// Route `request` and apply the adapter's [`ErrorPolicy`].
    ///
    /// # Errors
    ///
    /// Only under a fail-fast policy, with the error from the final attempt.
    fn distance(&self, request: &RouteRequest) -> Result<RouteOutcome, RouteError> {
        self.error_policy().execute(
            || {
                let raw = self.route(request)?;
                self.interpret(request, &raw)
            },
            || RouteOutcome::NoRoute,
        )
    }
}

/// Backends able to compute reachable areas.
pub trait IsochroneProvider {
    /// Compute the area reachable within the request's budget.
    ///
    /// Returns `Ok(None)` when the backend produced no polygon.
    ///
    /// # Errors
    ///
    /// [`RouteError::MissingIsochroneLimit`] when the request has no budget;
    /// otherwise transport and decoding failures, subject to the adapter's
    /// [`ErrorPolicy`].
    fn isochrone(&self, request: &IsochroneRequest)
    -> Result<Option<IsochroneResult>, RouteError>;
}

impl<T: RouteClient + ?Sized> RouteClient for &T {
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError> {
        (**self).route(request)
    }

    fn interpret(
        &self,
        request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError> {
        (**self).interpret(request, raw)
    }

    fn error_policy(&self) -> ErrorPolicy {
        (**self).error_policy()
    }
}

impl<T: RouteClient + ?Sized> RouteClient for std::sync::Arc<T> {
    fn route(&self, request: &RouteRequest) -> Result<RawResponse, RouteError> {
        (**self).route(request)
    }

    fn interpret(
        &self,
        request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError> {
        (**self).interpret(request, raw)
    }

    fn error_policy(&self) -> ErrorPolicy {
        (**self).error_policy()
    }
}
