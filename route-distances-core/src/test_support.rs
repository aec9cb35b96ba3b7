//! Deterministic `RouteClient` used by unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use crate::{ErrorPolicy, RawResponse, RouteClient, RouteError, RouteOutcome, RouteRequest, RouteResult};

/// Stub backend returning a pre-configured answer without network access.
///
/// The stub still goes through the `route`/`interpret` split, so
/// [`RouteClient::distance`] exercises the real [`ErrorPolicy`] handling.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use route_distances_core::test_support::StubRouteClient;
/// use route_distances_core::{RouteClient, RouteOutcome, RouteRequest, RouteResult};
///
/// let stub = StubRouteClient::with_result(RouteResult::new(2883, 736));
/// let request = RouteRequest::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
/// assert_eq!(stub.distance(&request), Ok(RouteOutcome::Found(RouteResult::new(2883, 736))));
/// assert_eq!(stub.calls(), 1);
/// ```
#[derive(Debug)]
pub struct StubRouteClient {
    response: StubResponse,
    policy: ErrorPolicy,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Found(RouteResult),
    NoRoute,
    Malformed,
    Error(RouteError),
}

impl StubRouteClient {
    const fn new(response: StubResponse) -> Self {
        Self {
            response,
            policy: ErrorPolicy::fail_fast(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every request with `result`.
    #[must_use]
    pub const fn with_result(result: RouteResult) -> Self {
        Self::new(StubResponse::Found(result))
    }

    /// Report that no path exists.
    #[must_use]
    pub const fn with_no_route() -> Self {
        Self::new(StubResponse::NoRoute)
    }

    /// Return a body that does not match the stub's schema.
    #[must_use]
    pub const fn with_malformed_body() -> Self {
        Self::new(StubResponse::Malformed)
    }

    /// Fail every `route` call with `error`.
    #[must_use]
    pub const fn with_error(error: RouteError) -> Self {
        Self::new(StubResponse::Error(error))
    }

    /// Use `policy` instead of the default fail-fast policy.
    #[must_use]
    pub const fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of `route` calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteClient for StubRouteClient {
    fn route(&self, _request: &RouteRequest) -> Result<RawResponse, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            StubResponse::Found(result) => Ok(json!({
                "status": "OK",
                "distance": result.distance_metres(),
                "duration": result.duration_secs(),
            })),
            StubResponse::NoRoute => Ok(json!({ "status": "NO_ROUTE" })),
            StubResponse::Malformed => Ok(json!({ "status": "OK" })),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }

    fn interpret(
        &self,
        _request: &RouteRequest,
        raw: &RawResponse,
    ) -> Result<RouteOutcome, RouteError> {
        if raw.get("status").and_then(|s| s.as_str()) == Some("NO_ROUTE") {
            return Ok(RouteOutcome::NoRoute);
        }
        let field = |name: &str| {
            raw.get(name)
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| RouteError::ParseError {
                    message: format!("stub response missing {name}"),
                })
        };
        Ok(RouteResult::new(field("distance")?, field("duration")?).into())
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> RouteRequest {
        RouteRequest::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 })
    }

    #[rstest]
    fn no_route_is_returned_as_value(request: RouteRequest) {
        let stub = StubRouteClient::with_no_route();
        assert_eq!(stub.distance(&request), Ok(RouteOutcome::NoRoute));
    }

    #[rstest]
    fn malformed_body_is_a_parse_error_when_failing_fast(request: RouteRequest) {
        let stub = StubRouteClient::with_malformed_body();
        let err = stub.distance(&request).expect_err("should fail");
        assert!(matches!(err, RouteError::ParseError { .. }));
    }

    #[rstest]
    fn transient_errors_are_retried(request: RouteRequest) {
        let stub = StubRouteClient::with_error(RouteError::Timeout {
            url: "http://localhost:8000".into(),
            timeout_secs: 30,
        })
        .policy(ErrorPolicy::lenient());

        assert_eq!(stub.distance(&request), Ok(RouteOutcome::NoRoute));
        assert_eq!(stub.calls(), 5);
    }
}
