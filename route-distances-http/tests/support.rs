//! Shared helpers for tests that stand in for a routing backend.

use geo::Coord;
use route_distances_core::RouteRequest;
use tokio::runtime::{Builder, Runtime};
use wiremock::{Mock, MockServer, Request};

/// A mock HTTP backend driven from synchronous test code.
///
/// Adapters block on their own runtime, so the mock server is started and
/// inspected from a separate runtime that is never entered while an adapter
/// call is in flight.
pub struct StubBackend {
    server: MockServer,
    runtime: Runtime,
}

impl StubBackend {
    /// Start an empty mock server.
    pub fn start() -> Self {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap_or_else(|err| panic!("failed to build test runtime: {err}"));
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    /// Base URL of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Register `mock` with the server.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Requests the server has received so far.
    pub fn received(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

/// Boston drive used throughout the adapter tests.
pub fn boston_request() -> RouteRequest {
    RouteRequest::new(
        Coord {
            x: -71.091_365_7,
            y: 42.339_818_6,
        },
        Coord {
            x: -71.096_354,
            y: 42.360_094_9,
        },
    )
}
