//! Blocking bridge over an asynchronous HTTP client.
//!
//! Adapters expose a synchronous [`RouteClient`](route_distances_core::RouteClient)
//! so they stay usable outside async code. Each adapter owns an
//! [`HttpTransport`], which keeps a `reqwest` client and a current-thread Tokio
//! runtime and blocks on them per request.
//!
//! When called from inside a multi-threaded Tokio runtime, the caller's handle
//! is used with [`tokio::task::block_in_place`] to avoid nested runtime panics.
//! From a `current_thread` runtime the transport falls back to its own runtime,
//! which may deadlock if the caller's runtime drives IO this request needs.

use std::fmt;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use route_distances_core::{RawResponse, RouteError};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::config::BackendConfig;
use crate::error::ProviderBuildError;

/// Recognises a backend's "no path" document in an error-status body.
pub(crate) type NoRouteSignal = fn(&RawResponse) -> bool;

const fn never(_: &RawResponse) -> bool {
    false
}

/// A single outbound request.
pub(crate) struct Outbound<'a> {
    url: &'a str,
    body: Option<&'a RawResponse>,
    traffic_adjusted: bool,
    no_route: NoRouteSignal,
}

impl<'a> Outbound<'a> {
    /// A `GET` request whose error bodies never signal a missing route.
    pub(crate) const fn get(url: &'a str) -> Self {
        Self {
            url,
            body: None,
            traffic_adjusted: false,
            no_route: never,
        }
    }

    /// A `POST` request carrying a JSON body.
    pub(crate) const fn post(url: &'a str, body: &'a RawResponse) -> Self {
        Self {
            body: Some(body),
            ..Self::get(url)
        }
    }

    /// Accept non-2xx replies whose JSON body satisfies `signal`.
    pub(crate) const fn no_route_signal(mut self, signal: NoRouteSignal) -> Self {
        self.no_route = signal;
        self
    }

    /// Mark the request as asking for live traffic.
    pub(crate) const fn traffic_adjusted(mut self, traffic_adjusted: bool) -> Self {
        self.traffic_adjusted = traffic_adjusted;
        self
    }
}

/// HTTP client, runtime and logging settings for one adapter.
pub(crate) struct HttpTransport {
    client: Client,
    runtime: Runtime,
    service: &'static str,
    timeout: Duration,
    verbose: bool,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("service", &self.service)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl HttpTransport {
    /// Build the client and runtime for `service`.
    pub(crate) fn new(
        service: &'static str,
        config: &BackendConfig,
    ) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            service,
            timeout: config.timeout,
            verbose: config.verbose,
        })
    }

    /// Name used in log lines.
    pub(crate) const fn service(&self) -> &'static str {
        self.service
    }

    /// Whether verbose logging is on.
    pub(crate) const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Emit a timestamped line: `info` when verbose, `debug` otherwise.
    pub(crate) fn log(&self, message: fmt::Arguments<'_>) {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        if self.verbose {
            info!("{stamp} {message}");
        } else {
            debug!("{stamp} {message}");
        }
    }

    /// Send `outbound` and return the decoded JSON body.
    ///
    /// Non-2xx replies become [`RouteError::HttpError`] unless their body is
    /// the backend's "no path" document, which is returned as-is.
    pub(crate) fn send(&self, outbound: &Outbound<'_>) -> Result<RawResponse, RouteError> {
        self.send_gated(outbound, || ())
    }

    /// Like [`send`](Self::send), but run the blocking `gate` first.
    ///
    /// The gate runs inside the same bridge as the request, so a wait on it
    /// never parks a multi-threaded runtime worker outside `block_in_place`.
    pub(crate) fn send_gated(
        &self,
        outbound: &Outbound<'_>,
        gate: impl FnOnce(),
    ) -> Result<RawResponse, RouteError> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| {
                    gate();
                    handle.block_on(self.dispatch(outbound))
                })
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => {
                gate();
                self.runtime.block_on(self.dispatch(outbound))
            }
        }
    }

    fn dispatch<'a>(
        &'a self,
        outbound: &'a Outbound<'a>,
    ) -> impl Future<Output = Result<RawResponse, RouteError>> + 'a {
        if outbound.traffic_adjusted {
            self.log(format_args!(
                "Sending live traffic-adjusted request to {}",
                self.service
            ));
        } else {
            self.log(format_args!("Sending request to {}", self.service));
        }

        let builder = match outbound.body {
            Some(body) => self.client.post(outbound.url).json(body),
            None => self.client.get(outbound.url),
        };
        self.send_async(builder, outbound)
    }

    async fn send_async(
        &self,
        builder: RequestBuilder,
        outbound: &Outbound<'_>,
    ) -> Result<RawResponse, RouteError> {
        let url = outbound.url;
        let response = builder
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        self.log(format_args!("Response: {text}"));

        let parsed = serde_json::from_str::<RawResponse>(&text);
        if status.is_success() {
            return parsed.map_err(|err| RouteError::ParseError {
                message: err.to_string(),
            });
        }
        match parsed {
            Ok(body) if (outbound.no_route)(&body) => Ok(body),
            _ => Err(RouteError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown status").to_owned()
                } else {
                    text
                },
            }),
        }
    }

    /// Convert a reqwest error to a `RouteError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RouteError {
        if error.is_timeout() {
            return RouteError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RouteError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RouteError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn transport() -> HttpTransport {
        HttpTransport::new("OSRM", &BackendConfig::default()).expect("transport should build")
    }

    #[rstest]
    fn connection_refused_is_a_network_error() {
        let transport = transport();
        // Port 9 (discard) is closed on test machines.
        let err = transport
            .send(&Outbound::get("http://127.0.0.1:9/route"))
            .expect_err("nothing listens on the discard port");
        assert!(
            matches!(err, RouteError::NetworkError { .. } | RouteError::Timeout { .. }),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn outbound_builder_records_flags() {
        let body = json!({ "costing": "auto" });
        let outbound = Outbound::post("http://localhost:8000/route", &body)
            .traffic_adjusted(true)
            .no_route_signal(|raw| raw.get("error_code").is_some());

        assert!(outbound.traffic_adjusted);
        assert!(outbound.body.is_some());
        assert!((outbound.no_route)(&json!({ "error_code": 442 })));
        assert!(!(outbound.no_route)(&json!({})));
    }

    #[rstest]
    fn debug_hides_runtime() {
        let rendered = format!("{:?}", transport());
        assert!(rendered.contains("<tokio::runtime::Runtime>"));
        assert!(rendered.contains("OSRM"));
    }
}
