//! The I/O seam between building a request and classifying its response.
//!
//! # Design
//! `Transport` is the only place a dispatch touches the network. The
//! production implementation wraps a blocking `ureq` agent and runs each
//! round-trip on the runtime's blocking pool, so the task that issued the
//! dispatch is never blocked. Tests substitute their own transport.

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Any response the server produced, whatever its status, is `Ok`; `Err` is
/// reserved for failures that left no response to classify, or a body that
/// could not be decoded as text.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `ureq`-backed transport.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// Builds an agent that returns 4xx/5xx responses as data rather than
    /// `Err`, leaving status interpretation to `ServiceClient`.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a preconfigured agent. It must not treat HTTP status codes as
    /// errors, or validation responses will surface as network failures.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let agent = self.agent.clone();
        async move {
            tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
                .await
                .map_err(|e| TransportError::Network(format!("transport task failed: {e}")))?
        }
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let result = match request.method {
        HttpMethod::Get => request
            .headers
            .iter()
            .fold(agent.get(&request.url), |builder, (k, v)| builder.header(k.as_str(), v.as_str()))
            .call(),
        HttpMethod::Post => request
            .headers
            .iter()
            .fold(agent.post(&request.url), |builder, (k, v)| builder.header(k.as_str(), v.as_str()))
            .send(request.body.as_deref().unwrap_or("").as_bytes()),
    };
    let mut response = result.map_err(|e| TransportError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| TransportError::Network(format!("failed to read response body: {e}")))?;

    Ok(HttpResponse {
        status,
        headers,
        body: decode_body(bytes)?,
    })
}

fn decode_body(bytes: Vec<u8>) -> Result<String, TransportError> {
    String::from_utf8(bytes).map_err(|e| TransportError::Malformed(format!("response body is not valid utf-8: {e}")))
}
