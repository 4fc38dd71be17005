//! Asynchronous request dispatch with three-way outcome handlers.
//!
//! # Design
//! A dispatch is one spawned task: build the request, run it through the
//! `Transport`, classify the response, then hand the outcome to exactly one
//! handler. Handlers are `FnOnce` and consumed by `Handlers::resolve`, so a
//! second invocation cannot be expressed. Dispatches share nothing but the
//! immutable client and transport; completions arrive in network order.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::client::ServiceClient;
use crate::config::DispatchConfig;
use crate::error::TransportError;
use crate::outcome::{Outcome, Success, ValidationFailure};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Params, Request};

type Handler<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// The three caller-supplied outcome handlers of one dispatch.
pub struct Handlers {
    on_success: Handler<Success>,
    on_validation_failure: Handler<ValidationFailure>,
    on_error: Handler<TransportError>,
}

impl Handlers {
    pub fn new<S, V, E>(on_success: S, on_validation_failure: V, on_error: E) -> Self
    where
        S: FnOnce(Success) + Send + 'static,
        V: FnOnce(ValidationFailure) + Send + 'static,
        E: FnOnce(TransportError) + Send + 'static,
    {
        Self {
            on_success: Box::new(on_success),
            on_validation_failure: Box::new(on_validation_failure),
            on_error: Box::new(on_error),
        }
    }

    /// Invoke the handler matching `outcome` and drop the other two.
    pub fn resolve(self, outcome: Outcome) {
        match outcome {
            Outcome::Success(success) => (self.on_success)(success),
            Outcome::ValidationFailure(failure) => (self.on_validation_failure)(failure),
            Outcome::TransportError(err) => (self.on_error)(err),
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}

/// Sends requests to the backend and routes each outcome to its handler.
///
/// Cloning is cheap; clones share the transport.
pub struct RequestDispatcher<T: Transport = UreqTransport> {
    client: ServiceClient,
    transport: Arc<T>,
}

impl<T: Transport> Clone for RequestDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> fmt::Debug for RequestDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl RequestDispatcher<UreqTransport> {
    pub fn from_config(config: DispatchConfig) -> Self {
        Self::new(ServiceClient::new(config), UreqTransport::new())
    }
}

impl<T: Transport> RequestDispatcher<T> {
    pub fn new(client: ServiceClient, transport: T) -> Self {
        Self {
            client,
            transport: Arc::new(transport),
        }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Run one request to completion and return its outcome.
    pub async fn send(&self, request: &Request) -> Outcome {
        let http_request = match self.client.build_request(request) {
            Ok(http_request) => http_request,
            Err(err) => {
                warn!("dispatch to {:?} not sent: {err}", request.endpoint);
                return err.into();
            }
        };

        debug!("dispatching {} {}", http_request.method, http_request.url);
        let outcome = match self.transport.execute(http_request).await {
            Ok(response) => self.client.parse_response(request.format, response),
            Err(err) => Outcome::TransportError(err),
        };

        match &outcome {
            Outcome::TransportError(err) => warn!("dispatch to {} failed: {err}", request.endpoint),
            other => debug!("dispatch to {} resolved: {}", request.endpoint, other.kind()),
        }
        outcome
    }

    /// POST `params` to `endpoint`, expecting the AJAX envelope.
    ///
    /// Returns immediately; the matching handler runs once the response has
    /// been classified. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, endpoint: impl Into<String>, params: Params, handlers: Handlers) -> JoinHandle<()> {
        self.dispatch_request(Request::post(endpoint).params(params), handlers)
    }

    /// POST `params` to `endpoint`, taking the whole body as the payload.
    pub fn dispatch_raw(&self, endpoint: impl Into<String>, params: Params, handlers: Handlers) -> JoinHandle<()> {
        self.dispatch_request(Request::post(endpoint).params(params).raw(), handlers)
    }

    /// Dispatch an arbitrary request. A panic while sending is reported to
    /// `on_error`, so exactly one handler always runs.
    pub fn dispatch_request(&self, request: Request, handlers: Handlers) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let endpoint = request.endpoint.clone();
            let sending = tokio::spawn(async move { dispatcher.send(&request).await });
            let outcome = sending.await.unwrap_or_else(|e| {
                warn!("dispatch to {endpoint} aborted: {e}");
                TransportError::Network(format!("dispatch task failed: {e}")).into()
            });
            handlers.resolve(outcome);
        })
    }
}
