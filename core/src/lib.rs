//! Client-side AJAX request dispatcher.
//!
//! # Overview
//! Sends one HTTP request per dispatch to a backend that speaks the AJAX
//! envelope contract, classifies the response, and invokes exactly one of
//! three caller-supplied handlers: success, validation failure, or
//! transport error.
//!
//! # Design
//! - `ServiceClient` is stateless: `build_request` produces an `HttpRequest`
//!   and `parse_response` turns an `HttpResponse` into an `Outcome`, so the
//!   I/O boundary is explicit and both halves are testable without a network.
//! - `Transport` executes the round-trip; `UreqTransport` is the default.
//! - `RequestDispatcher` ties the two together on a Tokio runtime. Each
//!   dispatch is an independent task; nothing is shared between dispatches.
//! - Wire DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod outcome;
pub mod transport;
pub mod types;

pub use client::{ServiceClient, USER_ID_PARAM, VALIDATION_STATUS};
pub use config::DispatchConfig;
pub use dispatcher::{Handlers, RequestDispatcher};
pub use error::{ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::{Outcome, Payload, Success, ValidationFailure};
pub use transport::{Transport, UreqTransport};
pub use types::{AjaxEnvelope, ErrorBody, Params, Request, ResponseFormat, ValidationBody};
