//! Stateless request builder and response classifier for the AJAX backend.
//!
//! # Design
//! `ServiceClient` holds only its configuration and carries no mutable state
//! between calls. A dispatch is split into `build_request`, which produces an
//! `HttpRequest`, and `parse_response`, which turns an `HttpResponse` into an
//! `Outcome`. The round-trip in between belongs to a `Transport`, keeping
//! this half deterministic and free of I/O.

use url::Url;

use crate::config::DispatchConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::outcome::{Outcome, Payload, Success, ValidationFailure};
use crate::types::{AjaxEnvelope, ErrorBody, Request, ResponseFormat, ValidationBody};

/// Status the backend answers with when request parameters fail validation.
pub const VALIDATION_STATUS: u16 = 409;

/// Parameter the backend reads the caller's user id from.
pub const USER_ID_PARAM: &str = "userId";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct ServiceClient {
    config: DispatchConfig,
}

impl ServiceClient {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Build the HTTP request for `request`.
    ///
    /// POST parameters are form-encoded into the body, GET parameters into
    /// the query string. The returned URL is normalized and percent-encoded.
    pub fn build_request(&self, request: &Request) -> Result<HttpRequest, TransportError> {
        let endpoint = request.endpoint.trim();
        if endpoint.is_empty() {
            return Err(TransportError::InvalidRequest("endpoint is empty".to_string()));
        }

        let mut target = self.resolve(endpoint)?;

        let mut params = request.params.clone();
        if let Some(user_id) = &self.config.user_id {
            if !params.contains_key(USER_ID_PARAM) {
                params.insert(USER_ID_PARAM, user_id);
            }
        }

        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("x-requested-with".to_string(), "XMLHttpRequest".to_string()),
        ];

        let body = match request.method {
            HttpMethod::Get => {
                if !params.is_empty() {
                    target.query_pairs_mut().extend_pairs(params.iter());
                }
                None
            }
            HttpMethod::Post => {
                headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
                Some(
                    url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(params.iter())
                        .finish(),
                )
            }
        };

        Ok(HttpRequest {
            method: request.method,
            url: target.into(),
            headers,
            body,
        })
    }

    /// Absolute `http(s)` endpoints stand alone; anything relative is joined
    /// under the base URL, keeping any path prefix the base carries.
    fn resolve(&self, endpoint: &str) -> Result<Url, TransportError> {
        let invalid = |e: url::ParseError| TransportError::InvalidRequest(format!("{endpoint}: {e}"));
        match Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            Ok(url) => Err(TransportError::InvalidRequest(format!(
                "{endpoint}: unsupported scheme {:?}",
                url.scheme()
            ))),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(&format!("{}/", self.config.base_url)).map_err(invalid)?;
                base.join(endpoint.trim_start_matches('/')).map_err(invalid)
            }
            Err(e) => Err(invalid(e)),
        }
    }

    /// Classify a response into exactly one outcome.
    pub fn parse_response(&self, format: ResponseFormat, response: HttpResponse) -> Outcome {
        if response.is_success() {
            return match format {
                ResponseFormat::Envelope => parse_envelope(&response),
                ResponseFormat::Raw => parse_raw(response),
            };
        }
        if response.status == VALIDATION_STATUS {
            return parse_validation(&response);
        }
        Outcome::TransportError(server_error(&response))
    }
}

fn parse_envelope(response: &HttpResponse) -> Outcome {
    let envelope: AjaxEnvelope = match serde_json::from_str(&response.body) {
        Ok(envelope) => envelope,
        Err(e) => return Outcome::TransportError(TransportError::Malformed(format!("expected ajax envelope: {e}"))),
    };

    if envelope.result == 0 {
        return Outcome::Success(Success {
            code: envelope.result,
            message: envelope.result_string,
            payload: Payload::from_json(envelope.result_object),
        });
    }

    let message = if envelope.result_string.is_empty() {
        format!("request rejected with result code {}", envelope.result)
    } else {
        envelope.result_string
    };
    Outcome::ValidationFailure(ValidationFailure::from_errors(vec![message]))
}

fn parse_raw(response: HttpResponse) -> Outcome {
    let payload = if response.is_text() {
        Payload::Markup(response.body)
    } else if response.body.trim().is_empty() {
        Payload::Json(serde_json::Value::Null)
    } else {
        match serde_json::from_str(&response.body) {
            Ok(value) => Payload::Json(value),
            Err(e) => return Outcome::TransportError(TransportError::Malformed(format!("expected json: {e}"))),
        }
    };
    Outcome::Success(Success {
        code: 0,
        message: String::new(),
        payload,
    })
}

fn parse_validation(response: &HttpResponse) -> Outcome {
    match serde_json::from_str::<ValidationBody>(&response.body) {
        Ok(body) if body.errors.is_empty() => Outcome::ValidationFailure(ValidationFailure::from_errors(vec![
            "request failed validation".to_string(),
        ])),
        Ok(body) => Outcome::ValidationFailure(ValidationFailure::from_errors(body.errors)),
        Err(e) => Outcome::TransportError(TransportError::Malformed(format!("expected validation errors: {e}"))),
    }
}

/// Prefer the server's `error` field, then the raw body, then the status text.
fn server_error(response: &HttpResponse) -> TransportError {
    let message = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => body.error,
        Err(_) if !response.body.trim().is_empty() => response.body.trim().to_string(),
        Err(_) => ureq::http::StatusCode::from_u16(response.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unexpected status")
            .to_string(),
    };
    TransportError::Server {
        status: response.status,
        message,
    }
}
