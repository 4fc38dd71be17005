//! The three terminal shapes of a dispatch.

use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// What a successful response carried.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Preformatted markup, ready to be injected into the page.
    Markup(String),
    /// A parsed JSON document.
    Json(serde_json::Value),
}

impl Payload {
    /// Envelope payloads that are JSON strings are markup fragments.
    pub(crate) fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Payload::Markup(s),
            other => Payload::Json(other),
        }
    }

    pub fn as_markup(&self) -> Option<&str> {
        match self {
            Payload::Markup(s) => Some(s),
            Payload::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Markup(_) => None,
        }
    }

    /// Field of a JSON object payload.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.as_json().and_then(|v| v.get(key))
    }

    /// Decode a JSON payload into a typed value. Markup decodes as a JSON
    /// string.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Payload::Json(v) => T::deserialize(v),
            Payload::Markup(s) => T::deserialize(serde_json::Value::String(s.clone())),
        }
    }
}

/// A response the server accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    /// Envelope result code; always zero for an accepted envelope and for raw
    /// responses.
    pub code: i64,
    /// Envelope result string, empty for raw responses.
    pub message: String,
    pub payload: Payload,
}

/// A request the server rejected as semantically invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    /// Individual server messages `message` was joined from.
    pub errors: Vec<String>,
}

impl ValidationFailure {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            message: errors.join("\n"),
            errors,
        }
    }
}

/// Resolved state of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Success),
    ValidationFailure(ValidationFailure),
    TransportError(TransportError),
}

impl Outcome {
    /// Human-readable text for the outcome, what a call site would display.
    pub fn result_string(&self) -> String {
        match self {
            Outcome::Success(s) => s.message.clone(),
            Outcome::ValidationFailure(v) => v.message.clone(),
            Outcome::TransportError(e) => e.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::ValidationFailure(_) => "validation_failure",
            Outcome::TransportError(_) => "transport_error",
        }
    }
}

impl From<TransportError> for Outcome {
    fn from(err: TransportError) -> Self {
        Outcome::TransportError(err)
    }
}
