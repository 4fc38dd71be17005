//! Request descriptions and the backend's JSON wire shapes.
//!
//! # Design
//! `Params` keeps its entries in a `BTreeMap` so encoded requests come out in
//! key order regardless of insertion order. The wire DTOs mirror the mock
//! server's bodies but are defined independently; integration tests catch any
//! drift between the two crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// Request parameters. Values are coerced to strings on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.insert(key.into(), value.to_string());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// How a successful response body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// The body is an `AjaxEnvelope`; its `ResultObject` is the payload.
    #[default]
    Envelope,
    /// The body itself is the payload: JSON, or markup for `text/*` responses.
    Raw,
}

/// One call into the backend, before it is turned into an `HttpRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub endpoint: String,
    pub method: HttpMethod,
    pub params: Params,
    pub format: ResponseFormat,
}

impl Request {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            params: Params::new(),
            format: ResponseFormat::Envelope,
        }
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn raw(self) -> Self {
        self.format(ResponseFormat::Raw)
    }
}

/// Standard AJAX result wrapper. A `result` of zero means success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AjaxEnvelope {
    #[serde(rename = "Result")]
    pub result: i64,
    #[serde(rename = "ResultString", default)]
    pub result_string: String,
    #[serde(rename = "ResultObject", default)]
    pub result_object: serde_json::Value,
}

/// Body of a validation rejection (HTTP 409).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationBody {
    pub errors: Vec<String>,
}

/// Body of a server failure (HTTP 500 and friends).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
