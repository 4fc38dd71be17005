//! Verify request building and response classification against the JSON
//! vectors stored in `test-vectors/`.
//!
//! Request bodies are compared as strings because parameter encoding is
//! deterministic (key order); parsed payloads are compared as JSON values.

use dispatch_core::{
    DispatchConfig, HttpMethod, HttpResponse, Outcome, Params, Payload, Request, ResponseFormat, ServiceClient,
    TransportError,
};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_format(s: &str) -> ResponseFormat {
    match s {
        "envelope" => ResponseFormat::Envelope,
        "raw" => ResponseFormat::Raw,
        other => panic!("unknown format: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let client = ServiceClient::new(DispatchConfig::new(vectors["base_url"].as_str().unwrap()).unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["request"];
        let params: Params = input["params"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
            .collect();
        let request = Request::new(
            parse_method(input["method"].as_str().unwrap()),
            input["endpoint"].as_str().unwrap(),
        )
        .params(params);

        let built = client.build_request(&request);
        if let Some(kind) = case.get("expected_error") {
            assert_eq!(kind, "invalid_request", "{name}: unknown expected_error");
            assert!(
                matches!(built, Err(TransportError::InvalidRequest(_))),
                "{name}: expected invalid request, got {built:?}"
            );
            continue;
        }

        let built = built.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected"];
        assert_eq!(built.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(built.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(built.body.as_deref(), expected["body"].as_str(), "{name}: body");

        let content_type = built
            .headers
            .iter()
            .find(|(k, _)| k == "content-type")
            .map(|(_, v)| v.as_str());
        assert_eq!(content_type, expected["content_type"].as_str(), "{name}: content-type");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let client = ServiceClient::new(DispatchConfig::default());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let mut response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        if let Some(ct) = sim["content_type"].as_str() {
            response = response.with_header("content-type", ct);
        }

        let outcome = client.parse_response(parse_format(case["format"].as_str().unwrap()), response);
        let expected = &case["expected"];
        assert_eq!(outcome.kind(), expected["kind"].as_str().unwrap(), "{name}: kind ({outcome:?})");

        match &outcome {
            Outcome::Success(success) => {
                assert_eq!(success.message, expected["message"].as_str().unwrap(), "{name}: message");
                if let Some(markup) = expected.get("markup") {
                    assert_eq!(success.payload, Payload::Markup(markup.as_str().unwrap().to_string()), "{name}");
                } else {
                    assert_eq!(success.payload, Payload::Json(expected["json"].clone()), "{name}");
                }
            }
            Outcome::ValidationFailure(failure) => {
                assert_eq!(failure.message, expected["message"].as_str().unwrap(), "{name}: message");
            }
            Outcome::TransportError(err) => {
                match expected["error"].as_str().unwrap() {
                    "malformed" => assert!(matches!(err, TransportError::Malformed(_)), "{name}: {err:?}"),
                    "server" => {
                        assert_eq!(err.status(), expected["status"].as_u64().map(|s| s as u16), "{name}: status");
                        assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
                    }
                    other => panic!("{name}: unknown error kind {other}"),
                }
            }
        }
    }
}
