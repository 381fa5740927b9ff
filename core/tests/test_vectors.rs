//! Verify the wire encoder against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names a host, port, numeric method, resource and optional body,
//! and either the exact bytes expected on the wire or the error the request
//! must fail with. Numeric methods go through `HttpMethod::try_from`, the
//! same path untyped callers use.

use restclient_core::{encode_request, ClientError, HttpMethod, HttpRequest};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct VectorFile {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    host: String,
    port: u16,
    method: i32,
    resource: String,
    body: Option<String>,
    expected_wire: Option<String>,
    expected_error: Option<String>,
}

fn encode_case(case: &Case) -> Result<Vec<u8>, ClientError> {
    let method = HttpMethod::try_from(case.method)?;
    let request = HttpRequest::new(method, &case.resource, case.body.as_deref());
    encode_request(&case.host, case.port, &request)
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: VectorFile = serde_json::from_str(raw).unwrap();
    assert!(!vectors.cases.is_empty());

    for case in &vectors.cases {
        let name = &case.name;
        let result = encode_case(case);

        match (&case.expected_wire, &case.expected_error) {
            (Some(wire), None) => {
                let bytes = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
                assert_eq!(String::from_utf8(bytes).unwrap(), *wire, "{name}: wire bytes");
            }
            (None, Some(expected)) => {
                let err = result.expect_err(name);
                match expected.as_str() {
                    "UnsupportedMethod" => {
                        assert!(matches!(err, ClientError::UnsupportedMethod), "{name}: {err}")
                    }
                    "MethodOutOfRange" => {
                        assert!(matches!(err, ClientError::MethodOutOfRange(_)), "{name}: {err}")
                    }
                    "MissingBody" => {
                        assert!(matches!(err, ClientError::MissingBody(_)), "{name}: {err}")
                    }
                    other => panic!("{name}: unknown expected_error: {other}"),
                }
            }
            _ => panic!("{name}: case needs exactly one of expected_wire or expected_error"),
        }
    }
}

#[test]
fn bodiless_requests_have_one_host_line_and_end_blank() {
    for method in [HttpMethod::Get, HttpMethod::Delete] {
        for resource in ["/", "/slideruns", "/slideruns/416/laps"] {
            let request = HttpRequest::new(method, resource, None);
            let bytes = encode_request("stnapi", 8360, &request).unwrap();
            let wire = String::from_utf8(bytes).unwrap();

            assert!(wire.starts_with(&format!("{method} {resource} HTTP/1.1\r\n")));
            assert_eq!(wire.matches("Host:").count(), 1);
            assert!(!wire.contains("Content-Length"));
            assert!(wire.ends_with("\r\n\r\n"));
        }
    }
}

#[test]
fn content_length_is_byte_length_not_char_count() {
    for method in [HttpMethod::Post, HttpMethod::Put] {
        let body = r#"{"name":"café ☕"}"#;
        assert_ne!(body.len(), body.chars().count());

        let request = HttpRequest::new(method, "/menu", Some(body));
        let bytes = encode_request("stnapi", 8360, &request).unwrap();
        let wire = String::from_utf8(bytes).unwrap();

        assert!(wire.contains(&format!("Content-Length: {}\r\n", body.len())));
    }
}
