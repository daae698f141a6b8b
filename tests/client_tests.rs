//! End-to-end tests for the verb entry points and blocking executors
#![cfg(feature = "curl-backend")]

mod common;
use common::uri;
use serde_json::Value;
use unirest::{Binary, Client, Verb, client};

#[test]
fn test_every_verb_reaches_the_server() {
    for verb in Verb::ALL {
        let request = client().method(verb, uri("/echo")).unwrap();
        let response = request.as_json::<Value>().unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.body()["method"], verb.as_str());
        assert_eq!(response.body()["url"], "/echo");
    }
}

#[test]
fn test_convenience_functions() {
    let response = unirest::get(uri("/text")).unwrap().as_string().unwrap();
    assert_eq!(response.body(), "hello from the test server");

    for request in [
        unirest::post(uri("/echo")).unwrap(),
        unirest::put(uri("/echo")).unwrap(),
        unirest::patch(uri("/echo")).unwrap(),
        unirest::delete(uri("/echo")).unwrap(),
    ] {
        let response = request.as_json::<Value>().unwrap();
        assert_eq!(response.body()["method"], request.method().as_str());
    }
}

#[test]
fn test_as_string() {
    let response = client().get(uri("/text")).unwrap().as_string().unwrap();
    assert!(response.status().is_success());
    assert!(!response.body().is_empty());
    assert_eq!(response.raw_response().body(), b"hello from the test server");
}

#[test]
fn test_as_string_honours_charset() {
    let response = client().get(uri("/latin1")).unwrap().as_string().unwrap();
    assert_eq!(response.body(), "café");
}

#[test]
fn test_as_binary() {
    let response = client().get(uri("/bytes")).unwrap().as_binary().unwrap();
    let binary: Binary = response.into_body();
    assert_eq!(binary.len(), 6);
    assert_eq!(binary.into_inner(), vec![0, 1, 2, 253, 254, 255]);
}

#[test]
fn test_as_json() {
    #[derive(Debug, serde::Deserialize)]
    struct Info {
        name: String,
        version: u32,
    }

    let response = client().get(uri("/json")).unwrap().as_json::<Info>().unwrap();
    assert_eq!(response.body().name, "unirest");
    assert_eq!(response.body().version, 1);
    assert_eq!(response.headers()["content-type"], "application/json");
}

#[test]
fn test_headers_are_sent() {
    let mut request = client().get(uri("/echo")).unwrap();
    request
        .with_header("X-Test", "value")
        .unwrap()
        .with_headers([("User-Agent", "unirest-tests/1.0")])
        .unwrap()
        .with_bearer_auth("secret")
        .unwrap();

    let echoed = request.as_json::<Value>().unwrap().into_body();
    assert_eq!(echoed["x_test"], "value");
    assert_eq!(echoed["user_agent"], "unirest-tests/1.0");
    assert_eq!(echoed["authorization"], "Bearer secret");
}

#[test]
fn test_default_user_agent() {
    let echoed = client()
        .get(uri("/echo"))
        .unwrap()
        .as_json::<Value>()
        .unwrap()
        .into_body();
    assert_eq!(echoed["user_agent"], unirest::DEFAULT_USER_AGENT);
}

#[test]
fn test_query_pairs() {
    let mut request = client().get(uri("/echo")).unwrap();
    request.with_query("page", "2");
    let echoed = request.as_json::<Value>().unwrap().into_body();
    assert_eq!(echoed["url"], "/echo?page=2");
}
