//! Tests for request bodies as received by a server
#![cfg(feature = "curl-backend")]

use std::io::{Seek, SeekFrom, Write};

mod common;
use common::uri;
use serde_json::{Value, json};
use unirest::{Client, Error, FieldValue, client};

fn echo(request: &unirest::Request<unirest::DefaultBackend>) -> Value {
    request.as_json::<Value>().unwrap().into_body()
}

#[test]
fn test_url_encoded_fields() {
    let mut request = client().post(uri("/echo")).unwrap();
    request
        .with_field("a", "b")
        .unwrap()
        .with_field("c", "d e")
        .unwrap();

    let echoed = echo(&request);
    assert_eq!(echoed["content_type"], "application/x-www-form-urlencoded");
    assert_eq!(echoed["body"], "a=b&c=d+e");
}

#[test]
fn test_multipart_fields() {
    let mut request = client().put(uri("/echo")).unwrap();
    request
        .with_fields([
            ("key", FieldValue::from("value")),
            ("key2", FieldValue::from("value2")),
            ("key3", FieldValue::from(b"stream content".to_vec())),
        ])
        .unwrap();

    let echoed = echo(&request);
    let content_type = echoed["content_type"].as_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let boundary = content_type.split("boundary=").nth(1).unwrap();

    let body = echoed["body"].as_str().unwrap();
    assert!(body.starts_with(&format!("--{boundary}\r\n")));
    assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    assert_eq!(body.matches("name=\"key\"").count(), 1);
    assert_eq!(body.matches("name=\"key2\"").count(), 1);
    assert!(body.contains("stream content"));
}

#[test]
fn test_file_backed_stream_field() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"uploaded from disk").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let mut request = client().patch(uri("/echo")).unwrap();
    request.with_stream_field(file).unwrap();

    let echoed = echo(&request);
    assert!(echoed["body"].as_str().unwrap().contains("uploaded from disk"));
    assert!(
        echoed["content_type"]
            .as_str()
            .unwrap()
            .starts_with("multipart/form-data")
    );
}

#[test]
fn test_text_body() {
    let mut request = client().delete(uri("/echo")).unwrap();
    request.with_body("test").unwrap();

    let echoed = echo(&request);
    assert_eq!(echoed["method"], "DELETE");
    assert_eq!(echoed["content_type"], "text/plain; charset=utf-8");
    assert_eq!(echoed["body"], "test");
}

#[test]
fn test_json_body() {
    let mut request = client().post(uri("/echo")).unwrap();
    request.with_json_body(&json!({ "ids": [1, 2, 3] })).unwrap();

    let echoed = echo(&request);
    assert_eq!(echoed["content_type"], "application/json");
    let sent: Value = serde_json::from_str(echoed["body"].as_str().unwrap()).unwrap();
    assert_eq!(sent, json!({ "ids": [1, 2, 3] }));
}

#[test]
fn test_get_never_sends_a_body() {
    let mut request = client().get(uri("/echo")).unwrap();
    assert!(matches!(
        request.with_body("test"),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        request.with_field("a", "b"),
        Err(Error::InvalidOperation(_))
    ));

    let echoed = echo(&request);
    assert_eq!(echoed["body"], "");
    assert_eq!(echoed["content_type"], Value::Null);
}
