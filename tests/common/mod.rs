//! Shared test utilities for running against a local echo server.
//!
//! The server answers a handful of fixed routes and echoes back what it
//! received on `/echo`, so the tests never depend on the public internet.

#![allow(dead_code)]

use std::{
    io::{Cursor, Read},
    thread,
};

use once_cell::sync::OnceCell;
use serde_json::json;
use tiny_http::{Header, Request, Response, Server, StatusCode};

#[derive(Debug)]
pub struct TestServer {
    base: String,
    // Keep the thread alive for the duration of the tests.
    _thread: thread::JoinHandle<()>,
}

/// Return the base URL for the local test server.
pub fn base() -> String {
    test_server().base.clone()
}

/// Build a full URL against the local test server.
pub fn uri(path: &str) -> String {
    format!("{}/{}", base(), path.trim_start_matches('/'))
}

pub fn test_server() -> &'static TestServer {
    static INSTANCE: OnceCell<TestServer> = OnceCell::new();
    INSTANCE.get_or_init(TestServer::start)
}

impl TestServer {
    fn start() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let server = Server::http("127.0.0.1:0").expect("start test server");
        let base = format!("http://{}", server.server_addr());
        let thread = thread::spawn(move || run_server(&server));

        Self {
            base,
            _thread: thread,
        }
    }
}

fn run_server(server: &Server) {
    for mut request in server.incoming_requests() {
        let response = handle_request(&mut request);
        let _ = request.respond(response);
    }
}

fn handle_request(request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or_default().to_string();

    match path.as_str() {
        "/echo" => echo(request),
        "/text" => text_response(StatusCode(200), "hello from the test server"),
        "/json" => json_response(StatusCode(200), r#"{"name":"unirest","version":1}"#),
        "/html" => text_response(StatusCode(200), "<html><body>not json</body></html>"),
        "/bytes" => bytes_response(StatusCode(200), vec![0u8, 1, 2, 253, 254, 255]),
        "/latin1" => bytes_response(StatusCode(200), b"caf\xe9".to_vec()).with_header(
            Header::from_bytes("Content-Type", "text/plain; charset=iso-8859-1").unwrap(),
        ),
        _ => {
            if let Some(code) = path.strip_prefix("/status/") {
                let status = code.parse::<u16>().unwrap_or(400);
                if status == 204 {
                    return bytes_response(StatusCode(status), Vec::new());
                }
                return text_response(StatusCode(status), format!("status {status}"));
            }
            text_response(StatusCode(404), format!("no route for {path}"))
        }
    }
}

/// Reply with the method, URL, selected headers and body that were received.
fn echo(request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let mut raw = Vec::new();
    let _ = request.as_reader().read_to_end(&mut raw);
    let body = String::from_utf8_lossy(&raw).into_owned();
    let echoed = json!({
        "method": request.method().to_string(),
        "url": request.url(),
        "content_type": header_value(request, "content-type"),
        "user_agent": header_value(request, "user-agent"),
        "authorization": header_value(request, "authorization"),
        "x_test": header_value(request, "x-test"),
        "body": body,
    });
    json_response(StatusCode(200), &echoed.to_string())
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.to_string().eq_ignore_ascii_case(name))
        .map(|header| String::from_utf8_lossy(header.value.as_ref()).into_owned())
}

fn json_response(status: StatusCode, body: &str) -> Response<Cursor<Vec<u8>>> {
    let content_type = Header::from_bytes("Content-Type", "application/json").unwrap();
    Response::from_data(body.as_bytes().to_vec())
        .with_status_code(status)
        .with_header(content_type)
}

fn text_response(status: StatusCode, body: impl Into<String>) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body.into()).with_status_code(status)
}

fn bytes_response(status: StatusCode, body: impl Into<Vec<u8>>) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(body.into()).with_status_code(status)
}
