//! Data-access tests against a one-shot local HTTP server.

use std::{
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    sync::mpsc,
    thread,
};

use celula_map::{CelulaSource, Config, Dashboard, Error, LoadState, SupabaseClient};

/// Serve exactly one request, answering with `status` and `body`.
/// Returns the base URL and a channel yielding the request head.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
        tx.send(head).unwrap();
    });

    (format!("http://{addr}"), rx)
}

#[test]
fn selects_all_rows_with_public_key() {
    let (url, head) = serve_once(
        "200 OK",
        r#"[{"lat":"-15.6","lng":"-56.1","nome_lider":"Ana","bairro":"Centro"},
            {"lat":"x","lng":"-56.1"}]"#,
    );
    let client = SupabaseClient::new(Config::new(&url, "anon-key").unwrap());

    let rows = client.fetch_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].nome_lider.as_deref(), Some("Ana"));

    let head = head.recv().unwrap();
    assert!(head.starts_with("GET /rest/v1/celulas?select=* HTTP/1.1"), "{head}");
    let lower = head.to_lowercase();
    assert!(lower.contains("apikey: anon-key"));
    assert!(lower.contains("authorization: bearer anon-key"));
}

#[test]
fn error_status_is_reported() {
    let (url, _head) = serve_once("401 Unauthorized", r#"{"message":"Invalid API key"}"#);
    let client = SupabaseClient::new(Config::new(&url, "bad").unwrap());

    match client.fetch_rows() {
        Err(Error::Status { code, body, .. }) => {
            assert_eq!(code, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (url, _head) = serve_once("200 OK", r#"{"not":"an array"}"#);
    let client = SupabaseClient::new(Config::new(&url, "anon-key").unwrap());
    assert!(matches!(client.fetch_rows(), Err(Error::Json { .. })));
}

#[test]
fn dashboard_survives_service_failure() {
    let (url, _head) = serve_once("500 Internal Server Error", "{}");
    let client = SupabaseClient::new(Config::new(&url, "anon-key").unwrap());

    let mut d = Dashboard::new();
    d.load(&client);
    assert_eq!(d.state(), LoadState::Ready);
    assert!(d.points().is_empty());
}

#[test]
fn custom_table_name_is_used() {
    let (url, head) = serve_once("200 OK", "[]");
    let cfg = Config::new(&url, "anon-key").unwrap().with_table("grupos");
    let client = SupabaseClient::new(cfg);
    assert!(client.fetch_rows().unwrap().is_empty());
    assert!(head.recv().unwrap().starts_with("GET /rest/v1/grupos?select=*"));
}
