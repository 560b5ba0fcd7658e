//! HTTP wrapper tests against a minimal in-process stub server. The stub
//! reads one full request (headers plus declared body) and answers with a
//! canned status line, which is all the wrapper's contract depends on.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use notifdiag_cli::api::ApiClient;
use notifdiag_cli::config::Config;

fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    // Headers first.
    let header_end = loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            return String::from_utf8_lossy(&raw).into_owned();
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    // Then any declared body.
    let headers = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    while raw.len() < header_end + content_length {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&raw).into_owned()
}

/// Serve every incoming request with the given status line, forwarding
/// each raw request over a channel for assertions.
fn stub_server(status_line: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (seen_tx, seen_rx) = mpsc::channel();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let request = read_request(&mut stream);
            let _ = seen_tx.send(request);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    (format!("http://{}", addr), seen_rx)
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&Config {
        base_url: base_url.to_string(),
        user_id: "test-user".to_string(),
        token: None,
    })
    .unwrap()
}

#[test]
fn check_health_true_on_200() {
    let (base, seen) = stub_server("200 OK");
    let api = client_for(&base);
    assert!(api.check_health());
    let request = seen.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(request.starts_with("GET /health "));
}

#[test]
fn check_health_false_on_non_200() {
    let (base, _seen) = stub_server("503 Service Unavailable");
    let api = client_for(&base);
    assert!(!api.check_health());
}

#[test]
fn check_health_false_when_unreachable() {
    // Bind then drop to get a port with nothing listening.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = client_for(&format!("http://127.0.0.1:{}", port));
    assert!(!api.check_health());
}

#[test]
fn send_notification_posts_configured_body() {
    let (base, seen) = stub_server("200 OK");
    let api = client_for(&base);
    assert!(api.send_notification("Bienvenue", "Vous êtes connecté!", "welcome"));
    let request = seen.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(request.starts_with("POST /api/notifications/send "));
    assert!(request.contains("\"userId\":\"test-user\""));
    assert!(request.contains("\"titre\":\"Bienvenue\""));
    assert!(request.contains("\"type\":\"welcome\""));
}

#[test]
fn send_notification_reports_500_without_panicking() {
    let (base, _seen) = stub_server("500 Internal Server Error");
    let api = client_for(&base);
    assert!(!api.send_notification("Bienvenue", "Vous êtes connecté!", "welcome"));
}
