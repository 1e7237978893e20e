#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use price_watch::alerts::{Notifier, PriceAlert};
use price_watch::api::PageFetcher;
use price_watch::{Result, WatchError};

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {}: {}", path.display(), e))
}

/// The happy-path listing with its price replaced.
pub fn listing_with_price(price: &str) -> String {
    fixture("listing_ok.html").replace(r#"content="0.25""#, &format!(r#"content="{}""#, price))
}

/// Serves fixed markup, or fails like an unreachable host.
pub struct StaticPageFetcher {
    page: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticPageFetcher {
    pub fn serving(html: String) -> Self {
        Self { page: Some(html), calls: Mutex::new(Vec::new()) }
    }

    pub fn unreachable() -> Self {
        Self { page: None, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.page
            .clone()
            .ok_or_else(|| WatchError::Network("connection refused".into()))
    }

    fn strategy_name(&self) -> &'static str {
        "static"
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum Delivery {
    Succeed,
    Fail,
    Unconfigured,
}

/// Records every alert it is asked to deliver.
pub struct RecordingNotifier {
    delivery: Delivery,
    pub sent: Mutex<Vec<PriceAlert>>,
}

impl RecordingNotifier {
    pub fn new(delivery: Delivery) -> Self {
        Self { delivery, sent: Mutex::new(Vec::new()) }
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, alert: &PriceAlert) -> Result<()> {
        self.sent.lock().unwrap().push(alert.clone());
        match self.delivery {
            Delivery::Succeed => Ok(()),
            Delivery::Fail => Err(WatchError::WebhookStatus { status: 500, body: "boom".into() }),
            Delivery::Unconfigured => Err(WatchError::WebhookNotConfigured),
        }
    }
}

pub fn write_state(path: &Path, ts: DateTime<Utc>) {
    std::fs::write(path, price_watch::alerts::format_timestamp(ts)).unwrap();
}

#[derive(Debug)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Accept one HTTP/1.1 request on a loopback port and answer it with the
/// given status and body. Returns the base URL and a handle yielding the
/// request that was received.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response_body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let end = (header_end + content_length).min(buf.len());
        let body = String::from_utf8_lossy(&buf[header_end..end]).to_string();

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason_phrase(status),
            response_body.len(),
            response_body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        CapturedRequest { head, body }
    });

    (format!("http://{}", addr), handle)
}

/// Accept a connection and never answer it.
pub async fn serve_silence() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    });

    (format!("http://{}", addr), handle)
}

pub const WEBDRIVER_SESSION_ID: &str = "stub-session";

/// A minimal WebDriver endpoint on loopback. It grants a session on
/// `POST /session`, acknowledges `DELETE /session/{id}` and fails every
/// other command, so navigation never succeeds. Each request is recorded
/// as "METHOD /path".
pub async fn serve_webdriver() -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(answer_webdriver(socket, log.clone()));
        }
    });

    (format!("http://{}", addr), requests)
}

async fn answer_webdriver(mut socket: TcpStream, log: Arc<Mutex<Vec<String>>>) {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let header_end = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }
        buf.drain(..header_end + content_length);

        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        log.lock().unwrap().push(format!("{} {}", method, path));

        let session_path = format!("/session/{}", WEBDRIVER_SESSION_ID);
        let (status, body) = match (method.as_str(), path.as_str()) {
            ("POST", "/session") => (
                200,
                format!(
                    r#"{{"value":{{"sessionId":"{}","capabilities":{{"browserName":"chrome"}}}}}}"#,
                    WEBDRIVER_SESSION_ID
                ),
            ),
            ("DELETE", p) if p == session_path => (200, r#"{"value":null}"#.to_string()),
            _ => (
                500,
                r#"{"value":{"error":"unknown error","message":"navigation refused","stacktrace":""}}"#
                    .to_string(),
            ),
        };

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\n\r\n{}",
            status,
            reason_phrase(status),
            body.len(),
            body
        );
        if socket.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
