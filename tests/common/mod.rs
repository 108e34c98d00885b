//! Shared utilities for integration tests.
//!
//! Stub targets speak raw HTTP/1.1 over TCP so tests can see exactly what the
//! proxy put on the wire.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cors_relay::config::ProxyConfig;
use cors_relay::http::HttpServer;
use cors_relay::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A request as received by a stub target.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Canned response sent by a stub target.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status_line: &'static str,
    pub headers: Vec<(&'static str, &'static str)>,
    /// `None` echoes the request body back.
    pub body: Option<Vec<u8>>,
}

impl StubResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status_line: "200 OK",
            headers: Vec::new(),
            body: Some(body.as_bytes().to_vec()),
        }
    }

    pub fn echo() -> Self {
        Self {
            status_line: "200 OK",
            headers: Vec::new(),
            body: None,
        }
    }
}

/// A running stub target.
pub struct StubBackend {
    pub addr: SocketAddr,
    pub accepted: Arc<AtomicUsize>,
    pub requests: mpsc::UnboundedReceiver<CapturedRequest>,
}

impl StubBackend {
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// URL of `path` on this stub.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a stub target that records every request and answers with `response`.
pub async fn start_recording_backend(response: StubResponse) -> StubBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::unbounded_channel();

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let tx = tx.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let body = response.body.clone().unwrap_or_else(|| request.body.clone());
                let _ = tx.send(request);

                let mut head = format!("HTTP/1.1 {}\r\n", response.status_line);
                for (k, v) in &response.headers {
                    head.push_str(&format!("{}: {}\r\n", k, v));
                }
                head.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                ));
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    StubBackend {
        addr,
        accepted,
        requests: rx,
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy() -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ProxyConfig::default();
    config.listener.bind_address = addr.to_string();
    config.static_files.enabled = false;

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// A port nothing is listening on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Client that never reuses connections and ignores proxy env vars.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Proxy URL forwarding to `target`.
pub fn proxied(proxy: SocketAddr, target: &str) -> String {
    format!("http://{}/?url={}", proxy, encode(target))
}

/// Percent-encode a query value.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Read the request head, returning it with any body bytes read past it.
pub async fn read_head(socket: &mut TcpStream) -> Option<(CapturedRequest, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let rest = buf[head_end + 4..].to_vec();
    Some((
        CapturedRequest {
            method,
            path,
            headers,
            body: Vec::new(),
        },
        rest,
    ))
}

/// Read a full request, honoring Content-Length or chunked framing.
pub async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let (mut request, mut buf) = read_head(socket).await?;
    let mut chunk = [0u8; 64 * 1024];

    let chunked = request
        .header("transfer-encoding")
        .map(|v| v.eq_ignore_ascii_case("chunked"))
        .unwrap_or(false);

    if chunked {
        while !buf.ends_with(b"0\r\n\r\n") {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        request.body = decode_chunked(&buf);
    } else {
        let length: usize = request
            .header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        while buf.len() < length {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        buf.truncate(length);
        request.body = buf;
    }

    Some(request)
}

/// Decode a complete chunked body.
pub fn decode_chunked(mut data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(line_end) = find(data, b"\r\n") {
        let size_str = String::from_utf8_lossy(&data[..line_end]);
        let size_str = size_str.split(';').next().unwrap_or("0").trim();
        let size = usize::from_str_radix(size_str, 16).unwrap_or(0);
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        out.extend_from_slice(&data[start..start + size]);
        data = &data[start + size + 2..];
    }
    out
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
