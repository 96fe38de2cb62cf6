//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use asset_router::config::ProxyConfig;
use asset_router::http::HttpServer;
use asset_router::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Canned answer of a mock upstream.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
    /// Wait before writing the status line.
    pub delay: Duration,
    /// `Content-Length` to announce instead of the body length.
    pub declared_length: Option<usize>,
    /// Stop for a while after this many body bytes.
    pub pause: Option<(usize, Duration)>,
}

impl MockResponse {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(200, content_type, body)
    }

    pub fn with_status(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body: body.into(),
            delay: Duration::ZERO,
            declared_length: None,
            pause: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn declaring_length(mut self, length: usize) -> Self {
        self.declared_length = Some(length);
        self
    }

    pub fn pausing_after(mut self, bytes: usize, pause: Duration) -> Self {
        self.pause = Some((bytes, pause));
        self
    }
}

/// What a mock upstream saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request target (path and query).
    pub target: String,
    pub user_agent: Option<String>,
}

/// Upstream that answers every request through a closure and records it.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let respond = respond.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let mut socket = socket;
                    let _ = handle_connection(&mut socket, respond.as_ref(), &recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Absolute URL of `path` on this upstream.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle_connection<F>(
    socket: &mut TcpStream,
    respond: &F,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Option<()>
where
    F: Fn(&str) -> MockResponse + ?Sized,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf).into_owned();
    let mut lines = head.split("\r\n");
    let target = lines.next()?.split(' ').nth(1)?.to_string();
    let user_agent = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
        .map(|(_, value)| value.trim().to_string());

    recorded.lock().unwrap().push(RecordedRequest {
        target: target.clone(),
        user_agent,
    });

    let response = respond(&target);
    tokio::time::sleep(response.delay).await;

    let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
    if let Some(content_type) = response.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        response.declared_length.unwrap_or(response.body.len())
    ));
    socket.write_all(head.as_bytes()).await.ok()?;

    let split = response
        .pause
        .map_or(response.body.len(), |(bytes, _)| bytes.min(response.body.len()));
    let (first, rest) = response.body.split_at(split);
    socket.write_all(first).await.ok()?;
    socket.flush().await.ok()?;
    if let Some((_, pause)) = response.pause {
        tokio::time::sleep(pause).await;
    }
    socket.write_all(rest).await.ok()?;
    socket.shutdown().await.ok()?;
    Some(())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Start the router on an ephemeral port.
pub async fn start_router(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client that neither follows redirects nor uses system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
