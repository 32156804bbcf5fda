//! In-process HTTP/1.1 key server for integration tests
//!
//! Speaks just enough raw HTTP to control framing exactly: fixed-length
//! bodies, chunked bodies with no declared length, and headers that declare
//! a length the server never sends.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers a path
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status line plus a body framed by Content-Length
    Fixed { status: u16, body: Vec<u8> },
    /// 200 with a chunked body and no Content-Length
    Chunked(Vec<u8>),
    /// 200 declaring a Content-Length, then holding the connection open without a body
    DeclaredOnly(u64),
}

impl Reply {
    /// 200 with a fixed-length body
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Reply::Fixed {
            status: 200,
            body: body.into(),
        }
    }
}

/// A key server bound to a random localhost port
pub struct KeyServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl KeyServer {
    /// Start serving `routes` (path to reply); unknown paths get 404
    pub async fn start(routes: impl IntoIterator<Item = (&'static str, Reply)>) -> Self {
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let hits = Arc::new(AtomicUsize::new(0));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Failed to get local address");

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let served = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((stream, _)) = accepted else { break };
                        served.fetch_add(1, Ordering::SeqCst);
                        tokio::spawn(handle(stream, Arc::clone(&routes)));
                    }
                }
            }
        });

        Self {
            addr,
            hits,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Absolute URL for `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// URL prefix covering every path on this server
    pub fn prefix(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Number of connections accepted so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for KeyServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(mut stream: TcpStream, routes: Arc<HashMap<String, Reply>>) {
    let Some(path) = read_request_path(&mut stream).await else {
        return;
    };

    let reply = routes.get(&path).cloned().unwrap_or(Reply::Fixed {
        status: 404,
        body: b"not found".to_vec(),
    });

    let _ = match reply {
        Reply::Fixed { status, body } => {
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                reason(status),
                body.len()
            );
            write_all(&mut stream, &[head.as_bytes(), body.as_slice()]).await
        }
        Reply::Chunked(body) => {
            let mut out = b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n".to_vec();
            for chunk in body.chunks(50) {
                out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
                out.extend_from_slice(chunk);
                out.extend_from_slice(b"\r\n");
            }
            out.extend_from_slice(b"0\r\n\r\n");
            write_all(&mut stream, &[out.as_slice()]).await
        }
        Reply::DeclaredOnly(len) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
                len
            );
            let result = write_all(&mut stream, &[head.as_bytes()]).await;
            // Never send the body; a client that waits for it would stall here
            tokio::time::sleep(Duration::from_secs(30)).await;
            result
        }
    };
}

async fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request = String::from_utf8_lossy(&buf);
    let request_line = request.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

async fn write_all(stream: &mut TcpStream, parts: &[&[u8]]) -> std::io::Result<()> {
    for part in parts {
        stream.write_all(part).await?;
    }
    stream.flush().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
