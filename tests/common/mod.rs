#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use natslog::LocalSink;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinHandle, JoinSet};

/// Just enough of the NATS server protocol for one client: sends INFO,
/// answers PING with PONG and records every PUB.
pub struct FakeNatsServer {
    addr: SocketAddr,
    published: Arc<Mutex<Vec<(String, String)>>>,
    accepted: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl FakeNatsServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind fake NATS server");
        let addr = listener.local_addr().expect("Fake NATS server has no address");
        let published = Arc::new(Mutex::new(Vec::new()));
        let accepted = Arc::new(AtomicUsize::new(0));

        let store = published.clone();
        let counter = accepted.clone();
        let task = tokio::spawn(async move {
            // dropping the set on abort closes every client connection
            let mut connections = JoinSet::new();
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                connections.spawn(serve_connection(stream, addr.port(), store.clone()));
            }
        });

        Self { addr, published, accepted, task }
    }

    pub fn url(&self) -> String {
        format!("nats://{}", self.addr)
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    /// Client connections accepted so far
    pub fn connections(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Poll until at least `count` messages arrived or `within` elapsed.
    pub async fn wait_for_published(&self, count: usize, within: Duration) -> Vec<(String, String)> {
        let deadline = Instant::now() + within;
        loop {
            let published = self.published();
            if published.len() >= count || Instant::now() >= deadline {
                return published;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Stop listening and drop every connection.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

async fn serve_connection(stream: TcpStream, port: u16, store: Arc<Mutex<Vec<(String, String)>>>) {
    let (read, mut write) = stream.into_split();
    let info = format!(
        "INFO {{\"server_id\":\"fake\",\"server_name\":\"fake\",\"version\":\"2.10.0\",\"go\":\"go1.21\",\
         \"host\":\"127.0.0.1\",\"port\":{},\"headers\":true,\"max_payload\":1048576,\"proto\":1}}\r\n",
        port
    );
    if write.write_all(info.as_bytes()).await.is_err() {
        return;
    }

    let mut lines = BufReader::new(read).lines();
    let mut pending_subject: Option<String> = None;
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(subject) = pending_subject.take() {
            store.lock().unwrap().push((subject, line));
            continue;
        }
        if line.starts_with("PING") {
            if write.write_all(b"PONG\r\n").await.is_err() {
                break;
            }
        } else if let Some(rest) = line.strip_prefix("PUB ") {
            pending_subject = rest.split_whitespace().next().map(str::to_string);
        }
    }
}

/// Collects local sink output for assertions
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LocalSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
