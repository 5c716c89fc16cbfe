//! TCP server for the trainer adapter
//!
//! Accepts connections and runs one [`ClientSession`] per connection.
//! Uses tokio for async networking.

use std::net::SocketAddr;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use crate::core::EnvConfig;
use crate::protocol::{create_error, ErrorCode, Response};
use crate::session::ClientSession;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_path: Option<String>,
    /// Longest accepted inbound line, newline excluded
    pub max_line_bytes: usize,
    /// Settings for every session created by this server
    pub env: EnvConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            log_path: None,
            max_line_bytes: 64 * 1024,
            env: EnvConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_ENV_HOST` (default 127.0.0.1), `TETRIS_ENV_PORT` (default 7878)
    /// - `TETRIS_ENV_LOG_PATH`: append a JSONL wire log here
    /// - `TETRIS_ENV_MAX_LINE_BYTES` (default 65536)
    /// - plus the session settings read by [`EnvConfig::from_env`]
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TETRIS_ENV_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TETRIS_ENV_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let log_path = env::var("TETRIS_ENV_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let max_line_bytes = env::var("TETRIS_ENV_MAX_LINE_BYTES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_line_bytes);

        Self {
            host,
            port,
            log_path,
            max_line_bytes,
            env: EnvConfig::from_env(),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Direction of a logged line
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    In,
    Out,
}

/// One JSONL wire log record
#[derive(Debug, Clone, Serialize)]
struct WireRecord {
    ts: u64,
    client: usize,
    dir: Direction,
    line: String,
}

type WireLogTx = mpsc::UnboundedSender<WireRecord>;

fn log_wire(tx: Option<&WireLogTx>, client: usize, dir: Direction, line: &str) {
    if let Some(tx) = tx {
        let _ = tx.send(WireRecord {
            ts: crate::protocol::current_timestamp_ms(),
            client,
            dir,
            line: line.to_string(),
        });
    }
}

/// Spawn the task that appends wire records to `path`
fn spawn_wire_log(path: String) -> WireLogTx {
    let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[EnvServer] cannot open wire log {}: {}", path, e);
                return;
            }
        };

        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(rec) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &rec).is_err() {
                continue;
            }
            buf.push(b'\n');
            if file.write_all(&buf).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    println!(
        "[EnvServer] listening on {} (piece rule {}, seed {})",
        bound,
        config.env.piece_rule.as_str(),
        config.env.seed
    );
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        println!("[EnvServer] client {} connected from {}", client_id, addr);

        let env = config.env;
        let max_line_bytes = config.max_line_bytes;
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) =
                handle_client(socket, client_id, env, max_line_bytes, wire_log_tx).await
            {
                eprintln!("[EnvServer] client {} error: {:#}", client_id, e);
            }
            println!("[EnvServer] client {} disconnected", client_id);
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    env: EnvConfig,
    max_line_bytes: usize,
    wire_log_tx: Option<WireLogTx>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);
    let mut session = ClientSession::new(env);

    let mut bytes: Vec<u8> = Vec::with_capacity(1024);
    let mut out: Vec<u8> = Vec::with_capacity(4096);

    loop {
        bytes.clear();
        let bytes_read = (&mut reader)
            .take(read_limit(max_line_bytes))
            .read_until(b'\n', &mut bytes)
            .await?;

        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let terminated = bytes.last() == Some(&b'\n');
        let mut end = bytes.len();
        while end > 0 && matches!(bytes[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        if !terminated && end > max_line_bytes {
            let err = create_error(
                0,
                ErrorCode::LineTooLong,
                &format!("line exceeds {} bytes", max_line_bytes),
            );
            let response = Response::Error(err);
            write_response(&mut writer, &mut out, &response, client_id, wire_log_tx.as_ref())
                .await?;
            writer.shutdown().await?;
            break;
        }

        let raw_line = match std::str::from_utf8(&bytes[..end]) {
            Ok(text) => text,
            Err(e) => {
                log_wire(
                    wire_log_tx.as_ref(),
                    client_id,
                    Direction::In,
                    &String::from_utf8_lossy(&bytes[..end]),
                );
                let err = create_error(
                    0,
                    ErrorCode::InvalidMessage,
                    &format!("line is not valid UTF-8: {}", e),
                );
                let response = Response::Error(err);
                write_response(&mut writer, &mut out, &response, client_id, wire_log_tx.as_ref())
                    .await?;
                continue;
            }
        };

        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        log_wire(wire_log_tx.as_ref(), client_id, Direction::In, raw_line);

        let response = session.handle_line(trimmed);
        write_response(&mut writer, &mut out, &response, client_id, wire_log_tx.as_ref()).await?;
    }

    Ok(())
}

/// Bytes to request per line: one past the limit tells "at the limit" from "over it"
fn read_limit(max_line_bytes: usize) -> u64 {
    max_line_bytes.saturating_add(1) as u64
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    buf: &mut Vec<u8>,
    response: &Response,
    client_id: usize,
    wire_log_tx: Option<&WireLogTx>,
) -> anyhow::Result<()> {
    buf.clear();
    serde_json::to_writer(&mut *buf, response)?;
    if wire_log_tx.is_some() {
        log_wire(wire_log_tx, client_id, Direction::Out, &String::from_utf8_lossy(buf));
    }
    buf.push(b'\n');
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}
