use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Shapes the canned responses the mock API hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    /// Bootstrap yields an id, creation calls return ids, everything 2xx.
    Full,
    /// Bootstrap responds 200 but without a conversation id.
    NoConversationId,
    /// Bootstrap works, /personas fails with 500, creation calls return
    /// bodies without ids.
    Degraded,
}

/// A minimal HTTP server exercising the smoke scenario. Every request is
/// recorded as "METHOD target" in arrival order.
pub struct MockApi {
    pub base_url: String,
    log: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

impl MockApi {
    /// Spawn the mock API on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be created or configured.
    pub fn spawn(mode: ServerMode) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind mock api failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("mock api addr failed: {}", err))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| format!("set_nonblocking failed: {}", err))?;

        let log = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        let thread_log = Arc::clone(&log);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                match listener.accept() {
                    Ok((stream, _)) => {
                        let connection_log = Arc::clone(&thread_log);
                        thread::spawn(move || {
                            let mut stream = stream;
                            handle_client(&mut stream, mode, &connection_log);
                        });
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(MockApi {
            base_url: format!("http://{}", addr),
            log,
            shutdown: shutdown_tx,
            thread: Some(handle),
        })
    }

    /// Snapshot of the requests received so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the request log mutex was poisoned.
    pub fn requests(&self) -> Result<Vec<String>, String> {
        self.log
            .lock()
            .map(|log| log.clone())
            .map_err(|err| format!("request log poisoned: {}", err))
    }
}

fn handle_client(stream: &mut TcpStream, mode: ServerMode, log: &Arc<Mutex<Vec<String>>>) {
    drop(stream.set_read_timeout(Some(Duration::from_secs(5))));
    let Some((method, target)) = read_request(stream) else {
        return;
    };
    if let Ok(mut entries) = log.lock() {
        entries.push(format!("{} {}", method, target));
    }
    respond(stream, mode, &method, &target);
    drop(stream.flush());
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads one request (headers plus any content-length body) and returns the
/// method and target.
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        match stream.read(&mut chunk) {
            Ok(0) => return None,
            Ok(count) => {
                buffer.extend_from_slice(chunk.get(..count)?);
                if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                    break pos;
                }
                if buffer.len() > 65_536 {
                    return None;
                }
            }
            Err(_) => return None,
        }
    };

    let head = String::from_utf8_lossy(buffer.get(..header_end)?).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_owned();
    let target = parts.next()?.to_owned();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let already_read = buffer.len().saturating_sub(header_end.saturating_add(4));
    let mut remaining = content_length.saturating_sub(already_read);
    while remaining > 0 {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(count) => remaining = remaining.saturating_sub(count),
            Err(_) => break,
        }
    }

    Some((method, target))
}

fn respond(stream: &mut TcpStream, mode: ServerMode, method: &str, target: &str) {
    let path = target.split('?').next().unwrap_or(target);
    match (method, path) {
        ("GET", "/ai-conversation") => match mode {
            ServerMode::NoConversationId => write_json(stream, 200, r#"{"new":{}}"#),
            ServerMode::Full | ServerMode::Degraded => write_json(
                stream,
                200,
                r#"{"new":{"conversation_id":"conv-123"}}"#,
            ),
        },
        ("POST", "/ai-conversation-stream") => write_chunked(stream, &["ab", "cd", "ef"]),
        ("GET", "/personas") if mode == ServerMode::Degraded => {
            write_json(stream, 500, r#"{"error":"persona backend down"}"#);
        }
        ("POST", "/session") => match mode {
            ServerMode::Full => write_json(stream, 201, r#"{"id":"sess-9"}"#),
            ServerMode::NoConversationId | ServerMode::Degraded => {
                write_json(stream, 201, r#"{"created":true}"#);
            }
        },
        ("POST", "/trending") => match mode {
            ServerMode::Full => write_json(stream, 201, r#"{"id":"trend-4"}"#),
            ServerMode::NoConversationId | ServerMode::Degraded => {
                write_json(stream, 201, r#"{"created":true}"#);
            }
        },
        ("DELETE", _) => write_no_content(stream),
        _ => write_json(stream, 200, r#"{"ok":true}"#),
    }
}

fn write_json(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        500 => "Internal Server Error",
        _ => "OK",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    drop(stream.write_all(response.as_bytes()));
}

fn write_no_content(stream: &mut TcpStream) {
    drop(stream.write_all(
        b"HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
    ));
}

/// Emits the body as distinct transfer-encoding chunks with a short pause
/// between them so the client sees more than one read.
fn write_chunked(stream: &mut TcpStream, chunks: &[&str]) {
    let head =
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n";
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    for chunk in chunks {
        let piece = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
        if stream.write_all(piece.as_bytes()).is_err() {
            return;
        }
        drop(stream.flush());
        thread::sleep(Duration::from_millis(5));
    }
    drop(stream.write_all(b"0\r\n\r\n"));
}
