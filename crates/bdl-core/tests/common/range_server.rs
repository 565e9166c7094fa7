//! Minimal HTTP/1.1 server with Range GET support for integration tests.
//!
//! Serves one static body on every path. Honors `Range: bytes=N-` with 206
//! (or 416 when N is past the end) and records every request it sees.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// Answer every request with this status and a short text body.
    pub force_status: Option<u16>,
    /// Declare the full length but close the connection after this many body bytes.
    pub truncate_after: Option<usize>,
    /// Sleep before answering.
    pub delay: Option<Duration>,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
            force_status: None,
            truncate_after: None,
            delay: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub range: Option<String>,
    pub user_agent: Option<String>,
}

/// A running server. It lives until the process exits.
#[derive(Clone)]
pub struct RangeServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RangeServer {
    /// Full URL for `name` on this server.
    pub fn url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &body, opts, &recorded));
        }
    });
    RangeServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(
    mut stream: TcpStream,
    body: &[u8],
    opts: RangeServerOptions,
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(raw) = read_head(&mut stream) else {
        return;
    };
    let request = parse_request(&raw);
    recorded.lock().unwrap().push(request.clone());

    if let Some(delay) = opts.delay {
        thread::sleep(delay);
    }

    if let Some(status) = opts.force_status {
        let text = b"forced status";
        let head = format!(
            "HTTP/1.1 {} Forced\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            text.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(text);
        return;
    }

    let total = body.len() as u64;
    let start = if opts.support_ranges {
        request.range.as_deref().and_then(parse_range_start)
    } else {
        None
    };
    let (status, slice, content_range) = match start {
        Some(start) if start >= total => (
            "416 Range Not Satisfiable",
            &body[0..0],
            Some(format!("bytes */{}", total)),
        ),
        Some(start) => (
            "206 Partial Content",
            &body[start as usize..],
            Some(format!("bytes {}-{}/{}", start, total - 1, total)),
        ),
        None => ("200 OK", body, None),
    };
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        slice.len()
    );
    if let Some(cr) = content_range {
        head.push_str(&format!("Content-Range: {}\r\n", cr));
    }
    if opts.support_ranges {
        head.push_str("Accept-Ranges: bytes\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let sent = opts.truncate_after.map_or(slice.len(), |n| n.min(slice.len()));
    let _ = stream.write_all(&slice[..sent]);
    let _ = stream.flush();
}

/// Reads until the blank line ending the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(raw).ok()
}

fn parse_request(raw: &str) -> RecordedRequest {
    let mut lines = raw.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let mut range = None;
    let mut user_agent = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            if name.trim().eq_ignore_ascii_case("range") {
                range = Some(value);
            } else if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value);
            }
        }
    }
    RecordedRequest {
        path,
        range,
        user_agent,
    }
}

/// Start offset of an open-ended `bytes=N-` range.
fn parse_range_start(value: &str) -> Option<u64> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, _) = spec.split_once('-')?;
    start.trim().parse().ok()
}
