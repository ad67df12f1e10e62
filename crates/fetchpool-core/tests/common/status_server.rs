//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes:
//! - `/ok` answers 200 with a small body.
//! - `/status/<code>` answers with that status.
//! - `/flaky/<n>/<key>` answers 503 for the first `n` requests per key, then 200.
//! - `/slow` waits a few seconds before answering 200.
//! - `/redirect` answers 302 to `/ok`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

type Hits = Arc<Mutex<HashMap<String, u32>>>;

/// Starts a server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345"). The server runs until the process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits: Hits = Arc::default();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let hits = Arc::clone(&hits);
            thread::spawn(move || handle(stream, &hits));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, hits: &Hits) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let response = route(path, hits);
    let _ = stream.write_all(response.as_bytes());
}

fn respond(status: &str, extra_headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        status,
        body.len(),
        extra_headers,
        body
    )
}

fn route(path: &str, hits: &Hits) -> String {
    let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match parts.as_slice() {
        ["ok"] => respond("200 OK", "", "hello"),
        ["redirect"] => respond("302 Found", "Location: /ok\r\n", ""),
        ["slow"] => {
            thread::sleep(Duration::from_secs(3));
            respond("200 OK", "", "late")
        }
        ["status", code] => match *code {
            "404" => respond("404 Not Found", "", "missing"),
            "500" => respond("500 Internal Server Error", "", "boom"),
            "503" => respond("503 Service Unavailable", "", "busy"),
            other => respond(&format!("{} Custom", other), "", ""),
        },
        ["flaky", n, key] => {
            let fail_first: u32 = n.parse().unwrap_or(0);
            let mut hits = hits.lock().unwrap();
            let count = hits.entry((*key).to_string()).or_insert(0);
            *count += 1;
            if *count <= fail_first {
                respond("503 Service Unavailable", "", "try later")
            } else {
                respond("200 OK", "", "recovered")
            }
        }
        _ => respond("404 Not Found", "", ""),
    }
}
