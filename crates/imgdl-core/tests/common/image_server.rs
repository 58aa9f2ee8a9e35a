//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes keyed by path (query ignored). Each route can
//! set status, Content-Type, Content-Disposition and Location, announce a
//! longer Content-Length than it sends (truncated transfer), delay the
//! response, or stall mid-body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
    /// Content-Length to announce; defaults to `body.len()`.
    pub declared_len: Option<usize>,
    /// Sleep before sending anything.
    pub delay: Duration,
    /// Sleep after sending headers and the first half of the body.
    pub stall: Duration,
}

impl Route {
    pub fn image(content_type: &str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            content_disposition: None,
            location: None,
            body: body.to_vec(),
            declared_len: None,
            delay: Duration::ZERO,
            stall: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            body: format!("status {}", status).into_bytes(),
            ..Self::image("text/plain", b"")
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::status(302)
        }
    }

    pub fn disposition(mut self, value: &str) -> Self {
        self.content_disposition = Some(value.to_string());
        self
    }

    pub fn truncated(mut self, declared_len: usize) -> Self {
        self.declared_len = Some(declared_len);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn stalled(mut self, stall: Duration) -> Self {
        self.stall = stall;
        self
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> =
        Arc::new(routes.into_iter().map(|(p, r)| (p.to_string(), r)).collect());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A local URL nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone.png", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/");

    let route = match routes.get(path) {
        Some(r) => r.clone(),
        None => Route::status(404),
    };
    thread::sleep(route.delay);

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.declared_len.unwrap_or(route.body.len())
    );
    if let Some(ct) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(cd) = &route.content_disposition {
        head.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {}\r\n", loc));
    }
    head.push_str("\r\n");
    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }

    if route.stall > Duration::ZERO {
        let half = route.body.len() / 2;
        let _ = stream.write_all(&route.body[..half]);
        let _ = stream.flush();
        thread::sleep(route.stall);
        let _ = stream.write_all(&route.body[half..]);
    } else {
        let _ = stream.write_all(&route.body);
    }
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
