//! HTTP transport seam.
//!
//! [`TokenAuthority`](crate::TokenAuthority) and
//! [`MediaSearchClient`](crate::MediaSearchClient) never talk to the network
//! directly: they build an [`HttpRequest`] and hand it to a [`Transport`].
//! The default [`HttpTransport`] is backed by `reqwest`'s blocking client;
//! tests substitute their own implementation.

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{GPhotosError, Result};

/// Timeout used by [`HttpTransport::new`] callers that have no preference
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A fully built outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Start a POST request to `url` with no headers and an empty body
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Set a header, rejecting values that are not valid header text
    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value).map_err(|e| {
            GPhotosError::InvalidConfig(format!("invalid value for header {}: {}", name, e))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value as text, if present and printable
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes one HTTP exchange.
///
/// Implementations must abort and return [`GPhotosError::Cancelled`] once
/// `cancel` fires, and report transport failures as network errors. The
/// status code is returned as-is; interpreting it is the caller's job.
pub trait Transport {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        (**self).execute(request, cancel)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        (**self).execute(request, cancel)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        (**self).execute(request, cancel)
    }
}

/// Fail fast when the caller has already given up
pub(crate) fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(GPhotosError::Cancelled)
    } else {
        Ok(())
    }
}

/// Blocking transport backed by `reqwest::blocking::Client`
///
/// The request runs on a short-lived worker thread while the calling thread
/// waits on the result and watches the cancellation token, so a cancelled
/// call returns promptly even if the server never answers. The worker is
/// left to finish on its own, bounded by the client timeout.
///
/// # Example
///
/// ```no_run
/// use gphotos_client::{HttpTransport, transport::DEFAULT_TIMEOUT};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(DEFAULT_TIMEOUT)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    poll_interval: Duration,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Wrap an already configured client
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client,
            poll_interval: Duration::from_millis(25),
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<HttpResponse> {
        ensure_active(cancel)?;

        debug!(method = %request.method, url = %request.url, "sending request");
        let builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body);

        let (tx, rx) = mpsc::channel();
        let _worker = thread::Builder::new()
            .name("gphotos-http".to_string())
            .spawn(move || {
                let result = builder.send().and_then(|response| {
                    let status = response.status().as_u16();
                    let body = response.bytes()?;
                    Ok(HttpResponse::new(status, body.to_vec()))
                });
                // The receiver is gone if the call was cancelled.
                let _ = tx.send(result);
            })
            .map_err(|e| GPhotosError::Transport(format!("failed to spawn request worker: {}", e)))?;

        loop {
            match rx.recv_timeout(self.poll_interval) {
                Ok(result) => {
                    let response = result?;
                    debug!(status = response.status, "received response");
                    return Ok(response);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if cancel.is_cancelled() {
                        debug!("request cancelled while in flight");
                        return Err(GPhotosError::Cancelled);
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(GPhotosError::Transport(
                        "request worker exited without a response".to_string(),
                    ));
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Instant;

    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    use super::*;

    /// Accept one connection, answer with `response`, and hand back the raw request text
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1/echo", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (url, handle)
    }

    #[test]
    fn test_request_builder_rejects_invalid_header() {
        let result = HttpRequest::post("http://localhost/").header(AUTHORIZATION, "Bearer a\nb");
        assert!(matches!(result, Err(GPhotosError::InvalidConfig(_))));
    }

    #[test]
    fn test_http_transport_sends_headers_and_body() {
        let (url, server) = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Length: 11\r\nConnection: close\r\n\r\n{\"ok\":true}",
        );
        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let request = HttpRequest::post(url)
            .header(AUTHORIZATION, "Bearer token-1")
            .unwrap()
            .header(CONTENT_TYPE, "application/json")
            .unwrap()
            .body(b"{\"pageSize\":1}".to_vec());

        let response = transport
            .execute(request, &CancellationToken::new())
            .unwrap();
        assert_eq!(response.status, 201);
        assert!(response.is_success());
        assert_eq!(response.text(), "{\"ok\":true}");

        let raw = server.join().unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("post /v1/echo http/1.1"));
        assert!(raw.contains("authorization: bearer token-1"));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.ends_with("{\"pagesize\":1}"));
    }

    #[test]
    fn test_http_transport_already_cancelled() {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        // Nothing listens here; a dispatched request would fail differently.
        let result = transport.execute(HttpRequest::post("http://127.0.0.1:9/"), &cancel);
        assert!(matches!(result, Err(GPhotosError::Cancelled)));
    }

    #[test]
    fn test_http_transport_cancelled_in_flight() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        // Accept and hold the connection without ever answering.
        let _server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(30));
            drop(stream);
        });

        let transport = HttpTransport::new(Duration::from_secs(60)).unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            trigger.cancel();
        });

        let started = Instant::now();
        let result = transport.execute(HttpRequest::post(url), &cancel);
        assert!(matches!(result, Err(GPhotosError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_http_transport_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let err = transport
            .execute(HttpRequest::post(url), &CancellationToken::new())
            .unwrap_err();
        assert!(err.is_network());
    }
}
