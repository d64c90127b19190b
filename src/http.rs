//! Shared HTTP client construction.

use crate::error::{PublishError, Result};
use std::sync::OnceLock;
use std::time::Duration;

/// One-time initialization guard for the rustls crypto provider
static RUSTLS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Build the client used for both the token endpoint and the Play API.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    RUSTLS_INITIALIZED.get_or_init(|| {
        // Err only means a provider is already installed for this process
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            log::debug!("rustls crypto provider already installed");
        }
    });

    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| PublishError::Config {
            reason: format!("failed to build HTTP client: {}", e),
        })
}

/// Read a failed response into a short human-readable reason.
///
/// Google APIs wrap failures as `{"error": {"message": ...}}`; fall back to the
/// raw body when that shape is absent.
pub async fn failure_reason(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("HTTP {}: {}", status, error_message(&body))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let error = value.get("error")?;
            error
                .get("message")
                .or_else(|| value.get("error_description"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .or_else(|| error.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}


/// Single-threaded HTTP/1.1 responder on a loopback port, for exercising real
/// requests without leaving the machine.
#[cfg(test)]
pub(crate) mod loopback {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// A request as it arrived on the wire
    #[derive(Debug)]
    pub struct Recorded {
        pub method: String,
        pub target: String,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl Recorded {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }

        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.body).expect("request body is JSON")
        }
    }

    /// Client that ignores proxy settings from the environment
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client builds")
    }

    /// Answer one connection per `(status, body)` pair, in order.
    ///
    /// Returns the base URL and a handle yielding the recorded requests.
    pub async fn serve(
        responses: Vec<(&'static str, String)>,
    ) -> (String, JoinHandle<Vec<Recorded>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));

        let handle = tokio::spawn(async move {
            let mut recorded = Vec::with_capacity(responses.len());
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.expect("accept");
                recorded.push(read_request(&mut stream).await);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).await.expect("write response");
                let _ = stream.shutdown().await;
            }
            recorded
        });

        (base, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> Recorded {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_len = loop {
            let n = stream.read(&mut chunk).await.expect("read request");
            assert!(n > 0, "connection closed before headers ended");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split(' ');
        let method = request_line.next().unwrap_or_default().to_string();
        let target = request_line.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_len + content_length {
            let n = stream.read(&mut chunk).await.expect("read body");
            assert!(n > 0, "connection closed before body ended");
            buf.extend_from_slice(&chunk[..n]);
        }

        Recorded {
            method,
            target,
            headers,
            body: buf[head_len..head_len + content_length].to_vec(),
        }
    }
}
