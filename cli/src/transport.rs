use std::{fmt::Display, net::IpAddr, time::Duration};

use rangecrack_core::{messages::ENDPOINT_CRACK, CrackRequest, CrackResponse};
use reqwest::blocking::Client;
use thiserror::Error;

/// The address of a worker's crack endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(host: IpAddr, port: u16) -> Self {
        let host = match host {
            IpAddr::V4(ip) => ip.to_string(),
            IpAddr::V6(ip) => format!("[{ip}]"),
        };

        Endpoint(format!("http://{host}:{port}{ENDPOINT_CRACK}"))
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Endpoint(url.to_owned())
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The worker couldn't be reached or didn't answer with a crack response.
    /// Another worker may succeed.
    #[error("worker unreachable: {0}")]
    Unreachable(String),
}

/// Sends crack requests to workers.
pub trait Transport: Send + Sync {
    fn crack(
        &self,
        endpoint: &Endpoint,
        request: &CrackRequest,
    ) -> Result<CrackResponse, TransportError>;
}

/// Talks to workers over HTTP.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport where each request must complete within `timeout`.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn crack(
        &self,
        endpoint: &Endpoint,
        request: &CrackRequest,
    ) -> Result<CrackResponse, TransportError> {
        let response = self
            .client
            .post(endpoint.url())
            .json(request)
            .send()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Unreachable(format!("status {status}")));
        }

        response
            .json()
            .map_err(|e| TransportError::Unreachable(e.to_string()))
    }
}

/// Serves every connection with the same raw HTTP answer, after waiting for `delay`.
#[cfg(test)]
pub fn serve_raw(status: &'static str, body: String, delay: Duration) -> Endpoint {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::{Ipv4Addr, TcpListener},
        thread,
    };

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            let _ = reader.read_exact(&mut request_body);

            thread::sleep(delay);
            let _ = write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
        }
    });

    Endpoint::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
}
