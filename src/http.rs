use log::debug;
use thiserror::Error;

use crate::EngineTransport;
use crate::config::ClientConfig;
use crate::protocol::{MoveRequest, MoveResponse, StartResponse};

/// Error types for backend HTTP requests.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("backend returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl HttpError {
    fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => HttpError::Status {
                status,
                url: url.to_string(),
            },
            ureq::Error::Transport(transport) => HttpError::Transport {
                url: url.to_string(),
                source: Box::new(transport),
            },
        }
    }
}

/// Blocking JSON client for the `/start` and `/move` routes.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }
}

impl EngineTransport for HttpTransport {
    type Error = HttpError;

    fn start_game(&mut self) -> Result<String, Self::Error> {
        let url = self.config.endpoint("start");
        debug!("GET {url}");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| HttpError::from_ureq(&url, e))?;
        let body: StartResponse = response
            .into_json()
            .map_err(|source| HttpError::Decode { url, source })?;
        Ok(body.game_id)
    }

    fn request_move(&mut self, request: &MoveRequest<'_>) -> Result<MoveResponse, Self::Error> {
        let url = self.config.endpoint("move");
        debug!("POST {url}: {request:?}");
        let response = self
            .agent
            .post(&url)
            .send_json(request)
            .map_err(|e| HttpError::from_ureq(&url, e))?;
        response
            .into_json()
            .map_err(|source| HttpError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use crate::session::{GameSession, SessionError};

    /// Serve a single HTTP response on a local port and return the base URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let addr = listener.local_addr().expect("local address");
        thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            // Drain the request head.
            while reader.read_line(&mut line).expect("read request") > 2 {
                line.clear();
            }
            let mut stream = reader.into_inner();
            stream
                .write_all(response.as_bytes())
                .expect("write response");
        });
        format!("http://{addr}")
    }

    fn transport_for(api_url: String) -> HttpTransport {
        HttpTransport::new(ClientConfig {
            api_url,
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn test_status_error_message() {
        let err = HttpError::Status {
            status: 502,
            url: "http://backend/move".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned status 502 for http://backend/move"
        );
    }

    #[test]
    fn test_from_ureq_maps_status() {
        let response = ureq::Response::new(503, "Service Unavailable", "")
            .expect("valid synthetic response");

        let err = HttpError::from_ureq(
            "http://backend/start",
            ureq::Error::Status(503, response),
        );

        assert!(
            matches!(
                &err,
                HttpError::Status { status: 503, url } if url == "http://backend/start"
            ),
            "expected status error, got {err:?}"
        );
    }

    #[test]
    fn test_start_reads_game_id() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Content-Length: 22\r\nConnection: close\r\n\r\n{\"game_id\": \"abc-123\"}",
        );

        let game_id = transport_for(url).start_game().expect("start succeeds");

        assert_eq!(game_id, "abc-123");
    }

    #[test]
    fn test_server_error_becomes_network_failure() {
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\
             Connection: close\r\n\r\n",
        );

        let result = GameSession::start(transport_for(url));

        assert!(
            matches!(
                &result,
                Err(SessionError::NetworkFailure(msg)) if msg.contains("status 500")
            ),
            "expected network failure, got {:?}",
            result.as_ref().err()
        );
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let mut transport = HttpTransport::new(ClientConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
        });

        let result = transport.start_game();

        assert!(
            matches!(result, Err(HttpError::Transport { .. })),
            "expected transport error, got {result:?}"
        );
    }
}
