use std::io::Read;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// A fully built POST request, ready for a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl OutgoingRequest {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport error: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    ReadBody(#[from] std::io::Error),
}

/// Blocking request/response channel used by the client.
///
/// Implementations return the raw response body whatever the HTTP status;
/// only failures to reach the service or read its answer are errors.
pub trait Transport {
    fn post(&mut self, request: &OutgoingRequest) -> Result<String, TransportError>;
}

/// ureq-backed transport.
///
/// The underlying agent (and its connection pool) is created on the first
/// request and reused until the transport is dropped.
#[derive(Default)]
pub struct HttpTransport {
    agent: Option<ureq::Agent>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the agent has been created yet.
    pub fn is_connected(&self) -> bool {
        self.agent.is_some()
    }

    fn agent(&mut self) -> &ureq::Agent {
        self.agent.get_or_insert_with(|| {
            tracing::debug!("[appenlight] opening HTTP agent");
            ureq::AgentBuilder::new().timeout(SEND_TIMEOUT).build()
        })
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, request: &OutgoingRequest) -> Result<String, TransportError> {
        let mut req = self.agent().post(&request.url);
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        match req.send_bytes(&request.body) {
            Ok(resp) => read_body(resp),
            // Error statuses carry the service's diagnostic payload.
            Err(ureq::Error::Status(status, resp)) => {
                tracing::debug!("[appenlight] API returned {status}");
                read_body(resp)
            }
            Err(ureq::Error::Transport(e)) => Err(TransportError::Connect(e.to_string())),
        }
    }
}

/// Body as text; invalid UTF-8 is replaced rather than rejected so the
/// `OK` prefix stays visible.
fn read_body(resp: ureq::Response) -> Result<String, TransportError> {
    let mut raw = Vec::new();
    resp.into_reader().read_to_end(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = OutgoingRequest {
            url: "https://api.appenlight.com/api/logs".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: b"[]".to_vec(),
        };
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn agent_is_created_lazily() {
        let mut transport = HttpTransport::new();
        assert!(!transport.is_connected());
        transport.agent();
        assert!(transport.is_connected());
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let mut transport = HttpTransport::new();
        let req = OutgoingRequest {
            url: "http://127.0.0.1:1/api/logs".to_string(),
            headers: Vec::new(),
            body: b"[]".to_vec(),
        };
        assert!(matches!(
            transport.post(&req),
            Err(TransportError::Connect(_))
        ));
    }
}
