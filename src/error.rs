use reqwest::StatusCode;

/// The single failure kind for backend access: either the transport itself
/// failed (no status available) or the backend answered with a non-success
/// status. Callers that care can inspect `status`.
#[derive(Debug)]
pub struct TransportError {
    pub status: Option<StatusCode>,
    message: String,
}

impl TransportError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            message: format!("backend returned {status}"),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status(),
            message: format!("request failed: {e}"),
        }
    }
}
