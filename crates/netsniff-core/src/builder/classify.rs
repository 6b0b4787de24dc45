use crate::capture::ErrorEvent;
use crate::har::{Entry, STATUS_NO_RESPONSE, STATUS_TRANSPORT_ERROR};
use serde::{Deserialize, Serialize};

/// Symbolic transport failure codes understood by HAR consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportError {
    ConnectionRefused,
    ConnectionClosed,
    UnknownHost,
    ConnectionTimedOut,
    OperationCancelled,
    Ssl,
    ConnectionGeneric,
}

/// Numeric network error codes reported by the capture environment
const ERROR_CODES: &[(i64, TransportError)] = &[
    (1, TransportError::ConnectionRefused),
    (2, TransportError::ConnectionClosed),
    (3, TransportError::UnknownHost),
    (4, TransportError::ConnectionTimedOut),
    (5, TransportError::OperationCancelled),
    (6, TransportError::Ssl),
];

impl TransportError {
    /// Map a numeric error code; anything unlisted is `ConnectionGeneric`
    pub fn from_code(code: i64) -> Self {
        ERROR_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, error)| *error)
            .unwrap_or(TransportError::ConnectionGeneric)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportError::ConnectionRefused => "CONNECTION_REFUSED",
            TransportError::ConnectionClosed => "CONNECTION_CLOSED",
            TransportError::UnknownHost => "UNKNOWN_HOST",
            TransportError::ConnectionTimedOut => "CONNECTION_TIMED_OUT",
            TransportError::OperationCancelled => "OPERATION_CANCELLED",
            TransportError::Ssl => "SSL",
            TransportError::ConnectionGeneric => "CONNECTION_GENERIC",
        }
    }
}

/// Fold a transport error into an entry that never saw a response status.
///
/// Returns whether the error was applied. Entries that already carry a
/// status from a reply phase keep it.
pub fn apply_transport_error(entry: &mut Entry, error: &ErrorEvent) -> bool {
    if entry.response.status != STATUS_NO_RESPONSE {
        tracing::debug!(
            "Ignoring error {:?} for {}: status {} already recorded",
            error.error_code,
            entry.request.url,
            entry.response.status
        );
        return false;
    }

    let code = error
        .error_code
        .map_or(TransportError::ConnectionGeneric, TransportError::from_code);
    let response = &mut entry.response;
    response.status = STATUS_TRANSPORT_ERROR;
    response.status_text = Some(error.error_string.clone());
    response.error.code = Some(code);
    response.error.message = Some(error.error_string.clone());
    true
}
