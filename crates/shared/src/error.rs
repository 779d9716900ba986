use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Timeout,
    Api,
    MalformedResponse,
    Unreachable,
}

/// Failure of a single call to the classification service, or of the
/// validation that guards it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("please enter some text")]
    Validation,
    #[error("request timed out")]
    Timeout,
    #[error("server responded with status {status}")]
    Api { status: u16 },
    #[error("server responded with status {status} but the body could not be decoded: {reason}")]
    MalformedResponse { status: u16, reason: String },
    #[error("service unreachable: {reason}")]
    Unreachable { reason: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation => ErrorKind::Validation,
            Self::Timeout => ErrorKind::Timeout,
            Self::Api { .. } => ErrorKind::Api,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Unreachable { .. } => ErrorKind::Unreachable,
        }
    }

    /// Observed HTTP status, when a response arrived at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status } | Self::MalformedResponse { status, .. } => Some(*status),
            Self::Validation | Self::Timeout | Self::Unreachable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_only_reported_when_a_response_arrived() {
        assert_eq!(ClientError::Api { status: 500 }.status(), Some(500));
        assert_eq!(
            ClientError::MalformedResponse {
                status: 200,
                reason: "eof".into()
            }
            .status(),
            Some(200)
        );
        assert_eq!(ClientError::Timeout.status(), None);
        assert_eq!(
            ClientError::Unreachable {
                reason: "refused".into()
            }
            .status(),
            None
        );
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let raw = serde_json::to_string(&ErrorKind::MalformedResponse).expect("encode");
        assert_eq!(raw, "\"malformed_response\"");
    }
}
