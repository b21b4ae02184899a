use std::{io, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ConnectionId, Endpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidAddress,
    InvalidPort,
    ConnectionError,
    Disconnected,
}

/// Rejection of user-typed endpoint text. Raised before anything touches a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid IP4 address")]
    InvalidAddress,
    #[error("Tcp Port is int between 1 to 65535")]
    InvalidPort,
}

impl ValidationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidAddress => FailureKind::InvalidAddress,
            Self::InvalidPort => FailureKind::InvalidPort,
        }
    }
}

/// Asynchronous failure reported by the dispatcher worker.
#[derive(Debug, Clone, Error)]
pub enum DispatchFailure {
    #[error("Connection Error")]
    ConnectionError {
        endpoint: Endpoint,
        #[source]
        cause: Arc<io::Error>,
    },
    #[error("Disconnected")]
    Disconnected { connection: ConnectionId },
}

impl DispatchFailure {
    pub fn connection_error(endpoint: Endpoint, cause: io::Error) -> Self {
        Self::ConnectionError {
            endpoint,
            cause: Arc::new(cause),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ConnectionError { .. } => FailureKind::ConnectionError,
            Self::Disconnected { .. } => FailureKind::Disconnected,
        }
    }

    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Underlying transport error. `Disconnected` never carries one.
    pub fn cause(&self) -> Option<&io::Error> {
        match self {
            Self::ConnectionError { cause, .. } => Some(cause.as_ref()),
            Self::Disconnected { .. } => None,
        }
    }
}

/// Display-ready form of any failure, suitable for a toast or a JSON log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureNotice {
    pub kind: FailureKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl From<&DispatchFailure> for FailureNotice {
    fn from(value: &DispatchFailure) -> Self {
        Self {
            kind: value.kind(),
            description: value.description(),
            cause: value.cause().map(ToString::to_string),
        }
    }
}

impl From<ValidationError> for FailureNotice {
    fn from(value: ValidationError) -> Self {
        Self {
            kind: value.kind(),
            description: value.to_string(),
            cause: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
