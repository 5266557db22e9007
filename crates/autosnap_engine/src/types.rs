use std::fmt;
use std::path::PathBuf;

use autosnap_core::{ResourceId, ScrapeResult};
use serde::Deserialize;
use thiserror::Error;

use crate::archive::SaveError;

/// Outcomes reported by the engine thread, one per command.
#[derive(Debug)]
pub enum EngineEvent {
    ScrapeFinished(Result<ScrapeResult, ApiError>),
    ArchiveFinished {
        resource_id: ResourceId,
        result: Result<PathBuf, DownloadError>,
    },
    DeleteFinished {
        resource_id: ResourceId,
        result: Result<(), ApiError>,
    },
}

/// Body of the service root (`GET /`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message the service itself put in an error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    /// Non-2xx status without a usable error body.
    HttpStatus(u16),
    /// Non-2xx status whose JSON body carried an `error` text.
    Rejected { status: u16, message: String },
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Rejected { status, message } => {
                write!(f, "rejected with status {status}: {message}")
            }
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure of the archive step: either fetching or writing it.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] ApiError),
    #[error("save failed: {0}")]
    Save(#[from] SaveError),
}
