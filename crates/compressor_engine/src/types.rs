use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type SessionId = u64;

/// Everything the endpoint needs for one compression request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub session_id: SessionId,
    pub path: PathBuf,
    /// Name sent as the multipart file name.
    pub file_name: String,
    /// Value of the `compression` field.
    pub level: String,
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// What the index page tells us about the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormPage {
    pub csrf_token: Option<String>,
    pub choices: Vec<CompressionChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionChoice {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FormLoaded(Result<FormPage, UploadError>),
    ProgressTick {
        session_id: SessionId,
    },
    ResponseReceived {
        session_id: SessionId,
        status: u16,
    },
    UploadCompleted {
        session_id: SessionId,
        result: Result<CompressedFile, UploadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UploadError {
    pub kind: FailureKind,
    /// Text meant for the user; for HTTP failures this is the server's own message.
    pub message: String,
}

impl UploadError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "local file error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
