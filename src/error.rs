//! Error types for message construction and mutation.
//!
//! Only malformed input is an error. A header, parameter or attribute that
//! is simply not there is reported through an empty value, an empty
//! sequence or `None`, never through [`MessageError`].

use thiserror::Error;

use crate::http::cursor::CursorState;

/// Result type alias for message operations.
pub type MessageResult<T> = Result<T, MessageError>;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: &'static str },

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("cursor read while {0:?}; call next() first")]
    InvalidCursorState(CursorState),

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("body exceeds the {limit} byte limit")]
    BodyTooLarge { limit: usize },

    #[error("uploaded file was already moved")]
    UploadMoved,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl MessageError {
    pub(crate) fn header(name: &str, reason: &'static str) -> Self {
        MessageError::InvalidHeader {
            name: name.to_string(),
            reason,
        }
    }
}
