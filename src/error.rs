use thiserror::Error;

/// Errors raised by the conversion layer.
///
/// Classification itself never fails; every variant here belongs to the
/// codec, the worker or the file-record plumbing around it.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Please enter a base64 string")]
    EmptyInput,

    #[error("Invalid data URL format")]
    InvalidDataUrl,

    #[error("Invalid base64 characters detected")]
    InvalidCharacters,

    #[error("Invalid base64 string: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Worker is no longer running")]
    WorkerGone,
}

pub type Result<T> = std::result::Result<T, CodecError>;
