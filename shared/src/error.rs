use thiserror::Error;

use crate::session::{Action, SessionState};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed data URL: {0}")]
    MalformedDataUrl(String),
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("frame capture failed: {0}")]
    Capture(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("network error: {0}")]
    Network(String),
    #[error("prediction service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("invalid prediction response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to save {file_name}: {reason}")]
    Save { file_name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("prediction endpoint must not be empty")]
    EmptyEndpoint,
    #[error("resize limits must be non-zero, got {width}x{height}")]
    ZeroLimits { width: u32, height: u32 },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} while {state}")]
    InvalidTransition { action: Action, state: SessionState },
    #[error("another operation is still in flight")]
    Busy,
    #[error("result for operation {0} arrived after it was superseded")]
    StaleResult(u64),
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Prediction(#[from] PredictError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
