use thiserror::Error;

pub type ScanResult<T> = Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("ledger range {min}..={max} is empty")]
    InvalidRange { min: u32, max: u32 },
    #[error("rpc transport error")]
    Transport(#[from] reqwest::Error),
    #[error("rpc returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("rpc response carried neither result nor error")]
    EmptyResponse,
    #[error("malformed event {id}: {reason}")]
    MalformedEvent { id: String, reason: String },
    #[error("ledger file io error")]
    Io(#[from] std::io::Error),
    #[error("checkpoint at {path} is unreadable")]
    Checkpoint {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("checkpoint at {path} belongs to contract {stored}, not {expected}")]
    CheckpointMismatch {
        path: String,
        stored: String,
        expected: String,
    },
}
