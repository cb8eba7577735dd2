use crate::storage::protocol::Action;

/// A record in the input stream that cannot be turned into a request.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("line {line}: expected at least 3 fields, got {found}")]
    MissingFields { line: u64, found: usize },
    #[error("line {line}: unknown action '{action}'")]
    UnknownAction { line: u64, action: String },
    #[error("line {line}: write is missing size or hash")]
    IncompleteWrite { line: u64 },
    #[error("line {line}: invalid size '{value}': {source}")]
    InvalidSize {
        line: u64,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one bucket's call. The batch's requests receive no result.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("bucket {bucket}: transport error: {source}")]
    Transport {
        bucket: usize,
        action: Action,
        request_ids: Vec<String>,
        #[source]
        source: reqwest::Error,
    },
    #[error("bucket {bucket}: worker answered {status}")]
    Status {
        bucket: usize,
        action: Action,
        request_ids: Vec<String>,
        status: reqwest::StatusCode,
    },
    #[error("bucket {bucket}: malformed response: {reason}")]
    Malformed {
        bucket: usize,
        action: Action,
        request_ids: Vec<String>,
        reason: String,
    },
    #[error("dispatch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DispatchError {
    pub fn bucket(&self) -> Option<usize> {
        match self {
            DispatchError::Transport { bucket, .. }
            | DispatchError::Status { bucket, .. }
            | DispatchError::Malformed { bucket, .. } => Some(*bucket),
            DispatchError::Join(_) => None,
        }
    }

    /// Requests of the failed batch, none of which were confirmed.
    pub fn request_ids(&self) -> &[String] {
        match self {
            DispatchError::Transport { request_ids, .. }
            | DispatchError::Status { request_ids, .. }
            | DispatchError::Malformed { request_ids, .. } => request_ids,
            DispatchError::Join(_) => &[],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Input(#[from] InputError),
}
