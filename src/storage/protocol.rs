//! Worker Network Protocol
//!
//! Defines the endpoint paths and Data Transfer Objects (DTOs) exchanged between
//! the router and its workers.
//!
//! A router posts a JSON array of `StoreRequest` to a worker and receives a
//! `StoreResponse` whose `result` lines correspond positionally to the requests.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Batch endpoint: accepts an ordered request array, answers one line per request.
pub const ENDPOINT_MESSAGES: &str = "/v1/messages";

/// Value portion of a read result when the object has never been written.
pub const NOT_FOUND: &str = "";

// --- Data Transfer Objects ---

/// The operation a request performs on its object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    #[serde(rename = "R")]
    Read,
    #[serde(rename = "W")]
    Write,
}

/// A single object read or write.
///
/// `size` and `hash` only carry meaning for writes; reads travel with zero values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreRequest {
    pub request_id: String,
    pub object_id: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub size: u64,
    pub action: Action,
}

impl StoreRequest {
    pub fn read(request_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            object_id: object_id.into(),
            hash: String::new(),
            size: 0,
            action: Action::Read,
        }
    }

    pub fn write(
        request_id: impl Into<String>,
        object_id: impl Into<String>,
        size: u64,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            object_id: object_id.into(),
            hash: hash.into(),
            size,
            action: Action::Write,
        }
    }

    /// Bytes this request contributes to its bucket's load.
    pub fn load_bytes(&self) -> u64 {
        match self.action {
            Action::Write => self.size,
            Action::Read => 0,
        }
    }
}

/// Worker answer to a batch.
///
/// Each line is `"<request_id>,<value>"`, in the same order as the request array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreResponse {
    pub result: Vec<String>,
}

/// Formats a single result line.
pub fn result_line(request_id: &str, value: &str) -> String {
    format!("{},{}", request_id, value)
}
