use super::protocol::{Action, NOT_FOUND, StoreRequest, StoreResponse, result_line};

use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory object store served by one worker process.
///
/// Maps object id to content hash with last-write-wins semantics. The lock guards
/// the map alone and is held for a single lookup or assignment, never for a whole
/// batch, so concurrent batches interleave at request granularity.
pub struct WorkerStore {
    worker_id: String,
    entries: RwLock<HashMap<String, String>>,
}

impl WorkerStore {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub async fn get(&self, object_id: &str) -> Option<String> {
        self.entries.read().await.get(object_id).cloned()
    }

    pub async fn put(&self, object_id: String, hash: String) {
        self.entries.write().await.insert(object_id, hash);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Applies a batch in arrival order and answers one line per request.
    ///
    /// Reads of unknown objects yield the `NOT_FOUND` value instead of being
    /// skipped; writes are acknowledged with this worker's id.
    pub async fn handle_batch(&self, requests: Vec<StoreRequest>) -> StoreResponse {
        let mut result = Vec::with_capacity(requests.len());

        for request in requests {
            let line = match request.action {
                Action::Read => match self.get(&request.object_id).await {
                    Some(hash) => result_line(&request.request_id, &hash),
                    None => {
                        tracing::debug!("Object {} not found", request.object_id);
                        result_line(&request.request_id, NOT_FOUND)
                    }
                },
                Action::Write => {
                    let line = result_line(&request.request_id, &self.worker_id);
                    self.put(request.object_id, request.hash).await;
                    line
                }
            };
            result.push(line);
        }

        StoreResponse { result }
    }
}
