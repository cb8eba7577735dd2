//! Batch Dispatcher
//!
//! Fans a flushed `Batch` out to the workers, one HTTP call per non-empty bucket.
//!
//! ## Ordering
//! - **Writes** of a flush are spawned together and joined before anything else is
//!   sent (the write barrier), so reads flushed afterwards observe them.
//! - **Reads** are spawned into a long-lived `JoinSet` and left running while the
//!   router keeps consuming input. `join_all` drains that set at the end of a run.
//!
//! A failed call is recorded against its bucket and never aborts the others.

use super::batch::Batch;
use super::error::DispatchError;
use super::types::DispatchSummary;
use crate::storage::protocol::{Action, StoreRequest, StoreResponse};

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Receives every result line returned by a worker, in worker order.
pub type ResultSink = mpsc::UnboundedSender<String>;

pub struct Dispatcher {
    client: reqwest::Client,
    /// Batch endpoint per bucket id.
    worker_urls: Arc<[String]>,
    sink: ResultSink,
    in_flight: JoinSet<Result<usize, DispatchError>>,
    summary: DispatchSummary,
}

impl Dispatcher {
    pub fn new(worker_urls: Vec<String>, sink: ResultSink) -> Self {
        Self {
            client: reqwest::Client::new(),
            worker_urls: worker_urls.into(),
            sink,
            in_flight: JoinSet::new(),
            summary: DispatchSummary::default(),
        }
    }

    /// Sends the writes of `batch`, waits for all of them, then launches its reads
    /// without waiting.
    pub async fn flush(&mut self, batch: Batch) {
        let (writes, reads) = batch.into_parts();

        if !writes.is_empty() {
            tracing::debug!("Flushing writes to {} buckets", writes.len());
            let mut write_calls = JoinSet::new();
            for (bucket, requests) in writes {
                let (client, url, sink) = self.endpoint(bucket);
                write_calls.spawn(async move {
                    post_batch(&client, &url, bucket, Action::Write, requests, &sink).await
                });
            }
            while let Some(joined) = write_calls.join_next().await {
                self.summary.record(joined.unwrap_or_else(|e| Err(e.into())));
            }
        }

        if !reads.is_empty() {
            tracing::debug!("Flushing reads to {} buckets", reads.len());
            for (bucket, requests) in reads {
                let (client, url, sink) = self.endpoint(bucket);
                self.in_flight.spawn(async move {
                    post_batch(&client, &url, bucket, Action::Read, requests, &sink).await
                });
            }
        }

        self.reap_finished();
    }

    /// Waits for every outstanding read call and returns everything recorded so far.
    pub async fn join_all(&mut self) -> DispatchSummary {
        while let Some(joined) = self.in_flight.join_next().await {
            self.summary.record(joined.unwrap_or_else(|e| Err(e.into())));
        }
        std::mem::take(&mut self.summary)
    }

    /// Number of read calls spawned but not yet joined.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.in_flight.try_join_next() {
            self.summary.record(joined.unwrap_or_else(|e| Err(e.into())));
        }
    }

    fn endpoint(&self, bucket: usize) -> (reqwest::Client, String, ResultSink) {
        (
            self.client.clone(),
            self.worker_urls[bucket].clone(),
            self.sink.clone(),
        )
    }
}

/// Posts one bucket's requests and forwards the result lines to `sink`.
///
/// Returns the number of lines forwarded. Nothing is forwarded unless the response
/// answers every request in order.
pub async fn post_batch(
    client: &reqwest::Client,
    url: &str,
    bucket: usize,
    action: Action,
    requests: Vec<StoreRequest>,
    sink: &ResultSink,
) -> Result<usize, DispatchError> {
    let response = match client.post(url).json(&requests).send().await {
        Ok(response) => response,
        Err(source) => {
            return Err(DispatchError::Transport {
                bucket,
                action,
                request_ids: request_ids(&requests),
                source,
            });
        }
    };

    if !response.status().is_success() {
        return Err(DispatchError::Status {
            bucket,
            action,
            request_ids: request_ids(&requests),
            status: response.status(),
        });
    }

    let body: StoreResponse = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            return Err(DispatchError::Malformed {
                bucket,
                action,
                request_ids: request_ids(&requests),
                reason: e.to_string(),
            });
        }
    };

    if let Some(reason) = mismatch(&requests, &body.result) {
        return Err(DispatchError::Malformed {
            bucket,
            action,
            request_ids: request_ids(&requests),
            reason,
        });
    }

    let count = body.result.len();
    for line in body.result {
        if sink.send(line).is_err() {
            tracing::debug!("Result sink closed, dropping remaining lines");
            break;
        }
    }
    Ok(count)
}

fn mismatch(requests: &[StoreRequest], results: &[String]) -> Option<String> {
    if requests.len() != results.len() {
        return Some(format!(
            "expected {} results, got {}",
            requests.len(),
            results.len()
        ));
    }

    requests
        .iter()
        .zip(results)
        .position(|(request, line)| {
            line.split_once(',')
                .map_or(true, |(id, _)| id != request.request_id)
        })
        .map(|i| format!("result {} does not answer request {}", i, requests[i].request_id))
}

fn request_ids(requests: &[StoreRequest]) -> Vec<String> {
    requests.iter().map(|r| r.request_id.clone()).collect()
}
