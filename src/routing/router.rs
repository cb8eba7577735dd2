//! Request Router
//!
//! `ObjectRouter` owns all router-side state: the load balancer with its assignment
//! cache, the batch being accumulated, and the dispatcher. It is driven by a single
//! thread of control, so none of that state needs locking.

use super::balancer::LoadBalancer;
use super::batch::Batch;
use super::dispatcher::{Dispatcher, ResultSink};
use super::error::{InputError, RouterError};
use super::types::{BucketLoad, RunReport};
use crate::config::{ConfigError, RouterConfig};
use crate::storage::protocol::StoreRequest;

use std::num::NonZeroUsize;
use std::time::Instant;

pub struct ObjectRouter {
    balancer: LoadBalancer,
    dispatcher: Dispatcher,
    batch: Batch,
    batch_size: usize,
    progress_interval: u64,
    processed: u64,
    flushes: u64,
}

impl ObjectRouter {
    pub fn new(config: &RouterConfig, sink: ResultSink) -> Result<Self, ConfigError> {
        let buckets = NonZeroUsize::new(config.bucket_count()).ok_or(ConfigError::NoWorkers)?;
        if config.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        for (bucket, url) in config.worker_urls.iter().enumerate() {
            tracing::info!("Worker address for {}: {}", bucket, url);
        }

        Ok(Self {
            balancer: LoadBalancer::new(buckets),
            dispatcher: Dispatcher::new(config.worker_urls.clone(), sink),
            batch: Batch::new(),
            batch_size: config.batch_size,
            progress_interval: config.progress_interval.max(1),
            processed: 0,
            flushes: 0,
        })
    }

    /// Resolves the bucket for a request, placing its object on first sight.
    pub fn assign(&mut self, request: &StoreRequest) -> usize {
        self.balancer.assign(&request.object_id, request.load_bytes())
    }

    /// Adds a request to the current window, flushing once the window is full.
    pub async fn submit(&mut self, request: StoreRequest) {
        let bucket = self.assign(&request);
        self.batch.push(bucket, request);
        self.processed += 1;

        if self.batch.len() >= self.batch_size {
            self.flush().await;
        }
        if self.processed % self.progress_interval == 0 {
            tracing::info!("Processed to {}", self.processed);
        }
    }

    /// Dispatches the current window. Returns once its writes are confirmed.
    pub async fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.batch);
        self.flushes += 1;
        self.dispatcher.flush(batch).await;
    }

    /// Consumes the whole request stream and joins every dispatched call.
    ///
    /// The first malformed record aborts the run; calls already dispatched are
    /// still joined before the error is returned.
    pub async fn run<I>(&mut self, requests: I) -> Result<RunReport, RouterError>
    where
        I: IntoIterator<Item = Result<StoreRequest, InputError>>,
    {
        let started = Instant::now();
        tracing::info!("Run router with {} buckets", self.balancer.bucket_count());

        for request in requests {
            match request {
                Ok(request) => self.submit(request).await,
                Err(e) => {
                    tracing::error!("Aborting run: {}", e);
                    self.dispatcher.join_all().await;
                    return Err(e.into());
                }
            }
        }

        Ok(self.finish(started).await)
    }

    /// Flushes the last partial window and waits for all outstanding calls.
    pub async fn finish(&mut self, started: Instant) -> RunReport {
        self.flush().await;
        tracing::info!("Processed to {}", self.processed);
        tracing::debug!("Joining {} outstanding read calls", self.dispatcher.in_flight());

        let summary = self.dispatcher.join_all().await;
        RunReport {
            processed: self.processed,
            flushes: self.flushes,
            confirmed: summary.confirmed,
            failures: summary.failures,
            loads: self.loads(),
            elapsed: started.elapsed(),
        }
    }

    pub fn loads(&self) -> Vec<BucketLoad> {
        self.balancer.loads()
    }

    pub fn bucket_of(&self, object_id: &str) -> Option<usize> {
        self.balancer.bucket_of(object_id)
    }
}
