use super::error::DispatchError;

use std::time::Duration;

/// Cumulative bytes routed to one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketLoad {
    pub bucket: usize,
    pub load_bytes: u64,
}

/// Calls joined by the dispatcher so far.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    /// Result lines received from workers.
    pub confirmed: usize,
    pub failures: Vec<DispatchError>,
}

impl DispatchSummary {
    pub fn record(&mut self, outcome: Result<usize, DispatchError>) {
        match outcome {
            Ok(lines) => self.confirmed += lines,
            Err(e) => {
                tracing::error!(
                    "Dispatch failed ({} requests unconfirmed): {}",
                    e.request_ids().len(),
                    e
                );
                self.failures.push(e);
            }
        }
    }
}

/// Outcome of a complete router run.
#[derive(Debug)]
pub struct RunReport {
    pub processed: u64,
    pub flushes: u64,
    pub confirmed: usize,
    pub failures: Vec<DispatchError>,
    pub loads: Vec<BucketLoad>,
    pub elapsed: Duration,
}

impl RunReport {
    /// Request ids that belonged to a failed batch and got no result.
    pub fn unconfirmed_request_ids(&self) -> Vec<&str> {
        self.failures
            .iter()
            .flat_map(|e| e.request_ids().iter().map(String::as_str))
            .collect()
    }

    pub fn total_load(&self) -> u64 {
        self.loads.iter().map(|load| load.load_bytes).sum()
    }
}
