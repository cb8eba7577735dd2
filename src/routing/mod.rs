//! Routing Module
//!
//! The router side of the system: it reads a request stream, places every object on
//! a bucket, and ships per-bucket batches to the worker owning that bucket.
//!
//! ## Flow
//! 1. **Input**: `input` parses records lazily from the line-oriented stream.
//! 2. **Placement**: `balancer` sends a never-seen object to the least-loaded bucket
//!    (by bytes written) and pins it there for the rest of the process.
//! 3. **Batching**: `router` groups requests into per-bucket write and read batches and
//!    flushes every `batch_size` requests and once more at end of input.
//! 4. **Dispatch**: `dispatcher` fans each flush out concurrently, confirming all writes
//!    before the reads of the same flush are sent.
//!
//! ## Submodules
//! - **`balancer`**: min-heap of bucket loads plus the object-to-bucket assignment cache.
//! - **`batch`**: one batching window's requests.
//! - **`dispatcher`**: HTTP fan-out, write barrier and tracking of in-flight reads.
//! - **`router`**: `ObjectRouter`, which owns the state above and drives a run.
//! - **`error`** / **`types`**: error taxonomy and run statistics.

pub mod balancer;
pub mod batch;
pub mod dispatcher;
pub mod error;
pub mod input;
pub mod router;
pub mod types;
