//! Worker Storage Module
//!
//! Implements the worker side of the system: a memory-resident object store
//! exposed through a single batch endpoint.
//!
//! ## Core Concepts
//! - **Store**: `WorkerStore` maps object ids to content hashes behind one reader/writer lock.
//! - **Batches**: a request array is applied in order and answered line-for-line, so the
//!   router can correlate results positionally.
//! - **Protocol**: `protocol` holds the DTOs and endpoint paths shared with the router.

pub mod handlers;
pub mod memory;
pub mod protocol;

#[cfg(test)]
mod tests;
