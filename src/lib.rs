//! Byte-Balanced Object Router Library
//!
//! This library crate defines the modules shared by the router and worker processes.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`config`**: Command-line options and the resolved per-mode configuration.
//! - **`routing`**: The router. Places objects on buckets by least byte load with sticky
//!   affinity, batches requests per bucket and fans them out to the workers, confirming
//!   writes before the reads that follow them.
//! - **`storage`**: The worker. A memory-resident object store served over one batch
//!   endpoint, plus the wire protocol both sides speak.

pub mod config;
pub mod routing;
pub mod storage;
