use super::types::BucketLoad;

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::num::NonZeroUsize;

/// Least-loaded bucket assignment with sticky per-object affinity.
///
/// Buckets sit in a min-heap keyed by `(load_bytes, bucket_id)`, so ties go to the
/// lowest id. Once an object is placed, every later request for it resolves from
/// the assignment cache and its size no longer influences placement.
pub struct LoadBalancer {
    heap: BinaryHeap<Reverse<(u64, usize)>>,
    assignments: HashMap<String, usize>,
}

impl LoadBalancer {
    pub fn new(bucket_count: NonZeroUsize) -> Self {
        Self {
            heap: (0..bucket_count.get()).map(|id| Reverse((0, id))).collect(),
            assignments: HashMap::new(),
        }
    }

    /// Returns the bucket owning `object_id`, placing it on the least-loaded
    /// bucket on first sight. `write_size` is 0 for reads.
    ///
    /// The heap always holds one entry per bucket and there is at least one bucket.
    pub fn assign(&mut self, object_id: &str, write_size: u64) -> usize {
        if let Some(&bucket) = self.assignments.get(object_id) {
            return bucket;
        }

        let mut bucket = 0;
        // The heap re-sifts when the peeked entry is dropped.
        if let Some(mut least) = self.heap.peek_mut() {
            let Reverse((load, id)) = &mut *least;
            *load = load.saturating_add(write_size);
            bucket = *id;
        }
        self.assignments.insert(object_id.to_string(), bucket);
        bucket
    }

    pub fn bucket_of(&self, object_id: &str) -> Option<usize> {
        self.assignments.get(object_id).copied()
    }

    pub fn bucket_count(&self) -> usize {
        self.heap.len()
    }

    pub fn assigned_objects(&self) -> usize {
        self.assignments.len()
    }

    /// Current load of every bucket, ordered by bucket id.
    pub fn loads(&self) -> Vec<BucketLoad> {
        let mut loads: Vec<BucketLoad> = self
            .heap
            .iter()
            .map(|Reverse((load_bytes, bucket))| BucketLoad {
                bucket: *bucket,
                load_bytes: *load_bytes,
            })
            .collect();
        loads.sort_by_key(|load| load.bucket);
        loads
    }
}
