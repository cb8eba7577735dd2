use crate::storage::protocol::{Action, StoreRequest};

use std::collections::BTreeMap;

/// Requests of one batching window, grouped by bucket and split by action.
///
/// Within each bucket the requests keep their arrival order.
#[derive(Debug, Default)]
pub struct Batch {
    pub writes: BTreeMap<usize, Vec<StoreRequest>>,
    pub reads: BTreeMap<usize, Vec<StoreRequest>>,
    len: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: usize, request: StoreRequest) {
        let target = match request.action {
            Action::Write => &mut self.writes,
            Action::Read => &mut self.reads,
        };
        target.entry(bucket).or_default().push(request);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Splits the batch into its write and read halves.
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<usize, Vec<StoreRequest>>,
        BTreeMap<usize, Vec<StoreRequest>>,
    ) {
        (self.writes, self.reads)
    }
}
