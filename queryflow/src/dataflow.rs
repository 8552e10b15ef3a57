use rayon::prelude::*;

use crate::Query;

/// Runs a query over a slice of events split into disjoint partitions.
///
/// Each partition gets its own, exclusively owned, query instance which is
/// filled on a rayon worker. Once every partition has finished, the partial
/// results are merged on the calling thread, in partition order.
#[derive(Clone, Copy, Debug)]
pub struct Dataflow {
    partitions: usize,
}

impl Default for Dataflow {
    fn default() -> Self { Self::new() }
}

impl Dataflow {

    /// One partition per thread in the current rayon pool.
    pub fn new() -> Self {
        Self { partitions: rayon::current_num_threads() }
    }

    /// Use (at most) `n` partitions. Zero is treated as one.
    pub fn with_partitions(mut self, n: usize) -> Self {
        self.partitions = n.max(1);
        self
    }

    pub fn partitions(&self) -> usize { self.partitions }

    /// Fill one query per partition and merge the partial results.
    ///
    /// `make` builds a fresh, empty query; it is called once per partition and
    /// once more for the instance that performs the merge. `fill` feeds one
    /// event into a query. An error aborts the run; when several partitions
    /// fail, the error of the earliest partition is returned.
    pub fn run<E, Q, M, F>(&self, events: &[E], make: M, fill: F) -> Result<Q::Output, Q::Error>
    where
        E: Sync,
        Q: Query,
        Q::Error: Send,
        M: Fn() -> Result<Q, Q::Error> + Sync,
        F: Fn(&mut Q, &E) -> Result<(), Q::Error> + Sync,
    {
        let chunk_size = events.len().div_ceil(self.partitions).max(1);
        let partials = events
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(slot, chunk)| {
                let mut query = make()?;
                for event in chunk {
                    fill(&mut query, event)?;
                }
                tracing::debug!(slot, events = chunk.len(), "partition filled");
                Ok(query.result())
            })
            .collect::<Vec<Result<_, Q::Error>>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let merger = make()?;
        if partials.is_empty() {
            return Ok(merger.result());
        }
        let merged = merger.merge(&partials)?;
        tracing::info!(events = events.len(), partitions = partials.len(), "dataflow complete");
        Ok(merged)
    }
}
