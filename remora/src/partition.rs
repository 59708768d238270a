use std::ops::Range;
use std::sync::Arc;

use tracing::Instrument;

use crate::barrier::CompletionBarrier;
use crate::error::PartitionError;
use crate::telemetry;

/// Split `[0, len)` into `partitions` contiguous, non-overlapping,
/// collectively-exhaustive sub-ranges.
///
/// Partition `i` covers `i*len/partitions .. (i+1)*len/partitions` using
/// integer division; boundaries are not equal-sized, the last partition
/// absorbs the truncation remainder. With `partitions > len` some ranges
/// are empty. `partitions == 0` yields no ranges; callers that require a
/// positive count validate before calling.
pub fn partition_bounds(len: usize, partitions: usize) -> Vec<Range<usize>> {
    (0..partitions)
        .map(|i| (i * len / partitions)..((i + 1) * len / partitions))
        .collect()
}

/// Apply `op` elementwise across `v` and `u`, split over `partitions`
/// concurrent activities: `v[i] = op(v[i], u[i])`.
///
/// The vector is carved into one owned chunk per partition at the
/// [`partition_bounds`] boundaries, so disjoint write access is a
/// property of ownership rather than locking. One activity is launched
/// per partition (empty partitions complete immediately); each signals a
/// [`CompletionBarrier`] on completion, and the caller suspends on the
/// barrier until every partition has reported before reassembling the
/// chunks in partition order. Completion order across partitions is
/// unspecified.
///
/// `op` is expected to be pure. If it panics, the error is surfaced as
/// [`PartitionError::Panicked`] and `v` is left in an unspecified state.
pub async fn apply<F>(
    v: &mut Vec<f64>,
    u: &[f64],
    op: F,
    partitions: usize,
) -> Result<(), PartitionError>
where
    F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
    if partitions == 0 {
        return Err(PartitionError::ZeroPartitions);
    }
    if u.len() != v.len() {
        return Err(PartitionError::LengthMismatch {
            left: v.len(),
            right: u.len(),
        });
    }

    let len = v.len();
    let span = telemetry::partition_apply_span(len, partitions);
    let op = Arc::new(op);

    let work = async move {
        let bounds = partition_bounds(len, partitions);
        let barrier = CompletionBarrier::new(partitions);

        // carve into owned chunks, splitting off the tail range first
        let mut tail = std::mem::take(v);
        let mut chunks: Vec<Vec<f64>> = Vec::with_capacity(partitions);
        for range in bounds.iter().rev() {
            chunks.push(tail.split_off(range.start));
        }
        chunks.reverse();

        let mut handles = Vec::with_capacity(partitions);
        for (range, mut chunk) in bounds.into_iter().zip(chunks) {
            let rhs: Vec<f64> = u[range].to_vec();
            let op = Arc::clone(&op);
            let done = SignalOnDrop(barrier.clone());
            handles.push(tokio::spawn(async move {
                // the guard signals even if `op` unwinds, so the barrier
                // below cannot be left waiting on a dead partition
                let _done = done;
                for (slot, rhs) in chunk.iter_mut().zip(&rhs) {
                    *slot = op(*slot, *rhs);
                }
                chunk
            }));
        }

        barrier.wait().await;

        let mut assembled = Vec::with_capacity(len);
        for handle in handles {
            match handle.await {
                Ok(chunk) => assembled.extend(chunk),
                Err(err) => {
                    tracing::error!("partition activity failed: {err:?}");
                    return Err(PartitionError::Panicked);
                }
            }
        }
        *v = assembled;
        Ok(())
    };
    work.instrument(span).await
}

struct SignalOnDrop(CompletionBarrier);

impl Drop for SignalOnDrop {
    fn drop(&mut self) {
        self.0.signal();
    }
}
