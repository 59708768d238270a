//! Tracing instrumentation for task dispatch and partitioned apply.
//!
//! Span helpers for the points where work changes hands: submission onto
//! the intake, guarded execution on a worker, and a partitioned apply
//! call. All helpers are plain `info_span!` wrappers so callers decide
//! when to enter or instrument.

use tracing::{info_span, Span};

use crate::task::TaskId;

/// Create a tracing span for submitting a task to the dispatcher.
#[must_use]
pub fn submit_span(task_id: &TaskId) -> Span {
    info_span!("remora.submit", task_id = %task_id)
}

/// Create a tracing span for guarded execution of a task on a worker.
///
/// The span carries the task id and the index of the executing worker.
#[must_use]
pub fn task_execute_span(task_id: &TaskId, worker_id: usize) -> Span {
    info_span!(
        "remora.execute",
        task_id = %task_id,
        worker_id,
    )
}

/// Create a tracing span for a partitioned apply call.
#[must_use]
pub fn partition_apply_span(len: usize, partitions: usize) -> Span {
    info_span!("remora.apply", len, partitions)
}
