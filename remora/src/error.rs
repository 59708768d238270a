use thiserror::Error;

use crate::task::TaskId;

/// Errors returned from [`Dispatcher::submit`](crate::dispatch::Dispatcher::submit).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The dispatcher has been shut down and no longer accepts tasks.
    #[error("dispatcher is shut down and no longer accepts tasks")]
    ShutDown,
}

/// Errors returned from [`TaskHandle::read`](crate::task::TaskHandle::read).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// The worker executing the task failed before writing a result.
    ///
    /// The response conduit is written exactly once on success and never
    /// on failure; this variant is the explicit error value a caller sees
    /// instead of blocking forever on a conduit that will never fill.
    #[error("task {0} finished without writing a result")]
    Unwritten(TaskId),
}

/// Errors returned from [`partition::apply`](crate::partition::apply).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartitionError {
    /// The partition count was zero.
    #[error("partition count must be positive")]
    ZeroPartitions,

    /// The two input vectors differ in length.
    #[error("input vectors differ in length ({left} vs {right})")]
    LengthMismatch {
        /// Length of the mutated vector.
        left: usize,
        /// Length of the paired vector.
        right: usize,
    },

    /// A partition activity panicked while applying the operation.
    ///
    /// The mutated vector is left in an unspecified state.
    #[error("a partition activity panicked while applying the operation")]
    Panicked,
}
