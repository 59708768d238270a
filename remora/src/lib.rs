//! Remora - a small concurrent task-coordination core.
//!
//! Three pieces with real concurrency engineering, and nothing else: a
//! bounded-concurrency request dispatcher, a fault-isolating task
//! executor, and a data-parallel partitioning engine with fan-out/fan-in
//! completion synchronization.
//!
//! # Core Concepts
//!
//! - **Task**: one unit of work — input arguments, a pure function, and a
//!   private single-use response conduit read through a [`TaskHandle`].
//!
//! - **Dispatcher**: owner of a fixed worker pool and a single shared
//!   intake. Submission applies backpressure: with no worker free, the
//!   caller suspends, bounding outstanding work to the pool size.
//!
//! - **Workers**: each task body runs under a panic guard at the worker
//!   boundary; a malfunctioning task is reported and isolated, never
//!   fatal to the pool or to sibling tasks.
//!
//! - **Partition engine**: splits an elementwise vector computation into
//!   contiguous disjoint index ranges, one concurrent activity per range,
//!   and suspends the caller until a [`CompletionBarrier`] confirms every
//!   range finished. No locks guard the data: disjointness is carried by
//!   ownership.
//!
//! - **Events**: task lifecycle transitions are published on an
//!   in-process broadcast bus for observability.
//!
//! # Coordination rule
//!
//! Shared mutable state is never directly accessed by more than one
//! concurrent activity. All coordination happens via message passing
//! (the intake and response conduits) or the barrier's atomic counter.
//!
//! # Example
//!
//! ```ignore
//! use remora::{Dispatcher, DispatcherConfig, Task};
//!
//! let dispatcher = Dispatcher::start(DispatcherConfig::new(5));
//! let (task, handle) = Task::from_fn(vec![3, 4, 5], |args| args.iter().sum());
//! dispatcher.submit(task).await?;
//! assert_eq!(handle.read().await?, 12);
//! dispatcher.shutdown().await?;
//! ```

/// Counting completion barrier for fan-in synchronization.
///
/// The `barrier` module provides [`CompletionBarrier`], armed once for a
/// group of concurrent activities and waited on until all have signaled.
pub mod barrier;

/// Dispatcher configuration.
///
/// The `config` module defines [`DispatcherConfig`], the explicit
/// constructor parameter that fixes the worker pool size.
pub mod config;

/// Bounded-concurrency task dispatch.
///
/// The `dispatch` module provides the [`Dispatcher`] and its builder:
/// a fixed worker pool pulling from a shared intake, with backpressure
/// on submission, per-task failure isolation, and close-to-drain
/// shutdown.
pub mod dispatch;

/// Typed errors for the public contract surface.
///
/// The `error` module defines [`SubmitError`], [`ResponseError`], and
/// [`PartitionError`].
pub mod error;

/// Task lifecycle events.
///
/// The `events` module provides [`TaskEvent`] and [`TaskEventPayload`],
/// the [`TaskEventPublisher`] seam, and the broadcast-backed
/// [`InProcEventBus`].
pub mod events;

/// Data-parallel partitioned apply.
///
/// The `partition` module computes contiguous disjoint index ranges via
/// [`partition_bounds`](partition::partition_bounds) and runs an
/// elementwise operation across them with [`partition::apply`].
pub mod partition;

/// Core task definitions.
///
/// The `task` module defines [`Task`], [`TaskId`], [`TaskHandle`], and
/// the [`Operation`] function type.
pub mod task;

/// Tracing span helpers for dispatch and apply.
pub mod telemetry;

pub use barrier::CompletionBarrier;
pub use config::DispatcherConfig;
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::{PartitionError, ResponseError, SubmitError};
pub use events::{
    EventMeta, InProcEventBus, TaskEvent, TaskEventPayload, TaskEventPublisher,
};
pub use task::{Operation, Task, TaskHandle, TaskId};
