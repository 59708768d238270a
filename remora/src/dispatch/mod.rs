//! Bounded-concurrency task dispatch.
//!
//! A [`Dispatcher`] owns a fixed pool of workers and a single shared
//! intake conduit. Submitted tasks are handed to exactly one worker,
//! eventually, absent shutdown; no ordering is guaranteed across workers.
//! Each task body runs under a panic guard so one malfunctioning task
//! never takes down the pool or any other in-flight task.

mod dispatcher;
mod worker;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
