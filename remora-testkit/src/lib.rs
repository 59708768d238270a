//! Test support for remora.
//!
//! Canned task operations (summing, constant, panicking, slow) and a
//! recording event sink, shared by remora's integration tests, benches,
//! and examples.

pub mod observer;
pub mod ops;

pub use observer::RecordingEvents;
