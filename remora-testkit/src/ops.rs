//! Canned operations for exercising the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use remora::Operation;

/// Sum the task's arguments.
pub fn summing() -> Operation {
    Arc::new(|args: &[i64]| args.iter().sum())
}

/// Ignore the arguments and return a fixed value.
pub fn constant(value: i64) -> Operation {
    Arc::new(move |_: &[i64]| value)
}

/// Panic with the given message instead of producing a result.
pub fn panicking(message: &'static str) -> Operation {
    Arc::new(move |_: &[i64]| panic!("{message}"))
}

/// Sleep for `delay`, then sum the arguments.
///
/// The sleep is a blocking one on purpose: it pins the executing worker
/// the way a long CPU-bound task body would.
pub fn slow_summing(delay: Duration) -> Operation {
    Arc::new(move |args: &[i64]| {
        std::thread::sleep(delay);
        args.iter().sum()
    })
}
