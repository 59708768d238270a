//! Basic dispatcher and partition engine walkthrough.
//!
//! Starts a fixed worker pool, submits a few tasks, reads their results,
//! runs an elementwise apply across partitions, and shuts down.

use remora::partition;
use remora::{Dispatcher, DispatcherConfig, Task};
use remora_testkit::ops;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Remora Basic Example ===\n");

    // 1. Start a dispatcher with a pool of five workers.
    println!("1. Starting dispatcher (pool size 5)...");
    let dispatcher = Dispatcher::start(DispatcherConfig::new(5));

    // 2. Submit two summing tasks.
    println!("2. Submitting tasks...");
    let (first, first_handle) = Task::new(vec![3, 4, 5], ops::summing());
    let (second, second_handle) = Task::new(vec![1, -9], ops::summing());
    dispatcher.submit(first).await?;
    dispatcher.submit(second).await?;

    // 3. Read each task's private result conduit.
    println!("3. Reading results...");
    println!("   first answer:  {}", first_handle.read().await?);
    println!("   second answer: {}", second_handle.read().await?);

    // 4. Partitioned elementwise apply, one activity per partition.
    println!("4. Applying elementwise add across 3 partitions...");
    let mut v = vec![1.0, 2.0, 3.0];
    let u = vec![3.0, 2.0, 1.0];
    partition::apply(&mut v, &u, |a, b| a + b, 3).await?;
    println!("   result: {v:?}");

    // 5. Close-to-drain shutdown.
    println!("5. Shutting down...");
    dispatcher.shutdown().await?;

    println!("\n=== Example Complete ===");
    Ok(())
}
