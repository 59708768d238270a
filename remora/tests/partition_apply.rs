//! Partition engine integration tests.
//!
//! Exercises the elementwise apply across partition counts, the fan-in
//! barrier (apply must not return before a delayed partition finishes),
//! and the misuse errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use remora::partition::apply;
use remora::PartitionError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_elementwise_add_across_three_partitions() {
    let mut v = vec![1.0, 2.0, 3.0];
    let u = vec![3.0, 2.0, 1.0];
    apply(&mut v, &u, |a, b| a + b, 3).await.unwrap();
    assert_eq!(v, vec![4.0, 4.0, 4.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_uneven_partitions_preserve_element_order() {
    let mut v: Vec<f64> = (0..100).map(f64::from).collect();
    let u = vec![1.0; 100];
    apply(&mut v, &u, |a, b| a + b, 7).await.unwrap();
    let expected: Vec<f64> = (0..100).map(|i| f64::from(i) + 1.0).collect();
    assert_eq!(v, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_more_partitions_than_elements_completes() {
    let mut v = vec![2.0, 4.0];
    let u = vec![10.0, 20.0];
    apply(&mut v, &u, |a, b| a * b, 5).await.unwrap();
    assert_eq!(v, vec![20.0, 80.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_partition_is_a_plain_loop() {
    let mut v = vec![1.0, 2.0, 3.0, 4.0];
    let u = vec![4.0, 3.0, 2.0, 1.0];
    apply(&mut v, &u, |a, b| a - b, 1).await.unwrap();
    assert_eq!(v, vec![-3.0, -1.0, 1.0, 3.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_vector_completes_immediately() {
    let mut v: Vec<f64> = Vec::new();
    let u: Vec<f64> = Vec::new();
    apply(&mut v, &u, |a, b| a + b, 3).await.unwrap();
    assert!(v.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_apply_waits_for_a_delayed_partition() {
    // the negative element marks the partition that stalls; the flag is
    // set by that partition just before it completes
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);

    let mut v = vec![0.0, 0.0, -1.0];
    let u = vec![1.0, 1.0, 1.0];
    let started = Instant::now();
    apply(
        &mut v,
        &u,
        move |a, b| {
            if a < 0.0 {
                std::thread::sleep(Duration::from_millis(200));
                flag.store(true, Ordering::SeqCst);
            }
            a + b
        },
        3,
    )
    .await
    .unwrap();

    assert!(
        finished.load(Ordering::SeqCst),
        "apply returned before the delayed partition signaled"
    );
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(v, vec![1.0, 1.0, 0.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panicking_operation_surfaces_as_an_error() {
    let mut v = vec![1.0, 2.0, 3.0, 4.0];
    let u = vec![0.0; 4];
    let result = apply(
        &mut v,
        &u,
        |a, _| {
            if a == 3.0 {
                panic!("bad element");
            }
            a
        },
        2,
    )
    .await;
    assert_eq!(result, Err(PartitionError::Panicked));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_partitions_is_rejected() {
    let mut v = vec![1.0];
    let u = vec![1.0];
    assert_eq!(
        apply(&mut v, &u, |a, _| a, 0).await,
        Err(PartitionError::ZeroPartitions)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_length_mismatch_is_rejected() {
    let mut v = vec![1.0];
    let u = vec![1.0, 2.0];
    assert_eq!(
        apply(&mut v, &u, |a, _| a, 1).await,
        Err(PartitionError::LengthMismatch { left: 1, right: 2 })
    );
}
