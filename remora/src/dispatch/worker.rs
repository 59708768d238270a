use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::events::{EventMeta, TaskEvent, TaskEventPayload, TaskEventPublisher};
use crate::task::Task;
use crate::telemetry;

/// The shared intake conduit.
///
/// Workers share the single consumer end of the intake channel. The mutex
/// guards the channel endpoint, never task data; each task value still
/// moves to exactly one worker through `recv`.
pub(crate) type SharedIntake = Arc<Mutex<mpsc::Receiver<Task>>>;

/// A worker's main loop: pull tasks from the shared intake until it
/// closes, executing each under a panic guard.
pub(crate) async fn worker_loop(
    worker_id: usize,
    intake: SharedIntake,
    events: Arc<dyn TaskEventPublisher>,
) {
    tracing::debug!(worker_id, "worker started");
    loop {
        let next = {
            let mut receiver = intake.lock().await;
            receiver.recv().await
        };
        let Some(task) = next else {
            tracing::debug!(worker_id, "intake closed, worker exiting");
            break;
        };
        run_guarded(worker_id, task, events.as_ref()).await;
    }
}

/// Execute one task body, isolating any panic at the worker boundary.
///
/// A panicking operation is reported with the task's identifying context
/// and must never terminate the worker: the unwind is caught, the
/// response sender is dropped (callers observe an unwritten conduit), and
/// the loop proceeds to the next task.
async fn run_guarded(
    worker_id: usize,
    task: Task,
    events: &dyn TaskEventPublisher,
) {
    let (id, args, operation, response) = task.into_parts();
    let span = telemetry::task_execute_span(&id, worker_id);
    let outcome = {
        let _guard = span.enter();
        panic::catch_unwind(AssertUnwindSafe(|| operation(&args)))
    };
    match outcome {
        Ok(value) => {
            // the caller may have dropped its handle; nothing to do then
            let _ = response.send(value);
            let event = TaskEvent {
                meta: EventMeta::new(id, Some(worker_id)),
                payload: TaskEventPayload::Completed { value },
            };
            if let Err(err) = events.publish(event).await {
                tracing::warn!("publish complete event failed: {err}");
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(
                task_id = %id,
                worker_id,
                %message,
                "task body panicked; worker continues"
            );
            drop(response);
            let event = TaskEvent {
                meta: EventMeta::new(id, Some(worker_id)),
                payload: TaskEventPayload::Panicked { message },
            };
            if let Err(err) = events.publish(event).await {
                tracing::warn!("publish panic event failed: {err}");
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
