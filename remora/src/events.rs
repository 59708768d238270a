use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::task::TaskId;

/// Metadata envelope attached to every task event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventMeta {
    pub version: u16,
    pub task_id: TaskId,
    /// Index of the worker that produced the event, if any.
    pub worker: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

impl EventMeta {
    pub fn new(task_id: TaskId, worker: Option<usize>) -> Self {
        Self {
            version: 1,
            task_id,
            worker,
            timestamp: Utc::now(),
        }
    }
}

/// Task lifecycle event with metadata and payload.
#[derive(Clone, Debug)]
pub struct TaskEvent {
    pub meta: EventMeta,
    pub payload: TaskEventPayload,
}

/// Event payload emitted for task lifecycle transitions.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum TaskEventPayload {
    /// Task was accepted onto the intake.
    Submitted,
    /// Task completed and its result was written to the response conduit.
    Completed { value: i64 },
    /// Task body panicked; the response conduit was left unwritten.
    Panicked { message: String },
}

/// Trait for publishing task lifecycle events.
#[async_trait]
pub trait TaskEventPublisher: Send + Sync {
    /// Publish an event to all subscribers.
    async fn publish(&self, event: TaskEvent) -> anyhow::Result<()>;
    /// Subscribe to task events.
    fn subscribe(&self) -> broadcast::Receiver<TaskEvent>;
}

/// In-process event bus over a tokio broadcast channel.
///
/// Events published while no subscriber exists are dropped; the bus is an
/// observability surface, never part of the task-processing path.
#[derive(Debug)]
pub struct InProcEventBus {
    sender: broadcast::Sender<TaskEvent>,
}

impl InProcEventBus {
    /// Create a bus with the given per-subscriber buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event, ignoring the absence of subscribers.
    pub fn publish_event(&self, event: TaskEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe_events(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }
}

impl Default for InProcEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl TaskEventPublisher for InProcEventBus {
    async fn publish(&self, event: TaskEvent) -> anyhow::Result<()> {
        self.publish_event(event);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.subscribe_events()
    }
}
