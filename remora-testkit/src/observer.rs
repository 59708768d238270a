use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use remora::{InProcEventBus, TaskEvent, TaskEventPayload, TaskEventPublisher};

/// Event sink that records everything it publishes.
///
/// Wraps an [`InProcEventBus`] so subscribers still work, while keeping a
/// copy of every event for assertions after the fact.
pub struct RecordingEvents {
    bus: InProcEventBus,
    seen: Arc<Mutex<Vec<TaskEvent>>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self {
            bus: InProcEventBus::default(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<TaskEvent> {
        self.seen.lock().clone()
    }

    /// Number of recorded submissions.
    pub fn submitted(&self) -> usize {
        self.count(|payload| matches!(payload, TaskEventPayload::Submitted))
    }

    /// Number of recorded completions.
    pub fn completed(&self) -> usize {
        self.count(|payload| {
            matches!(payload, TaskEventPayload::Completed { .. })
        })
    }

    /// Number of recorded task panics.
    pub fn panicked(&self) -> usize {
        self.count(|payload| {
            matches!(payload, TaskEventPayload::Panicked { .. })
        })
    }

    fn count(&self, predicate: impl Fn(&TaskEventPayload) -> bool) -> usize {
        self.seen
            .lock()
            .iter()
            .filter(|event| predicate(&event.payload))
            .count()
    }
}

impl Default for RecordingEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskEventPublisher for RecordingEvents {
    async fn publish(&self, event: TaskEvent) -> anyhow::Result<()> {
        self.seen.lock().push(event.clone());
        self.bus.publish_event(event);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.bus.subscribe_events()
    }
}
