use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::Instrument;

use super::worker::worker_loop;
use crate::config::DispatcherConfig;
use crate::error::SubmitError;
use crate::events::{
    EventMeta, InProcEventBus, TaskEvent, TaskEventPayload, TaskEventPublisher,
};
use crate::task::Task;
use crate::telemetry;

/// Owner of a fixed worker pool and the shared task intake.
///
/// Exactly `pool_size` workers are alive for the lifetime of the
/// dispatcher; each submitted task is received by exactly one of them.
/// The intake is a bounded channel of capacity one, the closest rendering
/// of an unbuffered rendezvous: `submit` suspends until a worker frees
/// the slot, bounding outstanding work to the pool size plus the one
/// queued task.
pub struct Dispatcher {
    config: DispatcherConfig,
    intake: Mutex<Option<mpsc::Sender<Task>>>,
    events: Arc<dyn TaskEventPublisher>,
    worker_handles: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl Dispatcher {
    /// Start a dispatcher with the given configuration and a default
    /// in-process event bus.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `config.pool_size` is zero.
    pub fn start(config: DispatcherConfig) -> Self {
        DispatcherBuilder::new(config).start()
    }

    /// The dispatcher's configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Send a task on the intake.
    ///
    /// Suspends while no worker is ready to receive (backpressure). After
    /// [`shutdown`](Self::shutdown) has been called this fails fast with
    /// [`SubmitError::ShutDown`] instead of suspending.
    pub async fn submit(&self, task: Task) -> Result<(), SubmitError> {
        let sender = {
            let guard = self.intake.lock().await;
            match guard.as_ref() {
                Some(sender) => sender.clone(),
                None => return Err(SubmitError::ShutDown),
            }
        };

        let task_id = task.id();

        // published before the handoff so no worker event for this task
        // can precede it on the bus
        let event = TaskEvent {
            meta: EventMeta::new(task_id, None),
            payload: TaskEventPayload::Submitted,
        };
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!("publish submit event failed: {err}");
        }

        let span = telemetry::submit_span(&task_id);
        sender
            .send(task)
            .instrument(span)
            .await
            .map_err(|_| SubmitError::ShutDown)?;
        Ok(())
    }

    /// Subscribe to the task lifecycle event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    /// Shut the dispatcher down with close-to-drain semantics.
    ///
    /// Closes the intake: workers finish their in-flight task, drain
    /// anything already queued, then exit on observing the closed
    /// channel. Each worker is awaited under the configured drain
    /// timeout. Callers must not submit after initiating shutdown; a
    /// second call finds nothing left to do.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        tracing::info!("initiating dispatcher shutdown");

        {
            let mut guard = self.intake.lock().await;
            guard.take();
        }

        let handles = {
            let mut guard = self.worker_handles.lock().await;
            std::mem::take(&mut *guard)
        };

        let drain =
            tokio::time::Duration::from_secs(self.config.drain_timeout_secs);
        for handle in handles {
            match tokio::time::timeout(drain, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::warn!("worker task failed: {err:?}"),
                Err(_) => tracing::warn!(
                    "worker did not drain within {}s",
                    self.config.drain_timeout_secs
                ),
            }
        }

        tracing::info!("dispatcher shutdown complete");
        Ok(())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accepting = self
            .intake
            .try_lock()
            .map(|guard| guard.is_some())
            .unwrap_or(true);
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("accepting", &accepting)
            .finish_non_exhaustive()
    }
}

/// Builder assembling a dispatcher from its parts.
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    events: Option<Arc<dyn TaskEventPublisher>>,
}

impl DispatcherBuilder {
    /// Start building a dispatcher with the given configuration.
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            events: None,
        }
    }

    /// Use a custom event sink instead of the default in-process bus.
    pub fn with_events(mut self, events: Arc<dyn TaskEventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Launch the worker pool and return the running dispatcher.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if the configured pool size is zero.
    pub fn start(self) -> Dispatcher {
        assert!(
            self.config.pool_size > 0,
            "dispatcher pool size must be positive"
        );

        let events = self
            .events
            .unwrap_or_else(|| Arc::new(InProcEventBus::default()));

        let (sender, receiver) = mpsc::channel(1);
        let intake = Arc::new(Mutex::new(receiver));

        let mut handles = Vec::with_capacity(self.config.pool_size);
        for worker_id in 0..self.config.pool_size {
            let intake = Arc::clone(&intake);
            let events = Arc::clone(&events);
            handles.push(tokio::spawn(worker_loop(worker_id, intake, events)));
        }
        tracing::info!(pool_size = self.config.pool_size, "dispatcher started");

        Dispatcher {
            config: self.config,
            intake: Mutex::new(Some(sender)),
            events,
            worker_handles: Mutex::new(handles),
        }
    }
}
