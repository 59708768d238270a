use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::ResponseError;

/// Unique identifier for a task.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The pure function a task applies to its arguments.
pub type Operation = Arc<dyn Fn(&[i64]) -> i64 + Send + Sync>;

/// One unit of work: input arguments, a pure function to apply, and the
/// write side of a single-use response conduit.
///
/// A task is immutable once submitted and is consumed by exactly one
/// worker. The response conduit is a oneshot channel, so the single write
/// is enforced by the type system: sending consumes the sender.
pub struct Task {
    id: TaskId,
    args: Vec<i64>,
    operation: Operation,
    response: oneshot::Sender<i64>,
}

impl Task {
    /// Create a task and the handle its result is read from.
    pub fn new(args: Vec<i64>, operation: Operation) -> (Self, TaskHandle) {
        let id = TaskId::new();
        let (response, receiver) = oneshot::channel();
        let task = Self {
            id,
            args,
            operation,
            response,
        };
        let handle = TaskHandle {
            id,
            response: receiver,
        };
        (task, handle)
    }

    /// Convenience constructor wrapping a plain closure.
    pub fn from_fn<F>(args: Vec<i64>, operation: F) -> (Self, TaskHandle)
    where
        F: Fn(&[i64]) -> i64 + Send + Sync + 'static,
    {
        Self::new(args, Arc::new(operation))
    }

    /// The task's identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub(crate) fn into_parts(
        self,
    ) -> (TaskId, Vec<i64>, Operation, oneshot::Sender<i64>) {
        (self.id, self.args, self.operation, self.response)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// The caller's read side of a task's response conduit.
///
/// Exactly one value is ever written to the conduit, by exactly one
/// worker. If the worker fails before producing a value, the write side
/// is dropped and [`read`](Self::read) returns
/// [`ResponseError::Unwritten`] instead of suspending forever.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    response: oneshot::Receiver<i64>,
}

impl TaskHandle {
    /// The identifier of the task this handle belongs to.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Await the task's single result.
    pub async fn read(self) -> Result<i64, ResponseError> {
        let id = self.id;
        self.response
            .await
            .map_err(|_| ResponseError::Unwritten(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_reads_the_written_value() {
        let (task, handle) = Task::from_fn(vec![1, 2], |args| args.iter().sum());
        let (_, args, operation, response) = task.into_parts();
        response.send(operation(&args)).unwrap();
        assert_eq!(handle.read().await, Ok(3));
    }

    #[tokio::test]
    async fn test_dropped_response_surfaces_as_unwritten() {
        let (task, handle) = Task::from_fn(vec![], |_| 0);
        let id = task.id();
        drop(task);
        assert_eq!(handle.read().await, Err(ResponseError::Unwritten(id)));
    }
}
