//! Background execution of long-running jobs.
//!
//! Each job runs on its own named thread. The caller keeps a [`JobHandle`] and
//! either blocks on it, waits with a deadline or polls.

use crate::{log_debug, log_error};
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The job thread could not be started
    SpawnFailed(String),
    /// The job panicked; carries the panic message
    Panicked(String),
    /// The wait deadline passed before the job finished
    TimedOut,
    /// The result was already taken
    Disconnected,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::SpawnFailed(err) => write!(f, "Failed to start background job: {}", err),
            WorkerError::Panicked(message) => write!(f, "Background job panicked: {}", message),
            WorkerError::TimedOut => write!(f, "Background job did not finish in time"),
            WorkerError::Disconnected => write!(f, "Background job result is no longer available"),
        }
    }
}

impl Error for WorkerError {}

type JobResult<T> = Result<T, WorkerError>;

/// Spawns jobs on named threads.
#[derive(Debug, Clone)]
pub struct Worker {
    name: String,
}

impl Default for Worker {
    fn default() -> Self {
        Self::new("sshm-worker")
    }
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Run `job` off the calling thread. `label` names the thread and the log lines.
    pub fn submit<T, F>(&self, label: &str, job: F) -> Result<JobHandle<T>, WorkerError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<JobResult<T>>(1);
        let label = label.to_string();
        let thread_label = label.clone();

        thread::Builder::new()
            .name(format!("{}-{}", self.name, label))
            .spawn(move || {
                log_debug!("Background job '{}' started", thread_label);
                let result = panic::catch_unwind(AssertUnwindSafe(job)).map_err(|payload| {
                    let message = panic_message(payload.as_ref());
                    log_error!("Background job '{}' panicked: {}", thread_label, message);
                    WorkerError::Panicked(message)
                });
                log_debug!("Background job '{}' finished", thread_label);
                // The handle may already be gone.
                let _ = tx.send(result);
            })
            .map_err(|err| WorkerError::SpawnFailed(err.to_string()))?;

        Ok(JobHandle { label, rx })
    }
}

/// Receiving end of one submitted job.
#[derive(Debug)]
pub struct JobHandle<T> {
    label: String,
    rx: Receiver<JobResult<T>>,
}

impl<T> JobHandle<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Block until the job finishes.
    pub fn wait(self) -> Result<T, WorkerError> {
        self.rx.recv().map_err(|_| WorkerError::Disconnected)?
    }

    /// Block for at most `timeout`. The job keeps running after a timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T, WorkerError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(WorkerError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// The result if the job is done, `None` while it is still running.
    pub fn try_result(&self) -> Option<Result<T, WorkerError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(WorkerError::Disconnected)),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "test/worker.rs"]
mod tests;
