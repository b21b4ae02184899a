//! Single-connection, rate-limited command dispatcher.
//!
//! [`CommandDispatcher`] owns one outbound socket to a simulator control port.
//! `connect()` and `send()` return immediately; all socket work happens on a
//! dedicated worker thread that drains one bounded queue in order. Failures are
//! published on a broadcast channel obtained from
//! [`CommandDispatcher::subscribe_failures`].

use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, Sender, TrySendError};
use shared::{
    domain::{ConnectionId, ControlValues, Endpoint},
    error::DispatchFailure,
    protocol::encode_update,
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

pub mod handle;
pub mod rate;
pub mod transport;
mod worker;

pub use handle::{ConnectionHandle, HandleState};
pub use rate::RateWindow;
pub use transport::{CommandWriter, Connector, TcpConnector};

use handle::HandleCell;
use worker::{Task, Worker};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(2000);
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_millis(10);
/// Sends admitted per window on top of the one that opens it.
pub const DEFAULT_RATE_LIMIT: u32 = 2;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
const FAILURE_CHANNEL_CAPACITY: usize = 64;
const WORKER_THREAD_NAME: &str = "fg-dispatch";

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub connect_timeout: Duration,
    pub rate_window: Duration,
    pub rate_limit: u32,
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            rate_window: DEFAULT_RATE_WINDOW,
            rate_limit: DEFAULT_RATE_LIMIT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// What happened to a single `send()`. None of these are errors; callers
/// streaming samples are free to ignore the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Queued(ConnectionId),
    RateLimited,
    NotConnected,
    QueueFull,
}

pub struct CommandDispatcher {
    handle: Arc<HandleCell>,
    tasks: Option<Sender<Task>>,
    rate: RateWindow,
    next_id: u64,
    failures: broadcast::Sender<DispatchFailure>,
    latest: watch::Sender<ConnectionId>,
    worker: Option<JoinHandle<()>>,
}

impl CommandDispatcher {
    pub fn new(config: DispatcherConfig) -> io::Result<Self> {
        Self::with_connector(config, Arc::new(TcpConnector))
    }

    pub fn with_connector(
        config: DispatcherConfig,
        connector: Arc<dyn Connector>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let handle = Arc::new(HandleCell::default());
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        let (tasks, task_rx) = bounded(config.queue_capacity.max(1));
        let (latest, latest_rx) = watch::channel(ConnectionId::NONE);

        let worker = Worker::new(
            Arc::clone(&handle),
            connector,
            config.connect_timeout,
            failures.clone(),
            latest_rx,
        );
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker.run(runtime, task_rx))?;

        Ok(Self {
            handle,
            tasks: Some(tasks),
            rate: RateWindow::new(config.rate_window, config.rate_limit),
            next_id: 0,
            failures,
            latest,
            worker: Some(worker),
        })
    }

    pub fn subscribe_failures(&self) -> broadcast::Receiver<DispatchFailure> {
        self.failures.subscribe()
    }

    pub fn current_handle(&self) -> ConnectionHandle {
        self.handle.load()
    }

    /// Supersedes the current connection and queues a new attempt.
    ///
    /// The old handle is invalidated before this returns, so any `send()` made
    /// afterwards is dropped until the new socket is open, and a write the
    /// worker is blocked on for the old socket is abandoned. The outcome of the
    /// attempt only ever surfaces as a [`DispatchFailure::ConnectionError`].
    pub fn connect(&mut self, endpoint: Endpoint) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        let previous = self
            .handle
            .replace(ConnectionHandle::new(id, HandleState::Connecting));
        self.latest.send_replace(id);
        debug!(
            connection_id = id.0,
            superseded = previous.id.0,
            %endpoint,
            "connection requested"
        );

        let refused = match self.enqueue(Task::Connect {
            id,
            endpoint: endpoint.clone(),
        }) {
            Ok(()) => return id,
            Err(TrySendError::Full(_)) => "dispatch queue is full",
            Err(TrySendError::Disconnected(_)) => "dispatch worker is not running",
        };

        self.handle
            .transition(id, HandleState::Connecting, HandleState::Closed);
        warn!(connection_id = id.0, %endpoint, reason = refused, "connect not queued");
        let _ = self.failures.send(DispatchFailure::connection_error(
            endpoint,
            io::Error::other(refused),
        ));
        id
    }

    pub fn send(&mut self, values: ControlValues) -> SendOutcome {
        self.send_at(values, Instant::now())
    }

    pub(crate) fn send_at(&mut self, values: ControlValues, now: Instant) -> SendOutcome {
        if !self.rate.admit(now) {
            return SendOutcome::RateLimited;
        }

        let snapshot = self.handle.load();
        if !snapshot.is_open() {
            return SendOutcome::NotConnected;
        }

        match self.enqueue(Task::Write {
            id: snapshot.id,
            payload: encode_update(&values),
        }) {
            Ok(()) => SendOutcome::Queued(snapshot.id),
            Err(_) => {
                debug!(connection_id = snapshot.id.0, "dispatch queue full; dropping update");
                SendOutcome::QueueFull
            }
        }
    }

    fn enqueue(&self, task: Task) -> Result<(), TrySendError<Task>> {
        match &self.tasks {
            Some(tasks) => tasks.try_send(task),
            None => Err(TrySendError::Disconnected(task)),
        }
    }
}

impl Drop for CommandDispatcher {
    fn drop(&mut self) {
        self.tasks.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("dispatch worker panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
