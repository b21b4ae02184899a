//! The single consumer of the dispatch queue.
//!
//! Runs on its own thread and owns the only socket. Each task is driven to
//! completion on a current-thread runtime before the next one is taken, so
//! connect, write and close never overlap. A write stuck on a peer that
//! stopped reading is abandoned as soon as `connect()` publishes a newer id.

use std::{io, sync::Arc, time::Duration};

use crossbeam_channel::Receiver;
use shared::{
    domain::{ConnectionId, Endpoint},
    error::DispatchFailure,
};
use tokio::{
    io::AsyncWriteExt,
    runtime::Runtime,
    sync::{broadcast, watch},
};
use tracing::{debug, info, warn};

use crate::{
    handle::{HandleCell, HandleState},
    transport::{CommandWriter, Connector},
};

pub(crate) enum Task {
    Connect { id: ConnectionId, endpoint: Endpoint },
    Write { id: ConnectionId, payload: String },
}

struct Link {
    id: ConnectionId,
    writer: CommandWriter,
}

pub(crate) struct Worker {
    handle: Arc<HandleCell>,
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
    failures: broadcast::Sender<DispatchFailure>,
    latest: watch::Receiver<ConnectionId>,
    link: Option<Link>,
}

impl Worker {
    pub(crate) fn new(
        handle: Arc<HandleCell>,
        connector: Arc<dyn Connector>,
        connect_timeout: Duration,
        failures: broadcast::Sender<DispatchFailure>,
        latest: watch::Receiver<ConnectionId>,
    ) -> Self {
        Self {
            handle,
            connector,
            connect_timeout,
            failures,
            latest,
            link: None,
        }
    }

    pub(crate) fn run(mut self, runtime: Runtime, tasks: Receiver<Task>) {
        while let Ok(task) = tasks.recv() {
            match task {
                Task::Connect { id, endpoint } => runtime.block_on(self.connect(id, endpoint)),
                Task::Write { id, payload } => runtime.block_on(self.write(id, payload)),
            }
        }
        runtime.block_on(self.close_link());
        debug!("dispatch queue closed; worker exiting");
    }

    async fn connect(&mut self, id: ConnectionId, endpoint: Endpoint) {
        self.close_link().await;

        let attempt = tokio::time::timeout(self.connect_timeout, self.connector.connect(&endpoint))
            .await
            .unwrap_or_else(|_| {
                Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!(
                        "connect to {endpoint} timed out after {}ms",
                        self.connect_timeout.as_millis()
                    ),
                ))
            });

        match attempt {
            Ok(mut writer) => {
                if self
                    .handle
                    .transition(id, HandleState::Connecting, HandleState::Open)
                {
                    info!(connection_id = id.0, %endpoint, "connected");
                    self.link = Some(Link { id, writer });
                } else {
                    debug!(
                        connection_id = id.0,
                        %endpoint,
                        "connection superseded before it opened; closing"
                    );
                    let _ = writer.shutdown().await;
                }
            }
            Err(error) => {
                self.handle
                    .transition(id, HandleState::Connecting, HandleState::Closed);
                warn!(connection_id = id.0, %endpoint, %error, "connect failed");
                self.notify(DispatchFailure::connection_error(endpoint, error));
            }
        }
    }

    async fn write(&mut self, id: ConnectionId, payload: String) {
        if !self.handle.is_current_open(id) {
            debug!(connection_id = id.0, "dropping write for superseded connection");
            return;
        }

        let mut latest = self.latest.clone();
        let written = match self.link.as_mut() {
            Some(link) if link.id == id => {
                tokio::select! {
                    result = write_payload(&mut link.writer, &payload) => Some(result),
                    Ok(_) = latest.wait_for(|current| *current != id) => None,
                }
            }
            _ => {
                debug!(connection_id = id.0, "no socket for connection; dropping write");
                return;
            }
        };

        let Some(result) = written else {
            // Peer is not draining; drop closes without waiting on it.
            debug!(connection_id = id.0, "write abandoned for superseded connection");
            self.link = None;
            return;
        };

        if let Err(error) = result {
            self.close_link().await;
            // Only the transition out of Open may report; queued writes behind
            // this one fail the staleness check above.
            if self
                .handle
                .transition(id, HandleState::Open, HandleState::Closed)
            {
                warn!(connection_id = id.0, %error, "write failed; connection retired");
                self.notify(DispatchFailure::Disconnected { connection: id });
            }
        }
    }

    async fn close_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            debug!(connection_id = link.id.0, "closing socket");
            let _ = link.writer.shutdown().await;
        }
    }

    fn notify(&self, failure: DispatchFailure) {
        let _ = self.failures.send(failure);
    }
}

async fn write_payload(writer: &mut CommandWriter, payload: &str) -> io::Result<()> {
    writer.write_all(payload.as_bytes()).await?;
    writer.flush().await
}
