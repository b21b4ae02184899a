//! Glue between the control surface and the [`CommandDispatcher`].
//!
//! The UI hands over raw text and normalized axis values; the coordinator
//! validates, maps and forwards them, and folds its own validation errors and
//! the dispatcher's asynchronous failures into one event stream.

use dispatcher::{CommandDispatcher, SendOutcome};
use shared::{
    domain::{ConnectionId, ControlValues},
    error::{DispatchFailure, FailureNotice, ValidationError},
};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, warn};

mod validation;

pub use validation::validate_endpoint;

const VALIDATION_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    Validation(ValidationError),
    Dispatch(DispatchFailure),
}

impl CoordinatorEvent {
    /// Text meant to be shown to the user as is.
    pub fn description(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Dispatch(failure) => failure.description(),
        }
    }

    pub fn notice(&self) -> FailureNotice {
        match self {
            Self::Validation(err) => FailureNotice::from(*err),
            Self::Dispatch(failure) => FailureNotice::from(failure),
        }
    }
}

#[derive(Clone, Copy)]
enum Source {
    Validation,
    Dispatch,
}

/// Merged view over validation errors and dispatcher failures.
pub struct CoordinatorEvents {
    validation: broadcast::Receiver<ValidationError>,
    dispatch: broadcast::Receiver<DispatchFailure>,
    validation_open: bool,
    dispatch_open: bool,
}

impl CoordinatorEvents {
    /// Waits for the next event. `None` once both sources are closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<CoordinatorEvent> {
        loop {
            let (source, received) = tokio::select! {
                event = self.validation.recv(), if self.validation_open => {
                    (Source::Validation, event.map(CoordinatorEvent::Validation))
                }
                event = self.dispatch.recv(), if self.dispatch_open => {
                    (Source::Dispatch, event.map(CoordinatorEvent::Dispatch))
                }
                else => return None,
            };
            match received {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagged; notifications dropped");
                }
                Err(RecvError::Closed) => match source {
                    Source::Validation => self.validation_open = false,
                    Source::Dispatch => self.dispatch_open = false,
                },
            }
        }
    }

    /// Returns an already delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<CoordinatorEvent> {
        loop {
            match self.validation.try_recv() {
                Ok(event) => return Some(CoordinatorEvent::Validation(event)),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        loop {
            match self.dispatch.try_recv() {
                Ok(event) => return Some(CoordinatorEvent::Dispatch(event)),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

pub struct InputCoordinator {
    dispatcher: CommandDispatcher,
    validation: broadcast::Sender<ValidationError>,
    host: String,
    port: String,
    values: ControlValues,
}

impl InputCoordinator {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        let (validation, _) = broadcast::channel(VALIDATION_CHANNEL_CAPACITY);
        Self {
            dispatcher,
            validation,
            host: String::new(),
            port: String::new(),
            values: ControlValues::default(),
        }
    }

    pub fn subscribe_events(&self) -> CoordinatorEvents {
        CoordinatorEvents {
            validation: self.validation.subscribe(),
            dispatch: self.dispatcher.subscribe_failures(),
            validation_open: true,
            dispatch_open: true,
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn set_host(&mut self, text: impl Into<String>) {
        self.host = text.into();
    }

    pub fn set_port(&mut self, text: impl Into<String>) {
        self.port = text.into();
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Remembers the field text, then behaves like [`Self::connect_current`].
    pub fn connect(&mut self, host: &str, port: &str) -> Result<ConnectionId, ValidationError> {
        self.set_host(host);
        self.set_port(port);
        self.connect_current()
    }

    /// Validates the stored host/port text and asks the dispatcher to connect.
    ///
    /// A validation error is returned and also published to subscribers; it
    /// never reaches the dispatcher.
    pub fn connect_current(&mut self) -> Result<ConnectionId, ValidationError> {
        match validate_endpoint(&self.host, &self.port) {
            Ok(endpoint) => Ok(self.dispatcher.connect(endpoint)),
            Err(err) => {
                debug!(host = %self.host, port = %self.port, error = %err, "rejected endpoint");
                let _ = self.validation.send(err);
                Err(err)
            }
        }
    }

    /// `px`, `py`: joystick right/up; `pa`: horizontal slider; `pb`: vertical
    /// slider (throttle). All in `[0, 1]`.
    pub fn forward_values(&mut self, px: f32, py: f32, pa: f32, pb: f32) -> SendOutcome {
        self.set_values(ControlValues::from_normalized(px, py, pa, pb))
    }

    pub fn set_values(&mut self, values: ControlValues) -> SendOutcome {
        self.values = values;
        self.dispatcher.send(values)
    }

    pub fn last_values(&self) -> ControlValues {
        self.values
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
