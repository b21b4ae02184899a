//! The current-connection cell shared between the producer and the worker.
//!
//! A handle is an id plus a lifecycle tag packed into one `AtomicU64`, so
//! supersession, installation and retirement are single atomic operations.
//! Staleness is decided by comparing packed words, never by inspecting a
//! socket.

use std::sync::atomic::{AtomicU64, Ordering};

use shared::domain::ConnectionId;

const TAG_BITS: u32 = 2;
const TAG_MASK: u64 = (1 << TAG_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Connecting,
    Open,
    Closed,
}

impl HandleState {
    fn tag(self) -> u64 {
        match self {
            Self::Closed => 0,
            Self::Connecting => 1,
            Self::Open => 2,
        }
    }

    fn from_tag(tag: u64) -> Self {
        match tag {
            1 => Self::Connecting,
            2 => Self::Open,
            _ => Self::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub state: HandleState,
}

impl ConnectionHandle {
    pub const ABSENT: Self = Self {
        id: ConnectionId::NONE,
        state: HandleState::Closed,
    };

    pub fn new(id: ConnectionId, state: HandleState) -> Self {
        Self { id, state }
    }

    pub fn is_open(&self) -> bool {
        self.state == HandleState::Open
    }

    fn pack(self) -> u64 {
        (self.id.0 << TAG_BITS) | self.state.tag()
    }

    fn unpack(raw: u64) -> Self {
        Self {
            id: ConnectionId(raw >> TAG_BITS),
            state: HandleState::from_tag(raw & TAG_MASK),
        }
    }
}

#[derive(Debug)]
pub struct HandleCell {
    raw: AtomicU64,
}

impl Default for HandleCell {
    fn default() -> Self {
        Self {
            raw: AtomicU64::new(ConnectionHandle::ABSENT.pack()),
        }
    }
}

impl HandleCell {
    pub fn load(&self) -> ConnectionHandle {
        ConnectionHandle::unpack(self.raw.load(Ordering::Acquire))
    }

    /// Makes `next` current unconditionally and returns whatever it replaced.
    pub fn replace(&self, next: ConnectionHandle) -> ConnectionHandle {
        ConnectionHandle::unpack(self.raw.swap(next.pack(), Ordering::AcqRel))
    }

    /// Moves `id` from `from` to `to` only if it is still the current handle in
    /// state `from`. Returns `false` when another transition got there first.
    pub fn transition(&self, id: ConnectionId, from: HandleState, to: HandleState) -> bool {
        self.raw
            .compare_exchange(
                ConnectionHandle::new(id, from).pack(),
                ConnectionHandle::new(id, to).pack(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub fn is_current_open(&self, id: ConnectionId) -> bool {
        self.load() == ConnectionHandle::new(id, HandleState::Open)
    }
}

#[cfg(test)]
#[path = "tests/handle_tests.rs"]
mod tests;
