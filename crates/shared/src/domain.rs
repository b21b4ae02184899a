use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(ConnectionId);

impl ConnectionId {
    /// Id carried by the handle before the first `connect()`.
    pub const NONE: Self = Self(0);
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One sample of the flight control surfaces.
///
/// Ranges are nominal only: aileron, elevator and rudder in [-1, 1],
/// throttle in [0, 1]. Nothing downstream clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlValues {
    pub aileron: f32,
    pub elevator: f32,
    pub rudder: f32,
    pub throttle: f32,
}

impl ControlValues {
    pub fn new(aileron: f32, elevator: f32, rudder: f32, throttle: f32) -> Self {
        Self {
            aileron,
            elevator,
            rudder,
            throttle,
        }
    }

    /// Maps raw UI axes in [0, 1] onto control surfaces.
    ///
    /// `px`, `py` and `pa` are centred with `(x - 0.5) * 2`; `pb` is the
    /// throttle and passes through unchanged.
    pub fn from_normalized(px: f32, py: f32, pa: f32, pb: f32) -> Self {
        Self::new(centre(px), centre(py), centre(pa), pb)
    }
}

fn centre(x: f32) -> f32 {
    (x - 0.5) * 2.0
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
