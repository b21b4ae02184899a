//! FlightGear telnet property protocol: one `set <path> <value>` line per surface.

use std::fmt::Write as _;

use crate::domain::ControlValues;

pub const AILERON_PATH: &str = "/controls/flight/aileron";
pub const ELEVATOR_PATH: &str = "/controls/flight/elevator";
pub const RUDDER_PATH: &str = "/controls/flight/rudder";
pub const THROTTLE_PATH: &str = "/controls/engines/current-engine/throttle";

pub const LINE_TERMINATOR: &str = "\r\n";

/// Renders the four command lines for one update.
///
/// Floats use the shortest representation that round-trips and always keep a
/// fractional part, e.g. `0.0`, `-1.0`, `0.25`.
pub fn encode_update(values: &ControlValues) -> String {
    let mut out = String::with_capacity(160);
    for (path, value) in [
        (AILERON_PATH, values.aileron),
        (ELEVATOR_PATH, values.elevator),
        (RUDDER_PATH, values.rudder),
        (THROTTLE_PATH, values.throttle),
    ] {
        let _ = write!(out, "set {path} {value:?}{LINE_TERMINATOR}");
    }
    out
}

/// A single parsed `set` command, as seen by the receiving end.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCommand {
    pub path: String,
    pub value: String,
}

/// Parses one line (terminator optional). Returns `None` for anything that is
/// not a `set <path> <value>` command.
pub fn parse_set_line(line: &str) -> Option<SetCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut parts = line.split_whitespace();
    if parts.next()? != "set" {
        return None;
    }
    let path = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(SetCommand {
        path: path.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
