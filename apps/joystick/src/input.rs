//! Line format read from stdin by the `joystick` binary.
//!
//! ```text
//! 0.5 0.5 0.5 0.0          # px py pa pb, each in [0, 1]
//! connect 127.0.0.1 6400   # reconnect
//! ```

#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    Axes { px: f32, py: f32, pa: f32, pb: f32 },
    Connect { host: String, port: String },
    Blank,
}

pub fn parse_line(line: &str) -> Result<InputLine, String> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(InputLine::Blank);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["connect", host, port] => Ok(InputLine::Connect {
            host: (*host).to_string(),
            port: (*port).to_string(),
        }),
        ["connect", ..] => Err("usage: connect <host> <port>".to_string()),
        [px, py, pa, pb] => Ok(InputLine::Axes {
            px: parse_axis(px)?,
            py: parse_axis(py)?,
            pa: parse_axis(pa)?,
            pb: parse_axis(pb)?,
        }),
        _ => Err(format!(
            "expected four axis values or 'connect <host> <port>', got {} field(s)",
            fields.len()
        )),
    }
}

fn parse_axis(text: &str) -> Result<f32, String> {
    let value = text
        .parse::<f32>()
        .map_err(|err| format!("invalid axis value '{text}': {err}"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("axis value {value} is outside [0, 1]"));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
