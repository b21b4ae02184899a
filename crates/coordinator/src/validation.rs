//! Turns the text of the host and port fields into an [`Endpoint`].

use shared::{domain::Endpoint, error::ValidationError};

const MAX_OCTET: i32 = 255;
const PORT_RANGE: std::ops::RangeInclusive<i32> = 1..=65535;

/// Accepts a dotted-quad IPv4 host and a TCP port in `1..=65535`.
///
/// The host is checked first, so text that is wrong in both fields reports
/// [`ValidationError::InvalidAddress`].
pub fn validate_endpoint(host: &str, port: &str) -> Result<Endpoint, ValidationError> {
    if !is_dotted_quad(host) {
        return Err(ValidationError::InvalidAddress);
    }
    let port = parse_port(port).ok_or(ValidationError::InvalidPort)?;
    Ok(Endpoint::new(host, port))
}

/// Exactly four non-empty runs of ASCII digits, each below 256. Leading zeros
/// are accepted.
fn is_dotted_quad(text: &str) -> bool {
    let octets: Vec<&str> = text.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| is_octet(octet))
}

fn is_octet(text: &str) -> bool {
    !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && text
            .parse::<i32>()
            .is_ok_and(|value| value <= MAX_OCTET)
}

fn parse_port(text: &str) -> Option<u16> {
    let value = text.parse::<i32>().ok()?;
    if !PORT_RANGE.contains(&value) {
        return None;
    }
    u16::try_from(value).ok()
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
