use super::*;

#[test]
fn centred_axes_map_to_zero() {
    let values = ControlValues::from_normalized(0.5, 0.5, 0.5, 0.0);
    assert_eq!(values, ControlValues::new(0.0, 0.0, 0.0, 0.0));
}

#[test]
fn extreme_axes_map_to_full_deflection() {
    let values = ControlValues::from_normalized(1.0, 0.0, 0.0, 1.0);
    assert_eq!(values, ControlValues::new(1.0, -1.0, -1.0, 1.0));
}

#[test]
fn throttle_is_not_centred() {
    let values = ControlValues::from_normalized(0.5, 0.5, 0.5, 0.25);
    assert_eq!(values.throttle, 0.25);
}

#[test]
fn endpoint_displays_as_host_port() {
    assert_eq!(Endpoint::new("10.0.0.2", 5400).to_string(), "10.0.0.2:5400");
}

#[test]
fn connection_id_serializes_as_bare_number() {
    let json = serde_json::to_string(&ConnectionId(7)).expect("serialize");
    assert_eq!(json, "7");
}
