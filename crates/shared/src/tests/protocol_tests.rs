use super::*;

#[test]
fn encodes_four_crlf_lines_in_fixed_order() {
    let encoded = encode_update(&ControlValues::new(0.0, -1.0, 0.25, 1.0));
    assert_eq!(
        encoded,
        "set /controls/flight/aileron 0.0\r\n\
         set /controls/flight/elevator -1.0\r\n\
         set /controls/flight/rudder 0.25\r\n\
         set /controls/engines/current-engine/throttle 1.0\r\n"
    );
}

#[test]
fn encodes_shortest_round_trip_decimal() {
    let encoded = encode_update(&ControlValues::new(0.1, 0.0, 0.0, 0.0));
    assert!(encoded.starts_with("set /controls/flight/aileron 0.1\r\n"));
}

#[test]
fn parses_set_line_with_terminator() {
    let cmd = parse_set_line("set /controls/flight/rudder -0.5\r\n").expect("parse");
    assert_eq!(cmd.path, RUDDER_PATH);
    assert_eq!(cmd.value, "-0.5");
}

#[test]
fn rejects_non_set_lines() {
    assert_eq!(parse_set_line("get /controls/flight/rudder"), None);
    assert_eq!(parse_set_line("set /controls/flight/rudder"), None);
    assert_eq!(parse_set_line("set a b c"), None);
    assert_eq!(parse_set_line(""), None);
}

#[test]
fn encoded_update_parses_back_line_by_line() {
    let encoded = encode_update(&ControlValues::new(0.5, -0.5, 0.0, 0.75));
    let paths: Vec<String> = encoded
        .split_inclusive("\r\n")
        .filter_map(parse_set_line)
        .map(|cmd| cmd.path)
        .collect();
    assert_eq!(
        paths,
        vec![AILERON_PATH, ELEVATOR_PATH, RUDDER_PATH, THROTTLE_PATH]
    );
}
