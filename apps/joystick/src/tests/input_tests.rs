use super::*;

#[test]
fn parses_four_axes() {
    assert_eq!(
        parse_line("0.5 0.5 0.5 0.0"),
        Ok(InputLine::Axes {
            px: 0.5,
            py: 0.5,
            pa: 0.5,
            pb: 0.0
        })
    );
}

#[test]
fn parses_connect_command() {
    assert_eq!(
        parse_line("connect 192.168.1.5 8080"),
        Ok(InputLine::Connect {
            host: "192.168.1.5".to_string(),
            port: "8080".to_string()
        })
    );
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    assert_eq!(parse_line(""), Ok(InputLine::Blank));
    assert_eq!(parse_line("   "), Ok(InputLine::Blank));
    assert_eq!(parse_line("# centre stick"), Ok(InputLine::Blank));
}

#[test]
fn trailing_comment_is_ignored() {
    assert!(matches!(
        parse_line("1 0 0 1 # full right"),
        Ok(InputLine::Axes { px, .. }) if px == 1.0
    ));
}

#[test]
fn rejects_out_of_range_axis() {
    let err = parse_line("1.5 0 0 0").expect_err("out of range");
    assert!(err.contains("outside [0, 1]"));
}

#[test]
fn rejects_wrong_field_count() {
    assert!(parse_line("0.5 0.5").is_err());
    assert!(parse_line("connect 1.2.3.4").is_err());
    assert!(parse_line("0.1 x 0.3 0.4").is_err());
}
