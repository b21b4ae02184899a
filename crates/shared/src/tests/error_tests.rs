use super::*;

#[test]
fn validation_errors_carry_user_facing_text() {
    assert_eq!(
        ValidationError::InvalidAddress.to_string(),
        "Invalid IP4 address"
    );
    assert_eq!(
        ValidationError::InvalidPort.to_string(),
        "Tcp Port is int between 1 to 65535"
    );
}

#[test]
fn connection_error_keeps_cause() {
    let failure = DispatchFailure::connection_error(
        Endpoint::new("127.0.0.1", 1),
        io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
    );
    assert_eq!(failure.description(), "Connection Error");
    assert_eq!(failure.kind(), FailureKind::ConnectionError);
    let cause = failure.cause().expect("cause");
    assert_eq!(cause.kind(), io::ErrorKind::ConnectionRefused);
    assert!(std::error::Error::source(&failure).is_some());
}

#[test]
fn disconnected_has_no_cause() {
    let failure = DispatchFailure::Disconnected {
        connection: ConnectionId(3),
    };
    assert_eq!(failure.description(), "Disconnected");
    assert!(failure.cause().is_none());
}

#[test]
fn notice_serializes_without_missing_cause() {
    let notice = FailureNotice::from(&DispatchFailure::Disconnected {
        connection: ConnectionId(1),
    });
    let json = serde_json::to_value(&notice).expect("serialize");
    assert_eq!(json["kind"], "disconnected");
    assert_eq!(json["description"], "Disconnected");
    assert!(json.get("cause").is_none());
}

#[test]
fn notice_from_validation_error() {
    let notice = FailureNotice::from(ValidationError::InvalidPort);
    assert_eq!(notice.kind, FailureKind::InvalidPort);
    assert_eq!(notice.cause, None);
}
